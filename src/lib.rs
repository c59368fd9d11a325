pub mod analyze;
pub mod charts;
pub mod classify;
pub mod cli;
pub mod columns;
pub mod data;
pub mod format;
pub mod insights;
pub mod io_utils;
pub mod metrics;
pub mod options;
pub mod preview;
pub mod render;
pub mod report;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use encoding_rs::Encoding;
use log::{LevelFilter, info};

use crate::{
    cli::{Cli, Commands, InputArgs},
    table::Table,
};

pub use crate::{
    charts::ChartSet,
    classify::{ClassificationResult, ColumnRole, NumericRole},
    metrics::{Metric, MetricFormat, MetricKey, Metrics},
    options::AnalysisOptions,
    report::Report,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("csv_autoreport", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze(args) => analyze::execute(&args),
        Commands::Columns(args) => columns::execute(&args),
        Commands::Preview(args) => preview::execute(&args),
    }
}

pub(crate) fn load_input(source: &InputArgs) -> Result<Table> {
    let delimiter = io_utils::resolve_input_delimiter(&source.input, source.delimiter);
    let encoding: &'static Encoding = io_utils::resolve_encoding(source.input_encoding.as_deref())?;
    info!(
        "Loading '{}' with delimiter '{}' ({})",
        source.input.display(),
        printable_delimiter(delimiter),
        encoding.name()
    );
    Table::load(&source.input, delimiter, encoding)
        .with_context(|| format!("Reading {:?}", source.input))
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}
