use std::io::Write;

use anyhow::{Context, Result};
use log::info;

use crate::{
    cli::AnalyzeArgs, io_utils, load_input, options::AnalysisOptions, render, report::Report,
};

pub fn execute(args: &AnalyzeArgs) -> Result<()> {
    let options = resolve_options(args)?;
    let mut table = load_input(&args.source)?;
    let report = Report::build(&mut table, &options);
    info!(
        "Derived {} metric(s) and {} insight(s) from {} row(s)",
        report.metrics.len(),
        report.insights.len(),
        report.source_rows
    );

    match &args.json {
        Some(path) => {
            let mut sink = io_utils::open_output(Some(path))?;
            writeln!(sink, "{}", report.to_json_pretty()?)
                .with_context(|| format!("Writing report to {path:?}"))?;
            sink.flush().context("Flushing report output")?;
            if !io_utils::is_dash(path) {
                info!("Report written to {path:?}");
            }
        }
        None => print!("{}", render::render_report(&report)),
    }
    Ok(())
}

fn resolve_options(args: &AnalyzeArgs) -> Result<AnalysisOptions> {
    let mut options = match &args.options {
        Some(path) => AnalysisOptions::load(path)
            .with_context(|| format!("Loading analysis options from {path:?}"))?,
        None => AnalysisOptions::default(),
    };
    if let Some(top) = args.top {
        options.top_categories = top;
    }
    options.validate()?;
    Ok(options)
}
