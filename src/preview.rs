use anyhow::Result;
use log::info;

use crate::{cli::PreviewArgs, load_input, render};

pub fn execute(args: &PreviewArgs) -> Result<()> {
    let table = load_input(&args.source)?;
    let rows = table.display_rows(args.rows);
    render::print_table(&table.column_names(), &rows);
    info!(
        "Displayed {} of {} row(s) from {:?}",
        rows.len(),
        table.row_count(),
        args.source.input
    );
    Ok(())
}
