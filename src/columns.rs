//! Column listing with detected roles.
//!
//! Loads a CSV file, classifies it, and renders one row per column with its
//! storage kind before and after classification and the role it received.

use anyhow::Result;
use log::info;

use crate::{
    classify::classify,
    cli::ColumnsArgs,
    load_input,
    options::AnalysisOptions,
    render,
    table::StorageKind,
};

pub fn execute(args: &ColumnsArgs) -> Result<()> {
    let mut table = load_input(&args.source)?;
    let loaded = table
        .columns()
        .iter()
        .map(|c| c.storage_kind())
        .collect::<Vec<StorageKind>>();
    let classification = classify(&mut table, &AnalysisOptions::default());

    let mut rows = Vec::with_capacity(table.columns().len());
    for (idx, column) in table.columns().iter().enumerate() {
        let role = classification
            .role_of(&column.name)
            .map(|r| r.as_str().to_string())
            .unwrap_or_default();
        let coerced = column.storage_kind();
        let storage = if coerced == loaded[idx] {
            coerced.as_str().to_string()
        } else {
            format!("{} -> {}", loaded[idx].as_str(), coerced.as_str())
        };
        rows.push(vec![
            (idx + 1).to_string(),
            column.name.clone(),
            storage,
            role,
        ]);
    }

    let headers = vec![
        "#".to_string(),
        "name".to_string(),
        "storage".to_string(),
        "role".to_string(),
    ];
    render::print_table(&headers, &rows);
    info!(
        "Classified {} of {} column(s)",
        classification.classified_count(),
        table.columns().len()
    );
    Ok(())
}
