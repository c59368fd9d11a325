//! Runs the full analysis over one table and bundles the results.

use anyhow::{Context, Result};
use log::info;
use serde::Serialize;

use crate::{
    charts::{ChartSet, aggregate_charts},
    classify::{ClassificationResult, classify},
    insights::narrate,
    metrics::{Metrics, compute_metrics},
    options::AnalysisOptions,
    table::Table,
};

/// Everything a document renderer, dashboard or email composer consumes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub source_rows: usize,
    pub classification: ClassificationResult,
    pub metrics: Metrics,
    pub charts: ChartSet,
    pub insights: Vec<String>,
}

impl Report {
    /// Classifies `table` (coercing its columns in place) and derives the rest.
    pub fn build(table: &mut Table, options: &AnalysisOptions) -> Self {
        let classification = classify(table, options);
        info!(
            "Classified {} of {} column(s): {} date, {} numeric, {} category",
            classification.classified_count(),
            table.columns().len(),
            classification.dates.len(),
            classification.numeric.len(),
            classification.categories.len()
        );
        let metrics = compute_metrics(table, &classification, options);
        let charts = aggregate_charts(table, &classification, options);
        let insights = narrate(&metrics, &charts);
        Self {
            source_rows: table.row_count(),
            classification,
            metrics,
            charts,
            insights,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Serializing report JSON")
    }
}
