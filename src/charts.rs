//! Chart-ready series: revenue over time and revenue per category.
//!
//! Each series is built on its own; a missing prerequisite column or an
//! empty grouping only drops that series.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDateTime;
use itertools::Itertools;
use log::debug;
use serde::Serialize;

use crate::{
    classify::{ClassificationResult, ColumnRole},
    data::{Cell, format_date_label},
    options::AnalysisOptions,
    table::Table,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySeries {
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl CategorySeries {
    pub fn first(&self) -> Option<(&str, f64)> {
        Some((self.labels.first()?.as_str(), *self.values.first()?))
    }

    pub fn points(&self) -> impl Iterator<Item = (&str, f64)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSet {
    pub line: Option<LineSeries>,
    pub pie: Option<CategorySeries>,
    pub bar: Option<CategorySeries>,
}

pub fn aggregate_charts(
    table: &Table,
    classification: &ClassificationResult,
    options: &AnalysisOptions,
) -> ChartSet {
    let revenue_col = classification.first_with_role(ColumnRole::Currency);
    let date_col = classification.first_with_role(ColumnRole::Date);
    let category_col = classification.first_with_role(ColumnRole::Category);

    let line = match (date_col, revenue_col) {
        (Some(date_col), Some(revenue_col)) => temporal_series(table, date_col, revenue_col),
        _ => {
            debug!("No temporal series: needs a date column and a currency column");
            None
        }
    };

    let (pie, bar) = match (category_col, revenue_col) {
        (Some(category_col), Some(revenue_col)) => {
            let top = options.top_categories;
            let pie = category_totals(table, category_col, revenue_col, top).map(|(labels, values)| {
                CategorySeries {
                    title: format!("{revenue_col} by {category_col}"),
                    labels,
                    values,
                }
            });
            let bar = category_totals(table, category_col, revenue_col, top).map(|(labels, values)| {
                CategorySeries {
                    title: format!("Top {top} {category_col}"),
                    labels,
                    values,
                }
            });
            (pie, bar)
        }
        _ => {
            debug!("No category series: needs a category column and a currency column");
            (None, None)
        }
    };

    ChartSet { line, pie, bar }
}

fn temporal_series(table: &Table, date_col: &str, revenue_col: &str) -> Option<LineSeries> {
    let dates = &table.column(date_col)?.cells;
    let revenue = &table.column(revenue_col)?.cells;

    let mut totals: BTreeMap<NaiveDateTime, f64> = BTreeMap::new();
    for (date, amount) in dates.iter().zip(revenue) {
        if let Some(date) = date.as_date() {
            *totals.entry(date).or_insert(0.0) += amount.as_number().unwrap_or(0.0);
        }
    }
    if totals.is_empty() {
        debug!("No temporal series: '{date_col}' has no dates");
        return None;
    }

    let (labels, values) = totals
        .into_iter()
        .map(|(date, total)| (format_date_label(&date), total))
        .unzip();
    Some(LineSeries {
        title: format!("{revenue_col} Over Time"),
        x_label: date_col.to_string(),
        y_label: revenue_col.to_string(),
        labels,
        values,
    })
}

/// Revenue per category, largest first, ties by label, capped at `top`.
fn category_totals(
    table: &Table,
    category_col: &str,
    revenue_col: &str,
    top: usize,
) -> Option<(Vec<String>, Vec<f64>)> {
    let categories = &table.column(category_col)?.cells;
    let revenue = &table.column(revenue_col)?.cells;

    let mut totals: HashMap<String, f64> = HashMap::new();
    for (category, amount) in categories.iter().zip(revenue) {
        if matches!(category, Cell::Missing) {
            continue;
        }
        *totals.entry(category.as_display()).or_insert(0.0) += amount.as_number().unwrap_or(0.0);
    }
    if totals.is_empty() {
        debug!("No category series: '{category_col}' has no values");
        return None;
    }

    Some(
        totals
            .into_iter()
            .sorted_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
            .take(top)
            .unzip(),
    )
}
