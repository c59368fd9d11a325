//! Headline metrics derived from a classified table.
//!
//! Every metric is gated on its own preconditions. A metric that does not
//! apply is absent from the map rather than zero, so callers can tell
//! "computed zero" from "not applicable".

use std::collections::BTreeMap;

use chrono::Duration;
use heck::ToTitleCase;
use itertools::Itertools;
use log::debug;
use serde::{Serialize, Serializer, ser::SerializeStruct};

use crate::{
    classify::{ClassificationResult, ColumnRole, contains_keyword},
    data::Cell,
    format::{format_count, format_currency, format_percentage},
    options::AnalysisOptions,
    table::Table,
};

pub const CUSTOMER_KEYWORDS: &[&str] = &["customer", "client", "user", "cliente", "usuario"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    TotalRevenue,
    Aov,
    TotalOrders,
    TotalRecords,
    UniqueCustomers,
    Growth,
}

impl MetricKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKey::TotalRevenue => "total_revenue",
            MetricKey::Aov => "aov",
            MetricKey::TotalOrders => "total_orders",
            MetricKey::TotalRecords => "total_records",
            MetricKey::UniqueCustomers => "unique_customers",
            MetricKey::Growth => "growth",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricFormat {
    Currency,
    Percentage,
    Number,
}

/// Count-style metrics serialize their value as a JSON integer; the rest
/// stay floats.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub value: f64,
    pub label: String,
    pub format: MetricFormat,
}

impl Metric {
    fn new(value: f64, label: impl Into<String>, format: MetricFormat) -> Self {
        Self {
            value,
            label: label.into(),
            format,
        }
    }

    pub fn display_value(&self) -> String {
        match self.format {
            MetricFormat::Currency => format_currency(self.value),
            MetricFormat::Percentage => format_percentage(self.value),
            MetricFormat::Number => format_count(self.value),
        }
    }
}

impl Serialize for Metric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Metric", 3)?;
        match self.whole_value() {
            Some(whole) => state.serialize_field("value", &whole)?,
            None => state.serialize_field("value", &self.value)?,
        }
        state.serialize_field("label", &self.label)?;
        state.serialize_field("format", &self.format)?;
        state.end()
    }
}

impl Metric {
    fn whole_value(&self) -> Option<i64> {
        let in_range = self.value.abs() < i64::MAX as f64;
        (self.format == MetricFormat::Number && self.value.fract() == 0.0 && in_range)
            .then_some(self.value as i64)
    }
}

pub type Metrics = BTreeMap<MetricKey, Metric>;

/// Computes every applicable metric. The `total_orders` label is
/// `Total <column>` with the column name re-cased by heck's title case, so
/// `units_sold` and `UnitsSold` both read `Total Units Sold`.
pub fn compute_metrics(
    table: &Table,
    classification: &ClassificationResult,
    options: &AnalysisOptions,
) -> Metrics {
    let mut metrics = Metrics::new();
    let revenue_col = classification.first_with_role(ColumnRole::Currency);
    let count_col = classification.first_with_role(ColumnRole::Count);

    let total_revenue = revenue_col.and_then(|name| column_sum(table, name));
    if let Some(revenue) = total_revenue {
        metrics.insert(
            MetricKey::TotalRevenue,
            Metric::new(revenue, "Total Revenue", MetricFormat::Currency),
        );
    }

    if let Some(name) = count_col
        && let Some(orders) = column_sum(table, name)
    {
        match total_revenue {
            Some(revenue) if orders > 0.0 => {
                metrics.insert(
                    MetricKey::Aov,
                    Metric::new(revenue / orders, "Average Order Value", MetricFormat::Currency),
                );
            }
            Some(_) => debug!("Skipping average order value: '{name}' sums to {orders}"),
            None => {}
        }
        metrics.insert(
            MetricKey::TotalOrders,
            Metric::new(
                orders.trunc(),
                format!("Total {}", name.to_title_case()),
                MetricFormat::Number,
            ),
        );
    }

    metrics.insert(
        MetricKey::TotalRecords,
        Metric::new(table.row_count() as f64, "Total Records", MetricFormat::Number),
    );

    let customer_col = classification
        .categories
        .iter()
        .find(|name| contains_keyword(&name.to_lowercase(), CUSTOMER_KEYWORDS));
    if let Some(name) = customer_col
        && let Some(column) = table.column(name)
    {
        let unique = column
            .non_missing()
            .map(Cell::as_display)
            .unique()
            .count();
        metrics.insert(
            MetricKey::UniqueCustomers,
            Metric::new(unique as f64, "Unique Customers", MetricFormat::Number),
        );
    }

    if let (Some(date_col), Some(revenue_col)) =
        (classification.first_with_role(ColumnRole::Date), revenue_col)
    {
        match week_over_week_growth(table, date_col, revenue_col, options.growth_window_days) {
            Some(growth) => {
                metrics.insert(
                    MetricKey::Growth,
                    Metric::new(growth, "Growth vs Last Week", MetricFormat::Percentage),
                );
            }
            None => debug!("Skipping growth: no revenue in the previous window"),
        }
    }

    metrics
}

fn column_sum(table: &Table, name: &str) -> Option<f64> {
    table.column(name).map(|column| column.sum())
}

/// Percent change between the window ending at the latest date and the one
/// before it. `None` when the earlier window has no positive revenue.
pub fn week_over_week_growth(
    table: &Table,
    date_col: &str,
    revenue_col: &str,
    window_days: i64,
) -> Option<f64> {
    let dates = &table.column(date_col)?.cells;
    let revenue = &table.column(revenue_col)?.cells;
    let latest = dates.iter().filter_map(Cell::as_date).max()?;
    let window = Duration::try_days(window_days)?;
    let window_start = latest.checked_sub_signed(window)?;
    let previous_start = window_start.checked_sub_signed(window)?;

    let mut current = 0.0;
    let mut previous = 0.0;
    for (date, amount) in dates.iter().zip(revenue) {
        let Some(date) = date.as_date() else {
            continue;
        };
        let amount = amount.as_number().unwrap_or(0.0);
        if date >= window_start {
            current += amount;
        } else if date >= previous_start {
            previous += amount;
        }
    }
    debug!("Growth windows: current {current}, previous {previous} (latest {latest})");

    (previous > 0.0).then(|| (current - previous) / previous * 100.0)
}
