//! One-line narrative insights built from metrics and chart series.

use crate::{
    charts::ChartSet,
    format::{format_currency, format_signed_percentage},
    metrics::{MetricKey, Metrics},
};

/// Insights in fixed order: revenue, growth, average order value, top category.
pub fn narrate(metrics: &Metrics, charts: &ChartSet) -> Vec<String> {
    let mut insights = Vec::new();

    if let Some(revenue) = metrics.get(&MetricKey::TotalRevenue) {
        insights.push(format!(
            "✅ Total revenue: {}",
            format_currency(revenue.value)
        ));
    }

    if let Some(growth) = metrics.get(&MetricKey::Growth) {
        let marker = if growth.value > 0.0 { "📈" } else { "📉" };
        insights.push(format!(
            "{marker} Growth vs last week: {}",
            format_signed_percentage(growth.value)
        ));
    }

    if let Some(aov) = metrics.get(&MetricKey::Aov) {
        insights.push(format!("💰 Average order value: ${:.2}", aov.value));
    }

    if let Some((label, value)) = charts.pie.as_ref().and_then(|pie| pie.first()) {
        insights.push(format!(
            "🏆 Top category: {label} ({})",
            format_currency(value)
        ));
    }

    insights
}
