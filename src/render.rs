//! Plain-text rendering of tables and reports for terminal output.

use std::borrow::Cow;
use std::fmt::Write as _;

use crate::{
    charts::{CategorySeries, LineSeries},
    format::format_grouped,
    report::Report,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    render_aligned_table(headers, rows, &[])
}

/// Columns without an entry in `aligns` are left-aligned.
pub fn render_aligned_table(headers: &[String], rows: &[Vec<String>], aligns: &[Align]) -> String {
    let column_count = headers.len();
    let mut widths = headers.iter().map(|h| display_width(h)).collect::<Vec<_>>();
    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(display_width(cell));
        }
    }
    for width in &mut widths {
        *width = (*width).max(3);
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_row(headers, &widths, &[]));
    let separator = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&separator, &widths, &[]));
    for row in rows {
        let _ = writeln!(output, "{}", format_row(row, &widths, aligns));
    }
    output
}

pub fn print_table(headers: &[String], rows: &[Vec<String>]) {
    print!("{}", render_table(headers, rows));
}

fn format_row(values: &[String], widths: &[usize], aligns: &[Align]) -> String {
    let cells = values
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(idx, (value, width))| {
            let sanitized = sanitize_cell(value);
            let padding = " ".repeat(width.saturating_sub(display_width(&sanitized)));
            match aligns.get(idx) {
                Some(Align::Right) => format!("{padding}{sanitized}"),
                _ => format!("{sanitized}{padding}"),
            }
        })
        .collect::<Vec<_>>();
    cells.join("  ").trim_end().to_string()
}

fn display_width(value: &str) -> usize {
    let mut width = 0usize;
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' {
            // ANSI escape sequence (e.g. \x1b[31m)
            for next in chars.by_ref() {
                if next == 'm' {
                    break;
                }
            }
        } else {
            width += 1;
        }
    }
    width
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}

fn series_rows<'a>(points: impl Iterator<Item = (&'a str, f64)>) -> Vec<Vec<String>> {
    points
        .map(|(label, value)| vec![label.to_string(), format_grouped(value, 2)])
        .collect()
}

fn render_line(output: &mut String, line: &LineSeries) {
    let _ = writeln!(output, "\n{}", line.title);
    let headers = vec![line.x_label.clone(), line.y_label.clone()];
    let points = line
        .labels
        .iter()
        .map(String::as_str)
        .zip(line.values.iter().copied());
    output.push_str(&render_aligned_table(
        &headers,
        &series_rows(points),
        &[Align::Left, Align::Right],
    ));
}

fn render_categories(output: &mut String, series: &CategorySeries) {
    let _ = writeln!(output, "\n{}", series.title);
    let headers = vec!["label".to_string(), "value".to_string()];
    output.push_str(&render_aligned_table(
        &headers,
        &series_rows(series.points()),
        &[Align::Left, Align::Right],
    ));
}

/// Metrics, series and insights as a terminal dashboard.
pub fn render_report(report: &Report) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Key metrics");
    let headers = vec!["metric".to_string(), "label".to_string(), "value".to_string()];
    let rows = report
        .metrics
        .iter()
        .map(|(key, metric)| {
            vec![
                key.as_str().to_string(),
                metric.label.clone(),
                metric.display_value(),
            ]
        })
        .collect::<Vec<_>>();
    output.push_str(&render_aligned_table(
        &headers,
        &rows,
        &[Align::Left, Align::Left, Align::Right],
    ));

    if let Some(line) = &report.charts.line {
        render_line(&mut output, line);
    }
    // The bar series repeats the pie series' points, so only the pie is printed.
    if let Some(pie) = &report.charts.pie {
        render_categories(&mut output, pie);
    }

    if !report.insights.is_empty() {
        let _ = writeln!(output, "\nInsights");
        for insight in &report.insights {
            let _ = writeln!(output, "  {insight}");
        }
    }
    output
}
