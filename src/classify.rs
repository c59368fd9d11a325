//! Column classification by semantic role.
//!
//! Each column receives at most one [`ColumnRole`]. Dates are decided first
//! (stored temporal cells, or a date-ish name whose every value parses),
//! then numbers (stored numeric cells, or text whose leading sample parses
//! once currency symbols, separators and percent signs are stripped), then
//! text falls back to `category`. Anything else stays unclassified.
//!
//! Keyword matching is a case-insensitive substring test, so `backorders`
//! matches `orders`. The numeric-text check only samples the first few
//! non-missing values; later cells that fail to parse become missing when the
//! column is coerced.

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    data::{Cell, parse_decorated_number, parse_temporal},
    options::AnalysisOptions,
    table::{Column, StorageKind, Table},
};

pub const DATE_KEYWORDS: &[&str] = &["date", "time", "day", "month", "year", "fecha"];
pub const CURRENCY_KEYWORDS: &[&str] = &[
    "revenue", "price", "cost", "sales", "total", "amount", "ingreso", "venta", "precio",
];
pub const PERCENTAGE_KEYWORDS: &[&str] =
    &["rate", "percent", "%", "pct", "ratio", "tasa", "porcentaje"];
pub const COUNT_KEYWORDS: &[&str] = &["quantity", "count", "orders", "units", "cantidad", "pedidos"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    Date,
    Currency,
    Percentage,
    Count,
    Number,
    Category,
}

impl ColumnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnRole::Date => "date",
            ColumnRole::Currency => "currency",
            ColumnRole::Percentage => "percentage",
            ColumnRole::Count => "count",
            ColumnRole::Number => "number",
            ColumnRole::Category => "category",
        }
    }
}

/// Formatting tag for numeric columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericRole {
    Currency,
    Percentage,
    Count,
    Number,
}

impl NumericRole {
    pub fn from_name(name: &str) -> Self {
        let lowered = name.to_lowercase();
        if contains_keyword(&lowered, CURRENCY_KEYWORDS) {
            NumericRole::Currency
        } else if contains_keyword(&lowered, PERCENTAGE_KEYWORDS) {
            NumericRole::Percentage
        } else if contains_keyword(&lowered, COUNT_KEYWORDS) {
            NumericRole::Count
        } else {
            NumericRole::Number
        }
    }

    pub fn role(&self) -> ColumnRole {
        match self {
            NumericRole::Currency => ColumnRole::Currency,
            NumericRole::Percentage => ColumnRole::Percentage,
            NumericRole::Count => ColumnRole::Count,
            NumericRole::Number => ColumnRole::Number,
        }
    }
}

/// Role sets for one table. The vectors keep column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub dates: Vec<String>,
    pub numeric: Vec<String>,
    pub categories: Vec<String>,
    pub column_info: BTreeMap<String, ColumnRole>,
    pub numeric_roles: BTreeMap<String, NumericRole>,
}

impl ClassificationResult {
    pub fn role_of(&self, column: &str) -> Option<ColumnRole> {
        self.column_info.get(column).copied()
    }

    /// Columns holding `role`, left to right.
    pub fn columns_with_role(&self, role: ColumnRole) -> Vec<&str> {
        match role {
            ColumnRole::Date => self.dates.iter().map(String::as_str).collect(),
            ColumnRole::Category => self.categories.iter().map(String::as_str).collect(),
            numeric => self
                .numeric
                .iter()
                .filter(|name| self.role_of(name) == Some(numeric))
                .map(String::as_str)
                .collect(),
        }
    }

    pub fn first_with_role(&self, role: ColumnRole) -> Option<&str> {
        self.columns_with_role(role).into_iter().next()
    }

    pub fn classified_count(&self) -> usize {
        self.column_info.len()
    }

    fn mark_date(&mut self, name: &str) {
        self.dates.push(name.to_string());
        self.column_info.insert(name.to_string(), ColumnRole::Date);
    }

    fn mark_numeric(&mut self, name: &str, role: NumericRole) {
        self.numeric.push(name.to_string());
        self.numeric_roles.insert(name.to_string(), role);
        self.column_info.insert(name.to_string(), role.role());
    }

    fn mark_category(&mut self, name: &str) {
        self.categories.push(name.to_string());
        self.column_info
            .insert(name.to_string(), ColumnRole::Category);
    }
}

pub fn contains_keyword(lowered: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| lowered.contains(keyword))
}

/// Classifies every column, coercing date and numeric-text columns in place.
pub fn classify(table: &mut Table, options: &AnalysisOptions) -> ClassificationResult {
    let mut result = ClassificationResult::default();
    for column in table.columns_mut() {
        classify_column(column, options, &mut result);
    }
    result
}

fn classify_column(column: &mut Column, options: &AnalysisOptions, result: &mut ClassificationResult) {
    let lowered = column.name.to_lowercase();

    if column.storage_kind() == StorageKind::Temporal {
        debug!("Column '{}' holds dates", column.name);
        result.mark_date(&column.name);
        return;
    }
    if contains_keyword(&lowered, DATE_KEYWORDS) {
        match parse_date_cells(column) {
            Some(parsed) => {
                debug!("Column '{}' parsed as dates by name", column.name);
                column.cells = parsed;
                result.mark_date(&column.name);
                return;
            }
            None => debug!(
                "Column '{}' has a date-like name but values that are not dates",
                column.name
            ),
        }
    }

    let numeric = match column.storage_kind() {
        StorageKind::Numeric => true,
        _ if sample_is_numeric(column, options.numeric_sample) => {
            coerce_numeric(column);
            debug!("Column '{}' coerced from numeric text", column.name);
            true
        }
        _ => false,
    };
    if numeric {
        let role = NumericRole::from_name(&column.name);
        debug!("Column '{}' classified as {:?}", column.name, role);
        result.mark_numeric(&column.name, role);
        return;
    }

    if column.has_text() {
        debug!("Column '{}' classified as category", column.name);
        result.mark_category(&column.name);
    } else {
        debug!(
            "Column '{}' left unclassified ({})",
            column.name,
            column.storage_kind().as_str()
        );
    }
}

/// Every non-missing cell must be a date or parse as one.
fn parse_date_cells(column: &Column) -> Option<Vec<Cell>> {
    if column.non_missing().next().is_none() {
        return None;
    }
    column
        .cells
        .iter()
        .map(|cell| match cell {
            Cell::Missing => Some(Cell::Missing),
            Cell::Date(d) => Some(Cell::Date(*d)),
            Cell::Text(s) => parse_temporal(s).ok().map(Cell::Date),
            Cell::Number(_) => None,
        })
        .collect()
}

fn sample_is_numeric(column: &Column, sample: usize) -> bool {
    let mut seen = 0usize;
    for cell in column.non_missing().take(sample) {
        let parsed = match cell {
            Cell::Number(_) => true,
            Cell::Text(s) => parse_decorated_number(s).is_some(),
            Cell::Date(_) | Cell::Missing => false,
        };
        if !parsed {
            return false;
        }
        seen += 1;
    }
    seen > 0
}

fn coerce_numeric(column: &mut Column) {
    for cell in column.cells.iter_mut() {
        let coerced = match cell {
            Cell::Number(n) => Cell::Number(*n),
            Cell::Text(s) => parse_decorated_number(s).map_or(Cell::Missing, Cell::Number),
            Cell::Date(_) | Cell::Missing => Cell::Missing,
        };
        *cell = coerced;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;
    use chrono::NaiveDate;

    fn text(values: &[&str]) -> Vec<Cell> {
        values
            .iter()
            .map(|v| {
                if v.is_empty() {
                    Cell::Missing
                } else {
                    Cell::Text(v.to_string())
                }
            })
            .collect()
    }

    fn numbers(values: &[f64]) -> Vec<Cell> {
        values.iter().map(|v| Cell::Number(*v)).collect()
    }

    fn classify_columns(columns: Vec<Column>) -> (Table, ClassificationResult) {
        let mut table = Table::from_columns(columns).unwrap();
        let result = classify(&mut table, &AnalysisOptions::default());
        (table, result)
    }

    #[test]
    fn date_named_text_is_parsed_in_place() {
        let (table, result) = classify_columns(vec![Column::new(
            "Order Date",
            text(&["2024-01-01", "", "01/15/2024"]),
        )]);
        assert_eq!(result.dates, vec!["Order Date"]);
        assert_eq!(result.role_of("Order Date"), Some(ColumnRole::Date));
        let cells = &table.column("Order Date").unwrap().cells;
        assert_eq!(
            cells[2].as_date().map(|d| d.date()),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
        assert!(cells[1].is_missing());
    }

    #[test]
    fn date_named_column_with_bad_values_falls_through_to_category() {
        let (table, result) = classify_columns(vec![Column::new(
            "update_notes",
            text(&["2024-01-01", "soon"]),
        )]);
        assert!(result.dates.is_empty());
        assert_eq!(result.categories, vec!["update_notes"]);
        assert_eq!(
            table.column("update_notes").unwrap().cells[0],
            Cell::Text("2024-01-01".to_string())
        );
    }

    #[test]
    fn numeric_year_column_stays_numeric() {
        let (_, result) = classify_columns(vec![Column::new("year", numbers(&[2023.0, 2024.0]))]);
        assert!(result.dates.is_empty());
        assert_eq!(result.role_of("year"), Some(ColumnRole::Number));
    }

    #[test]
    fn currency_strings_are_coerced_and_summed() {
        let (table, result) = classify_columns(vec![Column::new(
            "Sales",
            text(&["$1,200", "$950", "$3,100"]),
        )]);
        assert_eq!(result.numeric, vec!["Sales"]);
        assert_eq!(result.numeric_roles["Sales"], NumericRole::Currency);
        assert_eq!(table.column("Sales").unwrap().sum(), 5250.0);
    }

    #[test]
    fn sample_only_covers_leading_values() {
        let mut values = vec!["5"; 10];
        values.push("oops");
        let (table, result) = classify_columns(vec![Column::new("score", text(&values))]);
        assert_eq!(result.role_of("score"), Some(ColumnRole::Number));
        let cells = &table.column("score").unwrap().cells;
        assert!(cells[10].is_missing());
        assert_eq!(table.column("score").unwrap().sum(), 50.0);
    }

    #[test]
    fn bad_value_inside_sample_keeps_text() {
        let (_, result) =
            classify_columns(vec![Column::new("code", text(&["5", "x7", "9"]))]);
        assert_eq!(result.role_of("code"), Some(ColumnRole::Category));
    }

    #[test]
    fn numeric_roles_follow_keyword_precedence() {
        assert_eq!(NumericRole::from_name("Total Rate"), NumericRole::Currency);
        assert_eq!(NumericRole::from_name("conversion_rate"), NumericRole::Percentage);
        assert_eq!(NumericRole::from_name("Margin %"), NumericRole::Percentage);
        assert_eq!(NumericRole::from_name("backorders"), NumericRole::Count);
        assert_eq!(NumericRole::from_name("Cantidad"), NumericRole::Count);
        assert_eq!(NumericRole::from_name("weight"), NumericRole::Number);
    }

    #[test]
    fn empty_columns_are_unclassified() {
        let (_, result) = classify_columns(vec![
            Column::new("blank", vec![Cell::Missing, Cell::Missing]),
            Column::new("region", text(&["North", "South"])),
        ]);
        assert_eq!(result.role_of("blank"), None);
        assert_eq!(result.classified_count(), 1);
    }

    #[test]
    fn classification_is_stable_across_runs() {
        let mut table = Table::from_columns(vec![
            Column::new("date", text(&["2024-01-01", "2024-01-02"])),
            Column::new("revenue", text(&["$10", "$20"])),
            Column::new("customer", text(&["a", "b"])),
        ])
        .unwrap();
        let options = AnalysisOptions::default();
        let first = classify(&mut table, &options);
        let second = classify(&mut table, &options);
        assert_eq!(first, second);
    }

    #[test]
    fn columns_with_role_keeps_column_order() {
        let (_, result) = classify_columns(vec![
            Column::new("units", numbers(&[1.0])),
            Column::new("price", numbers(&[2.0])),
            Column::new("cost", numbers(&[3.0])),
        ]);
        assert_eq!(
            result.columns_with_role(ColumnRole::Currency),
            vec!["price", "cost"]
        );
        assert_eq!(result.first_with_role(ColumnRole::Count), Some("units"));
        assert_eq!(result.first_with_role(ColumnRole::Percentage), None);
    }
}
