//! In-memory table model and CSV loading.
//!
//! A [`Table`] is an ordered list of named [`Column`]s holding [`Cell`]s. The
//! loader types whole columns at once: a column whose every non-missing value
//! is a finite number loads as numbers, anything else loads as text. Dates are
//! left as text here and discovered later by the classifier.

use std::{
    collections::{HashMap, HashSet},
    path::Path,
};

use anyhow::{Context, Result};
use encoding_rs::Encoding;
use log::debug;
use serde::Serialize;
use thiserror::Error;

use crate::{
    data::{Cell, is_placeholder, parse_number},
    io_utils,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("input has no header row")]
    EmptyInput,
    #[error("row {row} has {found} field(s) but the header defines {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("column '{column}' has {found} cell(s) but the table has {expected} row(s)")]
    ColumnLength {
        column: String,
        expected: usize,
        found: usize,
    },
}

/// Physical type of a column's cells, independent of its meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    Empty,
    Numeric,
    Temporal,
    Text,
    Mixed,
}

impl StorageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKind::Empty => "empty",
            StorageKind::Numeric => "numeric",
            StorageKind::Temporal => "temporal",
            StorageKind::Text => "text",
            StorageKind::Mixed => "mixed",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    pub fn non_missing(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|cell| !cell.is_missing())
    }

    pub fn storage_kind(&self) -> StorageKind {
        let mut kind = StorageKind::Empty;
        for cell in self.non_missing() {
            let cell_kind = match cell {
                Cell::Number(_) => StorageKind::Numeric,
                Cell::Date(_) => StorageKind::Temporal,
                Cell::Text(_) => StorageKind::Text,
                Cell::Missing => continue,
            };
            if kind == StorageKind::Empty {
                kind = cell_kind;
            } else if kind != cell_kind {
                return StorageKind::Mixed;
            }
        }
        kind
    }

    pub fn has_text(&self) -> bool {
        self.cells.iter().any(|cell| matches!(cell, Cell::Text(_)))
    }

    /// Sum of numeric cells; anything else counts as zero.
    pub fn sum(&self) -> f64 {
        self.cells.iter().filter_map(Cell::as_number).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Builds a table from columns of equal length.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self, LoadError> {
        let row_count = columns.first().map(|c| c.cells.len()).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.cells.len() != row_count) {
            return Err(LoadError::ColumnLength {
                column: bad.name.clone(),
                expected: row_count,
                found: bad.cells.len(),
            });
        }
        Ok(Self { columns, row_count })
    }

    /// Builds a typed table from a header row and raw string records.
    ///
    /// Short records are padded with missing cells. Records with more fields
    /// than the header are rejected.
    pub fn from_records(headers: &[String], records: &[Vec<String>]) -> Result<Self, LoadError> {
        if headers.is_empty() {
            return Err(LoadError::EmptyInput);
        }
        for (idx, record) in records.iter().enumerate() {
            if record.len() > headers.len() {
                return Err(LoadError::RaggedRow {
                    row: idx + 2,
                    expected: headers.len(),
                    found: record.len(),
                });
            }
        }
        let names = disambiguate_headers(headers);
        let columns = names
            .into_iter()
            .enumerate()
            .map(|(idx, name)| {
                let raw = records
                    .iter()
                    .map(|r| r.get(idx).map_or("", String::as_str))
                    .collect::<Vec<_>>();
                Column::new(name, type_column(&raw))
            })
            .collect();
        Ok(Self {
            columns,
            row_count: records.len(),
        })
    }

    pub fn load(path: &Path, delimiter: u8, encoding: &'static Encoding) -> Result<Self> {
        let mut reader = io_utils::open_csv_reader_from_path(path, delimiter, encoding)?;
        let headers = reader
            .headers()
            .with_context(|| format!("Reading header row from {path:?}"))?
            .iter()
            .map(|h| h.to_string())
            .collect::<Vec<_>>();
        let mut records = Vec::new();
        for (idx, record) in reader.records().enumerate() {
            let record = record.with_context(|| format!("Reading row {}", idx + 2))?;
            records.push(record.iter().map(|f| f.to_string()).collect::<Vec<_>>());
        }
        let table = Self::from_records(&headers, &records)
            .with_context(|| format!("Loading table from {path:?}"))?;
        debug!(
            "Loaded {} row(s) across {} column(s) from {:?}",
            table.row_count(),
            table.columns.len(),
            path
        );
        Ok(table)
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub(crate) fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Rows rendered as display strings, for previews.
    pub fn display_rows(&self, limit: usize) -> Vec<Vec<String>> {
        (0..self.row_count.min(limit))
            .map(|row| {
                self.columns
                    .iter()
                    .map(|c| c.cells[row].as_display())
                    .collect()
            })
            .collect()
    }
}

fn type_column(raw: &[&str]) -> Vec<Cell> {
    let all_numeric = raw
        .iter()
        .filter(|value| !is_placeholder(value))
        .all(|value| parse_number(value).is_some());
    raw.iter()
        .map(|value| {
            if is_placeholder(value) {
                Cell::Missing
            } else if all_numeric {
                parse_number(value).map_or(Cell::Missing, Cell::Number)
            } else {
                Cell::Text(value.to_string())
            }
        })
        .collect()
}

/// Renames blank and repeated headers. A generated `name.N` never reuses a
/// name that appears verbatim elsewhere in the header row.
fn disambiguate_headers(headers: &[String]) -> Vec<String> {
    let reserved = headers.iter().map(String::as_str).collect::<HashSet<_>>();
    let mut assigned: HashSet<String> = HashSet::new();
    let mut suffixes: HashMap<String, usize> = HashMap::new();
    let mut names = Vec::with_capacity(headers.len());
    for (idx, header) in headers.iter().enumerate() {
        let base = if header.trim().is_empty() {
            format!("Unnamed: {idx}")
        } else {
            header.clone()
        };
        let mut name = base.clone();
        if assigned.contains(&name) {
            let suffix = suffixes.entry(base.clone()).or_insert(0);
            loop {
                *suffix += 1;
                name = format!("{base}.{suffix}");
                if !assigned.contains(&name) && !reserved.contains(name.as_str()) {
                    break;
                }
            }
        }
        assigned.insert(name.clone());
        names.push(name);
    }
    names
}
