use std::fmt;

use anyhow::{Result, anyhow};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// A single table cell as loaded or coerced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub enum Cell {
    #[default]
    Missing,
    Text(String),
    Number(f64),
    Date(NaiveDateTime),
}

impl Cell {
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDateTime> {
        match self {
            Cell::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_display(&self) -> String {
        match self {
            Cell::Missing => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    (*n as i64).to_string()
                } else {
                    n.to_string()
                }
            }
            Cell::Date(d) => format_date_label(d),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

/// Tokens that load as missing, compared after trimming and lowercasing.
const PLACEHOLDER_TOKENS: &[&str] = &["na", "n/a", "nan", "-nan", "null", "none", "#n/a", "<na>"];

pub fn is_placeholder(raw: &str) -> bool {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return true;
    }
    let lowered = trimmed.to_ascii_lowercase();
    PLACEHOLDER_TOKENS.contains(&lowered.as_str())
}

pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

const NUMERIC_DECORATIONS: &[char] = &[',', '$', '€', '£', '¥', '%'];

/// Parses a number after removing thousands separators, currency symbols and percent signs.
pub fn parse_decorated_number(raw: &str) -> Option<f64> {
    let stripped = raw
        .chars()
        .filter(|c| !NUMERIC_DECORATIONS.contains(c))
        .collect::<String>();
    parse_number(&stripped)
}

pub fn parse_naive_date(value: &str) -> Result<NaiveDate> {
    // Month-first before day-first for ambiguous slashed dates.
    const DATE_FORMATS: &[&str] = &[
        "%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%Y/%m/%d", "%d-%m-%Y", "%d.%m.%Y", "%b %d, %Y",
        "%B %d, %Y",
    ];
    for fmt in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(value, fmt) {
            return Ok(parsed);
        }
    }
    Err(anyhow!("Failed to parse '{value}' as date"))
}

pub fn parse_naive_datetime(value: &str) -> Result<NaiveDateTime> {
    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%m/%d/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
        "%m/%d/%Y %H:%M",
    ];
    for fmt in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, fmt) {
            return Ok(parsed);
        }
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.naive_utc());
    }
    Err(anyhow!("Failed to parse '{value}' as datetime"))
}

/// Parses a date or date-time; plain dates land at midnight.
pub fn parse_temporal(value: &str) -> Result<NaiveDateTime> {
    let trimmed = value.trim();
    parse_naive_date(trimmed)
        .map(|d| d.and_time(NaiveTime::MIN))
        .or_else(|_| parse_naive_datetime(trimmed))
}

pub fn format_date_label(value: &NaiveDateTime) -> String {
    if value.time() == NaiveTime::MIN {
        value.format("%Y-%m-%d").to_string()
    } else {
        value.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}
