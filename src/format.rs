//! Display strings for metric values.

/// Formats `value` with `decimals` places and comma thousands separators.
pub fn format_grouped(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return String::new();
    }
    let formatted = format!("{:.*}", decimals, value.abs());
    let (integer, fraction) = match formatted.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(formatted.len() + integer.len() / 3 + 1);
    let negative = value < 0.0 && formatted.chars().any(|c| matches!(c, '1'..='9'));
    if negative {
        grouped.push('-');
    }
    for (idx, ch) in integer.chars().enumerate() {
        if idx > 0 && (integer.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}

/// `$1,234.50`; the sign follows the symbol (`$-12.00`).
pub fn format_currency(value: f64) -> String {
    format!("${}", format_grouped(value, 2))
}

pub fn format_percentage(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    format!("{value:.1}%")
}

/// Always carries a sign, as in `+20.0%`.
pub fn format_signed_percentage(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    format!("{value:+.1}%")
}

pub fn format_count(value: f64) -> String {
    format_grouped(value, 0)
}
