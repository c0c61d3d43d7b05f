// Parsing and formatting helpers.
//
// Spreadsheet exports are messy: counts arrive as floats, as text, or not
// at all. Everything that turns a raw cell into a typed value, or a number
// into display text, lives here.
use crate::types::RawValue;
use num_format::{Locale, ToFormattedString};

/// Read a count typed as text. Only plain numeric literals count
/// (`"4"`, `" 2.5 "`, `"1e3"`); thousands separators and other decoration
/// make the value non-numeric.
pub fn parse_count_text(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok()
}

/// Coerce a walks-count cell to a whole, non-negative number.
///
/// Returns the count and whether the cell had to be coerced to 0
/// (blank, non-numeric, non-finite or negative).
pub fn coerce_count(value: &RawValue) -> (u64, bool) {
    let n = match value {
        RawValue::Empty => None,
        RawValue::Number(n) => Some(*n),
        RawValue::Text(s) => parse_count_text(s),
    };
    match n {
        // Fractional counts truncate toward zero.
        Some(n) if n.is_finite() && n >= 0.0 => (n.trunc() as u64, false),
        _ => (0, true),
    }
}

/// Manager name shown for a district key of the form `"<code>-<name>"`:
/// the text after the last `-`, trimmed. Keys without a `-` are used whole.
pub fn district_display_name(key: &str) -> String {
    match key.rsplit_once('-') {
        Some((_, name)) => name.trim().to_string(),
        None => key.to_string(),
    }
}

/// `actual / target * 100`, or `None` when there is no target to measure against.
pub fn compliance_pct(actual: u64, target: u64) -> Option<f64> {
    if target == 0 {
        return None;
    }
    Some(actual as f64 / target as f64 * 100.0)
}

pub fn format_percent(pct: Option<f64>) -> String {
    match pct {
        Some(p) => format!("{:.1}%", p),
        None => "N/A".to_string(),
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}
