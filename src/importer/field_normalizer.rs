// ==========================================
// Appliance Registry - Field normalizer
// ==========================================
// Responsibility: alias lookup over raw sheet rows + typed coercion
// Rule: cells are trimmed first; a whitespace-only cell is empty
// ==========================================

use crate::domain::import::RawRow;
use crate::importer::error::{ImportError, ImportResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

// ==========================================
// Alias lookup
// ==========================================

/// Returns the first candidate header holding a non-empty value
///
/// # Arguments
/// - row: raw sheet row
/// - candidates: header aliases, in priority order
pub fn first_present<'a>(row: &'a RawRow, candidates: &[&str]) -> Option<&'a str> {
    candidates.iter().find_map(|candidate| {
        row.get(*candidate)
            .and_then(|v| v.as_deref())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    })
}

/// First present value, or `default`
pub fn text_or(row: &RawRow, candidates: &[&str], default: &str) -> String {
    first_present(row, candidates).unwrap_or(default).to_string()
}

/// First present value, or None
pub fn optional_text(row: &RawRow, candidates: &[&str]) -> Option<String> {
    first_present(row, candidates).map(str::to_string)
}

// ==========================================
// Coercion
// ==========================================

/// "yes"/"true" (any case) → true; anything else → false
pub fn coerce_bool(value: Option<&str>) -> bool {
    match value {
        Some(v) => matches!(v.trim().to_lowercase().as_str(), "yes" | "true"),
        None => false,
    }
}

/// DD/MM/YYYY first, then common ISO-like forms; None when unparseable
pub fn coerce_date(value: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = value.map(str::trim).filter(|v| !v.is_empty())?;
    parse_day_month_year(raw).or_else(|| parse_generic_date(raw))
}

/// Comma-split list with trimmed elements; None when absent
pub fn coerce_list(value: Option<&str>) -> Option<Vec<String>> {
    let raw = value.map(str::trim).filter(|v| !v.is_empty())?;
    let items: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect();
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

/// Parses the leading numeric prefix ("12 kW" → 12)
///
/// Absent or unparseable values become 0, unless `required`,
/// in which case the row is rejected
pub fn coerce_number(field: &str, value: Option<&str>, required: bool) -> ImportResult<f64> {
    let raw = value.map(str::trim).filter(|v| !v.is_empty());
    match (raw, raw.and_then(leading_number)) {
        (_, Some(number)) => Ok(number),
        (None, None) if required => Err(ImportError::missing(field)),
        (Some(raw), None) if required => Err(ImportError::TypeConversionError {
            field: field.to_string(),
            value: raw.to_string(),
        }),
        _ => Ok(0.0),
    }
}

// ==========================================
// Helpers
// ==========================================

fn parse_day_month_year(raw: &str) -> Option<DateTime<Utc>> {
    let parts: Vec<&str> = raw.split('/').collect();
    if parts.len() != 3 {
        return None;
    }
    let day: u32 = parts[0].trim().parse().ok()?;
    let month: u32 = parts[1].trim().parse().ok()?;
    let year: i32 = parts[2].trim().parse().ok()?;
    let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)?;
    Some(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
}

fn parse_generic_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc));
        }
    }
    for format in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Some(naive) = NaiveDate::parse_from_str(raw, format)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
        {
            return Some(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc));
        }
    }
    None
}

fn leading_number(raw: &str) -> Option<f64> {
    let candidate: String = raw
        .chars()
        .take_while(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
        .collect();
    // longest prefix that still parses ("1.5e" → 1.5)
    (1..=candidate.len())
        .rev()
        .find_map(|len| candidate[..len].parse::<f64>().ok())
        .filter(|n| n.is_finite())
}
