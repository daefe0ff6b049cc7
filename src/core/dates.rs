// src/core/dates.rs
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

use crate::config::consts::SHEET_DATE;

/// Parse the ISO-8601 shapes the ticketing system emits.
///
/// Accepts RFC 3339 (`2024-01-05T10:00:00Z`, `...+08:00`), the compact offset
/// form (`2024-01-05T10:00:00.000-0800`), naive timestamps and bare dates.
/// The calendar date is taken in the timestamp's own offset.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M:%S%z"] {
        if let Ok(dt) = DateTime::<FixedOffset>::parse_from_str(raw, fmt) {
            return Some(dt.date_naive());
        }
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// ISO timestamp → `MM-DD-YYYY`.
pub fn sheet_date(raw: &str) -> Option<String> {
    parse_iso_date(raw).map(|d| d.format(SHEET_DATE).to_string())
}
