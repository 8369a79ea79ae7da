//! CSV boundary: typed rows, table loading and roster output writing.

pub mod loader;
pub mod tables;
pub mod writer;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Parse a UTC timestamp in the formats the upstream tables carry.
///
/// Accepts `2025-10-01 08:00:00`, `2025-10-01T08:00:00` and RFC 3339.
pub fn parse_utc_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }

    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|stamp| stamp.with_timezone(&Utc))
}

/// Parse a calendar date (`2025-10-01`); a full timestamp is reduced
/// to its date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }

    parse_utc_timestamp(raw).map(|stamp| stamp.date_naive())
}
