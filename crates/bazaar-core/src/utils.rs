use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Naive formats accepted for `updated_at`, interpreted as UTC
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
];

/// Parse a timestamp-like string into milliseconds since the Unix epoch.
///
/// Accepts RFC 3339, a handful of naive date-time layouts and bare dates.
/// Returns `None` when nothing matches.
pub(crate) fn parse_timestamp_millis(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis());
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Timestamp of a plugin's `updated_at`, epoch zero when missing or unparseable
pub(crate) fn updated_millis_or_epoch(updated_at: Option<&str>) -> i64 {
    updated_at.and_then(parse_timestamp_millis).unwrap_or(0)
}
