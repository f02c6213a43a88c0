//! Timestamp handling shared by the store and the HTTP layer.
//!
//! Rows keep timestamps as `YYYY-MM-DD HH:MM:SS` in server-local time so that
//! SQLite's `DATE()` lines up with the local calendar used for "today".
//! Responses carry them as RFC3339.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Timelike};
use thiserror::Error;

pub const DB_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    #[error("unrecognised timestamp {0:?}")]
    Unparseable(String),

    #[error("timestamp {0:?} does not exist in the local timezone")]
    Nonexistent(String),
}

/// Current local time truncated to whole seconds, matching what gets stored.
pub fn now() -> DateTime<Local> {
    let now = Local::now();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Server-local calendar date formatted for comparison with `DATE(column)`.
pub fn today() -> String {
    Local::now().date_naive().format(DATE_FORMAT).to_string()
}

pub fn format_db(ts: &DateTime<Local>) -> String {
    ts.format(DB_FORMAT).to_string()
}

pub fn rfc3339_now() -> String {
    Local::now().to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Parse a stored or submitted timestamp.
///
/// Tries `YYYY-MM-DD HH:MM:SS`, RFC3339 (fractional seconds allowed) and a
/// bare `YYYY-MM-DD` in that order. Anything else is an error rather than a
/// zero value.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Local>, TimestampError> {
    let trimmed = value.trim();

    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, DB_FORMAT) {
        return from_local(naive, value);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Local));
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| TimestampError::Unparseable(value.to_string()))?;
        return from_local(midnight, value);
    }

    Err(TimestampError::Unparseable(value.to_string()))
}

/// Nullable column variant: `NULL` and empty strings are absent.
pub fn parse_optional(value: Option<String>) -> Result<Option<DateTime<Local>>, TimestampError> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| parse_timestamp(&v))
        .transpose()
}

/// Local wall-clock time on `date`, used to lay out shift windows.
pub fn local_at(date: NaiveDate, hour: u32, minute: u32) -> Result<DateTime<Local>, TimestampError> {
    let raw = format!("{date} {hour:02}:{minute:02}");
    let naive = date
        .and_hms_opt(hour, minute, 0)
        .ok_or_else(|| TimestampError::Unparseable(raw.clone()))?;
    from_local(naive, &raw)
}

fn from_local(naive: NaiveDateTime, raw: &str) -> Result<DateTime<Local>, TimestampError> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| TimestampError::Nonexistent(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Utc};

    #[test]
    fn parses_database_format_as_local_time() {
        let ts = parse_timestamp("2025-03-10 09:30:15").expect("db format");
        assert_eq!(format_db(&ts), "2025-03-10 09:30:15");
    }

    #[test]
    fn parses_rfc3339_with_and_without_fraction() {
        let plain = parse_timestamp("2025-03-10T09:30:15Z").expect("rfc3339");
        let nano = parse_timestamp("2025-03-10T09:30:15.123456789Z").expect("rfc3339 nano");
        assert_eq!(plain.with_timezone(&Utc).hour(), 9);
        assert_eq!(nano.with_timezone(&Utc).minute(), 30);
    }

    #[test]
    fn date_only_means_local_midnight() {
        let ts = parse_timestamp("2025-03-10").expect("date only");
        assert_eq!(ts.day(), 10);
        assert_eq!(ts.hour(), 0);
    }

    #[test]
    fn garbage_is_an_error_not_epoch() {
        let err = parse_timestamp("yesterday-ish").unwrap_err();
        assert_eq!(err, TimestampError::Unparseable("yesterday-ish".to_string()));
    }

    #[test]
    fn optional_treats_empty_as_absent() {
        assert_eq!(parse_optional(None).unwrap(), None);
        assert_eq!(parse_optional(Some("  ".to_string())).unwrap(), None);
        assert!(parse_optional(Some("2025-01-01 00:00:00".to_string())).unwrap().is_some());
        assert!(parse_optional(Some("bogus".to_string())).is_err());
    }

    #[test]
    fn now_has_no_subsecond_part() {
        assert_eq!(now().nanosecond(), 0);
    }
}
