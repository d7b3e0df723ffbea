//! Date/time text formats and sentinel handling.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

pub const DEFAULT_TIMESTAMP: &str = "1970-01-01 00:00:01";
pub const DEFAULT_TIMESTAMP_MICRO: &str = "1970-01-01 00:00:01.000000";
pub const DEFAULT_DATETIME: &str = "1000-01-01 00:00:00";
pub const DEFAULT_DATETIME_MICRO: &str = "1000-01-01 00:00:00.000000";

pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DATETIME_MICRO_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Length of the `YYYY-MM-DD` prefix kept by date-only columns.
pub const DATE_LEN: usize = 10;

/// Formats `YYYY-MM-DD HH:MM:SS`, with `.uuuuuu` when `micro` is set.
#[must_use]
pub fn format_datetime(value: &NaiveDateTime, micro: bool) -> String {
    let format = if micro {
        DATETIME_MICRO_FORMAT
    } else {
        DATETIME_FORMAT
    };
    value.format(format).to_string()
}

/// Formats `YYYY-MM-DD`.
#[must_use]
pub fn format_date(value: &NaiveDateTime) -> String {
    value.format(DATE_FORMAT).to_string()
}

/// Parses a date/time in one of the accepted textual forms:
/// `YYYY-MM-DD HH:MM:SS[.f]`, the same with a `T` separator, RFC 3339 with
/// an offset (normalized to UTC) or a bare `YYYY-MM-DD` (midnight).
pub fn parse(text: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    let text = text.trim();
    let attempts = [
        NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f"),
        NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f"),
        NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M"),
    ];
    let mut last_error = None;
    for attempt in attempts {
        match attempt {
            Ok(value) => return Ok(value),
            Err(e) => last_error = Some(e),
        }
    }
    if let Ok(value) = chrono::DateTime::parse_from_rfc3339(text) {
        return Ok(value.naive_utc());
    }
    match NaiveDate::parse_from_str(text, DATE_FORMAT) {
        Ok(date) => Ok(date.and_time(NaiveTime::MIN)),
        Err(e) => Err(last_error.unwrap_or(e)),
    }
}

/// Keeps only the date portion of a value.
#[must_use]
pub fn truncate_to_date(value: &NaiveDateTime) -> NaiveDateTime {
    value.date().and_time(NaiveTime::MIN)
}
