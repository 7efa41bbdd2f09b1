//! `asciitime` parsing and formatting.
//!
//! Instants are plain `f64` day counts since 1970-01-01 00:00:00 (naive,
//! no time zone); the fractional part is the time of day. Overlay mode makes
//! them relative day counts instead, which format as elapsed time.

use chrono::{DateTime, NaiveDateTime};
use thiserror::Error;

/// `"Mon Jan 02 03:04:05 2012"`
pub const ASCIITIME_FORMAT: &str = "%a %b %d %H:%M:%S %Y";

pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Parse one `asciitime` string into a day count. A weekday that does not
/// match the date is rejected.
pub fn parse_timestamp(text: &str) -> Option<f64> {
    NaiveDateTime::parse_from_str(text.trim(), ASCIITIME_FORMAT)
        .ok()
        .map(to_days)
}

/// First entry of a column that is not an `asciitime` string.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("entry {index}: malformed timestamp '{value}'")]
pub struct BadTimestamp {
    /// Zero-based position in the column.
    pub index: usize,
    pub value: String,
}

/// Parse a whole column, stopping at the first bad entry.
pub fn parse_timestamps<I, S>(column: I) -> Result<Vec<f64>, BadTimestamp>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    column
        .into_iter()
        .enumerate()
        .map(|(index, text)| {
            let text = text.as_ref();
            parse_timestamp(text).ok_or_else(|| BadTimestamp {
                index,
                value: text.to_string(),
            })
        })
        .collect()
}

pub fn to_days(dt: NaiveDateTime) -> f64 {
    let utc = dt.and_utc();
    (utc.timestamp() as f64 + f64::from(utc.timestamp_subsec_nanos()) * 1e-9) / SECONDS_PER_DAY
}

pub fn from_days(days: f64) -> Option<NaiveDateTime> {
    if !days.is_finite() {
        return None;
    }
    let millis = (days * SECONDS_PER_DAY * 1000.0).round() as i64;
    DateTime::from_timestamp_millis(millis).map(|dt| dt.naive_utc())
}

/// Absolute instant as `YYYY-mm-dd HH:MM:SS`.
pub fn format_instant(days: f64) -> String {
    from_days(days)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

/// Relative day count as `[-]H:MM:SS`; hours are not wrapped at 24.
pub fn format_elapsed(days: f64) -> String {
    if !days.is_finite() {
        return String::new();
    }
    let total = (days * SECONDS_PER_DAY).round() as i64;
    let sign = if total < 0 { "-" } else { "" };
    let total = total.abs();
    format!(
        "{sign}{}:{:02}:{:02}",
        total / 3600,
        (total / 60) % 60,
        total % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_known_instant() {
        // 2012-01-02 is 15341 days after the epoch.
        let days = parse_timestamp("Mon Jan 02 03:04:05 2012").unwrap();
        let expected = 15341.0 + (3.0 * 3600.0 + 4.0 * 60.0 + 5.0) / SECONDS_PER_DAY;
        assert_relative_eq!(days, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        assert!(parse_timestamp("  Mon Jan 02 03:04:05 2012 ").is_some());
    }

    #[test]
    fn test_rejects_malformed_text() {
        assert!(parse_timestamp("2012-01-02 03:04:05").is_none());
        assert!(parse_timestamp("Mon Jan 02 2012").is_none());
        assert!(parse_timestamp("").is_none());
        // 2012-01-02 was a Monday.
        assert!(parse_timestamp("Fri Jan 02 03:04:05 2012").is_none());
    }

    #[test]
    fn test_parse_column_reports_first_failure() {
        let column = ["Mon Jan 02 03:04:05 2012", "garbage", "also bad"];
        assert_eq!(
            parse_timestamps(column),
            Err(BadTimestamp {
                index: 1,
                value: "garbage".to_string(),
            })
        );
        let ok = parse_timestamps(["Mon Jan 02 03:04:05 2012", "Mon Jan 02 03:04:06 2012"]).unwrap();
        assert_relative_eq!((ok[1] - ok[0]) * SECONDS_PER_DAY, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_formatting() {
        let days = parse_timestamp("Mon Jan 02 03:04:05 2012").unwrap();
        assert_eq!(format_instant(days), "2012-01-02 03:04:05");
        assert_eq!(format_elapsed(90.0 / SECONDS_PER_DAY), "0:01:30");
        assert_eq!(format_elapsed(-(3725.0 / SECONDS_PER_DAY)), "-1:02:05");
        assert_eq!(format_elapsed(f64::NAN), "");
    }
}
