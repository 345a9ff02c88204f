//! Timestamp utilities
//!
//! Show start times are persisted as unix seconds (UTC). Rendering uses two
//! fixed English presets.

use chrono::{DateTime, TimeZone, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Convert stored unix seconds back to a UTC timestamp
///
/// Out-of-range values clamp to the unix epoch rather than failing the read.
pub fn from_unix_seconds(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .unwrap_or(DateTime::UNIX_EPOCH)
}

/// Display presets for show start times
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFormat {
    /// `Tue 05, 21, 2019 9:30PM`
    #[default]
    Medium,
    /// `Tuesday May, 21, 2019 at 9:30PM`
    Full,
}

impl DateFormat {
    fn pattern(self) -> &'static str {
        match self {
            DateFormat::Medium => "%a %m, %d, %Y %-I:%M%p",
            DateFormat::Full => "%A %B, %-d, %Y at %-I:%M%p",
        }
    }
}

/// Format a timestamp for display
pub fn format_datetime(value: DateTime<Utc>, format: DateFormat) -> String {
    value.format(format.pattern()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2019, 5, 21, 21, 30, 0).unwrap()
    }

    #[test]
    fn test_now_returns_recent_timestamp() {
        let timestamp = now();
        // Between 2000-01-01 and 2100-01-01
        assert!(timestamp.timestamp() > 946_684_800);
        assert!(timestamp.timestamp() < 4_102_444_800);
    }

    #[test]
    fn test_unix_seconds_round_trip() {
        let ts = sample();
        assert_eq!(from_unix_seconds(ts.timestamp()), ts);
    }

    #[test]
    fn test_unix_seconds_out_of_range_clamps() {
        assert_eq!(from_unix_seconds(i64::MAX), DateTime::UNIX_EPOCH);
    }

    #[test]
    fn test_format_medium() {
        assert_eq!(
            format_datetime(sample(), DateFormat::Medium),
            "Tue 05, 21, 2019 9:30PM"
        );
    }

    #[test]
    fn test_format_full() {
        assert_eq!(
            format_datetime(sample(), DateFormat::Full),
            "Tuesday May, 21, 2019 at 9:30PM"
        );
    }

    #[test]
    fn test_format_morning_single_digit_day() {
        let ts = Utc.with_ymd_and_hms(2035, 4, 1, 9, 5, 0).unwrap();
        assert_eq!(
            format_datetime(ts, DateFormat::Full),
            "Sunday April, 1, 2035 at 9:05AM"
        );
    }
}
