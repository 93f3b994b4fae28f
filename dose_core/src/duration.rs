//! Duration and time-of-day parsing.
//!
//! Rule files express gaps as `<integer><unit>` where the unit is one of
//! `h`, `m` or `d`. A bare integer means hours.

use crate::{Error, Result};
use chrono::{Duration, NaiveTime};

/// Parse a rule-file duration such as `"2h"`, `"30m"`, `"1d"` or `"5"`
///
/// Empty input means "no minimum gap" and returns `Ok(None)`, not a zero
/// duration. Anything else that is not an integer with an optional unit
/// suffix is an error.
pub fn parse_duration(input: &str) -> Result<Option<Duration>> {
    let s = input.trim().to_lowercase();
    if s.is_empty() {
        return Ok(None);
    }

    let (magnitude, unit) = match s.char_indices().last() {
        Some((idx, c @ ('h' | 'm' | 'd'))) => (&s[..idx], c),
        _ => (s.as_str(), 'h'),
    };

    let value: i64 = magnitude.trim().parse().map_err(|e| Error::InvalidDuration {
        input: input.to_string(),
        reason: format!("{}", e),
    })?;

    let duration = match unit {
        'm' => Duration::try_minutes(value),
        'd' => Duration::try_days(value),
        _ => Duration::try_hours(value),
    };

    duration.map(Some).ok_or_else(|| Error::InvalidDuration {
        input: input.to_string(),
        reason: "value out of range".to_string(),
    })
}

/// Format a duration back into the rule-file grammar, picking the largest
/// unit that divides it exactly
pub fn format_duration(duration: Duration) -> String {
    let minutes = duration.num_minutes();
    if minutes != 0 && minutes % (24 * 60) == 0 {
        format!("{}d", minutes / (24 * 60))
    } else if minutes % 60 == 0 {
        format!("{}h", minutes / 60)
    } else {
        format!("{}m", minutes)
    }
}

/// Parse an `HH:MM` time of day
pub fn parse_time(input: &str) -> Result<NaiveTime> {
    let (hour, minute) = input
        .trim()
        .split_once(':')
        .ok_or_else(|| Error::InvalidTime(input.to_string()))?;

    let hour: u32 = hour
        .trim()
        .parse()
        .map_err(|_| Error::InvalidTime(input.to_string()))?;
    let minute: u32 = minute
        .trim()
        .parse()
        .map_err(|_| Error::InvalidTime(input.to_string()))?;

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| Error::InvalidTime(input.to_string()))
}

/// Format a duration as `HH:MM`
pub fn format_hhmm(duration: Duration) -> String {
    let minutes = duration.num_minutes();
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Time elapsed between a scheduled dose and the current time
///
/// Both are wall-clock times without a date. When `current` is earlier than
/// `scheduled` the current time is taken to be on the following day, so the
/// result always lies in `[0, 24h)`.
pub fn elapsed_since(scheduled: NaiveTime, current: NaiveTime) -> Duration {
    let elapsed = current.signed_duration_since(scheduled);
    if elapsed < Duration::zero() {
        elapsed + Duration::days(1)
    } else {
        elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_parse_duration_units() {
        assert_eq!(parse_duration("2h").unwrap(), Some(Duration::hours(2)));
        assert_eq!(parse_duration("30m").unwrap(), Some(Duration::minutes(30)));
        assert_eq!(parse_duration("1d").unwrap(), Some(Duration::days(1)));
    }

    #[test]
    fn test_parse_duration_defaults_to_hours() {
        assert_eq!(parse_duration("5").unwrap(), Some(Duration::hours(5)));
    }

    #[test]
    fn test_parse_duration_empty_is_no_gap() {
        assert_eq!(parse_duration("").unwrap(), None);
        assert_eq!(parse_duration("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_duration_case_and_whitespace() {
        assert_eq!(parse_duration(" 4H ").unwrap(), Some(Duration::hours(4)));
    }

    #[test]
    fn test_parse_duration_rejects_bad_input() {
        for bad in ["2x", "h", "2.5h", "two hours", "3 weeks", "12s"] {
            match parse_duration(bad) {
                Err(Error::InvalidDuration { input, .. }) => assert_eq!(input, bad),
                other => panic!("Expected InvalidDuration for {:?}, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_parse_duration_overflow_is_error() {
        assert!(parse_duration("9223372036854775807d").is_err());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::hours(24)), "1d");
        assert_eq!(format_duration(Duration::hours(8)), "8h");
        assert_eq!(format_duration(Duration::minutes(90)), "90m");
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("08:00").unwrap(), t(8, 0));
        assert_eq!(parse_time("7:5").unwrap(), t(7, 5));
        assert!(parse_time("25:00").is_err());
        assert!(parse_time("08:00 AM").is_err());
        assert!(parse_time("0800").is_err());
    }

    #[test]
    fn test_format_hhmm() {
        assert_eq!(format_hhmm(Duration::minutes(210)), "03:30");
        assert_eq!(format_hhmm(Duration::zero()), "00:00");
    }

    #[test]
    fn test_elapsed_same_day() {
        assert_eq!(elapsed_since(t(6, 0), t(8, 0)), Duration::hours(2));
        assert_eq!(elapsed_since(t(8, 0), t(8, 0)), Duration::zero());
    }

    #[test]
    fn test_elapsed_across_midnight() {
        assert_eq!(elapsed_since(t(23, 0), t(1, 0)), Duration::hours(2));
    }
}
