//! Monotonic record timestamps.
//!
//! Timestamps are kept at microsecond precision. That is the precision written to the
//! database, so a value returned from a mutation compares equal to the same value read back.

use crate::{UuidError, UuidResult};
use chrono::{DateTime, Duration, SecondsFormat, SubsecRound, Utc};

/// Returns the current time, strictly later than `previous` when one is given.
///
/// If the clock has not advanced past `previous` (same microsecond, or a clock step
/// backwards) the result is `previous + 1µs`.
pub fn next_timestamp(previous: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now().trunc_subsecs(6);

    match previous {
        Some(prev) if now <= prev => prev + Duration::microseconds(1),
        _ => now,
    }
}

/// Formats a timestamp as RFC 3339 UTC with six fractional digits.
///
/// Fixed width means lexical order of the stored text equals chronological order.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parses a timestamp written by [`format_timestamp`] (any RFC 3339 value is accepted).
///
/// # Errors
///
/// Returns [`UuidError::InvalidInput`] if `input` is not RFC 3339.
pub fn parse_timestamp(input: &str) -> UuidResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(input)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| UuidError::InvalidInput(format!("invalid timestamp '{}': {}", input, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_timestamp_without_previous_is_now() {
        let before = Utc::now().trunc_subsecs(6);
        let ts = next_timestamp(None);
        assert!(ts >= before);
    }

    #[test]
    fn test_next_timestamp_is_strictly_later_same_instant() {
        let first = next_timestamp(None);
        // No sleep - force the increment path
        let second = next_timestamp(Some(first));
        assert!(second > first);
    }

    #[test]
    fn test_next_timestamp_after_future_previous() {
        let future = Utc::now().trunc_subsecs(6) + Duration::seconds(60);
        let ts = next_timestamp(Some(future));
        assert_eq!(ts, future + Duration::microseconds(1));
    }

    #[test]
    fn test_format_has_fixed_width_micros() {
        let ts = parse_timestamp("2024-01-15T08:30:00Z").unwrap();
        assert_eq!(format_timestamp(&ts), "2024-01-15T08:30:00.000000Z");
    }

    #[test]
    fn test_format_parse_round_trip() {
        let ts = next_timestamp(None);
        let parsed = parse_timestamp(&format_timestamp(&ts)).unwrap();
        assert_eq!(parsed, ts);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_err());
    }
}
