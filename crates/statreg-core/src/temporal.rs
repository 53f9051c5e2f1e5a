//! # Temporal Types — UTC-Only Timestamps
//!
//! Defines `Timestamp`, a UTC-only timestamp type truncated to seconds
//! precision. Register records store absolute instants, never the
//! date strings that arrive on the wire.
//!
//! Statutory filings are dated by day: an allotment date arrives as
//! `2025-01-01` and must resolve to exactly UTC midnight of that day, so
//! the same input always produces the same stored instant regardless of
//! the server's locale.

use chrono::{DateTime, NaiveDate, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A UTC-only timestamp, truncated to seconds precision.
///
/// # Construction
///
/// - [`Timestamp::now()`] — current UTC time, truncated.
/// - [`Timestamp::from_utc()`] — from a `DateTime<Utc>`, truncating sub-seconds.
/// - [`Timestamp::parse()`] — from an RFC 3339 string or a bare
///   `YYYY-MM-DD` date (resolved to UTC midnight).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from the current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse a timestamp from its wire representation.
    ///
    /// Two forms are accepted:
    ///
    /// - A bare date `YYYY-MM-DD`, which resolves to UTC midnight of that
    ///   day. This is the form statutory filings use.
    /// - A full RFC 3339 instant. Any timezone offset is converted to UTC;
    ///   sub-seconds are truncated.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the offending input when the
    /// string parses as neither form.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let s = s.trim();

        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            let midnight = date
                .and_hms_opt(0, 0, 0)
                .ok_or_else(|| ValidationError::InvalidDate(s.to_string()))?;
            return Ok(Self(Utc.from_utc_datetime(&midnight)));
        }

        let dt = DateTime::parse_from_rfc3339(s)
            .map_err(|_| ValidationError::InvalidDate(s.to_string()))?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Returns the Unix epoch timestamp in seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Create a timestamp from a Unix epoch timestamp (seconds).
    pub fn from_epoch_secs(secs: i64) -> Result<Self, ValidationError> {
        let dt = DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| ValidationError::InvalidDate(format!("epoch {secs}")))?;
        Ok(Self(dt))
    }

    /// Render as ISO 8601 with Z suffix (e.g., `2025-01-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }

    /// The `YYYY-MM` calendar month this instant falls in, used by the
    /// activity statistics grouping.
    pub fn month_key(&self) -> String {
        self.0.format("%Y-%m").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

/// Truncate a `DateTime<Utc>` to seconds precision (discard nanoseconds).
fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_now_has_no_subseconds() {
        let ts = Timestamp::now();
        assert_eq!(ts.as_datetime().nanosecond(), 0);
    }

    #[test]
    fn test_bare_date_resolves_to_utc_midnight() {
        let ts = Timestamp::parse("2025-01-01").unwrap();
        assert_eq!(ts.to_iso8601(), "2025-01-01T00:00:00Z");
    }

    #[test]
    fn test_bare_date_is_trimmed() {
        let ts = Timestamp::parse("  2025-06-30 ").unwrap();
        assert_eq!(ts.to_iso8601(), "2025-06-30T00:00:00Z");
    }

    #[test]
    fn test_rfc3339_offset_converted_to_utc() {
        let ts = Timestamp::parse("2025-01-15T17:00:00+05:00").unwrap();
        assert_eq!(ts.to_iso8601(), "2025-01-15T12:00:00Z");
    }

    #[test]
    fn test_rfc3339_subseconds_truncated() {
        let ts = Timestamp::parse("2025-01-15T12:00:00.123456Z").unwrap();
        assert_eq!(ts.as_datetime().nanosecond(), 0);
        assert_eq!(ts.to_iso8601(), "2025-01-15T12:00:00Z");
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        assert!(Timestamp::parse("not-a-date").is_err());
        assert!(Timestamp::parse("2025-13-40").is_err());
        assert!(Timestamp::parse("").is_err());
    }

    #[test]
    fn test_from_utc_truncates() {
        let dt = Utc.with_ymd_and_hms(2025, 1, 15, 12, 30, 45).unwrap();
        let with_nanos = dt.with_nanosecond(123_456_789).unwrap();
        let ts = Timestamp::from_utc(with_nanos);
        assert_eq!(ts.to_iso8601(), "2025-01-15T12:30:45Z");
    }

    #[test]
    fn test_epoch_roundtrip() {
        let ts = Timestamp::parse("2025-01-15T12:00:00Z").unwrap();
        let back = Timestamp::from_epoch_secs(ts.epoch_secs()).unwrap();
        assert_eq!(ts, back);
    }

    #[test]
    fn test_ordering() {
        let earlier = Timestamp::parse("2025-01-15").unwrap();
        let later = Timestamp::parse("2025-01-16").unwrap();
        assert!(earlier < later);
    }

    #[test]
    fn test_month_key() {
        let ts = Timestamp::parse("2025-03-09T08:15:00Z").unwrap();
        assert_eq!(ts.month_key(), "2025-03");
    }

    #[test]
    fn test_serde_roundtrip() {
        let ts = Timestamp::parse("2025-01-15T12:00:00Z").unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        let parsed: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(ts, parsed);
    }

    #[test]
    fn test_display_matches_iso8601() {
        let ts = Timestamp::parse("2025-06-30").unwrap();
        assert_eq!(format!("{ts}"), ts.to_iso8601());
    }
}
