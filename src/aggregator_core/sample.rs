//! Sample normalization from raw source records to the unified `Sample` struct

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;

/// Naive layouts accepted for instants without an explicit offset (read as UTC)
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// One time-stamped pointing-error measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    /// Error magnitude (arcsec by convention); must be >= 0
    pub error: f64,
}

/// Raw JSONL shape before the timestamp is normalized
#[derive(Debug, Deserialize)]
struct RawSample {
    timestamp: String,
    error: f64,
}

impl Sample {
    pub fn new(timestamp: DateTime<Utc>, error: f64) -> Self {
        Self { timestamp, error }
    }

    /// Parse a Sample from a JSONL line
    pub fn from_jsonl(line: &str) -> Result<Self, Box<dyn Error>> {
        let raw: RawSample = serde_json::from_str(line)?;
        let timestamp = parse_instant(&raw.timestamp)?;
        Ok(Self::new(timestamp, raw.error))
    }

    /// Combine azimuth/elevation offsets into a single error magnitude
    pub fn from_offsets(timestamp: DateTime<Utc>, del_az: f64, del_el: f64) -> Self {
        Self::new(timestamp, del_az.hypot(del_el))
    }
}

/// Parse an ISO-8601 instant.
///
/// RFC 3339 strings keep their offset and are converted to UTC; naive
/// date-times (`2025-12-21T02:00:00`, `2025-12-21 02:00:00.5`) and bare dates
/// are interpreted as UTC.
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>, String> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    Err(format!(
        "unrecognized instant '{}' (expected ISO-8601, e.g. 2025-12-21T02:00:00)",
        s
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_naive_instant_as_utc() {
        let ts = parse_instant("2025-12-21T02:00:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 12, 21, 2, 0, 0).unwrap());

        let spaced = parse_instant("2025-12-21 02:00:00").unwrap();
        assert_eq!(spaced, ts);
    }

    #[test]
    fn test_parse_offset_instant_converts_to_utc() {
        let ts = parse_instant("2025-12-21T03:00:00+01:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 12, 21, 2, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_fractional_and_date_only() {
        let ts = parse_instant("2025-12-21T00:00:00.250").unwrap();
        assert_eq!(ts.timestamp_subsec_millis(), 250);

        let midnight = parse_instant("2025-12-21").unwrap();
        assert_eq!(midnight, Utc.with_ymd_and_hms(2025, 12, 21, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_garbage_instant() {
        assert!(parse_instant("yesterday").is_err());
        assert!(parse_instant("").is_err());
    }

    #[test]
    fn test_parse_sample_jsonl() {
        let line = r#"{"timestamp":"2025-12-21T00:10:00Z","error":0.5}"#;

        let sample = Sample::from_jsonl(line).unwrap();
        assert_eq!(sample.timestamp, Utc.with_ymd_and_hms(2025, 12, 21, 0, 10, 0).unwrap());
        assert_eq!(sample.error, 0.5);
    }

    #[test]
    fn test_malformed_jsonl() {
        assert!(Sample::from_jsonl(r#"{"timestamp": "2025-12-21T00:10:00Z""#).is_err());
        assert!(Sample::from_jsonl(r#"{"timestamp": "soon", "error": 1.0}"#).is_err());
    }

    #[test]
    fn test_offsets_combine_to_magnitude() {
        let ts = Utc.with_ymd_and_hms(2025, 12, 21, 0, 0, 0).unwrap();
        let sample = Sample::from_offsets(ts, 3.0, -4.0);
        assert_eq!(sample.error, 5.0);
    }
}
