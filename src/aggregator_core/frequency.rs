//! Bucket duration ("frequency") parsing and formatting

use crate::error::PointingError;
use chrono::TimeDelta;
use serde::{Serialize, Serializer};
use std::str::FromStr;

const NS_PER_US: i64 = 1_000;
const NS_PER_MS: i64 = 1_000_000;
const NS_PER_SEC: i64 = 1_000_000_000;
const NS_PER_MIN: i64 = 60 * NS_PER_SEC;
const NS_PER_HOUR: i64 = 60 * NS_PER_MIN;
const NS_PER_DAY: i64 = 24 * NS_PER_HOUR;

/// Largest unit first; used for canonical formatting
const DISPLAY_UNITS: [(i64, &str); 7] = [
    (NS_PER_DAY, "d"),
    (NS_PER_HOUR, "h"),
    (NS_PER_MIN, "min"),
    (NS_PER_SEC, "s"),
    (NS_PER_MS, "ms"),
    (NS_PER_US, "us"),
    (1, "ns"),
];

/// Months and years have no fixed length
const CALENDAR_UNITS: [&str; 6] = ["M", "month", "months", "y", "year", "years"];

/// Offset aliases (`5T`, `2H`) mapped onto humantime unit names
fn unit_alias(unit: &str) -> &str {
    match unit {
        "T" => "min",
        "H" => "h",
        "D" => "d",
        "W" => "w",
        other => other,
    }
}

fn normalize_units(body: &str) -> Result<String, String> {
    let mut out = String::with_capacity(body.len() + 4);
    let mut unit = String::new();
    for c in body.chars() {
        if c.is_ascii_alphabetic() {
            unit.push(c);
            continue;
        }
        flush_unit(&mut unit, &mut out)?;
        out.push(c);
    }
    flush_unit(&mut unit, &mut out)?;
    Ok(out)
}

fn flush_unit(unit: &mut String, out: &mut String) -> Result<(), String> {
    if unit.is_empty() {
        return Ok(());
    }
    if CALENDAR_UNITS.contains(&unit.as_str()) {
        return Err(format!("calendar unit '{}' has no fixed length", unit));
    }
    out.push_str(unit_alias(unit));
    unit.clear();
    Ok(())
}

/// Strictly positive bucket width, a whole number of milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Frequency {
    nanos: i64,
}

impl Frequency {
    pub fn from_delta(delta: TimeDelta) -> Result<Self, PointingError> {
        let nanos = delta.num_nanoseconds().ok_or_else(|| {
            PointingError::InvalidFrequency(format!("{}s is too large", delta.num_seconds()))
        })?;
        Self::from_nanos(nanos)
    }

    pub fn from_secs(secs: i64) -> Result<Self, PointingError> {
        let nanos = secs
            .checked_mul(NS_PER_SEC)
            .ok_or_else(|| PointingError::InvalidFrequency(format!("{}s is too large", secs)))?;
        Self::from_nanos(nanos)
    }

    pub fn from_minutes(minutes: i64) -> Result<Self, PointingError> {
        let nanos = minutes.checked_mul(NS_PER_MIN).ok_or_else(|| {
            PointingError::InvalidFrequency(format!("{}min is too large", minutes))
        })?;
        Self::from_nanos(nanos)
    }

    fn from_nanos(nanos: i64) -> Result<Self, PointingError> {
        if nanos <= 0 {
            return Err(PointingError::InvalidFrequency(format!(
                "bucket duration must be positive, got {}",
                format_nanos(nanos)
            )));
        }
        if nanos % NS_PER_MS != 0 {
            return Err(PointingError::InvalidFrequency(format!(
                "bucket duration must be a whole number of milliseconds, got {}",
                format_nanos(nanos)
            )));
        }
        Ok(Self { nanos })
    }

    pub fn as_delta(&self) -> TimeDelta {
        TimeDelta::nanoseconds(self.nanos)
    }

    pub fn num_nanoseconds(&self) -> i64 {
        self.nanos
    }

    /// Parse strings such as `30min`, `1h30min`, `90s`, `15m`, `5T` or `-5min`.
    ///
    /// Unit arithmetic is delegated to `humantime`. Negative and zero
    /// durations parse but are rejected as non-positive.
    pub fn parse(s: &str) -> Result<Self, PointingError> {
        let input = s.trim();
        let invalid = |why: &str| PointingError::InvalidFrequency(format!("'{}': {}", s, why));

        let (negative, body) = match input.strip_prefix('-') {
            Some(r) => (true, r.trim_start()),
            None => (false, input),
        };

        if body.is_empty() {
            return Err(invalid("empty duration"));
        }

        let normalized = normalize_units(body).map_err(|e| invalid(&e))?;
        let duration = humantime::parse_duration(&normalized).map_err(|e| invalid(&e.to_string()))?;
        let delta = TimeDelta::from_std(duration).map_err(|_| invalid("duration too large"))?;

        Self::from_delta(if negative { -delta } else { delta })
    }
}

fn format_nanos(nanos: i64) -> String {
    if nanos == 0 {
        return "0s".to_string();
    }

    let mut out = String::new();
    if nanos < 0 {
        out.push('-');
    }
    let mut remaining = nanos.unsigned_abs();
    for (scale, suffix) in DISPLAY_UNITS {
        let scale = scale as u64;
        let count = remaining / scale;
        if count > 0 {
            out.push_str(&format!("{}{}", count, suffix));
            remaining %= scale;
        }
    }
    out
}

impl FromStr for Frequency {
    type Err = PointingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format_nanos(self.nanos))
    }
}

impl Serialize for Frequency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_common_forms() {
        assert_eq!(Frequency::parse("30min").unwrap().as_delta(), TimeDelta::minutes(30));
        assert_eq!(Frequency::parse("15m").unwrap().as_delta(), TimeDelta::minutes(15));
        assert_eq!(Frequency::parse("1h").unwrap().as_delta(), TimeDelta::hours(1));
        assert_eq!(Frequency::parse("90s").unwrap().as_delta(), TimeDelta::seconds(90));
        assert_eq!(Frequency::parse("250ms").unwrap().as_delta(), TimeDelta::milliseconds(250));
        assert_eq!(Frequency::parse("5T").unwrap().as_delta(), TimeDelta::minutes(5));
    }

    #[test]
    fn test_parse_compound() {
        let freq = Frequency::parse("1h30min").unwrap();
        assert_eq!(freq.as_delta(), TimeDelta::minutes(90));

        let spaced = Frequency::parse(" 1h 30min ").unwrap();
        assert_eq!(spaced, freq);
    }

    #[test]
    fn test_rejects_non_positive() {
        assert!(matches!(Frequency::parse("0min"), Err(PointingError::InvalidFrequency(_))));
        assert!(matches!(Frequency::parse("-5min"), Err(PointingError::InvalidFrequency(_))));
        assert!(matches!(Frequency::from_secs(0), Err(PointingError::InvalidFrequency(_))));
        assert!(Frequency::from_delta(TimeDelta::seconds(-1)).is_err());
    }

    #[test]
    fn test_rejects_unparseable() {
        for bad in ["", "min", "30", "30 parsecs", "1.5h", "30M", "--5min"] {
            assert!(
                matches!(Frequency::parse(bad), Err(PointingError::InvalidFrequency(_))),
                "expected '{}' to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_rejects_sub_millisecond() {
        for bad in ["250us", "1s500us", "999999ns"] {
            assert!(
                matches!(Frequency::parse(bad), Err(PointingError::InvalidFrequency(_))),
                "expected '{}' to be rejected",
                bad
            );
        }
        assert!(Frequency::from_delta(TimeDelta::microseconds(250)).is_err());
        assert!(Frequency::from_delta(TimeDelta::microseconds(1500)).is_err());

        // Sub-millisecond units are fine when they add up to whole milliseconds
        assert_eq!(Frequency::parse("1000us").unwrap().as_delta(), TimeDelta::milliseconds(1));
    }

    #[test]
    fn test_offset_aliases() {
        assert_eq!(Frequency::parse("2H").unwrap().as_delta(), TimeDelta::hours(2));
        assert_eq!(Frequency::parse("1D").unwrap().as_delta(), TimeDelta::days(1));
        assert_eq!(Frequency::parse("1W").unwrap().as_delta(), TimeDelta::weeks(1));
        assert_eq!(Frequency::parse("1h15T").unwrap().as_delta(), TimeDelta::minutes(75));
        assert!(Frequency::parse("2months").is_err());
        assert!(Frequency::parse("1y").is_err());
    }

    #[test]
    fn test_canonical_display() {
        assert_eq!(Frequency::parse("30min").unwrap().to_string(), "30min");
        assert_eq!(Frequency::parse("90min").unwrap().to_string(), "1h30min");
        assert_eq!(Frequency::parse("1500ms").unwrap().to_string(), "1s500ms");
        assert_eq!(Frequency::parse("2d").unwrap().to_string(), "2d");
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let freq = Frequency::parse("1d2h3min4s").unwrap();
        assert_eq!(Frequency::parse(&freq.to_string()).unwrap(), freq);
    }
}
