//! Partition of a time range into contiguous frequency-sized buckets

use super::frequency::Frequency;
use super::range::TimeRange;
use crate::error::PointingError;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Ceiling on planned buckets; a finer plan is rejected as an invalid frequency
pub const DEFAULT_MAX_BUCKETS: usize = 1_000_000;

/// Half-open interval `[lower, upper)` identified by its position in the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub index: usize,
    pub lower: DateTime<Utc>,
    pub upper: DateTime<Utc>,
}

impl Bucket {
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.lower <= ts && ts < self.upper
    }
}

/// Ordered, contiguous buckets covering exactly one `TimeRange`.
///
/// `buckets[i].upper == buckets[i + 1].lower`; the last bucket ends at
/// `range.end()` and may be shorter than the frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketPlan {
    range: TimeRange,
    frequency: Frequency,
    buckets: Vec<Bucket>,
}

impl BucketPlan {
    pub fn range(&self) -> TimeRange {
        self.range
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Index of the bucket holding `ts`, or `None` when `ts` is outside the range.
    ///
    /// A timestamp equal to a bucket's upper bound belongs to the next bucket.
    pub fn assign(&self, ts: DateTime<Utc>) -> Option<usize> {
        if !self.range.contains(ts) {
            return None;
        }
        // First bucket whose lower bound is past ts; the one before it holds ts
        let after = self.buckets.partition_point(|b| b.lower <= ts);
        after.checked_sub(1)
    }
}

#[derive(Debug, Clone)]
pub struct FrequencyBinner {
    max_buckets: usize,
}

impl Default for FrequencyBinner {
    fn default() -> Self {
        Self::new()
    }
}

impl FrequencyBinner {
    pub fn new() -> Self {
        Self {
            max_buckets: DEFAULT_MAX_BUCKETS,
        }
    }

    pub fn with_max_buckets(max_buckets: usize) -> Self {
        Self { max_buckets }
    }

    pub fn max_buckets(&self) -> usize {
        self.max_buckets
    }

    /// Build `ceil(duration / frequency)` buckets over `range`.
    pub fn plan(&self, range: TimeRange, frequency: Frequency) -> Result<BucketPlan, PointingError> {
        let expected = expected_bucket_count(range, frequency);
        if expected > self.max_buckets as u128 {
            return Err(PointingError::InvalidFrequency(format!(
                "{} is too fine for range {}: {} buckets exceeds limit of {}",
                frequency, range, expected, self.max_buckets
            )));
        }

        let step = frequency.as_delta();
        let end = range.end();
        let mut buckets = Vec::with_capacity(expected as usize);
        let mut lower = range.start();

        while lower < end {
            let upper = match lower.checked_add_signed(step) {
                Some(next) if next < end => next,
                _ => end,
            };
            buckets.push(Bucket {
                index: buckets.len(),
                lower,
                upper,
            });
            lower = upper;
        }

        log::debug!(
            "Planned {} buckets of {} over {}",
            buckets.len(),
            frequency,
            range
        );

        Ok(BucketPlan {
            range,
            frequency,
            buckets,
        })
    }
}

fn span_nanos(range: TimeRange) -> u128 {
    let span = range.duration();
    let secs = span.num_seconds() as i128;
    let subsec = span.subsec_nanos() as i128;
    (secs * 1_000_000_000 + subsec).max(0) as u128
}

fn expected_bucket_count(range: TimeRange, frequency: Frequency) -> u128 {
    let span = span_nanos(range);
    let step = frequency.num_nanoseconds() as u128;
    span.div_ceil(step)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 12, 21, h, m, s).unwrap()
    }

    fn hour_range() -> TimeRange {
        TimeRange::new(at(0, 0, 0), at(1, 0, 0)).unwrap()
    }

    #[test]
    fn test_even_split() {
        let plan = FrequencyBinner::new()
            .plan(hour_range(), Frequency::from_minutes(30).unwrap())
            .unwrap();

        assert_eq!(plan.len(), 2);
        assert_eq!(plan.buckets()[0].lower, at(0, 0, 0));
        assert_eq!(plan.buckets()[0].upper, at(0, 30, 0));
        assert_eq!(plan.buckets()[1].lower, at(0, 30, 0));
        assert_eq!(plan.buckets()[1].upper, at(1, 0, 0));
    }

    #[test]
    fn test_last_bucket_clipped() {
        let plan = FrequencyBinner::new()
            .plan(hour_range(), Frequency::from_minutes(25).unwrap())
            .unwrap();

        assert_eq!(plan.len(), 3);
        let last = plan.buckets()[2];
        assert_eq!(last.lower, at(0, 50, 0));
        assert_eq!(last.upper, at(1, 0, 0));
        assert_eq!(last.upper - last.lower, TimeDelta::minutes(10));
    }

    #[test]
    fn test_frequency_wider_than_range() {
        let plan = FrequencyBinner::new()
            .plan(hour_range(), Frequency::from_minutes(90).unwrap())
            .unwrap();

        assert_eq!(plan.len(), 1);
        assert_eq!(plan.buckets()[0].upper, at(1, 0, 0));
    }

    #[test]
    fn test_buckets_are_contiguous_and_indexed() {
        let plan = FrequencyBinner::new()
            .plan(hour_range(), Frequency::from_secs(7 * 60 + 13).unwrap())
            .unwrap();

        for (i, pair) in plan.buckets().windows(2).enumerate() {
            assert_eq!(pair[0].upper, pair[1].lower);
            assert_eq!(pair[0].index, i);
        }
        assert_eq!(plan.buckets().first().unwrap().lower, at(0, 0, 0));
        assert_eq!(plan.buckets().last().unwrap().upper, at(1, 0, 0));
    }

    #[test]
    fn test_assign_boundaries() {
        let plan = FrequencyBinner::new()
            .plan(hour_range(), Frequency::from_minutes(30).unwrap())
            .unwrap();

        assert_eq!(plan.assign(at(0, 0, 0)), Some(0));
        assert_eq!(plan.assign(at(0, 29, 59)), Some(0));
        assert_eq!(plan.assign(at(0, 30, 0)), Some(1));
        assert_eq!(plan.assign(at(0, 59, 59)), Some(1));
        assert_eq!(plan.assign(at(1, 0, 0)), None);
        assert_eq!(plan.assign(at(0, 0, 0) - TimeDelta::seconds(1)), None);
    }

    #[test]
    fn test_rejects_too_many_buckets() {
        let binner = FrequencyBinner::with_max_buckets(10);
        let result = binner.plan(hour_range(), Frequency::from_minutes(1).unwrap());

        assert!(matches!(result, Err(PointingError::InvalidFrequency(_))));
    }

    #[test]
    fn test_bucket_limit_is_inclusive() {
        let binner = FrequencyBinner::with_max_buckets(60);
        let plan = binner.plan(hour_range(), Frequency::from_minutes(1).unwrap()).unwrap();

        assert_eq!(plan.len(), 60);
    }
}
