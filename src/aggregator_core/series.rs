//! Ordered, read-only aggregation output

use super::aggregator::MetricSet;
use super::binner::Bucket;
use super::frequency::Frequency;
use super::range::TimeRange;
use super::window::BucketStats;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Outcome of a run that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeriesStatus {
    /// At least one sample landed in a bucket
    Populated,
    /// No sample fell inside the range; every bucket is empty
    EmptySampleSet,
}

impl SeriesStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeriesStatus::Populated => "POPULATED",
            SeriesStatus::EmptySampleSet => "EMPTY_SAMPLE_SET",
        }
    }
}

/// Largest error across all buckets
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GlobalMax {
    pub bucket_index: usize,
    pub value: f64,
    pub at: DateTime<Utc>,
}

/// One `(Bucket, BucketStats)` per planned bucket, in time order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSeries {
    range: TimeRange,
    frequency: Frequency,
    metrics: MetricSet,
    entries: Vec<(Bucket, BucketStats)>,
    out_of_range_count: usize,
}

impl ResultSeries {
    pub(crate) fn new(
        range: TimeRange,
        frequency: Frequency,
        metrics: MetricSet,
        entries: Vec<(Bucket, BucketStats)>,
        out_of_range_count: usize,
    ) -> Self {
        Self {
            range,
            frequency,
            metrics,
            entries,
            out_of_range_count,
        }
    }

    pub fn range(&self) -> TimeRange {
        self.range
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn metrics(&self) -> &MetricSet {
        &self.metrics
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&(Bucket, BucketStats)> {
        self.entries.get(index)
    }

    /// Fresh traversal from the first bucket on every call
    pub fn iter(&self) -> std::slice::Iter<'_, (Bucket, BucketStats)> {
        self.entries.iter()
    }

    pub fn out_of_range_count(&self) -> usize {
        self.out_of_range_count
    }

    /// Samples that landed in some bucket
    pub fn total_count(&self) -> usize {
        self.entries.iter().map(|(_, stats)| stats.count).sum()
    }

    pub fn buckets_with_data(&self) -> usize {
        self.entries.iter().filter(|(_, stats)| !stats.is_empty()).count()
    }

    pub fn empty_bucket_count(&self) -> usize {
        self.len() - self.buckets_with_data()
    }

    pub fn status(&self) -> SeriesStatus {
        if self.total_count() == 0 {
            SeriesStatus::EmptySampleSet
        } else {
            SeriesStatus::Populated
        }
    }

    /// Maximum over all bucket maxima; ties go to the earliest instant.
    ///
    /// `None` when no bucket has a max (no data, or `max` not selected).
    pub fn global_max(&self) -> Option<GlobalMax> {
        let mut best: Option<GlobalMax> = None;

        for (bucket, stats) in &self.entries {
            let (Some(value), Some(at)) = (stats.max, stats.max_at) else {
                continue;
            };
            let better = match best {
                None => true,
                Some(current) => value > current.value || (value == current.value && at < current.at),
            };
            if better {
                best = Some(GlobalMax {
                    bucket_index: bucket.index,
                    value,
                    at,
                });
            }
        }

        best
    }
}

impl<'a> IntoIterator for &'a ResultSeries {
    type Item = &'a (Bucket, BucketStats);
    type IntoIter = std::slice::Iter<'a, (Bucket, BucketStats)>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator_core::aggregator::{ErrorAggregator, Metric};
    use crate::aggregator_core::binner::FrequencyBinner;
    use crate::aggregator_core::sample::Sample;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 12, 21, h, m, 0).unwrap()
    }

    fn build(samples: &[Sample], metrics: MetricSet) -> ResultSeries {
        let range = TimeRange::new(at(0, 0), at(2, 0)).unwrap();
        let plan = FrequencyBinner::new()
            .plan(range, Frequency::from_minutes(30).unwrap())
            .unwrap();
        ErrorAggregator::new().aggregate(samples, &plan, &metrics).unwrap()
    }

    #[test]
    fn test_indexed_access_and_len() {
        let series = build(&[Sample::new(at(0, 45), 1.0)], MetricSet::all());

        assert_eq!(series.len(), 4);
        assert_eq!(series.get(1).unwrap().0.lower, at(0, 30));
        assert_eq!(series.get(1).unwrap().1.count, 1);
        assert!(series.get(4).is_none());
    }

    #[test]
    fn test_iteration_is_restartable() {
        let series = build(&[Sample::new(at(0, 45), 1.0)], MetricSet::all());

        let first: Vec<usize> = series.iter().map(|(b, _)| b.index).collect();
        let second: Vec<usize> = (&series).into_iter().map(|(b, _)| b.index).collect();
        assert_eq!(first, vec![0, 1, 2, 3]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_global_max_tie_prefers_earliest_bucket() {
        let series = build(
            &[
                Sample::new(at(1, 40), 2.5),
                Sample::new(at(0, 10), 2.5),
                Sample::new(at(0, 50), 1.0),
            ],
            MetricSet::all(),
        );

        let max = series.global_max().unwrap();
        assert_eq!(max.value, 2.5);
        assert_eq!(max.at, at(0, 10));
        assert_eq!(max.bucket_index, 0);
    }

    #[test]
    fn test_empty_sample_set_status() {
        let series = build(&[], MetricSet::all());

        assert_eq!(series.status(), SeriesStatus::EmptySampleSet);
        assert_eq!(series.len(), 4);
        assert_eq!(series.empty_bucket_count(), 4);
        assert!(series.global_max().is_none());
    }

    #[test]
    fn test_data_counters() {
        let series = build(
            &[
                Sample::new(at(0, 5), 0.1),
                Sample::new(at(0, 6), 0.2),
                Sample::new(at(1, 35), 0.3),
                Sample::new(at(3, 0), 0.4),
            ],
            MetricSet::only(&[Metric::Count, Metric::Max]),
        );

        assert_eq!(series.status(), SeriesStatus::Populated);
        assert_eq!(series.total_count(), 3);
        assert_eq!(series.buckets_with_data(), 2);
        assert_eq!(series.empty_bucket_count(), 2);
        assert_eq!(series.out_of_range_count(), 1);
    }
}
