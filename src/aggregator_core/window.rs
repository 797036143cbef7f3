//! Per-bucket running statistics

use super::sample::Sample;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Final statistics for one bucket.
///
/// `mean`, `max` and `max_at` are `None` when the bucket saw no samples or the
/// statistic was not requested; `count` is always populated.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BucketStats {
    pub count: usize,
    pub mean: Option<f64>,
    pub max: Option<f64>,
    pub max_at: Option<DateTime<Utc>>,
}

impl BucketStats {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Incremental accumulator for a single bucket
#[derive(Debug, Clone, Default)]
pub struct BucketAccumulator {
    count: usize,
    mean: f64,
    max: Option<(f64, DateTime<Utc>)>,
}

impl BucketAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sample(&mut self, sample: &Sample) {
        self.count += 1;

        // Running mean: m_n = m_{n-1} + (x - m_{n-1}) / n
        self.mean += (sample.error - self.mean) / self.count as f64;

        let replace = match self.max {
            None => true,
            Some((value, at)) => {
                sample.error > value || (sample.error == value && sample.timestamp < at)
            }
        };
        if replace {
            self.max = Some((sample.error, sample.timestamp));
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn finish(&self, with_mean: bool, with_max: bool) -> BucketStats {
        if self.count == 0 {
            return BucketStats::default();
        }

        let (max, max_at) = match self.max {
            Some((value, at)) if with_max => (Some(value), Some(at)),
            _ => (None, None),
        };

        BucketStats {
            count: self.count,
            mean: with_mean.then_some(self.mean),
            max,
            max_at,
        }
    }
}
