//! Error aggregation: samples + bucket plan -> per-bucket statistics

use super::binner::BucketPlan;
use super::sample::Sample;
use super::series::ResultSeries;
use super::window::BucketAccumulator;
use crate::error::PointingError;
use serde::Serialize;
use std::collections::BTreeSet;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Count,
    Mean,
    Max,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Count => "count",
            Metric::Mean => "mean",
            Metric::Max => "max",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "count" => Some(Metric::Count),
            "mean" | "avg" => Some(Metric::Mean),
            "max" => Some(Metric::Max),
            _ => None,
        }
    }

    pub fn all() -> [Metric; 3] {
        [Metric::Count, Metric::Mean, Metric::Max]
    }
}

/// Selection of statistics to compute
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricSet(BTreeSet<Metric>);

impl MetricSet {
    pub fn all() -> Self {
        Self(Metric::all().into_iter().collect())
    }

    pub fn only(metrics: &[Metric]) -> Self {
        Self(metrics.iter().copied().collect())
    }

    pub fn contains(&self, metric: Metric) -> bool {
        self.0.contains(&metric)
    }

    pub fn iter(&self) -> impl Iterator<Item = Metric> + '_ {
        self.0.iter().copied()
    }
}

impl Default for MetricSet {
    fn default() -> Self {
        Self::all()
    }
}

impl FromStr for MetricSet {
    type Err = String;

    /// Comma-separated list, e.g. `count,max`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut set = BTreeSet::new();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let metric = Metric::from_str(part)
                .ok_or_else(|| format!("unknown metric '{}' (expected count, mean, max)", part))?;
            set.insert(metric);
        }
        if set.is_empty() {
            return Err("at least one metric is required".to_string());
        }
        Ok(Self(set))
    }
}

impl std::fmt::Display for MetricSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.iter().map(|m| m.as_str()).collect();
        f.write_str(&names.join(","))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorAggregator;

impl ErrorAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Compute per-bucket statistics for `samples` over `plan`.
    ///
    /// Every sample is validated first; one negative or non-finite error
    /// aborts the run. Samples outside the plan's range are tallied, not
    /// binned. Every planned bucket is emitted, empty or not.
    pub fn aggregate(
        &self,
        samples: &[Sample],
        plan: &BucketPlan,
        metrics: &MetricSet,
    ) -> Result<ResultSeries, PointingError> {
        validate_samples(samples)?;

        let sorted;
        let ordered: &[Sample] = if is_canonically_ordered(samples) {
            samples
        } else {
            log::debug!("Sorting {} out-of-order samples before aggregation", samples.len());
            let mut copy = samples.to_vec();
            copy.sort_by(|a, b| {
                a.timestamp
                    .cmp(&b.timestamp)
                    .then(a.error.total_cmp(&b.error))
            });
            sorted = copy;
            &sorted
        };

        let mut accumulators = vec![BucketAccumulator::new(); plan.len()];
        let mut out_of_range = 0usize;

        for sample in ordered {
            match plan.assign(sample.timestamp) {
                Some(index) => accumulators[index].add_sample(sample),
                None => out_of_range += 1,
            }
        }

        let with_mean = metrics.contains(Metric::Mean);
        let with_max = metrics.contains(Metric::Max);
        let entries = plan
            .buckets()
            .iter()
            .zip(&accumulators)
            .map(|(bucket, acc)| (*bucket, acc.finish(with_mean, with_max)))
            .collect();

        Ok(ResultSeries::new(
            plan.range(),
            plan.frequency(),
            metrics.clone(),
            entries,
            out_of_range,
        ))
    }
}

fn validate_samples(samples: &[Sample]) -> Result<(), PointingError> {
    for sample in samples {
        if !sample.error.is_finite() {
            return Err(PointingError::NonFiniteErrorValue {
                timestamp: sample.timestamp,
            });
        }
        if sample.error < 0.0 {
            return Err(PointingError::NegativeErrorValue {
                timestamp: sample.timestamp,
                error: sample.error,
            });
        }
    }
    Ok(())
}

/// Sorted by `(timestamp, error)`, the order accumulation always runs in
fn is_canonically_ordered(samples: &[Sample]) -> bool {
    samples.windows(2).all(|w| {
        w[0].timestamp
            .cmp(&w[1].timestamp)
            .then(w[0].error.total_cmp(&w[1].error))
            .is_le()
    })
}
