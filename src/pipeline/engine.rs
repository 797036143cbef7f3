//! Pipeline Orchestrator - single entry point for a pointing-error analysis run
//!
//! ```text
//! (TimeRange, Frequency, &[Sample], MetricSet)
//!     ↓
//! FrequencyBinner::plan()
//!     ↓
//! ErrorAggregator::aggregate()
//!     ↓
//! ResultSeries → CLI / plot / export
//! ```
//!
//! The orchestrator performs no I/O. Samples are materialized by a
//! `SampleSource` before `run` is called, and the returned series is handed to
//! presentation code by reference.

use crate::aggregator_core::{
    ErrorAggregator, Frequency, FrequencyBinner, MetricSet, ResultSeries, Sample, SeriesStatus,
    TimeRange,
};
use crate::error::PointingError;

#[derive(Debug, Clone, Default)]
pub struct PipelineOrchestrator {
    binner: FrequencyBinner,
    aggregator: ErrorAggregator,
}

impl PipelineOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a binner with a custom bucket ceiling
    pub fn with_binner(binner: FrequencyBinner) -> Self {
        Self {
            binner,
            aggregator: ErrorAggregator::new(),
        }
    }

    /// Bin `samples` over `range` in `frequency`-wide buckets.
    ///
    /// An empty sample set is not an error: the series comes back with
    /// `SeriesStatus::EmptySampleSet` and every bucket absent.
    pub fn run(
        &self,
        range: TimeRange,
        frequency: Frequency,
        samples: &[Sample],
        metrics: &MetricSet,
    ) -> Result<ResultSeries, PointingError> {
        let plan = self.binner.plan(range, frequency)?;
        let series = self.aggregator.aggregate(samples, &plan, metrics)?;

        if series.out_of_range_count() > 0 {
            log::warn!(
                "{} of {} samples fell outside {} and were excluded",
                series.out_of_range_count(),
                samples.len(),
                range
            );
        }

        match series.status() {
            SeriesStatus::EmptySampleSet => {
                log::warn!("No samples inside {}; all {} buckets are empty", range, series.len());
            }
            SeriesStatus::Populated => {
                log::info!(
                    "Aggregated {} samples into {} buckets ({} empty)",
                    series.total_count(),
                    series.len(),
                    series.empty_bucket_count()
                );
            }
        }

        Ok(series)
    }
}
