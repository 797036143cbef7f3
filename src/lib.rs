//! Pointing-error analysis
//!
//! Bins timestamped telescope pointing-error samples into uniform time buckets
//! and derives per-bucket statistics (count, mean, max). `aggregator_core` is
//! the pure transformation, `pipeline` wires it to validated configuration,
//! `sources` and `output` are the file-facing collaborators used by the
//! `pointing_report` binary.

pub mod aggregator_core;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod sources;
pub mod sqlite_pragma;

pub use aggregator_core::{Frequency, MetricSet, ResultSeries, Sample, TimeRange};
pub use error::PointingError;
pub use pipeline::{PipelineError, PipelineOrchestrator, RunConfig};
