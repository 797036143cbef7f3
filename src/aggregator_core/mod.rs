//! Aggregator Core - Pointing-Error Binning Engine
//!
//! Pure, synchronous transformation of in-memory pointing-error samples into a
//! bucketed statistics series. No I/O happens here; sources and presentation
//! live in `crate::sources` and `crate::output`.
//!
//! # Architecture
//!
//! ```text
//! (start, end) → TimeRange
//!     ↓
//! FrequencyBinner::plan(range, frequency) → BucketPlan
//!     ↓
//! ErrorAggregator::aggregate(samples, plan, metrics)
//!     ↓  BucketPlan::assign (binary search) per sample
//! BucketAccumulator per bucket (count, running mean, max/max_at)
//!     ↓
//! ResultSeries (+ out-of-range tally) → plot / export
//! ```

pub mod aggregator;
pub mod binner;
pub mod frequency;
pub mod range;
pub mod sample;
pub mod series;
pub mod window;

pub use aggregator::{ErrorAggregator, Metric, MetricSet};
pub use binner::{Bucket, BucketPlan, FrequencyBinner, DEFAULT_MAX_BUCKETS};
pub use frequency::Frequency;
pub use range::TimeRange;
pub use sample::{parse_instant, Sample};
pub use series::{GlobalMax, ResultSeries, SeriesStatus};
pub use window::{BucketAccumulator, BucketStats};
