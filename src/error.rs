//! Error taxonomy for the aggregation core
//!
//! Every variant is raised at the point of detection and never retried: the
//! transformation is pure, so a retry would reproduce the same failure.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub enum PointingError {
    /// `end <= start` when building a `TimeRange`
    InvalidRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    /// Non-positive, unparseable, or too fine a bucket duration
    InvalidFrequency(String),
    /// A sample carried a negative error magnitude
    NegativeErrorValue {
        timestamp: DateTime<Utc>,
        error: f64,
    },
    /// A sample carried NaN or an infinite error magnitude
    NonFiniteErrorValue { timestamp: DateTime<Utc> },
}

impl PointingError {
    /// True for failures caused by bad input data rather than bad parameters
    pub fn is_data_integrity(&self) -> bool {
        matches!(
            self,
            PointingError::NegativeErrorValue { .. } | PointingError::NonFiniteErrorValue { .. }
        )
    }
}

impl std::fmt::Display for PointingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PointingError::InvalidRange { start, end } => write!(
                f,
                "Invalid time range: end {} is not after start {}",
                end.to_rfc3339(),
                start.to_rfc3339()
            ),
            PointingError::InvalidFrequency(msg) => write!(f, "Invalid frequency: {}", msg),
            PointingError::NegativeErrorValue { timestamp, error } => write!(
                f,
                "Negative pointing error {} at {}",
                error,
                timestamp.to_rfc3339()
            ),
            PointingError::NonFiniteErrorValue { timestamp } => write!(
                f,
                "Non-finite pointing error at {}",
                timestamp.to_rfc3339()
            ),
        }
    }
}

impl std::error::Error for PointingError {}
