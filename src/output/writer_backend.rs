//! Writer backend trait for aggregated series
//!
//! Defines the interface for persisting a `ResultSeries` to different backends.

use crate::aggregator_core::ResultSeries;

#[derive(Debug)]
pub enum AggregatorWriterError {
    Io(std::io::Error),
    Serialization(serde_json::Error),
    Database(String),
    Plot(String),
}

impl From<std::io::Error> for AggregatorWriterError {
    fn from(err: std::io::Error) -> Self {
        AggregatorWriterError::Io(err)
    }
}

impl From<serde_json::Error> for AggregatorWriterError {
    fn from(err: serde_json::Error) -> Self {
        AggregatorWriterError::Serialization(err)
    }
}

impl From<rusqlite::Error> for AggregatorWriterError {
    fn from(err: rusqlite::Error) -> Self {
        AggregatorWriterError::Database(err.to_string())
    }
}

impl std::fmt::Display for AggregatorWriterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AggregatorWriterError::Io(e) => write!(f, "IO error: {}", e),
            AggregatorWriterError::Serialization(e) => write!(f, "Serialization error: {}", e),
            AggregatorWriterError::Database(e) => write!(f, "Database error: {}", e),
            AggregatorWriterError::Plot(e) => write!(f, "Plot error: {}", e),
        }
    }
}

impl std::error::Error for AggregatorWriterError {}

/// Backend trait for persisting aggregated series
pub trait AggregatorWriterBackend {
    /// Write every bucket of `series` plus its run summary
    fn write_series(&mut self, series: &ResultSeries) -> Result<(), AggregatorWriterError>;

    /// Flush pending writes to storage
    fn flush(&mut self) -> Result<(), AggregatorWriterError>;

    /// Get backend type for logging
    fn backend_type(&self) -> &'static str;
}
