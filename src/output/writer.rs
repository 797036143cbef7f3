//! Unified writer interface for aggregated series
//!
//! Routes writes to either JSONL or SQLite backend based on configuration.

use super::jsonl_writer::SeriesJsonlWriter;
use super::sqlite_writer::SqliteSeriesWriter;
use super::writer_backend::{AggregatorWriterBackend, AggregatorWriterError};
use crate::aggregator_core::ResultSeries;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    Jsonl,
    Sqlite,
}

impl BackendType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendType::Jsonl => "jsonl",
            BackendType::Sqlite => "sqlite",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "jsonl" => Some(BackendType::Jsonl),
            "sqlite" => Some(BackendType::Sqlite),
            _ => None,
        }
    }
}

/// Unified writer that routes to either JSONL or SQLite backend
pub enum AggregatorWriter {
    Jsonl(SeriesJsonlWriter),
    Sqlite(SqliteSeriesWriter),
}

impl AggregatorWriter {
    /// Create a new writer based on backend type
    pub fn new(backend: BackendType, path: impl AsRef<Path>) -> Result<Self, AggregatorWriterError> {
        match backend {
            BackendType::Jsonl => Ok(AggregatorWriter::Jsonl(SeriesJsonlWriter::new(path)?)),
            BackendType::Sqlite => Ok(AggregatorWriter::Sqlite(SqliteSeriesWriter::new(path)?)),
        }
    }

    fn backend(&mut self) -> &mut dyn AggregatorWriterBackend {
        match self {
            AggregatorWriter::Jsonl(w) => w,
            AggregatorWriter::Sqlite(w) => w,
        }
    }

    pub fn write_series(&mut self, series: &ResultSeries) -> Result<(), AggregatorWriterError> {
        self.backend().write_series(series)
    }

    /// Flush pending writes to storage
    pub fn flush(&mut self) -> Result<(), AggregatorWriterError> {
        self.backend().flush()
    }

    /// Get backend type for logging
    pub fn backend_type(&self) -> &'static str {
        match self {
            AggregatorWriter::Jsonl(w) => w.backend_type(),
            AggregatorWriter::Sqlite(w) => w.backend_type(),
        }
    }
}
