//! JSONL writer for aggregated series - one line per bucket plus a summary line

use super::writer_backend::{AggregatorWriterBackend, AggregatorWriterError};
use crate::aggregator_core::{GlobalMax, ResultSeries, SeriesStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
#[serde(tag = "record", rename_all = "lowercase")]
pub enum SeriesRecord {
    Bucket {
        index: usize,
        lower: DateTime<Utc>,
        upper: DateTime<Utc>,
        count: usize,
        mean: Option<f64>,
        max: Option<f64>,
        max_at: Option<DateTime<Utc>>,
    },
    Summary {
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
        frequency: String,
        metrics: String,
        buckets: usize,
        empty_buckets: usize,
        total_count: usize,
        out_of_range_count: usize,
        status: SeriesStatus,
        global_max: Option<GlobalMax>,
    },
}

impl SeriesRecord {
    /// Bucket records in time order followed by one summary record
    pub fn from_series(series: &ResultSeries) -> Vec<SeriesRecord> {
        let mut records: Vec<SeriesRecord> = series
            .iter()
            .map(|(bucket, stats)| SeriesRecord::Bucket {
                index: bucket.index,
                lower: bucket.lower,
                upper: bucket.upper,
                count: stats.count,
                mean: stats.mean,
                max: stats.max,
                max_at: stats.max_at,
            })
            .collect();

        records.push(SeriesRecord::Summary {
            range_start: series.range().start(),
            range_end: series.range().end(),
            frequency: series.frequency().to_string(),
            metrics: series.metrics().to_string(),
            buckets: series.len(),
            empty_buckets: series.empty_bucket_count(),
            total_count: series.total_count(),
            out_of_range_count: series.out_of_range_count(),
            status: series.status(),
            global_max: series.global_max(),
        });

        records
    }
}

pub struct SeriesJsonlWriter {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl SeriesJsonlWriter {
    /// Create (or truncate) the output file
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = File::create(&path)?;
        log::info!("📝 Writing series to: {}", path.display());

        Ok(Self {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for SeriesJsonlWriter {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}

impl AggregatorWriterBackend for SeriesJsonlWriter {
    fn write_series(&mut self, series: &ResultSeries) -> Result<(), AggregatorWriterError> {
        for record in SeriesRecord::from_series(series) {
            let json = serde_json::to_string(&record)?;
            writeln!(self.writer, "{}", json)?;
        }
        log::debug!("✅ Wrote {} bucket records to {}", series.len(), self.path.display());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), AggregatorWriterError> {
        self.writer.flush()?;
        Ok(())
    }

    fn backend_type(&self) -> &'static str {
        "JSONL"
    }
}
