//! SQLite writer for aggregated series
//!
//! Each `write_series` call records one row in `runs` and one row per bucket
//! in `bucket_stats`, inside a single transaction. Instants are stored as
//! nanoseconds since the Unix epoch so bucket bounds keep full precision.

use super::writer_backend::{AggregatorWriterBackend, AggregatorWriterError};
use crate::aggregator_core::ResultSeries;
use crate::sqlite_pragma::apply_optimized_pragmas;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;

fn epoch_nanos(t: DateTime<Utc>) -> Result<i64, AggregatorWriterError> {
    t.timestamp_nanos_opt().ok_or_else(|| {
        AggregatorWriterError::Database(format!("{} is outside the storable nanosecond range", t))
    })
}

pub struct SqliteSeriesWriter {
    conn: Connection,
}

impl SqliteSeriesWriter {
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self, AggregatorWriterError> {
        // Ensure parent directory exists
        if let Some(parent) = db_path.as_ref().parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                AggregatorWriterError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to create database directory {}: {}", parent.display(), e),
                ))
            })?;
        }

        let conn = Connection::open(db_path)?;
        apply_optimized_pragmas(&conn)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS runs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                created_at INTEGER NOT NULL,
                range_start_ns INTEGER NOT NULL,
                range_end_ns INTEGER NOT NULL,
                frequency TEXT NOT NULL,
                metrics TEXT NOT NULL,
                out_of_range_count INTEGER NOT NULL,
                status TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS bucket_stats (
                run_id INTEGER NOT NULL REFERENCES runs(id),
                bucket_index INTEGER NOT NULL,
                lower_ns INTEGER NOT NULL,
                upper_ns INTEGER NOT NULL,
                count INTEGER NOT NULL,
                mean REAL,
                max REAL,
                max_at_ns INTEGER,
                PRIMARY KEY (run_id, bucket_index)
            )",
            [],
        )?;

        log::info!("✅ SQLite series writer initialized with WAL mode");

        Ok(Self { conn })
    }
}

impl AggregatorWriterBackend for SqliteSeriesWriter {
    fn write_series(&mut self, series: &ResultSeries) -> Result<(), AggregatorWriterError> {
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO runs
             (created_at, range_start_ns, range_end_ns, frequency, metrics, out_of_range_count, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                chrono::Utc::now().timestamp(),
                epoch_nanos(series.range().start())?,
                epoch_nanos(series.range().end())?,
                series.frequency().to_string(),
                series.metrics().to_string(),
                series.out_of_range_count() as i64,
                series.status().as_str(),
            ],
        )?;
        let run_id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare(
                "INSERT INTO bucket_stats
                 (run_id, bucket_index, lower_ns, upper_ns, count, mean, max, max_at_ns)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for (bucket, stats) in series {
                stmt.execute(params![
                    run_id,
                    bucket.index as i64,
                    epoch_nanos(bucket.lower)?,
                    epoch_nanos(bucket.upper)?,
                    stats.count as i64,
                    stats.mean,
                    stats.max,
                    stats.max_at.map(epoch_nanos).transpose()?,
                ])?;
            }
        }

        tx.commit()?;

        log::debug!(
            "✅ Run {} written: {} buckets ({})",
            run_id,
            series.len(),
            series.status().as_str()
        );
        Ok(())
    }

    fn flush(&mut self) -> Result<(), AggregatorWriterError> {
        // Every write commits its own transaction
        Ok(())
    }

    fn backend_type(&self) -> &'static str {
        "SQLite"
    }
}
