//! SQLite sample reader
//!
//! Reads `pointing_samples(timestamp_ms INTEGER, error REAL)` in timestamp
//! order over a read-only connection. A missing file is never created.

use super::{SampleSource, SourceError};
use crate::aggregator_core::Sample;
use crate::sqlite_pragma::apply_read_pragmas;
use chrono::{TimeZone, Utc};
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};

pub struct SqliteSampleReader {
    conn: Connection,
    path: PathBuf,
}

impl SqliteSampleReader {
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = db_path.as_ref().to_path_buf();

        let conn = Connection::open_with_flags(&path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        apply_read_pragmas(&conn)?;

        log::info!("📥 SQLite sample reader opened: {}", path.display());
        Ok(Self { conn, path })
    }
}

impl SampleSource for SqliteSampleReader {
    fn read_samples(&mut self) -> Result<Vec<Sample>, SourceError> {
        let mut stmt = self.conn.prepare(
            "SELECT timestamp_ms, error
             FROM pointing_samples
             ORDER BY timestamp_ms ASC",
        )?;

        let rows = stmt.query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, f64>(1)?)))?;

        let mut samples = Vec::new();
        for (idx, row) in rows.enumerate() {
            let (timestamp_ms, error) = row?;
            let timestamp = Utc
                .timestamp_millis_opt(timestamp_ms)
                .single()
                .ok_or_else(|| SourceError::Parse {
                    line: idx as u64 + 1,
                    message: format!("timestamp_ms {} out of range", timestamp_ms),
                })?;
            samples.push(Sample::new(timestamp, error));
        }

        log::info!("📖 Read {} samples from {}", samples.len(), self.path.display());
        Ok(samples)
    }

    fn source_type(&self) -> &'static str {
        "SQLite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::params;
    use tempfile::tempdir;

    fn setup_test_db(rows: &[(i64, f64)]) -> (tempfile::TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("samples.db");

        let conn = Connection::open(&db_path).unwrap();
        conn.execute(
            "CREATE TABLE pointing_samples (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp_ms INTEGER NOT NULL,
                error REAL NOT NULL
            )",
            [],
        )
        .unwrap();
        for (ts, err) in rows {
            conn.execute(
                "INSERT INTO pointing_samples (timestamp_ms, error) VALUES (?1, ?2)",
                params![ts, err],
            )
            .unwrap();
        }

        (dir, db_path)
    }

    #[test]
    fn test_reads_in_timestamp_order() {
        let base = 1_766_275_200_000; // 2025-12-21T00:00:00Z
        let (_dir, db_path) = setup_test_db(&[(base + 1_200_000, 0.9), (base + 600_000, 0.5)]);

        let samples = SqliteSampleReader::new(&db_path).unwrap().read_samples().unwrap();

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].error, 0.5);
        assert_eq!(
            samples[0].timestamp,
            Utc.with_ymd_and_hms(2025, 12, 21, 0, 10, 0).unwrap()
        );
    }

    #[test]
    fn test_missing_database_is_not_created() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("absent.db");

        assert!(matches!(SqliteSampleReader::new(&db_path), Err(SourceError::Database(_))));
        assert!(!db_path.exists());
    }

    #[test]
    fn test_missing_table() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("empty.db");
        Connection::open(&db_path)
            .unwrap()
            .execute("CREATE TABLE other (x INTEGER)", [])
            .unwrap();

        let mut reader = SqliteSampleReader::new(&db_path).unwrap();
        assert!(matches!(reader.read_samples(), Err(SourceError::Database(_))));
    }

    #[test]
    fn test_read_only_mode() {
        let (_dir, db_path) = setup_test_db(&[(0, 1.0)]);
        let reader = SqliteSampleReader::new(&db_path).unwrap();

        let result = reader.conn.execute(
            "INSERT INTO pointing_samples (timestamp_ms, error) VALUES (1, 1.0)",
            [],
        );
        assert!(result.is_err());
    }
}
