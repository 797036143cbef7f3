//! Sample sources
//!
//! Readers that materialize `Sample`s from disk before a pipeline run. The
//! aggregation core never sees files; it receives the `Vec<Sample>` these
//! produce.

pub mod csv_reader;
pub mod jsonl_reader;
pub mod sqlite_reader;

pub use csv_reader::CsvSampleReader;
pub use jsonl_reader::JsonlSampleReader;
pub use sqlite_reader::SqliteSampleReader;

use crate::aggregator_core::Sample;
use std::path::Path;

#[derive(Debug)]
pub enum SourceError {
    Io(std::io::Error),
    Csv(csv::Error),
    Database(rusqlite::Error),
    /// A record that could not be turned into a `Sample`
    Parse { line: u64, message: String },
    /// Required column(s) missing from a tabular source
    MissingColumn(String),
}

impl From<std::io::Error> for SourceError {
    fn from(err: std::io::Error) -> Self {
        SourceError::Io(err)
    }
}

impl From<csv::Error> for SourceError {
    fn from(err: csv::Error) -> Self {
        SourceError::Csv(err)
    }
}

impl From<rusqlite::Error> for SourceError {
    fn from(err: rusqlite::Error) -> Self {
        SourceError::Database(err)
    }
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceError::Io(e) => write!(f, "IO error: {}", e),
            SourceError::Csv(e) => write!(f, "CSV error: {}", e),
            SourceError::Database(e) => write!(f, "Database error: {}", e),
            SourceError::Parse { line, message } => write!(f, "Line {}: {}", line, message),
            SourceError::MissingColumn(name) => write!(f, "Missing column: {}", name),
        }
    }
}

impl std::error::Error for SourceError {}

/// Anything that can hand over a finite batch of samples
pub trait SampleSource {
    /// Read every available sample
    fn read_samples(&mut self) -> Result<Vec<Sample>, SourceError>;

    /// Source type for logging
    fn source_type(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Jsonl,
    Csv { delimiter: u8 },
    Sqlite,
}

impl InputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputFormat::Jsonl => "jsonl",
            InputFormat::Csv { delimiter: b'\t' } => "tsv",
            InputFormat::Csv { .. } => "csv",
            InputFormat::Sqlite => "sqlite",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jsonl" | "json" => Some(InputFormat::Jsonl),
            "csv" => Some(InputFormat::Csv { delimiter: b',' }),
            "tsv" => Some(InputFormat::Csv { delimiter: b'\t' }),
            "sqlite" | "db" => Some(InputFormat::Sqlite),
            _ => None,
        }
    }

    /// Infer the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "jsonl" | "json" | "ndjson" => Some(InputFormat::Jsonl),
            "csv" => Some(InputFormat::Csv { delimiter: b',' }),
            "tsv" => Some(InputFormat::Csv { delimiter: b'\t' }),
            "db" | "sqlite" | "sqlite3" => Some(InputFormat::Sqlite),
            _ => None,
        }
    }
}

/// Open the reader matching `format`
pub fn open_source(path: &Path, format: InputFormat) -> Result<Box<dyn SampleSource>, SourceError> {
    let source: Box<dyn SampleSource> = match format {
        InputFormat::Jsonl => Box::new(JsonlSampleReader::new(path)),
        InputFormat::Csv { delimiter } => Box::new(CsvSampleReader::with_delimiter(path, delimiter)),
        InputFormat::Sqlite => Box::new(SqliteSampleReader::new(path)?),
    };
    log::debug!("Opened {} source: {}", source.source_type(), path.display());
    Ok(source)
}
