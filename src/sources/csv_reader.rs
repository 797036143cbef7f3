//! CSV/TSV sample reader
//!
//! Accepts either a direct `error` column or a pair of azimuth/elevation
//! offset columns (`del_az`/`del_el`, also `Del-Az [amin]`/`Del-El [amin]`),
//! combined into a magnitude. Decimal commas are accepted.

use super::{SampleSource, SourceError};
use crate::aggregator_core::{parse_instant, Sample};
use std::path::{Path, PathBuf};

const TIMESTAMP_COLUMNS: [&str; 3] = ["timestamp", "time", "utc"];
const AZ_OFFSET_COLUMNS: [&str; 2] = ["del_az", "offset_az"];
const EL_OFFSET_COLUMNS: [&str; 2] = ["del_el", "offset_el"];

#[derive(Debug, Clone, Copy, PartialEq)]
enum ErrorColumns {
    Direct(usize),
    Offsets { az: usize, el: usize },
}

pub struct CsvSampleReader {
    path: PathBuf,
    delimiter: u8,
}

impl CsvSampleReader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::with_delimiter(path, b',')
    }

    pub fn with_delimiter(path: impl AsRef<Path>, delimiter: u8) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            delimiter,
        }
    }
}

/// `Del-Az [amin]` -> `del_az`
fn normalize_header(header: &str) -> String {
    let base = header.split('[').next().unwrap_or(header);
    base.trim()
        .to_ascii_lowercase()
        .replace(|c: char| c == '-' || c == ' ', "_")
}

fn find_column(headers: &[String], names: &[&str]) -> Option<usize> {
    headers.iter().position(|h| names.contains(&h.as_str()))
}

fn parse_decimal(field: &str) -> Result<f64, String> {
    let normalized = field.trim().replace(',', ".");
    normalized
        .parse::<f64>()
        .map_err(|_| format!("invalid number '{}'", field))
}

impl SampleSource for CsvSampleReader {
    fn read_samples(&mut self) -> Result<Vec<Sample>, SourceError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .from_path(&self.path)?;

        let headers: Vec<String> = reader.headers()?.iter().map(normalize_header).collect();

        let ts_col = find_column(&headers, &TIMESTAMP_COLUMNS)
            .ok_or_else(|| SourceError::MissingColumn("timestamp".to_string()))?;

        let error_cols = match find_column(&headers, &["error"]) {
            Some(idx) => ErrorColumns::Direct(idx),
            None => match (
                find_column(&headers, &AZ_OFFSET_COLUMNS),
                find_column(&headers, &EL_OFFSET_COLUMNS),
            ) {
                (Some(az), Some(el)) => ErrorColumns::Offsets { az, el },
                _ => {
                    return Err(SourceError::MissingColumn(
                        "error (or del_az + del_el)".to_string(),
                    ))
                }
            },
        };

        let mut samples = Vec::new();
        for (idx, record) in reader.records().enumerate() {
            let record = record?;
            let line = record
                .position()
                .map(|p| p.line())
                .unwrap_or(idx as u64 + 2);
            let parse_err = |message: String| SourceError::Parse { line, message };

            let field = |col: usize| record.get(col).unwrap_or("");

            let timestamp = parse_instant(field(ts_col)).map_err(parse_err)?;
            let sample = match error_cols {
                ErrorColumns::Direct(col) => {
                    Sample::new(timestamp, parse_decimal(field(col)).map_err(parse_err)?)
                }
                ErrorColumns::Offsets { az, el } => Sample::from_offsets(
                    timestamp,
                    parse_decimal(field(az)).map_err(parse_err)?,
                    parse_decimal(field(el)).map_err(parse_err)?,
                ),
            };
            samples.push(sample);
        }

        log::info!("📖 Read {} samples from {}", samples.len(), self.path.display());
        Ok(samples)
    }

    fn source_type(&self) -> &'static str {
        if self.delimiter == b'\t' {
            "TSV"
        } else {
            "CSV"
        }
    }
}
