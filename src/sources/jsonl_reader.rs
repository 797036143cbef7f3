//! JSONL sample reader: one `{"timestamp": ..., "error": ...}` object per line

use super::{SampleSource, SourceError};
use crate::aggregator_core::Sample;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

pub struct JsonlSampleReader {
    path: PathBuf,
}

impl JsonlSampleReader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl SampleSource for JsonlSampleReader {
    fn read_samples(&mut self) -> Result<Vec<Sample>, SourceError> {
        let reader = BufReader::new(File::open(&self.path)?);
        let mut samples = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let sample = Sample::from_jsonl(trimmed).map_err(|e| SourceError::Parse {
                line: idx as u64 + 1,
                message: e.to_string(),
            })?;
            samples.push(sample);
        }

        log::info!("📖 Read {} samples from {}", samples.len(), self.path.display());
        Ok(samples)
    }

    fn source_type(&self) -> &'static str {
        "JSONL"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_reads_samples_and_skips_comments() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# session 2025-12-21").unwrap();
        writeln!(file, r#"{{"timestamp":"2025-12-21T00:10:00","error":0.5}}"#).unwrap();
        writeln!(file).unwrap();
        writeln!(file, r#"{{"timestamp":"2025-12-21T00:20:00Z","error":0.9}}"#).unwrap();

        let samples = JsonlSampleReader::new(file.path()).read_samples().unwrap();

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1].error, 0.9);
    }

    #[test]
    fn test_reports_offending_line() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"timestamp":"2025-12-21T00:10:00","error":0.5}}"#).unwrap();
        writeln!(file, r#"{{"timestamp":"2025-12-21T00:20:00","error":"high"}}"#).unwrap();

        let result = JsonlSampleReader::new(file.path()).read_samples();

        match result {
            Err(SourceError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        let result = JsonlSampleReader::new("/nonexistent/samples.jsonl").read_samples();
        assert!(matches!(result, Err(SourceError::Io(_))));
    }
}
