//! One complete report run: read samples, aggregate, export, plot
//!
//! This is the I/O shell around `PipelineOrchestrator`. Samples are fully
//! materialized before the orchestrator is invoked.

use super::config::ValidatedRun;
use super::engine::PipelineOrchestrator;
use super::error::PipelineError;
use crate::aggregator_core::{FrequencyBinner, ResultSeries};
use crate::output::{render_series, AggregatorWriter, PlotConfig};
use crate::sources::open_source;

pub fn execute(run: &ValidatedRun) -> Result<ResultSeries, PipelineError> {
    let mut source = open_source(&run.input, run.input_format)?;
    log::info!(
        "📖 Reading {} samples from {}",
        source.source_type(),
        run.input.display()
    );
    let samples = source.read_samples()?;

    let orchestrator = PipelineOrchestrator::with_binner(FrequencyBinner::with_max_buckets(run.max_buckets));
    let series = orchestrator.run(run.range, run.frequency, &samples, &run.metrics)?;

    if let Some((backend, path)) = &run.export {
        let mut writer = AggregatorWriter::new(*backend, path)?;
        log::info!("📊 Backend: {}", writer.backend_type());
        writer.write_series(&series)?;
        writer.flush()?;
    }

    if let Some(plot_path) = &run.plot_path {
        let config = PlotConfig {
            show_max_error: run.show_max,
            ..PlotConfig::default()
        };
        render_series(&series, plot_path, &config)?;
    }

    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::BackendType;
    use crate::pipeline::RunConfig;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_execute_with_jsonl_export() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("samples.jsonl");
        fs::write(
            &input,
            "{\"timestamp\":\"2025-12-21T00:10:00Z\",\"error\":0.5}\n\
             {\"timestamp\":\"2025-12-21T00:40:00Z\",\"error\":1.5}\n",
        )
        .unwrap();
        let output = dir.path().join("out/series.jsonl");

        let run = RunConfig {
            start: Some("2025-12-21T00:00:00Z".to_string()),
            end: Some("2025-12-21T01:00:00Z".to_string()),
            input: Some(input),
            backend: BackendType::Jsonl,
            output: Some(output.clone()),
            ..RunConfig::default()
        }
        .validate()
        .unwrap();

        let series = execute(&run).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.total_count(), 2);
        assert_eq!(fs::read_to_string(&output).unwrap().lines().count(), 3);
    }

    #[test]
    fn test_missing_input_is_source_error() {
        let dir = tempdir().unwrap();
        let run = RunConfig {
            start: Some("2025-12-21T00:00:00Z".to_string()),
            end: Some("2025-12-21T01:00:00Z".to_string()),
            input: Some(dir.path().join("absent.jsonl")),
            ..RunConfig::default()
        }
        .validate()
        .unwrap();

        let err = execute(&run).unwrap_err();
        assert!(matches!(err, PipelineError::Source(_)));
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_missing_sqlite_input_is_source_error() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("absent.db");
        let run = RunConfig {
            start: Some("2025-12-21T00:00:00Z".to_string()),
            end: Some("2025-12-21T01:00:00Z".to_string()),
            input: Some(input.clone()),
            ..RunConfig::default()
        }
        .validate()
        .unwrap();

        let err = execute(&run).unwrap_err();
        assert_eq!(err.exit_code(), 4);
        assert!(!input.exists());
    }

    #[test]
    fn test_negative_error_aborts_before_export() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("samples.csv");
        fs::write(&input, "timestamp,error\n2025-12-21T00:10:00,-0.1\n").unwrap();
        let output = dir.path().join("series.db");

        let run = RunConfig {
            start: Some("2025-12-21T00:00:00".to_string()),
            end: Some("2025-12-21T01:00:00".to_string()),
            input: Some(input),
            backend: BackendType::Sqlite,
            output: Some(output.clone()),
            ..RunConfig::default()
        }
        .validate()
        .unwrap();

        let err = execute(&run).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(!output.exists());
    }
}
