//! Run configuration, validated once at the CLI boundary
//!
//! `RunConfig` holds raw user input. `RunConfig::validate` turns it into a
//! `ValidatedRun` carrying a `TimeRange` and `Frequency`, so nothing past this
//! point parses strings.

use super::error::{ConfigError, PipelineError};
use crate::aggregator_core::{parse_instant, Frequency, MetricSet, TimeRange};
use crate::output::BackendType;
use crate::sources::InputFormat;
use std::path::PathBuf;

/// Plot written when `--plot` is given without `--save-plot`
pub const DEFAULT_PLOT_PATH: &str = "plots/pointing_errors.png";

pub const DEFAULT_FREQUENCY: &str = "30min";

/// Raw run parameters as received from the command line / environment
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub start: Option<String>,
    pub end: Option<String>,
    pub frequency: String,
    pub metrics: MetricSet,
    pub show_max: bool,
    pub plot: bool,
    pub save_path: Option<PathBuf>,
    pub input: Option<PathBuf>,
    pub input_format: Option<InputFormat>,
    pub backend: BackendType,
    pub output: Option<PathBuf>,
    pub max_buckets: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            start: None,
            end: None,
            frequency: DEFAULT_FREQUENCY.to_string(),
            metrics: MetricSet::all(),
            show_max: false,
            plot: false,
            save_path: None,
            input: None,
            input_format: None,
            backend: BackendType::Jsonl,
            output: None,
            max_buckets: crate::aggregator_core::DEFAULT_MAX_BUCKETS,
        }
    }
}

/// Checked run parameters
#[derive(Debug, Clone)]
pub struct ValidatedRun {
    pub range: TimeRange,
    pub frequency: Frequency,
    pub metrics: MetricSet,
    pub show_max: bool,
    /// Where to render the plot, if any
    pub plot_path: Option<PathBuf>,
    pub input: PathBuf,
    pub input_format: InputFormat,
    /// Export backend and destination, if any
    pub export: Option<(BackendType, PathBuf)>,
    pub max_buckets: usize,
}

impl RunConfig {
    pub fn validate(&self) -> Result<ValidatedRun, PipelineError> {
        let start = parse_required_instant(self.start.as_deref(), "--start-time")?;
        let end = parse_required_instant(self.end.as_deref(), "--end-time")?;
        let range = TimeRange::new(start, end)?;
        let frequency = Frequency::parse(&self.frequency)?;

        let input = self
            .input
            .clone()
            .ok_or_else(|| ConfigError::MissingValue("--input".to_string()))?;

        let input_format = match self.input_format {
            Some(format) => format,
            None => InputFormat::from_path(&input).ok_or_else(|| {
                ConfigError::InvalidValue(format!(
                    "cannot infer input format from '{}'; pass --input-format",
                    input.display()
                ))
            })?,
        };

        if self.max_buckets == 0 {
            return Err(ConfigError::InvalidValue("--max-buckets must be at least 1".to_string()).into());
        }

        // --save-plot implies --plot
        let plot_path = match (&self.save_path, self.plot) {
            (Some(path), _) => Some(path.clone()),
            (None, true) => Some(PathBuf::from(DEFAULT_PLOT_PATH)),
            (None, false) => None,
        };

        Ok(ValidatedRun {
            range,
            frequency,
            metrics: self.metrics.clone(),
            show_max: self.show_max,
            plot_path,
            input,
            input_format,
            export: self.output.clone().map(|path| (self.backend, path)),
            max_buckets: self.max_buckets,
        })
    }
}

fn parse_required_instant(value: Option<&str>, flag: &str) -> Result<chrono::DateTime<chrono::Utc>, ConfigError> {
    let raw = value.ok_or_else(|| ConfigError::MissingValue(flag.to_string()))?;
    parse_instant(raw).map_err(|e| ConfigError::InvalidValue(format!("{}: {}", flag, e)))
}
