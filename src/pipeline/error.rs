//! Errors surfaced to the CLI layer and their exit codes

use crate::error::PointingError;
use crate::output::AggregatorWriterError;
use crate::sources::SourceError;

#[derive(Debug)]
pub enum ConfigError {
    MissingValue(String),
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingValue(name) => write!(f, "Missing configuration value: {}", name),
            ConfigError::InvalidValue(msg) => write!(f, "Invalid configuration value: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug)]
pub enum PipelineError {
    Config(ConfigError),
    Core(PointingError),
    Source(SourceError),
    Output(AggregatorWriterError),
}

impl PipelineError {
    /// 2: bad parameters, 3: corrupt data, 4: source/export I/O
    pub fn exit_code(&self) -> u8 {
        match self {
            PipelineError::Config(_) => 2,
            PipelineError::Core(e) if e.is_data_integrity() => 3,
            PipelineError::Core(_) => 2,
            PipelineError::Source(_) | PipelineError::Output(_) => 4,
        }
    }
}

impl From<ConfigError> for PipelineError {
    fn from(err: ConfigError) -> Self {
        PipelineError::Config(err)
    }
}

impl From<PointingError> for PipelineError {
    fn from(err: PointingError) -> Self {
        PipelineError::Core(err)
    }
}

impl From<SourceError> for PipelineError {
    fn from(err: SourceError) -> Self {
        PipelineError::Source(err)
    }
}

impl From<AggregatorWriterError> for PipelineError {
    fn from(err: AggregatorWriterError) -> Self {
        PipelineError::Output(err)
    }
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::Config(e) => write!(f, "{}", e),
            PipelineError::Core(e) => write!(f, "{}", e),
            PipelineError::Source(e) => write!(f, "Sample source error: {}", e),
            PipelineError::Output(e) => write!(f, "Output error: {}", e),
        }
    }
}

impl std::error::Error for PipelineError {}
