//! # Pipeline
//!
//! Composition layer between the CLI and the aggregation core.
//!
//! - `config` - raw run parameters and their one-time validation
//! - `engine` - `PipelineOrchestrator`, the sole entry point for a run
//! - `error` - errors surfaced to the CLI with their exit codes
//! - `report` - a full run: source, orchestrator, export and plot

pub mod config;
pub mod engine;
pub mod error;
pub mod report;

pub use config::{RunConfig, ValidatedRun, DEFAULT_FREQUENCY, DEFAULT_PLOT_PATH};
pub use engine::PipelineOrchestrator;
pub use error::{ConfigError, PipelineError};
pub use report::execute;
