//! Pointing Report - bins telescope pointing errors over a time window
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --bin pointing_report -- \
//!     --start-time 2025-12-21T00:00:00 --end-time 2025-12-21T06:00:00 \
//!     --frequency 30min --input data/pointing.csv --show-max-error --plot
//! ```
//!
//! ## Environment Variables
//!
//! - POINTING_START_TIME / POINTING_END_TIME - analysis window (ISO-8601)
//! - POINTING_FREQUENCY - bucket width (default: 30min)
//! - POINTING_INPUT - sample file (.jsonl, .csv, .tsv, .db)
//! - POINTING_INPUT_FORMAT - override format inference (jsonl, csv, tsv, sqlite)
//! - POINTING_METRICS - comma list of count, mean, max (default: all)
//! - POINTING_BACKEND - export backend when --output is given (jsonl or sqlite)
//! - POINTING_OUTPUT - export destination
//! - RUST_LOG - Logging level (optional, default: info)
//!
//! Exit codes: 0 success (including an empty sample set), 2 invalid
//! parameters, 3 corrupt sample data, 4 source or export I/O failure.

use clap::Parser;
use pointing_errors::aggregator_core::{MetricSet, DEFAULT_MAX_BUCKETS};
use pointing_errors::output::{render_table, BackendType};
use pointing_errors::pipeline::{self, RunConfig, DEFAULT_FREQUENCY};
use pointing_errors::sources::InputFormat;
use std::path::PathBuf;
use std::process::ExitCode;

fn parse_input_format(s: &str) -> Result<InputFormat, String> {
    InputFormat::from_str(s)
        .ok_or_else(|| format!("unknown input format '{}' (expected jsonl, csv, tsv, sqlite)", s))
}

fn parse_backend(s: &str) -> Result<BackendType, String> {
    BackendType::from_str(s).ok_or_else(|| format!("unknown backend '{}' (expected jsonl, sqlite)", s))
}

#[derive(Parser, Debug)]
#[command(name = "pointing_report", about = "Aggregate telescope pointing errors into time buckets")]
struct Args {
    /// Start of the analysis window (inclusive), ISO-8601
    #[arg(long, env = "POINTING_START_TIME")]
    start_time: Option<String>,

    /// End of the analysis window (exclusive), ISO-8601
    #[arg(long, env = "POINTING_END_TIME")]
    end_time: Option<String>,

    /// Bucket width, e.g. 30min, 1h, 90s
    #[arg(long, env = "POINTING_FREQUENCY", default_value = DEFAULT_FREQUENCY)]
    frequency: String,

    /// Report the largest error and highlight it on the plot
    #[arg(long, default_value_t = false)]
    show_max_error: bool,

    /// Render a plot (to plots/pointing_errors.png unless --save-plot is given)
    #[arg(long, default_value_t = false)]
    plot: bool,

    /// Plot destination; .svg renders SVG, anything else PNG
    #[arg(long)]
    save_plot: Option<PathBuf>,

    /// Sample file
    #[arg(long, env = "POINTING_INPUT")]
    input: Option<PathBuf>,

    /// Input format, inferred from the file extension when omitted
    #[arg(long, env = "POINTING_INPUT_FORMAT", value_parser = parse_input_format)]
    input_format: Option<InputFormat>,

    /// Statistics to compute (count is always included)
    #[arg(long, env = "POINTING_METRICS", default_value = "count,mean,max")]
    metrics: MetricSet,

    /// Export backend used with --output
    #[arg(long, env = "POINTING_BACKEND", default_value = "jsonl", value_parser = parse_backend)]
    backend: BackendType,

    /// Export destination
    #[arg(long, env = "POINTING_OUTPUT")]
    output: Option<PathBuf>,

    /// Refuse plans with more buckets than this
    #[arg(long, default_value_t = DEFAULT_MAX_BUCKETS)]
    max_buckets: usize,
}

impl From<Args> for RunConfig {
    fn from(args: Args) -> Self {
        RunConfig {
            start: args.start_time,
            end: args.end_time,
            frequency: args.frequency,
            metrics: args.metrics,
            show_max: args.show_max_error,
            plot: args.plot,
            save_path: args.save_plot,
            input: args.input,
            input_format: args.input_format,
            backend: args.backend,
            output: args.output,
            max_buckets: args.max_buckets,
        }
    }
}

fn main() -> ExitCode {
    dotenv::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let config = RunConfig::from(Args::parse());

    let run = match config.validate() {
        Ok(run) => run,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(e.exit_code());
        }
    };

    log::info!("🚀 Starting pointing-error report");
    log::info!("   Window: {}", run.range);
    log::info!("   Frequency: {}", run.frequency);
    log::info!("   Metrics: {}", run.metrics);
    log::info!("   Input: {} ({})", run.input.display(), run.input_format.as_str());
    if let Some((backend, path)) = &run.export {
        log::info!("   Export: {} ({})", path.display(), backend.as_str());
    }
    if let Some(path) = &run.plot_path {
        log::info!("   Plot: {}", path.display());
    }

    match pipeline::execute(&run) {
        Ok(series) => {
            print!("{}", render_table(&series, run.show_max));
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("❌ Report failed: {}", e);
            eprintln!("error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
