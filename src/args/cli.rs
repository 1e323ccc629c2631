use clap::Parser;
use std::time::Duration;

use super::defaults::{
    DEFAULT_RATE, DEFAULT_REFRESH, DEFAULT_REPORT_INTERVAL, DEFAULT_TIMEOUT, DEFAULT_WINDOW,
    DEFAULT_WORKER_STEP, DEFAULT_WORKERS,
};
use super::parsers::{
    parse_duration_arg, parse_positive_usize, parse_rate, parse_worker_count,
};
use super::types::{FetcherKind, PositiveUsize};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Interactive HTTP load generator. Use the arrow keys to change the request rate and the worker count while the run is live."
)]
pub struct HammerArgs {
    /// Target URL
    #[arg(value_name = "URL")]
    pub url: Option<String>,

    /// Number of concurrent workers
    #[arg(
        long,
        short = 'w',
        default_value = DEFAULT_WORKERS,
        value_parser = parse_worker_count
    )]
    pub workers: usize,

    /// Initial target requests per second (0 starts paused)
    #[arg(long, short = 'r', default_value = DEFAULT_RATE, value_parser = parse_rate)]
    pub rate: u64,

    /// Request executor: go (native client), curl (external process), or noop
    #[arg(long, default_value = "go", ignore_case = true)]
    pub fetcher: FetcherKind,

    /// Per-request timeout (supports ms/s/m/h)
    #[arg(long = "timeout", default_value = DEFAULT_TIMEOUT, value_parser = parse_duration_arg)]
    pub request_timeout: Duration,

    /// How long a response stays in the live statistics (supports ms/s/m/h)
    #[arg(long, default_value = DEFAULT_WINDOW, value_parser = parse_duration_arg)]
    pub window: Duration,

    /// UI refresh interval (supports ms/s/m/h)
    #[arg(long = "refresh", default_value = DEFAULT_REFRESH, value_parser = parse_duration_arg)]
    pub refresh_interval: Duration,

    /// Interval between status log lines when the UI is disabled
    #[arg(
        long = "report-interval",
        default_value = DEFAULT_REPORT_INTERVAL,
        value_parser = parse_duration_arg
    )]
    pub report_interval: Duration,

    /// Workers added or removed per key press
    #[arg(
        long = "worker-step",
        default_value = DEFAULT_WORKER_STEP,
        value_parser = parse_positive_usize
    )]
    pub worker_step: PositiveUsize,

    /// Stop automatically after this long (supports ms/s/m/h)
    #[arg(long, short = 't', value_parser = parse_duration_arg)]
    pub duration: Option<Duration>,

    /// Disable the interactive UI and log a status line periodically instead
    #[arg(long = "no-ui")]
    pub no_ui: bool,

    /// Disable color output (also set by a non-empty NO_COLOR)
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Enable verbose logging (sets log level to debug unless overridden by HAMMER_LOG/RUST_LOG)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Write logs to this file instead of stderr
    #[arg(long = "log-file")]
    pub log_file: Option<String>,

    /// Path to config file (TOML/JSON). Defaults to ./hammer.toml or ./hammer.json if present.
    #[arg(long, short = 'c')]
    pub config: Option<String>,
}
