use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{ArgMatches, CommandFactory, FromArgMatches};
use tokio::time::Instant;

use crate::args::parsers::{parse_duration_arg, parse_rate, parse_worker_count};
use crate::args::{HammerArgs, PositiveUsize};
use crate::config::apply_config;
use crate::config::types::ConfigFile;
use crate::engine::{Outcome, WindowAggregator, WindowSnapshot};
use crate::error::{AppError, AppResult, ConfigError};

thread_local! {
    static BASE_MATCHES: ArgMatches = HammerArgs::command().get_matches_from(["hammer"]);
}

const FUZZ_SOURCE: &str = "<fuzz input>";
const FUZZ_LABELS: [&str; 4] = ["OK", "Not Found", "Request timed out", "Did nothing."];

/// Parses a duration argument (e.g. `10s`, `500ms`).
///
/// # Errors
///
/// Returns an error when the duration is invalid.
pub fn parse_duration_arg_input(input: &str) -> AppResult<Duration> {
    parse_duration_arg(input)
}

/// Parses a target rate under the rate ceiling.
///
/// # Errors
///
/// Returns an error when the value is not a number or exceeds the ceiling.
pub fn parse_rate_input(input: &str) -> AppResult<u64> {
    parse_rate(input)
}

/// Parses a worker count under the worker ceiling.
///
/// # Errors
///
/// Returns an error when the value is not a number or exceeds the ceiling.
pub fn parse_worker_count_input(input: &str) -> AppResult<usize> {
    parse_worker_count(input)
}

/// Parses a positive usize string value.
///
/// # Errors
///
/// Returns an error when the value is invalid or zero.
pub fn parse_positive_usize_input(input: &str) -> AppResult<usize> {
    let value: PositiveUsize = input.parse()?;
    Ok(value.get())
}

/// Parses TOML config and applies it to defaults.
///
/// # Errors
///
/// Returns an error when parsing or validation fails.
pub fn apply_config_from_toml(input: &str) -> AppResult<HammerArgs> {
    let config: ConfigFile = toml::from_str(input).map_err(|err| {
        AppError::config(ConfigError::ParseToml {
            path: PathBuf::from(FUZZ_SOURCE),
            source: err,
        })
    })?;
    apply_config_to_defaults(&config)
}

/// Parses JSON config and applies it to defaults.
///
/// # Errors
///
/// Returns an error when parsing or validation fails.
pub fn apply_config_from_json(input: &[u8]) -> AppResult<HammerArgs> {
    let config: ConfigFile = serde_json::from_slice(input).map_err(|err| {
        AppError::config(ConfigError::ParseJson {
            path: PathBuf::from(FUZZ_SOURCE),
            source: err,
        })
    })?;
    apply_config_to_defaults(&config)
}

/// Loads a config file from disk to exercise extension handling.
///
/// # Errors
///
/// Returns an error when the config file cannot be read or parsed.
pub fn load_config_file_input(path: &Path) -> AppResult<()> {
    crate::config::load_config_file(path).map(|_| ())
}

/// Records outcomes decoded from `data` into a fresh window and returns the
/// snapshot before and after expiring everything.
///
/// Each 3-byte chunk selects a label and a latency in milliseconds; outcomes
/// are observed at increasing offsets from a common start.
#[must_use]
pub fn window_record_input(data: &[u8], window: Duration) -> (WindowSnapshot, WindowSnapshot) {
    let aggregator = WindowAggregator::new(window);
    let mut observed_at = Instant::now();
    for chunk in data.chunks_exact(3) {
        let [selector, high, low] = [chunk.first(), chunk.get(1), chunk.get(2)]
            .map(|byte| byte.copied().unwrap_or_default());
        let label = FUZZ_LABELS
            .get(usize::from(selector).checked_rem(FUZZ_LABELS.len()).unwrap_or(0))
            .copied()
            .unwrap_or("OK");
        let latency = Duration::from_millis(u64::from(u16::from_be_bytes([high, low])));
        observed_at = observed_at
            .checked_add(Duration::from_millis(u64::from(selector)))
            .unwrap_or(observed_at);
        aggregator.record(Outcome::new(label.to_owned(), latency, observed_at));
    }
    let recorded = aggregator.snapshot();

    let horizon = observed_at
        .checked_add(window.saturating_add(Duration::from_secs(1)))
        .unwrap_or(observed_at);
    aggregator.expire_due(horizon);
    (recorded, aggregator.snapshot())
}

fn apply_config_to_defaults(config: &ConfigFile) -> AppResult<HammerArgs> {
    BASE_MATCHES.with(|matches| {
        let mut args = HammerArgs::from_arg_matches(matches)?;
        apply_config(&mut args, matches, config)?;
        Ok(args)
    })
}
