use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::parsers::{check_rate, check_worker_count};
use crate::args::{FetcherKind, HammerArgs, PositiveUsize};
use crate::error::{AppError, AppResult, ConfigError, ValidationError};

use super::types::ConfigFile;

/// Applies configuration values to CLI arguments.
///
/// # Errors
///
/// Returns an error when config values are invalid.
pub fn apply_config(
    args: &mut HammerArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_cli(matches, "url")
        && let Some(url) = config.url.clone()
    {
        args.url = Some(url);
    }

    if !is_cli(matches, "workers")
        && let Some(workers) = config.workers
    {
        check_worker_count(workers).map_err(|err| invalid_field("workers", err))?;
        args.workers = workers;
    }

    if !is_cli(matches, "rate")
        && let Some(rate) = config.rate
    {
        check_rate(rate).map_err(|err| invalid_field("rate", err))?;
        args.rate = rate;
    }

    if !is_cli(matches, "fetcher")
        && let Some(fetcher) = config.fetcher.as_deref()
    {
        args.fetcher = fetcher
            .parse::<FetcherKind>()
            .map_err(|err| match err {
                AppError::Validation(source) => invalid_field("fetcher", source),
                other => other,
            })?;
    }

    if !is_cli(matches, "request_timeout")
        && let Some(timeout) = config.timeout.as_ref()
    {
        args.request_timeout = timeout.to_duration("timeout")?;
    }

    if !is_cli(matches, "window")
        && let Some(window) = config.window.as_ref()
    {
        args.window = window.to_duration("window")?;
    }

    if !is_cli(matches, "refresh_interval")
        && let Some(refresh) = config.refresh.as_ref()
    {
        args.refresh_interval = refresh.to_duration("refresh")?;
    }

    if !is_cli(matches, "report_interval")
        && let Some(interval) = config.report_interval.as_ref()
    {
        args.report_interval = interval.to_duration("report_interval")?;
    }

    if !is_cli(matches, "worker_step")
        && let Some(step) = config.worker_step
    {
        args.worker_step =
            PositiveUsize::try_from(step).map_err(|err| invalid_field("worker_step", err))?;
    }

    if !is_cli(matches, "duration")
        && let Some(duration) = config.duration.as_ref()
    {
        args.duration = Some(duration.to_duration("duration")?);
    }

    if !is_cli(matches, "no_ui")
        && let Some(no_ui) = config.no_ui
    {
        args.no_ui = no_ui;
    }

    if !is_cli(matches, "no_color")
        && let Some(no_color) = config.no_color
    {
        args.no_color = no_color;
    }

    if !is_cli(matches, "verbose")
        && let Some(verbose) = config.verbose
    {
        args.verbose = verbose;
    }

    if !is_cli(matches, "log_file")
        && let Some(log_file) = config.log_file.clone()
    {
        args.log_file = Some(log_file);
    }

    Ok(())
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}

fn invalid_field(field: &'static str, source: ValidationError) -> AppError {
    AppError::config(ConfigError::InvalidField { field, source })
}
