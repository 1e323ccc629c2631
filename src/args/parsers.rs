use std::ffi::OsStr;
use std::time::Duration;

use url::Url;

use super::types::PositiveUsize;
use crate::engine::{MAX_RATE, MAX_WORKERS};
use crate::error::{AppError, AppResult, ValidationError};

pub(super) fn parse_positive_usize(s: &str) -> AppResult<PositiveUsize> {
    s.parse::<PositiveUsize>().map_err(AppError::from)
}

/// Parses a target rate in requests per second.
///
/// # Errors
///
/// Returns an error for non-numbers and rates above the ceiling.
pub fn parse_rate(s: &str) -> AppResult<u64> {
    let rate: u64 = s
        .trim()
        .parse()
        .map_err(|err| AppError::validation(ValidationError::InvalidNumber { source: err }))?;
    check_rate(rate)?;
    Ok(rate)
}

/// # Errors
///
/// Returns an error for non-numbers and counts above the ceiling.
pub fn parse_worker_count(s: &str) -> AppResult<usize> {
    let workers: usize = s
        .trim()
        .parse()
        .map_err(|err| AppError::validation(ValidationError::InvalidNumber { source: err }))?;
    check_worker_count(workers)?;
    Ok(workers)
}

/// # Errors
///
/// Returns an error when `rate` exceeds [`MAX_RATE`].
pub const fn check_rate(rate: u64) -> Result<(), ValidationError> {
    if rate > MAX_RATE {
        return Err(ValidationError::RateTooHigh {
            rate,
            max: MAX_RATE,
        });
    }
    Ok(())
}

/// # Errors
///
/// Returns an error when `workers` exceeds [`MAX_WORKERS`].
pub const fn check_worker_count(workers: usize) -> Result<(), ValidationError> {
    if workers > MAX_WORKERS {
        return Err(ValidationError::WorkersTooHigh {
            workers,
            max: MAX_WORKERS,
        });
    }
    Ok(())
}

/// Applies the `NO_COLOR` convention: any non-empty value disables color.
#[must_use]
pub fn no_color_requested(value: Option<&OsStr>) -> bool {
    value.is_some_and(|value| !value.is_empty())
}

/// Checks that the target is an absolute http(s) URL.
///
/// # Errors
///
/// Returns an error when the URL does not parse or uses another scheme.
pub fn validate_target_url(value: &str) -> AppResult<Url> {
    let parsed = Url::parse(value).map_err(|err| {
        AppError::validation(ValidationError::InvalidUrl {
            url: value.to_owned(),
            source: err,
        })
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(AppError::validation(ValidationError::UnsupportedScheme {
            scheme: other.to_owned(),
        })),
    }
}

/// Parses `250ms`, `5s`, `2m`, `1h`, or bare seconds.
///
/// # Errors
///
/// Returns an error for malformed, overflowing or zero durations.
pub fn parse_duration_arg(s: &str) -> AppResult<Duration> {
    let value = s.trim();
    if value.is_empty() {
        return Err(AppError::validation(ValidationError::DurationEmpty));
    }

    let mut digits_len = 0usize;
    for ch in value.chars() {
        if ch.is_ascii_digit() {
            digits_len = digits_len.saturating_add(1);
        } else {
            break;
        }
    }
    if digits_len == 0 {
        return Err(AppError::validation(
            ValidationError::InvalidDurationFormat {
                value: value.to_owned(),
            },
        ));
    }
    let (num_part, unit_part) = value.split_at(digits_len);
    let number: u64 = num_part.parse().map_err(|err| {
        AppError::validation(ValidationError::InvalidDurationNumber {
            value: value.to_owned(),
            source: err,
        })
    })?;

    let unit = if unit_part.is_empty() { "s" } else { unit_part };
    let duration = match unit {
        "ms" => Duration::from_millis(number),
        "s" => Duration::from_secs(number),
        "m" => {
            let secs = number
                .checked_mul(60)
                .ok_or_else(|| AppError::validation(ValidationError::DurationOverflow))?;
            Duration::from_secs(secs)
        }
        "h" => {
            let secs = number
                .checked_mul(60)
                .and_then(|seconds| seconds.checked_mul(60))
                .ok_or_else(|| AppError::validation(ValidationError::DurationOverflow))?;
            Duration::from_secs(secs)
        }
        _ => {
            return Err(AppError::validation(ValidationError::InvalidDurationUnit {
                unit: unit.to_owned(),
            }));
        }
    };

    if duration.as_millis() == 0 {
        return Err(AppError::validation(ValidationError::DurationZero));
    }

    Ok(duration)
}
