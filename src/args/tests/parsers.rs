use super::*;
use crate::engine::{MAX_RATE, MAX_WORKERS};

#[test]
fn parse_duration_units() -> AppResult<()> {
    let cases = [
        ("250ms", Duration::from_millis(250)),
        ("3", Duration::from_secs(3)),
        ("3s", Duration::from_secs(3)),
        ("2m", Duration::from_secs(120)),
        ("1h", Duration::from_secs(3600)),
    ];
    for (input, expected) in cases {
        let parsed = parse_duration_arg(input)?;
        if parsed != expected {
            return Err(AppError::validation(format!(
                "Unexpected duration for '{}': {:?}",
                input, parsed
            )));
        }
    }
    Ok(())
}

#[test]
fn parse_duration_rejects_invalid() -> AppResult<()> {
    for input in ["", "ms", "0s", "10d", "-1s"] {
        if parse_duration_arg(input).is_ok() {
            return Err(AppError::validation(format!(
                "Expected '{}' to be rejected",
                input
            )));
        }
    }
    Ok(())
}

#[test]
fn parse_rate_enforces_ceiling() -> AppResult<()> {
    if parse_rate("0")? != 0 {
        return Err(AppError::validation("Expected rate 0"));
    }
    if parse_rate(&MAX_RATE.to_string())? != MAX_RATE {
        return Err(AppError::validation("Expected MAX_RATE to be accepted"));
    }
    if parse_rate(&MAX_RATE.saturating_add(1).to_string()).is_ok() {
        return Err(AppError::validation("Expected rate above MAX_RATE to fail"));
    }
    Ok(())
}

#[test]
fn parse_worker_count_enforces_ceiling() -> AppResult<()> {
    if parse_worker_count(&MAX_WORKERS.to_string())? != MAX_WORKERS {
        return Err(AppError::validation("Expected MAX_WORKERS to be accepted"));
    }
    if parse_worker_count(&MAX_WORKERS.saturating_add(1).to_string()).is_ok() {
        return Err(AppError::validation(
            "Expected workers above MAX_WORKERS to fail",
        ));
    }
    if parse_worker_count("-1").is_ok() {
        return Err(AppError::validation("Expected negative workers to fail"));
    }
    Ok(())
}

#[test]
fn no_color_accepts_any_non_empty_value() -> AppResult<()> {
    for value in ["1", "true", "always", "0", "false"] {
        if !no_color_requested(Some(std::ffi::OsStr::new(value))) {
            return Err(AppError::validation(format!(
                "Expected NO_COLOR='{}' to disable color",
                value
            )));
        }
    }
    if no_color_requested(Some(std::ffi::OsStr::new(""))) || no_color_requested(None) {
        return Err(AppError::validation(
            "Expected an empty or unset NO_COLOR to keep color",
        ));
    }
    Ok(())
}

#[test]
fn validate_target_url_checks_scheme() -> AppResult<()> {
    use super::super::parsers::validate_target_url;

    validate_target_url("http://127.0.0.1:8080/")?;
    validate_target_url("https://example.com")?;
    if validate_target_url("ftp://example.com").is_ok() {
        return Err(AppError::validation("Expected ftp to be rejected"));
    }
    if validate_target_url("not a url").is_ok() {
        return Err(AppError::validation("Expected garbage to be rejected"));
    }
    Ok(())
}
