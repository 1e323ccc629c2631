use std::time::Duration;

use serde::Deserialize;

use crate::args::parsers::parse_duration_arg;
use crate::error::{AppError, AppResult, ConfigError, ValidationError};

/// Settings accepted in `hammer.toml` / `hammer.json`.
///
/// Every field is optional; a value only applies when the matching CLI flag
/// was not passed explicitly.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub url: Option<String>,
    #[serde(alias = "concurrency")]
    pub workers: Option<usize>,
    #[serde(alias = "qps")]
    pub rate: Option<u64>,
    pub fetcher: Option<String>,
    pub timeout: Option<DurationValue>,
    pub window: Option<DurationValue>,
    pub refresh: Option<DurationValue>,
    pub report_interval: Option<DurationValue>,
    pub worker_step: Option<usize>,
    pub duration: Option<DurationValue>,
    pub no_ui: Option<bool>,
    pub no_color: Option<bool>,
    pub verbose: Option<bool>,
    pub log_file: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self, field: &'static str) -> AppResult<Duration> {
        match self {
            DurationValue::Seconds(secs) => {
                if *secs == 0 {
                    Err(AppError::config(ConfigError::InvalidField {
                        field,
                        source: ValidationError::DurationZero,
                    }))
                } else {
                    Ok(Duration::from_secs(*secs))
                }
            }
            DurationValue::Text(text) => parse_duration_arg(text).map_err(|err| match err {
                AppError::Validation(source) => {
                    AppError::config(ConfigError::InvalidField { field, source })
                }
                other => other,
            }),
        }
    }
}
