use clap::ValueEnum;
use std::num::NonZeroUsize;

use crate::error::{AppError, ValidationError};

/// Strategy used by workers to issue one request.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum FetcherKind {
    /// In-process HTTP client.
    #[value(name = "go", alias = "native")]
    Native,
    /// Shell out to `curl` once per request.
    Curl,
    /// Do nothing; useful to measure the engine itself.
    Noop,
}

impl FetcherKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            FetcherKind::Native => "go",
            FetcherKind::Curl => "curl",
            FetcherKind::Noop => "noop",
        }
    }
}

impl std::str::FromStr for FetcherKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "go" | "native" => Ok(FetcherKind::Native),
            "curl" => Ok(FetcherKind::Curl),
            "noop" => Ok(FetcherKind::Noop),
            _ => Err(AppError::validation(ValidationError::UnknownFetcher {
                value: s.to_owned(),
            })),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositiveUsize(NonZeroUsize);

impl PositiveUsize {
    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl TryFrom<usize> for PositiveUsize {
    type Error = ValidationError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        NonZeroUsize::new(value)
            .map(PositiveUsize)
            .ok_or(ValidationError::ValueTooSmall { min: 1 })
    }
}

impl std::str::FromStr for PositiveUsize {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: usize = s
            .parse()
            .map_err(|err| ValidationError::InvalidNumber { source: err })?;
        PositiveUsize::try_from(value)
    }
}

impl From<PositiveUsize> for usize {
    fn from(value: PositiveUsize) -> Self {
        value.get()
    }
}
