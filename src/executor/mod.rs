//! Strategies for issuing one request against the target.
//!
//! Executors never fail: transport errors, timeouts and bad statuses all
//! become a classification label.
mod native;
mod noop;
mod process;

#[cfg(test)]
mod tests;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::args::FetcherKind;
use crate::error::AppResult;

pub use native::NativeExecutor;
pub use noop::NoopExecutor;
pub use process::ProcessExecutor;

/// Label used by every executor when a request exceeds its timeout.
pub const TIMEOUT_LABEL: &str = "Request timed out";

/// Classification and duration of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    pub classification: String,
    pub elapsed: Duration,
}

#[async_trait]
pub trait RequestExecutor: Send + Sync {
    async fn execute(&self, target: &str) -> Execution;
}

/// Builds the executor selected with `--fetcher`.
///
/// # Errors
///
/// Returns an error when the HTTP client cannot be built.
pub fn build_executor(
    kind: FetcherKind,
    request_timeout: Duration,
) -> AppResult<Arc<dyn RequestExecutor>> {
    let executor: Arc<dyn RequestExecutor> = match kind {
        FetcherKind::Native => Arc::new(NativeExecutor::new(request_timeout)?),
        FetcherKind::Curl => Arc::new(ProcessExecutor::new(request_timeout)),
        FetcherKind::Noop => Arc::new(NoopExecutor),
    };
    Ok(executor)
}

/// Canonical reason phrase for `code`, or the number when there is none.
#[must_use]
pub fn status_label(code: u16) -> String {
    StatusCode::from_u16(code)
        .ok()
        .and_then(|status| status.canonical_reason())
        .map_or_else(|| code.to_string(), str::to_owned)
}
