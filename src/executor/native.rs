use std::error::Error as StdError;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tokio::time::Instant;

use crate::args::DEFAULT_USER_AGENT;
use crate::error::ExecutorError;

use super::{Execution, RequestExecutor, TIMEOUT_LABEL, status_label};

/// Issues GET requests with an in-process HTTP client shared by all workers.
#[derive(Debug, Clone)]
pub struct NativeExecutor {
    client: Client,
}

impl NativeExecutor {
    /// # Errors
    ///
    /// Returns an error when the client cannot be built.
    pub fn new(request_timeout: Duration) -> Result<Self, ExecutorError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(|source| ExecutorError::BuildClient { source })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl RequestExecutor for NativeExecutor {
    async fn execute(&self, target: &str) -> Execution {
        let started = Instant::now();
        let classification = match self.client.get(target).send().await {
            Ok(response) => {
                let status = response.status();
                match response.bytes().await {
                    Ok(_) => status_label(status.as_u16()),
                    Err(err) if err.is_timeout() => TIMEOUT_LABEL.to_owned(),
                    Err(err) => format!("Failed to read response body: {}", innermost_message(&err)),
                }
            }
            Err(err) if err.is_timeout() => TIMEOUT_LABEL.to_owned(),
            Err(err) => innermost_message(&err),
        };
        Execution {
            classification,
            elapsed: started.elapsed(),
        }
    }
}

/// Message of the deepest error in the source chain, e.g.
/// `Connection refused (os error 111)` rather than the full request context.
fn innermost_message(err: &reqwest::Error) -> String {
    let mut current: &dyn StdError = err;
    while let Some(source) = current.source() {
        current = source;
    }
    current.to_string()
}
