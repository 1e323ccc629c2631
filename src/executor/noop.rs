use async_trait::async_trait;
use tokio::time::Instant;

use super::{Execution, RequestExecutor};

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopExecutor;

#[async_trait]
impl RequestExecutor for NoopExecutor {
    async fn execute(&self, _target: &str) -> Execution {
        let started = Instant::now();
        Execution {
            classification: "Did nothing.".to_owned(),
            elapsed: started.elapsed(),
        }
    }
}
