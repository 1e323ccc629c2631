use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::error::ValidationError;

use super::{RateController, WindowAggregator, WorkerPool};

/// Commands the input handler sends to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    IncreaseRate,
    DecreaseRate,
    IncreaseWorkers(usize),
    DecreaseWorkers(usize),
}

/// Everything the display needs for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub target_rate: u64,
    pub worker_count: usize,
    pub active_workers: usize,
    /// Counts per classification in the window, ordered by label.
    pub status_counts: Vec<(String, u64)>,
    pub max_latency: Duration,
    pub window: Duration,
}

impl Snapshot {
    #[must_use]
    pub fn has_responses(&self) -> bool {
        self.status_counts.iter().any(|(_, count)| *count > 0)
    }
}

/// Control surface over a running engine; safe to share across threads.
#[derive(Debug)]
pub struct Controller {
    rate: Arc<RateController>,
    pool: Arc<WorkerPool>,
    aggregator: Arc<WindowAggregator>,
}

impl Controller {
    #[must_use]
    pub const fn new(
        rate: Arc<RateController>,
        pool: Arc<WorkerPool>,
        aggregator: Arc<WindowAggregator>,
    ) -> Self {
        Self {
            rate,
            pool,
            aggregator,
        }
    }

    /// # Errors
    ///
    /// Returns an error when `rate` is above the rate ceiling.
    pub fn set_rate(&self, rate: u64) -> Result<(), ValidationError> {
        self.rate.set_rate(rate)
    }

    #[must_use]
    pub fn increase_rate(&self) -> u64 {
        self.rate.increase_rate()
    }

    #[must_use]
    pub fn decrease_rate(&self) -> u64 {
        self.rate.decrease_rate()
    }

    /// # Errors
    ///
    /// Returns an error when `workers` is above the worker ceiling.
    pub fn set_worker_count(&self, workers: usize) -> Result<(), ValidationError> {
        self.pool.scale_to(workers)
    }

    #[must_use]
    pub fn increase_workers(&self, count: usize) -> usize {
        self.pool.grow(count)
    }

    #[must_use]
    pub fn decrease_workers(&self, count: usize) -> usize {
        self.pool.shrink(count)
    }

    /// Applies one input command. Commands never fail; ceilings clamp.
    pub fn apply(&self, command: ControlCommand) {
        match command {
            ControlCommand::IncreaseRate => {
                let previous = self.rate.rate();
                let rate = self.increase_rate();
                if rate == previous {
                    info!("Target rate is already at its maximum of {}/s.", rate);
                } else {
                    info!("Target rate: {}/s", rate);
                }
            }
            ControlCommand::DecreaseRate => {
                let rate = self.decrease_rate();
                info!("Target rate: {}/s", rate);
            }
            ControlCommand::IncreaseWorkers(count) => {
                let previous = self.pool.worker_count();
                let workers = self.increase_workers(count);
                if workers == previous {
                    info!("Worker count is already at its maximum of {}.", workers);
                }
            }
            ControlCommand::DecreaseWorkers(count) => {
                let workers = self.decrease_workers(count);
                if workers == 0 {
                    info!("All workers stopped.");
                }
            }
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let window = self.aggregator.snapshot();
        Snapshot {
            target_rate: self.rate.rate(),
            worker_count: self.pool.worker_count(),
            active_workers: self.pool.active_workers(),
            status_counts: window.status_counts,
            max_latency: window.max_latency,
            window: self.aggregator.window(),
        }
    }

    #[must_use]
    pub fn completed_requests(&self) -> u64 {
        self.pool.completed_requests()
    }
}
