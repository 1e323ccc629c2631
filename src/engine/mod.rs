//! Load-generation engine: rate controller, worker pool, sliding-window
//! aggregator and the control surface tying them together.
mod control;
mod pool;
mod rate;
mod window;


use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;
use tracing::{error, info};

use crate::error::AppResult;
use crate::executor::RequestExecutor;
use crate::shutdown::ShutdownSender;

pub use control::{ControlCommand, Controller, Snapshot};
pub use pool::{MAX_WORKERS, WorkerPool};
pub use rate::{MAX_RATE, PermitStream, RateController};
pub use window::{EXPIRY_GRANULARITY, WindowAggregator, WindowSnapshot};

/// Result of one completed request iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub classification: String,
    pub latency: Duration,
    pub observed_at: Instant,
}

impl Outcome {
    #[must_use]
    pub const fn new(classification: String, latency: Duration, observed_at: Instant) -> Self {
        Self {
            classification,
            latency,
            observed_at,
        }
    }
}

/// Startup settings for [`start_engine`].
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub target: String,
    pub workers: usize,
    pub rate: u64,
    pub window: Duration,
}

/// Starts the rate emitter, the expiry timer and the initial workers.
///
/// Must be called from within a tokio runtime.
///
/// # Errors
///
/// Returns an error when the initial rate or worker count exceed their
/// ceilings.
pub fn start_engine(
    settings: &EngineSettings,
    executor: Arc<dyn RequestExecutor>,
    shutdown_tx: &ShutdownSender,
) -> AppResult<Arc<Controller>> {
    let rate = RateController::new(settings.rate)?;
    let aggregator = WindowAggregator::new(settings.window);
    let pool = WorkerPool::new(
        executor,
        &settings.target,
        rate.permits(),
        Arc::clone(&aggregator),
        shutdown_tx,
    );

    drop(rate.spawn(shutdown_tx));
    drop(aggregator.spawn_expiry(shutdown_tx));
    pool.scale_to(settings.workers)?;

    info!(
        "Engine started: target={}, rate={}/s, workers={}, window={:?}",
        settings.target, settings.rate, settings.workers, settings.window
    );

    Ok(Arc::new(Controller::new(rate, pool, aggregator)))
}

/// Locks `mutex`, recovering the inner value if a previous holder panicked.
pub(crate) fn lock_or_recover<'guard, T>(
    mutex: &'guard Mutex<T>,
    name: &str,
) -> MutexGuard<'guard, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            error!("{} lock was poisoned; continuing with recovered state.", name);
            poisoned.into_inner()
        }
    }
}
