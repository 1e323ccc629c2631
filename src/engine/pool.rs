use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::args::parsers::check_worker_count;
use crate::error::ValidationError;
use crate::executor::RequestExecutor;
use crate::shutdown::ShutdownSender;

use super::{Outcome, PermitStream, WindowAggregator, lock_or_recover};

/// Highest accepted worker count.
pub const MAX_WORKERS: usize = 100_000;

/// Stop signal for one running worker. Dropping it also stops the worker.
#[derive(Debug)]
struct WorkerHandle {
    stop_tx: watch::Sender<bool>,
}

impl WorkerHandle {
    fn stop(self) {
        drop(self.stop_tx.send(true));
    }
}

/// Shared by every worker task.
struct WorkerContext {
    executor: Arc<dyn RequestExecutor>,
    target: Arc<str>,
    permits: PermitStream,
    aggregator: Arc<WindowAggregator>,
    shutdown_tx: ShutdownSender,
    active: Arc<AtomicUsize>,
    completed: Arc<AtomicU64>,
}

/// A resizable set of workers, each looping: wait for a permit, execute one
/// request, record the outcome.
pub struct WorkerPool {
    context: Arc<WorkerContext>,
    runtime: Handle,
    workers: Mutex<Vec<WorkerHandle>>,
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("target", &self.context.target)
            .field("worker_count", &self.worker_count())
            .field("active_workers", &self.active_workers())
            .finish_non_exhaustive()
    }
}

impl WorkerPool {
    /// Creates an empty pool. Must be called from within a tokio runtime;
    /// later resizes may come from any thread.
    #[must_use]
    pub fn new(
        executor: Arc<dyn RequestExecutor>,
        target: &str,
        permits: PermitStream,
        aggregator: Arc<WindowAggregator>,
        shutdown_tx: &ShutdownSender,
    ) -> Arc<Self> {
        Arc::new(Self {
            context: Arc::new(WorkerContext {
                executor,
                target: Arc::from(target),
                permits,
                aggregator,
                shutdown_tx: shutdown_tx.clone(),
                active: Arc::new(AtomicUsize::new(0)),
                completed: Arc::new(AtomicU64::new(0)),
            }),
            runtime: Handle::current(),
            workers: Mutex::new(Vec::new()),
        })
    }

    /// Configured number of workers.
    #[must_use]
    pub fn worker_count(&self) -> usize {
        lock_or_recover(&self.workers, "worker list").len()
    }

    /// Workers still looping, including stopped ones finishing a request.
    #[must_use]
    pub fn active_workers(&self) -> usize {
        self.context.active.load(Ordering::Acquire)
    }

    /// Request iterations completed since start.
    #[must_use]
    pub fn completed_requests(&self) -> u64 {
        self.context.completed.load(Ordering::Relaxed)
    }

    /// Grows or shrinks the pool to exactly `target` workers.
    ///
    /// Stopped workers finish any in-flight request before exiting.
    ///
    /// # Errors
    ///
    /// Returns an error when `target` exceeds [`MAX_WORKERS`].
    pub fn scale_to(&self, target: usize) -> Result<(), ValidationError> {
        check_worker_count(target)?;
        self.resize(|_| target);
        Ok(())
    }

    /// Adds `count` workers, clamped at [`MAX_WORKERS`]. Returns the new size.
    #[must_use]
    pub fn grow(&self, count: usize) -> usize {
        self.resize(|current| current.saturating_add(count).min(MAX_WORKERS))
    }

    /// Stops `count` workers, never going below zero. Returns the new size.
    #[must_use]
    pub fn shrink(&self, count: usize) -> usize {
        self.resize(|current| current.saturating_sub(count))
    }

    fn resize<F>(&self, target_for: F) -> usize
    where
        F: FnOnce(usize) -> usize,
    {
        let mut workers = lock_or_recover(&self.workers, "worker list");
        let current = workers.len();
        let target = target_for(current);
        if target > current {
            workers.reserve(target.saturating_sub(current));
            for _ in current..target {
                workers.push(self.spawn_worker());
            }
        } else if target < current {
            // Newest workers go first.
            for worker in workers.split_off(target) {
                worker.stop();
            }
        }
        if target != current {
            info!("Worker count changed: {} -> {}", current, target);
        }
        target
    }

    fn spawn_worker(&self) -> WorkerHandle {
        let (stop_tx, stop_rx) = watch::channel(false);
        let context = Arc::clone(&self.context);
        let active = ActiveGuard::enter(&context.active);
        drop(self.runtime.spawn(run_worker(context, stop_rx, active)));
        WorkerHandle { stop_tx }
    }
}

/// Counts a worker as active until dropped.
struct ActiveGuard {
    active: Arc<AtomicUsize>,
}

impl ActiveGuard {
    fn enter(active: &Arc<AtomicUsize>) -> Self {
        active.fetch_add(1, Ordering::AcqRel);
        Self {
            active: Arc::clone(active),
        }
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::AcqRel);
    }
}

async fn run_worker(
    context: Arc<WorkerContext>,
    mut stop_rx: watch::Receiver<bool>,
    active: ActiveGuard,
) {
    let mut shutdown_rx = context.shutdown_tx.subscribe();
    loop {
        if *stop_rx.borrow_and_update() {
            break;
        }

        // A pending stop beats a permit that became ready at the same time.
        let permitted = tokio::select! {
            biased;
            changed = stop_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                continue;
            }
            _ = shutdown_rx.recv() => break,
            permitted = context.permits.next() => permitted,
        };
        if !permitted {
            break;
        }

        // Scale-down does not interrupt a request already in flight.
        let execution = tokio::select! {
            _ = shutdown_rx.recv() => break,
            execution = context.executor.execute(&context.target) => execution,
        };
        context.aggregator.record(Outcome::new(
            execution.classification,
            execution.elapsed,
            Instant::now(),
        ));
        context.completed.fetch_add(1, Ordering::Relaxed);
    }
    drop(active);
    debug!("Worker stopped.");
}
