use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval};
use tracing::debug;

use crate::args::parsers::check_rate;
use crate::error::ValidationError;
use crate::shutdown::ShutdownSender;

/// Highest accepted target rate, in requests per second.
pub const MAX_RATE: u64 = 1_000_000;

/// Length of one quota period.
const QUOTA_PERIOD: Duration = Duration::from_secs(1);
/// Number of pacing slices a quota period is split into.
const PERMIT_SLICES: u64 = 100;
/// Length of one pacing slice (`QUOTA_PERIOD / PERMIT_SLICES`).
const SLICE: Duration = Duration::from_millis(10);

/// Issues request permissions at the current target rate.
///
/// Permits live in a semaphore; the emission loop started by
/// [`RateController::spawn`] releases them in 10 ms slices so that one
/// quota period hands out exactly `rate` permits. Unconsumed permits never
/// exceed one period's quota.
#[derive(Debug)]
pub struct RateController {
    rate: AtomicU64,
    permits: Arc<Semaphore>,
    released: AtomicU64,
}

impl RateController {
    /// # Errors
    ///
    /// Returns an error when `initial_rate` exceeds [`MAX_RATE`].
    pub fn new(initial_rate: u64) -> Result<Arc<Self>, ValidationError> {
        check_rate(initial_rate)?;
        Ok(Arc::new(Self {
            rate: AtomicU64::new(initial_rate),
            permits: Arc::new(Semaphore::new(0)),
            released: AtomicU64::new(0),
        }))
    }

    #[must_use]
    pub fn rate(&self) -> u64 {
        self.rate.load(Ordering::Acquire)
    }

    /// Sets the target rate; takes effect at the next pacing slice.
    ///
    /// # Errors
    ///
    /// Returns an error when `rate` exceeds [`MAX_RATE`].
    pub fn set_rate(&self, rate: u64) -> Result<(), ValidationError> {
        check_rate(rate)?;
        let previous = self.rate.swap(rate, Ordering::AcqRel);
        if rate < previous {
            self.withdraw_surplus(rate);
        }
        debug!("Target rate changed: {} -> {}", previous, rate);
        Ok(())
    }

    /// Doubles the rate (0 becomes 1), saturating at [`MAX_RATE`].
    #[must_use]
    pub fn increase_rate(&self) -> u64 {
        let previous = self
            .rate
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |rate| {
                Some(doubled_rate(rate))
            })
            .unwrap_or_else(|rate| rate);
        doubled_rate(previous)
    }

    /// Halves the rate; 1 becomes 0, which pauses emission.
    #[must_use]
    pub fn decrease_rate(&self) -> u64 {
        let previous = self
            .rate
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |rate| Some(halved_rate(rate)))
            .unwrap_or_else(|rate| rate);
        let current = halved_rate(previous);
        self.withdraw_surplus(current);
        current
    }

    #[must_use]
    pub fn permits(&self) -> PermitStream {
        PermitStream {
            permits: Arc::clone(&self.permits),
        }
    }

    /// Total permits released since start.
    #[must_use]
    pub fn released_permits(&self) -> u64 {
        self.released.load(Ordering::Relaxed)
    }

    /// Permits released but not yet consumed.
    #[must_use]
    pub fn buffered_permits(&self) -> usize {
        self.permits.available_permits()
    }

    /// Starts the emission loop. It stops, and closes the permit stream,
    /// once shutdown is broadcast.
    pub fn spawn(self: &Arc<Self>, shutdown_tx: &ShutdownSender) -> JoinHandle<()> {
        let controller = Arc::clone(self);
        let mut shutdown_rx = shutdown_tx.subscribe();
        tokio::spawn(async move {
            let mut tick = interval(SLICE);
            tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut pacer = Pacer::new(Instant::now(), controller.rate());
            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => break,
                    now = tick.tick() => {
                        let due = pacer.advance(now, controller.rate());
                        controller.release(due);
                    }
                }
            }
            controller.permits.close();
        })
    }

    /// Releases `due` permits right away, as one pacing slice would.
    #[cfg(test)]
    pub(crate) fn release_now(&self, due: u64) {
        self.release(due);
    }

    fn release(&self, due: u64) {
        let cap = self.rate();
        let available = u64::try_from(self.permits.available_permits()).unwrap_or(u64::MAX);
        if available > cap {
            self.withdraw_surplus(cap);
            return;
        }
        let room = cap.saturating_sub(available);
        let granted = due.min(room);
        if granted > 0 {
            self.permits
                .add_permits(usize::try_from(granted).unwrap_or(usize::MAX));
            self.released.fetch_add(granted, Ordering::Relaxed);
        }
    }

    /// Forgets buffered permits above `cap`.
    fn withdraw_surplus(&self, cap: u64) {
        let available = u64::try_from(self.permits.available_permits()).unwrap_or(u64::MAX);
        let surplus = available.saturating_sub(cap);
        if surplus == 0 {
            return;
        }
        // Consumers may race us; whatever is left is trimmed on the next slice.
        if let Ok(permits) = self
            .permits
            .try_acquire_many(u32::try_from(surplus).unwrap_or(u32::MAX))
        {
            permits.forget();
        }
    }
}

const fn halved_rate(rate: u64) -> u64 {
    rate.saturating_div(2)
}

const fn doubled_rate(rate: u64) -> u64 {
    if rate == 0 {
        1
    } else {
        let doubled = rate.saturating_mul(2);
        if doubled > MAX_RATE { MAX_RATE } else { doubled }
    }
}

/// Tracks how many permits the current quota period has released.
#[derive(Debug)]
struct Pacer {
    period_start: Instant,
    released: u64,
    last_rate: u64,
}

impl Pacer {
    const fn new(start: Instant, rate: u64) -> Self {
        Self {
            period_start: start,
            released: 0,
            last_rate: rate,
        }
    }

    /// Returns how many permits are due at `now` for `rate`.
    fn advance(&mut self, now: Instant, rate: u64) -> u64 {
        let mut elapsed = now.saturating_duration_since(self.period_start);
        if elapsed >= QUOTA_PERIOD {
            self.period_start = if elapsed >= QUOTA_PERIOD.saturating_mul(2) {
                now
            } else {
                self.period_start
                    .checked_add(QUOTA_PERIOD)
                    .unwrap_or(now)
            };
            self.released = 0;
            elapsed = now.saturating_duration_since(self.period_start);
        }

        let slice = slice_index(elapsed);
        let target = rate
            .saturating_mul(slice.saturating_add(1))
            .div_ceil(PERMIT_SLICES);
        if rate != self.last_rate {
            self.released = self.rebased(rate, slice, target);
            self.last_rate = rate;
        }

        let due = target.saturating_sub(self.released);
        self.released = self.released.max(target);
        due
    }
}

impl Pacer {
    /// Permits counted as already released this period after switching to
    /// `rate` at `slice`.
    ///
    /// Never drops below what the period really released, so a change can
    /// not hand out more than `max(released, rate)` in one period. Leaving a
    /// pause releases the next permit at once when the period has room.
    fn rebased(&self, rate: u64, slice: u64, target: u64) -> u64 {
        let elapsed_share = rate.saturating_mul(slice).div_ceil(PERMIT_SLICES);
        let rebased = self.released.max(elapsed_share);
        if self.last_rate == 0 {
            rebased
                .min(target.saturating_sub(1))
                .max(self.released)
        } else {
            rebased
        }
    }
}

fn slice_index(elapsed: Duration) -> u64 {
    let index = elapsed
        .as_millis()
        .checked_div(SLICE.as_millis())
        .unwrap_or(0);
    u64::try_from(index)
        .unwrap_or(u64::MAX)
        .min(PERMIT_SLICES.saturating_sub(1))
}

/// Cloneable handle workers use to wait for permission to send.
#[derive(Debug, Clone)]
pub struct PermitStream {
    permits: Arc<Semaphore>,
}

impl PermitStream {
    /// Waits for one permit and consumes it. Returns `false` once the
    /// stream is closed.
    ///
    /// Dropping the returned future before it completes consumes nothing.
    pub async fn next(&self) -> bool {
        match self.permits.acquire().await {
            Ok(permit) => {
                permit.forget();
                true
            }
            Err(_) => false,
        }
    }
}
