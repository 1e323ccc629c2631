use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval};
use tracing::error;

use crate::shutdown::ShutdownSender;

use super::{Outcome, lock_or_recover};

/// Rounding applied to expiry deadlines, and the expiry timer period.
pub const EXPIRY_GRANULARITY: Duration = Duration::from_millis(10);
/// Width of one latency histogram bucket, in microseconds.
const LATENCY_BUCKET_MICROS: u64 = 100;

/// Point-in-time view of the sliding window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowSnapshot {
    /// Counts per classification, ordered by label.
    pub status_counts: Vec<(String, u64)>,
    pub max_latency: Duration,
}

#[derive(Debug)]
struct ExpiryBucket {
    due_tick: u64,
    entries: Vec<(String, u64)>,
}

/// Keeps status and latency histograms over the last `window` of outcomes.
///
/// Every recorded outcome is queued for removal at `observed_at + window`
/// rounded up to [`EXPIRY_GRANULARITY`]; the task started by
/// [`WindowAggregator::spawn_expiry`] applies due removals every 10 ms, so an
/// outcome stays visible for at least `window` and less than
/// `window + 20ms`.
#[derive(Debug)]
pub struct WindowAggregator {
    window: Duration,
    origin: Instant,
    statuses: Mutex<BTreeMap<String, u64>>,
    latencies: Mutex<BTreeMap<u64, u64>>,
    expiries: Mutex<VecDeque<ExpiryBucket>>,
}

impl WindowAggregator {
    #[must_use]
    pub fn new(window: Duration) -> Arc<Self> {
        Arc::new(Self {
            window,
            origin: Instant::now(),
            statuses: Mutex::new(BTreeMap::new()),
            latencies: Mutex::new(BTreeMap::new()),
            expiries: Mutex::new(VecDeque::new()),
        })
    }

    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    pub fn record(&self, outcome: Outcome) {
        let latency_key = latency_bucket(outcome.latency);
        {
            let mut statuses = lock_or_recover(&self.statuses, "status histogram");
            let count = statuses
                .entry(outcome.classification.clone())
                .or_insert(0);
            *count = count.saturating_add(1);
        }
        {
            let mut latencies = lock_or_recover(&self.latencies, "latency histogram");
            let count = latencies.entry(latency_key).or_insert(0);
            *count = count.saturating_add(1);
        }

        // Saturates for huge windows, which then never expire.
        let due = outcome
            .observed_at
            .saturating_duration_since(self.origin)
            .saturating_add(self.window);
        let due_tick = tick_ceil(due);
        let entry = (outcome.classification, latency_key);

        let mut expiries = lock_or_recover(&self.expiries, "expiry queue");
        match expiries.back().map(|bucket| bucket.due_tick) {
            Some(back_tick) if back_tick < due_tick => expiries.push_back(ExpiryBucket {
                due_tick,
                entries: vec![entry],
            }),
            Some(_) => insert_sorted(&mut expiries, due_tick, entry),
            None => expiries.push_back(ExpiryBucket {
                due_tick,
                entries: vec![entry],
            }),
        }
    }

    /// Removes every outcome whose expiry is due at `now`.
    pub fn expire_due(&self, now: Instant) {
        let now_tick = self.tick_floor(now);
        let mut due = Vec::new();
        {
            let mut expiries = lock_or_recover(&self.expiries, "expiry queue");
            while expiries
                .front()
                .is_some_and(|bucket| bucket.due_tick <= now_tick)
            {
                if let Some(bucket) = expiries.pop_front() {
                    due.push(bucket);
                }
            }
        }
        if due.is_empty() {
            return;
        }

        {
            let mut statuses = lock_or_recover(&self.statuses, "status histogram");
            for (label, _) in due.iter().flat_map(|bucket| bucket.entries.iter()) {
                decrement(&mut statuses, label);
            }
        }
        let mut latencies = lock_or_recover(&self.latencies, "latency histogram");
        for (_, key) in due.iter().flat_map(|bucket| bucket.entries.iter()) {
            decrement(&mut latencies, key);
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> WindowSnapshot {
        let status_counts = {
            let statuses = lock_or_recover(&self.statuses, "status histogram");
            statuses
                .iter()
                .map(|(label, count)| (label.clone(), *count))
                .collect()
        };
        let max_key = {
            let latencies = lock_or_recover(&self.latencies, "latency histogram");
            latencies.last_key_value().map_or(0, |(key, _)| *key)
        };
        WindowSnapshot {
            status_counts,
            max_latency: Duration::from_micros(max_key.saturating_mul(LATENCY_BUCKET_MICROS)),
        }
    }

    /// Starts the expiry timer.
    pub fn spawn_expiry(self: &Arc<Self>, shutdown_tx: &ShutdownSender) -> JoinHandle<()> {
        let aggregator = Arc::clone(self);
        let mut shutdown_rx = shutdown_tx.subscribe();
        tokio::spawn(async move {
            let mut tick = interval(EXPIRY_GRANULARITY);
            tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => break,
                    now = tick.tick() => aggregator.expire_due(now),
                }
            }
        })
    }

    fn tick_floor(&self, at: Instant) -> u64 {
        let micros = at.saturating_duration_since(self.origin).as_micros();
        let ticks = micros
            .checked_div(EXPIRY_GRANULARITY.as_micros())
            .unwrap_or(0);
        u64::try_from(ticks).unwrap_or(u64::MAX)
    }

}

/// Ticks since the origin, rounded up, for an offset from the origin.
fn tick_ceil(offset: Duration) -> u64 {
    let ticks = offset
        .as_micros()
        .div_ceil(EXPIRY_GRANULARITY.as_micros());
    u64::try_from(ticks).unwrap_or(u64::MAX)
}

/// Latency histogram key: latency rounded up to a 100 µs bucket.
fn latency_bucket(latency: Duration) -> u64 {
    u64::try_from(latency.as_micros())
        .unwrap_or(u64::MAX)
        .div_ceil(LATENCY_BUCKET_MICROS)
}

fn insert_sorted(
    expiries: &mut VecDeque<ExpiryBucket>,
    due_tick: u64,
    entry: (String, u64),
) {
    let position = expiries.partition_point(|bucket| bucket.due_tick < due_tick);
    match expiries.get_mut(position) {
        Some(bucket) if bucket.due_tick == due_tick => bucket.entries.push(entry),
        Some(_) | None => expiries.insert(
            position,
            ExpiryBucket {
                due_tick,
                entries: vec![entry],
            },
        ),
    }
}

fn decrement<K>(map: &mut BTreeMap<K, u64>, key: &K)
where
    K: Ord + std::fmt::Debug,
{
    match map.get_mut(key) {
        Some(count) if *count > 1 => *count = count.saturating_sub(1),
        Some(_) => {
            map.remove(key);
        }
        None => error!("Expired outcome {:?} was not in the window histogram.", key),
    }
}
