use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::info;

use crate::engine::{Controller, Snapshot};
use crate::shutdown::ShutdownSender;
use crate::ui::render::format_duration;

/// Logs one status line per `report_interval` while running headless.
pub(crate) fn setup_status_reporter(
    controller: Arc<Controller>,
    report_interval: Duration,
    shutdown_tx: &ShutdownSender,
) -> tokio::task::JoinHandle<()> {
    let mut shutdown_rx = shutdown_tx.subscribe();
    tokio::spawn(async move {
        let first = Instant::now()
            .checked_add(report_interval)
            .unwrap_or_else(Instant::now);
        let mut tick = interval_at(first, report_interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => break,
                _ = tick.tick() => {
                    info!("{}", format_status_line(&controller.snapshot()));
                }
            }
        }
    })
}

pub(crate) fn format_status_line(snapshot: &Snapshot) -> String {
    let statuses = if snapshot.has_responses() {
        snapshot
            .status_counts
            .iter()
            .map(|(label, count)| format!("{}={}", label, count))
            .collect::<Vec<_>>()
            .join(", ")
    } else {
        "none".to_owned()
    };
    format!(
        "rate={}/s workers={} ({} active) max_latency={} responses in past {}: {}",
        snapshot.target_rate,
        snapshot.worker_count,
        snapshot.active_workers,
        format_duration(snapshot.max_latency),
        format_duration(snapshot.window),
        statuses
    )
}
