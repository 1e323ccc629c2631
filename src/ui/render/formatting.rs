use std::time::Duration;

use crate::ui::model::UiRenderData;

/// Formats a duration the way the dashboard shows it: `1s`, `250ms`,
/// `1.3ms`, `0s` for zero.
#[must_use]
pub(crate) fn format_duration(duration: Duration) -> String {
    if duration.is_zero() {
        return "0s".to_owned();
    }
    format!("{:?}", duration)
}

pub(crate) fn rate_line(data: &UiRenderData) -> String {
    let rate = data.snapshot.target_rate;
    if rate == 0 {
        "Target QPS: 0 (paused)".to_owned()
    } else {
        format!("Target QPS: {}", rate)
    }
}

pub(crate) fn workers_line(data: &UiRenderData) -> String {
    format!(
        "{} workers ({} active)",
        data.snapshot.worker_count, data.snapshot.active_workers
    )
}

pub(crate) fn latency_line(data: &UiRenderData) -> String {
    format!(
        "Max latency: {}",
        format_duration(data.snapshot.max_latency)
    )
}

pub(crate) fn responses_heading(data: &UiRenderData) -> String {
    let window = format_duration(data.snapshot.window);
    if data.snapshot.has_responses() {
        format!("Responses in past {}:", window)
    } else {
        format!("No responses in past {}", window)
    }
}

pub(crate) fn status_lines(data: &UiRenderData) -> Vec<String> {
    data.snapshot
        .status_counts
        .iter()
        .filter(|(_, count)| *count > 0)
        .map(|(label, count)| format!("  {}: {}", label, count))
        .collect()
}

pub(crate) fn help_line(worker_step: usize) -> String {
    format!(
        "↑ rate x2   ↓ rate /2   →/+ workers +{0}   ←/- workers -{0}   q quit",
        worker_step
    )
}
