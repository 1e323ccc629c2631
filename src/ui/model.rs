use std::time::Duration;

use crate::engine::Snapshot;

/// Display options fixed at startup.
#[derive(Debug, Clone, Copy)]
pub struct UiSettings {
    pub refresh_interval: Duration,
    pub worker_step: usize,
    pub no_color: bool,
}

/// Everything one frame needs.
#[derive(Debug, Clone)]
pub struct UiRenderData {
    pub snapshot: Snapshot,
    pub worker_step: usize,
    pub no_color: bool,
}

impl UiRenderData {
    #[must_use]
    pub const fn new(snapshot: Snapshot, settings: &UiSettings) -> Self {
        Self {
            snapshot,
            worker_step: settings.worker_step,
            no_color: settings.no_color,
        }
    }
}
