use std::sync::Arc;

use tokio::time::{MissedTickBehavior, interval};

use crate::engine::Controller;
use crate::shutdown::ShutdownSender;
use crate::ui::model::{UiRenderData, UiSettings};

use super::dashboard::{Dashboard, restore_terminal};

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore_terminal();
    }
}

/// Redraws the dashboard from a fresh snapshot every refresh interval until
/// shutdown. A terminal that cannot be set up triggers shutdown.
#[must_use]
pub fn setup_render_ui(
    controller: Arc<Controller>,
    settings: UiSettings,
    shutdown_tx: &ShutdownSender,
) -> tokio::task::JoinHandle<()> {
    let shutdown_tx = shutdown_tx.clone();
    let mut shutdown_rx = shutdown_tx.subscribe();
    tokio::spawn(async move {
        let mut dashboard = match Dashboard::open() {
            Ok(dashboard) => dashboard,
            Err(err) => {
                tracing::error!("Failed to setup terminal: {}", err);
                drop(shutdown_tx.send(()));
                return;
            }
        };
        let _guard = TerminalGuard;

        let mut refresh = interval(settings.refresh_interval);
        refresh.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => break,
                _ = refresh.tick() => {
                    let data = UiRenderData::new(controller.snapshot(), &settings);
                    dashboard.draw(&data);
                }
            }
        }
    })
}
