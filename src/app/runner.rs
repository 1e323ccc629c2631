use std::sync::Arc;

use tracing::{debug, info, warn};
use url::Url;

use crate::args::HammerArgs;
use crate::engine::{Controller, EngineSettings, start_engine};
use crate::error::AppResult;
use crate::executor::build_executor;
use crate::shutdown_handlers::{
    setup_duration_shutdown_handler, setup_signal_shutdown_handler, shutdown_channel,
};
use crate::ui::{UiSettings, setup_input_handler, setup_render_ui};

use super::report::{format_status_line, setup_status_reporter};

/// Runs the engine against `target` until shutdown is broadcast.
///
/// # Errors
///
/// Returns an error when the executor or engine cannot start.
pub(crate) async fn run_hammer(
    args: &HammerArgs,
    target: &Url,
    ui_enabled: bool,
) -> AppResult<()> {
    let (shutdown_tx, mut shutdown_rx) = shutdown_channel();

    let executor = build_executor(args.fetcher, args.request_timeout)?;
    info!(
        "Using the {} fetcher with a {:?} timeout.",
        args.fetcher.as_str(),
        args.request_timeout
    );
    let settings = EngineSettings {
        target: target.to_string(),
        workers: args.workers,
        rate: args.rate,
        window: args.window,
    };
    let controller = start_engine(&settings, executor, &shutdown_tx)?;

    let mut handles = vec![setup_signal_shutdown_handler(&shutdown_tx)];
    if ui_enabled {
        let ui_settings = UiSettings {
            refresh_interval: args.refresh_interval,
            worker_step: args.worker_step.get(),
            no_color: args.no_color,
        };
        handles.push(setup_render_ui(
            Arc::clone(&controller),
            ui_settings,
            &shutdown_tx,
        ));
        handles.push(setup_input_handler(
            Arc::clone(&controller),
            ui_settings.worker_step,
            &shutdown_tx,
        ));
    } else {
        if !args.no_ui {
            info!("UI disabled because stdout is not a TTY.");
        }
        handles.push(setup_status_reporter(
            Arc::clone(&controller),
            args.report_interval,
            &shutdown_tx,
        ));
    }
    if let Some(duration) = args.duration {
        handles.push(setup_duration_shutdown_handler(duration, &shutdown_tx));
    }

    // A lagged receiver still means shutdown was requested.
    if let Err(err) = shutdown_rx.recv().await {
        debug!("Shutdown channel: {}", err);
    }

    for handle in handles {
        if let Err(err) = handle.await {
            warn!("Background task failed: {}", err);
        }
    }

    log_final_status(&controller);
    Ok(())
}

fn log_final_status(controller: &Controller) {
    info!(
        "Stopped after {} completed requests; last window: {}",
        controller.completed_requests(),
        format_status_line(&controller.snapshot())
    );
}
