use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, poll, read};
use tokio::sync::broadcast;
use tracing::debug;

use crate::engine::{ControlCommand, Controller};
use crate::shutdown::ShutdownSender;

/// Keyboard polling interval; also bounds how long shutdown takes to be seen.
const KEYBOARD_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Control(ControlCommand),
    Quit,
}

/// Translates one key press into an engine command.
#[must_use]
pub fn map_key(key: KeyEvent, worker_step: usize) -> Option<InputAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    match key.code {
        KeyCode::Up => Some(InputAction::Control(ControlCommand::IncreaseRate)),
        KeyCode::Down => Some(InputAction::Control(ControlCommand::DecreaseRate)),
        KeyCode::Right | KeyCode::Char('+') => Some(InputAction::Control(
            ControlCommand::IncreaseWorkers(worker_step),
        )),
        KeyCode::Left | KeyCode::Char('-') => Some(InputAction::Control(
            ControlCommand::DecreaseWorkers(worker_step),
        )),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(InputAction::Quit)
        }
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(InputAction::Quit),
        KeyCode::Backspace
        | KeyCode::Enter
        | KeyCode::Home
        | KeyCode::End
        | KeyCode::PageUp
        | KeyCode::PageDown
        | KeyCode::Tab
        | KeyCode::BackTab
        | KeyCode::Delete
        | KeyCode::Insert
        | KeyCode::F(_)
        | KeyCode::Char(_)
        | KeyCode::Null
        | KeyCode::CapsLock
        | KeyCode::ScrollLock
        | KeyCode::NumLock
        | KeyCode::PrintScreen
        | KeyCode::Pause
        | KeyCode::Menu
        | KeyCode::KeypadBegin
        | KeyCode::Media(_)
        | KeyCode::Modifier(_) => None,
    }
}

/// Polls the terminal for key presses and forwards them to `controller`.
/// Quit keys broadcast shutdown.
pub fn setup_input_handler(
    controller: Arc<Controller>,
    worker_step: usize,
    shutdown_tx: &ShutdownSender,
) -> tokio::task::JoinHandle<()> {
    let shutdown_tx = shutdown_tx.clone();
    let mut shutdown_rx = shutdown_tx.subscribe();

    tokio::task::spawn_blocking(move || {
        loop {
            match shutdown_rx.try_recv() {
                Ok(()) => break,
                Err(broadcast::error::TryRecvError::Closed) => break,
                Err(broadcast::error::TryRecvError::Empty) => {}
                Err(broadcast::error::TryRecvError::Lagged(_)) => {}
            }

            let has_event = poll(KEYBOARD_POLL_INTERVAL).unwrap_or_default();
            if !has_event {
                continue;
            }
            let Ok(Event::Key(key)) = read() else {
                continue;
            };
            match map_key(key, worker_step) {
                Some(InputAction::Control(command)) => {
                    debug!("Input command: {:?}", command);
                    controller.apply(command);
                }
                Some(InputAction::Quit) => {
                    drop(shutdown_tx.send(()));
                    break;
                }
                None => {}
            }
        }
    })
}
