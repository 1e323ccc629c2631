use std::io::{self, Stdout};

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};

use crate::error::AppResult;
use crate::ui::model::UiRenderData;

use super::frame::draw_frame;

/// Terminal handle the dashboard draws into.
pub struct Dashboard<B: Backend> {
    terminal: Terminal<B>,
}

impl Dashboard<CrosstermBackend<Stdout>> {
    /// Switches stdout to raw mode on the alternate screen with the cursor
    /// hidden. The terminal is restored again if any step fails.
    ///
    /// # Errors
    ///
    /// Returns an error when the terminal cannot be prepared.
    pub fn open() -> AppResult<Self> {
        enable_raw_mode()?;
        let prepared = execute!(io::stdout(), EnterAlternateScreen, Hide)
            .and_then(|()| Terminal::new(CrosstermBackend::new(io::stdout())))
            .and_then(|mut terminal| terminal.clear().map(|()| terminal));
        match prepared {
            Ok(terminal) => Ok(Self { terminal }),
            Err(err) => {
                restore_terminal();
                Err(err.into())
            }
        }
    }
}

impl<B: Backend> Dashboard<B> {
    #[must_use]
    pub const fn new(terminal: Terminal<B>) -> Self {
        Self { terminal }
    }

    /// Draws one frame; failures are logged and the next refresh retries.
    pub fn draw(&mut self, data: &UiRenderData) {
        if let Err(err) = self.terminal.draw(|frame| draw_frame(frame, data)) {
            tracing::error!("Failed to render dashboard: {}", err);
        }
    }

    #[must_use]
    pub const fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }
}

/// Leaves raw mode and the alternate screen and shows the cursor.
pub fn restore_terminal() {
    if let Err(err) = disable_raw_mode() {
        tracing::debug!("Failed to disable raw mode: {}", err);
    }
    if let Err(err) = execute!(io::stdout(), LeaveAlternateScreen, Show) {
        tracing::debug!("Failed to leave alternate screen: {}", err);
    }
}
