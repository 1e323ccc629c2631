use super::input::{InputAction, map_key};
use super::model::{UiRenderData, UiSettings};
use super::render::{Dashboard, format_duration};
use crate::engine::{ControlCommand, Snapshot};
use crate::error::{AppError, AppResult};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use std::time::Duration;

fn settings(no_color: bool) -> UiSettings {
    UiSettings {
        refresh_interval: Duration::from_millis(100),
        worker_step: 10,
        no_color,
    }
}

fn render_to_text(data: &UiRenderData) -> AppResult<String> {
    let backend = TestBackend::new(80, 24);
    let terminal = match Terminal::new(backend) {
        Ok(term) => term,
        Err(err) => {
            return Err(AppError::validation(format!(
                "Failed to create TestBackend terminal: {}",
                err
            )));
        }
    };

    let mut dashboard = Dashboard::new(terminal);
    dashboard.draw(data);

    let buffer = dashboard.terminal().backend().buffer();
    let width = usize::from(buffer.area.width).max(1);
    let rows: Vec<String> = buffer
        .content
        .chunks(width)
        .map(|row| row.iter().map(|cell| cell.symbol.as_str()).collect())
        .collect();
    Ok(rows.join("\n"))
}

fn expect_contains(text: &str, needle: &str) -> AppResult<()> {
    if text.contains(needle) {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "Expected '{}' in rendered frame:\n{}",
            needle, text
        )))
    }
}

#[test]
fn ui_render_shows_engine_state() -> AppResult<()> {
    let snapshot = Snapshot {
        target_rate: 100,
        worker_count: 10,
        active_workers: 8,
        status_counts: vec![
            ("OK".to_owned(), 93),
            ("Request timed out".to_owned(), 2),
        ],
        max_latency: Duration::from_micros(1_300),
        window: Duration::from_secs(1),
    };
    let text = render_to_text(&UiRenderData::new(snapshot, &settings(false)))?;

    expect_contains(&text, "Target QPS: 100")?;
    expect_contains(&text, "10 workers (8 active)")?;
    expect_contains(&text, "Max latency: 1.3ms")?;
    expect_contains(&text, "Responses in past 1s:")?;
    expect_contains(&text, "  OK: 93")?;
    expect_contains(&text, "  Request timed out: 2")?;
    expect_contains(&text, "workers +10")
}

#[test]
fn ui_render_empty_window_when_paused() -> AppResult<()> {
    let snapshot = Snapshot {
        target_rate: 0,
        worker_count: 0,
        active_workers: 0,
        status_counts: Vec::new(),
        max_latency: Duration::ZERO,
        window: Duration::from_secs(5),
    };
    let text = render_to_text(&UiRenderData::new(snapshot, &settings(true)))?;

    expect_contains(&text, "Target QPS: 0 (paused)")?;
    expect_contains(&text, "0 workers (0 active)")?;
    expect_contains(&text, "Max latency: 0s")?;
    expect_contains(&text, "No responses in past 5s")?;
    if text.contains("Responses in past") {
        return Err(AppError::validation("Unexpected response heading"));
    }
    Ok(())
}

#[test]
fn format_duration_matches_dashboard_style() -> AppResult<()> {
    let cases = [
        (Duration::ZERO, "0s"),
        (Duration::from_secs(1), "1s"),
        (Duration::from_millis(250), "250ms"),
        (Duration::from_micros(1_300), "1.3ms"),
    ];
    for (duration, expected) in cases {
        let formatted = format_duration(duration);
        if formatted != expected {
            return Err(AppError::validation(format!(
                "format_duration({:?}) = {}, expected {}",
                duration, formatted, expected
            )));
        }
    }
    Ok(())
}

fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent {
        code,
        modifiers,
        kind: KeyEventKind::Press,
        state: KeyEventState::NONE,
    }
}

#[test]
fn key_bindings_map_to_commands() -> AppResult<()> {
    let none = KeyModifiers::NONE;
    let cases = [
        (
            press(KeyCode::Up, none),
            Some(InputAction::Control(ControlCommand::IncreaseRate)),
        ),
        (
            press(KeyCode::Down, none),
            Some(InputAction::Control(ControlCommand::DecreaseRate)),
        ),
        (
            press(KeyCode::Right, none),
            Some(InputAction::Control(ControlCommand::IncreaseWorkers(7))),
        ),
        (
            press(KeyCode::Char('+'), none),
            Some(InputAction::Control(ControlCommand::IncreaseWorkers(7))),
        ),
        (
            press(KeyCode::Left, none),
            Some(InputAction::Control(ControlCommand::DecreaseWorkers(7))),
        ),
        (
            press(KeyCode::Char('-'), none),
            Some(InputAction::Control(ControlCommand::DecreaseWorkers(7))),
        ),
        (press(KeyCode::Char('q'), none), Some(InputAction::Quit)),
        (press(KeyCode::Esc, none), Some(InputAction::Quit)),
        (
            press(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Some(InputAction::Quit),
        ),
        (press(KeyCode::Char('c'), none), None),
        (press(KeyCode::Enter, none), None),
    ];

    for (key, expected) in cases {
        let actual = map_key(key, 7);
        if actual != expected {
            return Err(AppError::validation(format!(
                "map_key({:?}) = {:?}, expected {:?}",
                key.code, actual, expected
            )));
        }
    }
    Ok(())
}

#[test]
fn key_release_is_ignored() -> AppResult<()> {
    let mut key = press(KeyCode::Up, KeyModifiers::NONE);
    key.kind = KeyEventKind::Release;
    if map_key(key, 10).is_some() {
        return Err(AppError::validation("Release events must not act"));
    }
    Ok(())
}
