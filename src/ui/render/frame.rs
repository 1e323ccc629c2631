use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    prelude::{Backend, Frame},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::ui::model::UiRenderData;

use super::formatting::{
    help_line, latency_line, rate_line, responses_heading, status_lines, workers_line,
};
use super::theme::{
    ACCENT_AMBER_RGB, ACCENT_LATENCY_RGB, ACCENT_LOAD_RGB, ACCENT_RATE_RGB, ENGINE_PANEL_HEIGHT,
    HELP_HEIGHT, UI_MARGIN, app_background_style, muted_style, panel_border_style,
    panel_title_style, rgb, style_color,
};

pub fn draw_frame<B: Backend>(f: &mut Frame<'_, B>, data: &UiRenderData) {
    let size = f.size();
    f.render_widget(
        Block::default().style(app_background_style(data.no_color)),
        size,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(UI_MARGIN)
        .constraints([
            Constraint::Length(ENGINE_PANEL_HEIGHT),
            Constraint::Min(3),
            Constraint::Length(HELP_HEIGHT),
        ])
        .split(size);

    let (engine_chunk, responses_chunk, help_chunk) = match chunks.as_ref() {
        [a, b, c] => (a, b, c),
        _ => return,
    };

    render_engine_panel(f, data, *engine_chunk);
    render_responses_panel(f, data, *responses_chunk);
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            help_line(data.worker_step),
            muted_style(data.no_color),
        ))),
        *help_chunk,
    );
}

fn panel<'block>(title: &'block str, no_color: bool) -> Block<'block> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(panel_border_style(no_color))
        .title(Span::styled(title, panel_title_style(no_color)))
}

fn render_engine_panel<B: Backend>(f: &mut Frame<'_, B>, data: &UiRenderData, area: Rect) {
    let rate_color = if data.snapshot.target_rate == 0 {
        ACCENT_AMBER_RGB
    } else {
        ACCENT_RATE_RGB
    };
    let lines = vec![
        Line::from(Span::styled(
            rate_line(data),
            style_color(data.no_color, rgb(rate_color)),
        )),
        Line::from(Span::styled(
            workers_line(data),
            style_color(data.no_color, rgb(ACCENT_LOAD_RGB)),
        )),
        Line::from(Span::styled(
            latency_line(data),
            style_color(data.no_color, rgb(ACCENT_LATENCY_RGB)),
        )),
    ];
    f.render_widget(
        Paragraph::new(lines).block(panel("Engine", data.no_color)),
        area,
    );
}

fn render_responses_panel<B: Backend>(f: &mut Frame<'_, B>, data: &UiRenderData, area: Rect) {
    let statuses = status_lines(data);
    let mut lines = Vec::with_capacity(statuses.len().saturating_add(1));
    lines.push(Line::from(Span::styled(
        responses_heading(data),
        panel_title_style(data.no_color),
    )));
    lines.extend(statuses.into_iter().map(Line::from));
    f.render_widget(
        Paragraph::new(lines).block(panel("Responses", data.no_color)),
        area,
    );
}
