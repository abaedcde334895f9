use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::Model;
use crate::gallery::LoadState;

use super::style;

pub fn render_query_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let query = model.query_input.as_deref().unwrap_or_default();
    let text = format!("/{query}  Enter: search  Esc: cancel");
    frame.render_widget(Paragraph::new(text).style(style::prompt_bar_style()), area);
}

/// Short description of where the session stands.
pub fn state_label(model: &Model) -> &'static str {
    let session = &model.session;
    match session.state() {
        LoadState::Loading => "loading…",
        LoadState::Exhausted => "end of results",
        LoadState::Idle if session.needs_manual_retry() => "error: r to retry",
        LoadState::Idle if session.last_error().is_some() => "error: retrying",
        LoadState::Idle => "ready",
    }
}

pub fn status_line(model: &Model) -> String {
    let session = &model.session;
    format!(
        " {}  [{}%]  {} images  page {}  {}  {} cols{}  ?:help",
        session.query(),
        model.viewport.scroll_percent(),
        session.accumulated_items().len(),
        session.page(),
        state_label(model),
        model.layout().column_count(),
        if model.is_resize_pending() {
            " (resizing)"
        } else {
            ""
        },
    )
}

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let bar = Paragraph::new(status_line(model)).style(style::status_bar_style());
    frame.render_widget(bar, area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, bar_style) = style::toast_style(level);
    let toast = Paragraph::new(format!("{prefix} {message}")).style(bar_style);
    frame.render_widget(toast, area);
}
