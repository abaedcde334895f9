use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::Frame;

use crate::app::{App, Message, Model};
use crate::gallery::COLLECTIONS;

use super::event_loop::ResizeDebouncer;

/// Lines scrolled per mouse wheel notch.
const WHEEL_LINES: usize = 3;

impl App {
    pub(super) fn handle_event(
        &self,
        event: &Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut ResizeDebouncer,
    ) -> Option<Message> {
        match event {
            Event::Key(key) => Self::handle_key(*key, model),
            Event::Mouse(mouse) => Self::handle_mouse(*mouse, model),
            Event::Resize(width, height) => {
                crate::perf::log_event(
                    "event.resize.queue",
                    format!("width={width} height={height}"),
                );
                resize_debouncer.queue(*width, *height, now_ms);
                None
            }
            _ => None,
        }
    }

    pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
        if model.help_visible {
            return Some(Message::HideHelp);
        }

        if let Some(input) = model.query_input.as_ref() {
            return match key.code {
                KeyCode::Esc => Some(Message::CancelQuery),
                KeyCode::Enter => Some(Message::SubmitQuery),
                KeyCode::Backspace => {
                    let mut next = input.clone();
                    next.pop();
                    Some(Message::QueryInput(next))
                }
                KeyCode::Char(c)
                    if !key.modifiers.contains(KeyModifiers::CONTROL)
                        && !key.modifiers.contains(KeyModifiers::ALT) =>
                {
                    let mut next = input.clone();
                    next.push(c);
                    Some(Message::QueryInput(next))
                }
                _ => None,
            };
        }

        if model.preview_visible {
            return match key.code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q' | ' ') => {
                    Some(Message::ClosePreview)
                }
                KeyCode::Char('h') | KeyCode::Left => Some(Message::SelectLeft),
                KeyCode::Char('l') | KeyCode::Right => Some(Message::SelectRight),
                KeyCode::Char('n' | 'j') | KeyCode::Down => Some(Message::SelectDown),
                KeyCode::Char('p' | 'k') | KeyCode::Up => Some(Message::SelectUp),
                KeyCode::Char('o') => Some(Message::OpenSelected),
                KeyCode::Char('y') => Some(Message::CopySelected),
                KeyCode::Char('?') | KeyCode::F(1) => Some(Message::ToggleHelp),
                _ => None,
            };
        }

        match key.code {
            // Navigation
            KeyCode::Char('j') | KeyCode::Down => model
                .viewport
                .can_scroll_down()
                .then_some(Message::ScrollDown(1)),
            KeyCode::Char('k') | KeyCode::Up => {
                model.viewport.can_scroll_up().then_some(Message::ScrollUp(1))
            }
            KeyCode::Char(' ') | KeyCode::PageDown => {
                model.viewport.can_scroll_down().then_some(Message::PageDown)
            }
            KeyCode::Char('b') | KeyCode::PageUp => {
                model.viewport.can_scroll_up().then_some(Message::PageUp)
            }
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => model
                .viewport
                .can_scroll_down()
                .then_some(Message::HalfPageDown),
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                model.viewport.can_scroll_up().then_some(Message::HalfPageUp)
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Message::Quit)
            }
            KeyCode::Char('g') | KeyCode::Home => Some(Message::GoToTop),
            KeyCode::Char('G') | KeyCode::End => Some(Message::GoToBottom),

            // Selection
            KeyCode::Char('h') | KeyCode::Left | KeyCode::BackTab => Some(Message::SelectLeft),
            KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => Some(Message::SelectRight),
            KeyCode::Char('n') => Some(Message::SelectDown),
            KeyCode::Char('p') => Some(Message::SelectUp),
            KeyCode::Enter => Some(Message::OpenPreview),
            KeyCode::Esc => model.selected.is_some().then_some(Message::ClearSelection),
            KeyCode::Char('o') => Some(Message::OpenSelected),
            KeyCode::Char('y') => Some(Message::CopySelected),

            // Gallery
            KeyCode::Char('/') => Some(Message::StartQuery),
            KeyCode::Char(c @ '1'..='9') => {
                let index = c.to_digit(10)? as usize - 1;
                COLLECTIONS
                    .get(index)
                    .map(|collection| Message::QuerySelected(collection.query.to_string()))
            }
            KeyCode::Char('r') => Some(Message::Retry),

            // Other
            KeyCode::Char('?') | KeyCode::F(1) => Some(Message::ToggleHelp),
            KeyCode::Char('q') => Some(Message::Quit),

            _ => None,
        }
    }

    pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
        if model.help_visible {
            return None;
        }

        if model.preview_visible {
            return matches!(mouse.kind, MouseEventKind::Up(MouseButton::Left))
                .then_some(Message::ClosePreview);
        }

        match mouse.kind {
            MouseEventKind::ScrollDown => model
                .viewport
                .can_scroll_down()
                .then_some(Message::ScrollDown(WHEEL_LINES)),
            MouseEventKind::ScrollUp => model
                .viewport
                .can_scroll_up()
                .then_some(Message::ScrollUp(WHEEL_LINES)),
            MouseEventKind::Up(MouseButton::Left) => {
                let (column, row) = card_at_point(model, mouse.column, mouse.row)?;
                if model.selected_position() == Some((column, row)) {
                    Some(Message::OpenPreview)
                } else {
                    Some(Message::SelectCard(column, row))
                }
            }
            _ => None,
        }
    }

    pub(super) fn view(model: &Model, frame: &mut Frame) {
        crate::ui::render(model, frame);
    }
}

/// Card (column, row) under a screen cell of the gallery area.
fn card_at_point(model: &Model, x: u16, y: u16) -> Option<(usize, usize)> {
    if y >= model.viewport.height() {
        return None;
    }
    let geometry = model.geometry();
    let column = geometry.column_at_x(x)?;
    let line = model.viewport.offset() + y as usize;
    let row = geometry.card_at(column, line)?;
    Some((column, row))
}
