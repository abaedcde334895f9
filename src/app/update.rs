use std::time::Instant;

use crate::app::Model;
use crate::app::model::{Direction, ToastLevel};
use crate::gallery::{Applied, PageTicket, WidthClass};
use crate::source::{DEFAULT_QUERY, FetchError, PageResult};
use crate::ui::viewport::Scroll;

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Navigation
    /// Scroll up by n lines
    ScrollUp(usize),
    /// Scroll down by n lines
    ScrollDown(usize),
    /// Scroll up one page
    PageUp,
    /// Scroll down one page
    PageDown,
    /// Scroll up half page
    HalfPageUp,
    /// Scroll down half page
    HalfPageDown,
    /// Go to the first row of cards
    GoToTop,
    /// Go to the end of the gallery
    GoToBottom,

    // Selection
    /// Select the card above in the same column
    SelectUp,
    /// Select the card below in the same column
    SelectDown,
    /// Select the nearest card in the column to the left
    SelectLeft,
    /// Select the nearest card in the column to the right
    SelectRight,
    /// Select card (column, row)
    SelectCard(usize, usize),
    ClearSelection,
    OpenPreview,
    ClosePreview,
    /// Open the selected image's page in the browser
    OpenSelected,
    /// Copy the selected image URL to the clipboard
    CopySelected,

    // Gallery
    /// The load-more sentinel is on screen or close to it
    LoadMoreVisible,
    /// The viewport crossed the width breakpoint
    WidthClassChanged(WidthClass),
    /// A fetch finished
    PageLoaded(PageTicket, Result<PageResult, FetchError>),
    /// Retry after a failed fetch
    Retry,
    /// Start a new search
    QuerySelected(String),

    // Query prompt
    StartQuery,
    QueryInput(String),
    SubmitQuery,
    CancelQuery,

    /// Toggle help overlay
    ToggleHelp,
    /// Hide help overlay
    HideHelp,
    /// Terminal resized
    Resize(u16, u16),
    /// Force redraw
    Redraw,
    /// Quit application
    Quit,
}

/// Pure function to update model based on message.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        // Navigation
        Message::ScrollUp(n) => model.viewport.scroll(Scroll::Up(n)),
        Message::ScrollDown(n) => model.viewport.scroll(Scroll::Down(n)),
        Message::PageUp => model.viewport.scroll(Scroll::PageUp),
        Message::PageDown => model.viewport.scroll(Scroll::PageDown),
        Message::HalfPageUp => model.viewport.scroll(Scroll::HalfPageUp),
        Message::HalfPageDown => model.viewport.scroll(Scroll::HalfPageDown),
        Message::GoToTop => model.viewport.scroll(Scroll::Top),
        Message::GoToBottom => model.viewport.scroll(Scroll::Bottom),

        // Selection
        Message::SelectUp => model.move_selection(Direction::Up),
        Message::SelectDown => model.move_selection(Direction::Down),
        Message::SelectLeft => model.move_selection(Direction::Left),
        Message::SelectRight => model.move_selection(Direction::Right),
        Message::SelectCard(column, row) => model.select_at(column, row),
        Message::ClearSelection => model.selected = None,
        Message::OpenPreview => {
            if model.selected_item().is_none() {
                model.select_first_visible();
            }
            model.preview_visible = model.selected_item().is_some();
        }
        Message::ClosePreview => model.preview_visible = false,

        // Gallery
        Message::LoadMoreVisible => {
            if let Some(ticket) = model.session.on_load_more_triggered(Instant::now()) {
                model.set_pending_fetch(ticket);
            }
        }
        Message::WidthClassChanged(class) => model.set_width_class(class),
        Message::PageLoaded(ticket, result) => apply_page(&mut model, &ticket, result),
        Message::Retry => {
            if let Some(ticket) = model.session.retry(Instant::now()) {
                model.set_pending_fetch(ticket);
            } else if model.session.is_exhausted() {
                model.show_toast(ToastLevel::Info, "No more images to load");
            }
        }
        Message::QuerySelected(query) => start_query(&mut model, &query),

        // Query prompt
        Message::StartQuery => model.query_input = Some(String::new()),
        Message::QueryInput(text) => model.query_input = Some(text),
        Message::SubmitQuery => {
            if let Some(text) = model.query_input.take()
                && !text.trim().is_empty()
            {
                start_query(&mut model, &text);
            }
        }
        Message::CancelQuery => model.query_input = None,

        Message::ToggleHelp => model.help_visible = !model.help_visible,
        Message::HideHelp => model.help_visible = false,
        Message::Resize(width, height) => {
            model
                .viewport
                .resize(width, height.saturating_sub(super::model::FOOTER_ROWS));
            model.refresh_geometry();
            model.reveal_selected();
        }
        Message::OpenSelected | Message::CopySelected | Message::Redraw => {
            // Side effects only
        }
        Message::Quit => model.should_quit = true,
    }

    model
}

fn apply_page(model: &mut Model, ticket: &PageTicket, result: Result<PageResult, FetchError>) {
    let applied = model.session.apply(ticket, result, Instant::now());
    crate::perf::log_event(
        "fetch.applied",
        format!("page={} outcome={applied:?}", ticket.page()),
    );
    match applied {
        Applied::Appended { added, .. } => {
            if added > 0 {
                model.relayout();
            }
        }
        Applied::Exhausted { added } => {
            if added > 0 {
                model.relayout();
            }
            if model.session.accumulated_items().is_empty() {
                let message = format!("No images found for \"{}\"", model.session.query());
                model.show_toast(ToastLevel::Warning, message);
            }
        }
        Applied::Failed(err) => {
            let hint = if err.is_retryable() {
                "retrying shortly, r to retry now"
            } else {
                "press r to retry"
            };
            model.show_toast(ToastLevel::Error, format!("Fetch failed: {err} ({hint})"));
        }
        Applied::Stale => {}
    }
}

fn start_query(model: &mut Model, query: &str) {
    let query = match query.trim() {
        "" => DEFAULT_QUERY,
        trimmed => trimmed,
    };
    model.session.reset(query);
    model.clear_pending_fetch();
    model.selected = None;
    model.preview_visible = false;
    model.query_input = None;
    model.viewport.scroll(Scroll::Top);
    model.relayout();
    model.show_toast(ToastLevel::Info, format!("Searching \"{query}\""));
}
