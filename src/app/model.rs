use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::gallery::{
    ColumnLayout, ImageItem, ItemId, LoadState, PageTicket, PaginationCoordinator, ScrollSnapshot,
    ScrollTrigger, TriggerSignal, WidthClass, layout,
};
use crate::ui::cards::GalleryGeometry;
use crate::ui::viewport::Viewport;

use super::update::Message;

/// Rows below the gallery taken by the status bar.
pub const FOOTER_ROWS: u16 = 1;

const TOAST_DURATION: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// Direction for moving the card selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// The complete application state.
///
/// All state lives here - no global or scattered state. The layout and the
/// card geometry are derived from the session's accumulated items and are
/// rebuilt whenever those items or the width class change.
#[derive(Debug)]
pub struct Model {
    pub viewport: Viewport,
    pub session: PaginationCoordinator,
    pub trigger: ScrollTrigger,
    width_class: WidthClass,
    layout: ColumnLayout,
    geometry: GalleryGeometry,
    /// Selected card, tracked by id so it survives re-layout.
    pub selected: Option<ItemId>,
    pub preview_visible: bool,
    pub help_visible: bool,
    /// Text of the query prompt while it is open.
    pub query_input: Option<String>,
    pending_fetch: Option<PageTicket>,
    toast: Option<Toast>,
    pub config_global_path: Option<PathBuf>,
    pub config_local_path: Option<PathBuf>,
    resize_pending: bool,
    pub should_quit: bool,
}

impl Model {
    /// Create a model for a terminal of `terminal_size` (width, height).
    pub fn new(
        session: PaginationCoordinator,
        trigger: ScrollTrigger,
        terminal_size: (u16, u16),
    ) -> Self {
        let mut model = Self::blank(session, trigger, terminal_size);
        model.relayout();
        model
    }

    fn blank(
        session: PaginationCoordinator,
        trigger: ScrollTrigger,
        terminal_size: (u16, u16),
    ) -> Self {
        let (width, height) = terminal_size;
        Self {
            viewport: Viewport::new(width, height.saturating_sub(FOOTER_ROWS)),
            session,
            width_class: trigger.classify(width),
            trigger,
            layout: ColumnLayout::default(),
            geometry: GalleryGeometry::default(),
            selected: None,
            preview_visible: false,
            help_visible: false,
            query_input: None,
            pending_fetch: None,
            toast: None,
            config_global_path: None,
            config_local_path: None,
            resize_pending: false,
            should_quit: false,
        }
    }

    pub const fn width_class(&self) -> WidthClass {
        self.width_class
    }

    pub const fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    pub const fn geometry(&self) -> &GalleryGeometry {
        &self.geometry
    }

    /// Rebuild the column layout from all accumulated items.
    pub(super) fn relayout(&mut self) {
        let _scope = crate::perf::scope("layout.recompute");
        let items = self.session.accumulated_items();
        match layout(items, self.width_class.column_count()) {
            Ok(layout) => self.layout = layout,
            Err(err) => {
                tracing::error!(error = %err, "layout failed");
                return;
            }
        }
        crate::perf::log_event(
            "layout.recompute",
            format!(
                "items={} columns={} spread={:.3}",
                self.layout.item_count(),
                self.layout.column_count(),
                self.layout.height_spread()
            ),
        );
        self.refresh_geometry();
    }

    /// Recompute card positions for the current layout and viewport width.
    pub(super) fn refresh_geometry(&mut self) {
        self.geometry = GalleryGeometry::compute(&self.layout, self.viewport.width());
        self.viewport.set_total_lines(self.geometry.total_lines());
    }

    pub(super) fn set_width_class(&mut self, class: WidthClass) {
        if class == self.width_class {
            return;
        }
        self.width_class = class;
        self.relayout();
        self.reveal_selected();
    }

    pub fn scroll_snapshot(&self) -> ScrollSnapshot {
        ScrollSnapshot {
            offset: self.viewport.offset(),
            height: self.viewport.height() as usize,
            total: self.viewport.total_lines(),
            width: self.viewport.width(),
        }
    }

    /// Messages the scroll trigger raises for the current geometry.
    pub fn trigger_messages(&self) -> Vec<Message> {
        self.trigger
            .observe(self.scroll_snapshot(), self.width_class)
            .into_iter()
            .map(|signal| match signal {
                TriggerSignal::LoadMoreVisible => Message::LoadMoreVisible,
                TriggerSignal::WidthClassChanged(class) => Message::WidthClassChanged(class),
            })
            .collect()
    }

    /// The next trigger message worth dispatching. A width change comes
    /// first, since the relayout moves the sentinel. Load-more is only
    /// raised while no page is in flight and the feed is not exhausted.
    pub fn next_trigger(&self) -> Option<Message> {
        let messages = self.trigger_messages();
        if let Some(msg) = messages
            .iter()
            .find(|msg| matches!(msg, Message::WidthClassChanged(_)))
        {
            return Some(msg.clone());
        }
        (self.session.state() == LoadState::Idle && messages.contains(&Message::LoadMoreVisible))
            .then_some(Message::LoadMoreVisible)
    }

    pub const fn pending_fetch(&self) -> Option<&PageTicket> {
        self.pending_fetch.as_ref()
    }

    /// Hand the next fetch to whoever executes it.
    pub const fn take_pending_fetch(&mut self) -> Option<PageTicket> {
        self.pending_fetch.take()
    }

    pub(super) fn set_pending_fetch(&mut self, ticket: PageTicket) {
        crate::perf::log_event(
            "fetch.ticket",
            format!(
                "query={:?} page={}",
                ticket.request().query,
                ticket.page()
            ),
        );
        self.pending_fetch = Some(ticket);
    }

    pub(super) fn clear_pending_fetch(&mut self) {
        self.pending_fetch = None;
    }

    pub fn selected_position(&self) -> Option<(usize, usize)> {
        self.layout.position_of(self.selected.as_ref()?)
    }

    pub fn selected_item(&self) -> Option<&ImageItem> {
        let (column, row) = self.selected_position()?;
        self.layout.column(column)?.items().get(row)
    }

    pub(super) fn select_at(&mut self, column: usize, row: usize) {
        let Some(item) = self
            .layout
            .column(column)
            .and_then(|col| col.items().get(row))
        else {
            return;
        };
        self.selected = Some(item.id().clone());
        self.reveal_selected();
    }

    pub(super) fn move_selection(&mut self, direction: Direction) {
        let Some((column, row)) = self.selected_position() else {
            self.select_first_visible();
            return;
        };
        match direction {
            Direction::Up => {
                if let Some(prev) = row.checked_sub(1) {
                    self.select_at(column, prev);
                }
            }
            Direction::Down => self.select_at(column, row + 1),
            Direction::Left | Direction::Right => {
                let target = if direction == Direction::Left {
                    column.checked_sub(1)
                } else {
                    Some(column + 1).filter(|&c| c < self.layout.column_count())
                };
                let Some(target) = target else {
                    return;
                };
                let line = self.geometry.slot(column, row).map_or(0, |slot| slot.top);
                if let Some(index) = self.geometry.nearest_card(target, line) {
                    self.select_at(target, index);
                }
            }
        }
    }

    /// Select the topmost card that is at least partly on screen.
    pub(super) fn select_first_visible(&mut self) {
        let top = self.viewport.offset();
        let candidate = self
            .geometry
            .columns()
            .iter()
            .enumerate()
            .filter_map(|(column, geometry)| {
                let row = geometry.slots.iter().position(|slot| slot.bottom() > top)?;
                Some((geometry.slots[row].top, column, row))
            })
            .min();
        if let Some((_, column, row)) = candidate {
            self.select_at(column, row);
        }
    }

    /// Scroll just enough to bring the selected card on screen.
    pub(super) fn reveal_selected(&mut self) {
        let Some((column, row)) = self.selected_position() else {
            return;
        };
        let Some(slot) = self.geometry.slot(column, row) else {
            return;
        };
        self.viewport.reveal(slot.top..slot.bottom());
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + TOAST_DURATION,
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }

    pub(super) const fn set_resize_pending(&mut self, pending: bool) {
        self.resize_pending = pending;
    }

    pub const fn is_resize_pending(&self) -> bool {
        self.resize_pending
    }
}

// Implement Default for Model to allow std::mem::take
impl Default for Model {
    fn default() -> Self {
        Self::blank(
            PaginationCoordinator::default(),
            ScrollTrigger::default(),
            (80, 24),
        )
    }
}
