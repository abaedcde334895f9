//! Incremental-loading state machine.
//!
//! The [`PaginationCoordinator`] owns the query state of one gallery session:
//! the accumulated items, the page cursor and the load state. It hands out at
//! most one [`PageTicket`] at a time; the caller runs the fetch wherever it
//! likes and gives the ticket back to [`PaginationCoordinator::apply`] along
//! with the result.
//!
//! ```text
//!            trigger                    items
//!   Idle ─────────────▶ Loading ───────────────▶ Idle (cursor + 1)
//!    ▲                    │  │
//!    │      fetch error   │  │ end of results / zero items
//!    └────────────────────┘  ▼
//!                          Exhausted (until reset)
//! ```

use std::collections::HashSet;
use std::time::Instant;

use super::backoff::Backoff;
use super::item::{ImageItem, ItemId};
use crate::source::{FetchError, PageRequest, PageResult};

/// Load state of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Exhausted,
}

/// Identity of one query session. Bumped on every reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(u64);

impl Generation {
    const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Permission to run one fetch on behalf of a specific query session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTicket {
    generation: Generation,
    request: PageRequest,
}

impl PageTicket {
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    pub const fn request(&self) -> &PageRequest {
        &self.request
    }

    pub const fn page(&self) -> u32 {
        self.request.page
    }
}

/// What [`PaginationCoordinator::apply`] did with a completed fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// New items were appended; the cursor moved to the next page.
    Appended { added: usize, duplicates: usize },
    /// The query has no more pages. `added` items came with the final page.
    Exhausted { added: usize },
    /// The fetch failed; the same page will be requested again.
    Failed(FetchError),
    /// The ticket belongs to a superseded session; nothing changed.
    Stale,
}

/// When the next automatic trigger may start a fetch after a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RetryGate {
    Open,
    Until(Instant),
    Manual,
}

/// Owns the accumulated items and page cursor of one query.
#[derive(Debug, Clone)]
pub struct PaginationCoordinator {
    query: String,
    per_page: u32,
    items: Vec<ImageItem>,
    seen: HashSet<ItemId>,
    page: u32,
    state: LoadState,
    generation: Generation,
    backoff: Backoff,
    retry_gate: RetryGate,
    last_error: Option<FetchError>,
}

impl PaginationCoordinator {
    pub fn new(query: impl Into<String>, per_page: u32) -> Self {
        Self::with_backoff(query, per_page, Backoff::default())
    }

    pub fn with_backoff(query: impl Into<String>, per_page: u32, backoff: Backoff) -> Self {
        Self {
            query: query.into(),
            per_page: per_page.max(1),
            items: Vec::new(),
            seen: HashSet::new(),
            page: 1,
            state: LoadState::Idle,
            generation: Generation::default(),
            backoff,
            retry_gate: RetryGate::Open,
            last_error: None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    pub const fn state(&self) -> LoadState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    pub fn is_exhausted(&self) -> bool {
        self.state == LoadState::Exhausted
    }

    /// The append-only sequence of items loaded so far, in feed order.
    pub fn accumulated_items(&self) -> &[ImageItem] {
        &self.items
    }

    /// Next page to request.
    pub const fn page(&self) -> u32 {
        self.page
    }

    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// The error from the most recent failed fetch, cleared on success.
    pub const fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    /// Time before which automatic triggers are ignored.
    pub const fn retry_at(&self) -> Option<Instant> {
        match self.retry_gate {
            RetryGate::Until(at) => Some(at),
            RetryGate::Open | RetryGate::Manual => None,
        }
    }

    /// Open a backoff gate whose time has come. Returns true exactly once
    /// per elapsed backoff, so the caller knows to look at the sentinel again.
    pub fn expire_backoff(&mut self, now: Instant) -> bool {
        match self.retry_gate {
            RetryGate::Until(at) if now >= at => {
                self.retry_gate = RetryGate::Open;
                true
            }
            _ => false,
        }
    }

    /// Whether automatic triggers are suspended until a manual retry.
    pub fn needs_manual_retry(&self) -> bool {
        self.retry_gate == RetryGate::Manual
    }

    /// Handle a "near the end of content" signal.
    ///
    /// Returns a ticket for the next page when the coordinator is idle and
    /// not held back by a failure; otherwise does nothing.
    pub fn on_load_more_triggered(&mut self, now: Instant) -> Option<PageTicket> {
        if self.state != LoadState::Idle {
            return None;
        }
        match self.retry_gate {
            RetryGate::Open => {}
            RetryGate::Until(at) if now >= at => self.retry_gate = RetryGate::Open,
            RetryGate::Until(_) | RetryGate::Manual => return None,
        }
        Some(self.begin_fetch())
    }

    /// Explicit user retry: lifts any backoff or manual hold, then triggers.
    pub fn retry(&mut self, now: Instant) -> Option<PageTicket> {
        if self.state == LoadState::Idle {
            self.retry_gate = RetryGate::Open;
        }
        self.on_load_more_triggered(now)
    }

    fn begin_fetch(&mut self) -> PageTicket {
        self.state = LoadState::Loading;
        let request = PageRequest::new(self.query.clone(), self.page, self.per_page);
        tracing::debug!(query = %request.query, page = request.page, "page fetch started");
        PageTicket {
            generation: self.generation,
            request,
        }
    }

    /// Apply the outcome of the fetch started with `ticket`.
    pub fn apply(
        &mut self,
        ticket: &PageTicket,
        result: Result<PageResult, FetchError>,
        now: Instant,
    ) -> Applied {
        if ticket.generation != self.generation
            || self.state != LoadState::Loading
            || ticket.page() != self.page
        {
            tracing::debug!(
                page = ticket.page(),
                query = %ticket.request.query,
                "discarding stale page result"
            );
            return Applied::Stale;
        }

        match result {
            Ok(page) => {
                self.backoff.reset();
                self.retry_gate = RetryGate::Open;
                self.last_error = None;
                let terminal = page.is_terminal();
                if page.dropped > 0 {
                    tracing::warn!(
                        page = ticket.page(),
                        dropped = page.dropped,
                        "skipped malformed items"
                    );
                }
                let (added, duplicates) = self.append(page.items);
                if added > 0 || !terminal {
                    self.page += 1;
                }
                if terminal {
                    self.state = LoadState::Exhausted;
                    tracing::debug!(total = self.items.len(), "feed exhausted");
                    Applied::Exhausted { added }
                } else {
                    self.state = LoadState::Idle;
                    Applied::Appended { added, duplicates }
                }
            }
            Err(err) => {
                self.state = LoadState::Idle;
                self.retry_gate = if err.is_retryable() {
                    let delay = self.backoff.record_failure();
                    tracing::warn!(
                        page = ticket.page(),
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "page fetch failed, backing off"
                    );
                    RetryGate::Until(now + delay)
                } else {
                    tracing::warn!(page = ticket.page(), error = %err, "page fetch rejected");
                    RetryGate::Manual
                };
                self.last_error = Some(err.clone());
                Applied::Failed(err)
            }
        }
    }

    fn append(&mut self, items: Vec<ImageItem>) -> (usize, usize) {
        let mut added = 0;
        let mut duplicates = 0;
        for item in items {
            if self.seen.insert(item.id().clone()) {
                self.items.push(item);
                added += 1;
            } else {
                duplicates += 1;
            }
        }
        (added, duplicates)
    }

    /// Start over with a new query. Any fetch still in flight becomes stale.
    pub fn reset(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.items.clear();
        self.seen.clear();
        self.page = 1;
        self.state = LoadState::Idle;
        self.generation = self.generation.next();
        self.backoff.reset();
        self.retry_gate = RetryGate::Open;
        self.last_error = None;
    }
}

impl Default for PaginationCoordinator {
    fn default() -> Self {
        Self::new(crate::source::DEFAULT_QUERY, crate::source::DEFAULT_PER_PAGE)
    }
}
