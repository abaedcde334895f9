//! Image source adapters.
//!
//! An [`ImageSource`] turns a [`PageRequest`] into one page of normalized
//! [`ImageItem`]s. Adapters perform exactly one round trip per call and never
//! retry; retry policy belongs to the
//! [`PaginationCoordinator`](crate::gallery::PaginationCoordinator).
//!
//! - [`pexels`]: HTTP adapter for Pexels-compatible search endpoints
//! - [`memory`]: scripted in-memory source

pub mod memory;
pub mod pexels;

pub use memory::MemorySource;
pub use pexels::PexelsSource;

use thiserror::Error;

use crate::gallery::ImageItem;

/// Search term used when the caller supplies an empty query.
pub const DEFAULT_QUERY: &str = "mining";

/// Page size requested when nothing else is configured.
pub const DEFAULT_PER_PAGE: u32 = 30;

/// One paginated search request. `page` starts at 1.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageRequest {
    pub query: String,
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    pub fn new(query: impl Into<String>, page: u32, per_page: u32) -> Self {
        Self {
            query: query.into(),
            page,
            per_page,
        }
    }

    /// The query to send, substituting `default` for a blank one.
    pub fn effective_query<'a>(&'a self, default: &'a str) -> &'a str {
        let trimmed = self.query.trim();
        if trimmed.is_empty() { default } else { trimmed }
    }
}

/// A successfully fetched page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageResult {
    /// Normalized items in feed order.
    pub items: Vec<ImageItem>,
    /// The source reported that no page follows this one.
    pub end_of_results: bool,
    /// Raw records skipped because they were malformed.
    pub dropped: usize,
}

impl PageResult {
    pub const fn new(items: Vec<ImageItem>, end_of_results: bool) -> Self {
        Self {
            items,
            end_of_results,
            dropped: 0,
        }
    }

    /// An empty terminal page.
    pub const fn end() -> Self {
        Self::new(Vec::new(), true)
    }

    /// Whether this page ends pagination for its query.
    ///
    /// A page that only came back empty because every record was malformed
    /// is not terminal.
    pub fn is_terminal(&self) -> bool {
        self.end_of_results || (self.items.is_empty() && self.dropped == 0)
    }
}

/// Why a page could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Network trouble, timeouts, rate limiting or server errors.
    #[error("temporarily unavailable: {0}")]
    Transient(String),
    /// Rejected request or a response that cannot be decoded.
    #[error("request failed: {0}")]
    Permanent(String),
}

impl FetchError {
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

/// A paginated image feed.
pub trait ImageSource: Send + Sync {
    /// Fetch one page.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] on transport or decoding failure.
    fn fetch_page(&self, request: &PageRequest) -> Result<PageResult, FetchError>;
}
