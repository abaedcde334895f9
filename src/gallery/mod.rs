//! The incremental masonry engine.
//!
//! - [`item`]: normalized image records
//! - [`pagination`]: the load-more state machine owning the accumulated items
//! - [`masonry`]: greedy shortest-column layout
//! - [`trigger`]: scroll/resize signals that drive the two above
//! - [`backoff`]: retry pacing after failed fetches

pub mod backoff;
pub mod item;
pub mod masonry;
pub mod pagination;
pub mod trigger;

pub use backoff::Backoff;
pub use item::{Dimensions, FALLBACK_ASPECT_RATIO, ImageItem, ItemId};
pub use masonry::{Column, ColumnLayout, LayoutError, layout};
pub use pagination::{Applied, Generation, LoadState, PageTicket, PaginationCoordinator};
pub use trigger::{ScrollSnapshot, ScrollTrigger, TriggerSignal, WidthClass};

/// A named preset search shown on the start screen and bound to `1`-`4`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    pub title: &'static str,
    pub description: &'static str,
    pub query: &'static str,
}

pub const COLLECTIONS: [Collection; 4] = [
    Collection {
        title: "Mining",
        description: "A collection of mining photography",
        query: "mining",
    },
    Collection {
        title: "Industrial",
        description: "Industrial landscapes and machinery",
        query: "industrial",
    },
    Collection {
        title: "Corporate Conferences",
        description: "Corporate conferences and events",
        query: "corporate conferences",
    },
    Collection {
        title: "Portraits",
        description: "Epic portraits",
        query: "portraits",
    },
];
