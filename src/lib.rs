// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. source::ImageSource)
    clippy::module_name_repetitions
)]

//! # Mosaic
//!
//! An incremental masonry image gallery for the terminal.
//!
//! Mosaic pages through an image search, keeps the accumulated results
//! balanced across a responsive number of columns, and fetches the next
//! page when the bottom of the gallery scrolls into view.
//!
//! ## Architecture
//!
//! Mosaic uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`gallery`]: Pagination, column balancing and scroll triggers
//! - [`source`]: Image source adapters (Pexels, in-memory)
//! - [`app`]: Main application loop and state
//! - [`ui`]: Terminal UI components
//! - [`config`]: Saved command-line defaults
//! - [`perf`]: Opt-in timing and debug event log

pub mod app;
pub mod config;
pub mod gallery;
pub mod perf;
pub mod source;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::gallery::{ColumnLayout, ImageItem, LoadState, PaginationCoordinator, layout};
    pub use crate::source::{FetchError, ImageSource, PageRequest, PageResult};
    pub use crate::ui::viewport::{Scroll, Viewport};
}
