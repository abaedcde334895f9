//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`viewport`]: Scroll position and visible range management
//! - [`cards`]: Card geometry for the masonry columns
//! - [`style`]: Card colors and bar styles

pub mod cards;
pub mod style;
pub mod viewport;

mod overlays;
mod render;
mod status;

pub use cards::{CardSlot, GalleryGeometry};
pub use render::{render, truncate_to_width};
pub use status::{state_label, status_line};

#[cfg(test)]
mod tests;
