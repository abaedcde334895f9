//! Normalized image records produced by an [`ImageSource`](crate::source::ImageSource).

use std::fmt;
use std::num::NonZeroU32;

/// Aspect ratio assumed for records that carry no dimensions at all (square).
pub const FALLBACK_ASPECT_RATIO: f64 = 1.0;

/// Source-provided identity of an image.
///
/// Feeds report ids as integers or strings; both normalize to the textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for ItemId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Intrinsic pixel size of an image. Both sides are strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    width: NonZeroU32,
    height: NonZeroU32,
}

impl Dimensions {
    /// Returns `None` when either side is zero.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        Some(Self {
            width: NonZeroU32::new(width)?,
            height: NonZeroU32::new(height)?,
        })
    }

    pub const fn width(self) -> u32 {
        self.width.get()
    }

    pub const fn height(self) -> u32 {
        self.height.get()
    }

    pub fn aspect_ratio(self) -> f64 {
        f64::from(self.height.get()) / f64::from(self.width.get())
    }
}

/// A single image in the accumulated feed. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageItem {
    id: ItemId,
    url: String,
    alt: String,
    dimensions: Option<Dimensions>,
    photographer: Option<String>,
    photographer_url: Option<String>,
    page_url: Option<String>,
    avg_color: Option<String>,
}

impl ImageItem {
    pub fn new(id: impl Into<ItemId>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            alt: String::new(),
            dimensions: None,
            photographer: None,
            photographer_url: None,
            page_url: None,
            avg_color: None,
        }
    }

    #[must_use]
    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = alt.into();
        self
    }

    #[must_use]
    pub const fn with_dimensions(mut self, dimensions: Option<Dimensions>) -> Self {
        self.dimensions = dimensions;
        self
    }

    #[must_use]
    pub fn with_photographer(mut self, name: Option<String>, profile_url: Option<String>) -> Self {
        self.photographer = name;
        self.photographer_url = profile_url;
        self
    }

    #[must_use]
    pub fn with_page_url(mut self, page_url: Option<String>) -> Self {
        self.page_url = page_url;
        self
    }

    #[must_use]
    pub fn with_avg_color(mut self, avg_color: Option<String>) -> Self {
        self.avg_color = avg_color;
        self
    }

    pub const fn id(&self) -> &ItemId {
        &self.id
    }

    /// Display URL of the image itself.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Caption text, falling back to the photographer's name when the feed
    /// left the alt text empty.
    pub fn caption(&self) -> &str {
        if self.alt.trim().is_empty() {
            self.photographer.as_deref().unwrap_or_default()
        } else {
            &self.alt
        }
    }

    pub fn alt(&self) -> &str {
        &self.alt
    }

    pub const fn dimensions(&self) -> Option<Dimensions> {
        self.dimensions
    }

    pub fn photographer(&self) -> Option<&str> {
        self.photographer.as_deref()
    }

    pub fn photographer_url(&self) -> Option<&str> {
        self.photographer_url.as_deref()
    }

    pub fn page_url(&self) -> Option<&str> {
        self.page_url.as_deref()
    }

    pub fn avg_color(&self) -> Option<&str> {
        self.avg_color.as_deref()
    }

    /// Height over width; used as the rendered height of the item under a
    /// fixed column width.
    pub fn aspect_ratio(&self) -> f64 {
        self.dimensions
            .map_or(FALLBACK_ASPECT_RATIO, Dimensions::aspect_ratio)
    }
}
