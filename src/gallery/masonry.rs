//! Greedy shortest-column masonry layout.
//!
//! [`layout`] is a pure function of the accumulated items and a column count.
//! It is re-run from scratch whenever either input changes; nothing patches
//! an existing [`ColumnLayout`] in place.
//!
//! # Example
//!
//! ```
//! use mosaic::gallery::{Dimensions, ImageItem, layout};
//!
//! let items: Vec<_> = (1..=4_u64)
//!     .map(|id| ImageItem::new(id, "https://img.test").with_dimensions(Dimensions::new(10, 10)))
//!     .collect();
//! let columns = layout(&items, 3).unwrap();
//! assert_eq!(columns.column(0).unwrap().len(), 2);
//! ```

use thiserror::Error;

use super::item::ImageItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("column count must be at least 1")]
    ZeroColumns,
}

/// One vertical partition of the layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Column {
    items: Vec<ImageItem>,
    height: f64,
}

impl Column {
    /// Items in arrival order.
    pub fn items(&self) -> &[ImageItem] {
        &self.items
    }

    /// Sum of the aspect ratios of the items in this column.
    pub const fn height(&self) -> f64 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn push(&mut self, item: &ImageItem) {
        self.height += item.aspect_ratio();
        self.items.push(item.clone());
    }
}

/// Partition of an item sequence into ordered columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnLayout {
    columns: Vec<Column>,
}

impl ColumnLayout {
    /// A layout with `column_count` empty columns.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::ZeroColumns`] when `column_count` is zero.
    pub fn empty(column_count: usize) -> Result<Self, LayoutError> {
        layout(&[], column_count)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn item_count(&self) -> usize {
        self.columns.iter().map(Column::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.iter().all(Column::is_empty)
    }

    /// Accumulated heights, one per column.
    pub fn heights(&self) -> Vec<f64> {
        self.columns.iter().map(Column::height).collect()
    }

    /// Difference between the tallest and the shortest column.
    pub fn height_spread(&self) -> f64 {
        let heights = self.heights();
        let max = heights.iter().copied().fold(f64::MIN, f64::max);
        let min = heights.iter().copied().fold(f64::MAX, f64::min);
        if heights.is_empty() { 0.0 } else { max - min }
    }

    /// Column and row of the item with the given id.
    pub fn position_of(&self, id: &super::ItemId) -> Option<(usize, usize)> {
        self.columns.iter().enumerate().find_map(|(col, column)| {
            column
                .items
                .iter()
                .position(|item| item.id() == id)
                .map(|row| (col, row))
        })
    }
}

/// Distribute `items` over `column_count` columns.
///
/// Items are visited in order; each goes to the column with the smallest
/// accumulated height, the lowest index winning ties. That column then grows
/// by the item's aspect ratio.
///
/// # Errors
///
/// Returns [`LayoutError::ZeroColumns`] when `column_count` is zero.
pub fn layout(items: &[ImageItem], column_count: usize) -> Result<ColumnLayout, LayoutError> {
    if column_count == 0 {
        return Err(LayoutError::ZeroColumns);
    }
    let mut columns = vec![Column::default(); column_count];
    for item in items {
        let shortest = shortest_column(&columns);
        columns[shortest].push(item);
    }
    Ok(ColumnLayout { columns })
}

fn shortest_column(columns: &[Column]) -> usize {
    let mut index = 0;
    let mut best = columns.first().map_or(0.0, Column::height);
    for (i, column) in columns.iter().enumerate().skip(1) {
        if column.height < best {
            best = column.height;
            index = i;
        }
    }
    index
}
