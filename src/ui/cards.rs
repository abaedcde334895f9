//! Terminal geometry for the masonry columns.
//!
//! [`GalleryGeometry`] turns a [`ColumnLayout`] into card rectangles measured
//! in terminal cells: each column gets an x offset and width, each card a
//! top line and a height derived from its aspect ratio. The scrollable
//! content is the tallest column plus the load-more sentinel row.

use crate::gallery::ColumnLayout;

/// Blank cells between adjacent columns.
pub const COLUMN_GAP: u16 = 1;
/// Blank rows between stacked cards.
pub const CARD_GAP: usize = 1;
/// Smallest card, borders included.
pub const CARD_MIN_ROWS: usize = 3;
/// Rows reserved below the columns for the sentinel line.
pub const SENTINEL_ROWS: usize = 1;

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f64 = 2.0;

/// Rows a card occupies for a given image aspect ratio (height / width).
pub fn card_rows(aspect_ratio: f64, column_width: u16) -> usize {
    let inner_width = f64::from(column_width.saturating_sub(2));
    // Bounded by the finite aspect ratio of a validated image
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let inner_rows = (aspect_ratio * inner_width / CELL_ASPECT).round().max(0.0) as usize;
    (inner_rows + 2).max(CARD_MIN_ROWS)
}

/// Vertical placement of one card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardSlot {
    pub top: usize,
    pub height: usize,
}

impl CardSlot {
    pub const fn bottom(&self) -> usize {
        self.top + self.height
    }

    pub const fn contains(&self, line: usize) -> bool {
        line >= self.top && line < self.bottom()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnGeometry {
    pub x: u16,
    pub slots: Vec<CardSlot>,
}

impl ColumnGeometry {
    /// Rendered height of the column in lines.
    pub fn height(&self) -> usize {
        self.slots.last().map_or(0, CardSlot::bottom)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryGeometry {
    columns: Vec<ColumnGeometry>,
    column_width: u16,
}

impl GalleryGeometry {
    pub fn compute(layout: &ColumnLayout, total_width: u16) -> Self {
        let count = layout.column_count();
        if count == 0 {
            return Self::default();
        }
        // Column counts are tiny
        #[allow(clippy::cast_possible_truncation)]
        let count_u16 = count as u16;
        let gaps = COLUMN_GAP.saturating_mul(count_u16.saturating_sub(1));
        let column_width = total_width.saturating_sub(gaps) / count_u16;

        let columns = layout
            .columns()
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                #[allow(clippy::cast_possible_truncation)]
                let x = (idx as u16).saturating_mul(column_width.saturating_add(COLUMN_GAP));
                let mut top = 0;
                let slots = column
                    .items()
                    .iter()
                    .map(|item| {
                        let height = card_rows(item.aspect_ratio(), column_width);
                        let slot = CardSlot { top, height };
                        top += height + CARD_GAP;
                        slot
                    })
                    .collect();
                ColumnGeometry { x, slots }
            })
            .collect();

        Self {
            columns,
            column_width,
        }
    }

    pub fn columns(&self) -> &[ColumnGeometry] {
        &self.columns
    }

    pub const fn column_width(&self) -> u16 {
        self.column_width
    }

    pub fn slot(&self, column: usize, index: usize) -> Option<CardSlot> {
        self.columns.get(column)?.slots.get(index).copied()
    }

    /// Height of the tallest column.
    pub fn content_height(&self) -> usize {
        self.columns
            .iter()
            .map(ColumnGeometry::height)
            .max()
            .unwrap_or(0)
    }

    /// Total scrollable lines; the last one is the sentinel.
    pub fn total_lines(&self) -> usize {
        self.content_height() + SENTINEL_ROWS
    }

    pub fn sentinel_line(&self) -> usize {
        self.content_height()
    }

    /// Column under screen x, ignoring the gaps between columns.
    pub fn column_at_x(&self, x: u16) -> Option<usize> {
        self.columns
            .iter()
            .position(|col| x >= col.x && x < col.x.saturating_add(self.column_width))
    }

    /// Card index within `column` covering content line `line`.
    pub fn card_at(&self, column: usize, line: usize) -> Option<usize> {
        self.columns
            .get(column)?
            .slots
            .iter()
            .position(|slot| slot.contains(line))
    }

    /// Card in `column` whose vertical span is closest to `line`.
    pub fn nearest_card(&self, column: usize, line: usize) -> Option<usize> {
        let slots = &self.columns.get(column)?.slots;
        slots
            .iter()
            .enumerate()
            .min_by_key(|(_, slot)| {
                if slot.contains(line) {
                    0
                } else if line < slot.top {
                    slot.top - line
                } else {
                    line + 1 - slot.bottom()
                }
            })
            .map(|(idx, _)| idx)
    }
}
