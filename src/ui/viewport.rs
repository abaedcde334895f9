//! The window onto the gallery's rendered lines.
//!
//! Gallery content is a stack of terminal rows whose last row is the
//! load-more sentinel. A [`Viewport`] keeps a top offset into that stack and
//! never lets it run past the last full window, so every relayout or resize
//! that shortens the content pulls the offset back in.

use std::ops::Range;

/// A scroll request, in gallery lines or in window heights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scroll {
    Up(usize),
    Down(usize),
    PageUp,
    PageDown,
    HalfPageUp,
    HalfPageDown,
    Top,
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    width: u16,
    height: u16,
    offset: usize,
    total_lines: usize,
}

impl Viewport {
    /// An empty window. `height` is the gallery area without the status bar.
    pub const fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            offset: 0,
            total_lines: 0,
        }
    }

    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub const fn width(&self) -> u16 {
        self.width
    }

    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Rendered gallery lines, sentinel included.
    pub const fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Content lines currently on screen.
    pub fn visible_range(&self) -> Range<usize> {
        self.offset..(self.offset + self.height as usize).min(self.total_lines)
    }

    pub fn scroll(&mut self, step: Scroll) {
        let window = self.height as usize;
        let target = match step {
            Scroll::Up(lines) => self.offset.saturating_sub(lines),
            Scroll::Down(lines) => self.offset.saturating_add(lines),
            Scroll::PageUp => self.offset.saturating_sub(window),
            Scroll::PageDown => self.offset.saturating_add(window),
            Scroll::HalfPageUp => self.offset.saturating_sub(window / 2),
            Scroll::HalfPageDown => self.offset.saturating_add(window / 2),
            Scroll::Top => 0,
            Scroll::Bottom => usize::MAX,
        };
        self.offset = target.min(self.last_offset());
    }

    pub const fn can_scroll_up(&self) -> bool {
        self.offset > 0
    }

    pub const fn can_scroll_down(&self) -> bool {
        self.offset < self.last_offset()
    }

    /// Position in the gallery for the status bar, 0-100. Content that fits
    /// the window reads as fully scrolled.
    pub fn scroll_percent(&self) -> u8 {
        let last = self.last_offset();
        if last == 0 {
            return 100;
        }
        // offset <= last, so the quotient stays within 0-100
        u8::try_from((self.offset * 100 + last / 2) / last).unwrap_or(100)
    }

    /// Scroll the least distance that puts `span` on screen. A span taller
    /// than the window is aligned to its top line.
    pub fn reveal(&mut self, span: Range<usize>) {
        let window = self.height as usize;
        let target = if span.start < self.offset {
            span.start
        } else if span.end > self.offset + window {
            span.end.saturating_sub(window).min(span.start)
        } else {
            return;
        };
        self.offset = target.min(self.last_offset());
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.offset = self.offset.min(self.last_offset());
    }

    /// Adopt a new content length after the cards were laid out again.
    pub fn set_total_lines(&mut self, total: usize) {
        self.total_lines = total;
        self.offset = self.offset.min(self.last_offset());
    }

    /// Offset that puts the final line, the sentinel, on the bottom row.
    const fn last_offset(&self) -> usize {
        self.total_lines.saturating_sub(self.height as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// A 20-row window over `cards` cards of `rows` lines each plus the
    /// sentinel line.
    fn gallery(cards: usize, rows: usize) -> Viewport {
        let mut vp = Viewport::new(80, 20);
        vp.set_total_lines(cards * rows + 1);
        vp
    }

    fn sentinel_on_screen(vp: &Viewport) -> bool {
        vp.visible_range().contains(&(vp.total_lines() - 1))
    }

    #[test]
    fn test_short_gallery_shows_sentinel_without_scrolling() {
        let mut vp = gallery(3, 5);
        assert_eq!(vp.visible_range(), 0..16);
        assert!(sentinel_on_screen(&vp));
        assert!(!vp.can_scroll_down());

        vp.scroll(Scroll::PageDown);
        assert_eq!(vp.offset(), 0);
        assert_eq!(vp.scroll_percent(), 100);
    }

    #[test]
    fn test_bottom_puts_sentinel_on_last_row() {
        let mut vp = gallery(10, 6);
        assert!(!sentinel_on_screen(&vp));

        vp.scroll(Scroll::Bottom);
        assert_eq!(vp.offset(), 41);
        assert_eq!(vp.visible_range(), 41..61);
        assert!(sentinel_on_screen(&vp));
        assert_eq!(vp.scroll_percent(), 100);

        vp.scroll(Scroll::Down(5));
        assert_eq!(vp.offset(), 41);
    }

    #[test]
    fn test_page_and_half_page_steps() {
        let mut vp = gallery(10, 6);
        vp.scroll(Scroll::HalfPageDown);
        assert_eq!(vp.offset(), 10);
        vp.scroll(Scroll::PageDown);
        assert_eq!(vp.offset(), 30);
        vp.scroll(Scroll::PageUp);
        vp.scroll(Scroll::HalfPageUp);
        assert_eq!(vp.offset(), 0);
        assert!(!vp.can_scroll_up());

        vp.scroll(Scroll::Up(3));
        assert_eq!(vp.offset(), 0);
    }

    #[test]
    fn test_reveal_card_below_aligns_its_bottom() {
        let mut vp = gallery(10, 6);
        // Card 5 spans lines 30..36
        vp.reveal(30..36);
        assert_eq!(vp.offset(), 16);
        assert_eq!(vp.visible_range().end, 36);
    }

    #[test]
    fn test_reveal_card_above_aligns_its_top() {
        let mut vp = gallery(10, 6);
        vp.scroll(Scroll::Bottom);
        vp.reveal(12..18);
        assert_eq!(vp.offset(), 12);
    }

    #[test]
    fn test_reveal_visible_card_keeps_position() {
        let mut vp = gallery(10, 6);
        vp.scroll(Scroll::Down(7));
        vp.reveal(12..18);
        assert_eq!(vp.offset(), 7);
    }

    #[test]
    fn test_reveal_tall_card_shows_its_top() {
        let mut vp = gallery(4, 30);
        vp.reveal(60..90);
        assert_eq!(vp.offset(), 60);
    }

    #[test]
    fn test_shorter_layout_pulls_offset_back() {
        let mut vp = gallery(20, 6);
        vp.scroll(Scroll::Bottom);
        assert_eq!(vp.offset(), 101);

        // Switching to more columns shortens the gallery
        vp.set_total_lines(46);
        assert_eq!(vp.offset(), 26);
        assert!(sentinel_on_screen(&vp));

        vp.set_total_lines(1);
        assert_eq!(vp.offset(), 0);
        assert_eq!(vp.visible_range(), 0..1);
    }

    #[test]
    fn test_taller_window_pulls_offset_back() {
        let mut vp = gallery(10, 6);
        vp.scroll(Scroll::Bottom);
        vp.resize(120, 40);
        assert_eq!(vp.width(), 120);
        assert_eq!(vp.offset(), 21);
        assert!(sentinel_on_screen(&vp));
    }

    #[test]
    fn test_scroll_percent_midway() {
        let mut vp = gallery(10, 6);
        vp.scroll(Scroll::Down(20));
        assert_eq!(vp.scroll_percent(), 49);
        vp.scroll(Scroll::Top);
        assert_eq!(vp.scroll_percent(), 0);
    }

    fn scroll_strategy() -> impl Strategy<Value = Scroll> {
        prop_oneof![
            (0..50usize).prop_map(Scroll::Up),
            (0..50usize).prop_map(Scroll::Down),
            Just(Scroll::PageUp),
            Just(Scroll::PageDown),
            Just(Scroll::HalfPageDown),
            Just(Scroll::Bottom),
        ]
    }

    proptest! {
        #[test]
        fn prop_offset_never_passes_last_window(
            total in 1usize..400,
            height in 1u16..60,
            steps in proptest::collection::vec(scroll_strategy(), 0..20),
            new_total in 1usize..400,
        ) {
            let mut vp = Viewport::new(80, height);
            vp.set_total_lines(total);
            for step in steps {
                vp.scroll(step);
                prop_assert!(vp.offset() <= total.saturating_sub(height as usize));
            }
            vp.set_total_lines(new_total);
            prop_assert!(vp.offset() <= new_total.saturating_sub(height as usize));
            prop_assert!(vp.visible_range().end <= new_total);
            prop_assert!(vp.scroll_percent() <= 100);
        }
    }
}
