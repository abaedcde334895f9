//! Scroll and resize signals.
//!
//! [`ScrollTrigger`] observes plain scroll geometry and viewport width and
//! reports the two signals the gallery reacts to: the load-more sentinel
//! coming into view, and the viewport crossing the width breakpoint.

/// Terminal width (in columns) at and above which the desktop layout is used.
pub const DEFAULT_BREAKPOINT: u16 = 120;

/// Coarse viewport size that selects the column count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidthClass {
    Compact,
    Desktop,
}

impl WidthClass {
    pub const fn column_count(self) -> usize {
        match self {
            Self::Compact => 2,
            Self::Desktop => 3,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Desktop => "desktop",
        }
    }
}

/// A signal emitted by [`ScrollTrigger::observe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerSignal {
    LoadMoreVisible,
    WidthClassChanged(WidthClass),
}

/// Scroll geometry the trigger inspects. Units are rendered lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollSnapshot {
    /// First visible line.
    pub offset: usize,
    /// Number of visible lines.
    pub height: usize,
    /// Total rendered lines, sentinel included.
    pub total: usize,
    /// Viewport width in columns.
    pub width: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollTrigger {
    breakpoint: u16,
    forced: Option<WidthClass>,
    lookahead: Option<usize>,
}

impl Default for ScrollTrigger {
    fn default() -> Self {
        Self::new(DEFAULT_BREAKPOINT)
    }
}

impl ScrollTrigger {
    pub const fn new(breakpoint: u16) -> Self {
        Self {
            breakpoint,
            forced: None,
            lookahead: None,
        }
    }

    /// Pin the width class regardless of viewport width.
    #[must_use]
    pub const fn with_forced_class(mut self, forced: Option<WidthClass>) -> Self {
        self.forced = forced;
        self
    }

    /// Lines below the viewport within which the sentinel counts as visible.
    /// Defaults to one viewport height.
    #[must_use]
    pub const fn with_lookahead(mut self, lines: usize) -> Self {
        self.lookahead = Some(lines);
        self
    }

    pub const fn breakpoint(&self) -> u16 {
        self.breakpoint
    }

    pub fn classify(&self, width: u16) -> WidthClass {
        self.forced.unwrap_or(if width >= self.breakpoint {
            WidthClass::Desktop
        } else {
            WidthClass::Compact
        })
    }

    /// Whether the sentinel (the last rendered line) is visible or within
    /// the look-ahead margin below the viewport.
    pub fn sentinel_near(&self, snapshot: ScrollSnapshot) -> bool {
        let lookahead = self.lookahead.unwrap_or(snapshot.height);
        let reach = snapshot
            .offset
            .saturating_add(snapshot.height)
            .saturating_add(lookahead);
        reach >= snapshot.total
    }

    /// Signals for the current geometry, given the width class the layout
    /// was last computed for.
    pub fn observe(&self, snapshot: ScrollSnapshot, current: WidthClass) -> Vec<TriggerSignal> {
        let mut signals = Vec::new();
        let class = self.classify(snapshot.width);
        if class != current {
            signals.push(TriggerSignal::WidthClassChanged(class));
        }
        if self.sentinel_near(snapshot) {
            signals.push(TriggerSignal::LoadMoreVisible);
        }
        signals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(offset: usize, height: usize, total: usize, width: u16) -> ScrollSnapshot {
        ScrollSnapshot {
            offset,
            height,
            total,
            width,
        }
    }

    #[test]
    fn test_classify_uses_breakpoint() {
        let trigger = ScrollTrigger::new(120);
        assert_eq!(trigger.classify(119), WidthClass::Compact);
        assert_eq!(trigger.classify(120), WidthClass::Desktop);
        assert_eq!(WidthClass::Compact.column_count(), 2);
        assert_eq!(WidthClass::Desktop.column_count(), 3);
    }

    #[test]
    fn test_forced_class_ignores_width() {
        let trigger = ScrollTrigger::new(120).with_forced_class(Some(WidthClass::Compact));
        assert_eq!(trigger.classify(300), WidthClass::Compact);
    }

    #[test]
    fn test_empty_content_shows_sentinel() {
        let trigger = ScrollTrigger::new(120);
        assert!(trigger.sentinel_near(snapshot(0, 24, 1, 80)));
    }

    #[test]
    fn test_sentinel_far_below_is_not_near() {
        let trigger = ScrollTrigger::new(120);
        assert!(!trigger.sentinel_near(snapshot(0, 24, 200, 80)));
        assert!(trigger.sentinel_near(snapshot(152, 24, 200, 80)));
    }

    #[test]
    fn test_lookahead_override() {
        let trigger = ScrollTrigger::new(120).with_lookahead(0);
        assert!(!trigger.sentinel_near(snapshot(0, 24, 25, 80)));
        assert!(trigger.sentinel_near(snapshot(1, 24, 25, 80)));
    }

    #[test]
    fn test_observe_reports_width_change_without_load_more() {
        let trigger = ScrollTrigger::new(120);
        let signals = trigger.observe(snapshot(0, 24, 500, 80), WidthClass::Desktop);
        assert_eq!(
            signals,
            vec![TriggerSignal::WidthClassChanged(WidthClass::Compact)]
        );
    }

    #[test]
    fn test_observe_reports_nothing_when_settled() {
        let trigger = ScrollTrigger::new(120);
        assert!(
            trigger
                .observe(snapshot(0, 24, 500, 80), WidthClass::Compact)
                .is_empty()
        );
    }
}
