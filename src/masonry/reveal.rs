/// Distance from the bottom of the document, in pixels, within which a scroll
/// position triggers the next batch of tiles.
pub const BOTTOM_THRESHOLD: f64 = 500.0;

/// RevealState
///
/// Lazy-reveal window over the ordered item list. The engine lays out only the
/// first `visible` items; scrolling near the bottom widens the window in
/// column-proportional batches until every item is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealState {
    total: usize,
    visible: usize,
    lazy: bool,
}

impl RevealState {
    /// The initial window covers three rows' worth of tiles.
    pub fn new(total: usize, columns: usize, lazy: bool) -> Self {
        RevealState {
            total,
            visible: (columns * 3).min(total),
            lazy,
        }
    }

    pub fn visible(&self) -> usize {
        self.visible
    }

    pub fn is_complete(&self) -> bool {
        self.visible >= self.total
    }

    /// Reacts to a scroll position. Returns true when the window grew, which
    /// obliges the caller to re-run layout. With lazy reveal disabled the
    /// window never changes after construction.
    pub fn on_scroll(
        &mut self,
        viewport_height: f64,
        scroll_y: f64,
        document_height: f64,
        columns: usize,
    ) -> bool {
        if !self.lazy || self.is_complete() {
            return false;
        }
        let distance_from_bottom = document_height - (scroll_y + viewport_height);
        if distance_from_bottom > BOTTOM_THRESHOLD {
            return false;
        }
        // Two more rows per batch.
        self.visible = (self.visible + columns * 2).min(self.total);
        true
    }

    /// New items appended to the source list extend the total without
    /// disturbing the current window; a shrunk list clamps it.
    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        self.visible = self.visible.min(total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_window_is_three_rows() {
        let reveal = RevealState::new(50, 4, true);
        assert_eq!(reveal.visible(), 12);
        assert!(!reveal.is_complete());
    }

    #[test]
    fn initial_window_clamped_to_total() {
        let reveal = RevealState::new(5, 4, true);
        assert_eq!(reveal.visible(), 5);
        assert!(reveal.is_complete());
    }

    #[test]
    fn scroll_near_bottom_grows_by_two_rows() {
        let mut reveal = RevealState::new(50, 4, true);
        // 2000px document, 800px viewport, scrolled to 750: 450px from the
        // bottom, inside the threshold.
        assert!(reveal.on_scroll(800.0, 750.0, 2000.0, 4));
        assert_eq!(reveal.visible(), 20);
    }

    #[test]
    fn scroll_far_from_bottom_is_inert() {
        let mut reveal = RevealState::new(50, 4, true);
        assert!(!reveal.on_scroll(800.0, 0.0, 5000.0, 4));
        assert_eq!(reveal.visible(), 12);
    }

    #[test]
    fn window_growth_caps_at_total() {
        let mut reveal = RevealState::new(14, 4, true);
        assert!(reveal.on_scroll(800.0, 1000.0, 1800.0, 4));
        assert_eq!(reveal.visible(), 14);
        assert!(reveal.is_complete());
        // Further scrolls once complete report no change.
        assert!(!reveal.on_scroll(800.0, 1000.0, 1800.0, 4));
    }

    #[test]
    fn lazy_disabled_freezes_the_window() {
        let mut reveal = RevealState::new(50, 4, false);
        assert_eq!(reveal.visible(), 12);
        assert!(!reveal.on_scroll(800.0, 10_000.0, 10_000.0, 4));
        assert_eq!(reveal.visible(), 12);
    }

    #[test]
    fn shrunk_total_clamps_the_window() {
        let mut reveal = RevealState::new(50, 4, true);
        reveal.set_total(8);
        assert_eq!(reveal.visible(), 8);
        assert!(reveal.is_complete());
    }

    #[test]
    fn repeated_scrolls_reach_the_full_list() {
        let mut reveal = RevealState::new(100, 5, true);
        let mut rounds = 0;
        while !reveal.is_complete() {
            assert!(reveal.on_scroll(800.0, 9_500.0, 10_000.0, 5));
            rounds += 1;
            assert!(rounds < 100);
        }
        assert_eq!(reveal.visible(), 100);
    }
}
