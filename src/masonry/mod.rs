//! Masonry layout engine.
//!
//! A pure computation module: no I/O, no shared state, no async. Given an
//! ordered item list, a viewport width, and a set of options it produces
//! pixel-exact tile positions, animation plans, and a lazy-reveal window.
//! The host (a rendered page, a test, a headless consumer) drives it with
//! viewport, scroll, hover, and image-load events and applies the plans it
//! returns.

pub mod animate;
pub mod layout;
pub mod reveal;
pub mod tile;

pub use animate::{
    AnimateFrom, AnimationSettings, ScaleTween, Scheduler, Tween, TweenState, hover_enter,
    hover_leave,
};
pub use layout::{DEFAULT_GAP, Layout, MasonryItem, Tile, column_count, compute_layout};
pub use reveal::RevealState;
pub use tile::{ImageState, TileImage};

use rand::{SeedableRng, rngs::SmallRng};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Resize events are coalesced over this interval before triggering a
/// relayout.
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(100);

/// MasonryOptions
///
/// Host-facing configuration. `Default` matches the documented defaults, so a
/// caller only overrides what it cares about.
#[derive(Debug, Clone)]
pub struct MasonryOptions {
    pub ease: String,
    pub duration: f64,
    pub stagger: f64,
    pub animate_from: AnimateFrom,
    pub scale_on_hover: bool,
    pub hover_scale: f64,
    pub blur_to_focus: bool,
    pub color_shift_on_hover: bool,
    pub max_columns: usize,
    pub lazy_load: bool,
    pub gap: f64,
}

impl Default for MasonryOptions {
    fn default() -> Self {
        MasonryOptions {
            ease: "power3.out".to_string(),
            duration: 0.6,
            stagger: 0.05,
            animate_from: AnimateFrom::Bottom,
            scale_on_hover: true,
            hover_scale: 0.95,
            blur_to_focus: true,
            color_shift_on_hover: false,
            max_columns: 5,
            lazy_load: true,
            gap: DEFAULT_GAP,
        }
    }
}

impl MasonryOptions {
    fn animation_settings(&self) -> AnimationSettings {
        AnimationSettings {
            ease: self.ease.clone(),
            duration: self.duration,
            stagger: self.stagger,
            animate_from: self.animate_from,
            blur_to_focus: self.blur_to_focus,
        }
    }
}

/// WidthDebouncer
///
/// Coalesces a burst of width changes into one value: each submission restarts
/// the window, and `poll` releases the latest width once the window has been
/// quiet for the full interval.
#[derive(Debug)]
pub struct WidthDebouncer {
    delay: Duration,
    pending: Option<(f64, Instant)>,
}

impl WidthDebouncer {
    pub fn new(delay: Duration) -> Self {
        WidthDebouncer {
            delay,
            pending: None,
        }
    }

    pub fn submit(&mut self, width: f64, now: Instant) {
        self.pending = Some((width, now));
    }

    pub fn poll(&mut self, now: Instant) -> Option<f64> {
        match self.pending {
            Some((width, submitted)) if now.duration_since(submitted) >= self.delay => {
                self.pending = None;
                Some(width)
            }
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// MasonryEngine
///
/// Owns the full client-side state for one masonry grid: the item list, the
/// resolved column count, the reveal window, the current layout, per-tile
/// image states, and the animation scheduler. Every mutation happens through
/// an explicit event method, so behavior is fully deterministic under test.
pub struct MasonryEngine {
    options: MasonryOptions,
    items: Vec<MasonryItem>,
    columns: usize,
    container_width: f64,
    debouncer: WidthDebouncer,
    reveal: RevealState,
    layout: Layout,
    scheduler: Scheduler,
    images: HashMap<String, TileImage>,
    has_mounted: bool,
    rng: SmallRng,
    on_item_click: Option<Box<dyn FnMut(&MasonryItem) + Send>>,
}

impl MasonryEngine {
    pub fn new(items: Vec<MasonryItem>, viewport_width: f64, options: MasonryOptions) -> Self {
        let columns = column_count(viewport_width, options.max_columns);
        let reveal = RevealState::new(items.len(), columns, options.lazy_load);

        let mut engine = MasonryEngine {
            options,
            items,
            columns,
            container_width: viewport_width,
            debouncer: WidthDebouncer::new(RESIZE_DEBOUNCE),
            reveal,
            layout: Layout::default(),
            scheduler: Scheduler::new(),
            images: HashMap::new(),
            has_mounted: false,
            rng: SmallRng::from_entropy(),
            on_item_click: None,
        };
        engine.relayout();
        engine
    }

    pub fn set_on_item_click(&mut self, handler: impl FnMut(&MasonryItem) + Send + 'static) {
        self.on_item_click = Some(Box::new(handler));
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn visible_count(&self) -> usize {
        self.reveal.visible()
    }

    pub fn image(&self, tile_id: &str) -> Option<&TileImage> {
        self.images.get(tile_id)
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Records a raw resize event. The new width takes effect only after the
    /// debounce window elapses (see `poll_resize`).
    pub fn on_resize(&mut self, viewport_width: f64, now: Instant) {
        self.debouncer.submit(viewport_width, now);
    }

    /// Releases a debounced width if its quiet period has passed, recomputing
    /// columns and layout. Returns the tweens scheduled by the resulting
    /// layout pass, if any.
    pub fn poll_resize(&mut self, now: Instant) -> Option<Vec<Tween>> {
        let width = self.debouncer.poll(now)?;
        self.container_width = width;
        self.columns = column_count(width, self.options.max_columns);
        Some(self.relayout())
    }

    /// Scroll event from the host. Grows the reveal window when near the
    /// bottom of the document, relaying out if it grew.
    pub fn on_scroll(
        &mut self,
        viewport_height: f64,
        scroll_y: f64,
        document_height: f64,
    ) -> Option<Vec<Tween>> {
        if self
            .reveal
            .on_scroll(viewport_height, scroll_y, document_height, self.columns)
        {
            Some(self.relayout())
        } else {
            None
        }
    }

    /// Replaces the item list, preserving the current reveal window. Image
    /// slots for ids no longer present are dropped.
    pub fn set_items(&mut self, items: Vec<MasonryItem>) -> Vec<Tween> {
        self.items = items;
        self.reveal.set_total(self.items.len());
        self.images
            .retain(|id, _| self.items.iter().any(|item| item.id == *id));
        self.relayout()
    }

    /// Click on a tile: resolves the item and forwards it to the registered
    /// handler. Unknown ids are ignored.
    pub fn on_tile_click(&mut self, tile_id: &str) {
        let Some(item) = self.items.iter().find(|item| item.id == tile_id).cloned() else {
            return;
        };
        if let Some(handler) = self.on_item_click.as_mut() {
            handler(&item);
        }
    }

    pub fn on_hover_enter(&self, tile_id: &str) -> Option<ScaleTween> {
        if !self.options.scale_on_hover || !self.layout.tiles.iter().any(|t| t.id == tile_id) {
            return None;
        }
        Some(hover_enter(self.options.hover_scale))
    }

    pub fn on_hover_leave(&self, tile_id: &str) -> Option<ScaleTween> {
        if !self.options.scale_on_hover || !self.layout.tiles.iter().any(|t| t.id == tile_id) {
            return None;
        }
        Some(hover_leave())
    }

    pub fn on_image_load(&mut self, tile_id: &str) {
        if let Some(image) = self.images.get_mut(tile_id) {
            image.on_load();
        }
    }

    pub fn on_image_error(&mut self, tile_id: &str) {
        if let Some(image) = self.images.get_mut(tile_id) {
            image.on_error();
        }
    }

    /// One layout pass over the currently revealed slice. The first pass with
    /// a non-empty result produces the entrance plan; every later pass
    /// produces a reflow plan. Newly revealed tiles get a fresh image slot;
    /// existing slots keep their load state across reflows.
    fn relayout(&mut self) -> Vec<Tween> {
        let visible = &self.items[..self.reveal.visible().min(self.items.len())];
        self.layout = compute_layout(visible, self.container_width, self.columns, self.options.gap);

        for tile in &self.layout.tiles {
            self.images.entry(tile.id.clone()).or_default();
        }

        let settings = self.options.animation_settings();
        let plan = if !self.has_mounted {
            animate::entrance_plan(
                &self.layout.tiles,
                self.container_width,
                self.layout.height,
                &settings,
                &mut self.rng,
            )
        } else {
            animate::reflow_plan(&self.layout.tiles, &settings)
        };

        if !self.layout.tiles.is_empty() {
            self.has_mounted = true;
        }

        self.scheduler.schedule(plan.clone());
        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize) -> Vec<MasonryItem> {
        (0..n)
            .map(|i| MasonryItem {
                id: format!("i{i}"),
                source_url: format!("/img/{i}.jpg"),
                link_url: format!("/p/{i}"),
                intrinsic_height: 200.0 + (i as f64 * 53.0) % 300.0,
                title: None,
                description: None,
            })
            .collect()
    }

    #[test]
    fn initial_layout_covers_three_rows_with_entrance_plan() {
        let engine = MasonryEngine::new(items(40), 1200.0, MasonryOptions::default());
        // 1200px resolves to 4 columns, so the initial window is 12 tiles.
        assert_eq!(engine.columns(), 4);
        assert_eq!(engine.visible_count(), 12);
        assert_eq!(engine.layout().tiles.len(), 12);
        // All twelve entrance tweens are pending.
        assert_eq!(engine.scheduler().active_count(), 12);
    }

    #[test]
    fn first_plan_is_entrance_later_plans_are_reflow() {
        let mut engine = MasonryEngine::new(items(40), 1200.0, MasonryOptions::default());
        let first = engine.scheduler().active_for("i0").unwrap().tween.clone();
        assert!(first.from.is_some());

        let plan = engine.on_scroll(800.0, 9_500.0, 10_000.0).unwrap();
        assert!(plan.iter().all(|t| t.from.is_none()));
    }

    #[test]
    fn scroll_near_bottom_extends_window_by_two_rows() {
        let mut engine = MasonryEngine::new(items(40), 1200.0, MasonryOptions::default());
        let plan = engine.on_scroll(800.0, 9_500.0, 10_000.0).unwrap();
        assert_eq!(engine.visible_count(), 20);
        assert_eq!(plan.len(), 20);
        // Far from the bottom nothing happens.
        assert!(engine.on_scroll(800.0, 0.0, 10_000.0).is_none());
    }

    #[test]
    fn lazy_load_disabled_never_extends() {
        let options = MasonryOptions {
            lazy_load: false,
            ..MasonryOptions::default()
        };
        let mut engine = MasonryEngine::new(items(40), 1200.0, options);
        assert_eq!(engine.visible_count(), 12);
        assert!(engine.on_scroll(800.0, 10_000.0, 10_000.0).is_none());
        assert_eq!(engine.visible_count(), 12);
    }

    #[test]
    fn resize_is_debounced_and_recomputes_columns() {
        let mut engine = MasonryEngine::new(items(40), 1200.0, MasonryOptions::default());
        let t0 = Instant::now();

        // A burst of resize events within the window releases nothing.
        engine.on_resize(700.0, t0);
        engine.on_resize(650.0, t0 + Duration::from_millis(40));
        assert!(engine.poll_resize(t0 + Duration::from_millis(80)).is_none());
        assert_eq!(engine.columns(), 4);

        // After 100ms of quiet the last width wins.
        let plan = engine.poll_resize(t0 + Duration::from_millis(141));
        assert!(plan.is_some());
        assert_eq!(engine.columns(), 3);
        assert!(!engine.debouncer.is_pending());
    }

    #[test]
    fn resize_round_trip_restores_the_layout() {
        let mut engine = MasonryEngine::new(items(40), 1200.0, MasonryOptions::default());
        let original = engine.layout().clone();

        let t0 = Instant::now();
        engine.on_resize(500.0, t0);
        engine.poll_resize(t0 + RESIZE_DEBOUNCE).unwrap();
        assert_ne!(engine.layout(), &original);

        engine.on_resize(1200.0, t0 + Duration::from_millis(200));
        engine
            .poll_resize(t0 + Duration::from_millis(200) + RESIZE_DEBOUNCE)
            .unwrap();
        assert_eq!(engine.layout(), &original);
    }

    #[test]
    fn relayout_replaces_pending_tweens_per_tile() {
        let mut engine = MasonryEngine::new(items(40), 1200.0, MasonryOptions::default());
        let before = engine.scheduler().active_for("i0").unwrap().handle;

        let t0 = Instant::now();
        engine.on_resize(700.0, t0);
        engine.poll_resize(t0 + RESIZE_DEBOUNCE).unwrap();

        let after = engine.scheduler().active_for("i0").unwrap().handle;
        assert_ne!(before, after);
    }

    #[test]
    fn hover_respects_the_option() {
        let engine = MasonryEngine::new(items(4), 1200.0, MasonryOptions::default());
        let enter = engine.on_hover_enter("i0").unwrap();
        assert_eq!(enter.scale, 0.95);
        assert_eq!(engine.on_hover_leave("i0").unwrap().scale, 1.0);

        let options = MasonryOptions {
            scale_on_hover: false,
            ..MasonryOptions::default()
        };
        let frozen = MasonryEngine::new(items(4), 1200.0, options);
        assert!(frozen.on_hover_enter("i0").is_none());
    }

    #[test]
    fn image_states_survive_reflow() {
        let mut engine = MasonryEngine::new(items(40), 1200.0, MasonryOptions::default());
        engine.on_image_load("i0");
        engine.on_image_error("i1");

        engine.on_scroll(800.0, 9_500.0, 10_000.0).unwrap();

        assert_eq!(engine.image("i0").unwrap().state(), ImageState::Loaded);
        assert!(engine.image("i1").unwrap().shows_fallback());
        // A newly revealed tile starts loading.
        assert!(engine.image("i15").unwrap().shows_placeholder_pulse());
    }

    #[test]
    fn replacing_items_drops_stale_image_slots() {
        let mut engine = MasonryEngine::new(items(40), 1200.0, MasonryOptions::default());
        engine.on_image_load("i0");
        assert!(engine.image("i11").is_some());

        engine.set_items(items(4));

        // Slots for removed ids are gone; surviving ids keep their state.
        assert!(engine.image("i11").is_none());
        assert_eq!(engine.image("i0").unwrap().state(), ImageState::Loaded);
        assert_eq!(engine.visible_count(), 4);
        assert_eq!(engine.layout().tiles.len(), 4);
    }

    #[test]
    fn click_forwards_the_matching_item() {
        use std::sync::{Arc, Mutex};

        let mut engine = MasonryEngine::new(items(4), 1200.0, MasonryOptions::default());
        let clicked = Arc::new(Mutex::new(Vec::new()));
        let sink = clicked.clone();
        engine.set_on_item_click(move |item| sink.lock().unwrap().push(item.link_url.clone()));

        engine.on_tile_click("i2");
        engine.on_tile_click("missing");

        assert_eq!(*clicked.lock().unwrap(), vec!["/p/2".to_string()]);
    }

    #[test]
    fn narrow_viewport_falls_back_to_one_column() {
        let engine = MasonryEngine::new(items(10), 320.0, MasonryOptions::default());
        assert_eq!(engine.columns(), 1);
        assert_eq!(engine.visible_count(), 3);
        assert!(engine.layout().tiles.iter().all(|t| t.x == 0.0));
    }
}
