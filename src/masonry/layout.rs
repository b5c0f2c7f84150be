use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Horizontal and vertical spacing between tiles, in pixels.
pub const DEFAULT_GAP: f64 = 16.0;

/// Normalization constant for item heights: an item's `intrinsic_height` is a
/// layout hint scaled against the computed column width, not a literal pixel
/// height. `height = intrinsic_height / REFERENCE_HEIGHT * column_width`.
pub const REFERENCE_HEIGHT: f64 = 500.0;

// Ordered breakpoint table, first match wins. Evaluated against the viewport
// width; each value is capped by the configured maximum column count.
const BREAKPOINTS: &[(f64, usize)] = &[(1500.0, 5), (1000.0, 4), (600.0, 3), (400.0, 2)];

/// column_count
///
/// Resolves the column count for a viewport width from the breakpoint table,
/// falling back to a single column below the smallest threshold.
pub fn column_count(viewport_width: f64, max_columns: usize) -> usize {
    for &(min_width, cols) in BREAKPOINTS {
        if viewport_width >= min_width {
            return cols.min(max_columns);
        }
    }
    1
}

/// MasonryItem
///
/// One entry of the ordered input sequence. Items are assigned to columns in
/// list order (greedy), so the sequence order is part of the layout contract.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MasonryItem {
    pub id: String,
    /// Image location, loaded out-of-band per tile.
    pub source_url: String,
    /// Destination when the tile is clicked.
    pub link_url: String,
    /// Layout hint scaled against the column width (see `REFERENCE_HEIGHT`).
    pub intrinsic_height: f64,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Tile
///
/// Computed, column-relative pixel position and size for one item. Derived
/// state: recomputed whenever the inputs change, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tile {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Layout
///
/// The full result of one layout pass: all tiles plus the container height,
/// which is `max(y + height)` over the tiles (zero when empty).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Layout {
    pub tiles: Vec<Tile>,
    pub height: f64,
}

/// compute_layout
///
/// Greedy shortest-column bin packing. Each item in list order goes to the
/// column with the minimum accumulated height; among equal-height columns the
/// lowest-indexed one wins. Deterministic: identical inputs yield identical
/// tile arrays.
pub fn compute_layout(
    items: &[MasonryItem],
    container_width: f64,
    columns: usize,
    gap: f64,
) -> Layout {
    if columns == 0 || container_width <= 0.0 {
        return Layout::default();
    }

    let mut column_heights = vec![0.0_f64; columns];
    let total_gaps = (columns - 1) as f64 * gap;
    let column_width = (container_width - total_gaps) / columns as f64;

    let mut tiles = Vec::with_capacity(items.len());
    for item in items {
        let col = shortest_column(&column_heights);
        let x = col as f64 * (column_width + gap);
        let height = (item.intrinsic_height / REFERENCE_HEIGHT) * column_width;
        let y = column_heights[col];

        column_heights[col] += height + gap;
        tiles.push(Tile {
            id: item.id.clone(),
            x,
            y,
            width: column_width,
            height,
        });
    }

    let height = tiles
        .iter()
        .fold(0.0_f64, |max, tile| max.max(tile.y + tile.height));

    Layout { tiles, height }
}

// Strict less-than keeps the first index among ties.
fn shortest_column(heights: &[f64]) -> usize {
    let mut best = 0;
    for (i, &h) in heights.iter().enumerate() {
        if h < heights[best] {
            best = i;
        }
    }
    best
}
