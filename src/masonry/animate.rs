use super::layout::Tile;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use ts_rs::TS;

/// Blur radius tiles enter with when blur-to-focus is enabled, in pixels.
const ENTRY_BLUR: f64 = 10.0;

/// AnimateFrom
///
/// Off-stage starting side for the entrance animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum AnimateFrom {
    Top,
    Bottom,
    Left,
    Right,
    /// Container center regardless of the tile's final position.
    Center,
    /// Independently randomized per tile between two opposite off-stage sides.
    Random,
}

/// TweenState
///
/// A point in the interpolated space: position, size, opacity, blur.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TweenState {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub opacity: f64,
    pub blur: f64,
}

impl TweenState {
    fn settled(tile: &Tile) -> Self {
        TweenState {
            x: tile.x,
            y: tile.y,
            width: tile.width,
            height: tile.height,
            opacity: 1.0,
            blur: 0.0,
        }
    }
}

/// Tween
///
/// One scheduled interpolation for one tile: from state A (or the tile's
/// current visual state when `from` is None) to state B over `duration`
/// seconds with the named easing, starting after `delay` seconds. This is the
/// platform-neutral form of "schedule an interpolation, cancellable".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tween {
    pub tile_id: String,
    /// None means "start from wherever the tile currently is" (reflow path).
    pub from: Option<TweenState>,
    pub to: TweenState,
    pub duration: f64,
    pub delay: f64,
    pub ease: String,
}

/// AnimationSettings
///
/// The subset of engine options the planners need.
#[derive(Debug, Clone)]
pub struct AnimationSettings {
    pub ease: String,
    pub duration: f64,
    pub stagger: f64,
    pub animate_from: AnimateFrom,
    pub blur_to_focus: bool,
}

/// entrance_plan
///
/// First-layout animation: every tile starts off-stage (per the configured
/// direction), fully transparent and optionally blurred, and tweens to its
/// computed position with a per-index stagger delay.
pub fn entrance_plan(
    tiles: &[Tile],
    container_width: f64,
    container_height: f64,
    settings: &AnimationSettings,
    rng: &mut impl Rng,
) -> Vec<Tween> {
    tiles
        .iter()
        .enumerate()
        .map(|(index, tile)| {
            let (start_x, start_y) = start_position(
                tile,
                container_width,
                container_height,
                settings.animate_from,
                rng,
            );
            let blur = if settings.blur_to_focus { ENTRY_BLUR } else { 0.0 };

            Tween {
                tile_id: tile.id.clone(),
                from: Some(TweenState {
                    x: start_x,
                    y: start_y,
                    width: tile.width,
                    height: tile.height,
                    opacity: 0.0,
                    blur,
                }),
                to: TweenState::settled(tile),
                duration: settings.duration,
                delay: index as f64 * settings.stagger,
                ease: settings.ease.clone(),
            }
        })
        .collect()
}

/// reflow_plan
///
/// Subsequent-layout animation: each tile moves directly from its current
/// position/size to the new one. No opacity or blur effect, no stagger.
pub fn reflow_plan(tiles: &[Tile], settings: &AnimationSettings) -> Vec<Tween> {
    tiles
        .iter()
        .map(|tile| Tween {
            tile_id: tile.id.clone(),
            from: None,
            to: TweenState::settled(tile),
            duration: settings.duration,
            delay: 0.0,
            ease: settings.ease.clone(),
        })
        .collect()
}

fn start_position(
    tile: &Tile,
    container_width: f64,
    container_height: f64,
    from: AnimateFrom,
    rng: &mut impl Rng,
) -> (f64, f64) {
    match from {
        AnimateFrom::Top => (tile.x, -tile.height),
        AnimateFrom::Bottom => (tile.x, container_height + tile.height),
        AnimateFrom::Left => (-tile.width, tile.y),
        AnimateFrom::Right => (container_width + tile.width, tile.y),
        AnimateFrom::Center => (
            container_width / 2.0 - tile.width / 2.0,
            container_height / 2.0 - tile.height / 2.0,
        ),
        AnimateFrom::Random => (
            if rng.gen_bool(0.5) {
                -tile.width
            } else {
                container_width + tile.width
            },
            if rng.gen_bool(0.5) {
                -tile.height
            } else {
                container_height + tile.height
            },
        ),
    }
}

/// ScaleTween
///
/// The hover effect: a uniform scale interpolation, independent of the layout
/// animation.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleTween {
    pub scale: f64,
    pub duration: f64,
    pub ease: String,
}

pub fn hover_enter(hover_scale: f64) -> ScaleTween {
    ScaleTween {
        scale: hover_scale,
        duration: 0.3,
        ease: "power2.out".to_string(),
    }
}

pub fn hover_leave() -> ScaleTween {
    ScaleTween {
        scale: 1.0,
        duration: 0.3,
        ease: "power2.out".to_string(),
    }
}

/// ActiveTween
///
/// A scheduled tween together with its cancellation handle.
#[derive(Debug, Clone)]
pub struct ActiveTween {
    pub handle: u64,
    pub tween: Tween,
}

/// Scheduler
///
/// Per-tile animation handles with last-writer-wins semantics: scheduling a
/// new layout pass kills any pending tween for the same tile and replaces it.
/// All mutation happens on the single UI thread, so no locking is involved.
#[derive(Debug, Default)]
pub struct Scheduler {
    active: HashMap<String, ActiveTween>,
    next_handle: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a plan, returning the handles of tweens that were killed and
    /// replaced.
    pub fn schedule(&mut self, plan: Vec<Tween>) -> Vec<u64> {
        let mut killed = Vec::new();
        for tween in plan {
            self.next_handle += 1;
            let replaced = self.active.insert(
                tween.tile_id.clone(),
                ActiveTween {
                    handle: self.next_handle,
                    tween,
                },
            );
            if let Some(previous) = replaced {
                killed.push(previous.handle);
            }
        }
        killed
    }

    /// Marks a tween finished. Stale handles (already replaced by a newer
    /// pass) are ignored.
    pub fn complete(&mut self, tile_id: &str, handle: u64) -> bool {
        match self.active.get(tile_id) {
            Some(active) if active.handle == handle => {
                self.active.remove(tile_id);
                true
            }
            _ => false,
        }
    }

    pub fn active_for(&self, tile_id: &str) -> Option<&ActiveTween> {
        self.active.get(tile_id)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::SmallRng};

    fn tile(id: &str, x: f64, y: f64) -> Tile {
        Tile {
            id: id.to_string(),
            x,
            y,
            width: 300.0,
            height: 200.0,
        }
    }

    fn settings(from: AnimateFrom) -> AnimationSettings {
        AnimationSettings {
            ease: "power3.out".to_string(),
            duration: 0.6,
            stagger: 0.05,
            animate_from: from,
            blur_to_focus: true,
        }
    }

    #[test]
    fn entrance_starts_offstage_and_staggers() {
        let tiles = [tile("a", 0.0, 0.0), tile("b", 316.0, 0.0), tile("c", 0.0, 216.0)];
        let mut rng = SmallRng::seed_from_u64(7);
        let plan = entrance_plan(&tiles, 632.0, 416.0, &settings(AnimateFrom::Bottom), &mut rng);

        for (index, tween) in plan.iter().enumerate() {
            let from = tween.from.as_ref().unwrap();
            // Below the container by one tile height.
            assert_eq!(from.y, 416.0 + 200.0);
            assert_eq!(from.x, tiles[index].x);
            assert_eq!(from.opacity, 0.0);
            assert_eq!(from.blur, 10.0);
            assert_eq!(tween.delay, index as f64 * 0.05);
            assert_eq!(tween.to.opacity, 1.0);
            assert_eq!(tween.to.blur, 0.0);
        }
    }

    #[test]
    fn entrance_directions() {
        let tiles = [tile("a", 100.0, 50.0)];
        let mut rng = SmallRng::seed_from_u64(7);
        let cases = [
            (AnimateFrom::Top, (100.0, -200.0)),
            (AnimateFrom::Left, (-300.0, 50.0)),
            (AnimateFrom::Right, (632.0 + 300.0, 50.0)),
            (AnimateFrom::Center, (632.0 / 2.0 - 150.0, 416.0 / 2.0 - 100.0)),
        ];
        for (direction, expected) in cases {
            let plan = entrance_plan(&tiles, 632.0, 416.0, &settings(direction), &mut rng);
            let from = plan[0].from.as_ref().unwrap();
            assert_eq!((from.x, from.y), expected, "{direction:?}");
        }
    }

    #[test]
    fn random_direction_picks_offstage_sides() {
        let tiles = [tile("a", 100.0, 50.0)];
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..20 {
            let plan = entrance_plan(&tiles, 632.0, 416.0, &settings(AnimateFrom::Random), &mut rng);
            let from = plan[0].from.as_ref().unwrap();
            assert!(from.x == -300.0 || from.x == 932.0);
            assert!(from.y == -200.0 || from.y == 616.0);
        }
    }

    #[test]
    fn blur_disabled_enters_sharp() {
        let tiles = [tile("a", 0.0, 0.0)];
        let mut rng = SmallRng::seed_from_u64(7);
        let mut s = settings(AnimateFrom::Top);
        s.blur_to_focus = false;
        let plan = entrance_plan(&tiles, 632.0, 416.0, &s, &mut rng);
        assert_eq!(plan[0].from.as_ref().unwrap().blur, 0.0);
    }

    #[test]
    fn reflow_has_no_stagger_and_no_fade() {
        let tiles = [tile("a", 0.0, 0.0), tile("b", 316.0, 0.0)];
        let plan = reflow_plan(&tiles, &settings(AnimateFrom::Bottom));
        for tween in &plan {
            assert!(tween.from.is_none());
            assert_eq!(tween.delay, 0.0);
            assert_eq!(tween.to.opacity, 1.0);
            assert_eq!(tween.to.blur, 0.0);
        }
    }

    #[test]
    fn scheduler_replaces_pending_tweens_last_writer_wins() {
        let tiles = [tile("a", 0.0, 0.0)];
        let s = settings(AnimateFrom::Bottom);
        let mut scheduler = Scheduler::new();

        assert!(scheduler.schedule(reflow_plan(&tiles, &s)).is_empty());
        let first = scheduler.active_for("a").unwrap().handle;

        // A second pass before the first completes kills the pending tween.
        let killed = scheduler.schedule(reflow_plan(&tiles, &s));
        assert_eq!(killed, vec![first]);

        let second = scheduler.active_for("a").unwrap().handle;
        assert_ne!(first, second);

        // Completing with the stale handle is a no-op.
        assert!(!scheduler.complete("a", first));
        assert!(scheduler.complete("a", second));
        assert_eq!(scheduler.active_count(), 0);
    }

    #[test]
    fn hover_tweens_are_symmetric() {
        assert_eq!(hover_enter(0.95).scale, 0.95);
        assert_eq!(hover_leave().scale, 1.0);
        assert_eq!(hover_enter(0.95).duration, hover_leave().duration);
    }
}
