//! Escape heuristic for the No button
//!
//! Computes where the button jumps when the pointer gets close. Pure function
//! of the current position, the bounds, the pointer and the RNG, so it can be
//! replayed with a seeded generator.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;

use super::geometry::Bounds;
use crate::config::EscapeTuning;
use crate::consts::{ESCAPE_ATTEMPTS, ESCAPE_MIN_AXIS_MOTION, ESCAPE_MIN_DISTANCE};
use crate::{random_between, random_sign};

/// Share of the jump spent moving away from a nearby edge
const EDGE_AWAY_FACTOR: f32 = 0.34;
/// Share of the jump spent sliding along a nearby edge
const EDGE_SLIDE_FACTOR: f32 = 1.06;
/// Vertical jumps are flattened a little
const VERTICAL_SQUASH: f32 = 0.82;

/// How a move was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeKind {
    /// Pushed away from a viewport edge
    EdgeBias,
    /// Jumped away from the pointer (attempt index, 0 = straight away)
    Directed { attempt: u32 },
    /// No direction worked, random spot in bounds
    Fallback,
}

/// Result of one escape computation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EscapeMove {
    pub pos: Vec2,
    pub kind: EscapeKind,
}

/// Which edges the position is close to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct NearEdges {
    left: bool,
    right: bool,
    top: bool,
    bottom: bool,
}

impl NearEdges {
    fn of(pos: Vec2, bounds: &Bounds, zone: f32) -> Self {
        Self {
            left: pos.x <= bounds.min.x + zone,
            right: pos.x >= bounds.max.x - zone,
            top: pos.y <= bounds.min.y + zone,
            bottom: pos.y >= bounds.max.y - zone,
        }
    }

    fn horizontal(&self) -> bool {
        self.left || self.right
    }

    fn vertical(&self) -> bool {
        self.top || self.bottom
    }

    fn any(&self) -> bool {
        self.horizontal() || self.vertical()
    }
}

/// Compute the next button position
pub fn escape_move<R: Rng + ?Sized>(
    rng: &mut R,
    current: Vec2,
    bounds: &Bounds,
    pointer: Option<Vec2>,
    tuning: &EscapeTuning,
    touch: bool,
) -> EscapeMove {
    let jump = tuning.jump(touch);
    let jitter = tuning.jitter;
    let near = NearEdges::of(current, bounds, tuning.edge_zone);

    if near.any() {
        let mut next = current;

        if near.horizontal() {
            let away = if near.left { 1.0 } else { -1.0 };
            let slide = random_sign(rng);
            next.x += away * jump * EDGE_AWAY_FACTOR + random_between(rng, -jitter, jitter);
            next.y += slide * jump * EDGE_SLIDE_FACTOR + random_between(rng, -jitter, jitter);
        }

        if near.vertical() {
            let away = if near.top { 1.0 } else { -1.0 };
            let slide = random_sign(rng);
            next.y += away * jump * EDGE_AWAY_FACTOR + random_between(rng, -jitter, jitter);
            next.x += slide * jump * EDGE_SLIDE_FACTOR + random_between(rng, -jitter, jitter);
        }

        return EscapeMove {
            pos: bounds.clamp(next),
            kind: EscapeKind::EdgeBias,
        };
    }

    let center = current + bounds.button / 2.0;
    let base_angle = match pointer {
        Some(p) => {
            let away = center - p;
            away.y.atan2(away.x)
        }
        None => rng.random::<f32>() * TAU,
    };

    for attempt in 0..ESCAPE_ATTEMPTS {
        let spin = if attempt == 0 {
            0.0
        } else {
            let sign = if attempt % 2 == 0 { 1.0 } else { -1.0 };
            sign * (PI / 6.0 + rng.random::<f32>() * (PI / 8.0))
        };
        let angle = base_angle + spin;
        let candidate = Vec2::new(
            current.x + angle.cos() * jump + random_between(rng, -jitter, jitter),
            current.y + angle.sin() * jump * VERTICAL_SQUASH + random_between(rng, -jitter, jitter),
        );
        let clamped = bounds.clamp(candidate);

        if is_usable(current, clamped, bounds) {
            return EscapeMove {
                pos: clamped,
                kind: EscapeKind::Directed { attempt },
            };
        }
    }

    let fallback = Vec2::new(
        random_between(rng, bounds.min.x, bounds.max.x),
        random_between(rng, bounds.min.y, bounds.max.y),
    );
    EscapeMove {
        pos: bounds.clamp(fallback),
        kind: EscapeKind::Fallback,
    }
}

/// A clamped candidate must move far enough and not just grind along an edge
fn is_usable(current: Vec2, clamped: Vec2, bounds: &Bounds) -> bool {
    let delta = clamped - current;
    let pinned_x = clamped.x == bounds.min.x || clamped.x == bounds.max.x;
    let pinned_y = clamped.y == bounds.min.y || clamped.y == bounds.max.y;
    let vertical_motion = delta.y.abs() >= ESCAPE_MIN_AXIS_MOTION;
    let horizontal_motion = delta.x.abs() >= ESCAPE_MIN_AXIS_MOTION;

    delta.length() >= ESCAPE_MIN_DISTANCE
        && (!pinned_x || vertical_motion)
        && (!pinned_y || horizontal_motion)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn desktop_bounds() -> Bounds {
        Bounds::new(Vec2::new(1280.0, 800.0), Vec2::new(136.0, 56.0), 12.0)
    }

    #[test]
    fn test_moves_away_from_pointer() {
        let mut rng = Pcg32::seed_from_u64(1);
        let bounds = desktop_bounds();
        let current = Vec2::new(500.0, 300.0);
        let center = current + bounds.button / 2.0;
        // Pointer directly left of the centre
        let pointer = center - Vec2::new(40.0, 0.0);

        let mv = escape_move(
            &mut rng,
            current,
            &bounds,
            Some(pointer),
            &EscapeTuning::default(),
            false,
        );
        assert_eq!(mv.kind, EscapeKind::Directed { attempt: 0 });
        assert!(mv.pos.x > current.x + 55.0);
        assert!((mv.pos.y - current.y).abs() <= 4.0);
    }

    #[test]
    fn test_pointer_below_moves_up() {
        let mut rng = Pcg32::seed_from_u64(2);
        let bounds = desktop_bounds();
        let current = Vec2::new(500.0, 300.0);
        let pointer = current + bounds.button / 2.0 + Vec2::new(0.0, 20.0);

        let mv = escape_move(
            &mut rng,
            current,
            &bounds,
            Some(pointer),
            &EscapeTuning::default(),
            false,
        );
        assert!(mv.pos.y < current.y - 40.0);
    }

    #[test]
    fn test_edge_bias_pushes_off_left_edge() {
        let mut rng = Pcg32::seed_from_u64(3);
        let bounds = desktop_bounds();
        let current = Vec2::new(bounds.min.x + 5.0, 400.0);

        let mv = escape_move(&mut rng, current, &bounds, None, &EscapeTuning::default(), false);
        assert_eq!(mv.kind, EscapeKind::EdgeBias);
        // 64 * 0.34 = 21.76, jitter at most 4
        assert!(mv.pos.x >= current.x + 17.0);
        // Slides along the edge by roughly a full jump
        assert!((mv.pos.y - current.y).abs() >= 60.0);
    }

    #[test]
    fn test_edge_bias_pushes_off_right_edge() {
        let mut rng = Pcg32::seed_from_u64(7);
        let bounds = desktop_bounds();
        let current = Vec2::new(bounds.max.x - 5.0, 400.0);

        let mv = escape_move(&mut rng, current, &bounds, None, &EscapeTuning::default(), false);
        assert_eq!(mv.kind, EscapeKind::EdgeBias);
        assert!(mv.pos.x <= current.x - 17.0);
        assert!((mv.pos.y - current.y).abs() >= 60.0);
    }

    #[test]
    fn test_edge_bias_pushes_off_bottom_edge() {
        let mut rng = Pcg32::seed_from_u64(8);
        let bounds = desktop_bounds();
        let current = Vec2::new(600.0, bounds.max.y - 5.0);

        let mv = escape_move(&mut rng, current, &bounds, None, &EscapeTuning::default(), false);
        assert_eq!(mv.kind, EscapeKind::EdgeBias);
        assert!(mv.pos.y <= current.y - 17.0);
        assert!((mv.pos.x - current.x).abs() >= 60.0);
    }

    #[test]
    fn test_touch_jumps_shorter() {
        let bounds = desktop_bounds();
        let tuning = EscapeTuning {
            jitter: 0.0,
            ..EscapeTuning::default()
        };
        let current = Vec2::new(500.0, 300.0);
        let pointer = current + bounds.button / 2.0 - Vec2::new(40.0, 0.0);

        let jump = |touch| {
            let mut rng = Pcg32::seed_from_u64(9);
            escape_move(&mut rng, current, &bounds, Some(pointer), &tuning, touch).pos - current
        };
        assert_eq!(jump(false), Vec2::new(64.0, 0.0));
        assert_eq!(jump(true), Vec2::new(58.0, 0.0));
    }

    #[test]
    fn test_edge_bias_in_corner_moves_both_axes() {
        let mut rng = Pcg32::seed_from_u64(4);
        let bounds = desktop_bounds();
        let current = bounds.max;

        let mv = escape_move(&mut rng, current, &bounds, None, &EscapeTuning::default(), true);
        assert_eq!(mv.kind, EscapeKind::EdgeBias);
        assert!(bounds.contains(mv.pos));
    }

    #[test]
    fn test_short_jump_falls_back_to_random_spot() {
        let mut rng = Pcg32::seed_from_u64(5);
        let bounds = desktop_bounds();
        let tuning = EscapeTuning {
            jump_desktop: 10.0,
            jitter: 0.0,
            ..EscapeTuning::default()
        };
        let current = Vec2::new(500.0, 300.0);

        let mv = escape_move(&mut rng, current, &bounds, None, &tuning, false);
        assert_eq!(mv.kind, EscapeKind::Fallback);
        assert!(bounds.contains(mv.pos));
    }

    #[test]
    fn test_collapsed_bounds_stay_put() {
        let mut rng = Pcg32::seed_from_u64(6);
        let bounds = Bounds::new(Vec2::new(100.0, 50.0), Vec2::new(136.0, 56.0), 12.0);

        let mv = escape_move(&mut rng, bounds.min, &bounds, None, &EscapeTuning::default(), false);
        assert_eq!(mv.pos, bounds.min);
    }

    #[test]
    fn test_same_seed_same_move() {
        let bounds = desktop_bounds();
        let current = Vec2::new(640.0, 400.0);
        let a = escape_move(
            &mut Pcg32::seed_from_u64(42),
            current,
            &bounds,
            None,
            &EscapeTuning::default(),
            false,
        );
        let b = escape_move(
            &mut Pcg32::seed_from_u64(42),
            current,
            &bounds,
            None,
            &EscapeTuning::default(),
            false,
        );
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn prop_move_stays_in_bounds(
            seed in any::<u64>(),
            vw in 80.0f32..2000.0,
            vh in 80.0f32..1400.0,
            fx in 0.0f32..1.0,
            fy in 0.0f32..1.0,
            pointer in proptest::option::of((-100.0f32..2100.0, -100.0f32..1500.0)),
            touch in any::<bool>(),
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let bounds = Bounds::new(Vec2::new(vw, vh), Vec2::new(136.0, 56.0), 12.0);
            let current = bounds.min + (bounds.max - bounds.min) * Vec2::new(fx, fy);
            let pointer = pointer.map(|(x, y)| Vec2::new(x, y));

            let mv = escape_move(&mut rng, current, &bounds, pointer, &EscapeTuning::default(), touch);
            prop_assert!(bounds.contains(mv.pos), "{:?} outside {:?}", mv.pos, bounds);
        }
    }
}
