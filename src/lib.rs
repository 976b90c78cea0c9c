//! Valentine Card - a three-question greeting card with a runaway "No" button
//!
//! Core modules:
//! - `sim`: Deterministic card state (steps, escape heuristic, particles)
//! - `gift`: Gift file availability probe
//! - `config`: Card texts and escape tuning
//! - `lifecycle`: What leaving the page means for the card
//! - `platform`: Browser DOM glue (wasm only)

pub mod config;
pub mod gift;
pub mod lifecycle;
#[cfg(target_arch = "wasm32")]
pub mod platform;
pub mod sim;

pub use config::{CardConfig, EscapeTuning};
pub use gift::GiftStatus;

use rand::Rng;

/// Card configuration constants
pub mod consts {
    /// Minimum size of the No button (measured size is floored to this)
    pub const NO_BUTTON_MIN_WIDTH: f32 = 136.0;
    pub const NO_BUTTON_MIN_HEIGHT: f32 = 56.0;

    /// Minimum time between two accepted escapes (ms)
    pub const ESCAPE_COOLDOWN_MS: f64 = 58.0;
    /// Distance kept between the button and the viewport edges
    pub const AREA_PADDING: f32 = 12.0;
    /// Base jump length per escape
    pub const ESCAPE_JUMP_DESKTOP: f32 = 64.0;
    pub const ESCAPE_JUMP_TOUCH: f32 = 58.0;
    /// Random jitter added to each axis of a jump
    pub const ESCAPE_JITTER: f32 = 4.0;
    /// Distance from a bound at which moves are biased away from the edge
    pub const EDGE_BIAS_ZONE: f32 = 22.0;
    /// Number of directions tried before falling back to a random spot
    pub const ESCAPE_ATTEMPTS: u32 = 8;
    /// Minimum accepted displacement for a directed escape
    pub const ESCAPE_MIN_DISTANCE: f32 = 22.0;
    /// Minimum motion along the free axis when pinned against an edge
    pub const ESCAPE_MIN_AXIS_MOTION: f32 = 8.0;
    /// Every Nth escape the button gives up for a moment
    pub const PAUSE_EVERY: u32 = 99;
    pub const PAUSE_DURATION_MS: f64 = 1000.0;

    /// Gap between the Yes button and the floating No button
    pub const YES_GAP: f32 = 14.0;

    /// Hint bubble lifetime and offset from the button's top-left corner
    pub const HINT_DURATION_MS: f64 = 1000.0;
    pub const HINT_OFFSET_X: f32 = 8.0;
    pub const HINT_OFFSET_Y: f32 = -34.0;
    /// Chance of a playful hint on a non-milestone escape
    pub const PLAYFUL_HINT_CHANCE: f64 = 0.24;

    /// Trail ghosts
    pub const TRAIL_CHANCE: f64 = 0.38;
    pub const TRAIL_DURATION_MS: f64 = 550.0;
    pub const MAX_TRAILS: usize = 7;

    /// Burst particles
    pub const BURST_DURATION_MS: f64 = 1000.0;
    pub const BURST_ON_YES: usize = 17;
    pub const BURST_ON_CELEBRATION: usize = 20;
    pub const BURST_ON_OPEN_LETTER: usize = 24;

    /// Background hearts
    pub const FLOATING_HEART_COUNT: usize = 18;

    /// Delay before the envelope opens by itself
    pub const ENVELOPE_OPEN_DELAY_MS: u32 = 320;
    /// Haptic pulse on Yes
    pub const YES_VIBRATE_MS: u32 = 22;
}

/// Uniform random value in `[min, max)`, or `min` when the range is empty
#[inline]
pub fn random_between<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max > min {
        min + rng.random::<f32>() * (max - min)
    } else {
        min
    }
}

/// Random sign: -1.0 or 1.0 with equal probability
#[inline]
pub fn random_sign<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    if rng.random_bool(0.5) { 1.0 } else { -1.0 }
}
