//! Card simulation module
//!
//! All card logic lives here. This module must stay pure:
//! - Time comes in as milliseconds from the caller
//! - Seeded RNG only
//! - DOM measurements come in as plain `Layout` snapshots
//! - No rendering or platform dependencies

pub mod effects;
pub mod escape;
pub mod geometry;
pub mod state;
pub mod step;

pub use effects::{BurstColor, BurstIcon, BurstParticle, Effects, FloatingHeart, Hint, Trail};
pub use escape::{EscapeKind, EscapeMove, escape_move};
pub use geometry::{Bounds, Rect, button_size};
pub use state::{CardEvent, CardState, EscapeOutcome, Layout};
pub use step::{QUESTION_COUNT, Step};
