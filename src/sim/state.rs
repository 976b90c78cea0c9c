//! Card state
//!
//! Single owner of everything the view shows. The platform layer feeds it
//! input and DOM measurements, then renders it and drains its events.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::effects::{Effects, FloatingHeart, floating_hearts};
use super::escape::{EscapeMove, escape_move};
use super::geometry::{Bounds, Rect, button_size};
use super::step::Step;
use crate::config::CardConfig;
use crate::consts::*;
use crate::gift::GiftStatus;
use crate::random_between;

/// Relative position used when the button is lost and the Yes button is unknown
const RECOVERY_FRACTION: f32 = 0.55;

/// DOM measurements taken right before an update
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Layout {
    /// Visible viewport size
    pub viewport: Vec2,
    /// Layout viewport (`innerWidth` x `innerHeight`), the space element rects
    /// are measured in
    pub page: Vec2,
    /// Measured size of the No button, if it is in the DOM
    pub button: Option<Vec2>,
    /// Rect of the Yes button
    pub yes: Option<Rect>,
    /// Rect of the No button while it still sits in the layout
    pub static_no: Option<Rect>,
}

impl Layout {
    pub fn bounds(&self, padding: f32) -> Bounds {
        Bounds::new(self.viewport, button_size(self.button), padding)
    }
}

/// Things the platform layer must react to
#[derive(Debug, Clone, PartialEq)]
pub enum CardEvent {
    StepChanged(Step),
    /// Particles were spawned (schedule an expiry sweep)
    Burst { count: usize },
    /// Short haptic pulse (ms)
    Vibrate(u32),
    /// The No button left the layout and now floats
    FloatingStarted,
    /// An escape was accepted
    Escaped { count: u32 },
    /// The button gives up until the given time
    Paused { until: f64 },
}

/// What happened to an escape attempt
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EscapeOutcome {
    /// Not on a question, or the button is paused
    Ignored,
    /// Too soon after the previous escape
    CoolingDown,
    /// Counted, but the button stays where it is for a moment
    Paused,
    /// Counted and moved
    Moved(EscapeMove),
}

/// Complete card state
#[derive(Debug, Clone)]
pub struct CardState {
    pub config: CardConfig,
    pub step: Step,
    /// Accepted escapes over the whole session
    pub escape_count: u32,
    /// Top-left corner of the floating No button (viewport px)
    pub no_pos: Vec2,
    /// No button detached from the layout
    pub floating: bool,
    /// Coarse pointer device: escape on touch-down instead of hover
    pub touch: bool,
    pub paused_until: Option<f64>,
    pub last_escape_at: Option<f64>,
    pub effects: Effects,
    pub hearts: Vec<FloatingHeart>,
    pub envelope_open: bool,
    pub gift: GiftStatus,
    events: Vec<CardEvent>,
    rng: Pcg32,
}

impl CardState {
    pub fn new(config: CardConfig, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let hearts = floating_hearts(&mut rng, FLOATING_HEART_COUNT);
        let padding = config.tuning.padding;
        Self {
            config,
            step: Step::Intro,
            escape_count: 0,
            no_pos: Vec2::splat(padding.max(24.0)),
            floating: false,
            touch: false,
            paused_until: None,
            last_escape_at: None,
            effects: Effects::default(),
            hearts,
            envelope_open: false,
            gift: GiftStatus::Checking,
            events: Vec::new(),
            rng,
        }
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<CardEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_paused(&self, now: f64) -> bool {
        self.paused_until.is_some_and(|until| now < until)
    }

    /// Current No button label
    pub fn no_label(&self, now: f64) -> &str {
        if self.is_paused(now) {
            &self.config.give_in_label
        } else {
            &self.config.no_label
        }
    }

    /// Where the hint bubble sits
    pub fn hint_pos(&self) -> Vec2 {
        self.no_pos + Vec2::new(HINT_OFFSET_X, HINT_OFFSET_Y)
    }

    // === Step controller ===

    fn set_step(&mut self, next: Step, now: f64) {
        if next == self.step {
            return;
        }
        log::info!("Step {:?} -> {:?}", self.step, next);
        self.step = next;

        // Every screen starts with the No button back in the layout
        self.effects.clear_button_effects();
        self.floating = false;
        if !next.is_question() {
            self.paused_until = None;
        }

        match next {
            Step::Celebration => self.burst(BURST_ON_CELEBRATION, now),
            Step::Letter => {
                self.envelope_open = false;
                self.gift = GiftStatus::Checking;
            }
            _ => {}
        }

        self.events.push(CardEvent::StepChanged(next));
    }

    fn burst(&mut self, count: usize, now: f64) {
        self.effects.spawn_burst(&mut self.rng, count, now);
        self.events.push(CardEvent::Burst { count });
    }

    /// Intro -> first question
    pub fn start(&mut self, now: f64) {
        if self.step == Step::Intro {
            self.set_step(Step::Question(1), now);
        }
    }

    /// Yes on a question: next question, or celebration after the last one
    pub fn press_yes(&mut self, now: f64) {
        let Some(next) = self.step.after_yes() else {
            return;
        };
        self.burst(BURST_ON_YES, now);
        self.events.push(CardEvent::Vibrate(YES_VIBRATE_MS));
        self.set_step(next, now);
    }

    /// Celebration -> letter
    pub fn open_letter(&mut self, now: f64) {
        if self.step == Step::Celebration {
            self.burst(BURST_ON_OPEN_LETTER, now);
            self.set_step(Step::Letter, now);
        }
    }

    pub fn open_envelope(&mut self) {
        if self.step == Step::Letter {
            self.envelope_open = true;
        }
    }

    /// Store a probe result; late results for a left screen are dropped
    pub fn set_gift_status(&mut self, status: GiftStatus) -> bool {
        if self.step != Step::Letter {
            log::debug!("Dropping gift status {:?} outside the letter", status);
            return false;
        }
        self.gift = status;
        true
    }

    // === No button ===

    /// Detach the No button from the layout on first contact
    pub fn ensure_floating(&mut self, layout: &Layout) {
        if self.floating {
            return;
        }
        let bounds = layout.bounds(self.config.tuning.padding);

        self.no_pos = if let Some(yes) = layout.yes {
            bounds.beside(&yes)
        } else if let Some(rect) = layout.static_no {
            bounds.clamp(rect.origin())
        } else {
            Vec2::new(
                random_between(&mut self.rng, bounds.min.x, bounds.max.x),
                random_between(&mut self.rng, bounds.min.y, bounds.max.y),
            )
        };
        self.floating = true;
        self.events.push(CardEvent::FloatingStarted);
    }

    /// Pointer came close to the No button
    pub fn register_escape(
        &mut self,
        layout: &Layout,
        pointer: Option<Vec2>,
        now: f64,
    ) -> EscapeOutcome {
        if !self.step.is_question() || self.is_paused(now) {
            return EscapeOutcome::Ignored;
        }

        self.ensure_floating(layout);

        let tuning = &self.config.tuning;
        if self
            .last_escape_at
            .is_some_and(|last| now - last < tuning.cooldown_ms)
        {
            return EscapeOutcome::CoolingDown;
        }
        self.last_escape_at = Some(now);

        self.escape_count += 1;
        let count = self.escape_count;
        self.events.push(CardEvent::Escaped { count });

        if count.is_multiple_of(tuning.pause_every) {
            let until = now + tuning.pause_ms;
            self.paused_until = Some(until);
            let text = self.config.give_in_label.clone();
            self.effects.show_hint(text, now);
            self.events.push(CardEvent::Paused { until });
            log::info!("No button gives in after {} escapes", count);
            return EscapeOutcome::Paused;
        }

        if let Some(text) = self.config.milestone(count) {
            let text = text.to_string();
            self.effects.show_hint(text, now);
        } else if !self.config.playful_hints.is_empty()
            && self.rng.random_bool(PLAYFUL_HINT_CHANCE)
        {
            let index = self.rng.random_range(0..self.config.playful_hints.len());
            let text = self.config.playful_hints[index].clone();
            self.effects.show_hint(text, now);
        }

        let bounds = layout.bounds(self.config.tuning.padding);

        if self.rng.random_bool(TRAIL_CHANCE) {
            let center = self.no_pos + bounds.button / 2.0;
            self.effects.push_trail(center, now);
        }

        let mv = escape_move(
            &mut self.rng,
            self.no_pos,
            &bounds,
            pointer,
            &self.config.tuning,
            self.touch,
        );
        self.no_pos = mv.pos;
        EscapeOutcome::Moved(mv)
    }

    /// Re-clamp after a viewport or button size change
    pub fn constrain(&mut self, layout: &Layout) {
        if !self.step.is_question() || !self.floating {
            return;
        }
        self.no_pos = layout.bounds(self.config.tuning.padding).clamp(self.no_pos);
    }

    /// Snap the button back if its rendered rect left the viewport
    pub fn recover_if_offscreen(&mut self, layout: &Layout, rendered: &Rect) -> bool {
        if !self.step.is_question() || !self.floating || !rendered.is_out_of_view(layout.page)
        {
            return false;
        }
        let bounds = layout.bounds(self.config.tuning.padding);
        self.no_pos = match layout.yes {
            Some(yes) => bounds.beside(&yes),
            None => bounds.clamp(layout.viewport * RECOVERY_FRACTION),
        };
        log::warn!("No button was off screen, moved back to {:?}", self.no_pos);
        true
    }

    // === Timers ===

    /// Drop expired effects and end an elapsed pause. Returns true if the view
    /// needs a redraw.
    pub fn expire(&mut self, now: f64) -> bool {
        let mut changed = self.effects.expire(now);
        if self.paused_until.is_some_and(|until| now >= until) {
            self.paused_until = None;
            changed = true;
        }
        changed
    }

    /// Earliest time `expire` has work to do
    pub fn next_deadline(&self) -> Option<f64> {
        self.effects
            .next_deadline()
            .into_iter()
            .chain(self.paused_until)
            .reduce(f64::min)
    }
}
