//! Decorative effects: trail ghosts, particle bursts, background hearts and
//! the hint bubble
//!
//! Nothing here affects the flow of the card. Every transient item carries a
//! deadline and is dropped by [`Effects::expire`].

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::random_between;

/// Burst glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BurstIcon {
    Heart,
    Sparkle,
}

impl BurstIcon {
    pub fn as_str(&self) -> &'static str {
        match self {
            BurstIcon::Heart => "❤",
            BurstIcon::Sparkle => "✦",
        }
    }
}

/// Burst tint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BurstColor {
    Pink,
    Cyan,
}

impl BurstColor {
    pub fn css(&self) -> &'static str {
        match self {
            BurstColor::Pink => "#ff74d0",
            BurstColor::Cyan => "#95f6ff",
        }
    }
}

/// Ghost left behind where the button was
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trail {
    pub id: u32,
    /// Centre of the button at spawn time (viewport px)
    pub pos: Vec2,
    pub expires_at: f64,
}

/// One particle flying out of a burst
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BurstParticle {
    pub id: u32,
    /// Final offset from the burst origin (px)
    pub offset: Vec2,
    /// Animation delay (s)
    pub delay: f32,
    pub icon: BurstIcon,
    pub color: BurstColor,
    /// Font size (px)
    pub size: f32,
    pub expires_at: f64,
}

/// Background heart, generated once and animated purely in CSS
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloatingHeart {
    /// Horizontal position (% of width)
    pub left: f32,
    /// Float duration (s)
    pub duration: f32,
    /// Negative delay so the field starts mid-animation (s)
    pub delay: f32,
    /// Font size (px)
    pub size: f32,
    pub opacity: f32,
}

/// Text bubble above the floating button
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hint {
    pub text: String,
    pub expires_at: f64,
}

/// Generate the background heart field
pub fn floating_hearts<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<FloatingHeart> {
    (0..count)
        .map(|_| FloatingHeart {
            left: random_between(rng, 0.0, 100.0),
            duration: random_between(rng, 18.0, 34.0),
            delay: random_between(rng, -22.0, -2.0),
            size: random_between(rng, 12.0, 22.0),
            opacity: random_between(rng, 0.16, 0.42),
        })
        .collect()
}

/// All transient effects owned by the card
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Effects {
    pub trails: Vec<Trail>,
    pub bursts: Vec<BurstParticle>,
    pub hint: Option<Hint>,
    next_id: u32,
}

impl Effects {
    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Add a trail ghost, keeping only the newest [`MAX_TRAILS`]
    pub fn push_trail(&mut self, pos: Vec2, now: f64) {
        let id = self.next_id();
        if self.trails.len() >= MAX_TRAILS {
            let excess = self.trails.len() + 1 - MAX_TRAILS;
            self.trails.drain(..excess);
        }
        self.trails.push(Trail {
            id,
            pos,
            expires_at: now + TRAIL_DURATION_MS,
        });
    }

    /// Spawn `count` particles spread evenly around a circle
    pub fn spawn_burst<R: Rng + ?Sized>(&mut self, rng: &mut R, count: usize, now: f64) {
        for index in 0..count {
            let angle = TAU * index as f32 / count as f32 + random_between(rng, -0.14, 0.14);
            let distance = random_between(rng, 72.0, 170.0);
            let particle = BurstParticle {
                id: self.next_id(),
                offset: Vec2::new(angle.cos(), angle.sin()) * distance,
                delay: random_between(rng, 0.0, 0.2),
                icon: if rng.random_bool(0.7) {
                    BurstIcon::Heart
                } else {
                    BurstIcon::Sparkle
                },
                color: if rng.random_bool(0.55) {
                    BurstColor::Pink
                } else {
                    BurstColor::Cyan
                },
                size: random_between(rng, 12.0, 20.0),
                expires_at: now + BURST_DURATION_MS,
            };
            self.bursts.push(particle);
        }
    }

    /// Show a hint; a newer hint restarts the timeout
    pub fn show_hint(&mut self, text: impl Into<String>, now: f64) {
        self.hint = Some(Hint {
            text: text.into(),
            expires_at: now + HINT_DURATION_MS,
        });
    }

    pub fn hint_text(&self) -> Option<&str> {
        self.hint.as_ref().map(|h| h.text.as_str())
    }

    /// Drop everything past its deadline. Returns true if anything changed.
    pub fn expire(&mut self, now: f64) -> bool {
        let before = (self.trails.len(), self.bursts.len(), self.hint.is_some());
        self.trails.retain(|t| t.expires_at > now);
        self.bursts.retain(|b| b.expires_at > now);
        if self.hint.as_ref().is_some_and(|h| h.expires_at <= now) {
            self.hint = None;
        }
        before != (self.trails.len(), self.bursts.len(), self.hint.is_some())
    }

    /// Clear the button-related effects (bursts keep flying)
    pub fn clear_button_effects(&mut self) {
        self.trails.clear();
        self.hint = None;
    }

    /// Earliest pending deadline, used to schedule the next sweep
    pub fn next_deadline(&self) -> Option<f64> {
        self.trails
            .iter()
            .map(|t| t.expires_at)
            .chain(self.bursts.iter().map(|b| b.expires_at))
            .chain(self.hint.iter().map(|h| h.expires_at))
            .reduce(f64::min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_trails_are_capped() {
        let mut effects = Effects::default();
        for i in 0..12 {
            effects.push_trail(Vec2::new(i as f32, 0.0), 0.0);
        }
        assert_eq!(effects.trails.len(), MAX_TRAILS);
        // Oldest dropped first
        assert_eq!(effects.trails[0].pos.x, 5.0);
        assert_eq!(effects.trails[MAX_TRAILS - 1].pos.x, 11.0);
    }

    #[test]
    fn test_trails_expire() {
        let mut effects = Effects::default();
        effects.push_trail(Vec2::ZERO, 0.0);
        effects.push_trail(Vec2::ONE, 300.0);

        assert!(!effects.expire(500.0));
        assert!(effects.expire(TRAIL_DURATION_MS));
        assert_eq!(effects.trails.len(), 1);
        assert!(effects.expire(300.0 + TRAIL_DURATION_MS));
        assert!(effects.trails.is_empty());
    }

    #[test]
    fn test_burst_shape() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut effects = Effects::default();
        effects.spawn_burst(&mut rng, BURST_ON_YES, 1000.0);

        assert_eq!(effects.bursts.len(), BURST_ON_YES);
        for particle in &effects.bursts {
            let distance = particle.offset.length();
            assert!((71.9..170.1).contains(&distance));
            assert!((0.0..0.2).contains(&particle.delay));
            assert!((12.0..20.0).contains(&particle.size));
        }

        // Ids are unique
        let mut ids: Vec<u32> = effects.bursts.iter().map(|b| b.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), BURST_ON_YES);
    }

    #[test]
    fn test_bursts_expire_after_a_second() {
        let mut rng = Pcg32::seed_from_u64(12);
        let mut effects = Effects::default();
        effects.spawn_burst(&mut rng, 4, 0.0);
        effects.spawn_burst(&mut rng, 4, 600.0);

        effects.expire(999.0);
        assert_eq!(effects.bursts.len(), 8);
        effects.expire(1000.0);
        assert_eq!(effects.bursts.len(), 4);
        effects.expire(1600.0);
        assert!(effects.bursts.is_empty());
    }

    #[test]
    fn test_new_hint_restarts_timeout() {
        let mut effects = Effects::default();
        effects.show_hint("first", 0.0);
        effects.show_hint("second", 800.0);

        effects.expire(1000.0);
        assert_eq!(effects.hint_text(), Some("second"));
        effects.expire(1800.0);
        assert_eq!(effects.hint_text(), None);
    }

    #[test]
    fn test_next_deadline() {
        let mut effects = Effects::default();
        assert_eq!(effects.next_deadline(), None);
        effects.show_hint("hi", 100.0);
        effects.push_trail(Vec2::ZERO, 100.0);
        assert_eq!(effects.next_deadline(), Some(100.0 + TRAIL_DURATION_MS));
    }

    #[test]
    fn test_floating_hearts_ranges() {
        let mut rng = Pcg32::seed_from_u64(13);
        let hearts = floating_hearts(&mut rng, FLOATING_HEART_COUNT);
        assert_eq!(hearts.len(), FLOATING_HEART_COUNT);
        for heart in hearts {
            assert!((0.0..100.0).contains(&heart.left));
            assert!((18.0..34.0).contains(&heart.duration));
            assert!((-22.0..-2.0).contains(&heart.delay));
            assert!((0.16..0.42).contains(&heart.opacity));
        }
    }
}
