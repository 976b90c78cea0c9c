//! Viewport geometry for the floating button

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{NO_BUTTON_MIN_HEIGHT, NO_BUTTON_MIN_WIDTH, YES_GAP};

/// Snapshot of an element's bounding client rect
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// True when no part of the rect is inside the viewport
    pub fn is_out_of_view(&self, viewport: Vec2) -> bool {
        self.right() < 0.0 || self.left > viewport.x || self.bottom() < 0.0 || self.top > viewport.y
    }
}

/// Button size with the minimum floor applied
pub fn button_size(measured: Option<Vec2>) -> Vec2 {
    let min = Vec2::new(NO_BUTTON_MIN_WIDTH, NO_BUTTON_MIN_HEIGHT);
    measured.map_or(min, |size| size.max(min))
}

/// Area the button's top-left corner may occupy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
    /// Button size the bounds were computed for
    pub button: Vec2,
}

impl Bounds {
    /// Viewport minus button size minus padding; never inverted
    pub fn new(viewport: Vec2, button: Vec2, padding: f32) -> Self {
        let min = Vec2::splat(padding);
        let max = (viewport - button - Vec2::splat(padding)).max(min);
        Self { min, max, button }
    }

    pub fn clamp(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max)
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// Spot just right of the Yes button, vertically centred on it
    pub fn beside(&self, yes: &Rect) -> Vec2 {
        self.clamp(Vec2::new(
            yes.right() + YES_GAP,
            yes.top + (yes.height - self.button.y) / 2.0,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_subtract_button_and_padding() {
        let bounds = Bounds::new(Vec2::new(800.0, 600.0), Vec2::new(136.0, 56.0), 12.0);
        assert_eq!(bounds.min, Vec2::new(12.0, 12.0));
        assert_eq!(bounds.max, Vec2::new(652.0, 532.0));
    }

    #[test]
    fn test_tiny_viewport_collapses_bounds() {
        let bounds = Bounds::new(Vec2::new(100.0, 40.0), Vec2::new(136.0, 56.0), 12.0);
        assert_eq!(bounds.max, bounds.min);
        assert_eq!(bounds.clamp(Vec2::new(500.0, -20.0)), bounds.min);
    }

    #[test]
    fn test_button_size_floor() {
        assert_eq!(button_size(None), Vec2::new(136.0, 56.0));
        assert_eq!(
            button_size(Some(Vec2::new(90.0, 70.0))),
            Vec2::new(136.0, 70.0)
        );
    }

    #[test]
    fn test_beside_yes() {
        let bounds = Bounds::new(Vec2::new(800.0, 600.0), Vec2::new(136.0, 56.0), 12.0);
        let yes = Rect::new(200.0, 300.0, 120.0, 60.0);
        let pos = bounds.beside(&yes);
        assert_eq!(pos, Vec2::new(334.0, 302.0));

        // Yes button at the far right: clamped back inside
        let yes = Rect::new(760.0, 300.0, 120.0, 60.0);
        assert_eq!(bounds.beside(&yes).x, bounds.max.x);
    }

    #[test]
    fn test_out_of_view() {
        let viewport = Vec2::new(800.0, 600.0);
        assert!(!Rect::new(10.0, 10.0, 100.0, 50.0).is_out_of_view(viewport));
        // Partially visible still counts as in view
        assert!(!Rect::new(-50.0, 10.0, 100.0, 50.0).is_out_of_view(viewport));
        assert!(Rect::new(-150.0, 10.0, 100.0, 50.0).is_out_of_view(viewport));
        assert!(Rect::new(10.0, 601.0, 100.0, 50.0).is_out_of_view(viewport));
    }
}
