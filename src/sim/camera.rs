//! Scrolling camera for mazes larger than the screen

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;

/// Additive draw offset that keeps a target centered without showing
/// anything outside the map
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub offset: Vec2,
    pub viewport: Vec2,
    pub map_size: Vec2,
}

impl Camera {
    pub fn new(viewport: Vec2, map_size: Vec2) -> Self {
        Self {
            offset: Vec2::ZERO,
            viewport,
            map_size,
        }
    }

    /// Whether a map of this size needs scrolling at all
    pub fn is_needed(viewport: Vec2, map_size: Vec2) -> bool {
        map_size.x > viewport.x || map_size.y > viewport.y
    }

    /// Center on `target`, clamped to `[-(map - viewport), 0]` per axis
    pub fn update(&mut self, target: &Rect) {
        let raw = self.viewport / 2.0 - target.center();
        // A map narrower than the viewport pins that axis to 0
        let min = (self.viewport - self.map_size).min(Vec2::ZERO);
        self.offset = raw.clamp(min, Vec2::ZERO);
    }

    /// World rectangle to screen space
    pub fn apply(&self, rect: &Rect) -> Rect {
        rect.translated(self.offset)
    }

    /// Whether any part of a world rectangle lands on screen
    pub fn is_visible(&self, rect: &Rect) -> bool {
        self.apply(rect)
            .overlaps(&Rect::new(Vec2::ZERO, self.viewport))
    }
}
