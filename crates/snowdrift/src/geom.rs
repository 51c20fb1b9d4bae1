//! Axis-aligned rectangle helpers for screen-space window frames.
//!
//! The crate works in a y-up coordinate space: `max_y` is a window's top edge
//! (the surface snow lands on) and falling particles move toward smaller y.
use glam::Vec2;

/// Axis-aligned rectangle given by its minimum corner and extent.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// Minimum (bottom-left) corner.
    pub origin: Vec2,
    /// Width and height; non-negative by caller contract.
    pub extent: Vec2,
}

impl Rect {
    /// Create a rectangle from its minimum corner and extent.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            extent: Vec2::new(width, height),
        }
    }

    pub fn min_x(&self) -> f32 {
        self.origin.x
    }

    pub fn max_x(&self) -> f32 {
        self.origin.x + self.extent.x
    }

    pub fn min_y(&self) -> f32 {
        self.origin.y
    }

    pub fn max_y(&self) -> f32 {
        self.origin.y + self.extent.y
    }

    /// The snow-bearing top edge.
    pub fn top(&self) -> f32 {
        self.max_y()
    }

    pub fn width(&self) -> f32 {
        self.extent.x
    }

    pub fn height(&self) -> f32 {
        self.extent.y
    }

    pub fn center(&self) -> Vec2 {
        self.origin + self.extent * 0.5
    }

    /// Edge-inclusive containment test.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min_x()
            && point.x <= self.max_x()
            && point.y >= self.min_y()
            && point.y <= self.max_y()
    }

    /// Horizontal extent containment only, edge-inclusive.
    pub fn contains_x(&self, x: f32) -> bool {
        x >= self.min_x() && x <= self.max_x()
    }
}
