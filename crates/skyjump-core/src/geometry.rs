use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in world pixels. `(x, y)` is the bottom-left
/// corner, y grows upward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Aabb {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Strict overlap of the horizontal spans. Touching edges do not count.
    pub fn overlaps_x(&self, other: &Aabb) -> bool {
        self.right() > other.x && self.x < other.right()
    }

    /// Strict overlap on both axes.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.overlaps_x(other) && self.top() > other.y && self.y < other.top()
    }
}
