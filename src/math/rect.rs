use serde::{Deserialize, Serialize};

use super::Vec2;
use crate::perception::Side;

/// An axis-aligned rectangle given by its minimum corner and extent.
/// Used for the defensive zones of the goalkeeper and the center-back.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Rect {
        Rect { x, y, w, h }
    }

    /// Min-inclusive, max-exclusive containment.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x < self.x + self.w && p.y >= self.y && p.y < self.y + self.h
    }

    /// Mirrors the rectangle through the field center for the given side.
    /// Zones are authored for the left side; the right side gets every
    /// coordinate component negated, same as home positions.
    pub fn mirrored(&self, side: Side) -> Rect {
        match side {
            Side::Left => *self,
            Side::Right => Rect::new(-(self.x + self.w), -(self.y + self.h), self.w, self.h),
        }
    }
}
