//! Axis-aligned zones overriding friction/gravity or draining balls
//!
//! Regions are checked in list order and never blended: for each override the
//! first region that carries it and contains the point wins.

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    /// Top-left corner
    pub min: Vec2,
    pub size: Vec2,
    /// Balls whose center enters are removed
    #[serde(default)]
    pub disappears: bool,
    #[serde(default)]
    pub friction: Option<f32>,
    #[serde(default)]
    pub gravity: Option<f32>,
}

impl Region {
    /// Strict containment: points on the border are outside
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.min + self.size;
        self.min.x < point.x && point.x < max.x && self.min.y < point.y && point.y < max.y
    }
}

/// Friction override at `point`, if any region provides one
pub fn friction_at(regions: &[Region], point: Vec2) -> Option<f32> {
    regions
        .iter()
        .find(|r| r.friction.is_some() && r.contains(point))
        .and_then(|r| r.friction)
}

/// Gravity override at `point`, if any region provides one
pub fn gravity_at(regions: &[Region], point: Vec2) -> Option<f32> {
    regions
        .iter()
        .find(|r| r.gravity.is_some() && r.contains(point))
        .and_then(|r| r.gravity)
}

/// True if `point` is inside any draining region
pub fn drains(regions: &[Region], point: Vec2) -> bool {
    regions.iter().any(|r| r.disappears && r.contains(point))
}
