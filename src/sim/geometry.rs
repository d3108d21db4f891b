//! Segment projection and box containment
//!
//! Pure functions, no state. Segments are described the way the layout
//! describes walls: an origin plus an extent vector.

use glam::Vec2;

/// Below this length a segment has no usable normal
pub const MIN_SEGMENT_LENGTH: f32 = 1.0e-6;

/// Unit normal of a segment, `normalize((-v.y, v.x))`
///
/// Returns `None` for a zero-length segment.
#[inline]
pub fn segment_normal(extent: Vec2) -> Option<Vec2> {
    let len = extent.length();
    if len < MIN_SEGMENT_LENGTH {
        return None;
    }
    Some(Vec2::new(-extent.y, extent.x) / len)
}

/// Project a point onto the infinite line through a segment
///
/// Returns the projected point and the unsigned distance from `point` to it,
/// or `None` when the segment is degenerate.
pub fn project_point_onto_segment(point: Vec2, origin: Vec2, extent: Vec2) -> Option<(Vec2, f32)> {
    let normal = segment_normal(extent)?;
    let offset = (point - origin).dot(normal);
    let projected = point - offset * normal;
    Some((projected, offset.abs()))
}

/// Inclusive axis-aligned containment
#[inline]
pub fn point_in_bounding_box(point: Vec2, min: Vec2, max: Vec2) -> bool {
    point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
}

/// Bounding box of a segment as (min, max)
#[inline]
pub fn segment_bounds(origin: Vec2, extent: Vec2) -> (Vec2, Vec2) {
    let end = origin + extent;
    (origin.min(end), origin.max(end))
}

/// Normalize `v`, substituting `fallback` when `v` has no direction
#[inline]
pub fn direction_or(v: Vec2, fallback: Vec2) -> Vec2 {
    v.try_normalize().unwrap_or(fallback)
}
