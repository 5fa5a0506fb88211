//! Collision tests between the round ball and axis-aligned paddles

use glam::Vec2;

use crate::clamp;

/// Closest point on an axis-aligned rectangle to `point`
///
/// `rect_pos` is the top-left corner, `rect_size` the width/height.
#[inline]
pub fn closest_point_on_rect(point: Vec2, rect_pos: Vec2, rect_size: Vec2) -> Vec2 {
    Vec2::new(
        clamp(point.x, rect_pos.x, rect_pos.x + rect_size.x),
        clamp(point.y, rect_pos.y, rect_pos.y + rect_size.y),
    )
}

/// Check whether a circle overlaps an axis-aligned rectangle
///
/// Boundary inclusive: a circle exactly tangent to an edge counts as a hit.
pub fn circle_intersects_rect(center: Vec2, radius: f32, rect_pos: Vec2, rect_size: Vec2) -> bool {
    let nearest = closest_point_on_rect(center, rect_pos, rect_size);
    center.distance_squared(nearest) <= radius * radius
}
