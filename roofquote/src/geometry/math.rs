use super::tolerance::{clamp, NORMALIZED_MAX};
use crate::model::Point;

#[inline]
pub fn dist_sq(a: Point, b: Point) -> f64 {
    let dx = a.x - b.x; let dy = a.y - b.y;
    dx*dx + dy*dy
}

// Strict: a point exactly on the radius is outside
#[inline]
pub fn within_radius(p: Point, center: Point, r: f64) -> bool {
    dist_sq(p, center) < r*r
}

pub fn is_normalized(points: &[Point]) -> bool {
    points.iter().all(|p| {
        (0.0..=NORMALIZED_MAX).contains(&p.x) && (0.0..=NORMALIZED_MAX).contains(&p.y)
    })
}

/// Maps detector output onto the canvas. Normalized input (every coordinate in
/// 0..=1) is scaled by the canvas size; pixel input is clamped into bounds.
/// Non-finite points are dropped.
pub fn to_canvas_space(points: &[Point], width: f64, height: f64) -> Vec<Point> {
    let finite: Vec<Point> = points.iter().copied().filter(Point::is_finite).collect();
    if is_normalized(&finite) {
        finite.iter().map(|p| Point::new(p.x * width, p.y * height)).collect()
    } else {
        finite.iter().map(|p| Point::new(clamp(p.x, 0.0, width), clamp(p.y, 0.0, height))).collect()
    }
}
