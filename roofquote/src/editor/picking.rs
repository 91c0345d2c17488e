use crate::geometry::math::{dist_sq, within_radius};
use crate::geometry::tolerance::HIT_RADIUS;
use crate::model::Point;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct VertexPick {
    pub index: usize,
    pub dist: f64,
}

/// First vertex (lowest index) strictly within `radius` of `at`. Overlapping
/// vertices resolve to the earliest one, not the nearest.
pub fn pick_vertex_within(points: &[Point], at: Point, radius: f64) -> Option<VertexPick> {
    if !at.is_finite() || !radius.is_finite() || radius <= 0.0 {
        return None;
    }
    points
        .iter()
        .position(|v| within_radius(at, *v, radius))
        .map(|index| VertexPick { index, dist: dist_sq(at, points[index]).sqrt() })
}

pub fn pick_vertex(points: &[Point], at: Point) -> Option<usize> {
    pick_vertex_within(points, at, HIT_RADIUS).map(|p| p.index)
}
