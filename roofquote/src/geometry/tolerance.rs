// Editor tolerances (canvas pixels)

pub const HIT_RADIUS: f64 = 10.0;         // vertex hit-test radius, strict
pub const VERTEX_RING_RADIUS: f64 = 8.0;  // outer white ring
pub const VERTEX_DOT_RADIUS: f64 = 6.0;   // inner colored disk
pub const OUTLINE_WIDTH: f64 = 3.0;

// Detection coordinates at or below this bound are treated as normalized 0-1
pub const NORMALIZED_MAX: f64 = 1.0;

#[inline] pub fn clamp(x: f64, lo: f64, hi: f64) -> f64 { x.max(lo).min(hi) }
