// Bounds for configuration and untrusted backend payloads

// Canvas size caps (px)
pub const CANVAS_MIN: u32 = 1;
pub const CANVAS_MAX: u32 = 4096;

// Static map zoom levels accepted by the imagery backend
pub const ZOOM_MIN: u8 = 1;
pub const ZOOM_MAX: u8 = 21;

// Feet per pixel
pub const SCALE_FACTOR_MAX: f64 = 100.0;

// Autocomplete debounce window (ms)
pub const DEBOUNCE_MAX_MS: u32 = 10_000;

// Detected polygons larger than this are discarded
pub const MAX_DETECTED_POINTS: usize = 256;

// Numeric bounds for pointer input
pub const COORD_MIN: f64 = -1_000_000.0;
pub const COORD_MAX: f64 = 1_000_000.0;

#[inline]
pub fn in_coord_bounds(x: f64) -> bool { x.is_finite() && x >= COORD_MIN && x <= COORD_MAX }

#[inline]
pub fn in_canvas_bounds(px: u32) -> bool { (CANVAS_MIN..=CANVAS_MAX).contains(&px) }

#[inline]
pub fn in_zoom_bounds(z: u8) -> bool { (ZOOM_MIN..=ZOOM_MAX).contains(&z) }

#[inline]
pub fn in_scale_bounds(s: f64) -> bool { s.is_finite() && s > 0.0 && s <= SCALE_FACTOR_MAX }
