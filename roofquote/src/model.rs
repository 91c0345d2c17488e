use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default)]
    pub formatted_address: String,
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SatelliteImage {
    pub success: bool,
    #[serde(default)]
    pub image_base64: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoofDetection {
    pub success: bool,
    // Older backends reply with `points`
    #[serde(default, alias = "points")]
    pub polygon_points: Vec<Point>,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub roof_type: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub area_sq_ft: f64,
    pub estimated_pitch: f64,
    #[serde(default = "unit_multiplier")]
    pub pitch_multiplier: f64,
    pub perimeter: f64,
    pub point_count: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    #[serde(default)]
    pub area_sq_ft: Option<f64>,
    #[serde(default)]
    pub pitch_degrees: Option<f64>,
    #[serde(default)]
    pub pitch_multiplier: Option<f64>,
    pub material_cost: f64,
    pub labor_cost: f64,
    pub repair_cost: f64,
    pub subtotal: f64,
    pub total: f64,
    pub cost_per_sqft: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AiAnalysis {
    pub success: bool,
    #[serde(default)]
    pub complexity_rating: Option<u8>,
    #[serde(default)]
    pub recommendations: Option<Vec<String>>,
    #[serde(default)]
    pub material_suggestions: Option<Vec<String>>,
    #[serde(default)]
    pub timeline_estimate: Option<u32>,
    #[serde(default)]
    pub considerations: Option<Vec<String>>,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub description: String,
    pub place_id: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SuggestionList {
    pub success: bool,
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
    #[serde(default)]
    pub error: Option<String>,
}

fn unit_multiplier() -> f64 {
    1.0
}

// Request bodies

#[derive(Clone, Debug, Serialize)]
pub struct GeocodeRequest {
    pub address: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct SatelliteRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: u8,
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Debug, Serialize)]
pub struct DetectRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub image_base64: String,
    pub image_width: u32,
    pub image_height: u32,
}

#[derive(Clone, Debug, Serialize)]
pub struct MeasurementRequest {
    pub points: Vec<Point>,
    pub scale_factor: f64,
    pub building_type: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct CostRequest {
    pub area_sq_ft: f64,
    pub pitch_degrees: f64,
    pub has_damage: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct AnalysisRequest {
    pub address: String,
    pub area_sq_ft: f64,
    pub pitch_degrees: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_notes: Option<String>,
}
