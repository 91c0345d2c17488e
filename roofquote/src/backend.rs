use crate::model::{
    AiAnalysis, AnalysisRequest, CostEstimate, CostRequest, DetectRequest, GeocodeRequest,
    GeocodeResult, Measurement, MeasurementRequest, RoofDetection, SatelliteImage,
    SatelliteRequest, SuggestionList,
};
use thiserror::Error;

pub mod paths {
    pub const GEOCODE: &str = "/api/v1/address/geocode";
    pub const SATELLITE_IMAGE: &str = "/api/v1/satellite/image";
    pub const ROOF_DETECT: &str = "/api/v1/roof/detect";
    pub const MEASUREMENT: &str = "/api/v1/measurement/calculate";
    pub const ESTIMATE_COST: &str = "/api/v1/measurement/estimate-cost";
    pub const PRICING_DEFAULTS: &str = "/api/v1/measurement/pricing-defaults";
    pub const AI_ANALYZE: &str = "/api/v1/ai/analyze";
    pub const SUGGESTIONS: &str = "/api/v1/autocomplete/suggestions";
    pub const HEALTH: &str = "/api/health";
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("server responded with HTTP {status}{}", body_suffix(.body))]
    Status { status: u16, body: String },
    #[error("unexpected response: {0}")]
    Decode(String),
    /// The backend answered but reported `success: false`.
    #[error("{0}")]
    Rejected(String),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Transport(_) => "transport",
            ApiError::Status { .. } => "http_status",
            ApiError::Decode(_) => "decode",
            ApiError::Rejected(_) => "rejected",
        }
    }

    pub(crate) fn rejected(error: Option<String>, fallback: &str) -> ApiError {
        ApiError::Rejected(error.filter(|e| !e.trim().is_empty()).unwrap_or_else(|| fallback.to_string()))
    }
}

/// The estimation backend. Implementations are single-threaded; futures need
/// not be `Send`.
#[allow(async_fn_in_trait)]
pub trait Backend {
    async fn geocode(&self, req: &GeocodeRequest) -> Result<GeocodeResult, ApiError>;
    async fn satellite_image(&self, req: &SatelliteRequest) -> Result<SatelliteImage, ApiError>;
    async fn detect_roof(&self, req: &DetectRequest) -> Result<RoofDetection, ApiError>;
    async fn measure(&self, req: &MeasurementRequest) -> Result<Measurement, ApiError>;
    async fn estimate_cost(&self, req: &CostRequest) -> Result<CostEstimate, ApiError>;
    async fn analyze(&self, req: &AnalysisRequest) -> Result<AiAnalysis, ApiError>;
    async fn suggestions(&self, input: &str) -> Result<SuggestionList, ApiError>;
    async fn pricing_defaults(&self) -> Result<serde_json::Value, ApiError>;
    async fn health(&self) -> Result<serde_json::Value, ApiError>;
}

fn body_suffix(body: &str) -> String {
    if body.is_empty() { String::new() } else { format!(": {body}") }
}

pub fn data_url(image_base64: &str) -> String {
    if image_base64.starts_with("data:") {
        image_base64.to_string()
    } else {
        format!("data:image/png;base64,{image_base64}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_message_includes_body_when_present() {
        let e = ApiError::Status { status: 502, body: "bad gateway".into() };
        assert_eq!(e.to_string(), "server responded with HTTP 502: bad gateway");
        let e = ApiError::Status { status: 500, body: String::new() };
        assert_eq!(e.to_string(), "server responded with HTTP 500");
        assert_eq!(e.code(), "http_status");
    }

    #[test]
    fn rejected_falls_back_on_blank_message() {
        assert_eq!(ApiError::rejected(Some("  ".into()), "Address not found").to_string(), "Address not found");
        assert_eq!(ApiError::rejected(Some("quota".into()), "x").to_string(), "quota");
    }

    #[test]
    fn data_url_is_idempotent() {
        assert_eq!(data_url("AAAA"), "data:image/png;base64,AAAA");
        assert_eq!(data_url("data:image/jpeg;base64,BBBB"), "data:image/jpeg;base64,BBBB");
    }
}
