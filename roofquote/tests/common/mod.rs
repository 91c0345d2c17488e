#![allow(dead_code)]

use futures::channel::oneshot;
use roofquote::backend::{ApiError, Backend};
use roofquote::model::*;
use std::cell::RefCell;
use std::collections::HashMap;

type Slot<T> = RefCell<Result<T, ApiError>>;

fn not_configured<T>() -> Slot<T> {
    RefCell::new(Err(ApiError::Transport("not configured".into())))
}

/// Scripted backend. Every endpoint answers with its slot's current value;
/// geocode calls for a gated address wait until the gate is released.
pub struct MockBackend {
    pub satellite: Slot<SatelliteImage>,
    pub detection: Slot<RoofDetection>,
    pub measurement: Slot<Measurement>,
    pub cost: Slot<CostEstimate>,
    pub analysis: Slot<AiAnalysis>,
    pub suggestions: Slot<SuggestionList>,
    pub geocode_failures: RefCell<HashMap<String, ApiError>>,
    pub gates: RefCell<HashMap<String, oneshot::Receiver<()>>>,
    pub measure_gate: RefCell<Option<oneshot::Receiver<()>>>,
    pub calls: RefCell<Vec<&'static str>>,
    pub last_detect: RefCell<Option<DetectRequest>>,
    pub last_measurement: RefCell<Option<MeasurementRequest>>,
    pub last_cost: RefCell<Option<CostRequest>>,
    pub last_analysis: RefCell<Option<AnalysisRequest>>,
    pub last_satellite: RefCell<Option<SatelliteRequest>>,
}

impl MockBackend {
    pub fn new() -> MockBackend {
        MockBackend {
            satellite: not_configured(),
            detection: not_configured(),
            measurement: not_configured(),
            cost: not_configured(),
            analysis: not_configured(),
            suggestions: not_configured(),
            geocode_failures: RefCell::new(HashMap::new()),
            gates: RefCell::new(HashMap::new()),
            measure_gate: RefCell::new(None),
            calls: RefCell::new(Vec::new()),
            last_detect: RefCell::new(None),
            last_measurement: RefCell::new(None),
            last_cost: RefCell::new(None),
            last_analysis: RefCell::new(None),
            last_satellite: RefCell::new(None),
        }
    }

    /// Backend where every step of both flows succeeds.
    pub fn happy() -> MockBackend {
        let m = MockBackend::new();
        *m.satellite.borrow_mut() = Ok(image_ok());
        *m.detection.borrow_mut() = Ok(detection(&[(0.1, 0.1), (0.9, 0.1), (0.9, 0.9)]));
        *m.measurement.borrow_mut() = Ok(measurement());
        *m.cost.borrow_mut() = Ok(cost());
        *m.analysis.borrow_mut() = Ok(analysis());
        m
    }

    /// Like `happy`, but imagery is down so the flow lands in manual drawing.
    pub fn happy_without_imagery() -> MockBackend {
        let m = MockBackend::happy();
        *m.satellite.borrow_mut() = Err(ApiError::Transport("imagery offline".into()));
        m
    }

    pub fn fail_geocode(&self, address: &str, e: ApiError) {
        self.geocode_failures.borrow_mut().insert(address.to_string(), e);
    }

    pub fn gate(&self, address: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.borrow_mut().insert(address.to_string(), rx);
        tx
    }

    /// Holds the next measurement request until the sender fires.
    pub fn gate_measure(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.measure_gate.borrow_mut() = Some(rx);
        tx
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }

    fn record(&self, name: &'static str) {
        self.calls.borrow_mut().push(name);
    }
}

pub fn geocoded(address: &str) -> GeocodeResult {
    GeocodeResult {
        address: Some(address.to_string()),
        latitude: 37.33,
        longitude: -122.03,
        formatted_address: format!("{address}, Cupertino, CA 95014"),
        success: true,
        error: None,
    }
}

pub fn image_ok() -> SatelliteImage {
    SatelliteImage { success: true, image_base64: Some("iVBORw0KGgo=".into()), image_url: None, error: None }
}

pub fn detection(points: &[(f64, f64)]) -> RoofDetection {
    RoofDetection {
        success: true,
        polygon_points: points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
        confidence: 0.85,
        roof_type: Some("hip".into()),
        error: None,
        message: None,
    }
}

pub fn measurement() -> Measurement {
    Measurement { area_sq_ft: 2150.0, estimated_pitch: 22.5, pitch_multiplier: 1.08, perimeter: 190.0, point_count: 4 }
}

pub fn cost() -> CostEstimate {
    CostEstimate {
        area_sq_ft: Some(2150.0),
        pitch_degrees: Some(22.5),
        pitch_multiplier: Some(1.08),
        material_cost: 8127.0,
        labor_cost: 5805.0,
        repair_cost: 0.0,
        subtotal: 13932.0,
        total: 13932.0,
        cost_per_sqft: 6.48,
    }
}

pub fn analysis() -> AiAnalysis {
    AiAnalysis {
        success: true,
        complexity_rating: Some(4),
        recommendations: Some(vec!["Architectural shingles".into()]),
        timeline_estimate: Some(3),
        confidence: 0.8,
        ..AiAnalysis::default()
    }
}

pub fn suggestion(description: &str) -> Suggestion {
    Suggestion { description: description.to_string(), place_id: format!("place-{}", description.len()) }
}

impl Backend for MockBackend {
    async fn geocode(&self, req: &GeocodeRequest) -> Result<GeocodeResult, ApiError> {
        self.record("geocode");
        let gate = self.gates.borrow_mut().remove(&req.address);
        if let Some(rx) = gate {
            let _ = rx.await;
        }
        match self.geocode_failures.borrow().get(&req.address) {
            Some(e) => Err(e.clone()),
            None => Ok(geocoded(&req.address)),
        }
    }
    async fn satellite_image(&self, req: &SatelliteRequest) -> Result<SatelliteImage, ApiError> {
        self.record("satellite");
        *self.last_satellite.borrow_mut() = Some(req.clone());
        self.satellite.borrow().clone()
    }
    async fn detect_roof(&self, req: &DetectRequest) -> Result<RoofDetection, ApiError> {
        self.record("detect");
        *self.last_detect.borrow_mut() = Some(req.clone());
        self.detection.borrow().clone()
    }
    async fn measure(&self, req: &MeasurementRequest) -> Result<Measurement, ApiError> {
        self.record("measure");
        *self.last_measurement.borrow_mut() = Some(req.clone());
        let gate = self.measure_gate.borrow_mut().take();
        if let Some(rx) = gate {
            let _ = rx.await;
        }
        self.measurement.borrow().clone()
    }
    async fn estimate_cost(&self, req: &CostRequest) -> Result<CostEstimate, ApiError> {
        self.record("cost");
        *self.last_cost.borrow_mut() = Some(req.clone());
        self.cost.borrow().clone()
    }
    async fn analyze(&self, req: &AnalysisRequest) -> Result<AiAnalysis, ApiError> {
        self.record("analyze");
        *self.last_analysis.borrow_mut() = Some(req.clone());
        self.analysis.borrow().clone()
    }
    async fn suggestions(&self, _input: &str) -> Result<SuggestionList, ApiError> {
        self.record("suggestions");
        self.suggestions.borrow().clone()
    }
    async fn pricing_defaults(&self) -> Result<serde_json::Value, ApiError> {
        self.record("pricing_defaults");
        Ok(serde_json::json!({"material_cost_per_sqft": 3.5, "labor_cost_per_sqft": 2.5}))
    }
    async fn health(&self) -> Result<serde_json::Value, ApiError> {
        self.record("health");
        Ok(serde_json::json!({"status": "healthy"}))
    }
}
