use crate::autocomplete::{Autocomplete, Ticket};
use crate::backend::{data_url, ApiError, Backend};
use crate::config::Config;
use crate::editor::EditorEvent;
use crate::geometry::{limits, math::to_canvas_space};
use crate::model::{
    AnalysisRequest, CostRequest, DetectRequest, GeocodeRequest, GeocodeResult,
    MeasurementRequest, Point, SatelliteRequest, Suggestion,
};
use crate::store::{Action, DetectionSummary, Phase, RequestToken, State, Store, MIN_POLYGON_POINTS};
use log::{debug, warn};
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;

pub const MIN_POINTS_MESSAGE: &str = "Draw at least 3 points to create a polygon";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FlowError {
    /// Rejected locally, no request was issued.
    #[error("{0}")]
    Validation(String),
    #[error("{message}")]
    Api { message: String, source: ApiError },
    /// A newer action replaced this one; its results were discarded.
    #[error("request superseded by a newer action")]
    Superseded,
}

impl FlowError {
    pub fn code(&self) -> &'static str {
        match self {
            FlowError::Validation(_) => "validation",
            FlowError::Api { source, .. } => source.code(),
            FlowError::Superseded => "superseded",
        }
    }
}

pub type Listener = Rc<dyn Fn(&State)>;

/// Drives the address → drawing → results flow against a [`Backend`].
pub struct Estimator<B> {
    backend: B,
    config: Config,
    store: RefCell<Store>,
    listeners: RefCell<Vec<Listener>>,
}

fn describe(context: &str, e: &ApiError) -> String {
    match e {
        ApiError::Rejected(msg) => msg.clone(),
        other => format!("{context}: {other}"),
    }
}

impl<B: Backend> Estimator<B> {
    pub fn new(backend: B, config: Config) -> Estimator<B> {
        let store = RefCell::new(Store::new(&config));
        Estimator { backend, config, store, listeners: RefCell::new(Vec::new()) }
    }

    pub fn config(&self) -> &Config { &self.config }
    pub fn backend(&self) -> &B { &self.backend }

    pub fn snapshot(&self) -> State {
        self.store.borrow().state().clone()
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&State) -> R) -> R {
        f(self.store.borrow().state())
    }

    /// Called with the new state after every applied action.
    pub fn subscribe(&self, listener: impl Fn(&State) + 'static) {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    pub fn dispatch(&self, action: Action) -> bool {
        // Release the store before notifying; listeners may read it again
        let snapshot = {
            let mut store = self.store.borrow_mut();
            if !store.dispatch(action) {
                return false;
            }
            store.state().clone()
        };
        let listeners: Vec<Listener> = self.listeners.borrow().clone();
        for l in listeners {
            l(&snapshot);
        }
        true
    }

    fn begin(&self, start: impl FnOnce(RequestToken) -> Action) -> Option<RequestToken> {
        let token = self.store.borrow().issue_token();
        self.dispatch(start(token)).then_some(token)
    }

    fn ensure_current(&self, token: RequestToken) -> Result<(), FlowError> {
        if self.store.borrow().is_current(token) {
            Ok(())
        } else {
            debug!("request {} superseded", token.0);
            Err(FlowError::Superseded)
        }
    }

    // Plain state edits

    pub fn set_address(&self, address: &str) -> bool {
        self.dispatch(Action::SetAddress(address.to_string()))
    }
    pub fn set_has_damage(&self, v: bool) -> bool {
        self.dispatch(Action::SetHasDamage(v))
    }
    pub fn set_user_notes(&self, notes: Option<String>) -> bool {
        self.dispatch(Action::SetUserNotes(notes))
    }
    pub fn set_scale_factor(&self, f: f64) -> bool {
        self.dispatch(Action::SetScaleFactor(f))
    }
    pub fn add_point(&self, p: Point) -> bool {
        self.dispatch(Action::PointAdded(p))
    }
    pub fn move_point(&self, index: usize, p: Point) -> bool {
        self.dispatch(Action::PointMoved { index, point: p })
    }
    pub fn apply_editor_event(&self, event: EditorEvent) -> bool {
        match event {
            EditorEvent::PointAdded(p) => self.add_point(p),
            EditorEvent::PointMoved { index, point } => self.move_point(index, point),
        }
    }
    pub fn clear(&self) -> bool {
        self.dispatch(Action::Clear)
    }
    pub fn reset(&self) -> bool {
        self.dispatch(Action::Reset)
    }

    /// Geocode, then imagery, then roof detection. Only a geocode failure is
    /// returned as an error; imagery and detection failures degrade to manual
    /// drawing.
    pub async fn submit_address(&self) -> Result<Phase, FlowError> {
        let address = self.with_state(|s| s.address.trim().to_string());
        if address.is_empty() {
            return Err(FlowError::Validation("Enter a property address".to_string()));
        }
        let token = self
            .begin(|token| Action::SubmitStarted { token, address: address.clone() })
            .ok_or(FlowError::Superseded)?;
        debug!("request {}: geocoding '{}'", token.0, address);

        let geocoded = self.backend.geocode(&GeocodeRequest { address }).await.and_then(check_geocode);
        self.ensure_current(token)?;
        let geocode = match geocoded {
            Ok(g) => g,
            Err(e) => {
                let message = describe("Failed to geocode address", &e);
                self.dispatch(Action::GeocodeFailed { token, message: message.clone() });
                return Err(FlowError::Api { message, source: e });
            }
        };
        let (lat, lng) = (geocode.latitude, geocode.longitude);
        self.dispatch(Action::GeocodeSucceeded { token, result: geocode });

        let req = SatelliteRequest {
            latitude: lat,
            longitude: lng,
            zoom: self.config.satellite_zoom,
            width: self.config.canvas_width,
            height: self.config.canvas_height,
        };
        let image = self.backend.satellite_image(&req).await.and_then(|img| {
            match img.image_base64.filter(|b| img.success && !b.is_empty()) {
                Some(b64) => Ok(b64),
                None => Err(ApiError::rejected(img.error, "No satellite image returned")),
            }
        });
        self.ensure_current(token)?;
        let image_base64: Rc<str> = match image {
            Ok(b64) => Rc::from(b64),
            Err(e) => {
                warn!("request {}: satellite image unavailable: {e}", token.0);
                let message = format!("Satellite image unavailable: {e}");
                self.dispatch(Action::ImageFailed { token, message });
                return Ok(Phase::Drawing);
            }
        };
        self.dispatch(Action::ImageLoaded { token, image_base64: image_base64.clone() });

        let (points, summary) = self.detect(lat, lng, &image_base64).await;
        self.ensure_current(token)?;
        self.dispatch(Action::DetectionFinished { token, points, summary });
        Ok(self.with_state(|s| s.phase))
    }

    // Any failure here means "draw manually": empty points, no error surfaced.
    async fn detect(&self, lat: f64, lng: f64, image_base64: &str) -> (Vec<Point>, Option<DetectionSummary>) {
        let req = DetectRequest {
            latitude: lat,
            longitude: lng,
            image_base64: data_url(image_base64),
            image_width: self.config.canvas_width,
            image_height: self.config.canvas_height,
        };
        let det = match self.backend.detect_roof(&req).await {
            Ok(d) if d.success => d,
            Ok(d) => {
                debug!("roof detection declined: {}", d.error.or(d.message).unwrap_or_default());
                return (Vec::new(), None);
            }
            Err(e) => {
                warn!("roof detection failed, falling back to manual outline: {e}");
                return (Vec::new(), None);
            }
        };
        if det.polygon_points.len() > limits::MAX_DETECTED_POINTS {
            warn!("roof detection returned {} points, ignoring", det.polygon_points.len());
            return (Vec::new(), None);
        }
        let (w, h) = self.config.canvas_size();
        let points = to_canvas_space(&det.polygon_points, w, h);
        if points.is_empty() {
            return (points, None);
        }
        let summary = DetectionSummary {
            point_count: points.len(),
            confidence: det.confidence,
            roof_type: det.roof_type,
            message: det.message,
        };
        (points, Some(summary))
    }

    /// Measurement, then cost, then (best effort) AI analysis.
    pub async fn calculate(&self) -> Result<Phase, FlowError> {
        let (phase, points) = self.with_state(|s| (s.phase, s.points.clone()));
        if phase != Phase::Drawing {
            return Err(FlowError::Validation("Outline the roof before calculating".to_string()));
        }
        if points.len() < MIN_POLYGON_POINTS {
            self.dispatch(Action::CalculateRejected(MIN_POINTS_MESSAGE.to_string()));
            return Err(FlowError::Validation(MIN_POINTS_MESSAGE.to_string()));
        }
        let token = self
            .begin(|token| Action::CalculateStarted { token })
            .ok_or(FlowError::Superseded)?;
        let (scale_factor, has_damage, address, user_notes) = self.with_state(|s| {
            (s.scale_factor, s.has_damage, s.display_address().to_string(), s.user_notes.clone())
        });
        debug!("request {}: measuring {} points", token.0, points.len());

        let req = MeasurementRequest {
            points,
            scale_factor,
            building_type: self.config.building_type.clone(),
        };
        let measured = self.backend.measure(&req).await;
        self.ensure_current(token)?;
        let measurement = match measured {
            Ok(m) => m,
            Err(e) => return Err(self.fail_calculation(token, e)),
        };
        let (area, pitch) = (measurement.area_sq_ft, measurement.estimated_pitch);
        self.dispatch(Action::MeasurementReady { token, measurement });

        let priced = self
            .backend
            .estimate_cost(&CostRequest { area_sq_ft: area, pitch_degrees: pitch, has_damage })
            .await;
        self.ensure_current(token)?;
        match priced {
            Ok(cost) => self.dispatch(Action::CostReady { token, cost }),
            Err(e) => return Err(self.fail_calculation(token, e)),
        };

        let req = AnalysisRequest { address, area_sq_ft: area, pitch_degrees: pitch, user_notes };
        let analysis = match self.backend.analyze(&req).await {
            Ok(a) if a.success => Some(a),
            Ok(a) => {
                warn!("AI analysis unavailable: {}", a.error.unwrap_or_default());
                None
            }
            Err(e) => {
                warn!("AI analysis failed: {e}");
                None
            }
        };
        self.ensure_current(token)?;
        self.dispatch(Action::CalculateFinished { token, analysis });
        Ok(self.with_state(|s| s.phase))
    }

    fn fail_calculation(&self, token: RequestToken, e: ApiError) -> FlowError {
        let message = describe("Calculation failed", &e);
        self.dispatch(Action::CalculateFailed { token, message: message.clone() });
        FlowError::Api { message, source: e }
    }

    pub async fn fetch_suggestions(&self, input: &str) -> Result<Vec<Suggestion>, ApiError> {
        let list = self.backend.suggestions(input).await?;
        if !list.success {
            return Err(ApiError::rejected(list.error, "Address suggestions unavailable"));
        }
        Ok(list.suggestions)
    }

    /// Post-debounce half of the autocomplete cycle: fetch for `ticket` if it
    /// is still current and hand the result back to the widget.
    pub async fn refresh_suggestions(&self, widget: &RefCell<Autocomplete>, ticket: Ticket) -> bool {
        let query = match widget.borrow().debounce_elapsed(ticket) {
            Some(q) => q,
            None => return false,
        };
        let result = self.fetch_suggestions(&query).await;
        widget.borrow_mut().receive(ticket, result)
    }

    pub async fn pricing_defaults(&self) -> Result<serde_json::Value, ApiError> {
        self.backend.pricing_defaults().await
    }

    pub async fn health(&self) -> Result<serde_json::Value, ApiError> {
        self.backend.health().await
    }
}

fn check_geocode(g: GeocodeResult) -> Result<GeocodeResult, ApiError> {
    if !g.success {
        return Err(ApiError::rejected(g.error, "Address not found"));
    }
    if !g.latitude.is_finite() || !g.longitude.is_finite() {
        return Err(ApiError::Decode("geocode returned non-finite coordinates".to_string()));
    }
    Ok(g)
}
