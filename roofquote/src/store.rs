use crate::config::Config;
use crate::model::{AiAnalysis, CostEstimate, GeocodeResult, Measurement, Point};
use serde::Serialize;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    AddressEntry,
    Drawing,
    /// Drawing, with roof detection still in flight.
    AiDetecting,
    Results,
}

impl Phase {
    pub fn is_drawing(self) -> bool {
        matches!(self, Phase::Drawing | Phase::AiDetecting)
    }
}

/// Identifies one orchestrated chain. Only the latest token's actions apply.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RequestToken(pub u64);

impl RequestToken {
    pub fn next(self) -> RequestToken {
        RequestToken(self.0.wrapping_add(1))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DetectionSummary {
    pub point_count: usize,
    pub confidence: f64,
    pub roof_type: Option<String>,
    pub message: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct State {
    pub phase: Phase,
    pub address: String,
    pub geocode: Option<GeocodeResult>,
    #[serde(skip)]
    pub image_base64: Option<Rc<str>>,
    pub image_error: Option<String>,
    pub detection: Option<DetectionSummary>,
    pub points: Vec<Point>,
    pub scale_factor: f64,
    pub has_damage: bool,
    pub user_notes: Option<String>,
    pub measurement: Option<Measurement>,
    pub cost: Option<CostEstimate>,
    pub analysis: Option<AiAnalysis>,
    pub loading: bool,
    pub error: Option<String>,
    pub latest: RequestToken,
}

impl State {
    pub fn initial(config: &Config) -> State {
        State::with_scale_factor(config.scale_factor)
    }

    fn with_scale_factor(scale_factor: f64) -> State {
        State {
            phase: Phase::AddressEntry,
            address: String::new(),
            geocode: None,
            image_base64: None,
            image_error: None,
            detection: None,
            points: Vec::new(),
            scale_factor,
            has_damage: false,
            user_notes: None,
            measurement: None,
            cost: None,
            analysis: None,
            loading: false,
            error: None,
            latest: RequestToken::default(),
        }
    }

    pub fn show_results(&self) -> bool {
        self.phase == Phase::Results
    }

    pub fn can_calculate(&self) -> bool {
        self.phase == Phase::Drawing && self.points.len() >= MIN_POLYGON_POINTS && !self.loading
    }

    /// Address shown in headers and sent to AI analysis.
    pub fn display_address(&self) -> &str {
        match &self.geocode {
            Some(g) if !g.formatted_address.is_empty() => &g.formatted_address,
            _ => &self.address,
        }
    }

    /// Placeholder text for the canvas while no image is drawn.
    pub fn canvas_status(&self) -> &'static str {
        if self.image_error.is_some() {
            IMAGE_UNAVAILABLE
        } else if self.phase == Phase::AiDetecting {
            "Detecting roof outline..."
        } else if self.loading && self.phase == Phase::AddressEntry {
            "Loading satellite image..."
        } else {
            "Satellite view will appear here"
        }
    }

    /// Like [`State::canvas_status`], for a surface whose copy of the image
    /// failed to decode.
    pub fn placeholder_status(&self, image_broken: bool) -> &'static str {
        if image_broken && self.image_base64.is_some() {
            IMAGE_UNAVAILABLE
        } else {
            self.canvas_status()
        }
    }

    // A calculation in flight measured the polygon before this edit
    fn invalidate_calculation(&mut self) {
        if self.loading {
            self.latest = self.latest.next();
            self.loading = false;
        }
    }

    fn clear_results(&mut self) {
        self.measurement = None;
        self.cost = None;
        self.analysis = None;
    }

    // Settings survive; the token advances so in-flight chains go stale
    fn reset_to_start(&mut self) {
        *self = State {
            has_damage: self.has_damage,
            latest: self.latest.next(),
            ..State::with_scale_factor(self.scale_factor)
        };
    }
}

pub const MIN_POLYGON_POINTS: usize = 3;

pub const IMAGE_UNAVAILABLE: &str = "Satellite image unavailable - draw the roof outline manually";

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    SetAddress(String),
    SetHasDamage(bool),
    SetUserNotes(Option<String>),
    SetScaleFactor(f64),

    SubmitStarted { token: RequestToken, address: String },
    GeocodeSucceeded { token: RequestToken, result: GeocodeResult },
    GeocodeFailed { token: RequestToken, message: String },
    ImageLoaded { token: RequestToken, image_base64: Rc<str> },
    ImageFailed { token: RequestToken, message: String },
    DetectionFinished { token: RequestToken, points: Vec<Point>, summary: Option<DetectionSummary> },

    PointAdded(Point),
    PointMoved { index: usize, point: Point },
    /// Clears the polygon and results; from `Results` this is a full reset.
    Clear,
    Reset,

    CalculateRejected(String),
    CalculateStarted { token: RequestToken },
    MeasurementReady { token: RequestToken, measurement: Measurement },
    CostReady { token: RequestToken, cost: CostEstimate },
    CalculateFinished { token: RequestToken, analysis: Option<AiAnalysis> },
    CalculateFailed { token: RequestToken, message: String },
}

impl Action {
    fn token(&self) -> Option<RequestToken> {
        match self {
            Action::GeocodeSucceeded { token, .. }
            | Action::GeocodeFailed { token, .. }
            | Action::ImageLoaded { token, .. }
            | Action::ImageFailed { token, .. }
            | Action::DetectionFinished { token, .. }
            | Action::MeasurementReady { token, .. }
            | Action::CostReady { token, .. }
            | Action::CalculateFinished { token, .. }
            | Action::CalculateFailed { token, .. } => Some(*token),
            _ => None,
        }
    }
}

/// Applies `action` in place. Returns false (leaving `s` untouched) when the
/// action is stale or not valid in the current phase.
pub fn apply(s: &mut State, action: Action) -> bool {
    if let Some(token) = action.token() {
        if token != s.latest {
            return false;
        }
    }
    match action {
        Action::SetAddress(address) => {
            if s.address == address {
                return false;
            }
            s.address = address;
        }
        Action::SetHasDamage(v) => s.has_damage = v,
        Action::SetUserNotes(notes) => s.user_notes = notes.filter(|n| !n.trim().is_empty()),
        Action::SetScaleFactor(f) => {
            if !crate::geometry::limits::in_scale_bounds(f) {
                return false;
            }
            s.scale_factor = f;
        }

        Action::SubmitStarted { token, address } => {
            if token <= s.latest {
                return false;
            }
            s.latest = token;
            s.phase = Phase::AddressEntry;
            s.address = address;
            s.geocode = None;
            s.image_base64 = None;
            s.image_error = None;
            s.detection = None;
            s.points.clear();
            s.clear_results();
            s.loading = true;
            s.error = None;
        }
        Action::GeocodeSucceeded { result, .. } => s.geocode = Some(result),
        Action::GeocodeFailed { message, .. } => {
            s.phase = Phase::AddressEntry;
            s.geocode = None;
            s.loading = false;
            s.error = Some(message);
        }
        Action::ImageLoaded { image_base64, .. } => {
            s.image_base64 = Some(image_base64);
            s.image_error = None;
            s.phase = Phase::AiDetecting;
        }
        Action::ImageFailed { message, .. } => {
            s.image_base64 = None;
            s.image_error = Some(message.clone());
            s.error = Some(message);
            s.phase = Phase::Drawing;
            s.loading = false;
        }
        Action::DetectionFinished { points, summary, .. } => {
            if s.phase != Phase::AiDetecting {
                return false;
            }
            if s.points.is_empty() {
                s.points = points;
            }
            s.detection = summary;
            s.phase = Phase::Drawing;
            s.loading = false;
        }

        Action::PointAdded(p) => {
            if s.phase != Phase::Drawing || !p.is_finite() {
                return false;
            }
            s.points.push(p);
            s.invalidate_calculation();
        }
        Action::PointMoved { index, point } => {
            if s.phase != Phase::Drawing || !point.is_finite() {
                return false;
            }
            match s.points.get_mut(index) {
                Some(slot) => *slot = point,
                None => return false,
            }
            s.invalidate_calculation();
        }
        Action::Clear => {
            if s.phase == Phase::Results {
                s.reset_to_start();
                return true;
            }
            // In-flight calculations belong to the old polygon
            s.latest = s.latest.next();
            s.points.clear();
            s.clear_results();
            s.loading = false;
            s.error = None;
            if s.phase == Phase::AiDetecting {
                s.phase = Phase::Drawing;
            }
        }
        Action::Reset => s.reset_to_start(),

        Action::CalculateRejected(message) => {
            s.loading = false;
            s.error = Some(message);
        }
        Action::CalculateStarted { token } => {
            if token <= s.latest || s.phase != Phase::Drawing {
                return false;
            }
            s.latest = token;
            s.clear_results();
            s.loading = true;
            s.error = None;
        }
        Action::MeasurementReady { measurement, .. } => s.measurement = Some(measurement),
        Action::CostReady { cost, .. } => s.cost = Some(cost),
        Action::CalculateFinished { analysis, .. } => {
            if s.measurement.is_none() || s.cost.is_none() {
                return false;
            }
            s.analysis = analysis;
            s.phase = Phase::Results;
            s.loading = false;
        }
        Action::CalculateFailed { message, .. } => {
            s.clear_results();
            s.phase = Phase::Drawing;
            s.loading = false;
            s.error = Some(message);
        }
    }
    true
}

/// Pure reducer: the state after `action`.
pub fn reduce(state: &State, action: Action) -> State {
    let mut next = state.clone();
    if apply(&mut next, action) {
        next
    } else {
        state.clone()
    }
}

#[derive(Clone, Debug)]
pub struct Store {
    state: State,
}

impl Store {
    pub fn new(config: &Config) -> Store {
        Store { state: State::initial(config) }
    }
    pub fn state(&self) -> &State {
        &self.state
    }
    /// Token for the next orchestrated chain.
    pub fn issue_token(&self) -> RequestToken {
        self.state.latest.next()
    }
    pub fn is_current(&self, token: RequestToken) -> bool {
        self.state.latest == token
    }
    pub fn dispatch(&mut self, action: Action) -> bool {
        let mut next = self.state.clone();
        if !apply(&mut next, action) {
            return false;
        }
        self.state = next;
        true
    }
}
