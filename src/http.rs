use gloo_net::http::{Request, Response};
use roofquote::backend::{paths, ApiError, Backend};
use roofquote::model::{
    AiAnalysis, AnalysisRequest, CostEstimate, CostRequest, DetectRequest, GeocodeRequest,
    GeocodeResult, Measurement, MeasurementRequest, RoofDetection, SatelliteImage,
    SatelliteRequest, SuggestionList,
};
use roofquote::Config;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// [`Backend`] over `fetch`, rooted at `Config::api_base_url`.
pub struct HttpBackend {
    config: Config,
}

fn transport(e: gloo_net::Error) -> ApiError {
    ApiError::Transport(e.to_string())
}

async fn read<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    if !resp.ok() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(ApiError::Status { status, body: body.trim().to_string() });
    }
    let text = resp.text().await.map_err(transport)?;
    serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
}

impl HttpBackend {
    pub fn new(config: Config) -> HttpBackend {
        HttpBackend { config }
    }

    async fn post<Req: Serialize, T: DeserializeOwned>(&self, path: &str, body: &Req) -> Result<T, ApiError> {
        let url = self.config.endpoint(path);
        log::debug!("POST {url}");
        let resp = Request::post(&url).json(body).map_err(transport)?.send().await.map_err(transport)?;
        read(resp).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T, ApiError> {
        let url = self.config.endpoint(path);
        log::debug!("GET {url}");
        let resp = Request::get(&url)
            .query(query.iter().copied())
            .send()
            .await
            .map_err(transport)?;
        read(resp).await
    }
}

impl Backend for HttpBackend {
    async fn geocode(&self, req: &GeocodeRequest) -> Result<GeocodeResult, ApiError> {
        self.post(paths::GEOCODE, req).await
    }
    async fn satellite_image(&self, req: &SatelliteRequest) -> Result<SatelliteImage, ApiError> {
        self.post(paths::SATELLITE_IMAGE, req).await
    }
    async fn detect_roof(&self, req: &DetectRequest) -> Result<RoofDetection, ApiError> {
        self.post(paths::ROOF_DETECT, req).await
    }
    async fn measure(&self, req: &MeasurementRequest) -> Result<Measurement, ApiError> {
        self.post(paths::MEASUREMENT, req).await
    }
    async fn estimate_cost(&self, req: &CostRequest) -> Result<CostEstimate, ApiError> {
        self.post(paths::ESTIMATE_COST, req).await
    }
    async fn analyze(&self, req: &AnalysisRequest) -> Result<AiAnalysis, ApiError> {
        self.post(paths::AI_ANALYZE, req).await
    }
    async fn suggestions(&self, input: &str) -> Result<SuggestionList, ApiError> {
        self.get(paths::SUGGESTIONS, &[("input", input)]).await
    }
    async fn pricing_defaults(&self) -> Result<serde_json::Value, ApiError> {
        self.get(paths::PRICING_DEFAULTS, &[]).await
    }
    async fn health(&self) -> Result<serde_json::Value, ApiError> {
        self.get(paths::HEALTH, &[]).await
    }
}
