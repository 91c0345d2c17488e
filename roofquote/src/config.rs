use crate::geometry::limits;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub satellite_zoom: u8,
    /// Feet per canvas pixel, forwarded to the measurement endpoint.
    pub scale_factor: f64,
    pub building_type: String,
    pub debounce_ms: u32,
    pub min_query_chars: usize,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            api_base_url: option_env!("ROOFQUOTE_API_URL").unwrap_or(DEFAULT_API_URL).to_string(),
            canvas_width: 800,
            canvas_height: 600,
            satellite_zoom: 20,
            scale_factor: 0.3,
            building_type: "residential".to_string(),
            debounce_ms: 300,
            min_query_chars: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("api_base_url must be an http(s) URL, got '{0}'")]
    BaseUrl(String),
    #[error("parameter '{param}' out of range ({min}..={max}), got {got}")]
    OutOfRange { param: &'static str, min: f64, max: f64, got: f64 },
    #[error("building_type must not be empty")]
    BuildingType,
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::BaseUrl(_) | ConfigError::BuildingType => "invalid_config",
            ConfigError::OutOfRange { .. } => "out_of_range",
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api_base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::BaseUrl(self.api_base_url.clone()));
        }
        for (param, v) in [("canvas_width", self.canvas_width), ("canvas_height", self.canvas_height)] {
            if !limits::in_canvas_bounds(v) {
                return Err(ConfigError::OutOfRange {
                    param,
                    min: limits::CANVAS_MIN as f64,
                    max: limits::CANVAS_MAX as f64,
                    got: v as f64,
                });
            }
        }
        if !limits::in_zoom_bounds(self.satellite_zoom) {
            return Err(ConfigError::OutOfRange {
                param: "satellite_zoom",
                min: limits::ZOOM_MIN as f64,
                max: limits::ZOOM_MAX as f64,
                got: self.satellite_zoom as f64,
            });
        }
        if !limits::in_scale_bounds(self.scale_factor) {
            return Err(ConfigError::OutOfRange {
                param: "scale_factor",
                min: 0.0,
                max: limits::SCALE_FACTOR_MAX,
                got: self.scale_factor,
            });
        }
        if self.debounce_ms > limits::DEBOUNCE_MAX_MS {
            return Err(ConfigError::OutOfRange {
                param: "debounce_ms",
                min: 0.0,
                max: limits::DEBOUNCE_MAX_MS as f64,
                got: self.debounce_ms as f64,
            });
        }
        if self.building_type.trim().is_empty() {
            return Err(ConfigError::BuildingType);
        }
        Ok(())
    }

    /// Joins the base URL and an absolute endpoint path.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url.trim().trim_end_matches('/'), path.trim_start_matches('/'))
    }

    pub fn canvas_size(&self) -> (f64, f64) {
        (self.canvas_width as f64, self.canvas_height as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let c = Config::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.canvas_size(), (800.0, 600.0));
        assert_eq!(c.debounce_ms, 300);
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let c = Config { api_base_url: "https://api.example.com/".into(), ..Config::default() };
        assert_eq!(c.endpoint("/api/v1/address/geocode"), "https://api.example.com/api/v1/address/geocode");
    }

    #[test]
    fn partial_json_fills_defaults() {
        let c: Config = serde_json::from_str(r#"{"canvas_width": 1024}"#).unwrap();
        assert_eq!(c.canvas_width, 1024);
        assert_eq!(c.canvas_height, 600);
        assert_eq!(c.building_type, "residential");
    }

    #[test]
    fn rejects_bad_values() {
        let c = Config { satellite_zoom: 0, ..Config::default() };
        assert_eq!(c.validate().unwrap_err().code(), "out_of_range");
        let c = Config { api_base_url: "ftp://x".into(), ..Config::default() };
        assert_eq!(c.validate().unwrap_err().code(), "invalid_config");
        let c = Config { scale_factor: f64::NAN, ..Config::default() };
        assert!(c.validate().is_err());
        let c = Config { debounce_ms: u32::MAX, ..Config::default() };
        assert_eq!(
            c.validate(),
            Err(ConfigError::OutOfRange { param: "debounce_ms", min: 0.0, max: 10_000.0, got: u32::MAX as f64 })
        );
    }
}
