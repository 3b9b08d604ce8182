use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub weather: WeatherConfig,
    pub grid: GridConfig,
    pub sampler: SamplerConfig,
    pub model: ModelConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherConfig {
    /// Open-Meteo base URL; overridden in tests to point at a mock server.
    pub base_url: String,
    /// Per-request timeout for each regional call.
    pub timeout_seconds: u64,
    pub timezone: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridMode {
    /// Rasterize the city bounding box at a fixed resolution.
    Procedural,
    /// Use the pre-computed landmark catalog as the candidate universe.
    Enriched,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GridConfig {
    pub mode: GridMode,
    /// Grid spacing in degrees (0.01 is roughly 1 km at this latitude).
    pub resolution_deg: f64,
    /// Landmark catalog JSON. Required in enriched mode; in procedural mode
    /// it only adds nearest-landmark enrichment when present.
    pub landmarks_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SamplerConfig {
    /// How many grid points each request scores.
    pub size: usize,
    pub seed: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    pub artifact_path: String,
    /// Apply the batch-relative rank calibration to raw scores.
    pub calibrate: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    pub log_level: String,
}

impl AppConfig {
    /// Load configuration from config/default.toml, overlaying environment
    /// variables from .env if present.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("config/default.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        dotenvy::dotenv().ok();

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
    }
}
