//! Per-request orchestration.
//!
//! `ParseTimestamp → FetchWeather → SampleGrid → BuildFeatures → Score →
//! AssemblePredictions`. Weather acquisition is all-or-nothing; everything
//! after it is synchronous and order-preserving. The grid universe and the
//! classifier are built once at startup and shared read-only across
//! requests; all per-request state is local to one call.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use tracing::{info, instrument};

use crate::config::AppConfig;
use crate::error::PipelineError;
use crate::features::builder::build_features;
use crate::features::schema::FEATURE_COLUMNS;
use crate::geo::grid::{build_grid, GridPoint};
use crate::geo::sampler::sample_points;
use crate::scoring::calibration::calibrate;
use crate::scoring::model::{load_classifier, Classifier};
use crate::weather::aggregator::{fetch_all_regions, RegionWeather};
use crate::weather::openmeteo::{OpenMeteoClient, WeatherProvider};

#[derive(Debug, Clone, Serialize)]
pub struct PredictionResult {
    pub lat: f64,
    pub lon: f64,
    pub region: String,
    pub probability: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictionResponse {
    pub date: String,
    pub predictions: Vec<PredictionResult>,
}

pub struct Pipeline {
    config: AppConfig,
    grid: Arc<Vec<GridPoint>>,
    provider: Arc<dyn WeatherProvider>,
    classifier: Box<dyn Classifier>,
}

impl Pipeline {
    /// Build the process-wide immutable state: grid universe, weather
    /// client and classifier. Called once at startup.
    pub fn new(config: AppConfig) -> Result<Self> {
        let provider = Arc::new(OpenMeteoClient::new(&config.weather)?);
        Self::with_provider(config, provider)
    }

    /// Same as [`Pipeline::new`] with an injected weather provider.
    pub fn with_provider(config: AppConfig, provider: Arc<dyn WeatherProvider>) -> Result<Self> {
        let grid = build_grid(&config.grid)?;
        info!(points = grid.len(), mode = ?config.grid.mode, "Grid universe built");

        let classifier = load_classifier(Path::new(&config.model.artifact_path), &FEATURE_COLUMNS);

        Ok(Self {
            config,
            grid: Arc::new(grid),
            provider,
            classifier,
        })
    }

    /// One calibrated accident probability per sampled grid point for the
    /// given date, in sampled grid order, with the date echoed back.
    #[instrument(skip(self))]
    pub async fn predict(&self, date: &str) -> Result<PredictionResponse, PipelineError> {
        let (day, timestamp) = parse_timestamp(date)?;

        let weather = fetch_all_regions(Arc::clone(&self.provider), Some(day)).await?;
        let points = sample_points(&self.grid, &self.config.sampler);
        let features = build_features(&points, timestamp, &weather)?;

        let raw = self.classifier.predict_proba(&features)?;
        let probabilities = if self.config.model.calibrate {
            calibrate(&raw)
        } else {
            raw
        };

        let predictions = points
            .iter()
            .zip(probabilities)
            .map(|(point, probability)| PredictionResult {
                lat: point.lat,
                lon: point.lon,
                region: point.region.to_string(),
                probability,
            })
            .collect();

        info!(
            date,
            points = points.len(),
            model = self.classifier.name(),
            fallback_model = self.classifier.is_fallback(),
            "Prediction batch complete"
        );

        Ok(PredictionResponse {
            date: date.to_string(),
            predictions,
        })
    }

    /// Live canonical weather for every tracked region.
    #[instrument(skip(self))]
    pub async fn current_weather(&self, timestamp: &str) -> Result<RegionWeather, PipelineError> {
        parse_timestamp(timestamp)?;
        fetch_all_regions(Arc::clone(&self.provider), None).await
    }

    pub fn grid_size(&self) -> usize {
        self.grid.len()
    }
}

/// Accepts `YYYY-MM-DD` or an ISO-8601 date-time; a bare date means
/// midnight.
fn parse_timestamp(raw: &str) -> Result<(NaiveDate, NaiveDateTime), PipelineError> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok((dt.date(), dt));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M") {
        return Ok((dt.date(), dt));
    }
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok((day, day.and_time(NaiveTime::MIN)));
    }
    Err(PipelineError::InvalidTimestamp(raw.to_string()))
}
