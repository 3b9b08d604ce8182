//! Open-Meteo forecast API client.
//!
//! One GET per region against `/v1/forecast`. Historical mode selects the
//! day-aggregate `daily` fields for an exact date; current mode selects the
//! instantaneous `current` fields in imperial units and converts them. An
//! empty daily series for the requested date degrades to the documented
//! normal-day fallback rather than failing the region.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::config::WeatherConfig;
use crate::geo::Region;
use crate::weather::{
    fahrenheit_to_celsius, inch_to_mm, mph_to_kmh, WeatherRecord, FALLBACK_RECORD,
};

/// Day-aggregate fields requested in historical mode.
const DAILY_FIELDS: &str = "temperature_2m_mean,temperature_2m_min,temperature_2m_max,\
precipitation_sum,snowfall_sum,wind_speed_10m_max,wind_direction_10m_dominant,pressure_msl_mean";

/// Instantaneous fields requested in current mode.
const CURRENT_FIELDS: &str =
    "temperature_2m,precipitation,snowfall,wind_speed_10m,wind_direction_10m,pressure_msl";

/// Seam between the aggregator and the upstream weather provider.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Canonical record for one region. `Some(date)` selects historical
    /// (day-aggregate) mode; `None` selects current conditions.
    async fn fetch_region(&self, region: &Region, date: Option<NaiveDate>)
        -> Result<WeatherRecord>;
}

pub struct OpenMeteoClient {
    client: reqwest::Client,
    base_url: String,
    timezone: String,
}

impl OpenMeteoClient {
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("roadrisk/0.1")
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timezone: config.timezone.clone(),
        })
    }

    async fn get_forecast(&self, query: &[(&str, String)]) -> Result<ForecastResponse> {
        let url = format!("{}/v1/forecast", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .context("Open-Meteo request failed")?
            .error_for_status()
            .context("Open-Meteo returned an error status")?;

        response
            .json()
            .await
            .context("Failed to parse Open-Meteo response")
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoClient {
    async fn fetch_region(
        &self,
        region: &Region,
        date: Option<NaiveDate>,
    ) -> Result<WeatherRecord> {
        let mut query = vec![
            ("latitude", format!("{:.6}", region.lat)),
            ("longitude", format!("{:.6}", region.lon)),
            ("timezone", self.timezone.clone()),
        ];

        match date {
            Some(day) => {
                let day = day.format("%Y-%m-%d").to_string();
                query.push(("daily", DAILY_FIELDS.to_string()));
                query.push(("start_date", day.clone()));
                query.push(("end_date", day));

                let response = self.get_forecast(&query).await?;
                let daily = response
                    .daily
                    .ok_or_else(|| anyhow!("response has no `daily` block"))?;
                Ok(normalize_daily(&daily, region.name))
            }
            None => {
                // The instantaneous endpoint is queried in imperial units and
                // converted; the daily endpoint already reports metric.
                query.push(("current", CURRENT_FIELDS.to_string()));
                query.push(("temperature_unit", "fahrenheit".to_string()));
                query.push(("wind_speed_unit", "mph".to_string()));
                query.push(("precipitation_unit", "inch".to_string()));

                let response = self.get_forecast(&query).await?;
                let current = response
                    .current
                    .ok_or_else(|| anyhow!("response has no `current` block"))?;
                Ok(normalize_current(&current))
            }
        }
    }
}

/// Normalize a day-aggregate block, degrading to the normal-day fallback
/// when the series for the requested date is empty or missing.
fn normalize_daily(daily: &DailyBlock, region: &str) -> WeatherRecord {
    let has_mean = daily
        .temperature_2m_mean
        .as_ref()
        .is_some_and(|v| !v.is_empty());
    if daily.time.is_empty() || !has_mean {
        tracing::warn!(region, "Empty daily series — using normal-day fallback record");
        return FALLBACK_RECORD;
    }

    let first = |series: &Option<Vec<f64>>| -> f64 {
        series.as_ref().and_then(|v| v.first().copied()).unwrap_or(0.0)
    };

    WeatherRecord {
        tavg: first(&daily.temperature_2m_mean),
        tmin: first(&daily.temperature_2m_min),
        tmax: first(&daily.temperature_2m_max),
        prcp: first(&daily.precipitation_sum),
        snow: first(&daily.snowfall_sum),
        wdir: first(&daily.wind_direction_10m_dominant),
        wspd: first(&daily.wind_speed_10m_max),
        pres: first(&daily.pressure_msl_mean),
    }
}

/// Map the imperial instantaneous shape onto the canonical record. The
/// current shape has no daily range, so min and max collapse to the
/// instantaneous temperature.
fn normalize_current(current: &CurrentBlock) -> WeatherRecord {
    let temp = fahrenheit_to_celsius(current.temperature_2m.unwrap_or(0.0));
    WeatherRecord {
        tavg: temp,
        tmin: temp,
        tmax: temp,
        prcp: inch_to_mm(current.precipitation.unwrap_or(0.0)),
        snow: inch_to_mm(current.snowfall.unwrap_or(0.0)),
        wdir: current.wind_direction_10m.unwrap_or(0.0),
        wspd: mph_to_kmh(current.wind_speed_10m.unwrap_or(0.0)),
        pres: current.pressure_msl.unwrap_or(0.0),
    }
}

// --- Open-Meteo response types ---

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    daily: Option<DailyBlock>,
    current: Option<CurrentBlock>,
}

#[derive(Debug, Default, Deserialize)]
struct DailyBlock {
    #[serde(default)]
    time: Vec<String>,
    temperature_2m_mean: Option<Vec<f64>>,
    temperature_2m_min: Option<Vec<f64>>,
    temperature_2m_max: Option<Vec<f64>>,
    precipitation_sum: Option<Vec<f64>>,
    snowfall_sum: Option<Vec<f64>>,
    wind_speed_10m_max: Option<Vec<f64>>,
    wind_direction_10m_dominant: Option<Vec<f64>>,
    pressure_msl_mean: Option<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    temperature_2m: Option<f64>,
    precipitation: Option<f64>,
    snowfall: Option<f64>,
    wind_speed_10m: Option<f64>,
    wind_direction_10m: Option<f64>,
    pressure_msl: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn full_daily() -> DailyBlock {
        DailyBlock {
            time: vec!["2024-03-14".to_string()],
            temperature_2m_mean: Some(vec![11.2]),
            temperature_2m_min: Some(vec![7.9]),
            temperature_2m_max: Some(vec![15.0]),
            precipitation_sum: Some(vec![1.4]),
            snowfall_sum: Some(vec![0.0]),
            wind_speed_10m_max: Some(vec![19.0]),
            wind_direction_10m_dominant: Some(vec![210.0]),
            pressure_msl_mean: Some(vec![1014.0]),
        }
    }

    #[test]
    fn test_normalize_daily_copies_series_heads() {
        let record = normalize_daily(&full_daily(), "Queens");
        assert_relative_eq!(record.tavg, 11.2);
        assert_relative_eq!(record.tmin, 7.9);
        assert_relative_eq!(record.tmax, 15.0);
        assert_relative_eq!(record.prcp, 1.4);
        assert_relative_eq!(record.wdir, 210.0);
        assert_relative_eq!(record.wspd, 19.0);
        assert_relative_eq!(record.pres, 1014.0);
    }

    #[test]
    fn test_empty_daily_series_falls_back() {
        let empty = DailyBlock::default();
        assert_eq!(normalize_daily(&empty, "Bronx"), FALLBACK_RECORD);

        let mut no_mean = full_daily();
        no_mean.temperature_2m_mean = Some(vec![]);
        assert_eq!(normalize_daily(&no_mean, "Bronx"), FALLBACK_RECORD);
    }

    #[test]
    fn test_missing_secondary_series_defaults_to_zero() {
        let mut daily = full_daily();
        daily.snowfall_sum = None;
        let record = normalize_daily(&daily, "Queens");
        assert_relative_eq!(record.snow, 0.0);
        assert_relative_eq!(record.tavg, 11.2);
    }

    #[test]
    fn test_normalize_current_converts_imperial() {
        let current = CurrentBlock {
            temperature_2m: Some(59.3),
            precipitation: Some(0.5),
            snowfall: Some(0.0),
            wind_speed_10m: Some(13.0),
            wind_direction_10m: Some(147.0),
            pressure_msl: Some(1018.0),
        };
        let record = normalize_current(&current);
        assert_relative_eq!(record.tavg, 15.166666, epsilon = 1e-5);
        assert_relative_eq!(record.tmin, record.tavg);
        assert_relative_eq!(record.tmax, record.tavg);
        assert_relative_eq!(record.prcp, 12.7);
        assert_relative_eq!(record.wspd, 20.921472, epsilon = 1e-6);
        assert_relative_eq!(record.wdir, 147.0);
        assert_relative_eq!(record.pres, 1018.0);
    }

    #[test]
    fn test_normalize_current_fills_absent_fields() {
        let current = CurrentBlock {
            temperature_2m: Some(50.0),
            precipitation: None,
            snowfall: None,
            wind_speed_10m: None,
            wind_direction_10m: None,
            pressure_msl: None,
        };
        let record = normalize_current(&current);
        assert_relative_eq!(record.tavg, 10.0);
        assert_relative_eq!(record.snow, 0.0);
        assert_relative_eq!(record.prcp, 0.0);
    }
}
