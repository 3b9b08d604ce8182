//! Concurrent per-region weather acquisition.
//!
//! One task per tracked region, so total wait is bounded by the slowest
//! call rather than the sum. Per-region transport or parse errors are
//! caught and collected; a single failed region fails the whole call with
//! an aggregate error naming every failure. No partial weather leaves this
//! module.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::error::PipelineError;
use crate::geo::REGIONS;
use crate::weather::openmeteo::WeatherProvider;
use crate::weather::{WeatherFailure, WeatherRecord};

/// Region name → canonical record, complete over all tracked regions.
pub type RegionWeather = HashMap<String, WeatherRecord>;

/// Fetch weather for every tracked region concurrently.
///
/// `Some(date)` selects historical mode, `None` current conditions. Returns
/// `Ok` only when every region produced a usable record.
pub async fn fetch_all_regions(
    provider: Arc<dyn WeatherProvider>,
    date: Option<NaiveDate>,
) -> Result<RegionWeather, PipelineError> {
    let mut handles = Vec::with_capacity(REGIONS.len());
    for region in REGIONS {
        let provider = Arc::clone(&provider);
        let handle = tokio::spawn(async move { provider.fetch_region(region, date).await });
        handles.push((region.name, handle));
    }

    let mut weather = RegionWeather::with_capacity(REGIONS.len());
    let mut failures = Vec::new();
    for (name, handle) in handles {
        match handle.await {
            Ok(Ok(record)) => {
                weather.insert(name.to_string(), record);
            }
            Ok(Err(e)) => {
                warn!(region = name, error = %e, "Region weather fetch failed");
                failures.push(WeatherFailure {
                    region: name.to_string(),
                    reason: e.to_string(),
                });
            }
            Err(e) => {
                warn!(region = name, error = %e, "Region weather task aborted");
                failures.push(WeatherFailure {
                    region: name.to_string(),
                    reason: format!("task aborted: {e}"),
                });
            }
        }
    }

    if !failures.is_empty() {
        return Err(PipelineError::WeatherUnavailable(failures));
    }

    debug!(
        regions = weather.len(),
        historical = date.is_some(),
        "Weather fetched for all regions"
    );
    Ok(weather)
}
