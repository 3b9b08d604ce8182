//! Canonical weather records and unit conversions.
//!
//! The upstream provider exposes two shapes: an instantaneous `current`
//! block (queried in imperial units) and a day-aggregate `daily` block
//! (queried in the API's metric defaults, matching the units the classifier
//! was trained on). Both normalize into [`WeatherRecord`] before leaving the
//! weather module, so downstream code never sees mixed units.

pub mod aggregator;
pub mod openmeteo;

use serde::{Deserialize, Serialize};

/// Per-region weather snapshot in canonical metric units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    /// Mean temperature, °C.
    pub tavg: f64,
    /// Minimum temperature, °C.
    pub tmin: f64,
    /// Maximum temperature, °C.
    pub tmax: f64,
    /// Precipitation, mm.
    pub prcp: f64,
    /// Snowfall, mm.
    pub snow: f64,
    /// Dominant wind direction, degrees.
    pub wdir: f64,
    /// Wind speed, km/h.
    pub wspd: f64,
    /// Mean sea-level pressure, hPa.
    pub pres: f64,
}

/// Substituted when the historical endpoint has no daily series for the
/// requested date: a mild, dry day with a light southerly wind.
pub const FALLBACK_RECORD: WeatherRecord = WeatherRecord {
    tavg: 15.5,
    tmin: 10.0,
    tmax: 21.0,
    prcp: 0.0,
    snow: 0.0,
    wdir: 180.0,
    wspd: 16.0,
    pres: 1010.0,
};

/// Terminal fetch failure for a single region.
#[derive(Debug, Clone)]
pub struct WeatherFailure {
    pub region: String,
    pub reason: String,
}

pub fn fahrenheit_to_celsius(deg_f: f64) -> f64 {
    (deg_f - 32.0) * 5.0 / 9.0
}

pub fn inch_to_mm(inches: f64) -> f64 {
    inches * 25.4
}

pub fn mph_to_kmh(mph: f64) -> f64 {
    mph * 1.609344
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fahrenheit_to_celsius() {
        assert_relative_eq!(fahrenheit_to_celsius(32.0), 0.0);
        assert_relative_eq!(fahrenheit_to_celsius(212.0), 100.0);
        assert_relative_eq!(fahrenheit_to_celsius(59.3), 15.166666, epsilon = 1e-5);
    }

    #[test]
    fn test_inch_to_mm() {
        assert_relative_eq!(inch_to_mm(1.0), 25.4);
        assert_relative_eq!(inch_to_mm(0.0), 0.0);
    }

    #[test]
    fn test_mph_to_kmh() {
        assert_relative_eq!(mph_to_kmh(10.0), 16.09344);
    }

    /// The same physical conditions reported by the imperial current shape
    /// and the metric historical shape must agree once canonical.
    #[test]
    fn test_imperial_and_metric_inputs_agree_in_canonical_units() {
        // 59.3 °F == 15.1667 °C, 0.5 in == 12.7 mm, 13.0 mph == 20.92 km/h
        assert_relative_eq!(fahrenheit_to_celsius(59.3), 15.1666667, epsilon = 1e-6);
        assert_relative_eq!(inch_to_mm(0.5), 12.7, epsilon = 1e-9);
        assert_relative_eq!(mph_to_kmh(13.0), 20.921472, epsilon = 1e-6);
    }
}
