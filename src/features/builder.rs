//! Feature vector assembly.
//!
//! Merges timestamp-derived temporal fields, per-region weather fields and
//! per-point spatial fields into one fixed-order row per sampled grid
//! point. Input point order is preserved into the output rows and carries
//! through to the final prediction sequence.

use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::error::PipelineError;
use crate::features::schema::{FeatureMatrix, FEATURE_COLUMNS, NO_LANDMARK};
use crate::geo::grid::GridPoint;
use crate::weather::aggregator::RegionWeather;

/// Pure functions of the request timestamp. Monday = 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemporalFeatures {
    pub hour: u32,
    pub day_of_week: u32,
    pub month: u32,
    pub is_weekend: bool,
}

pub fn temporal_features(timestamp: NaiveDateTime) -> TemporalFeatures {
    let day_of_week = timestamp.weekday().num_days_from_monday();
    TemporalFeatures {
        hour: timestamp.hour(),
        day_of_week,
        month: timestamp.month(),
        is_weekend: day_of_week >= 5,
    }
}

/// One row per point in `FEATURE_COLUMNS` order.
///
/// A point whose region is missing from the weather map is a broken
/// invariant (the aggregator fails fast on incomplete weather), so it is an
/// error here, never a silent default.
pub fn build_features(
    points: &[GridPoint],
    timestamp: NaiveDateTime,
    weather: &RegionWeather,
) -> Result<FeatureMatrix, PipelineError> {
    let temporal = temporal_features(timestamp);

    let mut rows = Vec::with_capacity(points.len());
    for point in points {
        let record = weather.get(point.region).ok_or_else(|| {
            PipelineError::FeatureContractViolation(format!(
                "region {:?} missing from weather map",
                point.region
            ))
        })?;

        rows.push(vec![
            f64::from(temporal.hour),
            f64::from(temporal.day_of_week),
            f64::from(temporal.month),
            if temporal.is_weekend { 1.0 } else { 0.0 },
            record.tavg,
            record.prcp,
            record.snow,
            record.wdir,
            record.wspd,
            record.pres,
            point.lat,
            point.lon,
            point.landmark_id.map_or(NO_LANDMARK, |id| id as f64),
        ]);
    }

    Ok(FeatureMatrix {
        columns: &FEATURE_COLUMNS,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::FALLBACK_RECORD;
    use chrono::NaiveDate;

    fn ts(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn point(lat: f64, lon: f64, region: &'static str, landmark_id: Option<i64>) -> GridPoint {
        GridPoint { lat, lon, region, landmark_id }
    }

    #[test]
    fn test_temporal_features_weekday() {
        // 2024-03-14 is a Thursday.
        let t = temporal_features(ts(2024, 3, 14, 9));
        assert_eq!(t.hour, 9);
        assert_eq!(t.day_of_week, 3);
        assert_eq!(t.month, 3);
        assert!(!t.is_weekend);
    }

    #[test]
    fn test_temporal_features_weekend() {
        // 2024-03-16 is a Saturday, 2024-03-17 a Sunday.
        assert!(temporal_features(ts(2024, 3, 16, 0)).is_weekend);
        assert!(temporal_features(ts(2024, 3, 17, 23)).is_weekend);
        assert!(!temporal_features(ts(2024, 3, 15, 12)).is_weekend);
    }

    #[test]
    fn test_rows_follow_schema_and_input_order() {
        let mut weather = RegionWeather::new();
        weather.insert("Queens".to_string(), FALLBACK_RECORD);
        weather.insert("Bronx".to_string(), FALLBACK_RECORD);

        let points = [
            point(40.5, -73.7, "Queens", Some(42)),
            point(40.8, -73.9, "Bronx", None),
        ];
        let matrix = build_features(&points, ts(2024, 3, 14, 12), &weather).unwrap();

        assert_eq!(matrix.n_rows(), 2);
        assert_eq!(matrix.n_cols(), FEATURE_COLUMNS.len());

        let first = &matrix.rows[0];
        assert_eq!(first[0], 12.0); // hour
        assert_eq!(first[3], 0.0); // is_weekend
        assert_eq!(first[4], FALLBACK_RECORD.tavg);
        assert_eq!(first[10], 40.5); // lat passes through verbatim
        assert_eq!(first[11], -73.7);
        assert_eq!(first[12], 42.0);

        let second = &matrix.rows[1];
        assert_eq!(second[10], 40.8);
        assert_eq!(second[12], NO_LANDMARK);
    }

    #[test]
    fn test_missing_region_is_a_contract_violation() {
        let weather = RegionWeather::new();
        let points = [point(40.5, -73.7, "Queens", None)];
        let err = build_features(&points, ts(2024, 3, 14, 12), &weather).unwrap_err();
        assert!(matches!(err, PipelineError::FeatureContractViolation(_)));
        assert!(err.to_string().contains("Queens"));
    }
}
