//! The classifier input contract.
//!
//! Column names and order are binding: the deployed artifact carries the
//! same `feature_names` list, and the scoring engine refuses an artifact
//! that disagrees with this schema instead of letting the contract drift
//! silently.

/// Fixed column order: 4 temporal, 6 weather, 3 spatial.
pub const FEATURE_COLUMNS: [&str; 13] = [
    "hour",
    "day_of_week",
    "month",
    "is_weekend",
    "tavg",
    "prcp",
    "snow",
    "wdir",
    "wspd",
    "pres",
    "lat",
    "lon",
    "landmark_id",
];

/// Sentinel landmark id for grids built without a landmark catalog.
pub const NO_LANDMARK: f64 = -1.0;

/// Row-major feature matrix; rows in grid-point order.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    pub columns: &'static [&'static str],
    pub rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }
}
