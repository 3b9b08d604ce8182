//! Static landmark (street intersection) catalog.
//!
//! Loaded once at startup from a JSON array of `{id, lat, lon}` entries and
//! read-only afterwards. Nearest-landmark lookup uses true great-circle
//! distance.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::geo::{nearest_index, DistanceMetric};

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Landmark {
    pub id: i64,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone)]
pub struct LandmarkCatalog {
    landmarks: Vec<Landmark>,
}

impl LandmarkCatalog {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read landmark catalog: {}", path.display()))?;
        let landmarks: Vec<Landmark> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse landmark catalog: {}", path.display()))?;

        tracing::info!(path = %path.display(), landmarks = landmarks.len(), "Landmark catalog loaded");
        Ok(Self { landmarks })
    }

    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    /// Id of the landmark closest to the coordinate, by great-circle distance.
    pub fn nearest_id(&self, lat: f64, lon: f64) -> Option<i64> {
        nearest_index(&self.landmarks, lat, lon, DistanceMetric::Haversine, |l| {
            (l.lat, l.lon)
        })
        .map(|i| self.landmarks[i].id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_catalog(entries: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(entries.as_bytes()).expect("write");
        file
    }

    #[test]
    fn test_load_and_nearest() {
        let file = write_catalog(
            r#"[
                {"id": 1, "lat": 40.75, "lon": -73.99},
                {"id": 2, "lat": 40.65, "lon": -73.95}
            ]"#,
        );
        let catalog = LandmarkCatalog::load(file.path()).expect("should load");
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.nearest_id(40.76, -73.98), Some(1));
        assert_eq!(catalog.nearest_id(40.64, -73.94), Some(2));
    }

    #[test]
    fn test_empty_catalog_has_no_nearest() {
        let file = write_catalog("[]");
        let catalog = LandmarkCatalog::load(file.path()).expect("should load");
        assert!(catalog.is_empty());
        assert_eq!(catalog.nearest_id(40.7, -74.0), None);
    }

    #[test]
    fn test_malformed_catalog_is_an_error() {
        let file = write_catalog("{\"not\": \"an array\"}");
        assert!(LandmarkCatalog::load(file.path()).is_err());
    }
}
