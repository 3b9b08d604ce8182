//! Candidate grid construction.
//!
//! The grid universe is built once per process and shared read-only. Two
//! interchangeable modes: procedural rasterization of the city bounding box,
//! and the landmark catalog itself as the candidate set. Either way a point
//! carries `(lat, lon, region)` plus an optional nearest-landmark id.

use std::path::Path;

use anyhow::{bail, Result};

use crate::config::{GridConfig, GridMode};
use crate::geo::landmarks::LandmarkCatalog;
use crate::geo::{nearest_region, DistanceMetric};

/// City bounding box: north of Staten Island's southern tip to above the
/// Bronx, west of Staten Island to beyond Queens.
#[derive(Debug, Clone, Copy)]
pub struct Bounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

pub const NYC_BOUNDS: Bounds = Bounds {
    north: 40.91553,
    south: 40.49612,
    east: -73.70018,
    west: -74.25909,
};

/// One candidate coordinate to score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPoint {
    pub lat: f64,
    pub lon: f64,
    pub region: &'static str,
    pub landmark_id: Option<i64>,
}

/// Build the full candidate universe per the configured mode.
pub fn build_grid(config: &GridConfig) -> Result<Vec<GridPoint>> {
    let catalog = match &config.landmarks_path {
        Some(path) => Some(LandmarkCatalog::load(Path::new(path))?),
        None => None,
    };

    match config.mode {
        GridMode::Procedural => Ok(procedural_grid(
            &NYC_BOUNDS,
            config.resolution_deg,
            catalog.as_ref(),
        )),
        GridMode::Enriched => {
            let Some(catalog) = catalog else {
                bail!("enriched grid mode requires grid.landmarks_path");
            };
            Ok(enriched_grid(&catalog))
        }
    }
}

/// Rasterize `bounds` at `resolution` degrees, assigning each cell to the
/// region with the nearest centroid by squared planar distance. When a
/// catalog is supplied each cell also records its nearest landmark.
pub fn procedural_grid(
    bounds: &Bounds,
    resolution: f64,
    catalog: Option<&LandmarkCatalog>,
) -> Vec<GridPoint> {
    let mut points = Vec::new();
    let mut lat = bounds.south;
    while lat < bounds.north {
        let mut lon = bounds.west;
        while lon < bounds.east {
            points.push(GridPoint {
                lat,
                lon,
                region: nearest_region(lat, lon, DistanceMetric::PlanarSquared),
                landmark_id: catalog.and_then(|c| c.nearest_id(lat, lon)),
            });
            lon += resolution;
        }
        lat += resolution;
    }
    points
}

/// The landmarks themselves as the candidate set; region assignment uses
/// true great-circle distance and each point's landmark id is its own.
pub fn enriched_grid(catalog: &LandmarkCatalog) -> Vec<GridPoint> {
    catalog
        .landmarks()
        .iter()
        .map(|l| GridPoint {
            lat: l.lat,
            lon: l.lon,
            region: nearest_region(l.lat, l.lon, DistanceMetric::Haversine),
            landmark_id: Some(l.id),
        })
        .collect()
}
