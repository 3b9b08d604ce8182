//! Regions and nearest-labeled-point assignment.
//!
//! Borough assignment for raster cells and landmark lookup for arbitrary
//! coordinates are the same operation against different catalogs, so both go
//! through [`nearest_index`] parameterized by distance metric.

pub mod grid;
pub mod landmarks;
pub mod sampler;

/// A named geographic subdivision with a fixed centroid.
#[derive(Debug, Clone, Copy)]
pub struct Region {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

/// The five boroughs and their centroids. Static; loaded nowhere, shipped
/// with the binary.
pub const REGIONS: &[Region] = &[
    Region { name: "Manhattan", lat: 40.776676, lon: -73.971321 },
    Region { name: "Brooklyn", lat: 40.650002, lon: -73.949997 },
    Region { name: "Queens", lat: 40.742054, lon: -73.769417 },
    Region { name: "Staten Island", lat: 40.579021, lon: -74.151535 },
    Region { name: "Bronx", lat: 40.837048, lon: -73.865433 },
];

const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceMetric {
    /// Squared planar degrees. Cheap, and fine for picking a winner among
    /// borough centroids at city scale.
    PlanarSquared,
    /// True great-circle distance in km.
    Haversine,
}

/// Great-circle distance between two coordinates in km.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

/// Index of the catalog entry closest to `(lat, lon)` under `metric`.
/// `None` only for an empty catalog.
pub fn nearest_index<T>(
    catalog: &[T],
    lat: f64,
    lon: f64,
    metric: DistanceMetric,
    coord: impl Fn(&T) -> (f64, f64),
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, entry) in catalog.iter().enumerate() {
        let (elat, elon) = coord(entry);
        let d = match metric {
            DistanceMetric::PlanarSquared => {
                (lat - elat) * (lat - elat) + (lon - elon) * (lon - elon)
            }
            DistanceMetric::Haversine => haversine_km(lat, lon, elat, elon),
        };
        if best.map_or(true, |(_, bd)| d < bd) {
            best = Some((i, d));
        }
    }
    best.map(|(i, _)| i)
}

/// Name of the region whose centroid is closest to the coordinate.
pub fn nearest_region(lat: f64, lon: f64, metric: DistanceMetric) -> &'static str {
    let i = nearest_index(REGIONS, lat, lon, metric, |r| (r.lat, r.lon))
        .expect("region table is non-empty");
    REGIONS[i].name
}
