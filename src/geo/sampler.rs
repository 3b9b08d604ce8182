//! Deterministic down-sampling of the candidate grid.
//!
//! Per-request inference cost is bounded by scoring a fixed-size subset of
//! the universe. Sampling is seeded so the same seed always yields the same
//! subset, which keeps responses stable across identical requests.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::SamplerConfig;
use crate::geo::grid::GridPoint;

/// Draw `config.size` points without replacement. Selected indices are
/// sorted ascending, so sampled order follows grid order end to end.
pub fn sample_points(grid: &[GridPoint], config: &SamplerConfig) -> Vec<GridPoint> {
    sample_indices(grid.len(), config.size, config.seed)
        .into_iter()
        .map(|i| grid[i])
        .collect()
}

fn sample_indices(len: usize, size: usize, seed: u64) -> Vec<usize> {
    if size >= len {
        return (0..len).collect();
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut indices = rand::seq::index::sample(&mut rng, len, size).into_vec();
    indices.sort_unstable();
    indices
}
