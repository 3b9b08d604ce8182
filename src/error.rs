//! Typed request-level pipeline errors.
//!
//! Region-level weather failures are caught and aggregated inside the
//! weather module; everything else propagates to the orchestrator, which
//! surfaces a single error without partial output.

use thiserror::Error;

use crate::weather::WeatherFailure;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Caller-supplied timestamp was not ISO-8601. A client error.
    #[error("invalid timestamp {0:?} (expected ISO-8601, e.g. 2024-03-14 or 2024-03-14T12:00:00)")]
    InvalidTimestamp(String),

    /// One or more regions had no usable weather record. The whole request
    /// fails; partial weather is never passed downstream.
    #[error("weather unavailable for regions: {}", failed_regions(.0))]
    WeatherUnavailable(Vec<WeatherFailure>),

    /// Internal invariant broken, e.g. a grid point whose region is missing
    /// from the weather map. Never caused by caller input.
    #[error("feature contract violation: {0}")]
    FeatureContractViolation(String),

    /// Feature matrix does not match the classifier's input signature.
    /// Fatal and non-retryable for the request.
    #[error("feature matrix shape mismatch: {0}")]
    ShapeMismatch(String),
}

impl PipelineError {
    /// Whether the API layer should map this to a 4xx rather than a 5xx.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidTimestamp(_))
    }
}

fn failed_regions(failures: &[WeatherFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{} ({})", f.region, f.reason))
        .collect::<Vec<_>>()
        .join(", ")
}
