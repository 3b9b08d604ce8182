//! Classifier loading and raw scoring.
//!
//! The trained artifact is a JSON logistic scorer exported out of band by
//! the training job; its `feature_names` list is the binding input
//! contract. When the artifact is missing or corrupt the engine degrades to
//! a deterministic fixed-probability stand-in so the service stays up; the
//! swap is logged loudly and visible through [`Classifier::is_fallback`].

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::PipelineError;
use crate::features::schema::FeatureMatrix;

/// One interface over the trained classifier and its degraded stand-in,
/// chosen once at startup.
pub trait Classifier: Send + Sync {
    /// Positive-class probability per row, row order preserved.
    fn predict_proba(&self, features: &FeatureMatrix) -> Result<Vec<f64>, PipelineError>;

    /// True for the degraded stand-in rather than a trained model.
    fn is_fallback(&self) -> bool;

    /// Label for logs, e.g. the artifact version.
    fn name(&self) -> &str;
}

/// Frozen classifier artifact as written by the training job.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierArtifact {
    pub version: String,
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

pub struct LogisticClassifier {
    artifact: ClassifierArtifact,
}

impl LogisticClassifier {
    /// Validate the artifact against the builder's column schema. A name or
    /// order mismatch means the deployed model was trained on a different
    /// contract, which is a refusal, not something to paper over.
    pub fn from_artifact(
        artifact: ClassifierArtifact,
        expected_columns: &[&str],
    ) -> Result<Self> {
        if artifact.feature_names.len() != artifact.coefficients.len() {
            bail!(
                "artifact has {} feature names but {} coefficients",
                artifact.feature_names.len(),
                artifact.coefficients.len()
            );
        }
        if artifact
            .feature_names
            .iter()
            .map(String::as_str)
            .ne(expected_columns.iter().copied())
        {
            bail!(
                "artifact feature contract {:?} does not match builder schema {:?}",
                artifact.feature_names,
                expected_columns
            );
        }
        Ok(Self { artifact })
    }
}

impl Classifier for LogisticClassifier {
    fn predict_proba(&self, features: &FeatureMatrix) -> Result<Vec<f64>, PipelineError> {
        let expected = self.artifact.coefficients.len();

        let mut probabilities = Vec::with_capacity(features.n_rows());
        for (i, row) in features.rows.iter().enumerate() {
            if row.len() != expected {
                return Err(PipelineError::ShapeMismatch(format!(
                    "row {i} has {} columns, model expects {expected}",
                    row.len()
                )));
            }
            let z: f64 = self.artifact.intercept
                + row
                    .iter()
                    .zip(&self.artifact.coefficients)
                    .map(|(x, w)| x * w)
                    .sum::<f64>();
            probabilities.push(1.0 / (1.0 + (-z).exp()));
        }
        Ok(probabilities)
    }

    fn is_fallback(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        &self.artifact.version
    }
}

/// Deterministic stand-in used when no trained artifact can be loaded.
pub struct FallbackClassifier {
    probability: f64,
}

impl FallbackClassifier {
    pub fn new() -> Self {
        Self { probability: 0.5 }
    }
}

impl Default for FallbackClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for FallbackClassifier {
    fn predict_proba(&self, features: &FeatureMatrix) -> Result<Vec<f64>, PipelineError> {
        Ok(vec![self.probability; features.n_rows()])
    }

    fn is_fallback(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "fallback"
    }
}

/// Load the trained classifier once at startup, degrading to the stand-in
/// when the artifact is missing or corrupt. Never fails the process.
pub fn load_classifier(path: &Path, expected_columns: &[&str]) -> Box<dyn Classifier> {
    match try_load(path, expected_columns) {
        Ok(model) => {
            info!(
                path = %path.display(),
                version = model.artifact.version,
                features = model.artifact.coefficients.len(),
                "Classifier artifact loaded"
            );
            Box::new(model)
        }
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "Classifier artifact unavailable — degrading to fixed-probability stand-in"
            );
            Box::new(FallbackClassifier::new())
        }
    }
}

fn try_load(path: &Path, expected_columns: &[&str]) -> Result<LogisticClassifier> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let artifact: ClassifierArtifact =
        serde_json::from_str(&contents).context("Failed to parse classifier artifact")?;
    LogisticClassifier::from_artifact(artifact, expected_columns)
}
