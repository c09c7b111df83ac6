//! Artifact adapter: Implementation of the scaler and classifier ports
//! backed by an exported model JSON.
//!
//! The training pipeline exports the fitted logistic regression and its
//! standard scaler as one JSON document. This adapter loads it once at
//! startup; a load failure is fatal to the pipeline, never per-request.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{FEATURE_COUNT, FEATURE_NAMES};
use crate::ports::{ArtifactError, FeatureScaler, RiskClassifier};

/// Candidate artifact file names inside the model directory, in preference
/// order.
const ARTIFACT_CANDIDATES: [&str; 2] = ["glukora_model.json", "model.json"];

/// Model parameters exported by the training pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedLinearModel {
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    pub scaler_mean: Vec<f64>,
    pub scaler_scale: Vec<f64>,
}

/// Artifact-backed scaler and logistic regression classifier.
#[derive(Debug)]
pub struct LogisticArtifact {
    model: ExportedLinearModel,
}

impl LogisticArtifact {
    /// Load the artifact from a model directory (or a direct file path).
    ///
    /// # Errors
    /// Returns error if no artifact file exists, the JSON is malformed, or
    /// the fitted parameters fail the sanity checks.
    pub fn load(model_dir: &Path) -> Result<Self, ArtifactError> {
        let path = if model_dir.is_file() {
            model_dir.to_path_buf()
        } else {
            ARTIFACT_CANDIDATES
                .iter()
                .map(|name| model_dir.join(name))
                .find(|p| p.exists())
                .ok_or_else(|| {
                    ArtifactError::Invalid(format!(
                        "no model JSON found in {:?} (expected one of {:?})",
                        model_dir, ARTIFACT_CANDIDATES
                    ))
                })?
        };

        let content = std::fs::read_to_string(&path).map_err(|source| ArtifactError::Read {
            path: path.clone(),
            source,
        })?;
        let model: ExportedLinearModel =
            serde_json::from_str(&content).map_err(|source| ArtifactError::Parse {
                path: path.clone(),
                source,
            })?;

        Self::check(&model)?;

        tracing::info!(
            "Loaded model artifact from {:?} (intercept={:.4}, n_features={})",
            path,
            model.intercept,
            model.feature_names.len()
        );

        Ok(Self { model })
    }

    /// Build directly from exported parameters (tests and embedding).
    ///
    /// # Errors
    /// Returns error if the parameters fail the sanity checks.
    pub fn from_exported(model: ExportedLinearModel) -> Result<Self, ArtifactError> {
        Self::check(&model)?;
        Ok(Self { model })
    }

    /// Sanity checks on the fitted parameters.
    fn check(model: &ExportedLinearModel) -> Result<(), ArtifactError> {
        let n = model.feature_names.len();
        if n != FEATURE_COUNT {
            return Err(ArtifactError::FeatureCount {
                got: n,
                expected: FEATURE_COUNT,
            });
        }
        if model.coefficients.len() != n
            || model.scaler_mean.len() != n
            || model.scaler_scale.len() != n
        {
            return Err(ArtifactError::Invalid(
                "model parameter lengths do not match feature_names length".into(),
            ));
        }
        if model
            .feature_names
            .iter()
            .zip(FEATURE_NAMES.iter())
            .any(|(got, want)| got != want)
        {
            return Err(ArtifactError::Invalid(format!(
                "artifact feature order {:?} does not match the canonical order",
                model.feature_names
            )));
        }
        if !model.intercept.is_finite()
            || model.coefficients.iter().any(|v| !v.is_finite())
            || model.scaler_mean.iter().any(|v| !v.is_finite())
        {
            return Err(ArtifactError::Invalid(
                "model parameters contain non-finite values".into(),
            ));
        }
        if model.scaler_scale.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(ArtifactError::Invalid(
                "scaler_scale entries must be finite and positive".into(),
            ));
        }
        Ok(())
    }

    fn check_row_len(&self, len: usize) -> Result<(), ArtifactError> {
        let expected = self.model.feature_names.len();
        if len != expected {
            return Err(ArtifactError::FeatureCount { got: len, expected });
        }
        Ok(())
    }

    fn sigmoid(z: f64) -> f64 {
        1.0 / (1.0 + (-z).exp())
    }
}

impl FeatureScaler for LogisticArtifact {
    fn transform(&self, raw: &[f64]) -> Result<Vec<f64>, ArtifactError> {
        self.check_row_len(raw.len())?;

        Ok(raw
            .iter()
            .zip(self.model.scaler_mean.iter().zip(self.model.scaler_scale.iter()))
            .map(|(x, (mean, scale))| (x - mean) / scale)
            .collect())
    }
}

impl RiskClassifier for LogisticArtifact {
    fn predict_proba(&self, scaled: &[f64]) -> Result<f64, ArtifactError> {
        self.check_row_len(scaled.len())?;

        let score: f64 = scaled
            .iter()
            .zip(self.model.coefficients.iter())
            .map(|(x, w)| x * w)
            .sum::<f64>()
            + self.model.intercept;

        let probability = Self::sigmoid(score);
        tracing::debug!("Scored feature row: score={score:.4}, probability={probability:.4}");
        Ok(probability)
    }

    fn coefficients(&self) -> &[f64] {
        &self.model.coefficients
    }
}
