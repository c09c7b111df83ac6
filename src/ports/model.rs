//! Model ports: Traits for the pre-fitted scaler and classifier.
//!
//! The model and scaler are consumed as opaque pre-trained artifacts; these
//! traits capture their input/output contracts and nothing else.

use std::path::PathBuf;

/// Errors from the model artifact layer.
///
/// Load failures are fatal to the whole pipeline: the process should refuse
/// to start rather than serve predictions without a model.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("failed to read model artifact {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("model artifact {path:?} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid model artifact: {0}")]
    Invalid(String),

    #[error("feature count mismatch: got {got}, expected {expected}")]
    FeatureCount { got: usize, expected: usize },
}

/// Pre-fitted standardization transform.
pub trait FeatureScaler: Send + Sync {
    /// Scale a raw feature row: subtract the per-feature mean learned during
    /// training and divide by the per-feature standard deviation.
    ///
    /// Output has the same length and order as the input. Deterministic:
    /// the same input always yields the same output.
    ///
    /// # Errors
    /// Returns `ArtifactError::FeatureCount` if the row length does not
    /// match the fitted parameters.
    fn transform(&self, raw: &[f64]) -> Result<Vec<f64>, ArtifactError>;
}

/// Pre-fitted linear classifier.
pub trait RiskClassifier: Send + Sync {
    /// Probability of the positive class for a scaled feature row:
    /// `sigmoid(dot(weights, scaled) + bias)`.
    ///
    /// # Errors
    /// Returns `ArtifactError::FeatureCount` if the row length does not
    /// match the fitted weights.
    fn predict_proba(&self, scaled: &[f64]) -> Result<f64, ArtifactError>;

    /// The fitted weight vector, one coefficient per feature in canonical
    /// order. Used by the contribution ranker.
    fn coefficients(&self) -> &[f64];
}
