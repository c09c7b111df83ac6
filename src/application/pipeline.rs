//! Prediction service: Orchestrates the scoring pipeline.
//!
//! This service coordinates:
//! - Feature scaling
//! - Logistic regression scoring
//! - Contribution ranking
//! - History persistence

use std::sync::Arc;

use crate::domain::{rank_contributions, PatientFeatures, PredictionRecord, RiskAssessment};
use crate::ports::{FeatureScaler, PredictionStore, RepairOutcome, RiskClassifier};
use crate::GlukoraError;

/// Service for running the prediction pipeline.
///
/// The model artifact is loaded once at startup and held for the service
/// lifetime; there is no per-request model state.
pub struct PredictionService<M, S>
where
    M: FeatureScaler + RiskClassifier,
    S: PredictionStore,
{
    model: Arc<M>,
    store: Arc<S>,
}

impl<M, S> PredictionService<M, S>
where
    M: FeatureScaler + RiskClassifier,
    S: PredictionStore,
    S::Error: Into<crate::adapters::StorageError>,
{
    /// Create a new prediction service.
    pub fn new(model: Arc<M>, store: Arc<S>) -> Self {
        Self { model, store }
    }

    /// Run the full pipeline on one set of measurements:
    /// 1. Build the canonical feature row
    /// 2. Scale it with the fitted standardization
    /// 3. Score it for the positive-class probability
    /// 4. Rank per-feature contributions
    /// 5. Append the record to the history
    ///
    /// A history write failure propagates; the caller decides whether the
    /// (already computed) assessment is worth retrying.
    ///
    /// # Errors
    /// Returns error if scaling, scoring, or the history append fails.
    pub fn assess(&self, features: PatientFeatures) -> Result<RiskAssessment, GlukoraError> {
        let raw = features.to_vec();

        tracing::debug!("Scaling feature row...");
        let scaled = self.model.transform(&raw)?;

        tracing::debug!("Scoring scaled row...");
        let probability = self.model.predict_proba(&scaled)?;

        let ranking = rank_contributions(&scaled, self.model.coefficients())
            .map_err(GlukoraError::InvalidInput)?;

        let assessment = RiskAssessment::new(features, probability, ranking);

        let record = PredictionRecord::from_assessment(&assessment);
        self.store
            .append(&record)
            .map_err(|e| GlukoraError::Storage(e.into()))?;

        tracing::info!(
            "Assessment complete: outcome={}, probability={:.1}%, strongest factor={}",
            assessment.outcome,
            assessment.probability * 100.0,
            record.factors[0]
        );

        Ok(assessment)
    }

    /// Recent history records, oldest first.
    ///
    /// # Errors
    /// Returns error if the history cannot be read.
    pub fn history(&self, limit: Option<usize>) -> Result<Vec<PredictionRecord>, GlukoraError> {
        self.store
            .read(limit)
            .map_err(|e| GlukoraError::Storage(e.into()))
    }

    /// Run the history schema repair.
    ///
    /// # Errors
    /// Returns error if the history cannot be read or rewritten.
    pub fn repair_history(&self) -> Result<RepairOutcome, GlukoraError> {
        self.store
            .repair()
            .map_err(|e| GlukoraError::Storage(e.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::artifact::{ExportedLinearModel, LogisticArtifact};
    use crate::adapters::history::CsvHistory;
    use crate::domain::{Outcome, FEATURE_NAMES};
    use tempfile::TempDir;

    fn test_model() -> LogisticArtifact {
        LogisticArtifact::from_exported(ExportedLinearModel {
            feature_names: FEATURE_NAMES.iter().map(|s| (*s).to_string()).collect(),
            coefficients: vec![0.3, 1.1, -0.2, 0.05, -0.1, 0.7, 0.4, 0.5],
            intercept: -0.8,
            scaler_mean: vec![3.8, 120.9, 69.1, 20.5, 79.8, 32.0, 0.47, 33.2],
            scaler_scale: vec![3.4, 32.0, 19.4, 16.0, 115.2, 7.9, 0.33, 11.8],
        })
        .expect("Should build model")
    }

    fn create_test_service() -> (TempDir, PredictionService<LogisticArtifact, CsvHistory>) {
        let temp = TempDir::new().expect("tempdir");
        let store = Arc::new(CsvHistory::new(temp.path().join("history.csv")));
        let service = PredictionService::new(Arc::new(test_model()), store);
        (temp, service)
    }

    fn sample_features(glucose: u32) -> PatientFeatures {
        PatientFeatures {
            pregnancies: 2,
            glucose,
            blood_pressure: 72,
            skin_thickness: 25,
            insulin: 90,
            bmi: 31.4,
            pedigree: 0.42,
            age: 45,
        }
    }

    #[test]
    fn test_pipeline_end_to_end() {
        let (_temp, service) = create_test_service();

        let assessment = service.assess(sample_features(138)).expect("Should assess");

        assert!((0.0..=1.0).contains(&assessment.probability));
        assert_eq!(assessment.contributions.len(), 8);
        assert_eq!(
            assessment.outcome,
            Outcome::from_probability(assessment.probability)
        );

        let history = service.history(Some(1)).expect("Should read history");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].label, assessment.outcome.label());
        assert_ne!(history[0].factors[0], "-");
    }

    #[test]
    fn test_pipeline_is_deterministic() {
        let (_temp, service) = create_test_service();

        let a = service.assess(sample_features(160)).expect("Should assess");
        let b = service.assess(sample_features(160)).expect("Should assess");

        assert_eq!(a.probability, b.probability);
        assert_eq!(a.contributions, b.contributions);
    }

    #[test]
    fn test_higher_glucose_raises_risk() {
        // Glucose carries the largest positive coefficient in the test model.
        let (_temp, service) = create_test_service();

        let low = service.assess(sample_features(90)).expect("Should assess");
        let high = service.assess(sample_features(250)).expect("Should assess");

        assert!(high.probability > low.probability);
        assert_eq!(high.contributions[0].feature, "Glukosa");
    }

    #[test]
    fn test_repair_after_appending_to_legacy_file() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("history.csv");
        std::fs::write(
            &path,
            "Jumlah_Kehamilan,Glukosa,Tekanan_Darah,Ketebalan_Kulit,Insulin,BMI,Riwayat_Keluarga,Usia,Prediksi,Probabilitas\n\
             2,140,75,22,85,30.1,0.6,41,Positif Diabetes,0.77\n",
        )
        .expect("seed legacy file");

        let store = Arc::new(CsvHistory::new(&path));
        let service = PredictionService::new(Arc::new(test_model()), store);

        let outcome = service.repair_history().expect("Should repair");
        assert!(matches!(outcome, RepairOutcome::Repaired(_)));

        service.assess(sample_features(138)).expect("Should assess");
        let history = service.history(None).expect("Should read history");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].factors[0], "-");
        assert_ne!(history[1].factors[0], "-");
    }

    #[test]
    fn test_history_accumulates_in_order() {
        let (_temp, service) = create_test_service();

        service.assess(sample_features(90)).expect("Should assess");
        service.assess(sample_features(200)).expect("Should assess");

        let history = service.history(None).expect("Should read history");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].features.glucose, 90);
        assert_eq!(history[1].features.glucose, 200);
    }
}
