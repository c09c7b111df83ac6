//! Risk assessment result types.
//!
//! Represents the output of the diabetes risk prediction pipeline and the
//! row shape persisted to the prediction history.

use serde::{Deserialize, Serialize};

use super::patient::PatientFeatures;
use super::ranking::{top_factors, Contribution};

/// Sentinel stored in place of a top-factor name that is not available
/// (legacy rows written before the factor columns existed).
pub const MISSING_FACTOR: &str = "-";

/// Persisted column holding the prediction label display string.
pub const LABEL_COLUMN: &str = "Prediksi";

/// Persisted column holding the positive-class probability.
pub const PROBABILITY_COLUMN: &str = "Probabilitas";

/// Persisted columns holding the top three contributing feature names.
/// Files written by older versions lack these; history repair backfills them.
pub const FACTOR_COLUMNS: [&str; 3] = [
    "Faktor_Terkuat_1",
    "Faktor_Terkuat_2",
    "Faktor_Terkuat_3",
];

/// Binary classification outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Diabetes predicted
    Positive,
    /// No diabetes predicted
    Negative,
}

impl Outcome {
    /// Classify from the positive-class probability.
    /// The boundary at exactly 0.5 resolves to positive.
    #[must_use]
    pub fn from_probability(probability: f64) -> Self {
        if probability >= 0.5 {
            Self::Positive
        } else {
            Self::Negative
        }
    }

    /// The display string persisted to the history file.
    ///
    /// The wording predates this crate and is matched by the summary
    /// aggregator (`contains("Positif")`), so it must not change.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Positive => "Positif Diabetes",
            Self::Negative => "Negatif Diabetes",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Complete result of one prediction request.
///
/// Built once by the pipeline and not mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct RiskAssessment {
    /// Binary prediction
    pub outcome: Outcome,

    /// Probability of the positive class (0.0 to 1.0)
    pub probability: f64,

    /// Feature contributions, strongest first
    pub contributions: Vec<Contribution>,

    /// The measurements this assessment was computed from
    pub features: PatientFeatures,

    /// Timestamp of the assessment (not persisted)
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl RiskAssessment {
    /// Create a new assessment from the pipeline outputs.
    #[must_use]
    pub fn new(
        features: PatientFeatures,
        probability: f64,
        contributions: Vec<Contribution>,
    ) -> Self {
        Self {
            outcome: Outcome::from_probability(probability),
            probability,
            contributions,
            features,
            created_at: chrono::Utc::now(),
        }
    }

    /// Names of the three strongest factors, padded with the `"-"` sentinel
    /// when fewer are available.
    #[must_use]
    pub fn top_factor_names(&self) -> [String; 3] {
        let top = top_factors(&self.contributions, 3);
        std::array::from_fn(|i| {
            top.get(i)
                .map_or_else(|| MISSING_FACTOR.to_string(), |name| (*name).to_string())
        })
    }
}

/// One persisted history row: the measurements plus the prediction and its
/// three strongest factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub features: PatientFeatures,

    /// Prediction label as a display string (see [`Outcome::label`])
    pub label: String,

    /// Probability of the positive class
    pub probability: f64,

    /// Top three factor names, `"-"` where unknown
    pub factors: [String; 3],
}

impl PredictionRecord {
    /// Build the persisted row for an assessment.
    #[must_use]
    pub fn from_assessment(assessment: &RiskAssessment) -> Self {
        Self {
            features: assessment.features.clone(),
            label: assessment.outcome.label().to_string(),
            probability: assessment.probability,
            factors: assessment.top_factor_names(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_features() -> PatientFeatures {
        PatientFeatures {
            pregnancies: 1,
            glucose: 120,
            blood_pressure: 70,
            skin_thickness: 20,
            insulin: 79,
            bmi: 28.5,
            pedigree: 0.5,
            age: 30,
        }
    }

    #[test]
    fn test_outcome_boundary_is_positive() {
        assert_eq!(Outcome::from_probability(0.5), Outcome::Positive);
        assert_eq!(Outcome::from_probability(0.49999), Outcome::Negative);
        assert_eq!(Outcome::from_probability(0.9), Outcome::Positive);
    }

    #[test]
    fn test_label_markers() {
        assert!(Outcome::Positive.label().contains("Positif"));
        assert!(!Outcome::Negative.label().contains("Positif"));
    }

    #[test]
    fn test_top_factor_names_padded() {
        let contributions = vec![
            Contribution { feature: "Glukosa", score: 1.5 },
            Contribution { feature: "BMI", score: -0.5 },
        ];
        let assessment = RiskAssessment::new(sample_features(), 0.7, contributions);

        let factors = assessment.top_factor_names();
        assert_eq!(factors[0], "Glukosa");
        assert_eq!(factors[1], "BMI");
        assert_eq!(factors[2], MISSING_FACTOR);
    }

    #[test]
    fn test_record_from_assessment() {
        let contributions = vec![
            Contribution { feature: "Glukosa", score: 1.5 },
            Contribution { feature: "Usia", score: 0.8 },
            Contribution { feature: "BMI", score: -0.5 },
            Contribution { feature: "Insulin", score: 0.1 },
        ];
        let assessment = RiskAssessment::new(sample_features(), 0.82, contributions);
        let record = PredictionRecord::from_assessment(&assessment);

        assert_eq!(record.label, "Positif Diabetes");
        assert!((record.probability - 0.82).abs() < f64::EPSILON);
        assert_eq!(record.factors, ["Glukosa", "Usia", "BMI"].map(String::from));
    }
}
