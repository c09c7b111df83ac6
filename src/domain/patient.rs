//! Patient measurement types for diabetes risk prediction.
//!
//! Based on the Pima Indians Diabetes dataset features.

use serde::{Deserialize, Serialize};

/// Number of model input features.
pub const FEATURE_COUNT: usize = 8;

/// Feature names in canonical model order.
///
/// These names double as the persisted CSV column names; the history format
/// predates this crate and is Indonesian-localized, so they are kept verbatim
/// for data-file compatibility.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Jumlah_Kehamilan",
    "Glukosa",
    "Tekanan_Darah",
    "Ketebalan_Kulit",
    "Insulin",
    "BMI",
    "Riwayat_Keluarga",
    "Usia",
];

/// Clinical measurements for one prediction request.
///
/// Field order matches the order the scaler and classifier were fitted with
/// and must not change: `to_vec` feeds the model positionally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientFeatures {
    /// Number of pregnancies (0-20)
    pub pregnancies: u32,

    /// Plasma glucose concentration in mg/dL (0-300)
    pub glucose: u32,

    /// Diastolic blood pressure in mm Hg (0-200)
    pub blood_pressure: u32,

    /// Triceps skin fold thickness in mm (0-100)
    pub skin_thickness: u32,

    /// 2-hour serum insulin in mu U/ml (0-900)
    pub insulin: u32,

    /// Body mass index in kg/m² (0.0-70.0)
    pub bmi: f64,

    /// Diabetes pedigree function, family history score (0.0-2.5)
    pub pedigree: f64,

    /// Age in years (1-120)
    pub age: u32,
}

impl PatientFeatures {
    /// Convert measurements to a numeric row for the model.
    /// Order matches `FEATURE_NAMES`.
    #[must_use]
    pub fn to_vec(&self) -> Vec<f64> {
        vec![
            f64::from(self.pregnancies),
            f64::from(self.glucose),
            f64::from(self.blood_pressure),
            f64::from(self.skin_thickness),
            f64::from(self.insulin),
            self.bmi,
            self.pedigree,
            f64::from(self.age),
        ]
    }

    /// Create measurements from a numeric row in canonical order.
    ///
    /// This is the structural check only: the row must have exactly 8 finite,
    /// non-negative values. Range validation is `validate`'s job.
    ///
    /// # Errors
    /// Returns error if the row length is not 8 or a value is not usable.
    pub fn from_row(row: &[f64]) -> Result<Self, String> {
        if row.len() != FEATURE_COUNT {
            return Err(format!("Expected {FEATURE_COUNT} features, got {}", row.len()));
        }
        for (i, v) in row.iter().enumerate() {
            if !v.is_finite() || *v < 0.0 {
                return Err(format!("Feature {} has invalid value {v}", FEATURE_NAMES[i]));
            }
        }

        Ok(Self {
            pregnancies: row[0] as u32,
            glucose: row[1] as u32,
            blood_pressure: row[2] as u32,
            skin_thickness: row[3] as u32,
            insulin: row[4] as u32,
            bmi: row[5],
            pedigree: row[6],
            age: row[7] as u32,
        })
    }

    /// Validate that all measurements are within the ranges the model was
    /// trained on. Callers collecting raw input should run this before
    /// building a prediction request.
    ///
    /// # Errors
    /// Returns validation errors as a vector of strings.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.pregnancies > 20 {
            errors.push(format!("Pregnancies {} out of range [0, 20]", self.pregnancies));
        }
        if self.glucose > 300 {
            errors.push(format!("Glucose {} out of range [0, 300]", self.glucose));
        }
        if self.blood_pressure > 200 {
            errors.push(format!(
                "Blood pressure {} out of range [0, 200]",
                self.blood_pressure
            ));
        }
        if self.skin_thickness > 100 {
            errors.push(format!(
                "Skin thickness {} out of range [0, 100]",
                self.skin_thickness
            ));
        }
        if self.insulin > 900 {
            errors.push(format!("Insulin {} out of range [0, 900]", self.insulin));
        }
        if !self.bmi.is_finite() || !(0.0..=70.0).contains(&self.bmi) {
            errors.push(format!("BMI {} out of range [0, 70]", self.bmi));
        }
        if !self.pedigree.is_finite() || !(0.0..=2.5).contains(&self.pedigree) {
            errors.push(format!(
                "Family history score {} out of range [0, 2.5]",
                self.pedigree
            ));
        }
        if !(1..=120).contains(&self.age) {
            errors.push(format!("Age {} out of range [1, 120]", self.age));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
