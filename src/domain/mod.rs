//! Domain layer: Core business types and logic.
//!
//! This module contains pure Rust types with no external dependencies
//! beyond serialization and timestamps.

mod assessment;
mod patient;
mod ranking;

pub use assessment::{
    Outcome, PredictionRecord, RiskAssessment, FACTOR_COLUMNS, LABEL_COLUMN, MISSING_FACTOR,
    PROBABILITY_COLUMN,
};
pub use patient::{PatientFeatures, FEATURE_COUNT, FEATURE_NAMES};
pub use ranking::{rank_contributions, top_factors, Contribution, Direction};
