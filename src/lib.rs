//! # Glukora
//!
//! Diabetes risk prediction from clinical measurements using a pre-trained
//! logistic regression model, with an append-only CSV history and aggregate
//! reporting.
//!
//! This crate provides:
//! - Scaling and scoring backed by an exported model artifact (JSON)
//! - Per-feature contribution ranking for result interpretation
//! - A schema-tolerant CSV prediction log with explicit repair
//! - Summary statistics over the accumulated history
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (patient features, assessments, ranking)
//! - `ports`: Trait definitions for external operations
//! - `adapters`: Concrete implementations (model artifact, CSV log, gallery)
//! - `application`: Use cases orchestrating domain and ports

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;

pub use domain::{Outcome, PatientFeatures, RiskAssessment};

/// Result type for Glukora operations
pub type Result<T> = std::result::Result<T, GlukoraError>;

/// Main error type for Glukora
#[derive(Debug, thiserror::Error)]
pub enum GlukoraError {
    #[error("Model artifact unavailable: {0}")]
    Artifact(#[from] ports::ArtifactError),

    #[error("Storage operation failed: {0}")]
    Storage(#[from] adapters::StorageError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
