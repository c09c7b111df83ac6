//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the application and external systems (model artifact, history
//! storage).

mod model;
mod store;

pub use model::{ArtifactError, FeatureScaler, RiskClassifier};
pub use store::{PredictionStore, RawTable, RepairOutcome};
