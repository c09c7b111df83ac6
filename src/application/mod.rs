//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the core use cases of the application.

mod pipeline;
mod reporting;

pub use pipeline::PredictionService;
pub use reporting::{ColumnMeans, FactorFrequency, HistorySummary, SummaryService};
