//! Adapters layer: Concrete implementations of ports.
//!
//! These modules contain the actual integration with external artifacts:
//! - `artifact`: exported logistic regression model + scaler (JSON)
//! - `history`: flat-file CSV prediction log
//! - `gallery`: static model-evaluation images shipped with the model

pub mod artifact;
pub mod gallery;
pub mod history;

// Re-export storage error for lib.rs
pub use history::StorageError;
