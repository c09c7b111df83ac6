//! Storage port: Trait for the append-only prediction history.
//!
//! This trait abstracts the storage backend (a flat CSV file) from the
//! application logic.

use crate::domain::PredictionRecord;

/// Result of a history repair pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepairOutcome {
    /// Columns that were added to the header and backfilled with `"-"`.
    Repaired(Vec<String>),
    /// The header already carried every expected column.
    NothingToRepair,
}

/// An untyped view of the history: the header row plus one string row per
/// record, in insertion order. Used by the summary aggregator, which must
/// cope with legacy column-name conventions that the typed read rejects.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    /// Column names from the header row
    pub header: Vec<String>,
    /// Data rows; every row has exactly `header.len()` fields
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Index of a named column, if present.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    /// All values of a named column, in insertion order.
    #[must_use]
    pub fn column_values(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.column(name)?;
        Some(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }
}

/// Trait for prediction history storage.
///
/// The history is append-only: no operation deletes or reorders records,
/// and `repair` only adds missing columns.
pub trait PredictionStore: Send + Sync {
    /// Error type for storage operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Append one record. Creates the store with the canonical header if it
    /// does not exist yet; otherwise appends without rewriting the existing
    /// header, even when that header is stale (schema drift is resolved by
    /// `repair`, not on the write path).
    ///
    /// # Errors
    /// Returns error if the storage operation fails.
    fn append(&self, record: &PredictionRecord) -> Result<(), Self::Error>;

    /// Read records in insertion order, tolerating malformed rows (they are
    /// skipped, not fatal). With a limit, only the most recent `limit`
    /// records are returned.
    ///
    /// # Errors
    /// Returns error if the store cannot be read at all.
    fn read(&self, limit: Option<usize>) -> Result<Vec<PredictionRecord>, Self::Error>;

    /// Read the untyped header-and-rows view, skipping rows whose field
    /// count does not match the header.
    ///
    /// # Errors
    /// Returns error if the store cannot be read at all.
    fn read_raw(&self) -> Result<RawTable, Self::Error>;

    /// Add any missing top-factor columns, backfilled with `"-"`, and
    /// rewrite the store with the unified header. Idempotent: a second run
    /// reports `NothingToRepair` and leaves the content unchanged.
    ///
    /// # Errors
    /// Returns error if the store cannot be read or rewritten.
    fn repair(&self) -> Result<RepairOutcome, Self::Error>;
}
