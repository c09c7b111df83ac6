//! Summary service: Aggregate statistics over the prediction history.
//!
//! Works on the untyped history view so that legacy files using the older
//! English column convention still aggregate.

use std::sync::Arc;

use crate::domain::{FACTOR_COLUMNS, LABEL_COLUMN};
use crate::ports::{PredictionStore, RawTable};
use crate::GlukoraError;

/// Substring of the label display string marking a positive prediction.
pub const POSITIVE_MARKER: &str = "Positif";

/// Known column-name conventions for the mean report, in priority order.
/// The first set whose columns are all present wins; a log mixing
/// conventions therefore resolves to the highest-priority complete set.
const MEAN_COLUMN_SETS: [(&str, [&str; 3]); 2] = [
    ("localized", ["Glukosa", "BMI", "Usia"]),
    ("english", ["Glucose", "BMI", "Age"]),
];

/// Column means for whichever name convention the history uses.
#[derive(Debug, Clone)]
pub struct ColumnMeans {
    /// Which convention matched (`"localized"` or `"english"`)
    pub convention: &'static str,
    /// (column name, arithmetic mean) pairs
    pub values: Vec<(&'static str, f64)>,
}

/// How often one feature appeared among the persisted top factors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactorFrequency {
    pub name: String,
    pub count: usize,
}

/// Aggregate statistics over the whole history.
#[derive(Debug, Clone)]
pub struct HistorySummary {
    pub total: usize,
    pub positive: usize,
    pub negative: usize,
    /// Percentage of positive predictions, 0.0 when the history is empty
    pub positive_pct: f64,
    pub negative_pct: f64,
    /// `None` when no known mean-column convention is fully present
    pub means: Option<ColumnMeans>,
    /// Up to three most frequent top factors, ties in first-encountered order
    pub top_factors: Vec<FactorFrequency>,
}

/// Service computing history statistics.
pub struct SummaryService<S>
where
    S: PredictionStore,
{
    store: Arc<S>,
}

impl<S> SummaryService<S>
where
    S: PredictionStore,
    S::Error: Into<crate::adapters::StorageError>,
{
    /// Create a new summary service.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Compute the aggregate report over the full history.
    ///
    /// # Errors
    /// Returns error only if the history cannot be read at all; malformed
    /// rows were already filtered out by the store.
    pub fn summarize(&self) -> Result<HistorySummary, GlukoraError> {
        let table = self
            .store
            .read_raw()
            .map_err(|e| GlukoraError::Storage(e.into()))?;

        let total = table.rows.len();
        let positive = table
            .column_values(LABEL_COLUMN)
            .map_or(0, |labels| {
                labels.iter().filter(|l| l.contains(POSITIVE_MARKER)).count()
            });
        let negative = total - positive;

        // Guard the percentages against an empty history.
        let (positive_pct, negative_pct) = if total == 0 {
            (0.0, 0.0)
        } else {
            let t = total as f64;
            (
                positive as f64 / t * 100.0,
                negative as f64 / t * 100.0,
            )
        };

        let means = if total == 0 {
            None
        } else {
            Self::column_means(&table)
        };

        let top_factors = Self::factor_frequency(&table);

        tracing::info!(
            "Summarized history: total={total}, positive={positive} ({positive_pct:.1}%)"
        );

        Ok(HistorySummary {
            total,
            positive,
            negative,
            positive_pct,
            negative_pct,
            means,
            top_factors,
        })
    }

    /// Resolve the first fully-present column set and average its columns.
    /// Unparseable cells are skipped, matching the tolerant read path; a
    /// column with no parseable cells at all is left out rather than
    /// reported as a fake 0.0 mean. `None` when nothing is averageable.
    fn column_means(table: &RawTable) -> Option<ColumnMeans> {
        let (convention, columns) = MEAN_COLUMN_SETS
            .iter()
            .copied()
            .find(|(_, columns)| columns.iter().all(|c| table.column(c).is_some()))?;

        let values: Vec<(&'static str, f64)> = columns
            .iter()
            .filter_map(|col| {
                let parsed: Vec<f64> = table
                    .column_values(col)
                    .unwrap_or_default()
                    .iter()
                    .filter_map(|v| v.trim().parse().ok())
                    .collect();
                if parsed.is_empty() {
                    tracing::warn!("Mean column {col:?} has no numeric values, skipping");
                    return None;
                }
                Some((*col, parsed.iter().sum::<f64>() / parsed.len() as f64))
            })
            .collect();

        if values.is_empty() {
            return None;
        }
        Some(ColumnMeans { convention, values })
    }

    /// Tally every value across the factor columns (absent columns are
    /// simply excluded) and keep the three most frequent. The `"-"` sentinel
    /// counts like any other value, so a repaired legacy log reports it as a
    /// dominant entry. The tally is kept in first-encountered order so that
    /// equal counts tie-break deterministically under the stable sort.
    fn factor_frequency(table: &RawTable) -> Vec<FactorFrequency> {
        let mut tally: Vec<FactorFrequency> = Vec::new();

        for col in FACTOR_COLUMNS {
            let Some(values) = table.column_values(col) else {
                continue;
            };
            for value in values {
                if value.is_empty() {
                    continue;
                }
                match tally.iter_mut().find(|f| f.name == value) {
                    Some(entry) => entry.count += 1,
                    None => tally.push(FactorFrequency {
                        name: value.to_string(),
                        count: 1,
                    }),
                }
            }
        }

        tally.sort_by(|a, b| b.count.cmp(&a.count));
        tally.truncate(3);
        tally
    }
}
