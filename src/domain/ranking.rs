//! Per-feature contribution ranking for result interpretation.
//!
//! A contribution is the scaled feature value multiplied by its fitted model
//! coefficient: a signed measure of that feature's influence on the risk
//! score. Ranking is by magnitude and must be deterministic, so ties keep
//! the canonical feature order (stable sort).

use serde::{Deserialize, Serialize};

use super::patient::FEATURE_NAMES;

/// Direction of a feature's influence on the risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Positive contribution pushes the score toward a positive prediction.
    IncreasesRisk,
    /// Non-positive contribution pulls the score away from it.
    DecreasesRisk,
}

impl Direction {
    /// Get a human-readable description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::IncreasesRisk => "increases risk",
            Self::DecreasesRisk => "decreases risk",
        }
    }
}

/// One feature's signed contribution to the linear score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Contribution {
    /// Canonical feature name
    pub feature: &'static str,

    /// Signed contribution: scaled value times coefficient
    pub score: f64,
}

impl Contribution {
    /// Direction of this contribution. Only a strictly positive score
    /// increases risk; zero counts as decreasing, matching the scoring rule.
    #[must_use]
    pub fn direction(&self) -> Direction {
        if self.score > 0.0 {
            Direction::IncreasesRisk
        } else {
            Direction::DecreasesRisk
        }
    }
}

/// Rank feature contributions by descending magnitude.
///
/// `scaled` and `coefficients` must both be in canonical feature order.
/// The sort is stable: equal magnitudes preserve feature order.
///
/// # Errors
/// Returns error if the two vectors disagree with the canonical length.
pub fn rank_contributions(
    scaled: &[f64],
    coefficients: &[f64],
) -> Result<Vec<Contribution>, String> {
    if scaled.len() != FEATURE_NAMES.len() || coefficients.len() != FEATURE_NAMES.len() {
        return Err(format!(
            "Contribution ranking needs {} scaled values and coefficients, got {} and {}",
            FEATURE_NAMES.len(),
            scaled.len(),
            coefficients.len()
        ));
    }

    let mut ranked: Vec<Contribution> = FEATURE_NAMES
        .iter()
        .copied()
        .zip(scaled.iter().zip(coefficients.iter()))
        .map(|(name, (x, w))| Contribution {
            feature: name,
            score: x * w,
        })
        .collect();

    ranked.sort_by(|a, b| b.score.abs().total_cmp(&a.score.abs()));

    Ok(ranked)
}

/// Names of the strongest factors, at most `n`.
///
/// Short rankings return as many as available without error.
#[must_use]
pub fn top_factors(ranking: &[Contribution], n: usize) -> Vec<&'static str> {
    ranking.iter().take(n).map(|c| c.feature).collect()
}
