//! Imputation strategies for filling missing values.
//!
//! Every strategy is a pure `(matrix, mask) -> matrix` transformation that
//! copies its input, touches only masked cells, and leaves non-masked cells
//! bit-identical. Strategies are mutually independent: each one always runs
//! against the original matrix, never another strategy's output.

mod interpolate;
mod statistical;

pub use interpolate::LinearInterpolator;
pub use statistical::StatisticalImputer;

use crate::types::{MissingnessMask, NumericMatrix};
use serde::{Deserialize, Serialize};

/// The fixed set of supported imputation strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImputationStrategy {
    /// Replace every masked cell with `0.0`.
    Zero,
    /// Replace masked cells with the column mean of non-missing values.
    Mean,
    /// Replace masked cells with the column median of non-missing values.
    Median,
    /// Linear interpolation over the row index, clamping at the boundaries.
    Linear,
}

impl ImputationStrategy {
    /// All strategies, in the order the pipeline runs them.
    pub const ALL: [ImputationStrategy; 4] = [
        ImputationStrategy::Zero,
        ImputationStrategy::Mean,
        ImputationStrategy::Median,
        ImputationStrategy::Linear,
    ];

    /// Stable name used in reports.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::Mean => "mean",
            Self::Median => "median",
            Self::Linear => "linear",
        }
    }

    /// Produce the reconstructed matrix for this strategy.
    ///
    /// A column without any non-missing values cannot be defined by `mean`,
    /// `median`, or `linear`; its masked cells stay `NaN` and surface as
    /// undefined in the caller's report.
    pub fn apply(&self, matrix: &NumericMatrix, mask: &MissingnessMask) -> NumericMatrix {
        match self {
            Self::Zero => StatisticalImputer::fill_zero(matrix, mask),
            Self::Mean => StatisticalImputer::fill_mean(matrix, mask),
            Self::Median => StatisticalImputer::fill_median(matrix, mask),
            Self::Linear => LinearInterpolator::fill(matrix, mask),
        }
    }
}

impl std::fmt::Display for ImputationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
