//! Discrepancy metrics between an original matrix and a reconstruction.
//!
//! True values for originally-missing cells are unknown, so "error" is only
//! meaningful relative to an explicit baseline. The evaluator therefore
//! offers two caller-selected comparison modes and records which one was
//! used in every report, rather than silently picking one:
//!
//! - [`ComparisonMode::SelfConsistency`] compares the reconstruction against
//!   a zero-filled copy of the original. This is a magnitude-of-change
//!   indicator, not an accuracy measure.
//! - [`ComparisonMode::HeldOut`] compares masked cells against a caller-
//!   supplied ground truth matrix, for evaluation and testing, with a
//!   selectable metric.

use crate::error::{EngineError, Result};
use crate::types::{MissingnessMask, NumericMatrix};
use crate::utils::slice_mean;
use serde::{Deserialize, Serialize};

/// Metric used when ground truth is available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorMetric {
    /// Mean absolute error.
    #[default]
    MeanAbsolute,
    /// Mean squared error.
    MeanSquared,
}

impl ErrorMetric {
    fn apply(&self, diff: f64) -> f64 {
        match self {
            Self::MeanAbsolute => diff.abs(),
            Self::MeanSquared => diff * diff,
        }
    }
}

/// Which baseline a report was computed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonKind {
    SelfConsistency,
    HeldOut,
}

/// Baseline selection for one evaluation.
#[derive(Debug, Clone, Copy)]
pub enum ComparisonMode<'a> {
    /// Compare against a zero-filled copy of the original, over all rows.
    SelfConsistency,
    /// Compare masked cells against deliberately withheld ground truth.
    HeldOut {
        truth: &'a NumericMatrix,
        metric: ErrorMetric,
    },
}

/// Discrepancy value for one column; `None` when undefined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnError {
    pub name: String,
    pub value: Option<f64>,
}

/// Per-column and whole-table discrepancy for one strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub comparison: ComparisonKind,
    pub metric: ErrorMetric,
    pub per_column: Vec<ColumnError>,
    /// Unweighted mean of the defined per-column values.
    pub aggregate: Option<f64>,
}

/// Compares reconstructions against the original matrix.
pub struct ErrorEvaluator;

impl ErrorEvaluator {
    /// Evaluate one strategy's reconstruction.
    ///
    /// Always verifies first that the strategy preserved every non-missing
    /// cell; a violation is an engine defect and fails loudly as
    /// [`EngineError::InternalInvariant`].
    pub fn evaluate(
        strategy: &str,
        original: &NumericMatrix,
        mask: &MissingnessMask,
        reconstructed: &NumericMatrix,
        mode: ComparisonMode<'_>,
    ) -> Result<ErrorReport> {
        Self::verify_preserved(strategy, original, mask, reconstructed)?;
        match mode {
            ComparisonMode::SelfConsistency => {
                Ok(Self::self_consistency(original, mask, reconstructed))
            }
            ComparisonMode::HeldOut { truth, metric } => {
                Self::held_out(original, mask, reconstructed, truth, metric)
            }
        }
    }

    /// Check that the reconstruction left every non-missing cell untouched.
    pub fn verify_preserved(
        strategy: &str,
        original: &NumericMatrix,
        mask: &MissingnessMask,
        reconstructed: &NumericMatrix,
    ) -> Result<()> {
        if !original.same_shape(reconstructed) {
            return Err(EngineError::ShapeMismatch {
                expected_rows: original.rows(),
                expected_cols: original.cols(),
                actual_rows: reconstructed.rows(),
                actual_cols: reconstructed.cols(),
            });
        }
        for col in 0..original.cols() {
            for row in 0..original.rows() {
                if !mask.is_missing(row, col)
                    && original.get(row, col).to_bits() != reconstructed.get(row, col).to_bits()
                {
                    return Err(EngineError::InternalInvariant {
                        strategy: strategy.to_string(),
                        column: original.names()[col].clone(),
                        row,
                    });
                }
            }
        }
        Ok(())
    }

    /// Mean absolute difference against a zero-filled original, per column
    /// over all rows. Non-masked rows contribute zero once preservation
    /// holds, so this measures how far the fills sit from the zero baseline.
    fn self_consistency(
        original: &NumericMatrix,
        mask: &MissingnessMask,
        reconstructed: &NumericMatrix,
    ) -> ErrorReport {
        let per_column = (0..original.cols())
            .map(|col| {
                let diffs: Vec<f64> = (0..original.rows())
                    .map(|row| {
                        let base = if mask.is_missing(row, col) {
                            0.0
                        } else {
                            original.get(row, col)
                        };
                        (reconstructed.get(row, col) - base).abs()
                    })
                    .collect();
                let defined = diffs.iter().all(|d| !d.is_nan());
                ColumnError {
                    name: original.names()[col].clone(),
                    value: if defined { slice_mean(&diffs) } else { None },
                }
            })
            .collect();

        Self::assemble(ComparisonKind::SelfConsistency, ErrorMetric::MeanAbsolute, per_column)
    }

    /// True reconstruction error at masked cells against withheld truth.
    ///
    /// A column with no masked cells reconstructed nothing and gets `None`,
    /// as does a column whose truth or reconstruction is undefined there.
    fn held_out(
        original: &NumericMatrix,
        mask: &MissingnessMask,
        reconstructed: &NumericMatrix,
        truth: &NumericMatrix,
        metric: ErrorMetric,
    ) -> Result<ErrorReport> {
        if !original.same_shape(truth) {
            return Err(EngineError::ShapeMismatch {
                expected_rows: original.rows(),
                expected_cols: original.cols(),
                actual_rows: truth.rows(),
                actual_cols: truth.cols(),
            });
        }

        let per_column = (0..original.cols())
            .map(|col| {
                let diffs: Vec<f64> = (0..original.rows())
                    .filter(|row| mask.is_missing(*row, col))
                    .map(|row| metric.apply(reconstructed.get(row, col) - truth.get(row, col)))
                    .collect();
                let defined = !diffs.is_empty() && diffs.iter().all(|d| !d.is_nan());
                ColumnError {
                    name: original.names()[col].clone(),
                    value: if defined { slice_mean(&diffs) } else { None },
                }
            })
            .collect();

        Ok(Self::assemble(ComparisonKind::HeldOut, metric, per_column))
    }

    fn assemble(
        comparison: ComparisonKind,
        metric: ErrorMetric,
        per_column: Vec<ColumnError>,
    ) -> ErrorReport {
        let defined: Vec<f64> = per_column.iter().filter_map(|c| c.value).collect();
        ErrorReport {
            comparison,
            metric,
            aggregate: slice_mean(&defined),
            per_column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imputers::ImputationStrategy;
    use pretty_assertions::assert_eq;

    fn fixture() -> (NumericMatrix, MissingnessMask) {
        let matrix = NumericMatrix::new(
            vec!["a".to_string()],
            vec![vec![1.0, f64::NAN, 5.0]],
        );
        let mask = MissingnessMask::from_nan(&matrix);
        (matrix, mask)
    }

    #[test]
    fn test_self_consistency_mean_strategy() {
        let (matrix, mask) = fixture();
        let recon = ImputationStrategy::Mean.apply(&matrix, &mask);
        let report = ErrorEvaluator::evaluate(
            "mean",
            &matrix,
            &mask,
            &recon,
            ComparisonMode::SelfConsistency,
        )
        .unwrap();

        // Only the masked row differs from the zero baseline: |3 - 0| / 3 rows.
        assert_eq!(report.comparison, ComparisonKind::SelfConsistency);
        assert_eq!(report.per_column[0].value, Some(1.0));
        assert_eq!(report.aggregate, Some(1.0));
    }

    #[test]
    fn test_self_consistency_zero_strategy_is_zero() {
        let (matrix, mask) = fixture();
        let recon = ImputationStrategy::Zero.apply(&matrix, &mask);
        let report = ErrorEvaluator::evaluate(
            "zero",
            &matrix,
            &mask,
            &recon,
            ComparisonMode::SelfConsistency,
        )
        .unwrap();
        assert_eq!(report.per_column[0].value, Some(0.0));
    }

    #[test]
    fn test_self_consistency_undefined_column() {
        let matrix = NumericMatrix::new(
            vec!["empty".to_string()],
            vec![vec![f64::NAN, f64::NAN]],
        );
        let mask = MissingnessMask::from_nan(&matrix);
        let recon = ImputationStrategy::Mean.apply(&matrix, &mask);
        let report = ErrorEvaluator::evaluate(
            "mean",
            &matrix,
            &mask,
            &recon,
            ComparisonMode::SelfConsistency,
        )
        .unwrap();
        assert_eq!(report.per_column[0].value, None);
        assert_eq!(report.aggregate, None);
    }

    #[test]
    fn test_invariant_violation_is_detected() {
        let (matrix, mask) = fixture();
        let tampered = NumericMatrix::new(
            vec!["a".to_string()],
            vec![vec![1.0, 3.0, 99.0]],
        );
        let err = ErrorEvaluator::evaluate(
            "mean",
            &matrix,
            &mask,
            &tampered,
            ComparisonMode::SelfConsistency,
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "INTERNAL_INVARIANT_VIOLATION");
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_held_out_mae_and_mse() {
        let (matrix, mask) = fixture();
        // True value at the masked row is 4; mean imputation fills 3.
        let truth = NumericMatrix::new(
            vec!["a".to_string()],
            vec![vec![1.0, 4.0, 5.0]],
        );
        let recon = ImputationStrategy::Mean.apply(&matrix, &mask);

        let mae = ErrorEvaluator::evaluate(
            "mean",
            &matrix,
            &mask,
            &recon,
            ComparisonMode::HeldOut {
                truth: &truth,
                metric: ErrorMetric::MeanAbsolute,
            },
        )
        .unwrap();
        assert_eq!(mae.per_column[0].value, Some(1.0));

        let mse = ErrorEvaluator::evaluate(
            "mean",
            &matrix,
            &mask,
            &recon,
            ComparisonMode::HeldOut {
                truth: &truth,
                metric: ErrorMetric::MeanSquared,
            },
        )
        .unwrap();
        assert_eq!(mse.per_column[0].value, Some(1.0));
        assert_eq!(mse.metric, ErrorMetric::MeanSquared);
    }

    #[test]
    fn test_held_out_shape_mismatch() {
        let (matrix, mask) = fixture();
        let truth = NumericMatrix::new(vec!["a".to_string()], vec![vec![1.0]]);
        let recon = ImputationStrategy::Zero.apply(&matrix, &mask);
        let err = ErrorEvaluator::evaluate(
            "zero",
            &matrix,
            &mask,
            &recon,
            ComparisonMode::HeldOut {
                truth: &truth,
                metric: ErrorMetric::MeanAbsolute,
            },
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "SHAPE_MISMATCH");
    }

    #[test]
    fn test_held_out_column_without_masked_cells_is_undefined() {
        let matrix = NumericMatrix::new(
            vec!["full".to_string(), "gappy".to_string()],
            vec![vec![1.0, 2.0], vec![f64::NAN, 2.0]],
        );
        let mask = MissingnessMask::from_nan(&matrix);
        let truth = NumericMatrix::new(
            vec!["full".to_string(), "gappy".to_string()],
            vec![vec![1.0, 2.0], vec![3.0, 2.0]],
        );
        let recon = ImputationStrategy::Zero.apply(&matrix, &mask);
        let report = ErrorEvaluator::evaluate(
            "zero",
            &matrix,
            &mask,
            &recon,
            ComparisonMode::HeldOut {
                truth: &truth,
                metric: ErrorMetric::MeanAbsolute,
            },
        )
        .unwrap();
        assert_eq!(report.per_column[0].value, None);
        assert_eq!(report.per_column[1].value, Some(3.0));
        assert_eq!(report.aggregate, Some(3.0));
    }
}
