//! Statistical imputation: zero, mean, and median fills.

use crate::types::{MissingnessMask, NumericMatrix};
use crate::utils::{slice_mean, slice_median};

/// Constant- and moment-based fills for masked cells.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Replace every masked cell with `0.0`.
    pub fn fill_zero(matrix: &NumericMatrix, mask: &MissingnessMask) -> NumericMatrix {
        Self::fill_per_column(matrix, mask, |_| Some(0.0))
    }

    /// Replace masked cells with the column mean of non-missing values.
    ///
    /// A column with no non-missing values has no mean; its masked cells
    /// stay `NaN`.
    pub fn fill_mean(matrix: &NumericMatrix, mask: &MissingnessMask) -> NumericMatrix {
        Self::fill_per_column(matrix, mask, slice_mean)
    }

    /// Replace masked cells with the column median of non-missing values.
    pub fn fill_median(matrix: &NumericMatrix, mask: &MissingnessMask) -> NumericMatrix {
        Self::fill_per_column(matrix, mask, slice_median)
    }

    /// Apply a per-column fill value derived from that column's non-missing
    /// values. Non-masked cells are copied through untouched.
    fn fill_per_column(
        matrix: &NumericMatrix,
        mask: &MissingnessMask,
        derive: impl Fn(&[f64]) -> Option<f64>,
    ) -> NumericMatrix {
        let mut out = matrix.clone();
        for col in 0..matrix.cols() {
            let values = matrix.column(col);
            let col_mask = mask.column(col);
            let present: Vec<f64> = values
                .iter()
                .zip(col_mask)
                .filter(|(_, missing)| !**missing)
                .map(|(v, _)| *v)
                .collect();

            let Some(fill) = derive(&present) else {
                continue;
            };

            let filled = values
                .iter()
                .zip(col_mask)
                .map(|(v, missing)| if *missing { fill } else { *v })
                .collect();
            out.set_column(col, filled);
        }
        out
    }
}
