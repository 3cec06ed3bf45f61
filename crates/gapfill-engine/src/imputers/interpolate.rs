//! Linear interpolation over the row index.

use crate::types::{MissingnessMask, NumericMatrix};

/// Fills gaps by linear interpolation between the nearest non-missing
/// neighbors above and below, treating the row index as the axis.
///
/// Boundary behavior is explicit rather than inherited from a library
/// default: cells before the first or after the last non-missing value take
/// that nearest value (nearest-neighbor clamp, not line extension). A column
/// with no non-missing values stays all-`NaN`.
pub struct LinearInterpolator;

impl LinearInterpolator {
    /// Produce the interpolated reconstruction of `matrix`.
    pub fn fill(matrix: &NumericMatrix, mask: &MissingnessMask) -> NumericMatrix {
        let mut out = matrix.clone();
        for col in 0..matrix.cols() {
            let filled = Self::interpolate_column(matrix.column(col), mask.column(col));
            out.set_column(col, filled);
        }
        out
    }

    fn interpolate_column(values: &[f64], mask: &[bool]) -> Vec<f64> {
        let known: Vec<usize> = (0..values.len()).filter(|i| !mask[*i]).collect();
        if known.is_empty() {
            return values.to_vec();
        }

        let mut out = values.to_vec();
        for (i, cell) in out.iter_mut().enumerate() {
            if !mask[i] {
                continue;
            }
            // Index of the first known row at or after i.
            let next = known.partition_point(|k| *k < i);
            *cell = match (next.checked_sub(1), known.get(next)) {
                (Some(p), Some(n)) => {
                    let (lo, hi) = (known[p], *n);
                    let t = (i - lo) as f64 / (hi - lo) as f64;
                    values[lo] + (values[hi] - values[lo]) * t
                }
                // Before the first known value: clamp forward.
                (None, Some(n)) => values[*n],
                // After the last known value: clamp backward.
                (Some(p), None) => values[known[p]],
                (None, None) => unreachable!("known is non-empty"),
            };
        }
        out
    }
}
