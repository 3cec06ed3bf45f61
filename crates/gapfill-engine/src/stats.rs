//! Per-column descriptive statistics over a masked numeric matrix.

use crate::types::{ColumnStats, MissingnessMask, NumericMatrix};
use crate::utils::{slice_mean, slice_median, slice_sample_variance};

/// Computes descriptive statistics for every column of a matrix.
///
/// Pure and deterministic: identical inputs always yield identical outputs,
/// so results can be recomputed freely for the "before" state and for each
/// strategy's "after" state.
pub struct StatisticsCalculator;

impl StatisticsCalculator {
    /// Compute stats for all columns, in matrix column order.
    ///
    /// `count` covers exactly the cells whose mask is `false`; the moments
    /// are taken over those cells only. A column with no usable values gets
    /// `count = 0` and undefined moments rather than an error.
    pub fn compute(matrix: &NumericMatrix, mask: &MissingnessMask) -> Vec<ColumnStats> {
        (0..matrix.cols())
            .map(|c| Self::compute_column(matrix, mask, c))
            .collect()
    }

    fn compute_column(
        matrix: &NumericMatrix,
        mask: &MissingnessMask,
        idx: usize,
    ) -> ColumnStats {
        let present: Vec<f64> = matrix
            .column(idx)
            .iter()
            .zip(mask.column(idx))
            .filter(|(_, missing)| !**missing)
            .map(|(v, _)| *v)
            .collect();

        ColumnStats {
            name: matrix.names()[idx].clone(),
            count: present.len(),
            mean: slice_mean(&present),
            median: slice_median(&present),
            variance: slice_sample_variance(&present),
            missing_count: mask.column_missing_count(idx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn matrix_and_mask() -> (NumericMatrix, MissingnessMask) {
        let matrix = NumericMatrix::new(
            vec!["a".to_string(), "b".to_string()],
            vec![
                vec![1.0, f64::NAN, 5.0, 4.0],
                vec![f64::NAN, f64::NAN, f64::NAN, f64::NAN],
            ],
        );
        let mask = MissingnessMask::from_nan(&matrix);
        (matrix, mask)
    }

    #[test]
    fn test_compute_basic_column() {
        let (matrix, mask) = matrix_and_mask();
        let stats = StatisticsCalculator::compute(&matrix, &mask);

        let a = &stats[0];
        assert_eq!(a.name, "a");
        assert_eq!(a.count, 3);
        assert_eq!(a.missing_count, 1);
        assert!((a.mean.unwrap() - 10.0 / 3.0).abs() < 1e-12);
        assert_eq!(a.median, Some(4.0));
        // Sample variance of [1, 5, 4]: mean 10/3, sum sq 26/3, var 13/3
        assert!((a.variance.unwrap() - 13.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_compute_all_missing_column() {
        let (matrix, mask) = matrix_and_mask();
        let stats = StatisticsCalculator::compute(&matrix, &mask);

        let b = &stats[1];
        assert_eq!(b.count, 0);
        assert_eq!(b.missing_count, 4);
        assert_eq!(b.mean, None);
        assert_eq!(b.median, None);
        assert_eq!(b.variance, None);
    }

    #[test]
    fn test_count_plus_missing_equals_rows() {
        let (matrix, mask) = matrix_and_mask();
        for stats in StatisticsCalculator::compute(&matrix, &mask) {
            assert_eq!(stats.count + stats.missing_count, matrix.rows());
        }
    }

    #[test]
    fn test_single_value_variance_undefined() {
        let matrix = NumericMatrix::new(
            vec!["a".to_string()],
            vec![vec![7.0, f64::NAN, f64::NAN]],
        );
        let mask = MissingnessMask::from_nan(&matrix);
        let stats = StatisticsCalculator::compute(&matrix, &mask);
        assert_eq!(stats[0].count, 1);
        assert_eq!(stats[0].mean, Some(7.0));
        assert_eq!(stats[0].variance, None);
    }

    #[test]
    fn test_compute_is_deterministic() {
        let (matrix, mask) = matrix_and_mask();
        let first = StatisticsCalculator::compute(&matrix, &mask);
        let second = StatisticsCalculator::compute(&matrix, &mask);
        assert_eq!(first, second);
    }
}
