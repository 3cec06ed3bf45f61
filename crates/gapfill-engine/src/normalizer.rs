//! Table normalization: raw DataFrame to numeric matrix plus mask.

use crate::error::{EngineError, Result};
use crate::types::{MissingnessMask, NumericMatrix};
use crate::utils::{is_numeric_dtype, parse_numeric_literal};
use polars::prelude::*;
use tracing::debug;

/// Coerces arbitrary cell content into a numeric matrix with an explicit
/// missingness mask.
///
/// Coercion rules, applied per cell:
/// - null cells are missing, with no parse attempt;
/// - numeric-dtype cells keep their value as `f64`, except a literal `NaN`
///   float which is missing;
/// - string cells are trimmed and must form a numeric literal
///   (see [`crate::utils::is_numeric_literal`]);
/// - boolean and any other dtype is non-numeric, hence missing.
///
/// Column order, row order, and shape are preserved exactly.
pub struct TableNormalizer;

impl TableNormalizer {
    /// Normalize a raw table.
    ///
    /// Fails with [`EngineError::EmptyTable`] when the table has zero rows
    /// or zero columns. Whether a table without any missing cells is
    /// acceptable is the pipeline's policy, not the normalizer's.
    pub fn normalize(df: &DataFrame) -> Result<(NumericMatrix, MissingnessMask)> {
        if df.height() == 0 || df.width() == 0 {
            return Err(EngineError::EmptyTable);
        }

        let mut names = Vec::with_capacity(df.width());
        let mut values = Vec::with_capacity(df.width());
        let mut mask = Vec::with_capacity(df.width());

        for column in df.get_columns() {
            let series = column.as_materialized_series();
            names.push(series.name().to_string());

            let mut col_values = Vec::with_capacity(series.len());
            let mut col_mask = Vec::with_capacity(series.len());
            for i in 0..series.len() {
                let parsed = Self::coerce_cell(&series.get(i)?);
                col_mask.push(parsed.is_none());
                col_values.push(parsed.unwrap_or(f64::NAN));
            }
            values.push(col_values);
            mask.push(col_mask);
        }

        let matrix = NumericMatrix::new(names, values);
        let mask = MissingnessMask::new(mask);
        debug!(
            rows = matrix.rows(),
            cols = matrix.cols(),
            missing = mask.total_missing(),
            "normalized table"
        );
        Ok((matrix, mask))
    }

    /// Coerce one cell; `None` marks it missing.
    fn coerce_cell(value: &AnyValue) -> Option<f64> {
        match value {
            AnyValue::Null => None,
            AnyValue::String(s) => parse_numeric_literal(s),
            AnyValue::StringOwned(s) => parse_numeric_literal(s.as_str()),
            v if is_numeric_dtype(&v.dtype()) => {
                v.try_extract::<f64>().ok().filter(|v| !v.is_nan())
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_preserves_shape_and_order() {
        let df = df![
            "a" => [1.0, 2.0, 3.0],
            "b" => ["x", "4", ""],
        ]
        .unwrap();

        let (matrix, mask) = TableNormalizer::normalize(&df).unwrap();
        assert_eq!(matrix.rows(), 3);
        assert_eq!(matrix.cols(), 2);
        assert_eq!(matrix.names(), &["a".to_string(), "b".to_string()]);
        assert_eq!(matrix.column(0), &[1.0, 2.0, 3.0]);
        assert_eq!(mask.column(0), &[false, false, false]);
        assert_eq!(mask.column(1), &[true, false, true]);
        assert_eq!(matrix.get(1, 1), 4.0);
    }

    #[test]
    fn test_normalize_is_idempotent_for_complete_numeric_input() {
        let df = df![
            "a" => [1i64, 2, 3],
            "b" => [0.5f64, 1.5, 2.5],
        ]
        .unwrap();

        let (matrix, mask) = TableNormalizer::normalize(&df).unwrap();
        assert_eq!(mask.total_missing(), 0);
        assert_eq!(matrix.column(0), &[1.0, 2.0, 3.0]);
        assert_eq!(matrix.column(1), &[0.5, 1.5, 2.5]);
    }

    #[test]
    fn test_normalize_marks_nulls_and_nan_missing() {
        let df = df![
            "a" => [Some(1.0), None, Some(f64::NAN)],
        ]
        .unwrap();

        let (matrix, mask) = TableNormalizer::normalize(&df).unwrap();
        assert_eq!(mask.column(0), &[false, true, true]);
        assert!(matrix.get(1, 0).is_nan());
        assert!(matrix.get(2, 0).is_nan());
    }

    #[test]
    fn test_normalize_booleans_are_missing() {
        let df = df![
            "flag" => [true, false],
        ]
        .unwrap();

        let (_, mask) = TableNormalizer::normalize(&df).unwrap();
        assert_eq!(mask.column(0), &[true, true]);
    }

    #[test]
    fn test_normalize_string_whitespace_and_signs() {
        let df = df![
            "v" => [" 2.5 ", "-1", "nan", "  "],
        ]
        .unwrap();

        let (matrix, mask) = TableNormalizer::normalize(&df).unwrap();
        assert_eq!(matrix.get(0, 0), 2.5);
        assert_eq!(matrix.get(1, 0), -1.0);
        assert_eq!(mask.column(0), &[false, false, true, true]);
    }

    #[test]
    fn test_normalize_empty_table_is_rejected() {
        let df = DataFrame::empty();
        let err = TableNormalizer::normalize(&df).unwrap_err();
        assert_eq!(err.error_code(), "EMPTY_TABLE");

        let no_rows = df!["a" => Vec::<f64>::new()].unwrap();
        let err = TableNormalizer::normalize(&no_rows).unwrap_err();
        assert_eq!(err.error_code(), "EMPTY_TABLE");
    }
}
