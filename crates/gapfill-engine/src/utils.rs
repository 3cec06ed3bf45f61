//! Shared helpers: cell parsing and slice statistics.
//!
//! Cell coercion is deliberately spelled out here instead of delegating to a
//! numeric library's defaults, so the rules stay identical no matter which
//! caller feeds the engine.

use polars::prelude::*;

// =============================================================================
// Cell Parsing
// =============================================================================

/// Check whether a string is a numeric literal: optional sign, digits with
/// at most one decimal point, optional exponent part.
///
/// Word forms `f64::from_str` would accept (`"inf"`, `"nan"`) are rejected;
/// a cell carrying those has no usable numeric value.
pub fn is_numeric_literal(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }

    let mut mantissa_digits = 0;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
        mantissa_digits += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
            mantissa_digits += 1;
        }
    }
    if mantissa_digits == 0 {
        return false;
    }

    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        i += 1;
        if matches!(bytes.get(i), Some(b'+') | Some(b'-')) {
            i += 1;
        }
        let mut exponent_digits = 0;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
            exponent_digits += 1;
        }
        if exponent_digits == 0 {
            return false;
        }
    }

    i == bytes.len()
}

/// Try to parse a string cell as a numeric value.
///
/// Surrounding whitespace is ignored; empty strings and non-literal text
/// yield `None`.
pub fn parse_numeric_literal(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if !is_numeric_literal(trimmed) {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

// =============================================================================
// Slice Statistics
// =============================================================================

/// Mean of a slice; `None` when empty.
pub fn slice_mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median of a slice; `None` when empty. Even-length slices take the mean
/// of the two middle values.
pub fn slice_median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Sample variance (`n - 1` divisor); `None` when fewer than two values.
pub fn slice_sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = slice_mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some(sum_sq / (values.len() - 1) as f64)
}
