//! Custom error types for the imputation engine.
//!
//! The engine classifies every failure mode explicitly instead of
//! stringifying whatever went wrong. Fatal errors abort a pipeline run with
//! no partial result; non-fatal errors are embedded in the structured result
//! next to the strategies that did succeed.
//!
//! Errors are serializable as `{code, message}` so a transport layer (HTTP,
//! CLI) can map them to its own surface without the engine deciding status
//! codes or exit codes.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the imputation engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Source data could not be parsed into a table at all.
    ///
    /// Raised by the I/O glue (e.g. a CSV reader) before normalization.
    #[error("Input could not be read as a table: {0}")]
    MalformedInput(String),

    /// The table has zero rows or zero columns.
    #[error("Table is empty (zero rows or zero columns)")]
    EmptyTable,

    /// Normalization found no missing cells, so there is nothing to impute.
    ///
    /// Policy-gated: callers that want to run the engine unconditionally can
    /// disable the check via `PipelineConfig`.
    #[error("Table has no missing values; nothing to impute")]
    NoMissingValues,

    /// Two matrices that must share a shape do not.
    #[error("Shape mismatch: expected {expected_rows}x{expected_cols}, got {actual_rows}x{actual_cols}")]
    ShapeMismatch {
        expected_rows: usize,
        expected_cols: usize,
        actual_rows: usize,
        actual_cols: usize,
    },

    /// A single strategy could not produce a defined result.
    ///
    /// Non-fatal: reported per strategy, never aborts the whole pipeline.
    #[error("Strategy '{strategy}' failed: {reason}")]
    StrategyComputation { strategy: String, reason: String },

    /// A strategy altered a cell that was not missing.
    ///
    /// Always a defect in the engine, never expected in correct operation.
    #[error(
        "Strategy '{strategy}' altered non-missing cell at column '{column}', row {row}"
    )]
    InternalInvariant {
        strategy: String,
        column: String,
        row: usize,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    /// Get a stable error code for caller-side handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedInput(_) => "MALFORMED_INPUT",
            Self::EmptyTable => "EMPTY_TABLE",
            Self::NoMissingValues => "NO_MISSING_VALUES",
            Self::ShapeMismatch { .. } => "SHAPE_MISMATCH",
            Self::StrategyComputation { .. } => "STRATEGY_COMPUTATION_FAILED",
            Self::InternalInvariant { .. } => "INTERNAL_INVARIANT_VIOLATION",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
        }
    }

    /// Whether this error aborts the whole pipeline.
    ///
    /// Strategy-level failures are captured in the per-strategy report
    /// instead of propagating; everything else is fatal.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::StrategyComputation { .. } | Self::InternalInvariant { .. }
        )
    }
}

/// Serialize as a `{code, message}` struct for transport layers.
impl Serialize for EngineError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("EngineError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(EngineError::EmptyTable.error_code(), "EMPTY_TABLE");
        assert_eq!(
            EngineError::NoMissingValues.error_code(),
            "NO_MISSING_VALUES"
        );
        assert_eq!(
            EngineError::MalformedInput("bad csv".to_string()).error_code(),
            "MALFORMED_INPUT"
        );
    }

    #[test]
    fn test_is_fatal() {
        assert!(EngineError::EmptyTable.is_fatal());
        assert!(EngineError::NoMissingValues.is_fatal());
        assert!(
            !EngineError::StrategyComputation {
                strategy: "mean".to_string(),
                reason: "no values".to_string(),
            }
            .is_fatal()
        );
        assert!(
            !EngineError::InternalInvariant {
                strategy: "zero".to_string(),
                column: "a".to_string(),
                row: 3,
            }
            .is_fatal()
        );
    }

    #[test]
    fn test_error_serialization() {
        let error = EngineError::InternalInvariant {
            strategy: "mean".to_string(),
            column: "age".to_string(),
            row: 7,
        };
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("INTERNAL_INVARIANT_VIOLATION"));
        assert!(json.contains("age"));
    }
}
