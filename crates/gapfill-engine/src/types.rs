//! Core data types shared across the engine.
//!
//! All values here are request-scoped: created during a single pipeline
//! invocation and discarded afterwards. Nothing is shared or persisted.

use serde::{Deserialize, Serialize};

/// A numeric view of a table: named columns of `f64` values, column-major.
///
/// Cells that lack a usable numeric value hold `f64::NAN`; which cells those
/// are is tracked separately by a [`MissingnessMask`] of identical shape.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericMatrix {
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl NumericMatrix {
    /// Build a matrix from named columns. All columns must share a length.
    pub fn new(names: Vec<String>, columns: Vec<Vec<f64>>) -> Self {
        debug_assert_eq!(names.len(), columns.len());
        if let Some(first) = columns.first() {
            debug_assert!(columns.iter().all(|c| c.len() == first.len()));
        }
        Self { names, columns }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.columns.len()
    }

    /// Ordered column names.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Values of one column.
    pub fn column(&self, idx: usize) -> &[f64] {
        &self.columns[idx]
    }

    /// Single cell value.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.columns[col][row]
    }

    /// Replace one column's values, keeping the name.
    pub(crate) fn set_column(&mut self, idx: usize, values: Vec<f64>) {
        debug_assert_eq!(values.len(), self.rows());
        self.columns[idx] = values;
    }

    /// Whether another matrix has the same row and column counts.
    pub fn same_shape(&self, other: &NumericMatrix) -> bool {
        self.rows() == other.rows() && self.cols() == other.cols()
    }

    /// Convert to serializable per-column output, `NaN` becoming `null`.
    pub fn to_imputed_columns(&self) -> Vec<ImputedColumn> {
        self.names
            .iter()
            .zip(&self.columns)
            .map(|(name, values)| ImputedColumn {
                name: name.clone(),
                values: values
                    .iter()
                    .map(|v| if v.is_nan() { None } else { Some(*v) })
                    .collect(),
            })
            .collect()
    }
}

/// Boolean matrix marking cells that lack a usable numeric value.
///
/// Derived once from the raw table and never redefined afterwards: imputation
/// strategies read it but must not decide anew which cells were missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingnessMask {
    columns: Vec<Vec<bool>>,
}

impl MissingnessMask {
    pub fn new(columns: Vec<Vec<bool>>) -> Self {
        Self { columns }
    }

    /// Mark every `NaN` cell of a matrix as missing.
    ///
    /// Used to rebuild an effective mask after imputation, where a cell a
    /// strategy could not fill still counts as missing for statistics.
    pub fn from_nan(matrix: &NumericMatrix) -> Self {
        Self {
            columns: (0..matrix.cols())
                .map(|c| matrix.column(c).iter().map(|v| v.is_nan()).collect())
                .collect(),
        }
    }

    pub fn rows(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn cols(&self) -> usize {
        self.columns.len()
    }

    /// Mask of one column.
    pub fn column(&self, idx: usize) -> &[bool] {
        &self.columns[idx]
    }

    /// Whether a single cell is missing.
    pub fn is_missing(&self, row: usize, col: usize) -> bool {
        self.columns[col][row]
    }

    /// Missing cells in one column.
    pub fn column_missing_count(&self, idx: usize) -> usize {
        self.columns[idx].iter().filter(|m| **m).count()
    }

    /// Missing cells in the whole table.
    pub fn total_missing(&self) -> usize {
        (0..self.cols()).map(|c| self.column_missing_count(c)).sum()
    }
}

/// Descriptive statistics for one column, computed over non-missing values.
///
/// `mean`/`median`/`variance` are `None` when undefined (no usable values;
/// for `variance`, fewer than two). Variance is the sample variance
/// (`n - 1` divisor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub name: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub variance: Option<f64>,
    pub missing_count: usize,
}

/// One column of reconstructed output; residual undefined cells are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImputedColumn {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// A non-fatal failure captured for a single strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyFailure {
    pub code: String,
    pub message: String,
}

impl From<&crate::error::EngineError> for StrategyFailure {
    fn from(err: &crate::error::EngineError) -> Self {
        Self {
            code: err.error_code().to_string(),
            message: err.to_string(),
        }
    }
}

/// Outcome of one imputation strategy over the original table.
///
/// Either the reconstruction fields are populated, or `failure` is set and
/// the rest is empty; other strategies are unaffected either way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyReport {
    /// Strategy name (`zero`, `mean`, `median`, `linear`).
    pub strategy: String,
    /// Reconstructed table, column order matching the input.
    pub imputed: Vec<ImputedColumn>,
    /// Statistics recomputed over the reconstruction.
    pub stats_after: Vec<ColumnStats>,
    /// Discrepancy metric versus the original.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<crate::evaluator::ErrorReport>,
    /// Columns the strategy could not define any value for (all-missing).
    pub undefined_columns: Vec<String>,
    /// Set when the strategy failed entirely; never aborts the pipeline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<StrategyFailure>,
}

/// The assembled result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Row count of the normalized table.
    pub rows: usize,
    /// Ordered column names retained after normalization.
    pub columns: Vec<String>,
    /// Total cells marked missing by normalization.
    pub total_missing: usize,
    /// Per-column statistics before any imputation.
    pub stats_before: Vec<ColumnStats>,
    /// One report per strategy, in configured order.
    pub strategies: Vec<StrategyReport>,
}
