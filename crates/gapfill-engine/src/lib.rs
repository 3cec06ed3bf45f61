//! Missing-Value Imputation and Statistics Engine
//!
//! A stateless engine that takes a tabular dataset with missing or
//! non-numeric cells and produces, for a fixed set of imputation strategies,
//! the reconstructed data plus before/after descriptive statistics and a
//! discrepancy metric quantifying how much each strategy altered the data.
//!
//! # Overview
//!
//! - **Normalization**: coerce arbitrary cell content into a numeric matrix
//!   with an explicit missingness mask, under documented parse rules
//! - **Statistics**: per-column count, mean, median, sample variance, and
//!   missing count over exactly the non-missing values
//! - **Imputation**: four independent, pure strategies (`zero`, `mean`,
//!   `median`, `linear` interpolation) applied to the same original input
//! - **Evaluation**: explicit, caller-selected comparison modes
//!   (self-consistency or held-out ground truth)
//! - **Typed errors**: every failure mode is classified, serialized as
//!   `{code, message}` for whatever transport layer sits above
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use gapfill_engine::{Pipeline, PipelineConfig};
//! use polars::prelude::*;
//!
//! let table = CsvReader::from_path("data.csv")?.finish()?;
//!
//! let report = Pipeline::with_defaults().run(&table)?;
//! for strategy in &report.strategies {
//!     println!("{}: aggregate error {:?}",
//!         strategy.strategy,
//!         strategy.error.as_ref().and_then(|e| e.aggregate));
//! }
//!
//! // Accept tables without missing values instead of rejecting them:
//! let config = PipelineConfig::builder()
//!     .require_missing_values(false)
//!     .build()?;
//! let report = Pipeline::new(config).run(&table)?;
//! ```
//!
//! The engine performs no I/O: the caller hands it an in-memory polars
//! `DataFrame` and renders or transmits the resulting [`AnalysisReport`].
//! File formats, HTTP routing, and presentation are the caller's concern.

pub mod config;
pub mod error;
pub mod evaluator;
pub mod imputers;
pub mod normalizer;
pub mod pipeline;
pub mod stats;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{ConfigValidationError, PipelineConfig, PipelineConfigBuilder};
pub use error::{EngineError, Result as EngineResult};
pub use evaluator::{
    ColumnError, ComparisonKind, ComparisonMode, ErrorEvaluator, ErrorMetric, ErrorReport,
};
pub use imputers::{ImputationStrategy, LinearInterpolator, StatisticalImputer};
pub use normalizer::TableNormalizer;
pub use pipeline::Pipeline;
pub use stats::StatisticsCalculator;
pub use types::{
    AnalysisReport, ColumnStats, ImputedColumn, MissingnessMask, NumericMatrix, StrategyFailure,
    StrategyReport,
};
