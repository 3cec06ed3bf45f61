//! Pipeline orchestration: normalize, validate, impute, evaluate, assemble.

use crate::config::PipelineConfig;
use crate::error::{EngineError, Result};
use crate::evaluator::{ComparisonMode, ErrorEvaluator};
use crate::imputers::ImputationStrategy;
use crate::normalizer::TableNormalizer;
use crate::stats::StatisticsCalculator;
use crate::types::{AnalysisReport, MissingnessMask, NumericMatrix, StrategyReport};
use polars::prelude::*;
use tracing::{debug, info, warn};

/// Single-pass orchestrator over the engine components.
///
/// Stages: normalize, validate, before-stats, then per strategy impute /
/// after-stats / error report, then assemble. A failure at normalize or
/// validate aborts the run with no partial result; a failure inside one
/// strategy is captured in that strategy's report and the rest still run.
///
/// The pipeline holds no state across invocations; every run builds
/// request-local matrices that are never mutated after creation, so one
/// pipeline value can serve concurrent callers.
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Build a pipeline around a validated configuration.
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Build a pipeline with the default configuration.
    pub fn with_defaults() -> Self {
        Self::new(PipelineConfig::default())
    }

    /// Run all configured strategies over a raw table, reporting errors in
    /// self-consistency mode (no ground truth available).
    pub fn run(&self, table: &DataFrame) -> Result<AnalysisReport> {
        self.execute(table, None)
    }

    /// Run with a ground truth table for held-out evaluation.
    ///
    /// `truth` must be a fully numeric table of the same shape as `table`,
    /// carrying the true values for the cells that were deliberately masked
    /// before the call. Errors use the configured metric over masked cells.
    pub fn run_with_ground_truth(
        &self,
        table: &DataFrame,
        truth: &DataFrame,
    ) -> Result<AnalysisReport> {
        let (truth_matrix, _) = TableNormalizer::normalize(truth)?;
        self.execute(table, Some(truth_matrix))
    }

    fn execute(
        &self,
        table: &DataFrame,
        truth: Option<NumericMatrix>,
    ) -> Result<AnalysisReport> {
        let (matrix, mask) = TableNormalizer::normalize(table)?;

        if let Some(ref truth) = truth
            && !matrix.same_shape(truth)
        {
            return Err(EngineError::ShapeMismatch {
                expected_rows: matrix.rows(),
                expected_cols: matrix.cols(),
                actual_rows: truth.rows(),
                actual_cols: truth.cols(),
            });
        }

        let total_missing = mask.total_missing();
        if total_missing == 0 && self.config.require_missing_values {
            return Err(EngineError::NoMissingValues);
        }
        info!(
            rows = matrix.rows(),
            cols = matrix.cols(),
            missing = total_missing,
            "running imputation pipeline"
        );

        let stats_before = StatisticsCalculator::compute(&matrix, &mask);

        let strategies = self
            .config
            .strategies
            .iter()
            .map(|strategy| self.run_strategy(*strategy, &matrix, &mask, truth.as_ref()))
            .collect();

        Ok(AnalysisReport {
            rows: matrix.rows(),
            columns: matrix.names().to_vec(),
            total_missing,
            stats_before,
            strategies,
        })
    }

    /// Run one strategy against the original matrix and mask.
    ///
    /// Strategy failures never propagate; they become the report's
    /// `failure` field so the remaining strategies stay unaffected.
    fn run_strategy(
        &self,
        strategy: ImputationStrategy,
        matrix: &NumericMatrix,
        mask: &MissingnessMask,
        truth: Option<&NumericMatrix>,
    ) -> StrategyReport {
        debug!(strategy = strategy.name(), "applying strategy");
        let reconstructed = strategy.apply(matrix, mask);

        let mode = match truth {
            Some(truth) => ComparisonMode::HeldOut {
                truth,
                metric: self.config.error_metric,
            },
            None => ComparisonMode::SelfConsistency,
        };

        match ErrorEvaluator::evaluate(strategy.name(), matrix, mask, &reconstructed, mode) {
            Ok(error) => {
                let mask_after = MissingnessMask::from_nan(&reconstructed);
                let undefined_columns = (0..reconstructed.cols())
                    .filter(|c| mask_after.column_missing_count(*c) > 0)
                    .map(|c| reconstructed.names()[c].clone())
                    .collect::<Vec<_>>();
                if !undefined_columns.is_empty() {
                    warn!(
                        strategy = strategy.name(),
                        columns = ?undefined_columns,
                        "strategy left columns undefined"
                    );
                }
                StrategyReport {
                    strategy: strategy.name().to_string(),
                    stats_after: StatisticsCalculator::compute(&reconstructed, &mask_after),
                    imputed: reconstructed.to_imputed_columns(),
                    error: Some(error),
                    undefined_columns,
                    failure: None,
                }
            }
            Err(err) => {
                warn!(strategy = strategy.name(), error = %err, "strategy failed");
                StrategyReport {
                    strategy: strategy.name().to_string(),
                    imputed: Vec::new(),
                    stats_after: Vec::new(),
                    error: None,
                    undefined_columns: Vec::new(),
                    failure: Some((&err).into()),
                }
            }
        }
    }
}
