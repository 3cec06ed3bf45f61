//! Configuration for the imputation pipeline.
//!
//! Uses the builder pattern for ergonomic setup and validates the
//! configuration before a pipeline is built around it.

use crate::evaluator::ErrorMetric;
use crate::imputers::ImputationStrategy;
use serde::{Deserialize, Serialize};

/// Configuration for one [`crate::pipeline::Pipeline`].
///
/// # Example
///
/// ```rust,ignore
/// use gapfill_engine::{ErrorMetric, PipelineConfig};
///
/// let config = PipelineConfig::builder()
///     .require_missing_values(false)
///     .error_metric(ErrorMetric::MeanSquared)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Reject tables that contain no missing cells.
    ///
    /// The engine exists to demonstrate imputation impact, so a fully
    /// populated table is rejected by default; callers that want to run the
    /// engine unconditionally can turn this off.
    /// Default: true
    pub require_missing_values: bool,

    /// Metric used for held-out evaluation runs.
    /// Default: MeanAbsolute
    pub error_metric: ErrorMetric,

    /// Strategies to run, in order.
    /// Default: all four (zero, mean, median, linear)
    pub strategies: Vec<ImputationStrategy>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            require_missing_values: true,
            error_metric: ErrorMetric::default(),
            strategies: ImputationStrategy::ALL.to_vec(),
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration builder.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.strategies.is_empty() {
            return Err(ConfigValidationError::NoStrategies);
        }
        for (i, strategy) in self.strategies.iter().enumerate() {
            if self.strategies[..i].contains(strategy) {
                return Err(ConfigValidationError::DuplicateStrategy(strategy.name()));
            }
        }
        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("No imputation strategies configured")]
    NoStrategies,

    #[error("Strategy '{0}' configured more than once")]
    DuplicateStrategy(&'static str),
}

/// Builder for [`PipelineConfig`].
#[derive(Debug, Clone, Default)]
pub struct PipelineConfigBuilder {
    require_missing_values: Option<bool>,
    error_metric: Option<ErrorMetric>,
    strategies: Option<Vec<ImputationStrategy>>,
}

impl PipelineConfigBuilder {
    /// Set whether a table without missing cells is rejected.
    pub fn require_missing_values(mut self, require: bool) -> Self {
        self.require_missing_values = Some(require);
        self
    }

    /// Set the metric used for held-out evaluation.
    pub fn error_metric(mut self, metric: ErrorMetric) -> Self {
        self.error_metric = Some(metric);
        self
    }

    /// Set the strategies to run.
    pub fn strategies(mut self, strategies: impl Into<Vec<ImputationStrategy>>) -> Self {
        self.strategies = Some(strategies.into());
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<PipelineConfig, ConfigValidationError> {
        let defaults = PipelineConfig::default();
        let config = PipelineConfig {
            require_missing_values: self
                .require_missing_values
                .unwrap_or(defaults.require_missing_values),
            error_metric: self.error_metric.unwrap_or(defaults.error_metric),
            strategies: self.strategies.unwrap_or(defaults.strategies),
        };
        config.validate()?;
        Ok(config)
    }
}
