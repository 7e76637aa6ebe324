//! Selection run configuration with builder pattern.
//!
//! [`SelectionConfig`] bundles everything one selection run needs besides the
//! oracle: the target size, the optimizer, an optional initial subset, an
//! optional knapsack budget, threading and logging.
//!
//! # Example
//!
//! ```
//! use subselect::SelectionConfig;
//! use subselect::optim::OptimizerKind;
//!
//! // Lazy greedy, everything else default
//! let config = SelectionConfig::builder().k(10).build().unwrap();
//!
//! // Stochastic greedy seeded with two fixed items
//! let config = SelectionConfig::builder()
//!     .k(25)
//!     .optimizer(OptimizerKind::stochastic(0.1, 7))
//!     .initial_subset(vec![3, 14])
//!     .build()
//!     .unwrap();
//! ```

use std::num::NonZeroUsize;

use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::budget::Budget;
use crate::error::ConfigError;
use crate::logger::Verbosity;
use crate::optim::{Optimizer, OptimizerKind, RunOptions};

/// Configuration for [`SubsetSelector`](super::SubsetSelector).
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct SelectionConfig {
    /// Number of items to select.
    pub k: usize,

    /// Selection strategy. Default: lazy greedy.
    #[builder(default)]
    #[serde(default)]
    pub optimizer: OptimizerKind,

    /// Items treated as already selected before the run starts.
    ///
    /// They are folded into the oracle state but are not part of the returned
    /// ranking and are not charged against the budget.
    pub initial_subset: Option<Vec<usize>>,

    /// Knapsack constraint. `None` means only `k` limits the selection.
    pub budget: Option<Budget>,

    /// Number of threads. `None` uses all available cores.
    pub n_threads: Option<NonZeroUsize>,

    /// Verbosity level. Default: `Silent`.
    #[builder(default)]
    #[serde(default)]
    pub verbosity: Verbosity,
}

impl<S: selection_config_builder::IsComplete> SelectionConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `k == 0` or the optimizer parameters are
    /// invalid for `k`. Checks that need the ground set size run at fit time.
    pub fn build(self) -> Result<SelectionConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl SelectionConfig {
    /// Check everything that does not depend on the oracle.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.optimizer.validate(self.k)
    }

    /// Check the parts that depend on the ground set size.
    pub(crate) fn validate_for(&self, n_items: usize) -> Result<(), ConfigError> {
        if self.k > n_items {
            return Err(ConfigError::KExceedsGroundSet { k: self.k, n: n_items });
        }
        if let Some(&index) = self
            .initial_subset
            .iter()
            .flatten()
            .find(|&&i| i >= n_items)
        {
            return Err(ConfigError::InitialSubsetOutOfRange { index, n: n_items });
        }
        if let Some(budget) = &self.budget {
            budget.validate_for(n_items)?;
        }
        Ok(())
    }

    /// Thread count in [`run_with_threads`](crate::run_with_threads) terms.
    #[inline]
    pub(crate) fn thread_count(&self) -> usize {
        self.n_threads.map_or(0, NonZeroUsize::get)
    }

    pub(crate) fn run_options(&self) -> RunOptions<'_> {
        RunOptions {
            budget: self.budget.as_ref(),
            verbosity: self.verbosity,
            ..RunOptions::default()
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SelectionConfig::builder().k(5).build().unwrap();
        assert_eq!(config.k, 5);
        assert_eq!(config.optimizer, OptimizerKind::lazy());
        assert_eq!(config.verbosity, Verbosity::Silent);
        assert!(config.initial_subset.is_none());
        assert!(config.budget.is_none());
        assert_eq!(config.thread_count(), 0);
    }

    #[test]
    fn zero_k_rejected() {
        let result = SelectionConfig::builder().k(0).build();
        assert_eq!(result, Err(ConfigError::InvalidK));
    }

    #[test]
    fn optimizer_validated_against_k() {
        let result = SelectionConfig::builder()
            .k(3)
            .optimizer(OptimizerKind::two_stage(4))
            .build();
        assert_eq!(result, Err(ConfigError::NaiveExceedsK { n_naive: 4, k: 3 }));

        let result = SelectionConfig::builder()
            .k(3)
            .optimizer(OptimizerKind::approximate_lazy(0.0))
            .build();
        assert_eq!(result, Err(ConfigError::InvalidBeta(0.0)));
    }

    #[test]
    fn ground_set_checks() {
        let config = SelectionConfig::builder()
            .k(2)
            .initial_subset(vec![0, 9])
            .build()
            .unwrap();
        assert_eq!(
            config.validate_for(1),
            Err(ConfigError::KExceedsGroundSet { k: 2, n: 1 })
        );
        assert_eq!(
            config.validate_for(5),
            Err(ConfigError::InitialSubsetOutOfRange { index: 9, n: 5 })
        );
        assert!(config.validate_for(10).is_ok());
    }

    #[test]
    fn budget_length_checked() {
        let config = SelectionConfig::builder()
            .k(1)
            .budget(Budget::new(vec![1.0; 3], 2.0).unwrap())
            .build()
            .unwrap();
        assert_eq!(
            config.validate_for(4),
            Err(ConfigError::CostLengthMismatch { costs: 3, n: 4 })
        );
    }

    #[test]
    fn json_round_trip() {
        let config = SelectionConfig::builder()
            .k(4)
            .optimizer(OptimizerKind::greedi(2, 3, OptimizerKind::stochastic(0.2, 1), OptimizerKind::lazy()))
            .n_threads(NonZeroUsize::new(2).unwrap())
            .verbosity(Verbosity::Info)
            .build()
            .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        let parsed: SelectionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn json_defaults() {
        let parsed: SelectionConfig =
            serde_json::from_str(r#"{"k": 3, "initial_subset": null, "budget": null, "n_threads": null}"#)
                .unwrap();
        assert_eq!(parsed.optimizer, OptimizerKind::lazy());
        assert_eq!(parsed.verbosity, Verbosity::Silent);
        assert!(parsed.validate().is_ok());
    }
}
