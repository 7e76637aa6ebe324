//! High-level selection entry point.
//!
//! [`SubsetSelector`] owns a validated [`SelectionConfig`] and runs it against
//! any oracle: ground set checks, initial subset, thread pool setup, then the
//! configured optimizer.

mod config;

pub use config::{SelectionConfig, SelectionConfigBuilder};

use ndarray::{Array2, ArrayView2, Axis};

use crate::error::{ConfigError, SelectionError};
use crate::optim::Optimizer;
use crate::oracle::GainOracle;
use crate::selection::Selection;
use crate::utils::{Parallelism, run_with_threads};

/// Runs a configured selection against an oracle.
///
/// # Example
///
/// ```
/// use subselect::{SelectionConfig, SubsetSelector};
/// use subselect::testing::WeightedCoverage;
///
/// let mut oracle = WeightedCoverage::new(
///     vec![vec![0, 1], vec![1, 2, 3], vec![3], vec![4, 5]],
///     vec![1.0, 2.0, 0.5, 1.5, 3.0, 0.25],
/// );
/// let selector = SubsetSelector::new(SelectionConfig::builder().k(2).build().unwrap()).unwrap();
/// let selection = selector.fit(&mut oracle).unwrap();
///
/// assert_eq!(selection.ranking, vec![1, 3]);
/// ```
#[derive(Debug, Clone)]
pub struct SubsetSelector {
    config: SelectionConfig,
}

impl SubsetSelector {
    /// Wrap a configuration, re-validating it.
    ///
    /// Configurations built with the builder are already valid; this also
    /// covers ones deserialized from JSON.
    pub fn new(config: SelectionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    /// Select from the whole ground set.
    ///
    /// The oracle is reset and seeded with the initial subset first, so it can
    /// be reused across fits.
    pub fn fit<O: GainOracle + Clone>(&self, oracle: &mut O) -> Result<Selection, SelectionError> {
        let candidates: Vec<usize> = (0..oracle.n_items()).collect();
        self.fit_from(oracle, &candidates)
    }

    /// Select from an explicit candidate pool.
    pub fn fit_from<O: GainOracle + Clone>(
        &self,
        oracle: &mut O,
        candidates: &[usize],
    ) -> Result<Selection, SelectionError> {
        self.config.validate_for(oracle.n_items())?;
        oracle.initialize(self.config.initial_subset.as_deref());

        run_with_threads(self.config.thread_count(), |parallelism| {
            self.fit_inner(oracle, candidates, parallelism)
        })
    }

    /// Select, then gather the selected rows of `data` in ranking order.
    ///
    /// `data` must have one row per ground set element.
    pub fn fit_transform<O: GainOracle + Clone>(
        &self,
        oracle: &mut O,
        data: ArrayView2<'_, f64>,
    ) -> Result<(Selection, Array2<f64>), SelectionError> {
        let n = oracle.n_items();
        if data.nrows() != n {
            return Err(ConfigError::DataRowMismatch {
                rows: data.nrows(),
                n,
            }
            .into());
        }
        let selection = self.fit(oracle)?;
        let rows = data.select(Axis(0), &selection.ranking);
        Ok((selection, rows))
    }

    /// Run the optimizer inside an already configured thread pool.
    fn fit_inner<O: GainOracle + Clone>(
        &self,
        oracle: &mut O,
        candidates: &[usize],
        parallelism: Parallelism,
    ) -> Result<Selection, SelectionError> {
        let options = self.config.run_options().with_parallelism(parallelism);
        self.config
            .optimizer
            .select_from(oracle, candidates, self.config.k, &options)
    }
}
