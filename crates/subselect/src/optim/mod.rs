//! Greedy optimizers for submodular selection.
//!
//! Every optimizer drives a [`GainOracle`] toward a size-k subset by asking for
//! marginal gains and committing the best candidate it finds.
//!
//! # Available Optimizers
//!
//! | Optimizer | Description | Oracle calls |
//! |-----------|-------------|--------------|
//! | [`NaiveGreedy`] | Full scan every round | O(k·n) |
//! | [`LazyGreedy`] | Cached upper bounds in a priority queue, exact | O(n) + re-evaluations |
//! | [`ApproximateLazyGreedy`] | Lazy, accepts gains within a factor `beta` | fewer re-evaluations |
//! | [`TwoStageGreedy`] | Naive for `n_naive` rounds, then lazy | |
//! | [`StochasticGreedy`] | Arg-max over a random sample each round | O(k·s) |
//! | [`SampleGreedy`] | Lazy greedy over one random subsample | |
//! | [`ModularGreedy`] | Top-k by initial gains | O(n + k) |
//! | [`GreeDi`] | Two-level selection over random partitions | |
//! | [`SieveGreedy`] | Single pass over a stream | O(n · guesses) |
//! | [`BidirectionalGreedy`] | Randomized double greedy for non-monotone objectives | O(n) |
//!
//! [`OptimizerKind`] is the closed set of optimizers that only need a
//! [`GainOracle`]. [`BidirectionalGreedy`] additionally needs removals and
//! takes a [`ReversibleOracle`](crate::oracle::ReversibleOracle) directly.

mod bidirectional;
mod greedi;
mod lazy;
mod modular;
mod naive;
mod sieve;
mod stochastic;

pub use bidirectional::BidirectionalGreedy;
pub use greedi::{GreeDi, Partition};
pub use lazy::{ApproximateLazyGreedy, LazyGreedy, TwoStageGreedy};
pub use modular::ModularGreedy;
pub use naive::NaiveGreedy;
pub use sieve::{SieveGreedy, SieveStreaming};
pub use stochastic::{SampleGreedy, StochasticGreedy};

use std::mem;

use serde::{Deserialize, Serialize};

use crate::budget::{Budget, Spend};
use crate::error::{ConfigError, SelectionError};
use crate::logger::{SelectionLogger, Verbosity};
use crate::oracle::GainOracle;
use crate::selection::Selection;
use crate::utils::Parallelism;

/// Smallest chunk handed to one worker during a gain scan.
const MIN_SCAN_CHUNK: usize = 256;

// =============================================================================
// RunOptions
// =============================================================================

/// Cross-cutting settings for one optimizer run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions<'a> {
    /// Optional knapsack constraint.
    pub budget: Option<&'a Budget>,
    /// Whether gain scans may fan out across rayon workers.
    pub parallelism: Parallelism,
    /// Logging level.
    pub verbosity: Verbosity,
}

impl<'a> RunOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_budget(mut self, budget: &'a Budget) -> Self {
        self.budget = Some(budget);
        self
    }

    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }
}

// =============================================================================
// Optimizer trait
// =============================================================================

/// A selection strategy over a [`GainOracle`].
///
/// Implementors provide [`run`](Self::run); callers use
/// [`select`](Self::select) or [`select_from`](Self::select_from), which
/// validate the configuration before the first oracle call.
///
/// On success the oracle's state reflects the returned selection.
pub trait Optimizer {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Check the strategy parameters for a run selecting `k` items.
    fn validate(&self, k: usize) -> Result<(), ConfigError>;

    /// Select up to `k` items from `candidates` without validating.
    fn run<O: GainOracle + Clone>(
        &self,
        oracle: &mut O,
        candidates: &[usize],
        k: usize,
        options: &RunOptions<'_>,
    ) -> Result<Selection, SelectionError>;

    /// Select `k` items from an explicit candidate pool.
    ///
    /// Candidates already selected in the oracle are ignored.
    fn select_from<O: GainOracle + Clone>(
        &self,
        oracle: &mut O,
        candidates: &[usize],
        k: usize,
        options: &RunOptions<'_>,
    ) -> Result<Selection, SelectionError> {
        self.validate(k)?;
        if let Some(budget) = options.budget {
            budget.validate_for(oracle.n_items())?;
        }
        self.run(oracle, candidates, k, options)
    }

    /// Select `k` items from the whole ground set.
    fn select<O: GainOracle + Clone>(
        &self,
        oracle: &mut O,
        k: usize,
        options: &RunOptions<'_>,
    ) -> Result<Selection, SelectionError> {
        let candidates: Vec<usize> = (0..oracle.n_items()).collect();
        self.select_from(oracle, &candidates, k, options)
    }
}

/// Reject `k == 0`.
#[inline]
pub(crate) fn validate_k(k: usize) -> Result<(), ConfigError> {
    if k == 0 {
        return Err(ConfigError::InvalidK);
    }
    Ok(())
}

// =============================================================================
// OptimizerKind
// =============================================================================

/// Closed set of optimizers, chosen once at configuration time.
///
/// # Example
///
/// ```
/// use subselect::optim::{Optimizer, OptimizerKind};
///
/// let two_stage = OptimizerKind::two_stage(5);
/// let greedi = OptimizerKind::greedi(4, 10, OptimizerKind::lazy(), OptimizerKind::lazy());
/// assert_eq!(greedi.name(), "greedi");
/// # let _ = two_stage;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OptimizerKind {
    Naive(NaiveGreedy),
    Lazy(LazyGreedy),
    ApproximateLazy(ApproximateLazyGreedy),
    TwoStage(TwoStageGreedy),
    Stochastic(StochasticGreedy),
    Sample(SampleGreedy),
    Modular(ModularGreedy),
    GreeDi(GreeDi),
    Sieve(SieveGreedy),
}

impl Default for OptimizerKind {
    fn default() -> Self {
        Self::lazy()
    }
}

impl OptimizerKind {
    pub fn naive() -> Self {
        Self::Naive(NaiveGreedy)
    }

    pub fn lazy() -> Self {
        Self::Lazy(LazyGreedy)
    }

    pub fn approximate_lazy(beta: f64) -> Self {
        Self::ApproximateLazy(ApproximateLazyGreedy { beta })
    }

    pub fn two_stage(n_naive: usize) -> Self {
        Self::TwoStage(TwoStageGreedy { n_naive })
    }

    pub fn stochastic(epsilon: f64, seed: u64) -> Self {
        Self::Stochastic(StochasticGreedy { epsilon, seed })
    }

    pub fn sample(sample_rate: f64, seed: u64) -> Self {
        Self::Sample(SampleGreedy { sample_rate, seed })
    }

    pub fn modular() -> Self {
        Self::Modular(ModularGreedy)
    }

    pub fn greedi(m: usize, l: usize, optimizer1: OptimizerKind, optimizer2: OptimizerKind) -> Self {
        Self::GreeDi(GreeDi::new(m, l, optimizer1, optimizer2))
    }

    pub fn sieve(epsilon: f64) -> Self {
        Self::Sieve(SieveGreedy { epsilon })
    }
}

impl Optimizer for OptimizerKind {
    fn name(&self) -> &'static str {
        match self {
            Self::Naive(o) => o.name(),
            Self::Lazy(o) => o.name(),
            Self::ApproximateLazy(o) => o.name(),
            Self::TwoStage(o) => o.name(),
            Self::Stochastic(o) => o.name(),
            Self::Sample(o) => o.name(),
            Self::Modular(o) => o.name(),
            Self::GreeDi(o) => o.name(),
            Self::Sieve(o) => o.name(),
        }
    }

    fn validate(&self, k: usize) -> Result<(), ConfigError> {
        match self {
            Self::Naive(o) => o.validate(k),
            Self::Lazy(o) => o.validate(k),
            Self::ApproximateLazy(o) => o.validate(k),
            Self::TwoStage(o) => o.validate(k),
            Self::Stochastic(o) => o.validate(k),
            Self::Sample(o) => o.validate(k),
            Self::Modular(o) => o.validate(k),
            Self::GreeDi(o) => o.validate(k),
            Self::Sieve(o) => o.validate(k),
        }
    }

    fn run<O: GainOracle + Clone>(
        &self,
        oracle: &mut O,
        candidates: &[usize],
        k: usize,
        options: &RunOptions<'_>,
    ) -> Result<Selection, SelectionError> {
        match self {
            Self::Naive(o) => o.run(oracle, candidates, k, options),
            Self::Lazy(o) => o.run(oracle, candidates, k, options),
            Self::ApproximateLazy(o) => o.run(oracle, candidates, k, options),
            Self::TwoStage(o) => o.run(oracle, candidates, k, options),
            Self::Stochastic(o) => o.run(oracle, candidates, k, options),
            Self::Sample(o) => o.run(oracle, candidates, k, options),
            Self::Modular(o) => o.run(oracle, candidates, k, options),
            Self::GreeDi(o) => o.run(oracle, candidates, k, options),
            Self::Sieve(o) => o.run(oracle, candidates, k, options),
        }
    }
}

// =============================================================================
// Shared run machinery
// =============================================================================

/// Mutable state of one optimizer run.
pub(crate) struct RunState<'a> {
    pub(crate) selection: Selection,
    pub(crate) spend: Spend<'a>,
    pub(crate) logger: SelectionLogger,
    k: usize,
    stopped: bool,
}

impl<'a> RunState<'a> {
    pub(crate) fn new(
        name: &'static str,
        k: usize,
        n_candidates: usize,
        options: &RunOptions<'a>,
    ) -> Self {
        let mut logger = SelectionLogger::new(options.verbosity, name);
        logger.start(k, n_candidates);
        Self {
            selection: Selection::with_capacity(k),
            spend: Spend::new(options.budget),
            logger,
            k,
            stopped: false,
        }
    }

    /// Selections still required.
    #[inline]
    pub(crate) fn remaining(&self) -> usize {
        self.k.saturating_sub(self.selection.len())
    }

    #[inline]
    pub(crate) fn is_done(&self) -> bool {
        self.stopped || self.selection.len() >= self.k
    }

    /// Commit `index` to the oracle and record it.
    pub(crate) fn commit<O: GainOracle + ?Sized>(&mut self, oracle: &mut O, index: usize, gain: f64) {
        oracle.select_next(index);
        self.spend.charge(index);
        self.selection.push(index, gain);
        self.logger.log_selection(self.selection.len(), index, gain);
    }

    /// Handle a round with no affordable candidate.
    ///
    /// Budgeted runs stop early with a shorter selection. Unbudgeted runs fail
    /// with the partial selection attached.
    pub(crate) fn out_of_candidates(&mut self, available: usize) -> Result<(), SelectionError> {
        if self.spend.is_limited() {
            self.logger.warn(&format!(
                "budget exhausted after {} of {} selections (spent {})",
                self.selection.len(),
                self.k,
                self.spend.spent()
            ));
            self.stopped = true;
            return Ok(());
        }
        Err(SelectionError::InsufficientCandidates {
            needed: self.remaining(),
            available,
            partial: mem::take(&mut self.selection),
        })
    }

    pub(crate) fn finish(self) -> Selection {
        self.logger.finish(&self.selection);
        self.selection
    }
}

/// Evaluate gains for all `candidates`, fanning out when allowed.
pub(crate) fn scan_gains<O: GainOracle + ?Sized>(
    oracle: &O,
    candidates: &[usize],
    parallelism: Parallelism,
) -> Vec<f64> {
    let mut gains = vec![0.0; candidates.len()];
    let chunk = (candidates.len() / (rayon::current_num_threads() * 4)).max(MIN_SCAN_CHUNK);
    parallelism.maybe_par_chunks(candidates, &mut gains, chunk, |c, g| {
        oracle.calculate_gains(c, g)
    });
    gains
}
