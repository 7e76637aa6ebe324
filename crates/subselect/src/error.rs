//! Error types for configuration and selection runs.

use crate::queue::QueueEmpty;
use crate::selection::Selection;

// =============================================================================
// ConfigError
// =============================================================================

/// Invalid configuration, detected before any oracle call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Number of selections must be at least 1.
    #[error("k must be at least 1")]
    InvalidK,

    /// More selections requested than the ground set holds.
    #[error("k = {k} exceeds the ground set size {n}")]
    KExceedsGroundSet { k: usize, n: usize },

    /// Two-stage greedy cannot run more naive rounds than selections.
    #[error("n_naive = {n_naive} exceeds k = {k}")]
    NaiveExceedsK { n_naive: usize, k: usize },

    /// Approximation factor must be in (0, 1].
    #[error("beta must be in (0, 1], got {0}")]
    InvalidBeta(f64),

    /// Epsilon must be in the open or half-open unit interval the strategy expects.
    #[error("epsilon out of range, got {0}")]
    InvalidEpsilon(f64),

    /// Sample rate must be in (0, 1].
    #[error("sample_rate must be in (0, 1], got {0}")]
    InvalidSampleRate(f64),

    /// GreeDi needs at least one partition and a positive per-partition budget.
    #[error("partitions (m) and per-partition budget (l) must both be at least 1")]
    InvalidPartitions,

    /// GreeDi stage 2 needs at least k candidates.
    #[error("m * l = {m} * {l} is smaller than k = {k}")]
    InsufficientPartitionBudget { m: usize, l: usize, k: usize },

    /// GreeDi stages only accept single-machine optimizers.
    #[error("optimizer '{0}' cannot be used as a GreeDi stage")]
    UnsupportedPartitionOptimizer(&'static str),

    /// Budget must be finite and non-negative.
    #[error("budget must be finite and >= 0, got {0}")]
    InvalidBudget(f64),

    /// One cost per ground set element is required.
    #[error("got {costs} costs for a ground set of {n} elements")]
    CostLengthMismatch { costs: usize, n: usize },

    /// Costs must be finite and non-negative.
    #[error("cost of element {index} must be finite and >= 0, got {cost}")]
    InvalidCost { index: usize, cost: f64 },

    /// Data passed alongside the oracle needs one row per ground set element.
    #[error("data has {rows} rows for a ground set of {n} elements")]
    DataRowMismatch { rows: usize, n: usize },

    /// Initial subset references an element outside the ground set.
    #[error("initial subset element {index} is outside the ground set of {n} elements")]
    InitialSubsetOutOfRange { index: usize, n: usize },
}

// =============================================================================
// SelectionError
// =============================================================================

/// Errors that abort a selection run.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SelectionError {
    /// The run was rejected before it started.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),

    /// Internal invariant violation in a lazy optimizer.
    #[error(transparent)]
    QueueEmpty(#[from] QueueEmpty),

    /// Candidates ran out before `k` selections were made.
    ///
    /// Carries everything selected up to that point.
    #[error("needed {needed} more selections but only {available} candidates remain")]
    InsufficientCandidates {
        needed: usize,
        available: usize,
        partial: Selection,
    },
}

impl SelectionError {
    /// The partial selection attached to the error, if any.
    pub fn partial(&self) -> Option<&Selection> {
        match self {
            Self::InsufficientCandidates { partial, .. } => Some(partial),
            _ => None,
        }
    }
}
