//! Randomized double greedy for non-monotone objectives.
//!
//! Two sets move toward each other: a lower set `A` that starts empty and an
//! upper set `B` that starts as the whole candidate pool. Each candidate is
//! visited once. With `a` its gain against `A` and `b` its removal gain
//! against `B` (both clamped at zero), it joins `A` with probability
//! `a / (a + b)` and otherwise leaves `B`. When both are zero it joins with
//! probability 1/2.
//!
//! For a non-negative submodular objective this is a 1/2 approximation in
//! expectation, without needing monotonicity.

use rand::{Rng, SeedableRng};
use rand::seq::SliceRandom;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

use super::{RunOptions, RunState, validate_k};
use crate::error::{ConfigError, SelectionError};
use crate::oracle::{GainOracle, ReversibleOracle};
use crate::selection::{CandidatePool, Selection};

/// Randomized double greedy.
///
/// `k` caps the size of the returned selection; once `k` items are accepted
/// the run stops. Fewer than `k` items is a normal outcome, not an error.
/// The ranking lists items in acceptance order, and each gain is the forward
/// gain against the lower set at the time of acceptance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidirectionalGreedy {
    /// Random seed for visit order and acceptance draws.
    pub seed: u64,
}

impl Default for BidirectionalGreedy {
    fn default() -> Self {
        Self { seed: 42 }
    }
}

impl BidirectionalGreedy {
    pub fn name(&self) -> &'static str {
        "bidirectional"
    }

    pub fn validate(&self, k: usize) -> Result<(), ConfigError> {
        validate_k(k)
    }

    /// Run over the whole ground set.
    pub fn select<O: ReversibleOracle + Clone>(
        &self,
        oracle: &mut O,
        k: usize,
        options: &RunOptions<'_>,
    ) -> Result<Selection, SelectionError> {
        let candidates: Vec<usize> = (0..oracle.n_items()).collect();
        self.select_from(oracle, &candidates, k, options)
    }

    /// Run over an explicit candidate pool.
    ///
    /// The upper set is the oracle's current selection plus every candidate
    /// in the pool. Items outside the pool never enter either set.
    pub fn select_from<O: ReversibleOracle + Clone>(
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

        let pool = CandidatePool::new(oracle, candidates);
        let mut state = RunState::new(self.name(), k, pool.len(), options);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(self.seed);

        let mut upper = oracle.clone();
        for &index in pool.as_slice() {
            upper.select_next(index);
        }

        let mut order = pool.as_slice().to_vec();
        order.shuffle(&mut rng);

        for index in order {
            if state.is_done() {
                break;
            }
            let forward = oracle.gain(index);
            let a = forward.max(0.0);
            let b = upper.removal_gain(index).max(0.0);
            let p = if a + b > 0.0 { a / (a + b) } else { 0.5 };

            let draw: f64 = rng.r#gen();
            if draw < p && state.spend.fits(index) {
                state.commit(oracle, index, forward);
            } else {
                upper.deselect(index);
            }
        }

        Ok(state.finish())
    }
}
