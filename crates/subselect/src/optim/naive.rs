//! Naive greedy: full scan every round.

use serde::{Deserialize, Serialize};

use super::{Optimizer, RunOptions, RunState, scan_gains, validate_k};
use crate::error::{ConfigError, SelectionError};
use crate::oracle::GainOracle;
use crate::selection::{CandidatePool, Selection};
use crate::utils::{Parallelism, argmax};

/// Evaluates every uncommitted candidate each round and commits the arg-max.
///
/// The per-round scan is read-only over the oracle state, so it fans out
/// across rayon workers under [`Parallelism::Parallel`]. Ties go to the
/// candidate that comes first in the pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NaiveGreedy;

impl Optimizer for NaiveGreedy {
    fn name(&self) -> &'static str {
        "naive"
    }

    fn validate(&self, k: usize) -> Result<(), ConfigError> {
        validate_k(k)
    }

    fn run<O: GainOracle + Clone>(
        &self,
        oracle: &mut O,
        candidates: &[usize],
        k: usize,
        options: &RunOptions<'_>,
    ) -> Result<Selection, SelectionError> {
        let mut pool = CandidatePool::new(oracle, candidates);
        let mut state = RunState::new(self.name(), k, pool.len(), options);
        naive_rounds(oracle, &mut pool, &mut state, k, options.parallelism)?;
        Ok(state.finish())
    }
}

/// Run naive rounds until the selection holds `until` items or the run stops.
pub(crate) fn naive_rounds<O: GainOracle + ?Sized>(
    oracle: &mut O,
    pool: &mut CandidatePool,
    state: &mut RunState<'_>,
    until: usize,
    parallelism: Parallelism,
) -> Result<(), SelectionError> {
    while !state.is_done() && state.selection.len() < until {
        let round = pool.affordable(&state.spend);
        if round.is_empty() {
            state.out_of_candidates(pool.len())?;
            break;
        }

        let gains = scan_gains(oracle, &round, parallelism);
        let Some(best) = argmax(&gains) else {
            break;
        };
        let index = round[best];

        state.commit(oracle, index, gains[best]);
        pool.remove(index);
    }
    Ok(())
}
