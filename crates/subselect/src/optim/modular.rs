//! Modular greedy: rank once by initial gains.

use serde::{Deserialize, Serialize};

use super::{Optimizer, RunOptions, RunState, scan_gains, validate_k};
use crate::error::{ConfigError, SelectionError};
use crate::oracle::GainOracle;
use crate::selection::{CandidatePool, Selection};
use crate::utils::sink_nan;

/// Commits the top-k candidates by their gain against the initial state.
///
/// This treats the objective as modular, so it needs a single scan plus one
/// evaluation per commit. Recorded gains are re-evaluated at commit time and
/// therefore reflect the selection built so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModularGreedy;

impl Optimizer for ModularGreedy {
    fn name(&self) -> &'static str {
        "modular"
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
        let pool = CandidatePool::new(oracle, candidates);
        let mut state = RunState::new(self.name(), k, pool.len(), options);

        let items = pool.as_slice();
        let gains = scan_gains(oracle, items, options.parallelism);

        // Stable sort keeps pool order among equal gains. `+ 0.0` folds -0.0
        // into 0.0.
        let key = |pos: usize| sink_nan(gains[pos]) + 0.0;
        let mut order: Vec<usize> = (0..items.len()).collect();
        order.sort_by(|&a, &b| key(b).total_cmp(&key(a)));

        for pos in order {
            if state.is_done() {
                break;
            }
            let index = items[pos];
            if !state.spend.fits(index) {
                continue;
            }
            let gain = oracle.gain(index);
            state.commit(oracle, index, gain);
        }

        if !state.is_done() {
            state.out_of_candidates(0)?;
        }
        Ok(state.finish())
    }
}
