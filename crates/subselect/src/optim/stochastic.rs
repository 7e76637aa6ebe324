//! Randomized optimizers: stochastic greedy and sample greedy.

use rand::SeedableRng;
use rand::seq::index::sample;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

use super::lazy::lazy_rounds;
use super::{Optimizer, RunOptions, RunState, scan_gains, validate_k};
use crate::error::{ConfigError, SelectionError};
use crate::oracle::GainOracle;
use crate::selection::{CandidatePool, Selection};
use crate::utils::argmax;

// =============================================================================
// StochasticGreedy
// =============================================================================

/// Arg-max over a fresh random sample of the candidates each round.
///
/// The sample size is `s = max(1, round((n / k) * ln(1 / epsilon)))`, which
/// gives a `1 - 1/e - epsilon` approximation in expectation with O(k·s) gain
/// evaluations instead of O(k·n).
///
/// Results are deterministic for a fixed `seed` and candidate order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StochasticGreedy {
    /// Approximation slack in (0, 1).
    pub epsilon: f64,
    /// Random seed for sampling.
    pub seed: u64,
}

impl Default for StochasticGreedy {
    fn default() -> Self {
        Self {
            epsilon: 0.9,
            seed: 42,
        }
    }
}

impl StochasticGreedy {
    /// Per-round sample size for `n` candidates and `k` selections.
    pub fn sample_size(&self, n: usize, k: usize) -> usize {
        let s = (n as f64 / k as f64) * (1.0 / self.epsilon).ln();
        (s.round() as usize).max(1)
    }
}

impl Optimizer for StochasticGreedy {
    fn name(&self) -> &'static str {
        "stochastic"
    }

    fn validate(&self, k: usize) -> Result<(), ConfigError> {
        validate_k(k)?;
        if !(self.epsilon > 0.0 && self.epsilon < 1.0) {
            return Err(ConfigError::InvalidEpsilon(self.epsilon));
        }
        Ok(())
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
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(self.seed);
        let sample_size = self.sample_size(pool.len(), k);

        while !state.is_done() {
            let affordable = pool.affordable(&state.spend);
            if affordable.is_empty() {
                state.out_of_candidates(pool.len())?;
                break;
            }

            let amount = sample_size.min(affordable.len());
            let mut positions = sample(&mut rng, affordable.len(), amount).into_vec();
            positions.sort_unstable();
            let round: Vec<usize> = positions.iter().map(|&p| affordable[p]).collect();

            let gains = scan_gains(oracle, &round, options.parallelism);
            let Some(best) = argmax(&gains) else {
                break;
            };
            let index = round[best];

            state.commit(oracle, index, gains[best]);
            pool.remove(index);
        }
        Ok(state.finish())
    }
}

// =============================================================================
// SampleGreedy
// =============================================================================

/// Lazy greedy over a single uniform subsample of the candidates.
///
/// The subsample holds `round(sample_rate * n)` candidates (at least one).
/// Runs fail with [`SelectionError::InsufficientCandidates`] if the
/// subsample is smaller than `k`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleGreedy {
    /// Fraction of candidates kept, in (0, 1].
    pub sample_rate: f64,
    /// Random seed for subsampling.
    pub seed: u64,
}

impl Default for SampleGreedy {
    fn default() -> Self {
        Self {
            sample_rate: 0.5,
            seed: 42,
        }
    }
}

impl Optimizer for SampleGreedy {
    fn name(&self) -> &'static str {
        "sample"
    }

    fn validate(&self, k: usize) -> Result<(), ConfigError> {
        validate_k(k)?;
        if !(self.sample_rate > 0.0 && self.sample_rate <= 1.0) {
            return Err(ConfigError::InvalidSampleRate(self.sample_rate));
        }
        Ok(())
    }

    fn run<O: GainOracle + Clone>(
        &self,
        oracle: &mut O,
        candidates: &[usize],
        k: usize,
        options: &RunOptions<'_>,
    ) -> Result<Selection, SelectionError> {
        let pool = CandidatePool::new(oracle, candidates);
        let items = pool.as_slice();

        let mut rng = Xoshiro256PlusPlus::seed_from_u64(self.seed);
        let amount = ((self.sample_rate * items.len() as f64).round() as usize)
            .max(1)
            .min(items.len());
        let mut positions = sample(&mut rng, items.len(), amount).into_vec();
        positions.sort_unstable();
        let subsample: Vec<usize> = positions.iter().map(|&p| items[p]).collect();

        let mut state = RunState::new(self.name(), k, subsample.len(), options);
        lazy_rounds(oracle, &subsample, &mut state, None, options.parallelism)?;
        Ok(state.finish())
    }
}
