//! Sieve-Streaming: single pass over a stream of candidates.
//!
//! The optimum `OPT` is unknown while streaming, so the sieve hedges with a
//! bank of guesses `v = (1 + epsilon)^i` covering `[m, 2·k·m]`, where `m` is
//! the largest singleton gain seen so far. Every guess keeps its own copy of
//! the oracle and accepts an element when
//!
//! ```text
//! gain > (v / 2 - total) / (k - len)
//! ```
//!
//! Guesses below the range are retired as `m` grows, and new guesses start
//! empty. The guess closest to `OPT` yields a `1/2 - epsilon` approximation.
//!
//! Each element is looked at exactly once and every guess only depends on the
//! elements it has seen, so feeding the stream in chunks gives the same result
//! as feeding it in one call.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Optimizer, RunOptions, RunState, validate_k};
use crate::budget::Budget;
use crate::error::{ConfigError, SelectionError};
use crate::oracle::GainOracle;
use crate::selection::{CandidatePool, Selection};

fn validate_epsilon(epsilon: f64) -> Result<(), ConfigError> {
    if !(epsilon > 0.0 && epsilon <= 1.0) {
        return Err(ConfigError::InvalidEpsilon(epsilon));
    }
    Ok(())
}

/// Full selections beat partial ones, then higher totals win.
fn is_better(candidate: &Selection, current: &Selection, k: usize) -> bool {
    let full = (candidate.len() >= k, current.len() >= k);
    match full {
        (true, false) => true,
        (false, true) => false,
        _ => candidate.total_gain() > current.total_gain(),
    }
}

// =============================================================================
// SieveStreaming
// =============================================================================

#[derive(Debug, Clone)]
struct Guess<O> {
    value: f64,
    oracle: O,
    selection: Selection,
    spent: f64,
}

/// Streaming selector with incremental [`partial_fit`](Self::partial_fit).
///
/// # Example
///
/// ```
/// use subselect::optim::SieveStreaming;
/// use subselect::testing::WeightedCoverage;
///
/// let oracle = WeightedCoverage::new(
///     vec![vec![0], vec![1], vec![0, 1], vec![2]],
///     vec![1.0, 1.0, 1.0],
/// );
/// let mut sieve = SieveStreaming::new(oracle, 2, 0.1).unwrap();
/// sieve.partial_fit(&[0, 1]);
/// sieve.partial_fit(&[2, 3]);
///
/// assert_eq!(sieve.n_seen(), 4);
/// assert!(sieve.selection().len() <= 2);
/// ```
#[derive(Debug, Clone)]
pub struct SieveStreaming<O> {
    k: usize,
    epsilon: f64,
    budget: Option<Budget>,
    base: O,
    max_singleton: f64,
    guesses: BTreeMap<i32, Guess<O>>,
    retired: Option<Selection>,
    n_seen: usize,
}

impl<O: GainOracle + Clone> SieveStreaming<O> {
    /// Start a stream against an initialized oracle.
    ///
    /// `epsilon` in (0, 1] sets the spacing of the guesses. Smaller values
    /// give a tighter guarantee at the cost of more guesses.
    pub fn new(oracle: O, k: usize, epsilon: f64) -> Result<Self, ConfigError> {
        validate_k(k)?;
        validate_epsilon(epsilon)?;
        Ok(Self {
            k,
            epsilon,
            budget: None,
            base: oracle,
            max_singleton: 0.0,
            guesses: BTreeMap::new(),
            retired: None,
            n_seen: 0,
        })
    }

    /// Enforce a knapsack constraint in every guess.
    pub fn with_budget(mut self, budget: Budget) -> Result<Self, ConfigError> {
        budget.validate_for(self.base.n_items())?;
        self.budget = Some(budget);
        Ok(self)
    }

    /// Elements consumed so far, including skipped ones.
    #[inline]
    pub fn n_seen(&self) -> usize {
        self.n_seen
    }

    /// Number of live guesses.
    #[inline]
    pub fn n_guesses(&self) -> usize {
        self.guesses.len()
    }

    /// Consume the next chunk of the stream.
    pub fn partial_fit(&mut self, stream: &[usize]) {
        for &index in stream {
            self.n_seen += 1;
            if self.base.is_selected(index) {
                continue;
            }

            let singleton = self.base.gain(index);
            if singleton > self.max_singleton {
                self.max_singleton = singleton;
                self.refresh_guesses();
            }

            let cost = self.budget.as_ref().map_or(0.0, |b| b.cost(index));
            let limit = self.budget.as_ref().map_or(f64::INFINITY, Budget::limit);
            let k = self.k;

            for guess in self.guesses.values_mut() {
                let len = guess.selection.len();
                if len >= k || guess.oracle.is_selected(index) || guess.spent + cost > limit {
                    continue;
                }
                let gain = guess.oracle.gain(index);
                let threshold = (guess.value / 2.0 - guess.selection.total_gain()) / (k - len) as f64;
                if gain > threshold {
                    guess.oracle.select_next(index);
                    guess.selection.push(index, gain);
                    guess.spent += cost;
                }
            }
        }
    }

    /// Best selection so far.
    ///
    /// Prefers guesses that filled all `k` slots, then the highest total gain.
    /// Ties go to the smallest guess.
    pub fn selection(&self) -> Selection {
        let mut best: Option<&Selection> = self.retired.as_ref();
        for guess in self.guesses.values() {
            best = match best {
                Some(current) if !is_better(&guess.selection, current, self.k) => Some(current),
                _ => Some(&guess.selection),
            };
        }
        best.cloned().unwrap_or_default()
    }

    /// Align the guess bank with the current `max_singleton`.
    fn refresh_guesses(&mut self) {
        let m = self.max_singleton;
        if m <= 0.0 || !m.is_finite() {
            return;
        }
        let base = (1.0 + self.epsilon).ln();
        let lo = (m.ln() / base).ceil() as i32;
        let hi = ((2.0 * self.k as f64 * m).ln() / base).floor() as i32;

        let expired: Vec<i32> = self.guesses.range(..lo).map(|(&i, _)| i).collect();
        for exponent in expired {
            if let Some(guess) = self.guesses.remove(&exponent) {
                let keep = self
                    .retired
                    .as_ref()
                    .is_none_or(|current| is_better(&guess.selection, current, self.k));
                if keep {
                    self.retired = Some(guess.selection);
                }
            }
        }

        for exponent in lo..=hi {
            self.guesses.entry(exponent).or_insert_with(|| Guess {
                value: (1.0 + self.epsilon).powi(exponent),
                oracle: self.base.clone(),
                selection: Selection::with_capacity(self.k),
                spent: 0.0,
            });
        }
    }
}

// =============================================================================
// SieveGreedy
// =============================================================================

/// [`SieveStreaming`] as a batch [`Optimizer`].
///
/// Streams the candidate pool once in order, then commits the best guess into
/// the caller's oracle. The selection may hold fewer than `k` items even with
/// enough candidates, since the sieve only keeps elements above its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SieveGreedy {
    /// Guess spacing in (0, 1].
    pub epsilon: f64,
}

impl Default for SieveGreedy {
    fn default() -> Self {
        Self { epsilon: 0.1 }
    }
}

impl Optimizer for SieveGreedy {
    fn name(&self) -> &'static str {
        "sieve"
    }

    fn validate(&self, k: usize) -> Result<(), ConfigError> {
        validate_k(k)?;
        validate_epsilon(self.epsilon)
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

        let mut sieve = SieveStreaming::new(oracle.clone(), k, self.epsilon)?;
        if let Some(budget) = options.budget {
            sieve = sieve.with_budget(budget.clone())?;
        }
        sieve.partial_fit(pool.as_slice());
        state.logger.info(&format!(
            "streamed {} candidates through {} guesses",
            sieve.n_seen(),
            sieve.n_guesses()
        ));

        for (index, gain) in sieve.selection().iter() {
            state.commit(oracle, index, gain);
        }
        if pool.len() < k {
            state.out_of_candidates(pool.len() - state.selection.len())?;
        }
        Ok(state.finish())
    }
}
