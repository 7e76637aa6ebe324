//! Lazy greedy and its approximate and two-stage variants.
//!
//! All three keep cached gains in a [`PriorityQueue`]. By submodularity a
//! cached gain is an upper bound on the current gain, so once a freshly
//! re-evaluated candidate beats the best cached bound it is the true arg-max
//! and no other candidate needs to be looked at this round. A fresh gain that
//! only equals the best bound re-evaluates every candidate cached at that
//! bound before committing.

use serde::{Deserialize, Serialize};

use super::naive::naive_rounds;
use super::{Optimizer, RunOptions, RunState, scan_gains, validate_k};
use crate::budget::Spend;
use crate::error::{ConfigError, SelectionError};
use crate::oracle::GainOracle;
use crate::queue::PriorityQueue;
use crate::selection::{CandidatePool, Selection};
use crate::utils::{Parallelism, sink_nan};

// =============================================================================
// LazyGreedy
// =============================================================================

/// Exact greedy with lazily re-evaluated gains.
///
/// Produces the same ranking and gains as [`NaiveGreedy`](super::NaiveGreedy)
/// for a submodular oracle, usually with far fewer gain evaluations.
/// Rounds are inherently sequential; only the initial scan runs in parallel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LazyGreedy;

impl Optimizer for LazyGreedy {
    fn name(&self) -> &'static str {
        "lazy"
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
        lazy_rounds(oracle, pool.as_slice(), &mut state, None, options.parallelism)?;
        Ok(state.finish())
    }
}

// =============================================================================
// ApproximateLazyGreedy
// =============================================================================

/// Lazy greedy that also accepts any candidate whose fresh gain is at least
/// `beta` times its cached gain.
///
/// `beta = 1.0` behaves exactly like [`LazyGreedy`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ApproximateLazyGreedy {
    /// Acceptance factor in (0, 1].
    pub beta: f64,
}

impl Default for ApproximateLazyGreedy {
    fn default() -> Self {
        Self { beta: 0.9 }
    }
}

impl Optimizer for ApproximateLazyGreedy {
    fn name(&self) -> &'static str {
        "approximate-lazy"
    }

    fn validate(&self, k: usize) -> Result<(), ConfigError> {
        validate_k(k)?;
        if !(self.beta > 0.0 && self.beta <= 1.0) {
            return Err(ConfigError::InvalidBeta(self.beta));
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
        let mut state = RunState::new(self.name(), k, pool.len(), options);
        lazy_rounds(
            oracle,
            pool.as_slice(),
            &mut state,
            Some(self.beta),
            options.parallelism,
        )?;
        Ok(state.finish())
    }
}

// =============================================================================
// TwoStageGreedy
// =============================================================================

/// Naive greedy for the first `n_naive` selections, lazy greedy afterwards.
///
/// Early rounds are where lazy greedy re-evaluates the most, and where the
/// naive scan parallelizes best. `n_naive = k` is plain naive greedy and
/// `n_naive` of 0 or 1 is plain lazy greedy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwoStageGreedy {
    /// Number of selections made by the naive stage.
    pub n_naive: usize,
}

impl Default for TwoStageGreedy {
    fn default() -> Self {
        Self { n_naive: 1 }
    }
}

impl Optimizer for TwoStageGreedy {
    fn name(&self) -> &'static str {
        "two-stage"
    }

    fn validate(&self, k: usize) -> Result<(), ConfigError> {
        validate_k(k)?;
        if self.n_naive > k {
            return Err(ConfigError::NaiveExceedsK {
                n_naive: self.n_naive,
                k,
            });
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

        naive_rounds(oracle, &mut pool, &mut state, self.n_naive, options.parallelism)?;
        if !state.is_done() {
            state.logger.info(&format!(
                "switching to lazy greedy after {} selections",
                state.selection.len()
            ));
            lazy_rounds(oracle, pool.as_slice(), &mut state, None, options.parallelism)?;
        }
        Ok(state.finish())
    }
}

// =============================================================================
// Lazy rounds
// =============================================================================

/// Seed a queue from one full scan of `candidates`, then run lazy rounds
/// until the run is done.
///
/// The queue is keyed by pool position, so ties resolve the way a full scan
/// resolves them: the earliest candidate in `candidates` wins.
///
/// With `beta`, a candidate is also accepted when its fresh gain is at least
/// `beta` times its own cached gain. Exact ties with the queue head always go
/// through tie resolution, so `beta = 1.0` reproduces exact lazy greedy.
pub(crate) fn lazy_rounds<O: GainOracle + ?Sized>(
    oracle: &mut O,
    candidates: &[usize],
    state: &mut RunState<'_>,
    beta: Option<f64>,
    parallelism: Parallelism,
) -> Result<(), SelectionError> {
    if state.is_done() {
        return Ok(());
    }

    let seed: Vec<usize> = (0..candidates.len())
        .filter(|&pos| {
            let index = candidates[pos];
            !oracle.is_selected(index) && state.spend.fits(index)
        })
        .collect();
    let items: Vec<usize> = seed.iter().map(|&pos| candidates[pos]).collect();
    let gains = scan_gains(oracle, &items, parallelism);

    let mut queue = PriorityQueue::with_capacity(seed.len());
    for (&pos, &gain) in seed.iter().zip(&gains) {
        queue.push(pos, sink_nan(gain));
    }

    'rounds: while !state.is_done() {
        if queue.is_empty() {
            state.out_of_candidates(0)?;
            break;
        }

        let mut evaluations = 0usize;
        loop {
            let (cached, pos) = queue.pop()?;
            let index = candidates[pos];
            // Spend only grows, so an unaffordable candidate stays unaffordable.
            if oracle.is_selected(index) || !state.spend.fits(index) {
                if queue.is_empty() {
                    state.out_of_candidates(0)?;
                    break 'rounds;
                }
                continue;
            }

            let gain = oracle.gain(index);
            let fresh = sink_nan(gain);
            evaluations += 1;

            let next = queue.peek().map(|(priority, _)| priority);
            let choice = match next {
                None => Some((pos, gain)),
                Some(next) if fresh > next => Some((pos, gain)),
                Some(next) if fresh == next => {
                    let tied = TieBreak {
                        oracle: &*oracle,
                        candidates,
                        spend: &state.spend,
                    };
                    Some(tied.resolve(&mut queue, (pos, gain), &mut evaluations))
                }
                Some(_) if beta.is_some_and(|b| fresh >= b * cached) => Some((pos, gain)),
                Some(_) => None,
            };

            match choice {
                Some((pos, gain)) => {
                    state.logger.log_reevaluations(state.selection.len() + 1, evaluations);
                    state.commit(oracle, candidates[pos], gain);
                    break;
                }
                None => queue.push(pos, fresh),
            }
        }
    }
    Ok(())
}

/// Everything needed to re-evaluate queued candidates during a tie.
struct TieBreak<'a, O: ?Sized> {
    oracle: &'a O,
    candidates: &'a [usize],
    spend: &'a Spend<'a>,
}

impl<O: GainOracle + ?Sized> TieBreak<'_, O> {
    /// Re-evaluate every queued candidate whose cached gain equals the fresh
    /// gain of `first`, and return the best `(position, gain)` among them.
    ///
    /// Cached gains bound current gains from above, so once the head drops
    /// below the tied value every true maximum has been seen. Losers go back
    /// into the queue with their fresh gains.
    fn resolve(
        &self,
        queue: &mut PriorityQueue<usize>,
        first: (usize, f64),
        evaluations: &mut usize,
    ) -> (usize, f64) {
        let level = sink_nan(first.1);
        let mut best = first;
        let mut losers = Vec::new();

        while let Some((cached, pos)) = queue.peek() {
            if cached < level {
                break;
            }
            queue.remove(&pos);
            let index = self.candidates[pos];
            if self.oracle.is_selected(index) || !self.spend.fits(index) {
                continue;
            }

            let gain = self.oracle.gain(index);
            *evaluations += 1;
            let (fresh, top) = (sink_nan(gain), sink_nan(best.1));
            if fresh > top || (fresh == top && pos < best.0) {
                losers.push((best.0, top));
                best = (pos, gain);
            } else {
                losers.push((pos, fresh));
            }
        }

        for (pos, fresh) in losers {
            queue.push(pos, fresh);
        }
        best
    }
}
