//! Common utilities used across the crate.
//!
//! This module provides parallelism configuration, the thread pool entry
//! point, and small slice helpers shared by the optimizers.

use rayon::prelude::*;

// =============================================================================
// Parallelism Configuration
// =============================================================================

/// Whether parallel execution is allowed.
///
/// This is a simple boolean flag passed through the optimizers.
/// When `true`, gain scans may use `rayon` parallel iterators.
/// When `false`, everything runs on the calling thread.
///
/// The actual thread pool is set up at the selector API level via `n_threads`.
/// Optimizers don't manage thread pools - they just respect this flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Parallelism {
    #[default]
    Sequential,
    Parallel,
}

impl Parallelism {
    /// Create from thread count semantics.
    ///
    /// - 0 = auto (parallel if rayon pool has multiple threads, sequential otherwise)
    /// - 1 = sequential
    /// - >1 = parallel
    #[inline]
    pub fn from_threads(n_threads: usize) -> Self {
        if n_threads == 1 || (n_threads == 0 && rayon::current_num_threads() == 1) {
            Parallelism::Sequential
        } else {
            Parallelism::Parallel
        }
    }

    /// Returns `true` if parallel execution is allowed.
    #[inline]
    pub fn is_parallel(self) -> bool {
        matches!(self, Parallelism::Parallel)
    }

    #[inline]
    pub fn maybe_par_map<T, B, I, F>(self, iter: I, f: F) -> Vec<B>
    where
        T: Send,
        B: Send,
        I: IntoIterator<Item = T> + IntoParallelIterator<Item = T>,
        F: Fn(T) -> B + Sync + Send,
    {
        if self.is_parallel() {
            iter.into_par_iter().map(f).collect()
        } else {
            iter.into_iter().map(f).collect()
        }
    }

    /// Evaluate `f` over matching chunks of `input` and `output`.
    ///
    /// Each call receives a chunk of inputs and the output chunk of the same
    /// length it must fill. Chunks never overlap, so workers need no locking.
    #[inline]
    pub fn maybe_par_chunks<T, B, F>(self, input: &[T], output: &mut [B], chunk_size: usize, f: F)
    where
        T: Sync,
        B: Send,
        F: Fn(&[T], &mut [B]) + Sync + Send,
    {
        debug_assert_eq!(input.len(), output.len());
        let chunk_size = chunk_size.max(1);
        if self.is_parallel() && input.len() > chunk_size {
            input
                .par_chunks(chunk_size)
                .zip(output.par_chunks_mut(chunk_size))
                .for_each(|(inp, out)| f(inp, out));
        } else {
            f(input, output);
        }
    }
}

// =============================================================================
// Thread Pool Setup
// =============================================================================

/// Run a closure with the appropriate thread pool.
///
/// Thread count semantics:
/// - `0` = auto (use all available cores)
/// - `1` = sequential (no thread pool)
/// - `n > 1` = use exactly `n` threads
///
/// If a dedicated pool cannot be built the closure runs in the global pool.
///
/// # Example
///
/// ```
/// use subselect::run_with_threads;
///
/// let sum = run_with_threads(1, |_parallelism| (0..10).sum::<i32>());
/// assert_eq!(sum, 45);
/// ```
#[inline]
pub fn run_with_threads<T: Send>(n_threads: usize, f: impl FnOnce(Parallelism) -> T + Send) -> T {
    let parallelism = Parallelism::from_threads(n_threads);

    match parallelism {
        Parallelism::Sequential => f(Parallelism::Sequential),
        Parallelism::Parallel => {
            match rayon::ThreadPoolBuilder::new().num_threads(n_threads).build() {
                Ok(pool) => pool.install(|| f(Parallelism::Parallel)),
                Err(_) => f(Parallelism::Parallel),
            }
        }
    }
}

// =============================================================================
// Slice Utilities
// =============================================================================

/// Ranking key of a gain: NaN sorts below every other value, `-inf` included.
#[inline]
pub fn sink_nan(gain: f64) -> f64 {
    if gain.is_nan() { f64::NEG_INFINITY } else { gain }
}

/// Position of the largest value, preferring the earliest on ties.
///
/// Values are ranked by [`sink_nan`], so NaN only wins when nothing else is
/// left. Returns `None` only for an empty slice.
#[inline]
pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (pos, v) in values.iter().map(|&v| sink_nan(v)).enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((pos, v)),
        }
    }
    best.map(|(pos, _)| pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argmax_prefers_first_on_ties() {
        assert_eq!(argmax(&[1.0, 3.0, 3.0, 2.0]), Some(1));
        assert_eq!(argmax(&[-1.0, -0.5]), Some(1));
    }

    #[test]
    fn argmax_sinks_nan() {
        assert_eq!(argmax(&[f64::NAN, 0.5, f64::NAN]), Some(1));
        assert_eq!(argmax(&[f64::NAN, f64::NEG_INFINITY]), Some(0));
        assert_eq!(argmax(&[f64::NEG_INFINITY, f64::NAN]), Some(0));
        assert_eq!(argmax(&[f64::NAN, f64::NAN]), Some(0));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn parallelism_from_threads() {
        assert_eq!(Parallelism::from_threads(1), Parallelism::Sequential);
        assert_eq!(Parallelism::from_threads(4), Parallelism::Parallel);
    }

    #[test]
    fn chunked_fill_matches_sequential() {
        let input: Vec<usize> = (0..1000).collect();
        let mut seq = vec![0.0; input.len()];
        let mut par = vec![0.0; input.len()];
        let square = |inp: &[usize], out: &mut [f64]| {
            for (o, &i) in out.iter_mut().zip(inp) {
                *o = (i * i) as f64;
            }
        };

        Parallelism::Sequential.maybe_par_chunks(&input, &mut seq, 64, square);
        run_with_threads(4, |p| p.maybe_par_chunks(&input, &mut par, 64, square));

        assert_eq!(seq, par);
    }
}
