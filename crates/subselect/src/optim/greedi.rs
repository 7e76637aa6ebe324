//! GreeDi: two-level selection over random partitions.
//!
//! 1. Shuffle the candidates and split them into `m` shards.
//! 2. Run `optimizer1` on every shard with target `l`, each on its own copy of
//!    the oracle. Shards share no mutable state and run in parallel.
//! 3. Pool the union of the shard selections.
//! 4. Run `optimizer2` on that pool with target `k`, against the caller's
//!    oracle.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

use super::{Optimizer, OptimizerKind, RunOptions, validate_k};
use crate::error::{ConfigError, SelectionError};
use crate::logger::SelectionLogger;
use crate::oracle::GainOracle;
use crate::selection::{CandidatePool, Selection};

// =============================================================================
// Partition
// =============================================================================

/// Disjoint assignment of candidates to shards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    shards: Vec<Vec<usize>>,
}

impl Partition {
    /// Shuffle `items` and split them into `m` contiguous shards whose sizes
    /// differ by at most one.
    pub fn random(items: &[usize], m: usize, seed: u64) -> Self {
        let mut shuffled = items.to_vec();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        shuffled.shuffle(&mut rng);

        let m = m.max(1);
        let base = shuffled.len() / m;
        let extra = shuffled.len() % m;

        let mut shards = Vec::with_capacity(m);
        let mut start = 0;
        for shard in 0..m {
            let size = base + usize::from(shard < extra);
            shards.push(shuffled[start..start + size].to_vec());
            start += size;
        }
        Self { shards }
    }

    #[inline]
    pub fn shards(&self) -> &[Vec<usize>] {
        &self.shards
    }

    #[inline]
    pub fn n_shards(&self) -> usize {
        self.shards.len()
    }
}

// =============================================================================
// GreeDi
// =============================================================================

/// Distributed two-level greedy.
///
/// Requires `m * l >= k`. Either stage may use any single-machine optimizer;
/// nesting GreeDi inside GreeDi is rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GreeDi {
    /// Number of partitions.
    pub m: usize,
    /// Selections per partition.
    pub l: usize,
    /// Per-partition optimizer.
    pub optimizer1: Box<OptimizerKind>,
    /// Optimizer over the pooled partition selections.
    pub optimizer2: Box<OptimizerKind>,
    /// Random seed for partitioning.
    pub seed: u64,
}

impl GreeDi {
    pub fn new(m: usize, l: usize, optimizer1: OptimizerKind, optimizer2: OptimizerKind) -> Self {
        Self {
            m,
            l,
            optimizer1: Box::new(optimizer1),
            optimizer2: Box::new(optimizer2),
            seed: 42,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl Optimizer for GreeDi {
    fn name(&self) -> &'static str {
        "greedi"
    }

    fn validate(&self, k: usize) -> Result<(), ConfigError> {
        validate_k(k)?;
        if self.m == 0 || self.l == 0 {
            return Err(ConfigError::InvalidPartitions);
        }
        if self.m.saturating_mul(self.l) < k {
            return Err(ConfigError::InsufficientPartitionBudget {
                m: self.m,
                l: self.l,
                k,
            });
        }
        for stage in [&self.optimizer1, &self.optimizer2] {
            if let OptimizerKind::GreeDi(inner) = &**stage {
                return Err(ConfigError::UnsupportedPartitionOptimizer(inner.name()));
            }
        }
        self.optimizer1.validate(self.l)?;
        self.optimizer2.validate(k)
    }

    fn run<O: GainOracle + Clone>(
        &self,
        oracle: &mut O,
        candidates: &[usize],
        k: usize,
        options: &RunOptions<'_>,
    ) -> Result<Selection, SelectionError> {
        let mut logger = SelectionLogger::new(options.verbosity, self.name());
        let pool = CandidatePool::new(oracle, candidates);
        logger.start(k, pool.len());

        let partition = Partition::random(pool.as_slice(), self.m, self.seed);
        logger.info(&format!(
            "stage 1: {} selections from each of {} partitions",
            self.l,
            partition.n_shards()
        ));

        let template: &O = oracle;
        let results = options.parallelism.maybe_par_map(partition.shards(), |shard| {
            let target = self.l.min(shard.len());
            if target == 0 {
                return Ok(Selection::default());
            }
            let mut local = template.clone();
            self.optimizer1.run(&mut local, shard, target, options)
        });

        let mut union = Vec::with_capacity(self.m * self.l);
        for result in results {
            union.extend(result?.ranking);
        }
        union.sort_unstable();
        union.dedup();

        logger.info(&format!(
            "stage 2: selecting {} from {} pooled candidates",
            k,
            union.len()
        ));
        let selection = self.optimizer2.run(oracle, &union, k, options)?;
        logger.finish(&selection);
        Ok(selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optim::{LazyGreedy, NaiveGreedy};
    use crate::testing::{FeatureBased, random_features};
    use crate::utils::run_with_threads;

    fn oracle() -> FeatureBased {
        FeatureBased::new(random_features(120, 6, 23))
    }

    #[test]
    fn partition_is_disjoint_and_balanced() {
        let items: Vec<usize> = (0..23).collect();
        let partition = Partition::random(&items, 4, 1);

        let sizes: Vec<usize> = partition.shards().iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![6, 6, 6, 5]);

        let mut all: Vec<usize> = partition.shards().concat();
        all.sort_unstable();
        assert_eq!(all, items);
    }

    #[test]
    fn partition_is_seed_deterministic() {
        let items: Vec<usize> = (0..50).collect();
        assert_eq!(Partition::random(&items, 3, 7), Partition::random(&items, 3, 7));
        assert_ne!(Partition::random(&items, 3, 7), Partition::random(&items, 3, 8));
    }

    #[test]
    fn single_partition_reduces_to_stage_two() {
        let opts = RunOptions::default();
        let direct = LazyGreedy.select(&mut oracle(), 10, &opts).unwrap();
        let greedi = GreeDi::new(1, 120, OptimizerKind::naive(), OptimizerKind::lazy())
            .select(&mut oracle(), 10, &opts)
            .unwrap();
        assert_eq!(direct, greedi);
    }

    #[test]
    fn selects_k_distinct_items() {
        let opts = RunOptions::default();
        let sel = GreeDi::new(4, 8, OptimizerKind::lazy(), OptimizerKind::naive())
            .select(&mut oracle(), 12, &opts)
            .unwrap();

        assert_eq!(sel.len(), 12);
        let mut ranking = sel.ranking.clone();
        ranking.sort_unstable();
        ranking.dedup();
        assert_eq!(ranking.len(), 12);

        let naive = NaiveGreedy.select(&mut oracle(), 12, &opts).unwrap();
        assert!(sel.total_gain() >= 0.7 * naive.total_gain());
    }

    #[test]
    fn parallel_matches_sequential() {
        let greedi = GreeDi::new(5, 6, OptimizerKind::lazy(), OptimizerKind::lazy()).with_seed(3);
        let sequential = greedi
            .select(&mut oracle(), 10, &RunOptions::default())
            .unwrap();
        let parallel = run_with_threads(4, |p| {
            greedi.select(&mut oracle(), 10, &RunOptions::default().with_parallelism(p))
        })
        .unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn rejects_small_partition_budget() {
        let greedi = GreeDi::new(2, 3, OptimizerKind::lazy(), OptimizerKind::lazy());
        assert_eq!(
            greedi.validate(7),
            Err(ConfigError::InsufficientPartitionBudget { m: 2, l: 3, k: 7 })
        );
        let zero = GreeDi::new(0, 3, OptimizerKind::lazy(), OptimizerKind::lazy());
        assert_eq!(zero.validate(1), Err(ConfigError::InvalidPartitions));
    }

    #[test]
    fn rejects_nested_greedi() {
        let inner = OptimizerKind::greedi(2, 2, OptimizerKind::lazy(), OptimizerKind::lazy());
        let greedi = GreeDi::new(2, 4, inner, OptimizerKind::lazy());
        assert_eq!(
            greedi.validate(4),
            Err(ConfigError::UnsupportedPartitionOptimizer("greedi"))
        );
    }

    #[test]
    fn validates_stage_optimizers() {
        let greedi = GreeDi::new(2, 4, OptimizerKind::two_stage(5), OptimizerKind::lazy());
        assert_eq!(
            greedi.validate(4),
            Err(ConfigError::NaiveExceedsK { n_naive: 5, k: 4 })
        );
    }
}
