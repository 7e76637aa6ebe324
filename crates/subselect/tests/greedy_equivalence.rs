//! Exact greedy optimizers must agree with each other.
//!
//! Lazy, two-stage and approximate (beta = 1) greedy are all exact, so they
//! return the same ranking and gains as naive greedy. Tied gains go to the
//! candidate that comes first in the pool.

use approx::assert_abs_diff_eq;
use proptest::prelude::*;

use subselect::optim::{Optimizer, OptimizerKind};
use subselect::testing::{FacilityLocation, FeatureBased, WeightedCoverage, random_features, rbf_similarity};
use subselect::{GainOracle, RunOptions, Selection};

// =============================================================================
// Helpers
// =============================================================================

/// Ten elements over eight weighted concepts.
fn scenario() -> WeightedCoverage {
    let bits: [[u8; 8]; 10] = [
        [1, 1, 0, 0, 0, 0, 0, 0],
        [0, 1, 1, 1, 0, 0, 0, 0],
        [0, 0, 0, 1, 1, 0, 0, 0],
        [1, 0, 0, 0, 0, 1, 1, 1],
        [0, 0, 1, 0, 0, 0, 0, 1],
        [0, 0, 0, 0, 1, 1, 0, 0],
        [1, 1, 1, 0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0, 0, 1, 0],
        [0, 1, 0, 0, 1, 0, 1, 0],
        [0, 0, 0, 1, 0, 0, 0, 1],
    ];
    let covers = bits
        .iter()
        .map(|row| (0..8).filter(|&c| row[c] == 1).collect())
        .collect();
    WeightedCoverage::new(covers, vec![1.0, 1.5, 2.0, 0.5, 3.0, 1.25, 0.75, 2.5])
}

fn run<O: GainOracle + Clone>(optimizer: &OptimizerKind, mut oracle: O, k: usize) -> Selection {
    optimizer
        .select(&mut oracle, k, &RunOptions::default())
        .unwrap()
}

/// Modular oracle with fixed gains, NaN included.
#[derive(Debug, Clone)]
struct FixedGains {
    gains: Vec<f64>,
    selected: Vec<bool>,
}

impl FixedGains {
    fn new(gains: Vec<f64>) -> Self {
        let selected = vec![false; gains.len()];
        Self { gains, selected }
    }
}

impl GainOracle for FixedGains {
    fn n_items(&self) -> usize {
        self.gains.len()
    }

    fn initialize(&mut self, initial_subset: Option<&[usize]>) {
        self.selected.fill(false);
        for &index in initial_subset.unwrap_or_default() {
            self.selected[index] = true;
        }
    }

    fn calculate_gains(&self, candidates: &[usize], gains: &mut [f64]) {
        for (&index, gain) in candidates.iter().zip(gains.iter_mut()) {
            *gain = self.gains[index];
        }
    }

    fn select_next(&mut self, index: usize) {
        self.selected[index] = true;
    }

    fn is_selected(&self, index: usize) -> bool {
        self.selected[index]
    }
}

fn coverage_from_bits(bits: &[Vec<u8>], weights: &[u8]) -> WeightedCoverage {
    let covers = bits
        .iter()
        .map(|row| (0..row.len()).filter(|&c| row[c] == 1).collect())
        .collect();
    WeightedCoverage::new(covers, weights.iter().map(|&w| f64::from(w)).collect())
}

fn assert_same(a: &Selection, b: &Selection, epsilon: f64) {
    assert_eq!(a.ranking, b.ranking);
    for (x, y) in a.gains.iter().zip(&b.gains) {
        assert_abs_diff_eq!(x, y, epsilon = epsilon);
    }
}

// =============================================================================
// Fixed scenarios
// =============================================================================

#[test]
fn coverage_scenario_naive_and_lazy_agree() {
    let naive = run(&OptimizerKind::naive(), scenario(), 3);
    let lazy = run(&OptimizerKind::lazy(), scenario(), 3);

    assert_eq!(naive.ranking, vec![3, 8, 1]);
    assert_same(&naive, &lazy, 1e-4);
    assert_abs_diff_eq!(naive.gains[0], 5.5, epsilon = 1e-4);
    assert_abs_diff_eq!(naive.gains[1], 4.5, epsilon = 1e-4);
    assert_abs_diff_eq!(naive.gains[2], 2.5, epsilon = 1e-4);
}

#[test]
fn facility_location_exact_optimizers_agree() {
    let sim = rbf_similarity(&random_features(80, 4, 12), 2.0);
    let naive = run(&OptimizerKind::naive(), FacilityLocation::new(sim.clone()), 12);

    for optimizer in [
        OptimizerKind::lazy(),
        OptimizerKind::approximate_lazy(1.0),
        OptimizerKind::two_stage(5),
    ] {
        let other = run(&optimizer, FacilityLocation::new(sim.clone()), 12);
        assert_same(&naive, &other, 1e-9);
    }
}

#[test]
fn nan_gains_rank_last_everywhere() {
    let gains = vec![f64::NAN, 2.0, f64::NAN, 1.0];

    for optimizer in [
        OptimizerKind::naive(),
        OptimizerKind::lazy(),
        OptimizerKind::two_stage(2),
        OptimizerKind::stochastic(0.01, 3),
        OptimizerKind::modular(),
    ] {
        let sel = run(&optimizer, FixedGains::new(gains.clone()), 4);
        assert_eq!(sel.ranking, vec![1, 3, 0, 2], "{optimizer:?}");
        assert_eq!(&sel.gains[..2], &[2.0, 1.0]);
        assert!(sel.gains[2..].iter().all(|g| g.is_nan()));
    }
}

#[test]
fn exact_gains_are_non_negative_and_non_increasing() {
    let sel = run(&OptimizerKind::lazy(), FeatureBased::new(random_features(150, 6, 2)), 40);

    assert!(sel.gains.iter().all(|&g| g >= 0.0));
    for pair in sel.gains.windows(2) {
        assert!(pair[1] <= pair[0] + 1e-12);
    }

    let mut prefix = 0.0;
    for &g in &sel.gains {
        let next = prefix + g;
        assert!(next >= prefix);
        prefix = next;
    }
}

// =============================================================================
// Property tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn lazy_matches_naive(n in 2usize..60, d in 1usize..6, k_frac in 0.05f64..1.0, seed in any::<u64>()) {
        let k = ((n as f64 * k_frac).ceil() as usize).clamp(1, n);
        let features = random_features(n, d, seed);

        let naive = run(&OptimizerKind::naive(), FeatureBased::new(features.clone()), k);
        let lazy = run(&OptimizerKind::lazy(), FeatureBased::new(features), k);

        prop_assert_eq!(&naive.ranking, &lazy.ranking);
        for (x, y) in naive.gains.iter().zip(&lazy.gains) {
            prop_assert!((x - y).abs() < 1e-9);
        }
    }

    #[test]
    fn approximate_lazy_keeps_its_guarantee(n in 10usize..80, beta in 0.1f64..1.0, seed in any::<u64>()) {
        let k = n / 3 + 1;
        let features = random_features(n, 4, seed);

        let exact = run(&OptimizerKind::lazy(), FeatureBased::new(features.clone()), k);
        let approx = run(&OptimizerKind::approximate_lazy(beta), FeatureBased::new(features), k);

        prop_assert_eq!(approx.len(), k);
        prop_assert!(approx.total_gain() >= (1.0 - (-beta).exp()) * exact.total_gain() - 1e-9);
    }

    #[test]
    fn exact_optimizers_agree_on_tied_coverage(
        (bits, weights, k) in (2usize..14, 1usize..8).prop_flat_map(|(n, m)| (
            prop::collection::vec(prop::collection::vec(0u8..2, m), n),
            prop::collection::vec(1u8..4, m),
            1..=n,
        ))
    ) {
        let naive = run(&OptimizerKind::naive(), coverage_from_bits(&bits, &weights), k);

        for optimizer in [
            OptimizerKind::lazy(),
            OptimizerKind::two_stage(1),
            OptimizerKind::approximate_lazy(1.0),
        ] {
            let other = run(&optimizer, coverage_from_bits(&bits, &weights), k);
            prop_assert_eq!(&naive.ranking, &other.ranking);
            prop_assert_eq!(&naive.gains, &other.gains);
        }
    }
}
