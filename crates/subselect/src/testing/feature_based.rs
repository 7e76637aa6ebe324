use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::oracle::GainOracle;

/// Concave function applied per feature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Concavity {
    #[default]
    Sqrt,
    /// `ln(1 + x)`
    Log,
}

impl Concavity {
    #[inline]
    fn apply(self, x: f64) -> f64 {
        match self {
            Concavity::Sqrt => x.sqrt(),
            Concavity::Log => x.ln_1p(),
        }
    }
}

/// Feature-based objective: `f(S) = sum_d phi(sum_{i in S} x[i, d])`.
///
/// Monotone submodular for non-negative features and a concave `phi`.
#[derive(Debug, Clone)]
pub struct FeatureBased {
    features: Array2<f64>,
    concavity: Concavity,
    totals: Array1<f64>,
    selected: Vec<bool>,
}

impl FeatureBased {
    /// # Panics
    ///
    /// Panics if any feature is negative.
    pub fn new(features: Array2<f64>) -> Self {
        assert!(
            features.iter().all(|&x| x >= 0.0),
            "feature-based objectives need non-negative features"
        );
        let (n, d) = features.dim();
        Self {
            features,
            concavity: Concavity::default(),
            totals: Array1::zeros(d),
            selected: vec![false; n],
        }
    }

    pub fn with_concavity(mut self, concavity: Concavity) -> Self {
        self.concavity = concavity;
        self
    }

    /// Current objective value.
    pub fn value(&self) -> f64 {
        self.totals.iter().map(|&t| self.concavity.apply(t)).sum()
    }
}

impl GainOracle for FeatureBased {
    fn n_items(&self) -> usize {
        self.features.nrows()
    }

    fn initialize(&mut self, initial_subset: Option<&[usize]>) {
        self.totals.fill(0.0);
        self.selected.fill(false);
        for &index in initial_subset.unwrap_or_default() {
            self.select_next(index);
        }
    }

    fn calculate_gains(&self, candidates: &[usize], gains: &mut [f64]) {
        for (&index, gain) in candidates.iter().zip(gains.iter_mut()) {
            if self.selected[index] {
                *gain = 0.0;
                continue;
            }
            *gain = self
                .features
                .row(index)
                .iter()
                .zip(&self.totals)
                .map(|(&x, &t)| self.concavity.apply(t + x) - self.concavity.apply(t))
                .sum();
        }
    }

    fn select_next(&mut self, index: usize) {
        if self.selected[index] {
            return;
        }
        self.selected[index] = true;
        self.totals += &self.features.row(index);
    }

    fn is_selected(&self, index: usize) -> bool {
        self.selected[index]
    }
}
