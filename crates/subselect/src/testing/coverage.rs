use crate::oracle::{GainOracle, ReversibleOracle};

/// Weighted set cover: `f(S)` is the total weight of concepts covered by at
/// least one element of `S`.
///
/// Per-concept cover counts make both additions and removals O(|cover|).
#[derive(Debug, Clone)]
pub struct WeightedCoverage {
    covers: Vec<Vec<usize>>,
    weights: Vec<f64>,
    counts: Vec<u32>,
    selected: Vec<bool>,
}

impl WeightedCoverage {
    /// `covers[i]` lists the concepts element `i` covers; `weights[c]` is the
    /// weight of concept `c`.
    ///
    /// # Panics
    ///
    /// Panics if a cover references a concept without a weight.
    pub fn new(covers: Vec<Vec<usize>>, weights: Vec<f64>) -> Self {
        let covers: Vec<Vec<usize>> = covers
            .into_iter()
            .map(|mut cover| {
                cover.sort_unstable();
                cover.dedup();
                assert!(
                    cover.iter().all(|&c| c < weights.len()),
                    "cover references a concept without a weight"
                );
                cover
            })
            .collect();
        let n = covers.len();
        Self {
            counts: vec![0; weights.len()],
            selected: vec![false; n],
            covers,
            weights,
        }
    }

    /// Coverage from a dense 0/1 matrix, one row per element, unit weights.
    pub fn from_bits(rows: &[&[u8]]) -> Self {
        let n_concepts = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let covers = rows
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter(|&(_, &bit)| bit != 0)
                    .map(|(c, _)| c)
                    .collect()
            })
            .collect();
        Self::new(covers, vec![1.0; n_concepts])
    }

    /// Current objective value.
    pub fn value(&self) -> f64 {
        self.counts
            .iter()
            .zip(&self.weights)
            .filter(|&(&count, _)| count > 0)
            .map(|(_, &w)| w)
            .sum()
    }
}

impl GainOracle for WeightedCoverage {
    fn n_items(&self) -> usize {
        self.covers.len()
    }

    fn initialize(&mut self, initial_subset: Option<&[usize]>) {
        self.counts.fill(0);
        self.selected.fill(false);
        for &index in initial_subset.unwrap_or_default() {
            self.select_next(index);
        }
    }

    fn calculate_gains(&self, candidates: &[usize], gains: &mut [f64]) {
        for (&index, gain) in candidates.iter().zip(gains.iter_mut()) {
            *gain = if self.selected[index] {
                0.0
            } else {
                self.covers[index]
                    .iter()
                    .filter(|&&c| self.counts[c] == 0)
                    .map(|&c| self.weights[c])
                    .sum()
            };
        }
    }

    fn select_next(&mut self, index: usize) {
        if self.selected[index] {
            return;
        }
        self.selected[index] = true;
        for &c in &self.covers[index] {
            self.counts[c] += 1;
        }
    }

    fn is_selected(&self, index: usize) -> bool {
        self.selected[index]
    }
}

impl ReversibleOracle for WeightedCoverage {
    fn calculate_removal_gains(&self, candidates: &[usize], gains: &mut [f64]) {
        for (&index, gain) in candidates.iter().zip(gains.iter_mut()) {
            *gain = if self.selected[index] {
                -self.covers[index]
                    .iter()
                    .filter(|&&c| self.counts[c] == 1)
                    .map(|&c| self.weights[c])
                    .sum::<f64>()
            } else {
                0.0
            };
        }
    }

    fn deselect(&mut self, index: usize) {
        if !self.selected[index] {
            return;
        }
        self.selected[index] = false;
        for &c in &self.covers[index] {
            self.counts[c] -= 1;
        }
    }
}
