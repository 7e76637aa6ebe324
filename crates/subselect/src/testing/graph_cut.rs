use ndarray::{Array1, Array2, Axis};

use crate::oracle::{GainOracle, ReversibleOracle};

/// Undirected graph cut: `f(S)` is the total weight of edges with exactly one
/// endpoint in `S`.
///
/// Submodular but not monotone, so gains go negative once `S` holds most of
/// a dense neighborhood.
#[derive(Debug, Clone)]
pub struct GraphCut {
    weights: Array2<f64>,
    degree: Array1<f64>,
    inside: Array1<f64>,
    selected: Vec<bool>,
}

impl GraphCut {
    /// Build from a symmetric, non-negative weight matrix. The diagonal is
    /// ignored.
    ///
    /// # Panics
    ///
    /// Panics if `weights` is not square.
    pub fn new(mut weights: Array2<f64>) -> Self {
        let (n, m) = weights.dim();
        assert_eq!(n, m, "weight matrix must be square");
        weights.diag_mut().fill(0.0);
        let degree = weights.sum_axis(Axis(1));
        Self {
            weights,
            degree,
            inside: Array1::zeros(n),
            selected: vec![false; n],
        }
    }

    /// Current cut weight.
    pub fn value(&self) -> f64 {
        self.selected
            .iter()
            .enumerate()
            .filter(|&(_, &s)| s)
            .map(|(i, _)| self.degree[i] - self.inside[i])
            .sum()
    }

    fn add_neighbors(&mut self, index: usize, sign: f64) {
        let row = self.weights.row(index);
        self.inside.scaled_add(sign, &row);
    }
}

impl GainOracle for GraphCut {
    fn n_items(&self) -> usize {
        self.selected.len()
    }

    fn initialize(&mut self, initial_subset: Option<&[usize]>) {
        self.inside.fill(0.0);
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
                self.degree[index] - 2.0 * self.inside[index]
            };
        }
    }

    fn select_next(&mut self, index: usize) {
        if self.selected[index] {
            return;
        }
        self.selected[index] = true;
        self.add_neighbors(index, 1.0);
    }

    fn is_selected(&self, index: usize) -> bool {
        self.selected[index]
    }
}

impl ReversibleOracle for GraphCut {
    fn calculate_removal_gains(&self, candidates: &[usize], gains: &mut [f64]) {
        for (&index, gain) in candidates.iter().zip(gains.iter_mut()) {
            *gain = if self.selected[index] {
                2.0 * self.inside[index] - self.degree[index]
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
        self.add_neighbors(index, -1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn triangle() -> GraphCut {
        GraphCut::new(array![
            [0.0, 1.0, 2.0],
            [1.0, 0.0, 3.0],
            [2.0, 3.0, 0.0],
        ])
    }

    #[test]
    fn gains_turn_negative() {
        let mut g = triangle();
        assert_eq!(g.gain(2), 5.0);
        g.select_next(2);
        assert_eq!(g.value(), 5.0);
        // Adding 1 cuts edge 0-1 but un-cuts edge 1-2.
        assert_eq!(g.gain(1), -2.0);
        g.select_next(0);
        assert_eq!(g.value(), 4.0);
        assert_eq!(g.gain(1), -4.0);
    }

    #[test]
    fn removal_undoes_addition() {
        let mut g = triangle();
        g.initialize(Some(&[0, 1, 2]));
        assert_eq!(g.value(), 0.0);
        assert_eq!(g.removal_gain(1), 4.0);

        g.deselect(1);
        assert_eq!(g.value(), 4.0);
        assert_eq!(g.gain(1), -4.0);
    }
}
