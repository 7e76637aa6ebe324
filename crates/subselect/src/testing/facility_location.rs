use ndarray::{Array1, Array2};

use crate::oracle::GainOracle;

/// Facility location: `f(S) = sum_j max_{i in S} sim[i, j]`.
///
/// Each point is represented by its most similar selected element.
/// Similarities must be non-negative.
#[derive(Debug, Clone)]
pub struct FacilityLocation {
    similarity: Array2<f64>,
    best: Array1<f64>,
    selected: Vec<bool>,
}

impl FacilityLocation {
    /// # Panics
    ///
    /// Panics if `similarity` is not square.
    pub fn new(similarity: Array2<f64>) -> Self {
        let (n, m) = similarity.dim();
        assert_eq!(n, m, "similarity matrix must be square");
        Self {
            similarity,
            best: Array1::zeros(n),
            selected: vec![false; n],
        }
    }

    /// Current objective value.
    pub fn value(&self) -> f64 {
        self.best.sum()
    }
}

impl GainOracle for FacilityLocation {
    fn n_items(&self) -> usize {
        self.selected.len()
    }

    fn initialize(&mut self, initial_subset: Option<&[usize]>) {
        self.best.fill(0.0);
        self.selected.fill(false);
        for &index in initial_subset.unwrap_or_default() {
            self.select_next(index);
        }
    }

    fn calculate_gains(&self, candidates: &[usize], gains: &mut [f64]) {
        for (&index, gain) in candidates.iter().zip(gains.iter_mut()) {
            *gain = self
                .similarity
                .row(index)
                .iter()
                .zip(&self.best)
                .map(|(&s, &b)| (s - b).max(0.0))
                .sum();
        }
    }

    fn select_next(&mut self, index: usize) {
        self.selected[index] = true;
        let row = self.similarity.row(index);
        self.best.zip_mut_with(&row, |b, &s| *b = b.max(s));
    }

    fn is_selected(&self, index: usize) -> bool {
        self.selected[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn gains_track_best_similarity() {
        let mut o = FacilityLocation::new(array![
            [1.0, 0.8, 0.1],
            [0.8, 1.0, 0.2],
            [0.1, 0.2, 1.0],
        ]);
        assert_relative_eq!(o.gain(1), 2.0, epsilon = 1e-12);

        o.select_next(1);
        // Points 0 and 1 are already well represented by element 1.
        assert_relative_eq!(o.gain(0), 0.2, epsilon = 1e-12);
        assert_relative_eq!(o.gain(2), 0.8, epsilon = 1e-12);
        assert_relative_eq!(o.gain(1), 0.0);
        assert_relative_eq!(o.value(), 2.0, epsilon = 1e-12);
    }
}
