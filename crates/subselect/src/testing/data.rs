use ndarray::Array2;
use rand::prelude::*;

/// Random non-negative features, uniform in `[0, 1)`, shape `(n, d)`.
pub fn random_features(n: usize, d: usize, seed: u64) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::from_shape_simple_fn((n, d), || rng.r#gen::<f64>())
}

/// Gaussian kernel `exp(-gamma * |x_i - x_j|^2)` over the rows of `features`.
///
/// The result is symmetric with a unit diagonal.
pub fn rbf_similarity(features: &Array2<f64>, gamma: f64) -> Array2<f64> {
    let n = features.nrows();
    let mut sim = Array2::zeros((n, n));
    for i in 0..n {
        sim[[i, i]] = 1.0;
        for j in (i + 1)..n {
            let dist: f64 = features
                .row(i)
                .iter()
                .zip(features.row(j))
                .map(|(a, b)| (a - b) * (a - b))
                .sum();
            let s = (-gamma * dist).exp();
            sim[[i, j]] = s;
            sim[[j, i]] = s;
        }
    }
    sim
}
