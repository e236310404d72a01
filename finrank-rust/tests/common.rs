//! Common test utilities

#![allow(dead_code)]

use finrank_rust::mdarray_compat::tensor_to_dmatrix;
use finrank_rust::{Complex64, DTensor, DenseEigenSolver, SchurEigenSolver};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// m×n matrix of i.i.d. N(0, 1) entries times `scale`, reproducible from `seed`
pub fn normal_matrix(rows: usize, cols: usize, scale: f64, seed: u64) -> DTensor<f64, 2> {
    let mut rng = StdRng::seed_from_u64(seed);
    let values: Vec<f64> = (0..rows * cols)
        .map(|_| scale * rng.sample::<f64, _>(StandardNormal))
        .collect();
    DTensor::<f64, 2>::from_fn([rows, cols], |idx| values[idx[0] * cols + idx[1]])
}

/// Seeded N(0, 1) samples
pub fn normal_samples(count: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| rng.sample::<f64, _>(StandardNormal))
        .collect()
}

/// All m eigenvalues of the m×m matrix `A Bᵀ`, computed directly
pub fn direct_product_eigenvalues(a: &DTensor<f64, 2>, b: &DTensor<f64, 2>) -> Vec<Complex64> {
    let product = tensor_to_dmatrix(a) * tensor_to_dmatrix(b).transpose();
    SchurEigenSolver::default()
        .eigenvalues(&product)
        .expect("direct eigenvalues")
}

/// Distance from `z` to the closest entry of `candidates`
pub fn distance_to_nearest(z: Complex64, candidates: &[Complex64]) -> f64 {
    candidates
        .iter()
        .map(|c| (z - c).norm())
        .fold(f64::INFINITY, f64::min)
}
