//! Rank-reduced eigenvalue computation
//!
//! The nonzero eigenvalues of a rank-n operator are found from an n×n
//! matrix, never from the operator's native (possibly infinite) size:
//! `A Bᵀ` through `Bᵀ A`, and a separable kernel through the quadrature
//! pairing of its factors.

mod compute;
mod pairing;
mod result;
mod solver;

pub use compute::{
    eigenvalues_of_function, eigenvalues_of_kernel, eigenvalues_of_kernel_with,
    eigenvalues_of_product, reduce,
};
pub use pairing::{FactorPairing, KernelPairing, MatrixPairFactors};
pub use result::EigenResult;
pub use solver::{DenseEigenSolver, SchurEigenSolver};
