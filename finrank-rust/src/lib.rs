//! # finrank-rust: low-rank separable approximation and rank-reduced eigenvalues
//!
//! Two cooperating pieces:
//!
//! - [`separable`] approximates a bivariate function `f(x, y)` on a rectangle
//!   by a short sum `Σ_k w_k r_k(x) c_k(y)`, choosing the number of terms
//!   adaptively from a tolerance.
//! - [`spectral`] computes the nonzero eigenvalues of a finite-rank operator
//!   from an n×n matrix built out of its factors: `A Bᵀ` through `Bᵀ A`, and
//!   the integral operator of a separable kernel through quadrature.
//!
//! ```no_run
//! use finrank_rust::{decompose, eigenvalues_of_kernel, DecompositionConfig, Domain, Tolerance};
//!
//! let domain = Domain::square(-1.0, 1.0)?;
//! let config = DecompositionConfig::new(Tolerance::Relative(1e-10), 50);
//! let repr = decompose(|x, y| x * y + (x * y).powi(2), domain, &config)?;
//! let spectrum = eigenvalues_of_kernel(&repr)?;
//! assert_eq!(spectrum.len(), repr.rank());
//! # Ok::<(), finrank_rust::FinrankError>(())
//! ```

pub mod domain;
pub mod error;
pub mod gauss;
pub mod mdarray_compat; // DTensor <-> nalgebra::DMatrix
pub mod numeric;
pub mod quadrature;
pub mod separable;
pub mod spectral;

// Re-export commonly used types and traits
pub use domain::Domain;
pub use error::{FinrankError, Result};
pub use gauss::{legendre, Rule};
pub use numeric::CustomNumeric;
pub use quadrature::{inner_product, integrate, QuadratureConfig, WorkingPrecision};
pub use separable::{
    decompose, decompose_shared, BivariateFn, DecompositionConfig, Pivot, SamplingGrid,
    SeparableFactor, SeparableRepresentation, Tolerance,
};
pub use spectral::{
    eigenvalues_of_function, eigenvalues_of_kernel, eigenvalues_of_kernel_with,
    eigenvalues_of_product, reduce, DenseEigenSolver, EigenResult, FactorPairing, KernelPairing,
    MatrixPairFactors, SchurEigenSolver,
};

// Re-export external dependencies for convenience
pub use mdarray::DTensor;
pub use num_complex::Complex64;
pub use twofloat::TwoFloat;
