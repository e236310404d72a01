//! Rank-reduced eigenvalue entry points

use mdarray::DTensor;
use tracing::debug;

use crate::domain::Domain;
use crate::error::Result;
use crate::quadrature::QuadratureConfig;
use crate::separable::{decompose, DecompositionConfig, SeparableRepresentation};

use super::pairing::{FactorPairing, KernelPairing, MatrixPairFactors};
use super::result::EigenResult;
use super::solver::{DenseEigenSolver, SchurEigenSolver};

/// Eigenvalues of the operator behind `pairing`, via its n×n paired matrix.
///
/// A pairing of rank 0 gives an empty result without calling the solver.
pub fn reduce<P, S>(pairing: &P, solver: &S) -> Result<EigenResult>
where
    P: FactorPairing + ?Sized,
    S: DenseEigenSolver + ?Sized,
{
    let n = pairing.rank();
    if n == 0 {
        debug!("rank-0 operator, nothing to solve");
        return Ok(EigenResult::empty(
            pairing.implicit_zeros(),
            pairing.approximate(),
        ));
    }

    let matrix = pairing.pair()?;
    debug!(size = n, solver = solver.name(), "solving reduced eigenproblem");
    let eigenvalues = solver.eigenvalues(&matrix)?;

    Ok(EigenResult {
        eigenvalues,
        implicit_zeros: pairing.implicit_zeros(),
        approximate: pairing.approximate(),
    })
}

/// Nonzero spectrum of the m×m matrix `A Bᵀ` from the n×n matrix `Bᵀ A`.
///
/// # Arguments
///
/// * `a`, `b` - Factors of identical shape m×n
///
/// # Returns
///
/// n eigenvalues plus `max(m - n, 0)` implicit zeros. If either factor is
/// identically zero the result is empty with m implicit zeros.
///
/// # Errors
///
/// * `DimensionMismatch` when the shapes differ
/// * `InvalidParameter` when an entry is NaN or infinite
/// * `SolverFailure` when the dense solver does not converge
#[tracing::instrument(skip_all, fields(shape = ?a.shape()))]
pub fn eigenvalues_of_product(a: &DTensor<f64, 2>, b: &DTensor<f64, 2>) -> Result<EigenResult> {
    let pairing = MatrixPairFactors::new(a, b)?;
    reduce(&pairing, &SchurEigenSolver::default())
}

/// Spectrum of the integral operator `(Kφ)(x) = ∫ f(x, y) φ(y) dy` of a
/// separable kernel, with the default quadrature and solver.
pub fn eigenvalues_of_kernel(representation: &SeparableRepresentation) -> Result<EigenResult> {
    eigenvalues_of_kernel_with(
        representation,
        &QuadratureConfig::default(),
        &SchurEigenSolver::default(),
    )
}

/// [`eigenvalues_of_kernel`] with explicit quadrature and solver.
///
/// The result has exactly `representation.rank()` eigenvalues and no implicit
/// zeros, and is marked approximate when the representation was rank-capped.
/// Fails with `DomainMismatch` for a nonempty kernel on a non-square domain.
#[tracing::instrument(skip_all, fields(rank = representation.rank()))]
pub fn eigenvalues_of_kernel_with(
    representation: &SeparableRepresentation,
    quadrature: &QuadratureConfig,
    solver: &dyn DenseEigenSolver,
) -> Result<EigenResult> {
    let pairing = KernelPairing::new(representation, quadrature.clone());
    reduce(&pairing, solver)
}

/// Decompose `f` on `domain`, then compute the spectrum of the resulting kernel.
pub fn eigenvalues_of_function<F>(
    function: F,
    domain: Domain,
    config: &DecompositionConfig,
    quadrature: &QuadratureConfig,
) -> Result<EigenResult>
where
    F: Fn(f64, f64) -> f64 + Send + Sync + 'static,
{
    let representation = decompose(function, domain, config)?;
    eigenvalues_of_kernel_with(&representation, quadrature, &SchurEigenSolver::default())
}
