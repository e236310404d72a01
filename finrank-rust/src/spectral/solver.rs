//! Dense eigenvalue backends

use nalgebra::linalg::Schur;
use nalgebra::DMatrix;
use num_complex::Complex64;
use tracing::warn;

use crate::error::{FinrankError, Result};

//==============================================================================
// DenseEigenSolver Trait
//==============================================================================

/// Eigenvalues of a small dense real matrix.
///
/// Implementations return all n eigenvalues of an n×n matrix, in no
/// particular order, or `SolverFailure` when they do not converge.
pub trait DenseEigenSolver: Send + Sync {
    fn eigenvalues(&self, matrix: &DMatrix<f64>) -> Result<Vec<Complex64>>;

    /// Returns backend name for debugging
    fn name(&self) -> &'static str;
}

//==============================================================================
// Schur Backend (Default)
//==============================================================================

/// Real Schur decomposition via nalgebra's Francis QR iteration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchurEigenSolver {
    /// Convergence threshold on subdiagonal entries
    pub epsilon: f64,
    /// Iteration cap; 0 iterates until convergence
    pub max_iterations: usize,
}

impl Default for SchurEigenSolver {
    fn default() -> Self {
        Self {
            epsilon: f64::EPSILON,
            max_iterations: 10_000,
        }
    }
}

impl SchurEigenSolver {
    pub fn new(epsilon: f64, max_iterations: usize) -> Self {
        Self {
            epsilon,
            max_iterations,
        }
    }
}

impl DenseEigenSolver for SchurEigenSolver {
    fn eigenvalues(&self, matrix: &DMatrix<f64>) -> Result<Vec<Complex64>> {
        let size = matrix.nrows();
        if matrix.ncols() != size {
            return Err(FinrankError::InvalidParameter(format!(
                "eigenvalues need a square matrix, got {}x{}",
                size,
                matrix.ncols()
            )));
        }
        if size == 0 {
            return Ok(Vec::new());
        }
        if matrix.iter().any(|v| !v.is_finite()) {
            warn!(size, "reduced matrix has non-finite entries");
            return Err(FinrankError::SolverFailure { size });
        }

        match Schur::try_new(matrix.clone(), self.epsilon, self.max_iterations) {
            Some(schur) => Ok(schur.complex_eigenvalues().iter().copied().collect()),
            None => {
                warn!(
                    size,
                    max_iterations = self.max_iterations,
                    "Schur iteration did not converge"
                );
                Err(FinrankError::SolverFailure { size })
            }
        }
    }

    fn name(&self) -> &'static str {
        "Schur (nalgebra)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn sorted_by_real(mut values: Vec<Complex64>) -> Vec<Complex64> {
        values.sort_by(|a, b| a.re.total_cmp(&b.re).then(a.im.total_cmp(&b.im)));
        values
    }

    #[test]
    fn test_triangular_matrix() {
        let m = DMatrix::from_row_slice(3, 3, &[2.0, 1.0, 5.0, 0.0, -1.0, 4.0, 0.0, 0.0, 3.0]);
        let values = sorted_by_real(SchurEigenSolver::default().eigenvalues(&m).unwrap());
        let expected = [-1.0, 2.0, 3.0];
        for (v, e) in values.iter().zip(expected) {
            assert_abs_diff_eq!(v.re, e, epsilon = 1e-12);
            assert_abs_diff_eq!(v.im, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_rotation_has_complex_pair() {
        let m = DMatrix::from_row_slice(2, 2, &[0.0, -1.0, 1.0, 0.0]);
        let values = sorted_by_real(SchurEigenSolver::default().eigenvalues(&m).unwrap());
        assert_eq!(values.len(), 2);
        for v in &values {
            assert_abs_diff_eq!(v.re, 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!(v.im.abs(), 1.0, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(values[0].im + values[1].im, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_matrix() {
        let m = DMatrix::<f64>::zeros(0, 0);
        assert!(SchurEigenSolver::default().eigenvalues(&m).unwrap().is_empty());
    }

    #[test]
    fn test_non_finite_entries_fail() {
        let m = DMatrix::from_row_slice(2, 2, &[1.0, f64::NAN, 0.0, 1.0]);
        assert_eq!(
            SchurEigenSolver::default().eigenvalues(&m),
            Err(FinrankError::SolverFailure { size: 2 })
        );
    }

    #[test]
    fn test_non_square_rejected() {
        let m = DMatrix::<f64>::zeros(2, 3);
        assert!(matches!(
            SchurEigenSolver::default().eigenvalues(&m),
            Err(FinrankError::InvalidParameter(_))
        ));
    }
}
