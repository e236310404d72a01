//! Factor pairings: the small matrix whose spectrum is the operator's
//!
//! A rank-n operator `Σ_k a_k ⊗ b_k` has the same nonzero eigenvalues as the
//! n×n matrix `M[i, j] = ⟨b_i, a_j⟩`. For a pair of m×n matrices this is
//! `Bᵀ A`; for a separable kernel the pairing is an integral over the shared
//! variable.

use mdarray::DTensor;
use nalgebra::DMatrix;
use rayon::prelude::*;
use tracing::debug;
use twofloat::TwoFloat;

use crate::error::{FinrankError, Result};
use crate::mdarray_compat::tensor_to_dmatrix;
use crate::numeric::CustomNumeric;
use crate::quadrature::{weighted_dot, QuadratureConfig, WorkingPrecision};
use crate::separable::SeparableRepresentation;

/// Multiply-adds above which `Bᵀ A` is formed in parallel
const PARALLEL_WORK: usize = 1 << 16;

/// Source of a rank-reduced eigenvalue problem
pub trait FactorPairing {
    /// Size n of the paired matrix
    fn rank(&self) -> usize;

    /// Zero eigenvalues of the full operator not represented in the paired matrix
    fn implicit_zeros(&self) -> usize;

    /// Whether the factors only approximate the operator
    fn approximate(&self) -> bool {
        false
    }

    /// The n×n matrix `M[i, j] = ⟨b_i, a_j⟩`
    fn pair(&self) -> Result<DMatrix<f64>>;
}

//==============================================================================
// Discrete factors
//==============================================================================

/// Factors of the m×m matrix `A Bᵀ`, both m×n
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixPairFactors {
    a: DMatrix<f64>,
    b: DMatrix<f64>,
}

impl MatrixPairFactors {
    /// Fails with `DimensionMismatch` unless `a` and `b` have the same shape.
    pub fn new(a: &DTensor<f64, 2>, b: &DTensor<f64, 2>) -> Result<Self> {
        Self::from_nalgebra(tensor_to_dmatrix(a), tensor_to_dmatrix(b))
    }

    pub fn from_nalgebra(a: DMatrix<f64>, b: DMatrix<f64>) -> Result<Self> {
        if a.shape() != b.shape() {
            return Err(FinrankError::DimensionMismatch {
                left: a.shape(),
                right: b.shape(),
            });
        }
        if a.iter().chain(b.iter()).any(|v| !v.is_finite()) {
            return Err(FinrankError::InvalidParameter(
                "factor entries must be finite".into(),
            ));
        }
        Ok(Self { a, b })
    }

    pub fn a(&self) -> &DMatrix<f64> {
        &self.a
    }

    pub fn b(&self) -> &DMatrix<f64> {
        &self.b
    }

    /// (m, n)
    pub fn shape(&self) -> (usize, usize) {
        self.a.shape()
    }

    /// Either factor is identically zero, so `A Bᵀ` is the zero matrix.
    pub fn is_degenerate(&self) -> bool {
        self.a.iter().all(|&v| v == 0.0) || self.b.iter().all(|&v| v == 0.0)
    }
}

impl FactorPairing for MatrixPairFactors {
    fn rank(&self) -> usize {
        if self.is_degenerate() {
            0
        } else {
            self.a.ncols()
        }
    }

    fn implicit_zeros(&self) -> usize {
        let (m, n) = self.shape();
        if self.is_degenerate() {
            m
        } else {
            m.saturating_sub(n)
        }
    }

    fn pair(&self) -> Result<DMatrix<f64>> {
        let (m, n) = self.shape();
        if m.saturating_mul(n).saturating_mul(n) < PARALLEL_WORK {
            return Ok(self.b.tr_mul(&self.a));
        }

        let entries: Vec<f64> = (0..n * n)
            .into_par_iter()
            .map(|idx| self.b.column(idx / n).dot(&self.a.column(idx % n)))
            .collect();
        Ok(DMatrix::from_fn(n, n, |i, j| entries[i * n + j]))
    }
}

//==============================================================================
// Continuous factors
//==============================================================================

/// Pairing of a separable kernel's factors by quadrature.
///
/// `M[i, j] = w_j ∫ r_j(t) c_i(t) dt` over the interval shared by both
/// variables, which mirrors `Bᵀ A` with `A = [w_k r_k]` and `B = [c_k]`.
#[derive(Debug, Clone)]
pub struct KernelPairing<'a> {
    representation: &'a SeparableRepresentation,
    quadrature: QuadratureConfig,
}

impl<'a> KernelPairing<'a> {
    pub fn new(representation: &'a SeparableRepresentation, quadrature: QuadratureConfig) -> Self {
        Self {
            representation,
            quadrature,
        }
    }

    pub fn representation(&self) -> &SeparableRepresentation {
        self.representation
    }

    pub fn quadrature(&self) -> &QuadratureConfig {
        &self.quadrature
    }

    fn pair_in<T: CustomNumeric>(&self, a: f64, b: f64) -> Result<DMatrix<f64>> {
        let repr = self.representation;
        let n = repr.rank();
        let rule = self.quadrature.rule::<T>(a, b)?;
        let nodes = rule.nodes_f64();

        // values[q][k] for every node t_q
        let (rows_at, columns_at): (Vec<Vec<f64>>, Vec<Vec<f64>>) = nodes
            .par_iter()
            .map(|&t| (repr.row_values(t), repr.column_values(t)))
            .unzip();
        if let Some(q) = rows_at
            .iter()
            .zip(columns_at.iter())
            .position(|(r, c)| r.iter().chain(c.iter()).any(|v| !v.is_finite()))
        {
            return Err(FinrankError::NonFiniteSample {
                x: nodes[q],
                y: nodes[q],
            });
        }

        // Transpose to per-factor sample vectors
        let rows: Vec<Vec<f64>> = (0..n)
            .map(|k| rows_at.iter().map(|values| values[k]).collect())
            .collect();
        let columns: Vec<Vec<f64>> = (0..n)
            .map(|k| columns_at.iter().map(|values| values[k]).collect())
            .collect();
        let weights = repr.weights();

        let entries: Vec<f64> = (0..n * n)
            .into_par_iter()
            .map(|idx| {
                let (i, j) = (idx / n, idx % n);
                weights[j] * weighted_dot(&rule.w, &rows[j], &columns[i])
            })
            .collect();

        debug!(size = n, nodes = nodes.len(), "assembled kernel pairing");
        Ok(DMatrix::from_fn(n, n, |i, j| entries[i * n + j]))
    }
}

impl FactorPairing for KernelPairing<'_> {
    fn rank(&self) -> usize {
        self.representation.rank()
    }

    fn implicit_zeros(&self) -> usize {
        0
    }

    fn approximate(&self) -> bool {
        self.representation.is_rank_capped()
    }

    fn pair(&self) -> Result<DMatrix<f64>> {
        let (a, b) = self.representation.domain().shared_interval()?;
        match self.quadrature.precision {
            WorkingPrecision::Float64 => self.pair_in::<f64>(a, b),
            WorkingPrecision::Float64X2 => self.pair_in::<TwoFloat>(a, b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn tensor(rows: usize, cols: usize, data: &[f64]) -> DTensor<f64, 2> {
        DTensor::<f64, 2>::from_fn([rows, cols], |idx| data[idx[0] * cols + idx[1]])
    }

    #[test]
    fn test_shape_mismatch() {
        let a = tensor(3, 2, &[1.0; 6]);
        let b = tensor(2, 3, &[1.0; 6]);
        assert_eq!(
            MatrixPairFactors::new(&a, &b),
            Err(FinrankError::DimensionMismatch {
                left: (3, 2),
                right: (2, 3)
            })
        );
    }

    #[test]
    fn test_non_finite_entries_rejected() {
        let a = tensor(2, 2, &[1.0, f64::NAN, 0.0, 1.0]);
        let b = tensor(2, 2, &[1.0; 4]);
        assert!(matches!(
            MatrixPairFactors::new(&a, &b),
            Err(FinrankError::InvalidParameter(_))
        ));
        let b = DMatrix::from_element(2, 2, f64::INFINITY);
        assert!(matches!(
            MatrixPairFactors::from_nalgebra(DMatrix::identity(2, 2), b),
            Err(FinrankError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_pair_is_bt_a() {
        let a = tensor(3, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let b = tensor(3, 2, &[1.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
        let pairing = MatrixPairFactors::new(&a, &b).unwrap();
        let m = pairing.pair().unwrap();

        // Bᵀ A = [[1+5, 2+6], [3+5, 4+6]]
        assert_eq!(m, DMatrix::from_row_slice(2, 2, &[6.0, 8.0, 8.0, 10.0]));
        assert_eq!(pairing.rank(), 2);
        assert_eq!(pairing.implicit_zeros(), 1);
        assert!(!pairing.approximate());
    }

    #[test]
    fn test_parallel_pair_matches_serial() {
        let (m, n) = (80, 30);
        let a = DMatrix::from_fn(m, n, |i, j| ((i * 7 + j * 3) % 11) as f64 - 5.0);
        let b = DMatrix::from_fn(m, n, |i, j| ((i * 5 + j * 2) % 13) as f64 * 0.1);
        let pairing = MatrixPairFactors::from_nalgebra(a.clone(), b.clone()).unwrap();
        assert!(m * n * n >= PARALLEL_WORK);

        let expected = b.tr_mul(&a);
        let actual = pairing.pair().unwrap();
        for (x, y) in actual.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(*x, *y, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_wide_factors_have_no_implicit_zeros() {
        let a = tensor(2, 4, &[1.0; 8]);
        let pairing = MatrixPairFactors::new(&a, &a).unwrap();
        assert_eq!(pairing.rank(), 4);
        assert_eq!(pairing.implicit_zeros(), 0);
    }

    #[test]
    fn test_zero_factor_is_degenerate() {
        let a = tensor(4, 2, &[0.0; 8]);
        let b = tensor(4, 2, &[1.0; 8]);
        let pairing = MatrixPairFactors::new(&a, &b).unwrap();
        assert!(pairing.is_degenerate());
        assert_eq!(pairing.rank(), 0);
        assert_eq!(pairing.implicit_zeros(), 4);
    }
}
