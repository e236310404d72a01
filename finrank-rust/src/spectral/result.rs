//! Result of a rank-reduced eigenvalue computation

use num_complex::Complex64;

/// Spectrum of a finite-rank operator.
///
/// `eigenvalues` are those of the reduced n×n problem, unordered. The full
/// operator has `implicit_zeros` further zero eigenvalues that were never
/// computed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EigenResult {
    pub eigenvalues: Vec<Complex64>,
    pub implicit_zeros: usize,
    /// Set when the eigenvalues come from a rank-capped decomposition
    pub approximate: bool,
}

impl EigenResult {
    /// No explicit eigenvalues
    pub fn empty(implicit_zeros: usize, approximate: bool) -> Self {
        Self {
            eigenvalues: Vec::new(),
            implicit_zeros,
            approximate,
        }
    }

    /// Number of explicitly computed eigenvalues
    pub fn len(&self) -> usize {
        self.eigenvalues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.eigenvalues.is_empty()
    }

    /// Explicit plus implicit eigenvalue count
    pub fn total_dimension(&self) -> usize {
        self.eigenvalues.len() + self.implicit_zeros
    }

    /// Largest modulus; 0 for an empty result
    pub fn spectral_radius(&self) -> f64 {
        self.eigenvalues
            .iter()
            .map(|z| z.norm())
            .fold(0.0, f64::max)
    }

    /// Explicit eigenvalues by decreasing modulus
    pub fn sorted_by_modulus(&self) -> Vec<Complex64> {
        let mut values = self.eigenvalues.clone();
        values.sort_by(|a, b| b.norm().total_cmp(&a.norm()));
        values
    }

    /// Explicit eigenvalues with modulus above `threshold`
    pub fn nonzero(&self, threshold: f64) -> Vec<Complex64> {
        self.eigenvalues
            .iter()
            .copied()
            .filter(|z| z.norm() > threshold)
            .collect()
    }

    /// Eigenvalues multiplied by `factor`, e.g. a 1/N normalization of a
    /// random-matrix ensemble.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            eigenvalues: self.eigenvalues.iter().map(|z| z * factor).collect(),
            implicit_zeros: self.implicit_zeros,
            approximate: self.approximate,
        }
    }
}
