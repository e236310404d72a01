//! One-dimensional quadrature and inner products
//!
//! Composite Gauss-Legendre integration of univariate callables over an
//! interval. This is the inner-product routine the continuous reduction pairs
//! row and column functions with.

use crate::error::{FinrankError, Result};
use crate::gauss::{legendre, Rule};
use crate::numeric::CustomNumeric;
use twofloat::TwoFloat;

/// Precision used to accumulate quadrature sums
///
/// Samples are always f64; `Float64X2` carries nodes, weights and the
/// running sum in double-double arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkingPrecision {
    #[default]
    Float64,
    Float64X2,
}

/// Composite Gauss-Legendre configuration
#[derive(Debug, Clone, PartialEq)]
pub struct QuadratureConfig {
    /// Gauss points per segment
    pub n_gauss: usize,
    /// Number of equal-width segments the interval is split into
    pub segments: usize,
    pub precision: WorkingPrecision,
}

impl Default for QuadratureConfig {
    fn default() -> Self {
        Self {
            n_gauss: 32,
            segments: 4,
            precision: WorkingPrecision::Float64,
        }
    }
}

impl QuadratureConfig {
    pub fn new(n_gauss: usize, segments: usize) -> Self {
        Self {
            n_gauss,
            segments,
            ..Self::default()
        }
    }

    pub fn with_n_gauss(mut self, n_gauss: usize) -> Self {
        self.n_gauss = n_gauss;
        self
    }

    pub fn with_segments(mut self, segments: usize) -> Self {
        self.segments = segments;
        self
    }

    pub fn with_precision(mut self, precision: WorkingPrecision) -> Self {
        self.precision = precision;
        self
    }

    /// Total number of nodes of the composite rule
    pub fn total_nodes(&self) -> usize {
        self.n_gauss * self.segments
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_gauss == 0 {
            return Err(FinrankError::InvalidParameter(
                "n_gauss must be at least 1".into(),
            ));
        }
        if self.segments == 0 {
            return Err(FinrankError::InvalidParameter(
                "segments must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Composite rule on [a, b] in working precision `T`.
    pub fn rule<T: CustomNumeric>(&self, a: f64, b: f64) -> Result<Rule<T>> {
        self.validate()?;
        check_interval(a, b)?;

        let width = T::from_f64(b) - T::from_f64(a);
        let count = T::from_f64(self.segments as f64);
        let edges: Vec<T> = (0..=self.segments)
            .map(|k| {
                if k == self.segments {
                    T::from_f64(b)
                } else {
                    T::from_f64(a) + width * T::from_f64(k as f64) / count
                }
            })
            .collect();
        if edges.windows(2).any(|pair| pair[1] <= pair[0]) {
            return Err(FinrankError::InvalidParameter(format!(
                "[{a}, {b}] is too narrow for {} segments",
                self.segments
            )));
        }

        Ok(legendre::<T>(self.n_gauss).piecewise(&edges))
    }
}

pub(crate) fn check_interval(a: f64, b: f64) -> Result<()> {
    if !a.is_finite() || !b.is_finite() || a >= b {
        return Err(FinrankError::InvalidParameter(format!(
            "interval [{a}, {b}] must be finite and non-empty"
        )));
    }
    Ok(())
}

/// Sum of w_q * u_q * v_q accumulated in precision `T`.
pub(crate) fn weighted_dot<T: CustomNumeric>(weights: &[T], u: &[f64], v: &[f64]) -> f64 {
    weights
        .iter()
        .zip(u.iter().zip(v.iter()))
        .fold(T::zero(), |acc, (&w, (&ui, &vi))| {
            acc + w * T::from_f64(ui) * T::from_f64(vi)
        })
        .to_f64()
}

fn integrate_in<T, F>(f: F, a: f64, b: f64, config: &QuadratureConfig) -> Result<f64>
where
    T: CustomNumeric,
    F: Fn(f64) -> f64,
{
    let rule = config.rule::<T>(a, b)?;
    let values: Vec<f64> = rule.nodes_f64().into_iter().map(&f).collect();
    let ones = vec![1.0; values.len()];
    Ok(weighted_dot(&rule.w, &values, &ones))
}

/// Definite integral of `f` over [a, b].
pub fn integrate<F>(f: F, a: f64, b: f64, config: &QuadratureConfig) -> Result<f64>
where
    F: Fn(f64) -> f64,
{
    match config.precision {
        WorkingPrecision::Float64 => integrate_in::<f64, F>(f, a, b, config),
        WorkingPrecision::Float64X2 => integrate_in::<TwoFloat, F>(f, a, b, config),
    }
}

/// Inner product ⟨f, g⟩ = ∫ f(t) g(t) dt over [a, b].
pub fn inner_product<F, G>(f: F, g: G, a: f64, b: f64, config: &QuadratureConfig) -> Result<f64>
where
    F: Fn(f64) -> f64,
    G: Fn(f64) -> f64,
{
    integrate(|t| f(t) * g(t), a, b, config)
}
