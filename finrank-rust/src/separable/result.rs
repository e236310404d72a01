//! Separable representation container
//!
//! The factors of a decomposition are never tabulated. Each one is defined
//! through the original function and the factors extracted before it:
//!
//!   r_k(x) = f(x, y*_k) - Σ_{l<k} w_l r_l(x) c_l(y*_k)
//!   c_k(y) = f(x*_k, y) - Σ_{l<k} w_l r_l(x*_k) c_l(y)
//!
//! with w_l = 1 / g_{l-1}(x*_l, y*_l). The constants r_l(x*_k) and c_l(y*_k)
//! are captured when pivot k is accepted, so evaluating all factors at one
//! point costs n function evaluations plus O(n²) arithmetic.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::domain::Domain;
use crate::separable::types::SamplingGrid;

/// Shared handle to a bivariate function `f(x, y)`
pub type BivariateFn = Arc<dyn Fn(f64, f64) -> f64 + Send + Sync>;

/// One accepted pivot of the decomposition
#[derive(Debug, Clone, PartialEq)]
pub struct Pivot {
    pub x: f64,
    pub y: f64,
    /// Residual value g(x*, y*) at the time the pivot was taken
    pub value: f64,
    /// r_l(x*) for earlier factors l
    pub(crate) rows_at_x: Vec<f64>,
    /// c_l(y*) for earlier factors l
    pub(crate) columns_at_y: Vec<f64>,
}

impl Pivot {
    pub fn weight(&self) -> f64 {
        1.0 / self.value
    }
}

/// The original function and the pivots taken from it, in extraction order.
pub(crate) struct Skeleton {
    pub(crate) function: BivariateFn,
    pub(crate) pivots: Vec<Pivot>,
}

impl Skeleton {
    pub(crate) fn new(function: BivariateFn) -> Self {
        Self {
            function,
            pivots: Vec::new(),
        }
    }

    pub(crate) fn rank(&self) -> usize {
        self.pivots.len()
    }

    pub(crate) fn sample(&self, x: f64, y: f64) -> f64 {
        (self.function)(x, y)
    }

    /// r_0(x), ..., r_{count-1}(x)
    pub(crate) fn row_values_upto(&self, x: f64, count: usize) -> Vec<f64> {
        let mut rows: Vec<f64> = Vec::with_capacity(count);
        for pivot in &self.pivots[..count] {
            let mut value = self.sample(x, pivot.y);
            for (l, earlier) in self.pivots[..rows.len()].iter().enumerate() {
                value -= rows[l] * pivot.columns_at_y[l] / earlier.value;
            }
            rows.push(value);
        }
        rows
    }

    /// c_0(y), ..., c_{count-1}(y)
    pub(crate) fn column_values_upto(&self, y: f64, count: usize) -> Vec<f64> {
        let mut columns: Vec<f64> = Vec::with_capacity(count);
        for pivot in &self.pivots[..count] {
            let mut value = self.sample(pivot.x, y);
            for (l, earlier) in self.pivots[..columns.len()].iter().enumerate() {
                value -= pivot.rows_at_x[l] * columns[l] / earlier.value;
            }
            columns.push(value);
        }
        columns
    }

    pub(crate) fn row_values(&self, x: f64) -> Vec<f64> {
        self.row_values_upto(x, self.rank())
    }

    pub(crate) fn column_values(&self, y: f64) -> Vec<f64> {
        self.column_values_upto(y, self.rank())
    }

    /// Σ_k w_k r_k(x) c_k(y) from precomputed factor values
    pub(crate) fn combine(&self, rows: &[f64], columns: &[f64]) -> f64 {
        self.pivots
            .iter()
            .zip(rows.iter().zip(columns.iter()))
            .map(|(pivot, (r, c))| r * c / pivot.value)
            .sum()
    }

    pub(crate) fn approximation(&self, x: f64, y: f64) -> f64 {
        self.combine(&self.row_values(x), &self.column_values(y))
    }

    pub(crate) fn residual(&self, x: f64, y: f64) -> f64 {
        self.sample(x, y) - self.approximation(x, y)
    }
}

/// One term `w · row(x) · column(y)` of a separable representation.
///
/// The factor functions are evaluated lazily through the decomposition that
/// produced them; a factor stays valid after its representation is dropped.
#[derive(Clone)]
pub struct SeparableFactor {
    skeleton: Arc<Skeleton>,
    index: usize,
}

impl SeparableFactor {
    /// Position of this term in extraction order, which can differ from its
    /// position in [`SeparableRepresentation::factors`]
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn pivot(&self) -> &Pivot {
        &self.skeleton.pivots[self.index]
    }

    /// Reciprocal of the pivot value. Always finite and nonzero.
    pub fn pivot_weight(&self) -> f64 {
        self.pivot().weight()
    }

    /// Row function x ↦ g(x, y*), a function of the first variable
    pub fn row(&self, x: f64) -> f64 {
        self.skeleton.row_values_upto(x, self.index + 1)[self.index]
    }

    /// Column function y ↦ g(x*, y), a function of the second variable
    pub fn column(&self, y: f64) -> f64 {
        self.skeleton.column_values_upto(y, self.index + 1)[self.index]
    }

    /// w · row(x) · column(y)
    pub fn contribution(&self, x: f64, y: f64) -> f64 {
        self.pivot_weight() * self.row(x) * self.column(y)
    }
}

impl fmt::Debug for SeparableFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeparableFactor")
            .field("index", &self.index)
            .field("pivot", self.pivot())
            .finish()
    }
}

/// Finite separable approximation `f(x, y) ≈ Σ_k w_k r_k(x) c_k(y)`.
///
/// An immutable value. Factors, pivots and per-factor values are listed by
/// non-increasing pivot magnitude. Extraction can produce a larger pivot
/// after a smaller one when the sampling grid misses a feature; the factors
/// are then sorted and [`Self::is_reordered`] is set.
/// [`SeparableFactor::index`] keeps the extraction position.
#[derive(Clone)]
pub struct SeparableRepresentation {
    skeleton: Arc<Skeleton>,
    factors: Vec<SeparableFactor>,
    /// Pivots in the order of `factors`
    pivots: Vec<Pivot>,
    /// Extraction index of each listed factor
    order: Vec<usize>,
    domain: Domain,
    residual_estimate: f64,
    rank_capped: bool,
}

impl SeparableRepresentation {
    pub(crate) fn new(
        skeleton: Skeleton,
        domain: Domain,
        residual_estimate: f64,
        rank_capped: bool,
    ) -> Self {
        let skeleton = Arc::new(skeleton);

        // Stable, so a monotone extraction keeps its order
        let mut order: Vec<usize> = (0..skeleton.rank()).collect();
        order.sort_by(|&i, &j| {
            let (pi, pj) = (&skeleton.pivots[i], &skeleton.pivots[j]);
            pj.value.abs().total_cmp(&pi.value.abs())
        });

        let factors = order
            .iter()
            .map(|&index| SeparableFactor {
                skeleton: Arc::clone(&skeleton),
                index,
            })
            .collect();
        let pivots = order
            .iter()
            .map(|&index| skeleton.pivots[index].clone())
            .collect();
        let repr = Self {
            skeleton,
            factors,
            pivots,
            order,
            domain,
            residual_estimate,
            rank_capped,
        };
        if repr.is_reordered() {
            debug!(order = ?repr.order, "pivot magnitudes not monotone in extraction order");
        }
        repr
    }

    /// Reorder values indexed by extraction position into listing order.
    fn listed(&self, values: Vec<f64>) -> Vec<f64> {
        self.order.iter().map(|&index| values[index]).collect()
    }

    /// Number of terms
    pub fn rank(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    pub fn factors(&self) -> &[SeparableFactor] {
        &self.factors
    }

    pub fn factor(&self, k: usize) -> Option<&SeparableFactor> {
        self.factors.get(k)
    }

    pub fn pivots(&self) -> &[Pivot] {
        &self.pivots
    }

    /// Signed pivot values, largest magnitude first
    pub fn pivot_values(&self) -> Vec<f64> {
        self.pivots.iter().map(|p| p.value).collect()
    }

    /// Pivot weights w_k = 1 / pivot_k
    pub fn weights(&self) -> Vec<f64> {
        self.pivots.iter().map(Pivot::weight).collect()
    }

    /// The factors had to be sorted because a later pivot was larger than
    /// an earlier one, which points to an undersampled grid.
    pub fn is_reordered(&self) -> bool {
        self.order.iter().enumerate().any(|(k, &index)| k != index)
    }

    /// Magnitude of the first extracted pivot, the reference of a relative
    /// tolerance (0 for an empty representation)
    pub fn first_pivot_magnitude(&self) -> f64 {
        self.skeleton
            .pivots
            .first()
            .map_or(0.0, |p| p.value.abs())
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Magnitude of the best residual pivot found after the last term
    pub fn residual_estimate(&self) -> f64 {
        self.residual_estimate
    }

    /// The rank cap was reached before the tolerance was met.
    ///
    /// Eigenvalues derived from a capped representation are approximate.
    pub fn is_rank_capped(&self) -> bool {
        self.rank_capped
    }

    /// All row functions evaluated at `x`, in the order of [`Self::factors`]
    pub fn row_values(&self, x: f64) -> Vec<f64> {
        self.listed(self.skeleton.row_values(x))
    }

    /// All column functions evaluated at `y`, in the order of [`Self::factors`]
    pub fn column_values(&self, y: f64) -> Vec<f64> {
        self.listed(self.skeleton.column_values(y))
    }

    /// Value of the separable approximation at (x, y)
    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        self.skeleton.approximation(x, y)
    }

    /// f(x, y) minus the approximation
    pub fn residual(&self, x: f64, y: f64) -> f64 {
        self.skeleton.residual(x, y)
    }

    /// Largest |residual| over the samples of `grid`
    pub fn max_sampled_residual(&self, grid: &SamplingGrid) -> f64 {
        let ys = grid.points_y(&self.domain);
        let columns: Vec<Vec<f64>> = ys
            .iter()
            .map(|&y| self.skeleton.column_values(y))
            .collect();

        grid.points_x(&self.domain)
            .into_iter()
            .map(|x| {
                let rows = self.skeleton.row_values(x);
                ys.iter()
                    .zip(columns.iter())
                    .map(|(&y, c)| {
                        (self.skeleton.sample(x, y) - self.skeleton.combine(&rows, c)).abs()
                    })
                    .fold(0.0, f64::max)
            })
            .fold(0.0, f64::max)
    }
}

impl fmt::Debug for SeparableRepresentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeparableRepresentation")
            .field("rank", &self.rank())
            .field("domain", &self.domain)
            .field("pivots", &self.pivot_values())
            .field("residual_estimate", &self.residual_estimate)
            .field("rank_capped", &self.rank_capped)
            .field("reordered", &self.is_reordered())
            .finish()
    }
}
