//! Global pivot search
//!
//! The function is sampled once on the coarse grid. Residual values at grid
//! points are recomputed on demand from those samples and the factor values
//! cached per grid line; the residual itself is never stored.

use rayon::prelude::*;

use crate::domain::Domain;
use crate::error::{FinrankError, Result};
use crate::separable::result::Skeleton;
use crate::separable::types::SamplingGrid;

/// Best point found by the search and the residual value there
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Candidate {
    pub x: f64,
    pub y: f64,
    pub value: f64,
}

/// Function samples and factor values on the coarse grid
pub(crate) struct GridSamples {
    xs: Vec<f64>,
    ys: Vec<f64>,
    /// f(xs[i], ys[j]) at i * ny + j
    values: Vec<f64>,
    /// r_l(xs[i]) for every accepted factor l
    rows: Vec<Vec<f64>>,
    /// c_l(ys[j]) for every accepted factor l
    columns: Vec<Vec<f64>>,
    parallel: bool,
}

impl GridSamples {
    pub(crate) fn new(
        skeleton: &Skeleton,
        domain: &Domain,
        grid: &SamplingGrid,
        parallel: bool,
    ) -> Result<Self> {
        let xs = grid.points_x(domain);
        let ys = grid.points_y(domain);
        let ny = ys.len();

        let point = |idx: usize| (xs[idx / ny], ys[idx % ny]);
        let values: Vec<f64> = if parallel {
            (0..xs.len() * ny)
                .into_par_iter()
                .map(|idx| {
                    let (x, y) = point(idx);
                    skeleton.sample(x, y)
                })
                .collect()
        } else {
            (0..xs.len() * ny)
                .map(|idx| {
                    let (x, y) = point(idx);
                    skeleton.sample(x, y)
                })
                .collect()
        };

        if let Some(idx) = values.iter().position(|v| !v.is_finite()) {
            let (x, y) = point(idx);
            return Err(FinrankError::NonFiniteSample { x, y });
        }

        Ok(Self {
            rows: vec![Vec::new(); xs.len()],
            columns: vec![Vec::new(); ny],
            xs,
            ys,
            values,
            parallel,
        })
    }

    fn residual_at(&self, skeleton: &Skeleton, i: usize, j: usize) -> f64 {
        let approx = skeleton.combine(&self.rows[i], &self.columns[j]);
        self.values[i * self.ys.len() + j] - approx
    }

    /// Grid point of largest |residual|; the first one in row-major order on ties.
    pub(crate) fn argmax(&self, skeleton: &Skeleton) -> Candidate {
        let ny = self.ys.len();
        let best_in_row = |i: usize| {
            let mut best = (i, 0, 0.0_f64);
            for j in 0..ny {
                let value = self.residual_at(skeleton, i, j);
                if value.abs() > best.2.abs() {
                    best = (i, j, value);
                }
            }
            best
        };
        let pick = |a: (usize, usize, f64), b: (usize, usize, f64)| {
            if b.2.abs() > a.2.abs() {
                b
            } else {
                a
            }
        };

        let (i, j, value) = if self.parallel {
            (0..self.xs.len())
                .into_par_iter()
                .map(best_in_row)
                .reduce(|| (0, 0, 0.0), pick)
        } else {
            (0..self.xs.len()).map(best_in_row).fold((0, 0, 0.0), pick)
        };

        Candidate {
            x: self.xs[i],
            y: self.ys[j],
            value,
        }
    }

    /// Extend the cached factor values with the most recently accepted pivot.
    pub(crate) fn absorb(&mut self, skeleton: &Skeleton) {
        let Some(pivot) = skeleton.pivots.last() else {
            return;
        };
        let earlier = &skeleton.pivots[..skeleton.rank() - 1];

        let extend_row = |x: f64, rows: &mut Vec<f64>| {
            let mut value = skeleton.sample(x, pivot.y);
            for (l, p) in earlier.iter().enumerate() {
                value -= rows[l] * pivot.columns_at_y[l] / p.value;
            }
            rows.push(value);
        };
        let extend_column = |y: f64, columns: &mut Vec<f64>| {
            let mut value = skeleton.sample(pivot.x, y);
            for (l, p) in earlier.iter().enumerate() {
                value -= pivot.rows_at_x[l] * columns[l] / p.value;
            }
            columns.push(value);
        };

        if self.parallel {
            self.rows
                .par_iter_mut()
                .zip(self.xs.par_iter())
                .for_each(|(rows, &x)| extend_row(x, rows));
            self.columns
                .par_iter_mut()
                .zip(self.ys.par_iter())
                .for_each(|(columns, &y)| extend_column(y, columns));
        } else {
            self.rows
                .iter_mut()
                .zip(self.xs.iter())
                .for_each(|(rows, &x)| extend_row(x, rows));
            self.columns
                .iter_mut()
                .zip(self.ys.iter())
                .for_each(|(columns, &y)| extend_column(y, columns));
        }
    }
}

/// Improve a coarse candidate by a shrinking pattern search.
///
/// Each step probes the 8 neighbours at the current spacing, clamped to the
/// domain, and moves to the best one that increases |residual|. When none
/// does, the spacing is halved. Only ever returns a point at least as good
/// as `start`.
pub(crate) fn refine(
    skeleton: &Skeleton,
    domain: &Domain,
    grid: &SamplingGrid,
    start: Candidate,
) -> Candidate {
    let (mut hx, mut hy) = grid.spacing(domain);
    let mut best = start;

    for _ in 0..grid.refinement_steps {
        let xs = [
            (best.x - hx).max(domain.x.0),
            best.x,
            (best.x + hx).min(domain.x.1),
        ];
        let ys = [
            (best.y - hy).max(domain.y.0),
            best.y,
            (best.y + hy).min(domain.y.1),
        ];
        let rows: Vec<Vec<f64>> = xs.iter().map(|&x| skeleton.row_values(x)).collect();
        let columns: Vec<Vec<f64>> = ys.iter().map(|&y| skeleton.column_values(y)).collect();

        let center = best;
        for (a, &x) in xs.iter().enumerate() {
            for (b, &y) in ys.iter().enumerate() {
                if x == center.x && y == center.y {
                    continue;
                }
                let value = skeleton.sample(x, y) - skeleton.combine(&rows[a], &columns[b]);
                if value.is_finite() && value.abs() > best.value.abs() {
                    best = Candidate { x, y, value };
                }
            }
        }

        if best == center {
            hx *= 0.5;
            hy *= 0.5;
        }
    }

    best
}
