//! Configuration types for separable decomposition

use crate::domain::Domain;
use crate::error::{FinrankError, Result};

/// Stopping tolerance on the pivot magnitude
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tolerance {
    /// Stop once |pivot| < ε · |first pivot|
    Relative(f64),
    /// Stop once |pivot| < ε
    Absolute(f64),
}

impl Tolerance {
    pub fn value(&self) -> f64 {
        match *self {
            Tolerance::Relative(eps) | Tolerance::Absolute(eps) => eps,
        }
    }

    /// Pivot magnitude below which the decomposition has converged
    pub fn threshold(&self, first_pivot_magnitude: f64) -> f64 {
        match *self {
            Tolerance::Relative(eps) => eps * first_pivot_magnitude,
            Tolerance::Absolute(eps) => eps,
        }
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Tolerance::Relative(1e-12)
    }
}

/// Uniform sampling grid used for the global pivot search
///
/// The grid includes both endpoints of each interval. Its density must resolve
/// the function: an undersampled grid can miss the true maximum of the
/// residual, which costs extra terms or hides structure between samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingGrid {
    /// Samples along x
    pub nx: usize,
    /// Samples along y
    pub ny: usize,
    /// Pattern-search steps used to refine the best coarse sample
    pub refinement_steps: usize,
}

impl Default for SamplingGrid {
    fn default() -> Self {
        Self {
            nx: 64,
            ny: 64,
            refinement_steps: 24,
        }
    }
}

impl SamplingGrid {
    pub fn new(nx: usize, ny: usize) -> Self {
        Self {
            nx,
            ny,
            ..Self::default()
        }
    }

    /// Same resolution along both variables
    pub fn uniform(n: usize) -> Self {
        Self::new(n, n)
    }

    pub fn with_refinement_steps(mut self, steps: usize) -> Self {
        self.refinement_steps = steps;
        self
    }

    pub fn len(&self) -> usize {
        self.nx * self.ny
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn validate(&self) -> Result<()> {
        if self.nx < 2 || self.ny < 2 {
            return Err(FinrankError::InvalidParameter(format!(
                "sampling grid must have at least 2 points per axis, got {}x{}",
                self.nx, self.ny
            )));
        }
        Ok(())
    }

    /// Sample abscissae along x
    pub fn points_x(&self, domain: &Domain) -> Vec<f64> {
        linspace(domain.x, self.nx)
    }

    /// Sample ordinates along y
    pub fn points_y(&self, domain: &Domain) -> Vec<f64> {
        linspace(domain.y, self.ny)
    }

    /// Spacing between neighbouring samples along (x, y)
    pub fn spacing(&self, domain: &Domain) -> (f64, f64) {
        (
            domain.width() / (self.nx - 1) as f64,
            domain.height() / (self.ny - 1) as f64,
        )
    }
}

fn linspace((a, b): (f64, f64), n: usize) -> Vec<f64> {
    let step = (b - a) / (n - 1) as f64;
    (0..n)
        .map(|i| if i == n - 1 { b } else { a + step * i as f64 })
        .collect()
}

/// Parameters of [`crate::separable::decompose`]
#[derive(Debug, Clone, PartialEq)]
pub struct DecompositionConfig {
    pub tolerance: Tolerance,
    /// Hard cap on the number of extracted terms
    pub max_rank: usize,
    pub grid: SamplingGrid,
    /// Grids with at least this many samples are searched in parallel
    pub parallel_threshold: usize,
}

impl Default for DecompositionConfig {
    fn default() -> Self {
        Self {
            tolerance: Tolerance::default(),
            max_rank: 100,
            grid: SamplingGrid::default(),
            parallel_threshold: 4096,
        }
    }
}

impl DecompositionConfig {
    pub fn new(tolerance: Tolerance, max_rank: usize) -> Self {
        Self {
            tolerance,
            max_rank,
            ..Self::default()
        }
    }

    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_rank(mut self, max_rank: usize) -> Self {
        self.max_rank = max_rank;
        self
    }

    pub fn with_grid(mut self, grid: SamplingGrid) -> Self {
        self.grid = grid;
        self
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let eps = self.tolerance.value();
        if !eps.is_finite() || eps <= 0.0 {
            return Err(FinrankError::InvalidParameter(format!(
                "tolerance must be finite and positive, got {eps}"
            )));
        }
        if let Tolerance::Relative(eps) = self.tolerance {
            if eps >= 1.0 {
                return Err(FinrankError::InvalidParameter(format!(
                    "relative tolerance must be below 1, got {eps}"
                )));
            }
        }
        if self.max_rank == 0 {
            return Err(FinrankError::InvalidParameter(
                "max_rank must be at least 1".into(),
            ));
        }
        self.grid.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tolerance_threshold() {
        assert_eq!(Tolerance::Relative(1e-3).threshold(10.0), 1e-2);
        assert_eq!(Tolerance::Absolute(1e-3).threshold(10.0), 1e-3);
    }

    #[test]
    fn test_grid_points_include_endpoints() {
        let domain = Domain::new((-1.0, 1.0), (0.0, 3.0)).unwrap();
        let grid = SamplingGrid::new(5, 4);
        assert_eq!(grid.points_x(&domain), vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
        assert_eq!(grid.points_y(&domain), vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(grid.spacing(&domain), (0.5, 1.0));
        assert_eq!(grid.len(), 20);
    }

    #[test]
    fn test_config_validation() {
        assert!(DecompositionConfig::default().validate().is_ok());
        assert!(DecompositionConfig::new(Tolerance::Relative(0.0), 10)
            .validate()
            .is_err());
        assert!(DecompositionConfig::new(Tolerance::Absolute(f64::NAN), 10)
            .validate()
            .is_err());
        assert!(DecompositionConfig::new(Tolerance::Relative(1.0), 10)
            .validate()
            .is_err());
        assert!(DecompositionConfig::new(Tolerance::Absolute(2.0), 10)
            .validate()
            .is_ok());
        assert!(DecompositionConfig::new(Tolerance::Relative(1e-8), 0)
            .validate()
            .is_err());
        assert!(DecompositionConfig::default()
            .with_grid(SamplingGrid::new(1, 10))
            .validate()
            .is_err());
    }
}
