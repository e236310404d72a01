//! Adaptive separable decomposition
//!
//! Continuous Gaussian elimination with complete pivoting: at every step the
//! point of largest |residual| is located and the cross through it is removed
//! from the residual. Terminates on the pivot tolerance or the rank cap.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::Domain;
use crate::error::{FinrankError, Result};

use super::pivot::{refine, GridSamples};
use super::result::{BivariateFn, Pivot, SeparableRepresentation, Skeleton};
use super::types::DecompositionConfig;

/// Decompose `f` on `domain` into a finite sum of separable terms.
///
/// # Arguments
///
/// * `function` - Bivariate function `f(x, y)`, `x` ranging over `domain.x`
/// * `domain` - Rectangle the approximation is built on
/// * `config` - Tolerance, rank cap and sampling grid
///
/// # Returns
///
/// A representation with `rank() <= config.max_rank`. The zero function gives
/// an empty representation. If the cap is reached before the tolerance,
/// [`SeparableRepresentation::is_rank_capped`] is set.
///
/// # Errors
///
/// * `InvalidParameter` for an invalid configuration
/// * `NonFiniteSample` when `f` returns NaN or infinity at a sampled point
pub fn decompose<F>(
    function: F,
    domain: Domain,
    config: &DecompositionConfig,
) -> Result<SeparableRepresentation>
where
    F: Fn(f64, f64) -> f64 + Send + Sync + 'static,
{
    decompose_shared(Arc::new(function), domain, config)
}

/// [`decompose`] for a function already behind a shared handle
#[tracing::instrument(
    name = "decompose",
    skip(function, config),
    fields(max_rank = config.max_rank, nx = config.grid.nx, ny = config.grid.ny)
)]
pub fn decompose_shared(
    function: BivariateFn,
    domain: Domain,
    config: &DecompositionConfig,
) -> Result<SeparableRepresentation> {
    config.validate()?;

    let mut skeleton = Skeleton::new(function);
    let parallel = config.grid.len() >= config.parallel_threshold;
    let mut samples = GridSamples::new(&skeleton, &domain, &config.grid, parallel)?;
    let mut first_magnitude = 0.0;

    loop {
        let coarse = samples.argmax(&skeleton);
        let best = refine(&skeleton, &domain, &config.grid, coarse);
        let (x, y) = (best.x, best.y);

        // Recompute through the factor recursion so that r_k(x*) = c_k(y*) = pivot.
        let rows_at_x = skeleton.row_values(x);
        let columns_at_y = skeleton.column_values(y);
        let value = skeleton.sample(x, y) - skeleton.combine(&rows_at_x, &columns_at_y);
        if !value.is_finite() {
            return Err(FinrankError::NonFiniteSample { x, y });
        }
        let magnitude = value.abs();

        if skeleton.rank() == 0 {
            if magnitude <= f64::MIN_POSITIVE {
                debug!("function vanishes on the sampling grid");
                return Ok(SeparableRepresentation::new(skeleton, domain, 0.0, false));
            }
            first_magnitude = magnitude;
        }

        if magnitude < config.tolerance.threshold(first_magnitude) {
            debug!(
                rank = skeleton.rank(),
                residual = magnitude,
                "decomposition converged"
            );
            return Ok(SeparableRepresentation::new(
                skeleton, domain, magnitude, false,
            ));
        }

        if skeleton.rank() == config.max_rank {
            warn!(
                max_rank = config.max_rank,
                residual = magnitude,
                threshold = config.tolerance.threshold(first_magnitude),
                "rank cap reached before tolerance; representation is approximate"
            );
            return Ok(SeparableRepresentation::new(
                skeleton, domain, magnitude, true,
            ));
        }

        debug!(index = skeleton.rank(), x, y, pivot = value, "accepted pivot");
        skeleton.pivots.push(Pivot {
            x,
            y,
            value,
            rows_at_x,
            columns_at_y,
        });
        samples.absorb(&skeleton);
    }
}
