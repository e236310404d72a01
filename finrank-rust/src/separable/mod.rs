//! Separable low-rank approximation of bivariate functions
//!
//! `f(x, y) ≈ Σ_k w_k r_k(x) c_k(y)` built by adaptive cross approximation:
//! greedy complete pivoting on the residual, located by a global search over
//! a sampling grid and refined locally.
//!
//! The grid is the only way the search sees the function. A grid too coarse
//! to resolve `f` can miss the true residual maximum. That costs extra terms
//! or, for features narrower than the grid spacing, leaves them out of the
//! approximation entirely; it never produces a wrong pivot.

mod compute;
mod pivot;
mod result;
mod types;

pub use compute::{decompose, decompose_shared};
pub use result::{BivariateFn, Pivot, SeparableFactor, SeparableRepresentation};
pub use types::{DecompositionConfig, SamplingGrid, Tolerance};
