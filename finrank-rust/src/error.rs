//! Error types shared by the separable approximator and the rank-reduced eigensolver

/// Errors returned by decomposition and eigenvalue computations.
///
/// A rank-capped decomposition is not an error: it is reported through
/// [`crate::SeparableRepresentation::is_rank_capped`] on a successful result.
/// Degenerate (identically zero) inputs produce empty results, not errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FinrankError {
    /// The two factor matrices do not have the same shape.
    #[error("factor shapes differ: A is {left:?}, B is {right:?}")]
    DimensionMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },

    /// The row and column intervals of a kernel differ, so it does not map a
    /// function space into itself.
    #[error("kernel domain is not square: x in {rows:?}, y in {columns:?}")]
    DomainMismatch { rows: (f64, f64), columns: (f64, f64) },

    /// The dense eigenvalue solver did not converge.
    #[error("dense eigensolver failed to converge on a {size}x{size} matrix")]
    SolverFailure { size: usize },

    /// The function returned NaN or an infinity at a sample point.
    #[error("function is not finite at ({x}, {y})")]
    NonFiniteSample { x: f64, y: f64 },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, FinrankError>;
