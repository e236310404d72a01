//! Rectangular domains of bivariate functions

use crate::error::{FinrankError, Result};
use crate::quadrature::check_interval;

/// Relative tolerance under which two intervals are treated as identical
const INTERVAL_RTOL: f64 = 1e-12;

/// Rectangle `[x0, x1] × [y0, y1]` on which a bivariate function is defined.
///
/// `x` is the first argument of `f(x, y)` (the row variable) and `y` the second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    pub x: (f64, f64),
    pub y: (f64, f64),
}

impl Domain {
    pub fn new(x: (f64, f64), y: (f64, f64)) -> Result<Self> {
        check_interval(x.0, x.1)?;
        check_interval(y.0, y.1)?;
        Ok(Self { x, y })
    }

    /// `[a, b] × [a, b]`
    pub fn square(a: f64, b: f64) -> Result<Self> {
        Self::new((a, b), (a, b))
    }

    pub fn width(&self) -> f64 {
        self.x.1 - self.x.0
    }

    pub fn height(&self) -> f64 {
        self.y.1 - self.y.0
    }

    /// width / height
    pub fn aspect_ratio(&self) -> f64 {
        self.width() / self.height()
    }

    /// Whether both variables range over the same interval
    pub fn is_square(&self) -> bool {
        let scale = self.width().abs().max(self.height().abs());
        let tol = INTERVAL_RTOL * scale;
        (self.x.0 - self.y.0).abs() <= tol && (self.x.1 - self.y.1).abs() <= tol
    }

    /// The shared interval of a square domain.
    ///
    /// The integral operator induced by a kernel maps functions of `y` to
    /// functions of `x`; it only has a spectrum when both live on one interval.
    pub fn shared_interval(&self) -> Result<(f64, f64)> {
        if self.is_square() {
            Ok(self.x)
        } else {
            Err(FinrankError::DomainMismatch {
                rows: self.x,
                columns: self.y,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_domain() {
        let domain = Domain::square(-1.0, 1.0).unwrap();
        assert!(domain.is_square());
        assert_eq!(domain.aspect_ratio(), 1.0);
        assert_eq!(domain.shared_interval().unwrap(), (-1.0, 1.0));
    }

    #[test]
    fn test_rectangular_domain() {
        let domain = Domain::new((0.0, 4.0), (0.0, 1.0)).unwrap();
        assert!(!domain.is_square());
        assert_eq!(domain.aspect_ratio(), 4.0);
        assert!(matches!(
            domain.shared_interval(),
            Err(FinrankError::DomainMismatch { .. })
        ));
    }

    #[test]
    fn test_invalid_bounds() {
        assert!(Domain::new((1.0, 0.0), (0.0, 1.0)).is_err());
        assert!(Domain::new((0.0, 1.0), (f64::NAN, 1.0)).is_err());
        assert!(Domain::square(2.0, 2.0).is_err());
    }
}
