//! Custom numeric trait for working-precision quadrature
//!
//! Quadrature nodes, weights and accumulated sums can be carried either in
//! plain `f64` or in double-double `TwoFloat`. Function samples are always
//! `f64`; only the arithmetic that combines them changes precision.

use num_traits::Float;
use std::fmt::{Debug, Display};
use twofloat::TwoFloat;

/// Numeric type usable as a working precision for quadrature rules.
pub trait CustomNumeric:
    Copy
    + Debug
    + Display
    + PartialOrd
    + Send
    + Sync
    + std::ops::Add<Output = Self>
    + std::ops::Sub<Output = Self>
    + std::ops::Mul<Output = Self>
    + std::ops::Div<Output = Self>
    + std::ops::Neg<Output = Self>
{
    /// Convert from f64 (exact for both supported types)
    fn from_f64(x: f64) -> Self;

    /// Round to the nearest f64
    fn to_f64(self) -> f64;

    fn zero() -> Self;

    fn one() -> Self;

    /// Unit roundoff of the type
    fn epsilon() -> Self;

    fn abs(self) -> Self;
}

impl CustomNumeric for f64 {
    fn from_f64(x: f64) -> Self {
        x
    }

    fn to_f64(self) -> f64 {
        self
    }

    fn zero() -> Self {
        0.0
    }

    fn one() -> Self {
        1.0
    }

    fn epsilon() -> Self {
        <f64 as Float>::epsilon()
    }

    fn abs(self) -> Self {
        <f64 as Float>::abs(self)
    }
}

impl CustomNumeric for TwoFloat {
    fn from_f64(x: f64) -> Self {
        TwoFloat::from(x)
    }

    fn to_f64(self) -> f64 {
        f64::from(self)
    }

    fn zero() -> Self {
        TwoFloat::from(0.0)
    }

    fn one() -> Self {
        TwoFloat::from(1.0)
    }

    fn epsilon() -> Self {
        // 2^-106
        TwoFloat::from(1.232_595_164_407_831e-32)
    }

    fn abs(self) -> Self {
        if self < <Self as CustomNumeric>::zero() {
            -self
        } else {
            self
        }
    }
}

#[cfg(test)]
#[path = "numeric_tests.rs"]
mod tests;
