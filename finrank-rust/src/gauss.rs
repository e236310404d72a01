//! Gauss quadrature rules for numerical integration
//!
//! The integral of f(x) over [a, b] is approximated by a weighted sum:
//!
//! sum(f(xi) * wi for (xi, wi) in zip(x, w))
//!
//! which converges superexponentially in the number of points for smooth f.
//! Composite (piecewise) rules are built by reseating a reference rule onto
//! each segment and joining the results.

use crate::numeric::CustomNumeric;
use std::cmp::Ordering;

/// Quadrature rule for numerical integration.
///
/// Points `x` are sorted in increasing order and lie inside `[a, b]`.
#[derive(Debug, Clone)]
pub struct Rule<T> {
    /// Quadrature points
    pub x: Vec<T>,
    /// Quadrature weights
    pub w: Vec<T>,
    /// Left endpoint of integration interval
    pub a: T,
    /// Right endpoint of integration interval
    pub b: T,
}

impl<T: CustomNumeric> Rule<T> {
    /// Create a new quadrature rule from points and weights.
    ///
    /// # Panics
    /// Panics if x and w have different lengths.
    pub fn new(x: Vec<T>, w: Vec<T>, a: T, b: T) -> Self {
        assert_eq!(x.len(), w.len(), "x and w must have the same length");
        Self { x, w, a, b }
    }

    /// Rule with no points on [-1, 1]
    pub fn empty() -> Self {
        Self {
            x: vec![],
            w: vec![],
            a: T::from_f64(-1.0),
            b: T::from_f64(1.0),
        }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Reseat the rule to a new interval [a, b].
    ///
    /// Scales and translates the quadrature points and weights.
    pub fn reseat(&self, a: T, b: T) -> Self {
        let half = T::from_f64(0.5);
        let scaling = (b - a) / (self.b - self.a);
        let midpoint_old = (self.b + self.a) * half;
        let midpoint_new = (b + a) * half;

        Self {
            x: self
                .x
                .iter()
                .map(|&xi| scaling * (xi - midpoint_old) + midpoint_new)
                .collect(),
            w: self.w.iter().map(|&wi| wi * scaling).collect(),
            a,
            b,
        }
    }

    /// Create a composite rule by reseating onto every segment of `edges`.
    ///
    /// # Panics
    /// Panics if edges are not strictly increasing or have less than 2 elements.
    pub fn piecewise(&self, edges: &[T]) -> Self {
        if edges.len() < 2 {
            panic!("edges must have at least 2 elements");
        }
        for i in 1..edges.len() {
            if edges[i] <= edges[i - 1] {
                panic!("edges must be sorted in ascending order");
            }
        }

        let rules: Vec<Self> = edges
            .windows(2)
            .map(|seg| self.reseat(seg[0], seg[1]))
            .collect();

        Self::join(&rules)
    }

    /// Join contiguous rules into a single rule.
    ///
    /// # Panics
    /// Panics if the rules are not contiguous.
    pub fn join(rules: &[Self]) -> Self {
        if rules.is_empty() {
            return Self::empty();
        }

        let a = rules[0].a;
        let b = rules[rules.len() - 1].b;

        for i in 1..rules.len() {
            let gap = (rules[i].a - rules[i - 1].b).abs();
            let scale = (b - a).abs();
            if gap > T::epsilon() * scale * T::from_f64(16.0) {
                panic!("rules must be contiguous");
            }
        }

        let mut pairs: Vec<(T, T)> = rules
            .iter()
            .flat_map(|rule| rule.x.iter().copied().zip(rule.w.iter().copied()))
            .collect();
        pairs.sort_by(|p, q| p.0.partial_cmp(&q.0).unwrap_or(Ordering::Equal));

        let (x, w) = pairs.into_iter().unzip();
        Self { x, w, a, b }
    }

    /// Points rounded to f64, for evaluating f64 callables
    pub fn nodes_f64(&self) -> Vec<f64> {
        self.x.iter().map(|&xi| xi.to_f64()).collect()
    }

    /// Check the rule for consistency.
    pub fn validate(&self) -> bool {
        if self.a >= self.b {
            return false;
        }
        if self.x.len() != self.w.len() {
            return false;
        }
        if self.x.iter().any(|&xi| xi < self.a || xi > self.b) {
            return false;
        }
        self.x.windows(2).all(|pair| pair[0] < pair[1])
    }
}

/// Gauss-Legendre nodes and weights on [-1, 1] by Newton iteration on P_n.
///
/// The initial guess is computed in f64; the iteration itself runs in `T`,
/// so double-double rules are accurate to the extended precision.
fn gauss_legendre_nodes_weights<T: CustomNumeric>(n: usize) -> (Vec<T>, Vec<T>) {
    if n == 0 {
        return (Vec::new(), Vec::new());
    }

    if n == 1 {
        return (vec![T::zero()], vec![T::from_f64(2.0)]);
    }

    let mut x = Vec::with_capacity(n);
    let mut w = Vec::with_capacity(n);
    let one = T::one();
    let two = T::from_f64(2.0);

    for i in 0..n.div_ceil(2) {
        let guess = (std::f64::consts::PI * (i as f64 + 0.75) / (n as f64 + 0.5)).cos();
        let mut z = T::from_f64(guess);

        for _ in 0..16 {
            let (p, dp) = legendre_polynomial_and_derivative(n, z);
            let dz = p / dp;
            z = z - dz;
            if dz.abs() <= T::epsilon() * two {
                break;
            }
        }

        let (_, dp) = legendre_polynomial_and_derivative(n, z);
        let weight = two / ((one - z * z) * dp * dp);

        x.push(-z);
        w.push(weight);

        if i != n - 1 - i {
            x.push(z);
            w.push(weight);
        }
    }

    let mut pairs: Vec<(T, T)> = x.into_iter().zip(w).collect();
    pairs.sort_by(|p, q| p.0.partial_cmp(&q.0).unwrap_or(Ordering::Equal));
    pairs.into_iter().unzip()
}

/// Legendre polynomial P_n(x) and its derivative by the three-term recurrence.
fn legendre_polynomial_and_derivative<T: CustomNumeric>(n: usize, x: T) -> (T, T) {
    if n == 0 {
        return (T::one(), T::zero());
    }

    let mut p0 = T::one();
    let mut p1 = x;
    let mut dp0 = T::zero();
    let mut dp1 = T::one();

    for k in 2..=n {
        let k_f = T::from_f64(k as f64);
        let c = T::from_f64((2 * k - 1) as f64);
        let k1_f = T::from_f64((k - 1) as f64);

        let p2 = (c * x * p1 - k1_f * p0) / k_f;
        let dp2 = (c * (p1 + x * dp1) - k1_f * dp0) / k_f;

        p0 = p1;
        p1 = p2;
        dp0 = dp1;
        dp1 = dp2;
    }

    (p1, dp1)
}

/// Create a Gauss-Legendre quadrature rule with n points on [-1, 1].
pub fn legendre<T: CustomNumeric>(n: usize) -> Rule<T> {
    if n == 0 {
        return Rule::empty();
    }

    let (x, w) = gauss_legendre_nodes_weights(n);
    Rule::new(x, w, T::from_f64(-1.0), T::from_f64(1.0))
}

#[cfg(test)]
#[path = "gauss_tests.rs"]
mod tests;
