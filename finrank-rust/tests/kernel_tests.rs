//! Spectra of integral operators with separable kernels

mod common;

use common::{distance_to_nearest, normal_samples};
use finrank_rust::{
    decompose, eigenvalues_of_function, eigenvalues_of_kernel, Complex64, DecompositionConfig,
    Domain, QuadratureConfig, Tolerance,
};
use nalgebra::{DMatrix, SymmetricEigen};
use std::f64::consts::PI;

fn legendre_p(k: usize, t: f64) -> f64 {
    match k {
        0 => 1.0,
        1 => t,
        2 => 0.5 * (3.0 * t * t - 1.0),
        3 => 0.5 * (5.0 * t * t * t - 3.0 * t),
        _ => unreachable!(),
    }
}

fn config() -> DecompositionConfig {
    DecompositionConfig::new(Tolerance::Relative(1e-12), 60)
}

#[test]
fn test_gaussian_kernel_matches_nystrom() {
    let f = |x: f64, y: f64| (-(x - y) * (x - y)).exp();
    let domain = Domain::square(0.0, 1.0).unwrap();
    let repr = decompose(f, domain, &config()).unwrap();
    assert!(!repr.is_rank_capped());

    let result = eigenvalues_of_kernel(&repr).unwrap();
    assert_eq!(result.len(), repr.rank());
    assert_eq!(result.implicit_zeros, 0);

    // Symmetrized Nyström discretization on the same composite Gauss rule
    let rule = QuadratureConfig::default().rule::<f64>(0.0, 1.0).unwrap();
    let n = rule.len();
    let s = DMatrix::from_fn(n, n, |p, q| {
        rule.w[p].sqrt() * f(rule.x[p], rule.x[q]) * rule.w[q].sqrt()
    });
    let mut nystrom: Vec<f64> = SymmetricEigen::new(s).eigenvalues.iter().copied().collect();
    nystrom.sort_by(|a, b| b.total_cmp(a));

    let reduced = result.sorted_by_modulus();
    for k in 0..4 {
        assert!(
            (reduced[k].re - nystrom[k]).abs() < 1e-9,
            "eigenvalue {k}: reduced {} vs Nyström {}",
            reduced[k],
            nystrom[k]
        );
        assert!(reduced[k].im.abs() < 1e-9);
    }
}

#[test]
fn test_random_legendre_kernel() {
    // f = Σ a_k P_k(x) P_k(y); ‖P_k‖² = 2 / (2k + 1) on [-1, 1]
    let coefficients = normal_samples(4, 2024);
    let expected: Vec<Complex64> = coefficients
        .iter()
        .enumerate()
        .map(|(k, a)| Complex64::new(a * 2.0 / (2 * k + 1) as f64, 0.0))
        .collect();

    let kernel = {
        let coefficients = coefficients.clone();
        move |x: f64, y: f64| {
            coefficients
                .iter()
                .enumerate()
                .map(|(k, a)| a * legendre_p(k, x) * legendre_p(k, y))
                .sum::<f64>()
        }
    };

    let domain = Domain::square(-1.0, 1.0).unwrap();
    let config = DecompositionConfig::new(Tolerance::Relative(1e-10), 50);
    let result =
        eigenvalues_of_function(kernel, domain, &config, &QuadratureConfig::default()).unwrap();

    assert_eq!(result.len(), 4);
    assert!(!result.approximate);
    let scale = result.spectral_radius();
    for &z in &result.eigenvalues {
        assert!(distance_to_nearest(z, &expected) < 1e-8 * scale);
    }
}

#[test]
fn test_antisymmetric_kernel_has_imaginary_pair() {
    // sin(π(x - y)) = sin(πx)cos(πy) - cos(πx)sin(πy), spectrum ±i on [-1, 1]
    let domain = Domain::square(-1.0, 1.0).unwrap();
    let repr = decompose(|x, y| (PI * (x - y)).sin(), domain, &config()).unwrap();
    assert_eq!(repr.rank(), 2);

    let result = eigenvalues_of_kernel(&repr).unwrap();
    assert_eq!(result.len(), 2);
    let expected = [Complex64::new(0.0, 1.0), Complex64::new(0.0, -1.0)];
    for &z in &result.eigenvalues {
        assert!(distance_to_nearest(z, &expected) < 1e-10);
    }
    assert!((result.eigenvalues[0] - result.eigenvalues[1].conj()).norm() < 1e-10);
}

#[test]
fn test_zero_kernel_has_empty_spectrum() {
    let domain = Domain::square(-1.0, 1.0).unwrap();
    let result =
        eigenvalues_of_function(|_, _| 0.0, domain, &config(), &QuadratureConfig::default())
            .unwrap();
    assert!(result.is_empty());
    assert_eq!(result.total_dimension(), 0);
    assert!(!result.approximate);
}

#[test]
fn test_rank_cap_marks_spectrum_approximate() {
    let domain = Domain::square(0.0, 1.0).unwrap();
    let capped = DecompositionConfig::new(Tolerance::Relative(1e-14), 3);
    let result = eigenvalues_of_function(
        |x, y| 1.0 / (1.0 + x + y),
        domain,
        &capped,
        &QuadratureConfig::default(),
    )
    .unwrap();

    assert_eq!(result.len(), 3);
    assert!(result.approximate);
}
