//! Special functions.
//!
//! Only `ln Γ(x)` is needed here: the Poisson count term of the EM
//! log-likelihood subtracts `ln Γ(x + 1)` for (possibly fractional) counts `x`.

use std::f64::consts::PI;

const LOG_SQRT_2PI: f64 = 0.918_938_533_204_672_8; // 0.5 * ln(2*pi)
const LANCZOS_G: f64 = 7.0;
#[allow(clippy::excessive_precision)] // published Lanczos coefficients
const LANCZOS_COEFFS: [f64; 9] = [
    0.999_999_999_999_809_93,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_59,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_571_6e-6,
    1.505_632_735_149_311_6e-7,
];

/// Natural log of the Gamma function (Lanczos, g = 7).
///
/// Returns NaN for NaN input and at the poles (non-positive integers).
pub fn log_gamma(x: f64) -> f64 {
    if x.is_nan() || x == f64::NEG_INFINITY {
        return f64::NAN;
    }
    if x == f64::INFINITY {
        return f64::INFINITY;
    }
    if x <= 0.0 && x == x.round() {
        return f64::NAN;
    }
    if x < 0.5 {
        // Reflection: Γ(x) Γ(1 - x) = π / sin(πx)
        let sin_pi = (PI * x).sin();
        return PI.ln() - sin_pi.abs().ln() - log_gamma(1.0 - x);
    }

    let z = x - 1.0;
    let mut acc = LANCZOS_COEFFS[0];
    for (i, coeff) in LANCZOS_COEFFS.iter().enumerate().skip(1) {
        acc += coeff / (z + i as f64);
    }
    let t = z + LANCZOS_G + 0.5;
    LOG_SQRT_2PI + (z + 0.5) * t.ln() - t + acc.ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_gamma_integer_factorials() {
        assert!(log_gamma(1.0).abs() < 1e-12);
        assert!(log_gamma(2.0).abs() < 1e-12);
        // Γ(6) = 5! = 120
        assert!((log_gamma(6.0) - 120f64.ln()).abs() < 1e-10);
        // Γ(21) = 20!
        let fact20: f64 = (1..=20).map(|k| k as f64).product();
        assert!((log_gamma(21.0) - fact20.ln()).abs() < 1e-9);
    }

    #[test]
    fn log_gamma_half_integer() {
        // Γ(1/2) = sqrt(pi)
        assert!((log_gamma(0.5) - 0.5 * PI.ln()).abs() < 1e-12);
        // Γ(3/2) = sqrt(pi)/2
        assert!((log_gamma(1.5) - (0.5 * PI.ln() - 2f64.ln())).abs() < 1e-12);
    }

    #[test]
    fn log_gamma_poles_and_nan() {
        assert!(log_gamma(0.0).is_nan());
        assert!(log_gamma(-3.0).is_nan());
        assert!(log_gamma(f64::NAN).is_nan());
        assert_eq!(log_gamma(f64::INFINITY), f64::INFINITY);
    }
}
