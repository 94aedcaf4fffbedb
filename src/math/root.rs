//! Quantile search for monotone functions on `[0, ∞)`.
//!
//! The mean value function of the growth model has no closed-form inverse in
//! general use, so we invert its CDF numerically:
//!
//! 1. bracket the root by doubling an upper bound from `t = 1`
//! 2. bisect the bracket until it is relatively narrow
//!
//! Bisection is slow but never leaves the bracket, which matters for the very
//! flat tails a log-extreme-value CDF produces for small shapes.

use crate::error::ModelError;

/// Stopping rules for [`find_quantile`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantileOptions {
    /// Stop once `hi - lo <= rel_tol * hi`.
    pub rel_tol: f64,
    /// Maximum number of bisection steps.
    pub max_iter: usize,
}

impl Default for QuantileOptions {
    fn default() -> Self {
        Self {
            rel_tol: 1e-12,
            max_iter: 400,
        }
    }
}

/// Find `t >= 0` with `cdf(t) = target` for a non-decreasing `cdf` with range `[0, 1)`.
pub fn find_quantile<F>(target: f64, cdf: F, opts: &QuantileOptions) -> Result<f64, ModelError>
where
    F: Fn(f64) -> f64,
{
    if !(target.is_finite() && target > 0.0 && target < 1.0) {
        return Err(ModelError::QuantileTarget { target });
    }

    let mut lo = 0.0;
    let mut hi = 1.0;
    while cdf(hi) < target {
        lo = hi;
        hi *= 2.0;
        if !hi.is_finite() {
            return Err(ModelError::QuantileBracket { target });
        }
    }

    for _ in 0..opts.max_iter {
        if hi - lo <= opts.rel_tol * hi {
            break;
        }
        let mid = 0.5 * (lo + hi);
        if cdf(mid) < target {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    Ok(0.5 * (lo + hi))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exp_cdf(rate: f64) -> impl Fn(f64) -> f64 {
        move |t: f64| -(-rate * t).exp_m1()
    }

    #[test]
    fn inverts_exponential_cdf() {
        let opts = QuantileOptions::default();
        for &rate in &[1e-4, 0.5, 1.0, 30.0] {
            for &p in &[1e-6, 0.1, 0.5, 0.9, 0.999] {
                let t = find_quantile(p, exp_cdf(rate), &opts).unwrap();
                let expected = -(-p).ln_1p() / rate;
                assert!(
                    (t - expected).abs() <= 1e-9 * expected,
                    "rate={rate} p={p}: got {t}, expected {expected}"
                );
            }
        }
    }

    #[test]
    fn rejects_targets_outside_unit_interval() {
        let opts = QuantileOptions::default();
        for &bad in &[0.0, 1.0, -0.5, 1.5, f64::NAN] {
            let err = find_quantile(bad, exp_cdf(1.0), &opts).unwrap_err();
            assert!(matches!(err, ModelError::QuantileTarget { .. }));
        }
    }

    #[test]
    fn reports_unbracketable_target() {
        // A CDF that saturates below the target never brackets.
        let opts = QuantileOptions::default();
        let err = find_quantile(0.9, |_t: f64| 0.5, &opts).unwrap_err();
        assert!(matches!(err, ModelError::QuantileBracket { .. }));
    }
}
