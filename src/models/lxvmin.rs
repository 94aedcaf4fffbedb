//! Log-extreme-value-minimum (log-Weibull) growth model.
//!
//! With `y = exp((ln t + scale) / shape)`:
//!
//! - density:      `f(t) = y exp(-y) / (shape t)`
//! - CDF:          `F(t) = 1 - exp(-y)`
//! - mean value:   `m(t) = omega F(t)`
//!
//! The kernel functions are total on `t > 0` (the CDF and mean value function
//! also accept `t = 0`, where they vanish). Everything that walks a time series
//! or integrates takes a [`Params`] so the three-parameter contract is fixed by type.

use tracing::warn;

use crate::domain::Params;
use crate::error::ModelError;
use crate::math::{find_quantile, trapezoid, IntegrationOptions, QuantileOptions};

#[inline]
fn y_of(t: f64, shape: f64, scale: f64) -> f64 {
    ((t.ln() + scale) / shape).exp()
}

/// Probability density at `t > 0`.
pub fn pdf(t: f64, shape: f64, scale: f64) -> f64 {
    let y = y_of(t, shape, scale);
    y * (-y).exp() / shape / t
}

/// `ln f(t)`, evaluated without forming the density (no underflow in the tails).
pub fn log_pdf(t: f64, shape: f64, scale: f64) -> f64 {
    let lt = t.ln();
    let ly = (lt + scale) / shape;
    ly - ly.exp() - shape.ln() - lt
}

/// Cumulative distribution at `t >= 0`.
pub fn cdf(t: f64, shape: f64, scale: f64) -> f64 {
    let y = y_of(t, shape, scale);
    -(-y).exp_m1()
}

/// Expected cumulative number of faults by time `t`.
pub fn mvf(t: f64, omega: f64, shape: f64, scale: f64) -> f64 {
    omega * cdf(t, shape, scale)
}

/// Time at which the mean value function reaches `value` (`0 < value < omega`).
pub fn inverse_mvf(value: f64, params: &Params, opts: &QuantileOptions) -> Result<f64, ModelError> {
    let Params { omega, shape, scale } = *params;
    find_quantile(value / omega, |t| cdf(t, shape, scale), opts)
}

/// Failure intensity `omega f(t)` at the cumulative time after each span.
pub fn rate_series(spans: &[f64], params: &Params) -> Vec<f64> {
    let Params { omega, shape, scale } = *params;
    let mut t = 0.0;
    spans
        .iter()
        .map(|&span| {
            t += span;
            omega * pdf(t, shape, scale)
        })
        .collect()
}

/// Mean value function at the cumulative time after each span.
pub fn mvf_series(spans: &[f64], params: &Params) -> Vec<f64> {
    let Params { omega, shape, scale } = *params;
    let mut t = 0.0;
    spans
        .iter()
        .map(|&span| {
            t += span;
            mvf(t, omega, shape, scale)
        })
        .collect()
}

/// Numerical settings for [`mttf`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MttfOptions {
    pub integration: IntegrationOptions,
    pub quantile: QuantileOptions,
}

/// MTTF estimate together with how it was obtained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MttfEstimate {
    /// Expected residual time (never negative).
    pub value: f64,
    /// Upper integration bound `b` (offset from the current time).
    pub upper: f64,
    pub rounds: usize,
    /// Whether the quadrature met its tolerance before running out of rounds.
    pub converged: bool,
}

/// Expected residual time after `current_time` until reliability drops to `r`.
///
/// The integrand is the conditional reliability, renormalized so the event
/// "no further fault ever" (probability `exp(-(omega - m(s)))`) is excluded:
///
/// ```text
/// R(x) = (exp(-(m(s + x) - m(s))) - ffp) / (1 - ffp)
/// ```
///
/// integrated over `[0, b]`, where `m(s + b) = m(s) - ln(r + (1 - r) ffp)`.
///
/// Once `m(s)` has reached `omega` there is nothing left to integrate and the
/// estimate is 0 with `upper = 0`.
pub fn mttf(
    current_time: f64,
    r: f64,
    params: &Params,
    opts: &MttfOptions,
) -> Result<MttfEstimate, ModelError> {
    if !(r > 0.0 && r < 1.0) {
        return Err(ModelError::InvalidReliability { r });
    }
    let Params { omega, shape, scale } = *params;

    let sval = mvf(current_time, omega, shape, scale);
    let ffp = (-(omega - sval)).exp();

    let rev = sval - (r + (1.0 - r) * ffp).ln();
    // No mass left beyond `current_time` at double precision: the quantile
    // target would be 1 and nothing remains to integrate.
    if !(rev / omega < 1.0) {
        warn!(
            current_time,
            residual = omega - sval,
            "mean value function has reached omega; MTTF reported as 0"
        );
        return Ok(MttfEstimate {
            value: 0.0,
            upper: 0.0,
            rounds: 0,
            converged: true,
        });
    }
    let b = inverse_mvf(rev, params, &opts.quantile)? - current_time;
    if b <= 0.0 {
        return Ok(MttfEstimate {
            value: 0.0,
            upper: b,
            rounds: 0,
            converged: true,
        });
    }

    let creli = |x: f64| {
        let m = mvf(current_time + x, omega, shape, scale) - sval;
        ((-m).exp() - ffp) / (1.0 - ffp)
    };
    let q = trapezoid(creli, 0.0, b, &opts.integration);
    if !q.converged {
        warn!(
            rounds = q.rounds,
            value = q.value,
            "MTTF quadrature stopped before reaching tolerance"
        );
    }

    Ok(MttfEstimate {
        value: q.value.max(0.0),
        upper: b,
        rounds: q.rounds,
        converged: q.converged,
    })
}
