//! Hazard-transform triples for the EM E-step.
//!
//! At a cumulative time `t` with `y = exp((ln t + scale) / shape)` the triple is
//!
//! - `g0 = exp(-y)`                              (survival of the law)
//! - `g1 = exp(-scale/shape) (1 + y) exp(-y)`
//! - `g2 = exp(-y) (1 + y ln y)`
//!
//! and at `t = 0` it is `(1, exp(-scale/shape), 1)`. Per-interval likelihood
//! contributions are differences of consecutive triples.
//!
//! Numerical notes:
//! - `g0_prev - g0_curr` is a difference of two nearly equal exponentials when the
//!   interval is short. [`interval_mass`] is the only place that difference is formed
//!   and it uses `expm1` to keep the leading digits.

use crate::domain::Params;

/// Transform values at one cumulative time point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HazardTriple {
    /// `exp((ln t + scale) / shape)`; zero at the origin.
    pub y: f64,
    pub g0: f64,
    pub g1: f64,
    pub g2: f64,
}

impl HazardTriple {
    /// Triple at `t = 0`.
    pub fn origin(params: &Params) -> Self {
        Self {
            y: 0.0,
            g0: 1.0,
            g1: (-params.scale / params.shape).exp(),
            g2: 1.0,
        }
    }

    /// Triple at `t > 0`.
    pub fn at(t: f64, params: &Params) -> Self {
        let y = ((t.ln() + params.scale) / params.shape).exp();
        let e = (-y).exp();
        Self {
            y,
            g0: e,
            g1: (-params.scale / params.shape).exp() * (1.0 + y) * e,
            g2: e * (1.0 + y * y.ln()),
        }
    }
}

/// `exp(-y_prev) - exp(-y_curr)`: probability mass of the law between two time points.
pub fn interval_mass(prev: &HazardTriple, curr: &HazardTriple) -> f64 {
    -prev.g0 * (-(curr.y - prev.y)).exp_m1()
}

/// Elementwise `prev - curr`, with the first entry from [`interval_mass`].
pub fn decrement(prev: &HazardTriple, curr: &HazardTriple) -> [f64; 3] {
    [
        interval_mass(prev, curr),
        prev.g1 - curr.g1,
        prev.g2 - curr.g2,
    ]
}
