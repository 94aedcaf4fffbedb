//! Trapezoidal quadrature with interval doubling.
//!
//! Each round halves the step and only evaluates the new midpoints:
//!
//! ```text
//! T(2n) = T(n) / 2 + h * Σ f(a + (2k - 1) h)      (h = (b - a) / 2n)
//! ```
//!
//! There is no Richardson extrapolation; the sequence stops when two successive
//! estimates agree to a relative tolerance, or after a fixed number of rounds.

/// Default maximum number of doubling rounds.
pub const MTTF_MAXITE: usize = 20;

/// Default relative tolerance between successive estimates.
pub const INT_EPS: f64 = 1.0e-8;

/// Stopping rules for [`trapezoid`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegrationOptions {
    pub max_rounds: usize,
    pub rel_eps: f64,
}

impl Default for IntegrationOptions {
    fn default() -> Self {
        Self {
            max_rounds: MTTF_MAXITE,
            rel_eps: INT_EPS,
        }
    }
}

/// Result of a quadrature run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadrature {
    /// Latest estimate (returned whether or not the tolerance was met).
    pub value: f64,
    /// Doubling rounds performed.
    pub rounds: usize,
    pub converged: bool,
}

/// Integrate `f` over `[a, b]`.
///
/// An empty or inverted interval (`b <= a`) integrates to zero.
pub fn trapezoid<F>(f: F, a: f64, b: f64, opts: &IntegrationOptions) -> Quadrature
where
    F: Fn(f64) -> f64,
{
    if !(b > a) {
        return Quadrature {
            value: 0.0,
            rounds: 0,
            converged: true,
        };
    }

    let mut h = b - a;
    let mut estimate = h * (f(a) + f(b)) / 2.0;
    let mut n: u64 = 1;

    for round in 1..=opts.max_rounds {
        n *= 2;
        h /= 2.0;

        let mut sum = 0.0;
        let mut i = 1;
        while i < n {
            sum += f(a + i as f64 * h);
            i += 2;
        }

        let next = estimate / 2.0 + h * sum;
        let converged = (next - estimate).abs() <= opts.rel_eps * estimate.abs();
        estimate = next;
        if converged {
            return Quadrature {
                value: estimate,
                rounds: round,
                converged: true,
            };
        }
    }

    Quadrature {
        value: estimate,
        rounds: opts.max_rounds,
        converged: false,
    }
}
