//! Convergence driver: repeat [`em_step`] until the estimate settles.
//!
//! The loop stops when both
//! - the relative change of the log-likelihood, and
//! - the largest relative parameter change
//!
//! fall below `rtol`, or after `max_iter` steps. Running out of iterations is
//! reported (`converged = false`) but is not an error.

use tracing::{debug, info, warn};

use crate::domain::{FaultData, Params};
use crate::error::ModelError;
use crate::fit::em::em_step;

/// Number of free parameters (for AIC).
pub const PARAM_COUNT: usize = 3;

/// Stopping rules for [`fit_em`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmOptions {
    pub max_iter: usize,
    pub rtol: f64,
}

impl Default for EmOptions {
    fn default() -> Self {
        Self {
            max_iter: 10_000,
            rtol: 1e-8,
        }
    }
}

/// Final state of an EM run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOutcome {
    pub params: Params,
    /// Log-likelihood of the last step (at the parameters that step started from).
    pub llf: f64,
    /// Expected total faults from the last step.
    pub total: f64,
    pub aic: f64,
    pub iterations: usize,
    pub converged: bool,
}

/// Data-driven starting point.
///
/// `shape = 1` makes the law exponential; `scale = -ln(T)` puts about 63% of its
/// mass inside the observation window, and `omega` leaves room for a tail.
pub fn initial_params(data: &FaultData) -> Params {
    let total_time = data.total_time();
    let scale = if total_time > 0.0 { -total_time.ln() } else { 0.0 };
    Params::new((1.2 * data.total_faults()).max(1.0), 1.0, scale)
}

/// Akaike information criterion for a fitted log-likelihood.
pub fn aic(llf: f64) -> f64 {
    -2.0 * llf + 2.0 * PARAM_COUNT as f64
}

/// Fit the model by iterating EM steps from `init`.
pub fn fit_em(data: &FaultData, init: &Params, opts: &EmOptions) -> Result<FitOutcome, ModelError> {
    init.validate()?;

    let mut params = *init;
    let mut llf = f64::NAN;
    let mut total = f64::NAN;
    let mut prev_llf: Option<f64> = None;
    let mut converged = false;
    let mut iterations = 0;

    while iterations < opts.max_iter {
        iterations += 1;
        let step = em_step(data, &params)?;

        let rel_param = step.params.max_rel_change(&step.delta);
        let rel_llf = match prev_llf {
            Some(prev) if step.llf != 0.0 => ((step.llf - prev) / step.llf).abs(),
            Some(prev) => (step.llf - prev).abs(),
            None => f64::INFINITY,
        };
        debug!(
            iter = iterations,
            llf = step.llf,
            omega = step.params.omega,
            shape = step.params.shape,
            scale = step.params.scale,
            rel_param,
            rel_llf,
            "em step"
        );

        params = step.params;
        llf = step.llf;
        total = step.total;
        params.validate().map_err(|e| {
            ModelError::InvalidParams(format!("EM diverged at iteration {iterations}: {e}"))
        })?;

        if rel_llf < opts.rtol && rel_param < opts.rtol {
            converged = true;
            break;
        }
        prev_llf = Some(step.llf);
    }

    if converged {
        info!(iterations, llf, %params, "EM converged");
    } else {
        warn!(iterations, llf, %params, "EM stopped at the iteration limit without converging");
    }

    Ok(FitOutcome {
        params,
        llf,
        total,
        aic: aic(llf),
        iterations,
        converged,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FaultRecord;

    fn decaying_counts() -> FaultData {
        FaultData::new(
            [9.0, 7.0, 6.0, 4.0, 4.0, 2.0, 1.0, 1.0]
                .iter()
                .map(|&c| FaultRecord::count_only(1.0, c))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn initial_params_follow_data() {
        let d = decaying_counts();
        let p = initial_params(&d);
        assert!((p.omega - 1.2 * 34.0).abs() < 1e-12);
        assert_eq!(p.shape, 1.0);
        assert!((p.scale + 8f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn converges_on_decaying_counts() {
        let d = decaying_counts();
        let out = fit_em(&d, &initial_params(&d), &EmOptions::default()).unwrap();
        assert!(out.converged, "{out:?}");
        assert!(out.iterations > 1);
        // The expected total can never be below what was observed.
        assert!(out.params.omega >= 34.0);
        assert!(out.llf.is_finite());
        assert!((out.aic - (-2.0 * out.llf + 6.0)).abs() < 1e-12);

        // A fixed point: one more step barely moves anything.
        let again = em_step(&d, &out.params).unwrap();
        assert!(out.params.max_rel_change(&again.delta) < 1e-6);
    }

    #[test]
    fn iteration_limit_is_not_an_error() {
        let d = decaying_counts();
        let opts = EmOptions { max_iter: 3, rtol: 1e-12 };
        let out = fit_em(&d, &initial_params(&d), &opts).unwrap();
        assert!(!out.converged);
        assert_eq!(out.iterations, 3);
    }

    #[test]
    fn invalid_start_is_rejected() {
        let d = decaying_counts();
        let err = fit_em(&d, &Params::new(10.0, 0.0, 0.0), &EmOptions::default()).unwrap_err();
        assert!(matches!(err, ModelError::InvalidParams(_)));
    }
}
