//! One Expectation-Maximization step for the log-extreme-value-minimum model.
//!
//! E-step: a single forward pass over the records carries the previous and the
//! current hazard-transform triple. Grouped counts contribute through the
//! difference of the two triples, exact failure times through the density at the
//! record's end instant. After the pass the unobserved tail (faults after the last
//! record) is folded in from the last triple.
//!
//! M-step (closed form):
//!
//! ```text
//! omega' = en1
//! scale' = -shape * ln(en2 / en1)
//! shape' = shape * en3 / en1
//! ```
//!
//! The returned log-likelihood is evaluated at the parameters passed in, not at
//! the updated ones.

use crate::domain::{Boundary, EmUpdate, FaultData, Params};
use crate::error::ModelError;
use crate::math::log_gamma;
use crate::models::{decrement, log_pdf, HazardTriple};

/// Expected sufficient statistics plus the running log-likelihood.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Stats {
    en1: f64,
    en2: f64,
    en3: f64,
    llf: f64,
}

/// Run one EM step on `data` starting from `params`.
///
/// Fails with [`ModelError::Cancellation`] when a record with faults falls on an
/// interval whose probability mass is not positive (zero-length first interval,
/// or the law has no mass left at these parameters).
pub fn em_step(data: &FaultData, params: &Params) -> Result<EmUpdate, ModelError> {
    params.validate()?;
    let Params { omega, shape, scale } = *params;

    let mut s = Stats::default();
    let mut t = 0.0;
    let mut prev = HazardTriple::origin(params);
    let mut curr = prev;

    for (index, rec) in data.records().iter().enumerate() {
        // Zero spans are simultaneous reports: they reuse the previous interval.
        if rec.span != 0.0 {
            t += rec.span;
            prev = curr;
            curr = HazardTriple::at(t, params);
        }

        let x = rec.count;
        if x != 0.0 {
            let [d0, d1, d2] = decrement(&prev, &curr);
            if !(d0 > 0.0) {
                return Err(ModelError::Cancellation { index, diff: d0 });
            }
            s.en1 += x;
            s.en2 += x * d1 / d0;
            s.en3 += x * d2 / d0;
            s.llf += x * d0.ln() - log_gamma(x + 1.0);
        }

        if rec.boundary == Boundary::Exact {
            if t <= 0.0 {
                return Err(ModelError::ExactAtOrigin { index });
            }
            let lt = t.ln();
            s.en1 += 1.0;
            s.en2 += (lt / shape).exp();
            s.en3 += -(lt + scale) / shape * (1.0 - curr.y);
            s.llf += log_pdf(t, shape, scale);
        }
    }

    // Tail beyond the last record; `curr` is the triple at the end of observation.
    s.llf += omega.ln() * s.en1;
    s.en1 += omega * curr.g0;
    let total = s.en1;
    s.en2 += omega * curr.g1;
    s.en3 += omega * curr.g2;
    s.llf += omega * (-curr.y).exp_m1();

    let next = Params {
        omega: s.en1,
        shape: shape * s.en3 / s.en1,
        scale: -shape * (s.en2 / s.en1).ln(),
    };

    Ok(EmUpdate {
        params: next,
        delta: next.delta(params),
        llf: s.llf,
        total,
    })
}
