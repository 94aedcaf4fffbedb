//! Fitted series at the observation points and the end-of-test reliability summary.

use crate::domain::{Boundary, FaultData, Params};
use crate::error::ModelError;
use crate::models::{mttf, mvf, mvf_series, rate_series, MttfEstimate, MttfOptions};

/// One row of the fitted-series table.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRow {
    /// 1-based record number.
    pub index: usize,
    pub span: f64,
    /// Cumulative time at the end of the record.
    pub time: f64,
    /// Faults in the record (`None` for a prediction grid).
    pub observed: Option<f64>,
    pub cumulative_observed: Option<f64>,
    /// Expected cumulative faults by `time`.
    pub mvf: f64,
    /// Failure intensity at `time`.
    pub intensity: f64,
}

/// Reliability figures at the end of observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReliabilitySummary {
    /// End of observation.
    pub time: f64,
    /// Expected faults found by `time`.
    pub expected_found: f64,
    /// Expected faults still latent (`omega - m(time)`).
    pub expected_residual: f64,
    /// Probability that no further fault ever occurs.
    pub fault_free: f64,
    pub intensity: f64,
    pub reliability_target: f64,
    pub mttf: MttfEstimate,
}

/// Evaluate fitted series at the dataset's record boundaries.
pub fn compute_series(data: &FaultData, params: &Params) -> Vec<SeriesRow> {
    let spans = data.spans();
    let means = mvf_series(&spans, params);
    let rates = rate_series(&spans, params);

    data.records()
        .iter()
        .zip(data.cumulative())
        .zip(means.into_iter().zip(rates))
        .enumerate()
        .map(|(i, ((rec, (time, cum)), (mvf, intensity)))| SeriesRow {
            index: i + 1,
            span: rec.span,
            time,
            observed: Some(rec.count + if rec.boundary == Boundary::Exact { 1.0 } else { 0.0 }),
            cumulative_observed: Some(cum),
            mvf,
            intensity,
        })
        .collect()
}

/// Evaluate fitted series on `steps` equal spans covering `[0, horizon]`.
pub fn compute_grid_series(horizon: f64, steps: usize, params: &Params) -> Vec<SeriesRow> {
    if steps == 0 {
        return Vec::new();
    }
    let width = horizon / steps as f64;
    let spans = vec![width; steps];
    let means = mvf_series(&spans, params);
    let rates = rate_series(&spans, params);

    means
        .into_iter()
        .zip(rates)
        .enumerate()
        .map(|(i, (mvf, intensity))| SeriesRow {
            index: i + 1,
            span: width,
            time: width * (i + 1) as f64,
            observed: None,
            cumulative_observed: None,
            mvf,
            intensity,
        })
        .collect()
}

/// Summarize reliability at `time` under `params`.
pub fn reliability_summary(
    time: f64,
    r: f64,
    params: &Params,
    opts: &MttfOptions,
) -> Result<ReliabilitySummary, ModelError> {
    let Params { omega, shape, scale } = *params;
    let found = mvf(time, omega, shape, scale);
    let residual = omega - found;
    let intensity = rate_series(&[time], params)[0];

    Ok(ReliabilitySummary {
        time,
        expected_found: found,
        expected_residual: residual,
        fault_free: (-residual).exp(),
        intensity,
        reliability_target: r,
        mttf: mttf(time, r, params, opts)?,
    })
}
