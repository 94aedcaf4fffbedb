//! Synthetic fault data from a known model.
//!
//! Failure times of a non-homogeneous Poisson process with mean value function
//! `m(t)` are `m⁻¹(Γ_k)`, where `Γ_k` are the arrival epochs of a unit-rate Poisson
//! process. We draw `Γ_k` as running sums of `Exp(1)` variates and stop at
//! `omega` (the process never produces more) or at the horizon.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Exp1;
use tracing::debug;

use crate::domain::{FaultData, FaultRecord, SimulateConfig};
use crate::error::AppError;
use crate::math::QuantileOptions;
use crate::models::inverse_mvf;

#[derive(Debug, Clone)]
pub struct SimulatedData {
    pub data: FaultData,
    /// Sorted failure instants inside `[0, horizon]`.
    pub failure_times: Vec<f64>,
}

pub fn simulate_faults(config: &SimulateConfig) -> Result<SimulatedData, AppError> {
    config
        .params
        .validate()
        .map_err(|e| AppError::new(2, format!("Invalid simulation parameters: {e}")))?;
    if !(config.horizon.is_finite() && config.horizon > 0.0) {
        return Err(AppError::new(2, "Simulation horizon must be finite and > 0."));
    }
    if !config.exact && config.intervals == 0 {
        return Err(AppError::new(2, "Number of intervals must be > 0."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let failure_times = draw_failure_times(&mut rng, config)?;
    debug!(
        n = failure_times.len(),
        seed = config.seed,
        horizon = config.horizon,
        "simulated failure times"
    );

    let records = if config.exact {
        exact_records(&failure_times, config.horizon)
    } else {
        grouped_records(&failure_times, config.horizon, config.intervals)
    };

    Ok(SimulatedData {
        data: FaultData::new(records)?,
        failure_times,
    })
}

fn draw_failure_times(rng: &mut StdRng, config: &SimulateConfig) -> Result<Vec<f64>, AppError> {
    let omega = config.params.omega;
    let opts = QuantileOptions::default();

    let mut times = Vec::new();
    let mut epoch = 0.0;
    loop {
        let step: f64 = rng.sample(Exp1);
        epoch += step;
        if epoch / omega >= 1.0 {
            break;
        }
        let t = inverse_mvf(epoch, &config.params, &opts)?;
        if t > config.horizon {
            break;
        }
        times.push(t);
    }
    Ok(times)
}

fn exact_records(times: &[f64], horizon: f64) -> Vec<FaultRecord> {
    let mut records = Vec::with_capacity(times.len() + 1);
    let mut last = 0.0;
    for &t in times {
        records.push(FaultRecord::exact(t - last));
        last = t;
    }
    if horizon > last || records.is_empty() {
        records.push(FaultRecord::count_only(horizon - last, 0.0));
    }
    records
}

fn grouped_records(times: &[f64], horizon: f64, intervals: usize) -> Vec<FaultRecord> {
    let width = horizon / intervals as f64;
    let mut counts = vec![0.0; intervals];
    for &t in times {
        let bin = ((t / width) as usize).min(intervals - 1);
        counts[bin] += 1.0;
    }
    counts
        .into_iter()
        .map(|c| FaultRecord::count_only(width, c))
        .collect()
}
