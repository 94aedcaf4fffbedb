//! Shared pipeline logic behind the `srgm` subcommands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! ingest -> EM fit -> fitted series -> reliability summary
//!
//! The CLI front-end can then focus on presentation (printing and exports).

use tracing::info;

use crate::data::{simulate_faults, SimulatedData};
use crate::domain::{FitConfig, ModelFile, Params, PredictConfig, PredictTimes, SimulateConfig};
use crate::error::AppError;
use crate::fit::{fit_em, initial_params, EmOptions, FitOutcome};
use crate::io::ingest::{load_fault_data, IngestedData};
use crate::io::model::read_model_json;
use crate::math::{IntegrationOptions, QuantileOptions};
use crate::models::MttfOptions;
use crate::report::{
    compute_grid_series, compute_series, reliability_summary, ReliabilitySummary, SeriesRow,
};

/// All computed outputs of a single `srgm fit` run.
#[derive(Debug, Clone)]
pub struct FitRun {
    pub ingest: IngestedData,
    /// Parameters the EM started from.
    pub init: Params,
    pub outcome: FitOutcome,
    pub series: Vec<SeriesRow>,
    pub reliability: ReliabilitySummary,
}

/// All computed outputs of a single `srgm predict` run.
#[derive(Debug, Clone)]
pub struct PredictRun {
    pub model: ModelFile,
    pub series: Vec<SeriesRow>,
    pub reliability: ReliabilitySummary,
}

/// Check the MTTF settings shared by `fit` and `predict`.
pub fn mttf_options(reliability: f64, int_eps: f64, int_max_rounds: usize) -> Result<MttfOptions, AppError> {
    if !(reliability > 0.0 && reliability < 1.0) {
        return Err(AppError::new(
            2,
            format!("--reliability must be in (0, 1), got {reliability}"),
        ));
    }
    if !(int_eps.is_finite() && int_eps > 0.0) {
        return Err(AppError::new(2, format!("--int-eps must be > 0, got {int_eps}")));
    }
    if int_max_rounds == 0 {
        return Err(AppError::new(2, "--int-max-rounds must be > 0."));
    }
    Ok(MttfOptions {
        integration: IntegrationOptions {
            max_rounds: int_max_rounds,
            rel_eps: int_eps,
        },
        quantile: QuantileOptions::default(),
    })
}

/// Execute the full fitting pipeline and return the computed outputs.
pub fn run_fit(config: &FitConfig) -> Result<FitRun, AppError> {
    let mttf_opts = mttf_options(config.reliability, config.int_eps, config.int_max_rounds)?;
    if config.max_iter == 0 {
        return Err(AppError::new(2, "--max-iter must be > 0."));
    }
    if !(config.rtol.is_finite() && config.rtol > 0.0) {
        return Err(AppError::new(2, format!("--rtol must be > 0, got {}", config.rtol)));
    }

    // 1) Load and validate the data.
    let ingest = load_fault_data(&config.csv_path)?;

    // 2) EM from the supplied or data-driven starting point.
    let init = config.init.unwrap_or_else(|| initial_params(&ingest.data));
    let opts = EmOptions {
        max_iter: config.max_iter,
        rtol: config.rtol,
    };
    let outcome = fit_em(&ingest.data, &init, &opts)?;

    // 3) Fitted series and reliability at the end of observation.
    let series = compute_series(&ingest.data, &outcome.params);
    let horizon = ingest.data.total_time();
    let reliability = reliability_summary(horizon, config.reliability, &outcome.params, &mttf_opts)?;
    info!(
        mttf = reliability.mttf.value,
        residual = reliability.expected_residual,
        "reliability at end of observation"
    );

    Ok(FitRun {
        ingest,
        init,
        outcome,
        series,
        reliability,
    })
}

/// Evaluate a saved model on a CSV's record boundaries or an equal grid.
pub fn run_predict(config: &PredictConfig) -> Result<PredictRun, AppError> {
    let mttf_opts = mttf_options(config.reliability, config.int_eps, config.int_max_rounds)?;
    let model = read_model_json(&config.model_path)?;

    let (series, time) = match &config.times {
        PredictTimes::Csv(path) => {
            let ingest = load_fault_data(path)?;
            let series = compute_series(&ingest.data, &model.params);
            (series, ingest.data.total_time())
        }
        PredictTimes::Grid { horizon, steps } => {
            if !(horizon.is_finite() && *horizon > 0.0) {
                return Err(AppError::new(2, format!("--horizon must be > 0, got {horizon}")));
            }
            if *steps == 0 {
                return Err(AppError::new(2, "--steps must be > 0."));
            }
            (compute_grid_series(*horizon, *steps, &model.params), *horizon)
        }
    };

    let reliability = reliability_summary(time, config.reliability, &model.params, &mttf_opts)?;
    Ok(PredictRun {
        model,
        series,
        reliability,
    })
}

/// Simulate fault data and write it to the configured CSV.
pub fn run_simulate(config: &SimulateConfig) -> Result<SimulatedData, AppError> {
    let sim = simulate_faults(config)?;
    crate::io::export::write_fault_csv(&config.out, &sim.data)?;
    info!(
        failures = sim.failure_times.len(),
        records = sim.data.len(),
        out = %config.out.display(),
        "wrote simulated data"
    );
    Ok(sim)
}
