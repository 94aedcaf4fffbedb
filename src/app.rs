//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - installs logging
//! - runs the fit / predict / simulate pipelines
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;
use tracing::debug;

use crate::cli::{Cli, Command, FitArgs, PredictArgs, SimulateArgs};
use crate::domain::{FitConfig, Params, PredictConfig, PredictTimes, SimulateConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `srgm` binary.
pub fn run() -> Result<(), AppError> {
    // A missing .env is normal; only explicit settings matter.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    crate::logging::init_logging(cli.log.log_level, cli.log.log_format);

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Predict(args) => handle_predict(args),
        Command::Simulate(args) => handle_simulate(args),
    }
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(&args);
    debug!(?config, "fit configuration");
    let run = pipeline::run_fit(&config)?;

    println!(
        "{}",
        crate::report::format_fit_summary(&run.ingest, &run.outcome, &run.reliability)
    );
    println!("{}", crate::report::format_series_table(&run.series));

    if config.plot {
        let plot = crate::plot::render_ascii_plot(
            &run.ingest.data,
            &run.outcome.params,
            config.plot_width,
            config.plot_height,
        );
        println!("{plot}");
    }

    // Optional exports.
    if let Some(path) = &config.export_series {
        crate::io::export::write_series_csv(path, &run.series)?;
    }
    if let Some(path) = &config.export_model {
        let model = crate::io::model::model_file_from_fit(&run.outcome, run.ingest.data.total_time());
        crate::io::model::write_model_json(path, &model)?;
    }

    Ok(())
}

fn handle_predict(args: PredictArgs) -> Result<(), AppError> {
    let config = predict_config_from_args(&args)?;
    let run = pipeline::run_predict(&config)?;

    println!("{}", crate::report::format_model_header(&run.model));
    println!("{}", crate::report::format_series_table(&run.series));
    println!("{}", crate::report::format_reliability(&run.reliability));

    if let Some(path) = &config.export_series {
        crate::io::export::write_series_csv(path, &run.series)?;
    }
    Ok(())
}

fn handle_simulate(args: SimulateArgs) -> Result<(), AppError> {
    let config = simulate_config_from_args(&args);
    let sim = pipeline::run_simulate(&config)?;

    println!(
        "Simulated {} failures in [0, {}] -> {} records written to {}",
        sim.failure_times.len(),
        config.horizon,
        sim.data.len(),
        config.out.display()
    );
    Ok(())
}

pub fn fit_config_from_args(args: &FitArgs) -> FitConfig {
    FitConfig {
        csv_path: args.csv.clone(),
        init: args.init,
        max_iter: args.max_iter,
        rtol: args.rtol,
        reliability: args.mttf.reliability,
        int_eps: args.mttf.int_eps,
        int_max_rounds: args.mttf.int_max_rounds,
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_series: args.export.clone(),
        export_model: args.export_model.clone(),
    }
}

pub fn predict_config_from_args(args: &PredictArgs) -> Result<PredictConfig, AppError> {
    let times = match (&args.csv, args.horizon, args.steps) {
        (Some(path), _, _) => PredictTimes::Csv(path.clone()),
        (None, Some(horizon), Some(steps)) => PredictTimes::Grid { horizon, steps },
        _ => {
            return Err(AppError::new(
                2,
                "predict needs either --csv FILE or both --horizon and --steps.",
            ));
        }
    };
    Ok(PredictConfig {
        model_path: args.model.clone(),
        times,
        reliability: args.mttf.reliability,
        int_eps: args.mttf.int_eps,
        int_max_rounds: args.mttf.int_max_rounds,
        export_series: args.export.clone(),
    })
}

pub fn simulate_config_from_args(args: &SimulateArgs) -> SimulateConfig {
    SimulateConfig {
        params: Params::new(args.omega, args.shape, args.scale),
        horizon: args.horizon,
        intervals: args.intervals,
        exact: args.exact,
        seed: args.seed,
        out: args.out.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parse(argv: &[&str]) -> Command {
        Cli::try_parse_from(argv).unwrap().command
    }

    #[test]
    fn no_plot_wins_over_default_plot() {
        let Command::Fit(args) = parse(&["srgm", "fit", "--csv", "f.csv", "--no-plot"]) else {
            panic!("expected fit");
        };
        let config = fit_config_from_args(&args);
        assert!(!config.plot);
        assert_eq!(config.reliability, 0.5);
        assert!(config.export_model.is_none());
    }

    #[test]
    fn predict_times_from_flags() {
        let Command::Predict(args) = parse(&["srgm", "predict", "--model", "m.json", "--csv", "f.csv"]) else {
            panic!("expected predict");
        };
        let config = predict_config_from_args(&args).unwrap();
        assert_eq!(config.times, PredictTimes::Csv("f.csv".into()));

        let Command::Predict(args) = parse(&[
            "srgm", "predict", "--model", "m.json", "--horizon", "12.5", "--steps", "5",
        ]) else {
            panic!("expected predict");
        };
        let config = predict_config_from_args(&args).unwrap();
        assert_eq!(config.times, PredictTimes::Grid { horizon: 12.5, steps: 5 });

        let Command::Predict(args) = parse(&["srgm", "predict", "--model", "m.json"]) else {
            panic!("expected predict");
        };
        assert_eq!(predict_config_from_args(&args).unwrap_err().exit_code(), 2);
    }

    #[test]
    fn simulate_flags_collapse_into_config() {
        let Command::Simulate(args) = parse(&[
            "srgm", "simulate", "--omega", "40", "--shape", "0.9", "--scale", "-1.2", "--horizon",
            "10", "--exact", "--seed", "7", "--out", "sim.csv",
        ]) else {
            panic!("expected simulate");
        };
        let config = simulate_config_from_args(&args);
        assert_eq!(config.params, Params::new(40.0, 0.9, -1.2));
        assert!(config.exact);
        assert_eq!(config.seed, 7);
        assert_eq!(config.out, PathBuf::from("sim.csv"));
    }
}
