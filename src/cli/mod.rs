//! Command-line parsing for the `srgm` reliability tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the modeling/math code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{LogFormat, Params};
use crate::logging::LogLevel;
use crate::math::{INT_EPS, MTTF_MAXITE};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "srgm",
    version,
    about = "Software reliability growth: log-extreme-value-minimum NHPP model"
)]
pub struct Cli {
    #[command(flatten)]
    pub log: LogArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit the model to a fault-count CSV and report reliability figures.
    Fit(FitArgs),
    /// Evaluate a saved model on new times.
    Predict(PredictArgs),
    /// Generate synthetic fault data from known parameters.
    Simulate(SimulateArgs),
}

/// Logging flags shared by all subcommands.
#[derive(Debug, Args, Clone)]
pub struct LogArgs {
    /// Log verbosity (logs go to stderr).
    #[arg(long, global = true, value_enum, env = "SRGM_LOG", default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log line format.
    #[arg(long, global = true, value_enum, env = "SRGM_LOG_FORMAT", default_value_t = LogFormat::Human)]
    pub log_format: LogFormat,
}

/// Numerical settings for the MTTF estimate.
#[derive(Debug, Args, Clone)]
pub struct MttfArgs {
    /// Reliability target for the MTTF estimate, in (0, 1).
    #[arg(long, default_value_t = 0.5)]
    pub reliability: f64,

    /// Relative tolerance between successive quadrature estimates.
    #[arg(long, default_value_t = INT_EPS)]
    pub int_eps: f64,

    /// Maximum number of interval-doubling rounds.
    #[arg(long, default_value_t = MTTF_MAXITE)]
    pub int_max_rounds: usize,
}

/// Options for `srgm fit`.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// Fault data CSV (`time,fault,type`).
    #[arg(long, value_name = "FILE")]
    pub csv: PathBuf,

    /// Initial parameters as `omega,shape,scale` (derived from the data when omitted).
    #[arg(long, value_name = "OMEGA,SHAPE,SCALE", allow_hyphen_values = true, value_parser = parse_params)]
    pub init: Option<Params>,

    /// Maximum number of EM iterations.
    #[arg(long, default_value_t = 10_000)]
    pub max_iter: usize,

    /// Relative tolerance on log-likelihood and parameter changes.
    #[arg(long, default_value_t = 1e-8)]
    pub rtol: f64,

    #[command(flatten)]
    pub mttf: MttfArgs,

    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export the per-record series to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the fitted model to JSON.
    #[arg(long = "export-model")]
    pub export_model: Option<PathBuf>,
}

/// Options for `srgm predict`.
#[derive(Debug, Parser, Clone)]
pub struct PredictArgs {
    /// Model JSON produced by `srgm fit --export-model`.
    #[arg(long, value_name = "JSON")]
    pub model: PathBuf,

    /// Take evaluation times from the spans of a fault CSV.
    #[arg(long, value_name = "FILE", conflicts_with_all = ["horizon", "steps"])]
    pub csv: Option<PathBuf>,

    /// End of an equally spaced evaluation grid.
    #[arg(long, requires = "steps")]
    pub horizon: Option<f64>,

    /// Number of grid steps.
    #[arg(long, requires = "horizon")]
    pub steps: Option<usize>,

    #[command(flatten)]
    pub mttf: MttfArgs,

    /// Export the evaluated series to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

/// Options for `srgm simulate`.
#[derive(Debug, Parser, Clone)]
pub struct SimulateArgs {
    #[arg(long)]
    pub omega: f64,

    #[arg(long)]
    pub shape: f64,

    #[arg(long, allow_hyphen_values = true)]
    pub scale: f64,

    /// End of the observation window.
    #[arg(long)]
    pub horizon: f64,

    /// Number of equal counting intervals.
    #[arg(long, default_value_t = 20)]
    pub intervals: usize,

    /// Emit one record per failure time instead of grouped counts.
    #[arg(long)]
    pub exact: bool,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Output CSV.
    #[arg(long, value_name = "FILE")]
    pub out: PathBuf,
}

/// Parse `omega,shape,scale`.
pub fn parse_params(raw: &str) -> Result<Params, String> {
    let values = raw
        .split(',')
        .map(|s| {
            s.trim()
                .parse::<f64>()
                .map_err(|e| format!("'{}' is not a number: {e}", s.trim()))
        })
        .collect::<Result<Vec<f64>, String>>()?;
    let params = Params::try_from(values.as_slice()).map_err(|e| e.to_string())?;
    params.validate().map_err(|e| e.to_string())?;
    Ok(params)
}
