//! End-to-end: simulate -> CSV -> ingest -> EM fit -> reports and model file.

use std::path::PathBuf;

use lxvmin_srgm::app::pipeline::{run_fit, run_predict, run_simulate};
use lxvmin_srgm::domain::{FitConfig, Params, PredictConfig, PredictTimes, SimulateConfig};
use lxvmin_srgm::io::{model_file_from_fit, read_model_json, write_model_json, write_series_csv};
use lxvmin_srgm::plot::render_ascii_plot;
use lxvmin_srgm::report::{format_fit_summary, format_series_table};

fn fit_config(csv_path: PathBuf) -> FitConfig {
    FitConfig {
        csv_path,
        init: None,
        max_iter: 10_000,
        rtol: 1e-8,
        reliability: 0.5,
        int_eps: 1e-8,
        int_max_rounds: 20,
        plot: true,
        plot_width: 60,
        plot_height: 15,
        export_series: None,
        export_model: None,
    }
}

#[test]
fn simulated_grouped_data_fits_and_predicts() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("sim.csv");

    let truth = Params::new(80.0, 0.8, -(5.0f64).ln());
    let sim = run_simulate(&SimulateConfig {
        params: truth,
        horizon: 20.0,
        intervals: 25,
        exact: false,
        seed: 2024,
        out: csv.clone(),
    })
    .unwrap();
    let observed = sim.data.total_faults();
    assert!(observed > 10.0, "too few simulated failures: {observed}");

    let run = run_fit(&fit_config(csv.clone())).unwrap();
    assert_eq!(run.ingest.data, sim.data);
    assert_eq!(run.ingest.rows_read, 25);

    let p = run.outcome.params;
    assert!(run.outcome.llf.is_finite());
    assert!(p.omega >= observed - 1e-6, "omega {} below observed {observed}", p.omega);
    assert!(p.shape > 0.0 && p.scale.is_finite());
    assert!((run.outcome.aic - (-2.0 * run.outcome.llf + 6.0)).abs() < 1e-9);
    assert!(run.reliability.mttf.value >= 0.0);

    // The fitted curve ends close to what was observed.
    let last = run.series.last().unwrap();
    assert_eq!(last.cumulative_observed, Some(observed));
    assert!((last.mvf - observed).abs() < 0.25 * observed);

    let summary = format_fit_summary(&run.ingest, &run.outcome, &run.reliability);
    assert!(summary.contains("omega"));
    assert!(summary.contains("MTTF (r=0.5)"));
    assert_eq!(format_series_table(&run.series).lines().count(), 2 + 25);
    let plot = render_ascii_plot(&run.ingest.data, &p, 60, 15);
    assert_eq!(plot.lines().count(), 16);
    assert!(plot.contains('o') && plot.contains('-'));

    // Exports and a prediction from the saved model.
    let series_path = dir.path().join("series.csv");
    write_series_csv(&series_path, &run.series).unwrap();
    let exported = std::fs::read_to_string(&series_path).unwrap();
    assert_eq!(exported.lines().count(), 26);

    let model_path = dir.path().join("model.json");
    let model = model_file_from_fit(&run.outcome, run.ingest.data.total_time());
    write_model_json(&model_path, &model).unwrap();
    assert_eq!(read_model_json(&model_path).unwrap().params, p);

    let predicted = run_predict(&PredictConfig {
        model_path,
        times: PredictTimes::Grid {
            horizon: 40.0,
            steps: 8,
        },
        reliability: 0.5,
        int_eps: 1e-8,
        int_max_rounds: 20,
        export_series: None,
    })
    .unwrap();
    assert_eq!(predicted.series.len(), 8);
    assert!((predicted.series[3].time - 20.0).abs() < 1e-9);
    assert!((predicted.series[3].mvf - last.mvf).abs() < 1e-6 * last.mvf.max(1.0));
    assert!(predicted.series.windows(2).all(|w| w[0].mvf <= w[1].mvf));
    assert!(predicted.reliability.expected_residual <= run.reliability.expected_residual + 1e-9);
}

#[test]
fn simulated_exact_times_fit() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("exact.csv");

    let sim = run_simulate(&SimulateConfig {
        params: Params::new(50.0, 1.2, -(8.0f64).ln()),
        horizon: 15.0,
        intervals: 1,
        exact: true,
        seed: 11,
        out: csv.clone(),
    })
    .unwrap();

    let mut config = fit_config(csv);
    config.plot = false;
    let run = run_fit(&config).unwrap();

    assert_eq!(run.ingest.data.len(), sim.data.len());
    assert!(run.outcome.llf.is_finite());
    assert!(run.outcome.params.omega >= sim.failure_times.len() as f64 - 1e-6);
    assert!(run.outcome.params.shape > 0.0);
}

#[test]
fn missing_csv_is_an_input_error() {
    let err = run_fit(&fit_config(PathBuf::from("/nonexistent/faults.csv"))).unwrap_err();
    assert_eq!(err.exit_code(), 2);
}
