//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized (important for snapshot tests)

use crate::domain::{ModelFile, Params};
use crate::fit::FitOutcome;
use crate::io::ingest::IngestedData;
use crate::report::{ReliabilitySummary, SeriesRow};

/// Format the full fit summary (dataset stats + EM diagnostics + reliability).
pub fn format_fit_summary(
    ingest: &IngestedData,
    outcome: &FitOutcome,
    reliability: &ReliabilitySummary,
) -> String {
    let mut out = String::new();

    out.push_str("=== srgm - log-extreme-value-min growth model (EM) ===\n");
    out.push_str(&format!(
        "Data: records={} | time={:.4} | faults={}\n",
        ingest.data.len(),
        ingest.data.total_time(),
        fmt_count(ingest.data.total_faults()),
    ));

    out.push_str("\nEstimation:\n");
    out.push_str(&format!(
        "- iterations: {} ({})\n",
        outcome.iterations,
        if outcome.converged { "converged" } else { "NOT converged" }
    ));
    out.push_str(&format!("- llf: {:.6}\n", outcome.llf));
    out.push_str(&format!("- AIC: {:.6}\n", outcome.aic));
    out.push_str(&format_params(&outcome.params));

    out.push('\n');
    out.push_str(&format_reliability(reliability));
    out
}

/// Format a saved model header for `srgm predict`.
pub fn format_model_header(model: &ModelFile) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "=== srgm predict - {} fitted {} ===\n",
        model.family,
        model.fitted_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!(
        "Fit: llf={:.6} AIC={:.6} iterations={}{}\n",
        model.llf,
        model.aic,
        model.iterations,
        if model.converged { "" } else { " (not converged)" }
    ));
    out.push_str(&format_params(&model.params));
    out
}

fn format_params(params: &Params) -> String {
    format!(
        "- omega: {:.6}\n- shape: {:.6}\n- scale: {:.6}\n",
        params.omega, params.shape, params.scale
    )
}

/// Format the end-of-observation reliability block.
pub fn format_reliability(s: &ReliabilitySummary) -> String {
    let mut out = String::new();
    out.push_str(&format!("Reliability at t={:.4}:\n", s.time));
    out.push_str(&format!("- expected faults found: {:.4}\n", s.expected_found));
    out.push_str(&format!("- expected residual faults: {:.4}\n", s.expected_residual));
    out.push_str(&format!("- fault-free probability: {:.6}\n", s.fault_free));
    out.push_str(&format!("- failure intensity: {:.6}\n", s.intensity));
    out.push_str(&format!(
        "- MTTF (r={}): {:.6}{}\n",
        s.reliability_target,
        s.mttf.value,
        if s.mttf.converged {
            String::new()
        } else {
            format!(" (quadrature stopped after {} rounds)", s.mttf.rounds)
        }
    ));
    out
}

/// Format the fitted-series table.
pub fn format_series_table(rows: &[SeriesRow]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:>6} {:>12} {:>10} {:>10} {:>12} {:>12}\n",
            "#", "time", "observed", "cum_obs", "mvf", "intensity"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<6} {:-<12} {:-<10} {:-<10} {:-<12} {:-<12}\n",
            "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for r in rows {
        out.push_str(
            format!(
                "{:>6} {:>12.4} {:>10} {:>10} {:>12.4} {:>12.6}\n",
                r.index,
                r.time,
                r.observed.map(fmt_count).unwrap_or_else(|| "-".to_string()),
                r.cumulative_observed.map(fmt_count).unwrap_or_else(|| "-".to_string()),
                r.mvf,
                r.intensity,
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

fn fmt_count(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.3}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MttfEstimate;

    #[test]
    fn series_table_snapshot() {
        let rows = vec![
            SeriesRow {
                index: 1,
                span: 1.0,
                time: 1.0,
                observed: Some(2.0),
                cumulative_observed: Some(2.0),
                mvf: 1.5,
                intensity: 0.25,
            },
            SeriesRow {
                index: 2,
                span: 1.0,
                time: 2.0,
                observed: None,
                cumulative_observed: None,
                mvf: 2.25,
                intensity: 0.125,
            },
        ];
        let expected = concat!(
            "     #         time   observed    cum_obs          mvf    intensity\n",
            "------ ------------ ---------- ---------- ------------ ------------\n",
            "     1       1.0000          2          2       1.5000     0.250000\n",
            "     2       2.0000          -          -       2.2500     0.125000\n",
        );
        assert_eq!(format_series_table(&rows), expected);
    }

    #[test]
    fn reliability_block_flags_unconverged_quadrature() {
        let s = ReliabilitySummary {
            time: 8.0,
            expected_found: 30.0,
            expected_residual: 5.0,
            fault_free: (-5.0f64).exp(),
            intensity: 0.7,
            reliability_target: 0.5,
            mttf: MttfEstimate {
                value: 1.25,
                upper: 2.0,
                rounds: 20,
                converged: false,
            },
        };
        let txt = format_reliability(&s);
        assert!(txt.contains("- MTTF (r=0.5): 1.250000 (quadrature stopped after 20 rounds)"));
        assert!(txt.contains("- expected residual faults: 5.0000"));
    }

    #[test]
    fn counts_print_without_trailing_zeros() {
        assert_eq!(fmt_count(3.0), "3");
        assert_eq!(fmt_count(1.5), "1.500");
    }
}
