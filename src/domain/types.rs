//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON/CSV
//! - reloaded later for prediction

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Parameters of the log-extreme-value-minimum growth model.
///
/// - `omega`: expected total number of faults (> 0)
/// - `shape`: tail shape of the law (> 0)
/// - `scale`: location on the log-time axis (any real)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Params {
    pub omega: f64,
    pub shape: f64,
    pub scale: f64,
}

impl Params {
    pub fn new(omega: f64, shape: f64, scale: f64) -> Self {
        Self { omega, shape, scale }
    }

    /// Check the documented domains (`omega > 0`, `shape > 0`, all finite).
    pub fn validate(&self) -> Result<(), ModelError> {
        if !(self.omega.is_finite() && self.shape.is_finite() && self.scale.is_finite()) {
            return Err(ModelError::InvalidParams(format!(
                "non-finite value in {self}"
            )));
        }
        if self.omega <= 0.0 {
            return Err(ModelError::InvalidParams(format!("omega must be > 0, got {}", self.omega)));
        }
        if self.shape <= 0.0 {
            return Err(ModelError::InvalidParams(format!("shape must be > 0, got {}", self.shape)));
        }
        Ok(())
    }

    /// Elementwise `self - other`.
    pub fn delta(&self, other: &Params) -> Params {
        Params {
            omega: self.omega - other.omega,
            shape: self.shape - other.shape,
            scale: self.scale - other.scale,
        }
    }

    /// Largest `|delta_i| / |self_i|` over the three entries.
    ///
    /// Entries that are exactly zero fall back to the absolute change.
    pub fn max_rel_change(&self, delta: &Params) -> f64 {
        let rel = |d: f64, v: f64| if v == 0.0 { d.abs() } else { (d / v).abs() };
        rel(delta.omega, self.omega)
            .max(rel(delta.shape, self.shape))
            .max(rel(delta.scale, self.scale))
    }
}

/// Slice order is `[omega, shape, scale]`.
impl TryFrom<&[f64]> for Params {
    type Error = ModelError;

    fn try_from(values: &[f64]) -> Result<Self, Self::Error> {
        match *values {
            [omega, shape, scale] => Ok(Params { omega, shape, scale }),
            _ => Err(ModelError::ParamArity { got: values.len() }),
        }
    }
}

impl std::fmt::Display for Params {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "omega={:.6} shape={:.6} scale={:.6}",
            self.omega, self.shape, self.scale
        )
    }
}

/// Whether a record's end instant is itself an observed failure time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Boundary {
    /// The end instant only closes a counting interval.
    #[default]
    CountOnly,
    /// A failure was observed exactly at the end instant.
    Exact,
}

/// One observation: faults counted over `span` time units since the previous record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaultRecord {
    /// Time elapsed since the previous record (0 = same instant).
    pub span: f64,
    /// Faults observed in the span (grouped/fractional counts allowed).
    pub count: f64,
    pub boundary: Boundary,
}

impl FaultRecord {
    pub fn count_only(span: f64, count: f64) -> Self {
        Self {
            span,
            count,
            boundary: Boundary::CountOnly,
        }
    }

    pub fn exact(span: f64) -> Self {
        Self {
            span,
            count: 0.0,
            boundary: Boundary::Exact,
        }
    }
}

/// A validated, non-empty fault dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct FaultData {
    records: Vec<FaultRecord>,
}

impl FaultData {
    pub fn new(records: Vec<FaultRecord>) -> Result<Self, ModelError> {
        if records.is_empty() {
            return Err(ModelError::EmptyData);
        }
        for (index, r) in records.iter().enumerate() {
            if !(r.span.is_finite() && r.span >= 0.0) {
                return Err(ModelError::InvalidRecord {
                    index,
                    reason: format!("time span must be finite and >= 0, got {}", r.span),
                });
            }
            if !(r.count.is_finite() && r.count >= 0.0) {
                return Err(ModelError::InvalidRecord {
                    index,
                    reason: format!("fault count must be finite and >= 0, got {}", r.count),
                });
            }
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[FaultRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn spans(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.span).collect()
    }

    pub fn total_time(&self) -> f64 {
        self.records.iter().map(|r| r.span).sum()
    }

    /// Grouped counts plus one per exact failure time.
    pub fn total_faults(&self) -> f64 {
        self.records
            .iter()
            .map(|r| r.count + if r.boundary == Boundary::Exact { 1.0 } else { 0.0 })
            .sum()
    }

    /// Cumulative `(time, faults)` at the end of each record.
    pub fn cumulative(&self) -> Vec<(f64, f64)> {
        let mut t = 0.0;
        let mut n = 0.0;
        self.records
            .iter()
            .map(|r| {
                t += r.span;
                n += r.count;
                if r.boundary == Boundary::Exact {
                    n += 1.0;
                }
                (t, n)
            })
            .collect()
    }
}

/// Output of one EM step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmUpdate {
    /// Parameters after the M-step.
    pub params: Params,
    /// `params - previous params`, elementwise.
    pub delta: Params,
    /// Log-likelihood under the parameters the step was called with.
    pub llf: f64,
    /// Expected total number of faults (observed plus expected residual).
    pub total: f64,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable console lines.
    #[default]
    Human,
    /// One JSON object per line.
    Json,
}

/// A `srgm fit` run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct FitConfig {
    pub csv_path: PathBuf,
    /// Initial parameters; `None` derives them from the data.
    pub init: Option<Params>,
    pub max_iter: usize,
    pub rtol: f64,

    /// Reliability target for the MTTF estimate.
    pub reliability: f64,
    pub int_eps: f64,
    pub int_max_rounds: usize,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_series: Option<PathBuf>,
    pub export_model: Option<PathBuf>,
}

/// Where `srgm predict` takes its evaluation times from.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictTimes {
    /// Spans read from a fault CSV.
    Csv(PathBuf),
    /// `steps` equal spans covering `[0, horizon]`.
    Grid { horizon: f64, steps: usize },
}

/// A `srgm predict` run's configuration.
#[derive(Debug, Clone)]
pub struct PredictConfig {
    pub model_path: PathBuf,
    pub times: PredictTimes,
    pub reliability: f64,
    pub int_eps: f64,
    pub int_max_rounds: usize,
    pub export_series: Option<PathBuf>,
}

/// A `srgm simulate` run's configuration.
#[derive(Debug, Clone)]
pub struct SimulateConfig {
    pub params: Params,
    pub horizon: f64,
    pub intervals: usize,
    /// Emit one exact record per failure instead of grouped counts.
    pub exact: bool,
    pub seed: u64,
    pub out: PathBuf,
}

/// A saved model file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelFile {
    pub tool: String,
    pub family: String,
    pub fitted_at: chrono::DateTime<chrono::Utc>,
    pub params: Params,
    pub llf: f64,
    pub aic: f64,
    pub total: f64,
    pub iterations: usize,
    pub converged: bool,
    /// End of the observation window the model was fitted on.
    pub horizon: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_from_slice_requires_three_entries() {
        let p = Params::try_from(&[10.0, 1.0, 0.0][..]).unwrap();
        assert_eq!(p, Params::new(10.0, 1.0, 0.0));

        for bad in [&[][..], &[1.0][..], &[1.0, 2.0][..], &[1.0, 2.0, 3.0, 4.0][..]] {
            let err = Params::try_from(bad).unwrap_err();
            assert_eq!(err, ModelError::ParamArity { got: bad.len() });
        }
    }

    #[test]
    fn params_validate_domains() {
        assert!(Params::new(10.0, 1.0, -3.0).validate().is_ok());
        assert!(Params::new(0.0, 1.0, 0.0).validate().is_err());
        assert!(Params::new(1.0, -1.0, 0.0).validate().is_err());
        assert!(Params::new(1.0, 1.0, f64::NAN).validate().is_err());
    }

    #[test]
    fn params_delta_and_relative_change() {
        let old = Params::new(10.0, 2.0, 0.0);
        let new = Params::new(11.0, 2.0, 0.5);
        let d = new.delta(&old);
        assert_eq!(d, Params::new(1.0, 0.0, 0.5));
        // scale moved by its own size; omega only by 1/11.
        assert!((new.max_rel_change(&d) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn fault_data_rejects_bad_records() {
        assert_eq!(FaultData::new(vec![]).unwrap_err(), ModelError::EmptyData);

        let err = FaultData::new(vec![
            FaultRecord::count_only(1.0, 2.0),
            FaultRecord::count_only(-1.0, 0.0),
        ])
        .unwrap_err();
        assert!(matches!(err, ModelError::InvalidRecord { index: 1, .. }));

        let err = FaultData::new(vec![FaultRecord::count_only(1.0, f64::NAN)]).unwrap_err();
        assert!(matches!(err, ModelError::InvalidRecord { index: 0, .. }));
    }

    #[test]
    fn fault_data_totals_and_cumulative() {
        let data = FaultData::new(vec![
            FaultRecord::count_only(1.0, 2.0),
            FaultRecord::exact(0.5),
            FaultRecord::count_only(0.0, 1.5),
        ])
        .unwrap();

        assert_eq!(data.len(), 3);
        assert!((data.total_time() - 1.5).abs() < 1e-12);
        assert!((data.total_faults() - 4.5).abs() < 1e-12);
        assert_eq!(data.cumulative(), vec![(1.0, 2.0), (1.5, 3.0), (1.5, 4.5)]);
    }
}
