//! Error types.
//!
//! - `ModelError` is raised by the numerical core (kernel, inverter, EM step, MTTF).
//! - `AppError` is what the binary reports: a message plus a process exit code.
//!
//! Exit codes:
//! - 2: input / configuration / IO problems
//! - 3: no usable data
//! - 4: numerical failure

use thiserror::Error;

/// Failures of the numerical core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("parameter vector must have exactly 3 entries (omega, shape, scale), got {got}")]
    ParamArity { got: usize },

    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    #[error("fault dataset is empty")]
    EmptyData,

    #[error("record {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },

    #[error("record {index}: exact failure time at t <= 0")]
    ExactAtOrigin { index: usize },

    /// `exp(-y_prev) - exp(-y_curr)` was not positive for a record carrying faults.
    #[error("record {index}: interval probability mass {diff:e} is not positive (parameters diverging?)")]
    Cancellation { index: usize, diff: f64 },

    #[error("quantile target {target} is outside (0, 1)")]
    QuantileTarget { target: f64 },

    #[error("could not bracket quantile {target} (upper bound overflowed)")]
    QuantileBracket { target: f64 },

    #[error("reliability target {r} is outside (0, 1)")]
    InvalidReliability { r: f64 },
}

impl ModelError {
    /// Whether the error points at the input data rather than the numerics.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            ModelError::EmptyData | ModelError::InvalidRecord { .. } | ModelError::ExactAtOrigin { .. }
        )
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<ModelError> for AppError {
    fn from(err: ModelError) -> Self {
        let code = if err.is_data_error() { 3 } else { 4 };
        AppError::new(code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_errors_map_to_exit_codes() {
        let data: AppError = ModelError::EmptyData.into();
        assert_eq!(data.exit_code(), 3);

        let numeric: AppError = ModelError::Cancellation { index: 4, diff: -1e-17 }.into();
        assert_eq!(numeric.exit_code(), 4);
        assert!(numeric.to_string().contains("record 4"));
    }
}
