//! Read/write fitted model files (JSON).
//!
//! A model file is the portable result of `srgm fit`: the three parameters plus
//! the fit diagnostics and the observation horizon, enough to run `srgm predict`
//! later without the original data. The schema is `domain::ModelFile`.

use std::fs::File;
use std::path::Path;

use crate::domain::ModelFile;
use crate::error::AppError;
use crate::fit::FitOutcome;

pub const TOOL_NAME: &str = "srgm";
pub const FAMILY_NAME: &str = "lxvmin";

/// Assemble a model file from a finished fit.
pub fn model_file_from_fit(outcome: &FitOutcome, horizon: f64) -> ModelFile {
    ModelFile {
        tool: TOOL_NAME.to_string(),
        family: FAMILY_NAME.to_string(),
        fitted_at: chrono::Utc::now(),
        params: outcome.params,
        llf: outcome.llf,
        aic: outcome.aic,
        total: outcome.total,
        iterations: outcome.iterations,
        converged: outcome.converged,
        horizon,
    }
}

/// Write a model JSON file.
pub fn write_model_json(path: &Path, model: &ModelFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create model JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, model)
        .map_err(|e| AppError::new(2, format!("Failed to write model JSON: {e}")))?;
    Ok(())
}

/// Read a model JSON file.
pub fn read_model_json(path: &Path) -> Result<ModelFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open model JSON '{}': {e}", path.display())))?;
    let model: ModelFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid model JSON: {e}")))?;
    if model.family != FAMILY_NAME {
        return Err(AppError::new(
            2,
            format!("Model family `{}` is not supported (expected `{FAMILY_NAME}`).", model.family),
        ));
    }
    model
        .params
        .validate()
        .map_err(|e| AppError::new(2, format!("Invalid model parameters: {e}")))?;
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Params;

    fn outcome() -> FitOutcome {
        FitOutcome {
            params: Params::new(35.9, 0.88, -1.13),
            llf: -12.6,
            total: 35.9,
            aic: 31.2,
            iterations: 71,
            converged: true,
        }
    }

    #[test]
    fn model_json_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let model = model_file_from_fit(&outcome(), 8.0);

        write_model_json(&path, &model).unwrap();
        let loaded = read_model_json(&path).unwrap();
        assert_eq!(loaded.params, model.params);
        assert_eq!(loaded.iterations, 71);
        assert_eq!(loaded.horizon, 8.0);
        assert_eq!(loaded.fitted_at, model.fitted_at);
    }

    #[test]
    fn foreign_family_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let mut model = model_file_from_fit(&outcome(), 8.0);
        model.family = "goel-okumoto".to_string();
        write_model_json(&path, &model).unwrap();

        let err = read_model_json(&path).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
