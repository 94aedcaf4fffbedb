//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the model parameter vector (`Params`)
//! - observed fault records and the validated dataset (`FaultRecord`, `FaultData`)
//! - EM step output (`EmUpdate`)
//! - run configuration and the saved model file (`FitConfig`, `ModelFile`, etc.)

pub mod types;

pub use types::*;
