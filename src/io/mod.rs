//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - series and dataset exports (CSV) (`export`)
//! - model JSON read/write (`model`)

pub mod export;
pub mod ingest;
pub mod model;

pub use export::*;
pub use ingest::*;
pub use model::*;
