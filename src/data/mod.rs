//! Data sources beyond CSV ingest.

pub mod simulate;

pub use simulate::*;
