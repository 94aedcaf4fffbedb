//! Reporting: per-record series, reliability summary, and formatted terminal output.

pub mod format;
pub mod series;

pub use format::*;
pub use series::*;
