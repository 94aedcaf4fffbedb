//! Model fitting.
//!
//! Responsibilities:
//!
//! - one EM update from a dataset and a parameter estimate (`em`)
//! - the outer loop that iterates EM to convergence (`driver`)

pub mod driver;
pub mod em;

pub use driver::*;
pub use em::*;
