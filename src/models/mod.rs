//! Log-extreme-value-minimum growth model: kernel, series, MTTF, and the
//! hazard-transform triples used by the EM step.
//!
//! Models are implemented as small, pure functions so that fitting code can
//! stay generic.

pub mod lxvmin;
pub mod transform;

pub use lxvmin::*;
pub use transform::*;
