//! Numerical primitives: log-gamma, quantile search, and trapezoidal quadrature.

pub mod quad;
pub mod root;
pub mod special;

pub use quad::*;
pub use root::*;
pub use special::*;
