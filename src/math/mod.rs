//! Mathematical utilities: descriptive statistics and least squares.

pub mod ols;
pub mod stats;

pub use ols::*;
pub use stats::*;
