//! Data sources other than user-supplied CSVs.
//!
//! - synthetic campaign datasets for demos and tests (`sample`)

pub mod sample;

pub use sample::*;
