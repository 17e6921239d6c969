//! Input/output helpers.
//!
//! - CSV ingest of the campaign dataset (`ingest`)
//! - JSON export of the computed report (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
