//! `campaign-insights` library crate.
//!
//! The binary (`insights`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - reports and chart data can be reused from other tools
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
