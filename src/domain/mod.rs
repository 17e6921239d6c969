//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the campaign schema (`CategoryColumn`, `NumericColumn`)
//! - loaded rows and the table (`CampaignRecord`, `Dataset`)
//! - run configuration (`ReportConfig`, `ChartConfig`, `SampleConfig`)

pub mod types;

pub use types::*;
