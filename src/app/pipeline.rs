//! Shared report pipeline used by the `run`, `report` and `charts` commands.
//!
//! load -> reports -> charts -> export
//!
//! Each computation has one implementation here; the commands only differ in
//! which stages are enabled through `ReportConfig`.

use std::path::Path;

use crate::domain::{ChartConfig, Dataset, ReportConfig};
use crate::error::{AppError, ErrorKind};
use crate::io::{load_dataset, resolve_data_path, write_report_json};
use crate::plot::{ChartOutputs, render_charts};
use crate::report::{Report, build_report, format_report};

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub dataset: Dataset,
    pub report: Report,
    pub charts: Option<ChartOutputs>,
}

/// Load the dataset, printing where it is looked for and how many rows were read.
pub fn load_with_status(path: &Path) -> Result<Dataset, AppError> {
    let resolved = resolve_data_path(path);
    println!("Looking for data file at: {}", resolved.display());

    let dataset = load_dataset(&resolved)?;
    println!("Data file loaded: {} records", dataset.len());
    Ok(dataset)
}

/// Execute the pipeline stages enabled in `config`.
pub fn run_report(config: &ReportConfig) -> Result<RunOutput, AppError> {
    let dataset = load_with_status(&config.data_path)?;
    if dataset.is_empty() {
        log::warn!("{} has a header but no rows", dataset.source.display());
    }

    let report = build_report(&dataset);
    if config.print_reports {
        println!();
        print!("{}", format_report(&report));
    }

    let charts = match &config.charts {
        Some(chart_config) => Some(render_with_status(&dataset, chart_config)?),
        None => None,
    };

    if let Some(path) = &config.export_json {
        write_report_json(path, &dataset, &report)?;
        println!("Report exported to: {}", path.display());
    }

    Ok(RunOutput { dataset, report, charts })
}

/// Charts-only pipeline. A missing data file is reported and rendering is
/// skipped; every other failure is returned.
pub fn run_charts(
    data_path: &Path,
    config: &ChartConfig,
) -> Result<Option<ChartOutputs>, AppError> {
    let dataset = match load_with_status(data_path) {
        Ok(dataset) => dataset,
        Err(e) if e.kind() == ErrorKind::FileNotFound => {
            println!("{e}");
            println!("Skipping chart rendering.");
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    render_with_status(&dataset, config).map(Some)
}

fn render_with_status(dataset: &Dataset, config: &ChartConfig) -> Result<ChartOutputs, AppError> {
    let outputs = render_charts(dataset, config)?;
    println!("Correlation chart saved as: {}", outputs.scatter.display());
    println!("Dashboard generated successfully: {}", outputs.dashboard.display());
    Ok(outputs)
}
