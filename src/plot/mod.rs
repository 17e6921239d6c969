//! PNG chart rendering.
//!
//! - `panels`: pure data preparation for every chart
//! - `scatter`: CPC vs. conversion rate, one color per platform
//! - `dashboard`: the 2x2 overview figure
//! - `fonts`: font registration and point-to-pixel scaling

use std::path::PathBuf;

use plotters::prelude::{DrawingAreaErrorKind, DrawingBackend, RGBColor};

use crate::domain::{ChartConfig, Dataset};
use crate::error::AppError;

pub mod dashboard;
pub mod fonts;
pub mod panels;
pub mod scatter;

pub use panels::*;

pub(crate) type DrawResult<DB> =
    Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

/// Categorical palette (matplotlib "tab10").
pub const PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

pub const ORANGE: RGBColor = RGBColor(255, 140, 0);

/// Pixel size of a figure given in inches.
pub fn figure_pixels(size_in: (f64, f64), dpi: u32) -> (u32, u32) {
    let px = |inches: f64| (inches * f64::from(dpi)).round().max(1.0) as u32;
    (px(size_in.0), px(size_in.1))
}

/// Axis range covering the finite `values` with 5% padding on each side.
///
/// With `include_zero` the range is widened to contain 0 and no padding is
/// added on that side, so bars start on the axis. Falls back to `0..1` when
/// there is nothing finite to show.
pub fn padded_range(values: impl IntoIterator<Item = f64>, include_zero: bool) -> (f64, f64) {
    let (mut lo, mut hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if !lo.is_finite() {
        return (0.0, 1.0);
    }
    if include_zero {
        lo = lo.min(0.0);
        hi = hi.max(0.0);
    }

    let span = hi - lo;
    let pad = if span > 0.0 { span * 0.05 } else { lo.abs().max(1.0) * 0.05 };

    let lo = if include_zero && lo == 0.0 { 0.0 } else { lo - pad };
    let hi = if include_zero && hi == 0.0 && span > 0.0 { 0.0 } else { hi + pad };
    (lo, hi)
}

/// Files written by [`render_charts`].
#[derive(Debug, Clone)]
pub struct ChartOutputs {
    pub scatter: PathBuf,
    pub dashboard: PathBuf,
}

/// Render the scatter chart and the dashboard into `config.out_dir`.
pub fn render_charts(dataset: &Dataset, config: &ChartConfig) -> Result<ChartOutputs, AppError> {
    if config.dashboard_dpi == 0 || config.scatter_dpi == 0 {
        return Err(AppError::config("DPI must be greater than zero"));
    }

    std::fs::create_dir_all(&config.out_dir).map_err(|e| {
        AppError::render(format!(
            "Failed to create output directory '{}': {e}",
            config.out_dir.display()
        ))
    })?;

    let has_text = fonts::init_fonts(config.font.as_deref());

    let scatter_path = config.scatter_path();
    let series = cpc_conversion_series(dataset);
    log::debug!(
        "scatter: {} platforms, {} points",
        series.len(),
        series.iter().map(|s| s.points.len()).sum::<usize>()
    );
    scatter::render_scatter(
        &scatter_path,
        &series,
        config.scatter_dpi,
        fonts::Typography::new(has_text, config.scatter_dpi),
    )?;
    log::info!("wrote {}", scatter_path.display());

    let dashboard_path = config.dashboard_path();
    let data = DashboardData::from_dataset(dataset);
    dashboard::render_dashboard(
        &dashboard_path,
        &data,
        config.dashboard_dpi,
        fonts::Typography::new(has_text, config.dashboard_dpi),
    )?;
    log::info!("wrote {}", dashboard_path.display());

    Ok(ChartOutputs {
        scatter: scatter_path,
        dashboard: dashboard_path,
    })
}
