//! CPC vs. conversion-rate scatter chart.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::AppError;
use crate::plot::fonts::Typography;
use crate::plot::panels::ScatterSeries;
use crate::plot::{DrawResult, PALETTE, figure_pixels, padded_range};

/// Figure size in inches.
pub const SCATTER_SIZE_IN: (f64, f64) = (10.0, 6.0);

/// Render the scatter chart to a PNG at `path`.
pub fn render_scatter(
    path: &Path,
    series: &[ScatterSeries],
    dpi: u32,
    typo: Typography,
) -> Result<(), AppError> {
    let size = figure_pixels(SCATTER_SIZE_IN, dpi);
    let root = BitMapBackend::new(path, size).into_drawing_area();

    draw_scatter(&root, series, typo)
        .map_err(|e| AppError::render(format!("Failed to draw scatter chart: {e}")))?;
    root.present()
        .map_err(|e| AppError::render(format!("Failed to write '{}': {e}", path.display())))?;
    Ok(())
}

fn draw_scatter<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    series: &[ScatterSeries],
    typo: Typography,
) -> DrawResult<DB> {
    root.fill(&WHITE)?;

    let (x0, x1) = padded_range(series.iter().flat_map(|s| s.points.iter().map(|p| p.x)), false);
    let (y0, y1) = padded_range(series.iter().flat_map(|s| s.points.iter().map(|p| p.y)), false);

    let mut builder = ChartBuilder::on(root);
    builder
        .margin(typo.px_u32(12.0))
        .x_label_area_size(typo.px_u32(36.0))
        .y_label_area_size(typo.px_u32(48.0));
    if let Some(style) = typo.text(14.0) {
        builder.caption("Cost per Click vs. Conversion Rate", style);
    }
    let mut chart = builder.build_cartesian_2d(x0..x1, y0..y1)?;

    if let (Some(labels), Some(desc)) = (typo.text(9.0), typo.text(11.0)) {
        chart
            .configure_mesh()
            .x_desc("Cost per Click (CPC)")
            .y_desc("Conversion Rate (%)")
            .label_style(labels)
            .axis_desc_style(desc)
            .light_line_style(BLACK.mix(0.05))
            .draw()?;
    }

    for (idx, s) in series.iter().enumerate() {
        let color = PALETTE[idx % PALETTE.len()];
        let anno = chart.draw_series(s.points.iter().map(|p| {
            // Marker area is in pt²; the circle radius is half the side of that square.
            let radius = typo.px_u32(p.area.sqrt() / 2.0);
            Circle::new((p.x, p.y), radius, color.mix(0.7).filled())
        }))?;
        if typo.has_text() {
            let legend_radius = typo.px_u32(4.0);
            anno.label(s.platform.as_str())
                .legend(move |(x, y)| Circle::new((x, y), legend_radius, color.filled()));
        }
    }

    if let Some(style) = typo.text(9.0) {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.85))
            .border_style(BLACK.mix(0.3))
            .label_font(style)
            .draw()?;
    }

    Ok(())
}
