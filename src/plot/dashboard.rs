//! 2x2 marketing dashboard.
//!
//! Panels (row-major):
//! 1. mean ROAS per platform, with a break-even line at 1.0
//! 2. daily budget vs. revenue, with OLS trend and 95% band
//! 3. engagement rate distribution per audience (box plot)
//! 4. mean CPA per campaign type

use std::path::Path;

use plotters::coord::Shift;
use plotters::element::Polygon;
use plotters::prelude::*;

use crate::error::AppError;
use crate::math::BoxStats;
use crate::plot::fonts::Typography;
use crate::plot::panels::{DashboardData, RegressionPanel};
use crate::plot::{DrawResult, ORANGE, PALETTE, figure_pixels, padded_range};

/// Figure size in inches.
pub const DASHBOARD_SIZE_IN: (f64, f64) = (16.0, 12.0);

/// ROAS at which revenue equals spend.
const BREAK_EVEN_ROAS: f64 = 1.0;

/// Render the dashboard to a PNG at `path`.
pub fn render_dashboard(
    path: &Path,
    data: &DashboardData,
    dpi: u32,
    typo: Typography,
) -> Result<(), AppError> {
    let size = figure_pixels(DASHBOARD_SIZE_IN, dpi);
    let root = BitMapBackend::new(path, size).into_drawing_area();

    draw_dashboard(&root, data, typo)
        .map_err(|e| AppError::render(format!("Failed to draw dashboard: {e}")))?;
    root.present()
        .map_err(|e| AppError::render(format!("Failed to write '{}': {e}", path.display())))?;
    Ok(())
}

fn draw_dashboard<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    data: &DashboardData,
    typo: Typography,
) -> DrawResult<DB> {
    root.fill(&WHITE)?;

    let body = match typo.bold(22.0) {
        Some(style) => root.titled("Marketing Performance Insights Dashboard", style)?,
        None => root.margin(typo.px_u32(30.0), 0, 0, 0),
    };

    let panels = body.split_evenly((2, 2));

    draw_bar_panel(
        &panels[0],
        BarPanel {
            title: "Return on Ad Spend (ROAS) by Platform",
            x_desc: "Platform",
            y_desc: "Mean ROAS",
            bars: &data.roas_by_platform,
            reference: Some(BREAK_EVEN_ROAS),
        },
        typo,
    )?;
    draw_regression_panel(&panels[1], &data.budget_vs_revenue, typo)?;
    draw_box_panel(&panels[2], &data.engagement_by_audience, typo)?;
    draw_bar_panel(
        &panels[3],
        BarPanel {
            title: "Efficiency: Cost per Acquisition (CPA) by Objective",
            x_desc: "Campaign Type",
            y_desc: "Mean CPA ($)",
            bars: &data.cpa_by_campaign_type,
            reference: None,
        },
        typo,
    )?;

    Ok(())
}

struct BarPanel<'a> {
    title: &'a str,
    x_desc: &'a str,
    y_desc: &'a str,
    bars: &'a [(String, f64)],
    /// Dashed horizontal reference line.
    reference: Option<f64>,
}

fn draw_bar_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: BarPanel<'_>,
    typo: Typography,
) -> DrawResult<DB> {
    let n = panel.bars.len().max(1) as i32;
    let values = panel
        .bars
        .iter()
        .map(|b| b.1)
        .chain(panel.reference)
        .filter(|v| v.is_finite());
    let (y0, y1) = padded_range(values, true);

    let mut builder = ChartBuilder::on(area);
    builder
        .margin(typo.px_u32(10.0))
        .x_label_area_size(typo.px_u32(30.0))
        .y_label_area_size(typo.px_u32(44.0));
    if let Some(style) = typo.text(14.0) {
        builder.caption(panel.title, style);
    }
    let mut chart = builder.build_cartesian_2d((0..n).into_segmented(), y0..y1)?;

    if let (Some(labels), Some(desc)) = (typo.text(9.0), typo.text(11.0)) {
        let names: Vec<&str> = panel.bars.iter().map(|b| b.0.as_str()).collect();
        let fmt_category = |v: &SegmentValue<i32>| match v {
            SegmentValue::CenterOf(i) => names
                .get(*i as usize)
                .map(|s| s.to_string())
                .unwrap_or_default(),
            _ => String::new(),
        };
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(names.len().max(1))
            .x_label_formatter(&fmt_category)
            .x_desc(panel.x_desc)
            .y_desc(panel.y_desc)
            .label_style(labels)
            .axis_desc_style(desc)
            .light_line_style(BLACK.mix(0.05))
            .draw()?;
    }

    let gap = typo.px_u32(10.0);
    chart.draw_series(
        panel
            .bars
            .iter()
            .enumerate()
            .filter(|(_, (_, v))| v.is_finite())
            .map(|(i, (_, v))| {
                let i = i as i32;
                let color = PALETTE[i as usize % PALETTE.len()];
                let mut bar = Rectangle::new(
                    [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), *v)],
                    color.mix(0.85).filled(),
                );
                bar.set_margin(0, 0, gap, gap);
                bar
            }),
    )?;

    if let Some(level) = panel.reference {
        let style = RED.mix(0.7).stroke_width(typo.px_u32(1.5));
        let anno = chart.draw_series(DashedLineSeries::new(
            [(SegmentValue::Exact(0), level), (SegmentValue::Exact(n), level)],
            typo.px_u32(6.0),
            typo.px_u32(4.0),
            style,
        ))?;

        if let Some(font) = typo.text(9.0) {
            let len = typo.px_u32(14.0) as i32;
            anno.label(format!("Break-even ({level:.1})"))
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + len, y)], style));
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(WHITE.mix(0.85))
                .border_style(BLACK.mix(0.3))
                .label_font(font)
                .draw()?;
        }
    }

    Ok(())
}

fn draw_regression_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &RegressionPanel,
    typo: Typography,
) -> DrawResult<DB> {
    let (x0, x1) = padded_range(panel.points.iter().map(|p| p.0), false);
    let ys = panel
        .points
        .iter()
        .map(|p| p.1)
        .chain(panel.trend.iter().flat_map(|t| [t.lo, t.hi]));
    let (y0, y1) = padded_range(ys, false);

    let mut builder = ChartBuilder::on(area);
    builder
        .margin(typo.px_u32(10.0))
        .x_label_area_size(typo.px_u32(30.0))
        .y_label_area_size(typo.px_u32(52.0));
    if let Some(style) = typo.text(14.0) {
        builder.caption("Scalability: Daily Budget vs. Revenue", style);
    }
    let mut chart = builder.build_cartesian_2d(x0..x1, y0..y1)?;

    if let (Some(labels), Some(desc)) = (typo.text(9.0), typo.text(11.0)) {
        chart
            .configure_mesh()
            .x_desc("Daily Budget ($)")
            .y_desc("Revenue Generated ($)")
            .label_style(labels)
            .axis_desc_style(desc)
            .light_line_style(BLACK.mix(0.05))
            .draw()?;
    }

    if !panel.trend.is_empty() {
        let outline: Vec<(f64, f64)> = panel
            .trend
            .iter()
            .map(|t| (t.x, t.hi))
            .chain(panel.trend.iter().rev().map(|t| (t.x, t.lo)))
            .collect();
        chart.draw_series(std::iter::once(Polygon::new(outline, ORANGE.mix(0.2).filled())))?;
    }

    let radius = typo.px_u32(2.5);
    chart.draw_series(
        panel
            .points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), radius, PALETTE[0].mix(0.6).filled())),
    )?;

    if !panel.trend.is_empty() {
        chart.draw_series(LineSeries::new(
            panel.trend.iter().map(|t| (t.x, t.y)),
            ORANGE.stroke_width(typo.px_u32(1.5)),
        ))?;
    }

    Ok(())
}

fn draw_box_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    boxes: &[(String, BoxStats)],
    typo: Typography,
) -> DrawResult<DB> {
    let n = boxes.len().max(1) as i32;
    let ys = boxes.iter().flat_map(|(_, s)| {
        [s.lower_whisker, s.upper_whisker]
            .into_iter()
            .chain(s.outliers.iter().copied())
    });
    let (y0, y1) = padded_range(ys, false);

    let mut builder = ChartBuilder::on(area);
    builder
        .margin(typo.px_u32(10.0))
        .x_label_area_size(typo.px_u32(30.0))
        .y_label_area_size(typo.px_u32(44.0));
    if let Some(style) = typo.text(14.0) {
        builder.caption("Ad Quality: Engagement by Audience", style);
    }
    let mut chart = builder.build_cartesian_2d((0..n).into_segmented(), y0..y1)?;

    if let (Some(labels), Some(desc)) = (typo.text(9.0), typo.text(11.0)) {
        let names: Vec<&str> = boxes.iter().map(|b| b.0.as_str()).collect();
        let fmt_category = |v: &SegmentValue<i32>| match v {
            SegmentValue::CenterOf(i) => names
                .get(*i as usize)
                .map(|s| s.to_string())
                .unwrap_or_default(),
            _ => String::new(),
        };
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(names.len().max(1))
            .x_label_formatter(&fmt_category)
            .x_desc("Target Audience")
            .y_desc("Engagement Rate (%)")
            .label_style(labels)
            .axis_desc_style(desc)
            .light_line_style(BLACK.mix(0.05))
            .draw()?;
    }

    // Box geometry in pixels: each category gets an equal share of the plot width.
    let segment_px = chart.plotting_area().dim_in_pixel().0 as i32 / n;
    let gap = (segment_px / 5).max(1);
    let half_box = (segment_px / 2 - gap).max(1);
    let half_cap = (half_box / 2).max(1);
    let line = BLACK.stroke_width(typo.px_u32(1.0));

    for (i, (_, s)) in boxes.iter().enumerate() {
        let i = i as i32;
        let color = PALETTE[i as usize % PALETTE.len()];
        let center = SegmentValue::CenterOf(i);

        let mut body = Rectangle::new(
            [(SegmentValue::Exact(i), s.q1), (SegmentValue::Exact(i + 1), s.q3)],
            color.mix(0.75).filled(),
        );
        body.set_margin(0, 0, gap as u32, gap as u32);
        let mut outline = Rectangle::new(
            [(SegmentValue::Exact(i), s.q1), (SegmentValue::Exact(i + 1), s.q3)],
            line,
        );
        outline.set_margin(0, 0, gap as u32, gap as u32);
        chart.draw_series([body, outline])?;

        chart.draw_series([
            PathElement::new(vec![(center.clone(), s.q3), (center.clone(), s.upper_whisker)], line),
            PathElement::new(vec![(center.clone(), s.q1), (center.clone(), s.lower_whisker)], line),
        ])?;

        let tick = |y: f64, half: i32| {
            EmptyElement::at((center.clone(), y))
                + PathElement::new(vec![(-half, 0), (half, 0)], line)
        };
        chart.draw_series([
            tick(s.median, half_box),
            tick(s.upper_whisker, half_cap),
            tick(s.lower_whisker, half_cap),
        ])?;

        let radius = typo.px_u32(2.0);
        chart.draw_series(
            s.outliers
                .iter()
                .map(|&y| Circle::new((center.clone(), y), radius, line)),
        )?;
    }

    Ok(())
}
