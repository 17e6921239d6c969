//! Chart data preparation.
//!
//! Every series drawn by `scatter` and `dashboard` is computed here, outside
//! the render calls. This keeps drawing code focused on layout and lets the
//! data be tested without producing images.

use serde::Serialize;

use crate::domain::{CategoryColumn, Dataset, NumericColumn};
use crate::math::{BoxStats, LinearFit, Z_95, fit_linear, scale_linear};
use crate::report::{GroupOrder, group_by, group_mean};

/// Marker area range (pt²) for the budget-sized scatter markers.
pub const MARKER_AREA: (f64, f64) = (20.0, 200.0);

/// Number of x samples for the regression line and band.
const TREND_SAMPLES: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    /// Marker area in pt².
    pub area: f64,
}

/// Points of one platform in the CPC vs. conversion-rate chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSeries {
    pub platform: String,
    pub points: Vec<ScatterPoint>,
}

/// CPC (x) vs. conversion rate (y), one series per platform in first-seen
/// order, marker area scaled from the daily budget over the whole dataset.
pub fn cpc_conversion_series(dataset: &Dataset) -> Vec<ScatterSeries> {
    let areas = scale_linear(&dataset.column(NumericColumn::DailyBudget), MARKER_AREA);

    let mut series: Vec<ScatterSeries> = Vec::new();
    for (record, area) in dataset.records.iter().zip(areas) {
        let Some(platform) = record.category(CategoryColumn::Platform) else { continue };
        let (Some(x), Some(y)) = (record.cpc, record.conversion_rate) else { continue };

        let idx = match series.iter().position(|s| s.platform == platform) {
            Some(idx) => idx,
            None => {
                series.push(ScatterSeries {
                    platform: platform.to_string(),
                    points: Vec::new(),
                });
                series.len() - 1
            }
        };
        series[idx].points.push(ScatterPoint { x, y, area });
    }
    series
}

/// One sample of the fitted trend with its confidence interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendSample {
    pub x: f64,
    pub y: f64,
    pub lo: f64,
    pub hi: f64,
}

/// Daily budget (x) vs. revenue (y) with an OLS trend.
#[derive(Debug, Clone, Serialize)]
pub struct RegressionPanel {
    pub points: Vec<(f64, f64)>,
    /// Empty when the fit is undefined (fewer than 3 points or constant x).
    pub trend: Vec<TrendSample>,
    #[serde(skip)]
    pub fit: Option<LinearFit>,
}

impl RegressionPanel {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let points: Vec<(f64, f64)> = dataset
            .records
            .iter()
            .filter_map(|r| Some((r.daily_budget?, r.revenue?)))
            .collect();

        let fit = fit_linear(&points);
        let trend = match &fit {
            Some(fit) => {
                log::debug!(
                    "budget vs revenue trend over {} points: revenue = {:.2} + {:.4} * budget",
                    fit.n,
                    fit.intercept,
                    fit.slope
                );
                let x0 = points.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
                let x1 = points.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
                (0..TREND_SAMPLES)
                    .map(|i| {
                        let x = x0 + (x1 - x0) * i as f64 / (TREND_SAMPLES - 1) as f64;
                        let (lo, hi) = fit.band(x, Z_95);
                        TrendSample {
                            x,
                            y: fit.predict(x),
                            lo,
                            hi,
                        }
                    })
                    .collect()
            }
            None => Vec::new(),
        };

        Self { points, trend, fit }
    }
}

/// Data behind the four dashboard panels.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardData {
    /// Mean ROAS per platform (first-seen order).
    pub roas_by_platform: Vec<(String, f64)>,
    pub budget_vs_revenue: RegressionPanel,
    /// Engagement-rate distribution per audience (first-seen order).
    pub engagement_by_audience: Vec<(String, BoxStats)>,
    /// Mean CPA per campaign type (first-seen order).
    pub cpa_by_campaign_type: Vec<(String, f64)>,
}

impl DashboardData {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let audiences = group_by(dataset, CategoryColumn::Audience, GroupOrder::FirstSeen);
        let engagement_by_audience = audiences
            .iter()
            .filter_map(|g| {
                let stats = BoxStats::from_values(g.values(NumericColumn::EngagementRate))?;
                Some((g.key.clone(), stats))
            })
            .collect();

        Self {
            roas_by_platform: group_mean(
                dataset,
                CategoryColumn::Platform,
                NumericColumn::Roas,
                GroupOrder::FirstSeen,
            ),
            budget_vs_revenue: RegressionPanel::from_dataset(dataset),
            engagement_by_audience,
            cpa_by_campaign_type: group_mean(
                dataset,
                CategoryColumn::CampaignType,
                NumericColumn::Cpa,
                GroupOrder::FirstSeen,
            ),
        }
    }
}
