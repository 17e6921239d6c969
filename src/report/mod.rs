//! Reporting: the aggregate views derived from a loaded `Dataset`.
//!
//! Each view is a pure function over `&Dataset`; none depends on another.
//! Formatting for the terminal lives in `format`.

use std::cmp::Ordering;

use serde::Serialize;

use crate::domain::{CategoryColumn, Dataset, NumericColumn};
use crate::math::{mean, pearson, sum};

pub mod format;
pub mod group;

pub use format::*;
pub use group::*;

/// One row of the per-platform summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformSummaryRow {
    pub platform: String,
    pub total_cost_sum: f64,
    pub revenue_sum: f64,
    pub roas_mean: f64,
}

/// Mean ROAS per (platform, audience). Cells without data hold 0.0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoasMatrix {
    pub platforms: Vec<String>,
    pub audiences: Vec<String>,
    /// `cells[platform][audience]`
    pub cells: Vec<Vec<f64>>,
}

impl RoasMatrix {
    pub fn get(&self, platform: &str, audience: &str) -> Option<f64> {
        let row = self.platforms.iter().position(|p| p == platform)?;
        let col = self.audiences.iter().position(|a| a == audience)?;
        Some(self.cells[row][col])
    }
}

/// Pairwise Pearson correlations between a fixed set of columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<NumericColumn>,
    /// `values[i][j]` is the correlation of `columns[i]` with `columns[j]`.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn compute(dataset: &Dataset, columns: &[NumericColumn]) -> Self {
        let data: Vec<Vec<Option<f64>>> = columns.iter().map(|c| dataset.column(*c)).collect();
        let k = columns.len();
        let mut values = vec![vec![f64::NAN; k]; k];

        for i in 0..k {
            for j in i..k {
                let r = pearson(&data[i], &data[j]);
                // A column with any variance correlates with itself exactly.
                let r = if i == j && r.is_finite() { 1.0 } else { r };
                values[i][j] = r;
                values[j][i] = r;
            }
        }

        Self {
            columns: columns.to_vec(),
            values,
        }
    }

    /// Correlations of every column against `target`, in column order.
    pub fn against(&self, target: NumericColumn) -> Option<Vec<(NumericColumn, f64)>> {
        let j = self.columns.iter().position(|c| *c == target)?;
        Some(
            self.columns
                .iter()
                .zip(&self.values)
                .map(|(c, row)| (*c, row[j]))
                .collect(),
        )
    }
}

/// One entry of the correlation-with-revenue ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueCorrelation {
    pub column: NumericColumn,
    pub coefficient: f64,
}

/// Mean CPA of one audience.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudienceCpa {
    pub audience: String,
    pub mean_cpa: f64,
}

/// Every console view computed from one dataset.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub records: usize,
    pub platform_summary: Vec<PlatformSummaryRow>,
    pub roas_matrix: RoasMatrix,
    pub correlations: CorrelationMatrix,
    pub revenue_correlations: Vec<RevenueCorrelation>,
    pub audience_cpa: Vec<AudienceCpa>,
}

/// Compute all views.
pub fn build_report(dataset: &Dataset) -> Report {
    let correlations = CorrelationMatrix::compute(dataset, &NumericColumn::CORRELATED);
    let revenue_correlations = rank_against_revenue(&correlations);

    Report {
        records: dataset.len(),
        platform_summary: platform_summary(dataset),
        roas_matrix: roas_matrix(dataset),
        correlations,
        revenue_correlations,
        audience_cpa: audience_cpa_ranking(dataset),
    }
}

/// Total cost, total revenue and mean ROAS per platform.
pub fn platform_summary(dataset: &Dataset) -> Vec<PlatformSummaryRow> {
    group_by(dataset, CategoryColumn::Platform, GroupOrder::Sorted)
        .into_iter()
        .map(|g| PlatformSummaryRow {
            total_cost_sum: sum(g.values(NumericColumn::TotalCost)),
            revenue_sum: sum(g.values(NumericColumn::Revenue)),
            roas_mean: mean(g.values(NumericColumn::Roas)),
            platform: g.key,
        })
        .collect()
}

/// Pivot mean ROAS by platform (rows) and audience (columns).
///
/// Combinations without any ROAS value are filled with 0.0, so a report
/// reader sees "no data" and "zero return" the same way.
pub fn roas_matrix(dataset: &Dataset) -> RoasMatrix {
    let platforms = distinct(dataset, CategoryColumn::Platform, GroupOrder::Sorted);
    let audiences = distinct(dataset, CategoryColumn::Audience, GroupOrder::Sorted);

    let cells = platforms
        .iter()
        .map(|platform| {
            audiences
                .iter()
                .map(|audience| {
                    let m = mean(
                        dataset
                            .records
                            .iter()
                            .filter(|r| {
                                r.platform.as_deref() == Some(platform.as_str())
                                    && r.audience.as_deref() == Some(audience.as_str())
                            })
                            .map(|r| r.roas),
                    );
                    if m.is_nan() { 0.0 } else { m }
                })
                .collect()
        })
        .collect();

    RoasMatrix {
        platforms,
        audiences,
        cells,
    }
}

/// Correlations against revenue, strongest positive first.
///
/// The sort is stable (ties keep column order) and NaN sorts last.
pub fn revenue_correlations(dataset: &Dataset) -> Vec<RevenueCorrelation> {
    rank_against_revenue(&CorrelationMatrix::compute(dataset, &NumericColumn::CORRELATED))
}

fn rank_against_revenue(matrix: &CorrelationMatrix) -> Vec<RevenueCorrelation> {
    let mut ranked: Vec<RevenueCorrelation> = matrix
        .against(NumericColumn::Revenue)
        .unwrap_or_default()
        .into_iter()
        .map(|(column, coefficient)| RevenueCorrelation { column, coefficient })
        .collect();
    ranked.sort_by(|a, b| cmp_nan_last(a.coefficient, b.coefficient, true));
    ranked
}

/// Audiences by mean CPA, cheapest first (stable; NaN last).
pub fn audience_cpa_ranking(dataset: &Dataset) -> Vec<AudienceCpa> {
    let means = group_mean(
        dataset,
        CategoryColumn::Audience,
        NumericColumn::Cpa,
        GroupOrder::Sorted,
    );
    let mut ranked: Vec<AudienceCpa> = means
        .into_iter()
        .map(|(audience, mean_cpa)| AudienceCpa { audience, mean_cpa })
        .collect();
    ranked.sort_by(|a, b| cmp_nan_last(a.mean_cpa, b.mean_cpa, false));
    ranked
}

/// Order two values ascending (or descending), with NaN after everything else.
fn cmp_nan_last(a: f64, b: f64, descending: bool) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            if descending { ord.reverse() } else { ord }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CampaignRecord;
    use chrono::NaiveDate;

    fn record(platform: &str, audience: &str, roas: f64, cpa: f64) -> CampaignRecord {
        let mut r = CampaignRecord::empty(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        r.platform = Some(platform.to_string());
        r.audience = Some(audience.to_string());
        r.roas = Some(roas);
        r.cpa = Some(cpa);
        r
    }

    fn with_money(mut r: CampaignRecord, cost: f64, revenue: f64) -> CampaignRecord {
        r.total_cost = Some(cost);
        r.revenue = Some(revenue);
        r
    }

    #[test]
    fn two_row_example() {
        let ds = Dataset::new(
            "test.csv",
            vec![record("Meta", "18-24", 2.0, 10.0), record("Meta", "25-34", 3.0, 20.0)],
        );

        let summary = platform_summary(&ds);
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].platform, "Meta");
        assert_eq!(summary[0].roas_mean, 2.5);

        let matrix = roas_matrix(&ds);
        assert_eq!(matrix.get("Meta", "18-24"), Some(2.0));
        assert_eq!(matrix.get("Meta", "25-34"), Some(3.0));

        let cpa = audience_cpa_ranking(&ds);
        assert_eq!(
            cpa,
            vec![
                AudienceCpa { audience: "18-24".to_string(), mean_cpa: 10.0 },
                AudienceCpa { audience: "25-34".to_string(), mean_cpa: 20.0 },
            ]
        );
    }

    #[test]
    fn platform_summary_sums_match_rows() {
        let ds = Dataset::new(
            "test.csv",
            vec![
                with_money(record("Meta", "18-24", 2.0, 10.0), 100.0, 200.0),
                with_money(record("TikTok", "18-24", 1.0, 12.0), 50.0, 50.0),
                with_money(record("Meta", "25-34", 4.0, 8.0), 25.0, 100.0),
                with_money(record("Google", "35-44", 3.0, 9.0), 10.0, 30.0),
            ],
        );

        let summary = platform_summary(&ds);
        assert_eq!(summary.len(), 3);
        let meta = summary.iter().find(|r| r.platform == "Meta").unwrap();
        assert_eq!(meta.total_cost_sum, 125.0);
        assert_eq!(meta.revenue_sum, 300.0);
        assert_eq!(meta.roas_mean, 3.0);
    }

    #[test]
    fn absent_combinations_read_as_zero() {
        let ds = Dataset::new(
            "test.csv",
            vec![
                record("Meta", "18-24", 2.0, 10.0),
                record("TikTok", "25-34", 1.5, 10.0),
            ],
        );

        let matrix = roas_matrix(&ds);
        assert_eq!(matrix.platforms, ["Meta", "TikTok"]);
        assert_eq!(matrix.audiences, ["18-24", "25-34"]);
        assert_eq!(matrix.get("Meta", "25-34"), Some(0.0));
        assert_eq!(matrix.get("TikTok", "18-24"), Some(0.0));
        assert!(matrix.cells.iter().flatten().all(|v| v.is_finite()));
    }

    #[test]
    fn combination_with_only_missing_roas_is_zero() {
        let mut missing = record("Meta", "45+", 0.0, 10.0);
        missing.roas = None;
        let ds = Dataset::new("test.csv", vec![record("Meta", "18-24", 2.0, 10.0), missing]);

        let matrix = roas_matrix(&ds);
        assert_eq!(matrix.get("Meta", "45+"), Some(0.0));
    }

    #[test]
    fn tied_correlations_keep_column_order_and_nan_goes_last() {
        let wobble = [0.3, -0.2, 0.1, 0.4, -0.1, 0.0];
        let records = wobble
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let x = i as f64;
                let mut r = CampaignRecord::empty(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
                r.clicks = Some(10.0 + x);
                r.conversions = Some(10.0 + x);
                r.revenue = Some(5.0 + 2.0 * x + w);
                r
            })
            .collect();

        let ranked: Vec<NumericColumn> = revenue_correlations(&Dataset::new("test.csv", records))
            .into_iter()
            .map(|r| r.column)
            .collect();
        assert_eq!(
            ranked,
            [
                NumericColumn::Revenue,
                NumericColumn::Clicks,
                NumericColumn::Conversions,
                NumericColumn::DailyBudget,
                NumericColumn::Impressions,
                NumericColumn::TotalCost,
                NumericColumn::Roas,
            ]
        );
    }

    #[test]
    fn tied_cpa_means_keep_audience_order() {
        let mut unknown = record("Meta", "13-17", 1.0, 0.0);
        unknown.cpa = None;
        let ds = Dataset::new(
            "test.csv",
            vec![
                record("Meta", "35-44", 1.0, 15.0),
                unknown,
                record("Meta", "18-24", 1.0, 10.0),
                record("Meta", "25-34", 1.0, 5.0),
                record("Meta", "18-24", 1.0, 20.0),
            ],
        );

        let order: Vec<(String, f64)> = audience_cpa_ranking(&ds)
            .into_iter()
            .map(|a| (a.audience, a.mean_cpa))
            .collect();
        assert_eq!(order[0], ("25-34".to_string(), 5.0));
        assert_eq!(order[1], ("18-24".to_string(), 15.0));
        assert_eq!(order[2], ("35-44".to_string(), 15.0));
        assert_eq!(order[3].0, "13-17");
        assert!(order[3].1.is_nan());
    }

    #[test]
    fn revenue_correlates_with_itself_first() {
        let records = (0..6)
            .map(|i| {
                let x = i as f64;
                let base = record("Meta", "18-24", 1.0 + (x * 1.7).sin(), 10.0);
                let revenue = 40.0 + (x * 0.9).cos() * 10.0 + x;
                let mut r = with_money(base, 10.0 * x + 5.0, revenue);
                r.daily_budget = Some(100.0 - x * 3.0);
                r.impressions = Some(1000.0 + (x * 2.3).sin() * 50.0);
                r.clicks = Some(30.0 + x);
                r.conversions = Some(3.0 + (x % 2.0));
                r
            })
            .collect();
        let ds = Dataset::new("test.csv", records);

        let ranked = revenue_correlations(&ds);
        assert_eq!(ranked.len(), NumericColumn::CORRELATED.len());
        assert_eq!(ranked[0].column, NumericColumn::Revenue);
        assert_eq!(ranked[0].coefficient, 1.0);
        for pair in ranked.windows(2) {
            assert!(pair[0].coefficient >= pair[1].coefficient || pair[1].coefficient.is_nan());
        }
    }

    #[test]
    fn constant_column_correlation_sorts_last() {
        let records = (0..4)
            .map(|i| {
                let x = i as f64;
                let base = record("Meta", "18-24", 1.0 + x, 10.0);
                let mut r = with_money(base, 10.0 + x, 20.0 + 2.0 * x);
                r.daily_budget = Some(50.0);
                r.impressions = Some(100.0 * x);
                r.clicks = Some(5.0 - x);
                r.conversions = Some(1.0 + x * x);
                r
            })
            .collect();
        let ds = Dataset::new("test.csv", records);

        let ranked = revenue_correlations(&ds);
        let last = ranked.last().unwrap();
        assert_eq!(last.column, NumericColumn::DailyBudget);
        assert!(last.coefficient.is_nan());
    }

    #[test]
    fn cpa_ranking_is_non_decreasing() {
        let ds = Dataset::new(
            "test.csv",
            vec![
                record("Meta", "45+", 1.0, 30.0),
                record("Meta", "18-24", 1.0, 12.0),
                record("Meta", "25-34", 1.0, 25.0),
                record("TikTok", "18-24", 1.0, 8.0),
                record("TikTok", "35-44", 1.0, 5.0),
            ],
        );

        let ranked = audience_cpa_ranking(&ds);
        assert_eq!(ranked[0].audience, "35-44");
        assert!(ranked.windows(2).all(|w| w[0].mean_cpa <= w[1].mean_cpa));
    }
}
