//! Synthetic campaign dataset generation.
//!
//! Produces a `datos_sinteticos.csv`-shaped file with internally consistent
//! metrics: cost drives impressions, impressions drive clicks, clicks drive
//! conversions, and the derived ratios (CPC, conversion rate, ROAS, CPA) are
//! computed from those counts rather than drawn independently.

use std::path::Path;

use chrono::Duration;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::{LogNormal, Normal};

use crate::domain::{CampaignRecord, CategoryColumn, DATE_COLUMN, NumericColumn, SampleConfig};
use crate::error::AppError;

/// Per-platform generation profile.
struct PlatformProfile {
    name: &'static str,
    /// Cost per thousand impressions.
    cpm: f64,
    /// Click-through rate (fraction).
    ctr: f64,
    /// Click-to-conversion rate (fraction).
    cvr: f64,
    /// Engagement rate mean (percent).
    engagement: f64,
}

const PLATFORMS: [PlatformProfile; 4] = [
    PlatformProfile { name: "Meta", cpm: 9.0, ctr: 0.012, cvr: 0.035, engagement: 3.2 },
    PlatformProfile { name: "Google Ads", cpm: 14.0, ctr: 0.035, cvr: 0.045, engagement: 1.8 },
    PlatformProfile { name: "TikTok", cpm: 6.5, ctr: 0.010, cvr: 0.020, engagement: 5.5 },
    PlatformProfile { name: "LinkedIn", cpm: 30.0, ctr: 0.008, cvr: 0.060, engagement: 1.2 },
];

/// Audience label and a multiplier on conversion rate.
const AUDIENCES: [(&str, f64); 5] = [
    ("18-24", 0.8),
    ("25-34", 1.15),
    ("35-44", 1.1),
    ("45-54", 0.95),
    ("55+", 0.75),
];

/// Campaign type and a multiplier on average order value.
const CAMPAIGN_TYPES: [(&str, f64); 4] = [
    ("Awareness", 0.7),
    ("Consideration", 0.9),
    ("Conversion", 1.2),
    ("Retargeting", 1.35),
];

/// Mean revenue per conversion before campaign-type adjustment.
const BASE_ORDER_VALUE: f64 = 55.0;

/// Length of a campaign flight in days (total cost = daily budget * days).
const FLIGHT_DAYS: (i64, i64) = (7, 31);

pub fn generate_sample(config: &SampleConfig) -> Result<Vec<CampaignRecord>, AppError> {
    if config.rows == 0 {
        return Err(AppError::config("Sample row count must be > 0."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let noise = Normal::<f64>::new(0.0, 0.15)
        .map_err(|e| AppError::unexpected(format!("Noise distribution error: {e}")))?;
    let budget_dist = LogNormal::<f64>::new(5.3, 0.6)
        .map_err(|e| AppError::unexpected(format!("Budget distribution error: {e}")))?;

    let mut records = Vec::with_capacity(config.rows);
    for _ in 0..config.rows {
        let platform = &PLATFORMS[rng.gen_range(0..PLATFORMS.len())];
        let (audience, audience_mult) = AUDIENCES[rng.gen_range(0..AUDIENCES.len())];
        let (campaign_type, order_mult) = CAMPAIGN_TYPES[rng.gen_range(0..CAMPAIGN_TYPES.len())];

        let date = config.start_date + Duration::days(rng.gen_range(0..365));
        let days = rng.gen_range(FLIGHT_DAYS.0..=FLIGHT_DAYS.1);

        let daily_budget = round2(budget_dist.sample(&mut rng).clamp(20.0, 2_500.0));
        let total_cost = round2(daily_budget * days as f64 * rng.gen_range(0.85..1.0));

        let jitter = |rng: &mut StdRng| (1.0 + noise.sample(rng)).max(0.2);

        let impressions = (total_cost / (platform.cpm * jitter(&mut rng)) * 1_000.0)
            .round()
            .max(1.0);
        let clicks = (impressions * platform.ctr * jitter(&mut rng)).round().max(1.0);
        let conversions = (clicks * platform.cvr * audience_mult * jitter(&mut rng)).round();
        let revenue = round2(conversions * BASE_ORDER_VALUE * order_mult * jitter(&mut rng));

        let cpc = round2(total_cost / clicks);
        let conversion_rate = round2(conversions / clicks * 100.0);
        let roas = round2(revenue / total_cost);
        // No conversions: CPA is undefined and left blank.
        let cpa = (conversions > 0.0).then(|| round2(total_cost / conversions));
        let engagement_rate = round2((platform.engagement * jitter(&mut rng)).max(0.05));

        records.push(CampaignRecord {
            date,
            platform: Some(platform.name.to_string()),
            audience: Some(audience.to_string()),
            campaign_type: Some(campaign_type.to_string()),
            daily_budget: Some(daily_budget),
            impressions: Some(impressions),
            clicks: Some(clicks),
            conversions: Some(conversions),
            cpc: Some(cpc),
            conversion_rate: Some(conversion_rate),
            total_cost: Some(total_cost),
            revenue: Some(revenue),
            roas: Some(roas),
            cpa,
            engagement_rate: Some(engagement_rate),
        });
    }

    records.sort_by_key(|r| r.date);
    Ok(records)
}

/// Write records using the campaign CSV schema.
pub fn write_sample_csv(path: &Path, records: &[CampaignRecord]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| {
            AppError::export(format!(
                "Failed to create sample CSV '{}': {e}",
                path.display()
            ))
        })?;

    let header = std::iter::once(DATE_COLUMN)
        .chain(CategoryColumn::ALL.iter().map(|c| c.header()))
        .chain(NumericColumn::ALL.iter().map(|c| c.header()));
    writer
        .write_record(header)
        .map_err(|e| AppError::export(format!("Failed to write sample CSV header: {e}")))?;

    for r in records {
        let mut row: Vec<String> =
            Vec::with_capacity(1 + CategoryColumn::ALL.len() + NumericColumn::ALL.len());
        row.push(r.date.format("%Y-%m-%d").to_string());
        for c in CategoryColumn::ALL {
            row.push(r.category(c).unwrap_or_default().to_string());
        }
        for c in NumericColumn::ALL {
            row.push(r.value(c).map(|v| fmt_cell(c, v)).unwrap_or_default());
        }
        writer
            .write_record(&row)
            .map_err(|e| AppError::export(format!("Failed to write sample CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::export(format!("Failed to flush sample CSV: {e}")))?;
    Ok(())
}

fn fmt_cell(column: NumericColumn, v: f64) -> String {
    match column {
        NumericColumn::Impressions | NumericColumn::Clicks | NumericColumn::Conversions => {
            format!("{v:.0}")
        }
        _ => format!("{v:.2}"),
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn config(rows: usize, seed: u64) -> SampleConfig {
        SampleConfig {
            rows,
            seed,
            out: "unused.csv".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    #[test]
    fn same_seed_same_sample() {
        let a = generate_sample(&config(50, 7)).unwrap();
        let b = generate_sample(&config(50, 7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn derived_ratios_are_consistent() {
        for r in generate_sample(&config(200, 42)).unwrap() {
            let cost = r.total_cost.unwrap();
            let clicks = r.clicks.unwrap();
            assert!(cost > 0.0 && clicks >= 1.0);
            assert!((r.cpc.unwrap() - cost / clicks).abs() < 0.01);
            assert!((r.roas.unwrap() - r.revenue.unwrap() / cost).abs() < 0.01);
            match r.cpa {
                Some(cpa) => assert!((cpa - cost / r.conversions.unwrap()).abs() < 0.01),
                None => assert_eq!(r.conversions, Some(0.0)),
            }
        }
    }

    #[test]
    fn zero_rows_is_rejected() {
        assert!(generate_sample(&config(0, 1)).is_err());
    }

    #[test]
    fn written_sample_loads_back() {
        let records = generate_sample(&config(40, 3)).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("datos_sinteticos.csv");
        write_sample_csv(&path, &records).unwrap();

        let dataset = crate::io::load_dataset(&path).unwrap();
        assert_eq!(dataset.len(), 40);
        assert_eq!(dataset.records[0].date, records[0].date);
        assert_eq!(dataset.records[0].platform, records[0].platform);
        assert_eq!(dataset.records[0].roas, records[0].roas);
    }
}
