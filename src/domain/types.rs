//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - aggregated in-memory by the report pipeline
//! - exported to JSON alongside the computed report
//! - generated synthetically for demos and tests

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Default data file name looked up when no `--data` / `INSIGHTS_DATA` is given.
pub const DEFAULT_DATA_FILE: &str = "datos_sinteticos.csv";

/// File name of the CPC vs. conversion-rate scatter chart.
pub const SCATTER_FILE: &str = "cpc_vs_conversion.png";

/// File name of the 2x2 dashboard.
pub const DASHBOARD_FILE: &str = "dashboard_marketing_final.png";

/// CSV header of the campaign date column.
pub const DATE_COLUMN: &str = "fecha_campana";

/// Categorical columns that records can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryColumn {
    #[serde(rename = "plataforma")]
    Platform,
    #[serde(rename = "audiencia_objetivo")]
    Audience,
    #[serde(rename = "tipo_campana")]
    CampaignType,
}

impl CategoryColumn {
    pub const ALL: [CategoryColumn; 3] = [
        CategoryColumn::Platform,
        CategoryColumn::Audience,
        CategoryColumn::CampaignType,
    ];

    /// CSV header name.
    pub fn header(self) -> &'static str {
        match self {
            CategoryColumn::Platform => "plataforma",
            CategoryColumn::Audience => "audiencia_objetivo",
            CategoryColumn::CampaignType => "tipo_campana",
        }
    }
}

/// Numeric columns of the campaign schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericColumn {
    #[serde(rename = "presupuesto_diario")]
    DailyBudget,
    #[serde(rename = "impresiones")]
    Impressions,
    #[serde(rename = "clicks")]
    Clicks,
    #[serde(rename = "conversiones")]
    Conversions,
    #[serde(rename = "cpc")]
    Cpc,
    #[serde(rename = "conversion_rate")]
    ConversionRate,
    #[serde(rename = "costo_total")]
    TotalCost,
    #[serde(rename = "revenue_generado")]
    Revenue,
    #[serde(rename = "roas")]
    Roas,
    #[serde(rename = "cpa")]
    Cpa,
    #[serde(rename = "engagement_rate")]
    EngagementRate,
}

impl NumericColumn {
    pub const ALL: [NumericColumn; 11] = [
        NumericColumn::DailyBudget,
        NumericColumn::Impressions,
        NumericColumn::Clicks,
        NumericColumn::Conversions,
        NumericColumn::Cpc,
        NumericColumn::ConversionRate,
        NumericColumn::TotalCost,
        NumericColumn::Revenue,
        NumericColumn::Roas,
        NumericColumn::Cpa,
        NumericColumn::EngagementRate,
    ];

    /// Columns that take part in the correlation-with-revenue report, in report order.
    pub const CORRELATED: [NumericColumn; 7] = [
        NumericColumn::DailyBudget,
        NumericColumn::Impressions,
        NumericColumn::Clicks,
        NumericColumn::Conversions,
        NumericColumn::TotalCost,
        NumericColumn::Revenue,
        NumericColumn::Roas,
    ];

    /// CSV header name.
    pub fn header(self) -> &'static str {
        match self {
            NumericColumn::DailyBudget => "presupuesto_diario",
            NumericColumn::Impressions => "impresiones",
            NumericColumn::Clicks => "clicks",
            NumericColumn::Conversions => "conversiones",
            NumericColumn::Cpc => "cpc",
            NumericColumn::ConversionRate => "conversion_rate",
            NumericColumn::TotalCost => "costo_total",
            NumericColumn::Revenue => "revenue_generado",
            NumericColumn::Roas => "roas",
            NumericColumn::Cpa => "cpa",
            NumericColumn::EngagementRate => "engagement_rate",
        }
    }
}

/// One campaign row.
///
/// Categorical cells left blank in the CSV are `None`, as are blank numeric
/// cells. Missing values are skipped by aggregations on that column only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignRecord {
    pub date: NaiveDate,

    pub platform: Option<String>,
    pub audience: Option<String>,
    pub campaign_type: Option<String>,

    pub daily_budget: Option<f64>,
    pub impressions: Option<f64>,
    pub clicks: Option<f64>,
    pub conversions: Option<f64>,
    /// Cost per click.
    pub cpc: Option<f64>,
    /// Conversions per click, in percent.
    pub conversion_rate: Option<f64>,
    pub total_cost: Option<f64>,
    pub revenue: Option<f64>,
    /// Return on ad spend (revenue / cost).
    pub roas: Option<f64>,
    /// Cost per acquisition (cost / conversions).
    pub cpa: Option<f64>,
    /// Engagement rate, in percent.
    pub engagement_rate: Option<f64>,
}

impl CampaignRecord {
    /// A record dated `date` with every other field missing.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            platform: None,
            audience: None,
            campaign_type: None,
            daily_budget: None,
            impressions: None,
            clicks: None,
            conversions: None,
            cpc: None,
            conversion_rate: None,
            total_cost: None,
            revenue: None,
            roas: None,
            cpa: None,
            engagement_rate: None,
        }
    }

    pub fn category(&self, column: CategoryColumn) -> Option<&str> {
        match column {
            CategoryColumn::Platform => self.platform.as_deref(),
            CategoryColumn::Audience => self.audience.as_deref(),
            CategoryColumn::CampaignType => self.campaign_type.as_deref(),
        }
    }

    pub fn value(&self, column: NumericColumn) -> Option<f64> {
        match column {
            NumericColumn::DailyBudget => self.daily_budget,
            NumericColumn::Impressions => self.impressions,
            NumericColumn::Clicks => self.clicks,
            NumericColumn::Conversions => self.conversions,
            NumericColumn::Cpc => self.cpc,
            NumericColumn::ConversionRate => self.conversion_rate,
            NumericColumn::TotalCost => self.total_cost,
            NumericColumn::Revenue => self.revenue,
            NumericColumn::Roas => self.roas,
            NumericColumn::Cpa => self.cpa,
            NumericColumn::EngagementRate => self.engagement_rate,
        }
    }

    pub fn set_value(&mut self, column: NumericColumn, value: Option<f64>) {
        let slot = match column {
            NumericColumn::DailyBudget => &mut self.daily_budget,
            NumericColumn::Impressions => &mut self.impressions,
            NumericColumn::Clicks => &mut self.clicks,
            NumericColumn::Conversions => &mut self.conversions,
            NumericColumn::Cpc => &mut self.cpc,
            NumericColumn::ConversionRate => &mut self.conversion_rate,
            NumericColumn::TotalCost => &mut self.total_cost,
            NumericColumn::Revenue => &mut self.revenue,
            NumericColumn::Roas => &mut self.roas,
            NumericColumn::Cpa => &mut self.cpa,
            NumericColumn::EngagementRate => &mut self.engagement_rate,
        };
        *slot = value;
    }

    pub fn set_category(&mut self, column: CategoryColumn, value: Option<String>) {
        match column {
            CategoryColumn::Platform => self.platform = value,
            CategoryColumn::Audience => self.audience = value,
            CategoryColumn::CampaignType => self.campaign_type = value,
        }
    }
}

/// The loaded table: records in file order plus where they came from.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub source: PathBuf,
    pub records: Vec<CampaignRecord>,
}

impl Dataset {
    pub fn new(source: impl Into<PathBuf>, records: Vec<CampaignRecord>) -> Self {
        Self {
            source: source.into(),
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// One column as a vector aligned with `records` (missing cells stay `None`).
    pub fn column(&self, column: NumericColumn) -> Vec<Option<f64>> {
        self.records.iter().map(|r| r.value(column)).collect()
    }

    /// First and last campaign date, if any records exist.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.iter().map(|r| r.date).min()?;
        let last = self.records.iter().map(|r| r.date).max()?;
        Some((first, last))
    }
}

/// Chart output settings.
#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub out_dir: PathBuf,
    /// Resolution of the dashboard figure (16x12 in).
    pub dashboard_dpi: u32,
    /// Resolution of the scatter chart (10x6 in).
    pub scatter_dpi: u32,
    /// Explicit TrueType font used for chart text.
    pub font: Option<PathBuf>,
}

impl ChartConfig {
    pub fn scatter_path(&self) -> PathBuf {
        self.out_dir.join(SCATTER_FILE)
    }

    pub fn dashboard_path(&self) -> PathBuf {
        self.out_dir.join(DASHBOARD_FILE)
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags, then `.env`/environment, then defaults.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub data_path: PathBuf,
    /// Print the console reports.
    pub print_reports: bool,
    /// Render charts (`None` skips rendering).
    pub charts: Option<ChartConfig>,
    pub export_json: Option<PathBuf>,
}

/// Settings for the synthetic dataset generator.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub rows: usize,
    pub seed: u64,
    pub out: PathBuf,
    /// First campaign date; dates are spread over the following year.
    pub start_date: NaiveDate,
}
