//! Export the computed report to JSON.
//!
//! The export is meant to be easy to consume from notebooks or downstream
//! scripts. NaN means (groups without data) are written as `null`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::domain::Dataset;
use crate::error::AppError;
use crate::report::Report;

/// Envelope written to disk: run metadata plus the report views.
#[derive(Debug, Serialize)]
pub struct ReportFile<'a> {
    pub tool: &'static str,
    pub source: String,
    pub date_from: Option<chrono::NaiveDate>,
    pub date_to: Option<chrono::NaiveDate>,
    pub report: &'a Report,
}

/// Write `report` as pretty-printed JSON.
pub fn write_report_json(path: &Path, dataset: &Dataset, report: &Report) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| {
            AppError::export(format!(
                "Failed to create report JSON '{}': {e}",
                path.display()
            ))
        })?;
    let mut writer = BufWriter::new(file);

    let (date_from, date_to) = match dataset.date_range() {
        Some((from, to)) => (Some(from), Some(to)),
        None => (None, None),
    };

    let envelope = ReportFile {
        tool: "insights",
        source: dataset.source.display().to_string(),
        date_from,
        date_to,
        report,
    };

    serde_json::to_writer_pretty(&mut writer, &envelope)
        .map_err(|e| AppError::export(format!("Failed to write report JSON: {e}")))?;
    writer
        .flush()
        .map_err(|e| AppError::export(format!("Failed to flush report JSON: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CampaignRecord;
    use crate::report::build_report;
    use chrono::NaiveDate;

    #[test]
    fn writes_report_with_schema_column_names() {
        let mut record = CampaignRecord::empty(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        record.platform = Some("Meta".to_string());
        record.audience = Some("18-24".to_string());
        record.roas = Some(2.0);
        record.cpa = Some(10.0);
        let dataset = Dataset::new("campaigns.csv", vec![record]);
        let report = build_report(&dataset);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        write_report_json(&path, &dataset, &report).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["tool"], "insights");
        assert_eq!(value["date_from"], "2024-02-01");
        assert_eq!(value["report"]["platform_summary"][0]["platform"], "Meta");
        assert_eq!(value["report"]["revenue_correlations"][0]["column"], "presupuesto_diario");
        // one row: every correlation is undefined
        assert!(value["report"]["revenue_correlations"][0]["coefficient"].is_null());
    }
}
