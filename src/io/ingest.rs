//! CSV ingest for the campaign dataset.
//!
//! This module turns the campaign CSV into a `Dataset`. Unlike a screening
//! tool, the report is all-or-nothing:
//! - a missing file is a `FileNotFound` error that names the directory searched
//! - any malformed row, non-numeric numeric cell or unparseable date fails the
//!   whole load (no row is silently skipped)
//! - blank cells are kept as missing values, never as zero

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;

use crate::domain::{CampaignRecord, CategoryColumn, DATE_COLUMN, Dataset, NumericColumn};
use crate::error::AppError;

/// Resolve a caller-supplied data path to an absolute one (for messages).
pub fn resolve_data_path(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Load the campaign CSV at `path`.
pub fn load_dataset(path: &Path) -> Result<Dataset, AppError> {
    let resolved = resolve_data_path(path);
    if !resolved.is_file() {
        return Err(not_found_error(&resolved));
    }

    let file = File::open(&resolved).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            not_found_error(&resolved)
        } else {
            AppError::unexpected(format!("Failed to open CSV '{}': {e}", resolved.display()))
        }
    })?;

    let records = read_records(file)?;
    log::debug!("parsed {} campaign records from {}", records.len(), resolved.display());

    Ok(Dataset::new(resolved, records))
}

/// Parse campaign records from any CSV reader.
pub fn read_records<R: std::io::Read>(input: R) -> Result<Vec<CampaignRecord>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::unexpected(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map)?;

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // records() starts right after the header line, and CSV lines are 1-based.
        let line = idx + 2;

        let record = result
            .map_err(|e| AppError::unexpected(format!("CSV parse error on line {line}: {e}")))?;
        let row = parse_row(&record, &header_map)
            .map_err(|e| AppError::unexpected(format!("Line {line}: {e}")))?;
        records.push(row);
    }

    Ok(records)
}

fn not_found_error(resolved: &Path) -> AppError {
    let name = resolved
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| resolved.display().to_string());
    let dir = resolved
        .parent()
        .map(|d| d.display().to_string())
        .unwrap_or_else(|| ".".to_string());
    AppError::not_found(format!(
        "Data file '{name}' not found. Make sure the CSV is inside: {dir}"
    ))
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    let required = std::iter::once(DATE_COLUMN)
        .chain(CategoryColumn::ALL.iter().map(|c| c.header()))
        .chain(NumericColumn::ALL.iter().map(|c| c.header()));

    let missing: Vec<&str> = required.filter(|name| !header_map.contains_key(*name)).collect();
    if missing.is_empty() {
        return Ok(());
    }
    Err(AppError::unexpected(format!(
        "Missing required column(s): {}",
        missing.iter().map(|m| format!("`{m}`")).collect::<Vec<_>>().join(", ")
    )))
}

fn parse_row(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
) -> Result<CampaignRecord, String> {
    let date = parse_date(get_required(record, header_map, DATE_COLUMN)?)?;
    let mut row = CampaignRecord::empty(date);

    for column in CategoryColumn::ALL {
        let value = get_optional(record, header_map, column.header()).map(str::to_string);
        row.set_category(column, value);
    }

    for column in NumericColumn::ALL {
        let value = parse_opt_f64(get_optional(record, header_map, column.header()))
            .map_err(|raw| format!("Non-numeric value '{raw}' in column `{}`", column.header()))?;
        row.set_value(column, value);
    }

    Ok(row)
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .and_then(present_cell)
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn get_optional<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).and_then(present_cell)
}

/// Markers that spreadsheet and pandas exports use for a missing cell.
const NA_MARKERS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Trimmed cell text, or `None` for blanks and missing-value markers.
fn present_cell(raw: &str) -> Option<&str> {
    let s = raw.trim();
    (!s.is_empty() && !NA_MARKERS.contains(&s)).then_some(s)
}

/// Parse a campaign date.
///
/// ISO dates are the norm, but exports from ad platforms also carry
/// timestamps or US-style dates. Ambiguous slash dates read month-first
/// (`01/02/2024` is January 2nd); day-first is only used when the first
/// field cannot be a month. Timestamps keep only their date part.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    const DATE_FMTS: [&str; 6] = [
        "%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y", "%m-%d-%Y", "%d-%m-%Y",
    ];
    const DATETIME_FMTS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

    for fmt in DATE_FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    for fmt in DATETIME_FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }
    Err(format!(
        "Invalid date '{s}' in column `{DATE_COLUMN}`. Expected one of: YYYY-MM-DD, \
         YYYY/MM/DD, MM/DD/YYYY, DD/MM/YYYY, MM-DD-YYYY, DD-MM-YYYY (optionally with a time)."
    ))
}

/// Absent → `Ok(None)`; `NaN`/infinite → `Ok(None)`; anything else non-numeric → `Err(raw)`.
fn parse_opt_f64(s: Option<&str>) -> Result<Option<f64>, String> {
    let Some(s) = s else { return Ok(None) };
    let v = s.parse::<f64>().map_err(|_| s.to_string())?;
    Ok(if v.is_finite() { Some(v) } else { None })
}
