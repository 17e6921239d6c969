//! Formatted terminal output for the report views.
//!
//! We keep formatting code in one place so:
//! - the aggregation code stays clean and testable
//! - output changes are localized

use crate::report::{AudienceCpa, PlatformSummaryRow, Report, RevenueCorrelation, RoasMatrix};

/// Format every view, in the order they are printed by `insights report`.
pub fn format_report(report: &Report) -> String {
    let mut out = String::new();

    out.push_str("--- PLATFORM SUMMARY ---\n");
    out.push_str(&format_platform_summary(&report.platform_summary));

    out.push_str("\n--- PLATFORM x AUDIENCE MATRIX (MEAN ROAS) ---\n");
    out.push_str(&format_roas_matrix(&report.roas_matrix));

    out.push_str("\n--- CORRELATION WITH REVENUE ---\n");
    out.push_str(&format_revenue_correlations(&report.revenue_correlations));

    out.push_str("\n--- BEST AUDIENCES BY COST PER ACQUISITION (CPA) ---\n");
    out.push_str(&format_audience_cpa(&report.audience_cpa));

    out
}

pub fn format_platform_summary(rows: &[PlatformSummaryRow]) -> String {
    let mut out = String::new();
    push_line(
        &mut out,
        format!(
            "{:<16} {:>16} {:>16} {:>10}",
            "platform", "costo_total", "revenue_generado", "roas"
        ),
    );
    push_line(&mut out, format!("{:-<16} {:-<16} {:-<16} {:-<10}", "", "", "", ""));

    for r in rows {
        push_line(
            &mut out,
            format!(
                "{:<16} {:>16} {:>16} {:>10}",
                truncate(&r.platform, 16),
                fmt_num(r.total_cost_sum, 2),
                fmt_num(r.revenue_sum, 2),
                fmt_num(r.roas_mean, 4),
            ),
        );
    }
    out
}

pub fn format_roas_matrix(matrix: &RoasMatrix) -> String {
    const ROW_W: usize = 16;
    const CELL_W: usize = 12;

    let mut out = String::new();

    let mut header = format!("{:<ROW_W$}", "platform");
    for audience in &matrix.audiences {
        header.push_str(&format!(" {:>CELL_W$}", truncate(audience, CELL_W)));
    }
    push_line(&mut out, header);

    let mut rule = "-".repeat(ROW_W);
    for _ in &matrix.audiences {
        rule.push(' ');
        rule.push_str(&"-".repeat(CELL_W));
    }
    push_line(&mut out, rule);

    for (platform, cells) in matrix.platforms.iter().zip(&matrix.cells) {
        let mut line = format!("{:<ROW_W$}", truncate(platform, ROW_W));
        for v in cells {
            line.push_str(&format!(" {:>CELL_W$}", fmt_num(*v, 4)));
        }
        push_line(&mut out, line);
    }
    out
}

pub fn format_revenue_correlations(rows: &[RevenueCorrelation]) -> String {
    let mut out = String::new();
    for r in rows {
        push_line(&mut out, format!("{:<20} {:>10}", r.column.header(), fmt_num(r.coefficient, 6)));
    }
    out
}

pub fn format_audience_cpa(rows: &[AudienceCpa]) -> String {
    let mut out = String::new();
    push_line(&mut out, format!("{:<20} {:>12}", "audiencia_objetivo", "cpa"));
    push_line(&mut out, format!("{:-<20} {:-<12}", "", ""));
    for r in rows {
        push_line(
            &mut out,
            format!("{:<20} {:>12}", truncate(&r.audience, 20), fmt_num(r.mean_cpa, 4)),
        );
    }
    out
}

fn push_line(out: &mut String, line: String) {
    out.push_str(line.trim_end());
    out.push('\n');
}

fn fmt_num(v: f64, decimals: usize) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else {
        format!("{v:.decimals$}")
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NumericColumn;

    #[test]
    fn matrix_prints_zero_cells() {
        let matrix = RoasMatrix {
            platforms: vec!["Meta".to_string(), "TikTok".to_string()],
            audiences: vec!["18-24".to_string(), "25-34".to_string()],
            cells: vec![vec![2.0, 0.0], vec![0.0, 1.5]],
        };

        let text = format_roas_matrix(&matrix);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("18-24") && lines[0].contains("25-34"));
        assert!(lines[2].starts_with("Meta"));
        assert!(lines[2].contains("2.0000") && lines[2].contains("0.0000"));
    }

    #[test]
    fn correlations_keep_given_order_and_show_nan() {
        let rows = vec![
            RevenueCorrelation { column: NumericColumn::Revenue, coefficient: 1.0 },
            RevenueCorrelation { column: NumericColumn::DailyBudget, coefficient: f64::NAN },
        ];

        let text = format_revenue_correlations(&rows);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("revenue_generado") && lines[0].ends_with("1.000000"));
        assert!(lines[1].starts_with("presupuesto_diario") && lines[1].ends_with("NaN"));
    }

    #[test]
    fn long_names_are_truncated() {
        assert_eq!(truncate("Programmatic Display", 10), "Programma.");
        assert_eq!(truncate("Meta", 10), "Meta");
    }
}
