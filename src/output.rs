use crate::error::ReportError;
use crate::html;
use crate::normalize::NormalizeReport;
use crate::report::{Report, ReportSection};
use crate::util::format_int;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};
use tracing::info;

pub const SUMMARY_FILE: &str = "summary.json";
pub const BEHIND_FILE: &str = "behind_target.csv";
pub const DASHBOARD_FILE: &str = "dashboard.html";

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), ReportError> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ReportError> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

#[derive(Serialize)]
struct Summary<'a> {
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    report: &'a Report,
}

/// Write `summary.json`, `behind_target.csv` and `dashboard.html` into `dir`.
///
/// Everything is rendered in memory first so a failure never leaves a
/// half-written dashboard behind.
pub fn write_outputs(dir: &Path, report: &Report) -> Result<Vec<PathBuf>, ReportError> {
    std::fs::create_dir_all(dir)?;
    let dashboard = html::render_dashboard(report);

    let summary_path = dir.join(SUMMARY_FILE);
    write_json(
        &summary_path,
        &Summary {
            generated_at: Utc::now(),
            report,
        },
    )?;

    let behind_path = dir.join(BEHIND_FILE);
    write_csv(&behind_path, &report.behind_rows())?;

    let dashboard_path = dir.join(DASHBOARD_FILE);
    std::fs::write(&dashboard_path, dashboard)?;

    let written = vec![summary_path, behind_path, dashboard_path];
    for p in &written {
        info!(path = %p.display(), "wrote output");
    }
    Ok(written)
}

pub fn markdown_table<T>(rows: &[T]) -> String
where
    T: Tabled + Clone,
{
    if rows.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(rows.to_vec()).with(Style::markdown()).to_string()
}

pub fn load_summary(report: &NormalizeReport) -> String {
    let mut s = format!(
        "Processing dataset... ({} rows loaded, {} units retained)",
        format_int(report.total_rows),
        format_int(report.retained)
    );
    if report.missing_label > 0 {
        let _ = write!(
            s,
            "\nNote: {} rows skipped without a unit name.",
            format_int(report.missing_label)
        );
    }
    if report.excluded_sector > 0 {
        let _ = write!(
            s,
            "\nNote: {} excluded-sector units left out.",
            format_int(report.excluded_sector)
        );
    }
    if report.coerced_walks > 0 {
        let _ = write!(
            s,
            "\nInfo: {} blank or non-numeric walk counts treated as 0.",
            format_int(report.coerced_walks)
        );
    }
    s
}

fn metrics_line(section: &ReportSection) -> String {
    format!(
        "Units: {} | Target: {} | Actual: {} | Compliance: {}",
        format_int(section.unit_count),
        format_int(section.target_total),
        format_int(section.actual_total),
        section.compliance()
    )
}

fn chart_line(section: &ReportSection, name: &str) -> String {
    let segs = section.chart.segments();
    format!(
        "{} [{}: {}, {}: {}]",
        section.chart_title(name).replace('\n', " "),
        segs[0].label,
        segs[0].value,
        segs[1].label,
        segs[1].value
    )
}

/// Plain-text rendering of the whole report for the console.
pub fn render_console(report: &Report) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Overall Summary (All Non-ESS Units)\n");
    let _ = writeln!(out, "{}", metrics_line(&report.overall));
    let _ = writeln!(out, "{}\n", chart_line(&report.overall, "Overall Progress"));
    let _ = writeln!(out, "---\n");
    let _ = writeln!(out, "District Manager Breakdown\n");
    for d in &report.districts {
        let _ = writeln!(out, "{}", d.heading());
        let _ = writeln!(out, "{}", metrics_line(d));
        let _ = writeln!(out, "{}\n", chart_line(d, &d.display_name));
        if d.behind_units.is_empty() {
            let _ = writeln!(out, "All units in this district are on or above target!\n");
        } else {
            let _ = writeln!(
                out,
                "Units Behind Target (<{} walks)\n",
                report.current_period_target
            );
            let _ = writeln!(out, "{}\n", markdown_table(&d.behind_units));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{aggregate, PeriodTarget};
    use crate::report::assemble;
    use crate::types::UnitRecord;

    fn sample_report() -> Report {
        let records = vec![
            UnitRecord {
                unit_label: "U1".into(),
                sector_name: Some("01-Ops".into()),
                district_key: "D1-Smith".into(),
                unit_type: "Retail".into(),
                walks_ytd: 2,
            },
            UnitRecord {
                unit_label: "U2".into(),
                sector_name: Some("01-Ops".into()),
                district_key: "D2-Jones".into(),
                unit_type: "Office".into(),
                walks_ytd: 4,
            },
        ];
        let target = PeriodTarget::default();
        assemble(&aggregate(&records, target), target)
    }

    #[test]
    fn console_lists_behind_units_and_on_target_districts() {
        let text = render_console(&sample_report());
        assert!(text.contains("Units: 2 | Target: 6 | Actual: 6 | Compliance: 100.0%"));
        assert!(text.contains("D2-Jones — 1 units | Target: 3 walks | Actual: 4 walks"));
        assert!(text.contains("Jones (4/3 walks, +1 excess) [On Target: 3, Excess: 1]"));
        assert!(text.contains("All units in this district are on or above target!"));
        assert!(text.contains("| U1 "));
        // Jones sorts before Smith
        assert!(text.find("D2-Jones").unwrap() < text.find("D1-Smith").unwrap());
    }

    #[test]
    fn load_summary_mentions_only_nonzero_drops() {
        let s = load_summary(&NormalizeReport {
            total_rows: 1200,
            missing_label: 0,
            excluded_sector: 14,
            coerced_walks: 0,
            retained: 1186,
        });
        assert!(s.starts_with("Processing dataset... (1,200 rows loaded, 1,186 units retained)"));
        assert!(s.contains("14 excluded-sector"));
        assert!(!s.contains("without a unit name"));
        assert!(!s.contains("treated as 0"));
    }

    #[test]
    fn outputs_land_in_the_target_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let written = write_outputs(&out, &sample_report()).unwrap();
        assert_eq!(written.len(), 3);

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out.join(SUMMARY_FILE)).unwrap()).unwrap();
        assert!(json["generated_at"].is_string());
        assert_eq!(json["current_period_target"], 3);
        assert_eq!(json["overall"]["actual_total"], 6);

        let csv_text = std::fs::read_to_string(out.join(BEHIND_FILE)).unwrap();
        let mut lines = csv_text.lines();
        assert_eq!(lines.next(), Some("District,Unit # - Unit Name,Unit Type,Walks YTD"));
        assert_eq!(lines.next(), Some("D1-Smith,U1,Retail,2"));
        assert_eq!(lines.next(), None);

        let html = std::fs::read_to_string(out.join(DASHBOARD_FILE)).unwrap();
        assert!(html.contains("<svg"));
    }
}
