use crate::error::ReportError;
use crate::types::{RawTable, UnitRecord};
use crate::util::coerce_count;
use tracing::{debug, info};

/// Units in sectors starting with this prefix are left out of every report.
pub const EXCLUDED_SECTOR_PREFIX: &str = "06-ESS";

/// Column headers expected in the export.
#[derive(Debug, Clone)]
pub struct ColumnNames {
    pub unit_label: &'static str,
    pub sector_name: &'static str,
    pub district: &'static str,
    pub unit_type: &'static str,
    pub walks_ytd: &'static str,
}

impl Default for ColumnNames {
    fn default() -> Self {
        ColumnNames {
            unit_label: "Unit # - Unit Name",
            sector_name: "Sector Name",
            district: "District",
            unit_type: "Unit Type",
            walks_ytd: "# of Safety Walks Completed YTD",
        }
    }
}

impl ColumnNames {
    fn all(&self) -> [&'static str; 5] {
        [
            self.unit_label,
            self.sector_name,
            self.district,
            self.unit_type,
            self.walks_ytd,
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub total_rows: usize,
    pub missing_label: usize,
    pub excluded_sector: usize,
    pub coerced_walks: usize,
    pub retained: usize,
}

/// Turn the raw table into unit records, dropping unlabeled rows and
/// excluded-sector rows. Retained rows keep their input order.
///
/// Fails with [`ReportError::Schema`] before looking at any row when a
/// required column is absent, and with [`ReportError::EmptyResult`] when
/// nothing survives filtering.
pub fn normalize(
    table: &RawTable,
    columns: &ColumnNames,
) -> Result<(Vec<UnitRecord>, NormalizeReport), ReportError> {
    let missing: Vec<String> = columns
        .all()
        .iter()
        .filter(|name| table.column_index(name).is_none())
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ReportError::Schema { missing });
    }
    // Presence was checked above.
    let idx = |name: &str| table.column_index(name).unwrap_or_default();
    let (label_col, sector_col, district_col, type_col, walks_col) = (
        idx(columns.unit_label),
        idx(columns.sector_name),
        idx(columns.district),
        idx(columns.unit_type),
        idx(columns.walks_ytd),
    );

    let mut report = NormalizeReport {
        total_rows: table.rows.len(),
        ..Default::default()
    };
    let mut records = Vec::new();

    for row in 0..table.rows.len() {
        let Some(unit_label) = table.cell(row, label_col).as_text() else {
            report.missing_label += 1;
            continue;
        };
        let sector_name = table.cell(row, sector_col).as_text();
        // A missing sector never matches the prefix.
        if sector_name
            .as_deref()
            .is_some_and(|s| s.starts_with(EXCLUDED_SECTOR_PREFIX))
        {
            report.excluded_sector += 1;
            continue;
        }
        let (walks_ytd, coerced) = coerce_count(table.cell(row, walks_col));
        if coerced {
            report.coerced_walks += 1;
        }
        records.push(UnitRecord {
            unit_label,
            sector_name,
            district_key: table.cell(row, district_col).as_text().unwrap_or_default(),
            unit_type: table.cell(row, type_col).as_text().unwrap_or_default(),
            walks_ytd,
        });
    }

    report.retained = records.len();
    debug!(?report, "normalized rows");
    if records.is_empty() {
        return Err(ReportError::EmptyResult);
    }
    info!(retained = report.retained, total = report.total_rows, "units retained");
    Ok((records, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawValue;

    fn text(s: &str) -> RawValue {
        RawValue::Text(s.to_string())
    }

    fn table(rows: Vec<Vec<RawValue>>) -> RawTable {
        RawTable {
            columns: ColumnNames::default().all().iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }

    fn row(label: Option<&str>, sector: Option<&str>, district: &str, walks: RawValue) -> Vec<RawValue> {
        vec![
            label.map(text).unwrap_or(RawValue::Empty),
            sector.map(text).unwrap_or(RawValue::Empty),
            text(district),
            text("Retail"),
            walks,
        ]
    }

    #[test]
    fn drops_unlabeled_and_excluded_rows() {
        let t = table(vec![
            row(Some("U1"), Some("01-Ops"), "D1-Smith", RawValue::Number(2.0)),
            row(Some("U2"), Some("06-ESS-Support"), "D1-Smith", RawValue::Number(5.0)),
            row(None, Some("01-Ops"), "D2-Jones", RawValue::Number(1.0)),
        ]);
        let (records, report) = normalize(&t, &ColumnNames::default()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].unit_label, "U1");
        assert_eq!(records[0].walks_ytd, 2);
        assert_eq!(
            report,
            NormalizeReport {
                total_rows: 3,
                missing_label: 1,
                excluded_sector: 1,
                coerced_walks: 0,
                retained: 1,
            }
        );
    }

    #[test]
    fn prefix_match_is_case_sensitive_and_null_sector_is_kept() {
        let t = table(vec![
            row(Some("U1"), Some("06-ess-lower"), "D1-Smith", RawValue::Empty),
            row(Some("U2"), None, "D1-Smith", text("abc")),
            row(Some("U3"), Some(" 06-ESS"), "D1-Smith", text("4")),
        ]);
        let (records, report) = normalize(&t, &ColumnNames::default()).unwrap();
        let labels: Vec<&str> = records.iter().map(|r| r.unit_label.as_str()).collect();
        assert_eq!(labels, vec!["U1", "U2", "U3"]);
        assert_eq!(records[1].sector_name, None);
        assert_eq!(records[0].walks_ytd, 0);
        assert_eq!(records[1].walks_ytd, 0);
        assert_eq!(records[2].walks_ytd, 4);
        assert_eq!(report.coerced_walks, 2);
    }

    #[test]
    fn missing_column_is_a_schema_error() {
        let mut t = table(vec![row(Some("U1"), Some("01-Ops"), "D1-Smith", RawValue::Empty)]);
        t.columns[2] = "Region".to_string();
        match normalize(&t, &ColumnNames::default()) {
            Err(ReportError::Schema { missing }) => assert_eq!(missing, vec!["District"]),
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn everything_filtered_is_an_empty_result() {
        let t = table(vec![
            row(Some("U2"), Some("06-ESS Support Services"), "D1-Smith", RawValue::Number(5.0)),
            row(None, Some("01-Ops"), "D1-Smith", RawValue::Number(1.0)),
        ]);
        let err = normalize(&t, &ColumnNames::default()).unwrap_err();
        assert!(err.is_warning());

        let empty = table(Vec::new());
        assert!(matches!(
            normalize(&empty, &ColumnNames::default()),
            Err(ReportError::EmptyResult)
        ));
    }

    #[test]
    fn missing_district_groups_under_empty_key() {
        let mut r = row(Some("U1"), Some("01-Ops"), "", RawValue::Number(1.0));
        r[2] = RawValue::Empty;
        let (records, _) = normalize(&table(vec![r]), &ColumnNames::default()).unwrap();
        assert_eq!(records[0].district_key, "");
    }

    #[test]
    fn whitespace_cells_are_values_not_blanks() {
        let mut spaced = row(Some("  "), Some("01-Ops"), "  ", RawValue::Number(1.0));
        spaced[4] = text(" ");
        let mut blank = row(Some("U2"), Some("01-Ops"), "", RawValue::Number(1.0));
        blank[2] = RawValue::Empty;
        let (records, report) =
            normalize(&table(vec![spaced, blank]), &ColumnNames::default()).unwrap();
        assert_eq!(report.missing_label, 0);
        assert_eq!(records[0].unit_label, "  ");
        assert_eq!(records[0].district_key, "  ");
        assert_eq!(records[0].walks_ytd, 0);
        assert_eq!(records[1].district_key, "");
    }
}
