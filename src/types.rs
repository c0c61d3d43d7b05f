use serde::Serialize;
use tabled::Tabled;

/// A single cell as it came out of the uploaded file, before any cleaning.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Empty,
    Text(String),
    Number(f64),
}

impl RawValue {
    /// Build a cell from text. Only a zero-length cell is empty; whitespace
    /// is kept as text.
    pub fn from_text(s: &str) -> Self {
        if s.is_empty() {
            RawValue::Empty
        } else {
            RawValue::Text(s.to_string())
        }
    }

    /// Text view of the cell. Numbers render without a trailing `.0`
    /// so that a numeric district code reads the same as typed.
    pub fn as_text(&self) -> Option<String> {
        match self {
            RawValue::Empty => None,
            RawValue::Text(s) => Some(s.clone()),
            RawValue::Number(n) if n.fract() == 0.0 && n.is_finite() => {
                Some(format!("{}", *n as i64))
            }
            RawValue::Number(n) => Some(n.to_string()),
        }
    }
}

/// Header names plus rows of raw cells, in file order.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<RawValue>>,
}

impl RawTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.trim() == name)
    }

    /// Cell lookup that tolerates short rows.
    pub fn cell(&self, row: usize, col: usize) -> &RawValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&RawValue::Empty)
    }
}

/// One retained unit after cleaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitRecord {
    pub unit_label: String,
    pub sector_name: Option<String>,
    pub district_key: String,
    pub unit_type: String,
    pub walks_ytd: u64,
}

/// Totals for one district, or for every retained unit when used as the
/// overall aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistrictAggregate {
    pub district_key: String,
    pub display_name: String,
    pub unit_count: u64,
    pub target_total: u64,
    pub actual_total: u64,
    pub behind_units: Vec<UnitRecord>,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq, Eq)]
pub struct BehindUnitRow {
    #[serde(rename = "Unit")]
    #[tabled(rename = "Unit # - Unit Name")]
    pub unit_label: String,
    #[serde(rename = "UnitType")]
    #[tabled(rename = "Unit Type")]
    pub unit_type: String,
    #[serde(rename = "WalksYTD")]
    #[tabled(rename = "Walks YTD")]
    pub walks_ytd: u64,
}

impl From<&UnitRecord> for BehindUnitRow {
    fn from(r: &UnitRecord) -> Self {
        BehindUnitRow {
            unit_label: r.unit_label.clone(),
            unit_type: r.unit_type.clone(),
            walks_ytd: r.walks_ytd,
        }
    }
}

/// Flat row for the `behind_target.csv` export.
#[derive(Debug, Serialize, Clone)]
pub struct BehindExportRow {
    #[serde(rename = "District")]
    pub district: String,
    #[serde(rename = "Unit # - Unit Name")]
    pub unit_label: String,
    #[serde(rename = "Unit Type")]
    pub unit_type: String,
    #[serde(rename = "Walks YTD")]
    pub walks_ytd: u64,
}
