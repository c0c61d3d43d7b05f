use crate::aggregate::{Aggregates, PeriodTarget};
use crate::chart::ChartSegments;
use crate::types::{BehindExportRow, BehindUnitRow, DistrictAggregate};
use crate::util::{compliance_pct, format_percent};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ReportSection {
    pub district_key: String,
    pub display_name: String,
    pub unit_count: u64,
    pub target_total: u64,
    pub actual_total: u64,
    pub compliance_pct: Option<f64>,
    pub behind_units: Vec<BehindUnitRow>,
    pub chart: ChartSegments,
}

impl ReportSection {
    fn from_aggregate(agg: &DistrictAggregate) -> Self {
        ReportSection {
            district_key: agg.district_key.clone(),
            display_name: agg.display_name.clone(),
            unit_count: agg.unit_count,
            target_total: agg.target_total,
            actual_total: agg.actual_total,
            compliance_pct: compliance_pct(agg.actual_total, agg.target_total),
            behind_units: agg.behind_units.iter().map(BehindUnitRow::from).collect(),
            chart: ChartSegments::build(agg.actual_total, agg.target_total),
        }
    }

    pub fn compliance(&self) -> String {
        format_percent(self.compliance_pct)
    }

    /// Collapsed-section heading for a district.
    pub fn heading(&self) -> String {
        format!(
            "{} — {} units | Target: {} walks | Actual: {} walks",
            self.district_key, self.unit_count, self.target_total, self.actual_total
        )
    }

    pub fn chart_title(&self, name: &str) -> String {
        self.chart.title(name, self.actual_total, self.target_total)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub current_period_target: u64,
    pub overall: ReportSection,
    pub districts: Vec<ReportSection>,
}

impl Report {
    /// Behind-target units across all districts, in report order.
    pub fn behind_rows(&self) -> Vec<BehindExportRow> {
        self.districts
            .iter()
            .flat_map(|d| {
                d.behind_units.iter().map(move |u| BehindExportRow {
                    district: d.district_key.clone(),
                    unit_label: u.unit_label.clone(),
                    unit_type: u.unit_type.clone(),
                    walks_ytd: u.walks_ytd,
                })
            })
            .collect()
    }
}

pub fn assemble(aggregates: &Aggregates, target: PeriodTarget) -> Report {
    Report {
        current_period_target: target.get(),
        overall: ReportSection::from_aggregate(&aggregates.overall),
        districts: aggregates
            .districts
            .iter()
            .map(ReportSection::from_aggregate)
            .collect(),
    }
}
