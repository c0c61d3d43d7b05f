use crate::error::ReportError;
use crate::types::{DistrictAggregate, UnitRecord};
use crate::util::district_display_name;
use std::collections::HashMap;
use tracing::debug;

/// Expected walks per unit for the current period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodTarget(u32);

impl PeriodTarget {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 12;

    pub fn new(value: u32) -> Result<Self, ReportError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(PeriodTarget(value))
        } else {
            Err(ReportError::InvalidTarget(value))
        }
    }

    pub fn get(self) -> u64 {
        self.0 as u64
    }
}

impl Default for PeriodTarget {
    fn default() -> Self {
        PeriodTarget(3)
    }
}

#[derive(Debug, Clone)]
pub struct Aggregates {
    pub overall: DistrictAggregate,
    /// In presentation order: by manager name, then first appearance.
    pub districts: Vec<DistrictAggregate>,
}

pub fn aggregate(records: &[UnitRecord], target: PeriodTarget) -> Aggregates {
    let overall = summarize("", "All Units", records.iter(), target);

    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&UnitRecord>> = HashMap::new();
    for r in records {
        let e = groups.entry(r.district_key.as_str()).or_insert_with(|| {
            order.push(r.district_key.as_str());
            Vec::new()
        });
        e.push(r);
    }

    // Stable sort keeps first-appearance order for equal names.
    let mut keyed: Vec<(String, &str)> = order
        .into_iter()
        .map(|key| (district_display_name(key), key))
        .collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));

    let districts: Vec<DistrictAggregate> = keyed
        .into_iter()
        .map(|(name, key)| {
            let members = groups.remove(key).unwrap_or_default();
            summarize(key, &name, members.into_iter(), target)
        })
        .collect();
    debug!(districts = districts.len(), "aggregated districts");

    Aggregates { overall, districts }
}

fn summarize<'a>(
    key: &str,
    display_name: &str,
    members: impl Iterator<Item = &'a UnitRecord>,
    target: PeriodTarget,
) -> DistrictAggregate {
    let mut unit_count = 0u64;
    let mut actual_total = 0u64;
    let mut behind_units: Vec<UnitRecord> = Vec::new();
    for r in members {
        unit_count += 1;
        // Corrupt cells can hold absurd counts; totals stop at u64::MAX.
        actual_total = actual_total.saturating_add(r.walks_ytd);
        if r.walks_ytd < target.get() {
            behind_units.push(r.clone());
        }
    }
    // `sort_by_key` is stable, so ties stay in input order.
    behind_units.sort_by_key(|r| r.walks_ytd);
    DistrictAggregate {
        district_key: key.to_string(),
        display_name: display_name.to_string(),
        unit_count,
        target_total: unit_count.saturating_mul(target.get()),
        actual_total,
        behind_units,
    }
}
