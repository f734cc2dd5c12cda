use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::availability::share_percent;
use crate::domain::{Incident, ValidationWarning};
use crate::report::{compute_entity_availability, EntityAvailability, ReportOptions};
use crate::sector::{classify_sector, Sector};
use crate::universe::EntityUniverse;
use crate::window::{ReportWindow, WindowSummary};

pub const SECTOR_REPORT_VERSION: u32 = 1;
pub const DEFAULT_SECTOR_CATEGORY: &str = "WAN Firewall";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SectorSummary {
    pub sector: Sector,
    pub label: String,
    pub total_entities: usize,
    pub perfect_uptime_count: usize,
    pub has_downtime_count: usize,
    pub perfect_uptime_percent: f64,
    pub has_downtime_percent: f64,
    pub perfect_uptime: Vec<EntityAvailability>,
    pub has_downtime: Vec<EntityAvailability>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SectorReport {
    pub version: u32,
    pub category: String,
    pub window: WindowSummary,
    pub sectors: Vec<SectorSummary>,
    pub warnings: Vec<ValidationWarning>,
}

/// Per-sector availability split for one category.
///
/// Entities whose id matches no sector prefix are dropped. Sectors without entities are omitted.
/// Sectors appear in their fixed table order.
pub fn build_sector_report(
    incidents: &[Incident],
    window: &ReportWindow,
    universe: &EntityUniverse,
    category: &str,
    options: &ReportOptions,
) -> SectorReport {
    let options = ReportOptions {
        category: Some(category.to_string()),
        ..options.clone()
    };
    let (entities, warnings) = compute_entity_availability(incidents, window, universe, &options);

    let mut by_sector: BTreeMap<Sector, Vec<EntityAvailability>> = BTreeMap::new();
    let mut other = 0usize;
    for entity in entities {
        match classify_sector(&entity.entity_id) {
            Sector::Other => other += 1,
            sector => by_sector.entry(sector).or_default().push(entity),
        }
    }
    if other > 0 {
        tracing::debug!(category, other, "entities without a sector prefix left out");
    }

    let sectors = Sector::REPORTED
        .iter()
        .filter_map(|sector| by_sector.remove(sector).map(|members| (*sector, members)))
        .map(|(sector, members)| {
            let total = members.len();
            let (has_downtime, perfect_uptime): (Vec<_>, Vec<_>) =
                members.into_iter().partition(EntityAvailability::has_downtime);
            SectorSummary {
                sector,
                label: sector.label().to_string(),
                total_entities: total,
                perfect_uptime_count: perfect_uptime.len(),
                has_downtime_count: has_downtime.len(),
                perfect_uptime_percent: share_percent(perfect_uptime.len(), total),
                has_downtime_percent: share_percent(has_downtime.len(), total),
                perfect_uptime,
                has_downtime,
            }
        })
        .collect();

    SectorReport {
        version: SECTOR_REPORT_VERSION,
        category: category.to_string(),
        window: window.summary(),
        sectors,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Cause;

    #[test]
    fn other_bucket_is_never_reported() {
        let universe = EntityUniverse::from_config(vec![(
            DEFAULT_SECTOR_CATEGORY,
            vec!["ADV-FW-1", "ADV-FW-2", "HQ-FW", "DPL_FW"],
        )]);
        let incidents = vec![Incident::new(
            DEFAULT_SECTOR_CATEGORY,
            "ADV-FW-2",
            Some("2024-03-05T08:00"),
            Some("2024-03-05T09:00"),
            Cause::Unplanned,
        )];
        let window = ReportWindow::calendar_month(2024, 3).expect("window");
        let report = build_sector_report(
            &incidents,
            &window,
            &universe,
            DEFAULT_SECTOR_CATEGORY,
            &ReportOptions::default(),
        );
        let labels: Vec<&str> = report.sectors.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Advantis", "DPL"]);
        let adv = &report.sectors[0];
        assert_eq!(adv.total_entities, 2);
        assert_eq!(adv.perfect_uptime_count, 1);
        assert_eq!(adv.has_downtime[0].entity_id, "ADV-FW-2");
        assert_eq!(adv.has_downtime_percent, 50.0);
    }
}
