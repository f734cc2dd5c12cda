use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::aggregate::{aggregate_downtime, EntityDowntime};
use crate::availability::{availability_percent, format_percent};
use crate::domain::{Cause, Incident};
use crate::normalize::timestamps::parse_timestamp;
use crate::report::{compute_entity_availability, rank_by_downtime, DowntimeRank, ReportOptions};
use crate::universe::EntityUniverse;
use crate::window::{ReportWindow, WindowSummary};

pub const ANALYTICS_PAYLOAD_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryAvailability {
    pub category: String,
    pub downtime_minutes: f64,
    pub availability_percent: f64,
    pub availability_display: String,
    pub planned_incidents: usize,
    pub unplanned_incidents: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyticsSummary {
    pub version: u32,
    pub window: WindowSummary,
    pub total_incidents: usize,
    pub planned_incidents: usize,
    pub unplanned_incidents: usize,
    pub categories: Vec<CategoryAvailability>,
    pub top_downtime: Vec<DowntimeRank>,
}

/// A record counts toward the headline totals when both of its times parse and its recorded
/// span overlaps the window, endpoints included. The cause plays no part, and neither does the
/// order of the two times.
fn touches_window(incident: &Incident, window: &ReportWindow) -> bool {
    let down = parse_timestamp(incident.down_at.as_deref()).value();
    let up = parse_timestamp(incident.up_at.as_deref()).value();
    match (down, up) {
        (Some(down), Some(up)) => up >= window.start() && down <= window.end(),
        _ => false,
    }
}

/// Dashboard figures for one window.
///
/// Category availability here is the aggregate view: all downtime recorded for the category is
/// summed against a single window length (clamped), rather than averaged per entity.
///
/// The headline `total_incidents` counts every record touching the window, `Not Down` records
/// included, while `planned_incidents` and `unplanned_incidents` split that same set by cause.
/// The per-category counts only include outage intervals that add downtime.
pub fn build_analytics_summary(
    incidents: &[Incident],
    window: &ReportWindow,
    universe: &EntityUniverse,
    options: &ReportOptions,
) -> AnalyticsSummary {
    let downtime = aggregate_downtime(incidents, window, options.ongoing);

    let mut by_category: BTreeMap<String, EntityDowntime> = universe
        .categories()
        .map(|c| (c.to_string(), EntityDowntime::default()))
        .collect();
    for (key, d) in &downtime {
        let entry = by_category.entry(key.category.clone()).or_default();
        entry.planned_minutes += d.planned_minutes;
        entry.unplanned_minutes += d.unplanned_minutes;
        entry.planned_incidents += d.planned_incidents;
        entry.unplanned_incidents += d.unplanned_incidents;
    }
    if let Some(only) = options.category.as_deref() {
        by_category.retain(|c, _| c == only.trim());
    }

    let categories: Vec<CategoryAvailability> = by_category
        .into_iter()
        .map(|(category, d)| {
            let availability = availability_percent(d.total_minutes(), window);
            CategoryAvailability {
                category,
                downtime_minutes: d.total_minutes(),
                availability_percent: availability,
                availability_display: format_percent(availability),
                planned_incidents: d.planned_incidents,
                unplanned_incidents: d.unplanned_incidents,
            }
        })
        .collect();

    let counted: Vec<&Incident> = incidents
        .iter()
        .filter(|i| options.includes(i.category.trim()))
        .filter(|i| touches_window(i, window))
        .collect();
    let planned_incidents = counted.iter().filter(|i| i.cause == Cause::Planned).count();
    let unplanned_incidents = counted.iter().filter(|i| i.cause == Cause::Unplanned).count();

    let (entities, _) = compute_entity_availability(incidents, window, universe, options);
    let top_downtime = options.filter_ranking(rank_by_downtime(&entities, options.top_n));

    AnalyticsSummary {
        version: ANALYTICS_PAYLOAD_VERSION,
        window: window.summary(),
        total_incidents: counted.len(),
        planned_incidents,
        unplanned_incidents,
        categories,
        top_downtime,
    }
}
