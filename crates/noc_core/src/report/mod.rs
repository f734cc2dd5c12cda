use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::aggregate::{aggregate_downtime, EntityDowntime};
use crate::availability::{
    availability_percent, downtime_percent, format_percent, round2, share_percent,
    FULL_AVAILABILITY,
};
use crate::domain::{EntityKey, Incident, ValidationWarning};
use crate::normalize::interval::OngoingPolicy;
use crate::universe::EntityUniverse;
use crate::window::{ReportWindow, WindowSummary};

pub mod sectors;
pub mod trend;

pub const AVAILABILITY_REPORT_VERSION: u32 = 1;
pub const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    /// Restrict the report to one category.
    pub category: Option<String>,
    /// Length of the downtime ranking.
    pub top_n: usize,
    pub ongoing: OngoingPolicy,
    /// Case-insensitive substring an entity id must contain to stay in the downtime ranking.
    pub entity_filter: Option<String>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            category: None,
            top_n: DEFAULT_TOP_N,
            ongoing: OngoingPolicy::Exclude,
            entity_filter: None,
        }
    }
}

impl ReportOptions {
    pub fn for_category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            ..Self::default()
        }
    }

    pub(crate) fn includes(&self, category: &str) -> bool {
        self.category
            .as_deref()
            .map_or(true, |c| c.trim() == category)
    }

    /// Apply `entity_filter` to an already ranked list. Ranks are kept as computed, so a match
    /// still shows where it stands overall.
    pub fn filter_ranking(&self, ranked: Vec<DowntimeRank>) -> Vec<DowntimeRank> {
        let Some(needle) = self
            .entity_filter
            .as_deref()
            .map(|f| f.trim().to_lowercase())
            .filter(|f| !f.is_empty())
        else {
            return ranked;
        };
        ranked
            .into_iter()
            .filter(|r| r.entity_id.to_lowercase().contains(&needle))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntityAvailability {
    pub entity_id: String,
    pub category: String,
    /// Unrounded; see `availability_display` for the table value.
    pub availability_percent: f64,
    pub availability_display: String,
    pub planned_downtime_minutes: f64,
    pub unplanned_downtime_minutes: f64,
    pub total_downtime_minutes: f64,
    pub planned_downtime_percent: f64,
    pub unplanned_downtime_percent: f64,
    pub incident_count: usize,
    pub remarks: Vec<String>,
    /// False when the entity only showed up through incidents, not through the universe.
    pub recognized: bool,
}

impl EntityAvailability {
    fn from_downtime(
        key: EntityKey,
        downtime: EntityDowntime,
        window: &ReportWindow,
        recognized: bool,
    ) -> Self {
        let total = downtime.total_minutes();
        let availability = availability_percent(total, window);
        Self {
            entity_id: key.entity_id,
            category: key.category,
            availability_percent: availability,
            availability_display: format_percent(availability),
            planned_downtime_minutes: downtime.planned_minutes,
            unplanned_downtime_minutes: downtime.unplanned_minutes,
            total_downtime_minutes: total,
            planned_downtime_percent: downtime_percent(downtime.planned_minutes, window),
            unplanned_downtime_percent: downtime_percent(downtime.unplanned_minutes, window),
            incident_count: downtime.incident_count(),
            remarks: downtime.remarks,
            recognized,
        }
    }

    /// Judged on the two-decimal value, so an entity shown as `100.00` counts as perfect uptime.
    pub fn has_downtime(&self) -> bool {
        round2(self.availability_percent) < FULL_AVAILABILITY
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryRollup {
    pub category: String,
    pub total_entities: usize,
    pub perfect_uptime_count: usize,
    pub has_downtime_count: usize,
    pub perfect_uptime_percent: f64,
    pub has_downtime_percent: f64,
    pub planned_downtime_minutes: f64,
    pub unplanned_downtime_minutes: f64,
    pub perfect_uptime: Vec<String>,
    pub has_downtime: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DowntimeRank {
    pub rank: usize,
    pub entity_id: String,
    pub category: String,
    pub total_downtime_minutes: f64,
    pub availability_percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AvailabilityReport {
    pub version: u32,
    pub window: WindowSummary,
    pub entities: Vec<EntityAvailability>,
    pub categories: Vec<CategoryRollup>,
    pub top_downtime: Vec<DowntimeRank>,
    pub warnings: Vec<ValidationWarning>,
}

/// Per-entity availability for every entity of the universe plus every entity that had downtime.
///
/// Ordering is stable: category, then entity id. Entities that had downtime but are not part of
/// the universe are kept (their downtime is real) and reported through an
/// `UNRECOGNIZED_ENTITY` warning.
pub fn compute_entity_availability(
    incidents: &[Incident],
    window: &ReportWindow,
    universe: &EntityUniverse,
    options: &ReportOptions,
) -> (Vec<EntityAvailability>, Vec<ValidationWarning>) {
    let mut warnings = Vec::new();

    let mut downtime: BTreeMap<EntityKey, EntityDowntime> =
        aggregate_downtime(incidents, window, options.ongoing)
            .into_iter()
            .filter(|(key, _)| options.includes(&key.category))
            .collect();

    for key in universe.keys().filter(|k| options.includes(&k.category)) {
        downtime.entry(key).or_default();
    }

    let mut out = Vec::with_capacity(downtime.len());
    for (key, entity_downtime) in downtime {
        let recognized = universe.contains(&key);
        if !recognized {
            tracing::warn!(
                category = %key.category,
                entity = %key.entity_id,
                "incident references an entity outside the configured universe"
            );
            warnings.push(
                ValidationWarning::new(
                    "UNRECOGNIZED_ENTITY",
                    format!("Entity {} is not part of the entity universe", key.entity_id),
                )
                .with_details(format!("category={}", key.category)),
            );
        }
        out.push(EntityAvailability::from_downtime(
            key,
            entity_downtime,
            window,
            recognized,
        ));
    }

    (out, warnings)
}

/// Partition each category's entities into perfect uptime and had downtime.
pub fn rollup_categories(entities: &[EntityAvailability]) -> Vec<CategoryRollup> {
    let mut by_category: BTreeMap<&str, Vec<&EntityAvailability>> = BTreeMap::new();
    for e in entities {
        by_category.entry(e.category.as_str()).or_default().push(e);
    }

    by_category
        .into_iter()
        .map(|(category, members)| {
            let (down, perfect): (Vec<&EntityAvailability>, Vec<&EntityAvailability>) =
                members.iter().copied().partition(|e| e.has_downtime());
            let total = members.len();
            CategoryRollup {
                category: category.to_string(),
                total_entities: total,
                perfect_uptime_count: perfect.len(),
                has_downtime_count: down.len(),
                perfect_uptime_percent: share_percent(perfect.len(), total),
                has_downtime_percent: share_percent(down.len(), total),
                planned_downtime_minutes: members.iter().map(|e| e.planned_downtime_minutes).sum(),
                unplanned_downtime_minutes: members
                    .iter()
                    .map(|e| e.unplanned_downtime_minutes)
                    .sum(),
                perfect_uptime: perfect.iter().map(|e| e.entity_id.clone()).collect(),
                has_downtime: down.iter().map(|e| e.entity_id.clone()).collect(),
            }
        })
        .collect()
}

/// Entities with downtime, most downtime first; ties broken by entity id then category.
pub fn rank_by_downtime(entities: &[EntityAvailability], n: usize) -> Vec<DowntimeRank> {
    let mut ranked: Vec<&EntityAvailability> = entities
        .iter()
        .filter(|e| e.total_downtime_minutes > 0.0)
        .collect();
    ranked.sort_by(|a, b| {
        b.total_downtime_minutes
            .total_cmp(&a.total_downtime_minutes)
            .then_with(|| a.entity_id.cmp(&b.entity_id))
            .then_with(|| a.category.cmp(&b.category))
    });
    ranked
        .into_iter()
        .take(n)
        .enumerate()
        .map(|(i, e)| DowntimeRank {
            rank: i + 1,
            entity_id: e.entity_id.clone(),
            category: e.category.clone(),
            total_downtime_minutes: e.total_downtime_minutes,
            availability_percent: e.availability_percent,
        })
        .collect()
}

/// Build the full availability report for one window.
pub fn build_availability_report(
    incidents: &[Incident],
    window: &ReportWindow,
    universe: &EntityUniverse,
    options: &ReportOptions,
) -> AvailabilityReport {
    let mut warnings = Vec::new();
    if window.is_degenerate() {
        warnings.push(
            ValidationWarning::new(
                "WINDOW_DEGENERATE",
                "Report window has zero length; every entity reads as fully available",
            )
            .with_details(format!("start={}", window.summary().start)),
        );
    }

    let (entities, entity_warnings) =
        compute_entity_availability(incidents, window, universe, options);
    warnings.extend(entity_warnings);

    let categories = rollup_categories(&entities);
    let top_downtime = options.filter_ranking(rank_by_downtime(&entities, options.top_n));

    tracing::info!(
        entities = entities.len(),
        categories = categories.len(),
        warnings = warnings.len(),
        window_minutes = window.minutes(),
        "built availability report"
    );

    AvailabilityReport {
        version: AVAILABILITY_REPORT_VERSION,
        window: window.summary(),
        entities,
        categories,
        top_downtime,
        warnings,
    }
}
