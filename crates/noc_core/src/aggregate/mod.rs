use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Cause, EntityKey, Incident};
use crate::normalize::interval::{normalize_interval, OngoingPolicy};
use crate::window::{clip_interval, ReportWindow};

/// Downtime accumulated by one entity inside a window. Values are unrounded minutes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EntityDowntime {
    pub planned_minutes: f64,
    pub unplanned_minutes: f64,
    /// Outage intervals that touched the window, per cause.
    pub planned_incidents: usize,
    pub unplanned_incidents: usize,
    /// One line per counted interval, e.g. `"Planned : firmware upgrade (45 m)"`.
    pub remarks: Vec<String>,
}

impl EntityDowntime {
    pub fn total_minutes(&self) -> f64 {
        self.planned_minutes + self.unplanned_minutes
    }

    pub fn incident_count(&self) -> usize {
        self.planned_incidents + self.unplanned_incidents
    }

    fn add(&mut self, cause: Cause, minutes: f64, note: Option<&str>) {
        match cause {
            Cause::Planned => {
                self.planned_minutes += minutes;
                self.planned_incidents += 1;
            }
            Cause::Unplanned => {
                self.unplanned_minutes += minutes;
                self.unplanned_incidents += 1;
            }
            // Filtered out by the normalizer.
            Cause::NotDown => return,
        }
        let rounded = minutes.round() as i64;
        let line = match note {
            Some(note) => format!("{} : {note} ({rounded} m)", cause.label()),
            None => format!("{} : {rounded} m", cause.label()),
        };
        self.remarks.push(line);
    }
}

/// Sum clipped downtime per entity and cause.
///
/// Only entities with at least one interval touching the window appear in the result; callers
/// that need zero rows for quiet entities combine this with an [`crate::universe::EntityUniverse`].
pub fn aggregate_downtime(
    incidents: &[Incident],
    window: &ReportWindow,
    ongoing: OngoingPolicy,
) -> BTreeMap<EntityKey, EntityDowntime> {
    let mut out: BTreeMap<EntityKey, EntityDowntime> = BTreeMap::new();
    let mut skipped = 0usize;
    let mut outside = 0usize;

    for inc in incidents {
        let Some(interval) = normalize_interval(inc, ongoing) else {
            skipped += 1;
            continue;
        };
        let Some(clipped) = clip_interval(&interval, window) else {
            outside += 1;
            continue;
        };
        out.entry(EntityKey::of(inc))
            .or_default()
            .add(inc.cause, clipped.minutes, inc.remark());
    }

    tracing::debug!(
        records = incidents.len(),
        entities = out.len(),
        skipped,
        outside,
        "aggregated downtime"
    );
    out
}
