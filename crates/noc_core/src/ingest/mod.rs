//! Loading incident records handed over by the persistence layer.
//!
//! Both supported formats use the field names of the incident log's own export
//! (`subValue`, `downTimeDate`, `upTimeDate`, `downType`, `remarks`, ...). Rows are mapped onto
//! [`Incident`] without interpreting their timing data beyond surfacing warnings; deciding what
//! counts as downtime is the engine's job.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::{Cause, Incident, ValidationWarning, NOT_RECORDED};
use crate::error::{AppError, INGEST_READ_FAILED};
use crate::normalize::timestamps::{parse_timestamp, ParsedTimestamp};

pub mod export_csv;
pub mod export_json;

/// One row of the incident log export.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IncidentExportRow {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub sub_value: Option<String>,
    #[serde(default)]
    pub down_time_date: Option<String>,
    #[serde(default)]
    pub up_time_date: Option<String>,
    #[serde(default)]
    pub down_type: Option<String>,
    #[serde(default)]
    pub escalated_person: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngestConflict {
    /// 1-based data row (header excluded).
    pub row: usize,
    pub reason: String,
    pub id: Option<i64>,
    pub fingerprint: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngestSummary {
    pub incidents: Vec<Incident>,
    pub skipped: usize,
    pub conflicts: Vec<IngestConflict>,
    pub warnings: Vec<ValidationWarning>,
}

fn clean(raw: Option<String>) -> Option<String> {
    raw.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Stable fingerprint of a row: id plus every field that matters to downtime computation.
pub fn fingerprint(incident: &Incident) -> String {
    let payload = format!(
        "id={}|category={}|entity={}|down={}|up={}|cause={}|note={}",
        incident.id.map(|id| id.to_string()).unwrap_or_default(),
        incident.category,
        incident.entity_id,
        incident.down_at.as_deref().unwrap_or(""),
        incident.up_at.as_deref().unwrap_or(""),
        incident.cause.label(),
        incident.note.as_deref().unwrap_or("")
    );
    hex::encode(Sha256::digest(payload.as_bytes()))
}

fn parse_cause(row_idx: usize, raw: Option<&str>, warnings: &mut Vec<ValidationWarning>) -> Cause {
    match raw {
        None | Some(NOT_RECORDED) => {
            warnings.push(
                ValidationWarning::new(
                    "INGEST_CAUSE_MISSING",
                    "Missing downType; treated as Not Down",
                )
                .with_details(format!("row={row_idx}")),
            );
            Cause::NotDown
        }
        Some(v) => Cause::parse(v).unwrap_or_else(|| {
            warnings.push(
                ValidationWarning::new(
                    "INGEST_CAUSE_UNKNOWN",
                    "Unknown downType; treated as Not Down",
                )
                .with_details(format!("row={row_idx}; value={v}")),
            );
            Cause::NotDown
        }),
    }
}

fn check_timestamp(
    row_idx: usize,
    field: &str,
    raw: Option<&str>,
    warnings: &mut Vec<ValidationWarning>,
) {
    if let ParsedTimestamp::Unparseable(v) = parse_timestamp(raw) {
        warnings.push(
            ValidationWarning::new(
                "INGEST_TS_UNPARSEABLE",
                format!("Unparseable {field}; record will not contribute downtime"),
            )
            .with_details(format!("row={row_idx}; value={v}")),
        );
    }
}

/// Map one export row onto an [`Incident`]. Rows without a category or sub-value cannot be
/// attributed to an entity and yield `None`.
fn row_to_incident(
    row_idx: usize,
    row: IncidentExportRow,
    warnings: &mut Vec<ValidationWarning>,
) -> Option<Incident> {
    let category = clean(row.category);
    let entity_id = clean(row.sub_value);
    let (Some(category), Some(entity_id)) = (category, entity_id) else {
        warnings.push(
            ValidationWarning::new(
                "INGEST_ROW_INCOMPLETE",
                "Row has no category or subValue; skipped",
            )
            .with_details(format!("row={row_idx}")),
        );
        return None;
    };

    let down_at = clean(row.down_time_date);
    let up_at = clean(row.up_time_date);
    check_timestamp(row_idx, "downTimeDate", down_at.as_deref(), warnings);
    check_timestamp(row_idx, "upTimeDate", up_at.as_deref(), warnings);
    let cause = parse_cause(row_idx, clean(row.down_type).as_deref(), warnings);

    Some(Incident {
        id: row.id,
        entity_id,
        category,
        down_at,
        up_at,
        cause,
        note: clean(row.remarks),
        escalated_person: clean(row.escalated_person),
    })
}

/// Shared tail of both loaders: mapping, de-duplication and conflict reporting.
///
/// - Identical rows (same fingerprint) are kept once; later copies are skipped as `duplicate`.
/// - A numeric id reused with different content keeps the first row; later ones are skipped as
///   `id_conflict`.
/// - A row that could not be decoded (wrong field types, broken CSV record) is skipped with an
///   `INGEST_ROW_INVALID` warning; the rest of the export still loads.
pub(crate) fn collect_rows<I>(rows: I) -> IngestSummary
where
    I: IntoIterator<Item = (usize, Result<IncidentExportRow, String>)>,
{
    let mut summary = IngestSummary::default();
    let mut seen_fingerprints: BTreeSet<String> = BTreeSet::new();
    let mut seen_ids: BTreeMap<i64, String> = BTreeMap::new();

    for (row_idx, decoded) in rows {
        let row = match decoded {
            Ok(row) => row,
            Err(err) => {
                tracing::debug!(row = row_idx, %err, "skipping undecodable export row");
                summary.warnings.push(
                    ValidationWarning::new("INGEST_ROW_INVALID", "Row could not be read; skipped")
                        .with_details(format!("row={row_idx}; err={err}")),
                );
                summary.skipped += 1;
                continue;
            }
        };
        let Some(incident) = row_to_incident(row_idx, row, &mut summary.warnings) else {
            summary.skipped += 1;
            continue;
        };
        let fp = fingerprint(&incident);

        if seen_fingerprints.contains(&fp) {
            summary.skipped += 1;
            summary.conflicts.push(IngestConflict {
                row: row_idx,
                reason: "duplicate".to_string(),
                id: incident.id,
                fingerprint: fp,
            });
            continue;
        }
        if let Some(id) = incident.id {
            if seen_ids.get(&id).is_some_and(|existing| existing != &fp) {
                summary.skipped += 1;
                summary.conflicts.push(IngestConflict {
                    row: row_idx,
                    reason: "id_conflict".to_string(),
                    id: Some(id),
                    fingerprint: fp,
                });
                continue;
            }
            seen_ids.insert(id, fp.clone());
        }

        seen_fingerprints.insert(fp);
        summary.incidents.push(incident);
    }

    tracing::info!(
        loaded = summary.incidents.len(),
        skipped = summary.skipped,
        conflicts = summary.conflicts.len(),
        warnings = summary.warnings.len(),
        "ingested incident rows"
    );
    summary
}

/// Load an export file, choosing the format by extension (`.json`, anything else as CSV).
pub fn load_incidents_file(path: &Path) -> Result<IngestSummary, AppError> {
    let text = fs::read_to_string(path).map_err(|e| {
        AppError::new(INGEST_READ_FAILED, "Failed to read incident export")
            .with_details(format!("path={}; err={e}", path.display()))
    })?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        export_json::ingest_incidents_json(&text)
    } else {
        export_csv::ingest_incidents_csv(&text)
    }
}
