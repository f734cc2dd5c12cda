use serde::{Deserialize, Serialize};

use crate::domain::{Cause, Incident, ValidationWarning};
use crate::normalize::timestamps::{parse_timestamp, ParsedTimestamp};

fn check_present(
    field: &str,
    ts: &ParsedTimestamp,
    warnings: &mut Vec<ValidationWarning>,
) -> bool {
    match ts {
        ParsedTimestamp::Parsed(_) => true,
        ParsedTimestamp::Missing => {
            warnings.push(ValidationWarning::new(
                "VALIDATION_TS_MISSING",
                format!("{field} not recorded; no downtime counted"),
            ));
            false
        }
        ParsedTimestamp::Unparseable(raw) => {
            warnings.push(
                ValidationWarning::new(
                    "VALIDATION_TS_UNPARSEABLE",
                    format!("Failed to parse {field}; no downtime counted"),
                )
                .with_details(format!("value={raw}")),
            );
            false
        }
    }
}

/// Explain why an incident would not contribute downtime.
///
/// An empty result means the record yields a positive outage interval. The engine never needs
/// these warnings; they exist so operators can fix their entries.
pub fn validate_incident(incident: &Incident) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let down = parse_timestamp(incident.down_at.as_deref());
    let up = parse_timestamp(incident.up_at.as_deref());

    if incident.cause == Cause::NotDown {
        if down.value().is_some() && up.value().is_some() {
            warnings.push(
                ValidationWarning::new(
                    "VALIDATION_NOT_DOWN_WITH_TIMES",
                    "Record is marked Not Down but has down/up times; times are ignored",
                )
                .with_details(format!("entity={}", incident.entity_id)),
            );
        }
        return warnings;
    }

    if matches!(down, ParsedTimestamp::Parsed(_)) && up == ParsedTimestamp::Missing {
        warnings.push(
            ValidationWarning::new(
                "VALIDATION_ONGOING",
                "Outage has no up time; it is excluded unless ongoing outages are counted",
            )
            .with_details(format!("entity={}", incident.entity_id)),
        );
        return warnings;
    }

    let down_ok = check_present("downTimeDate", &down, &mut warnings);
    let up_ok = check_present("upTimeDate", &up, &mut warnings);
    if let (true, true, Some(d), Some(u)) = (down_ok, up_ok, down.value(), up.value()) {
        if u <= d {
            warnings.push(
                ValidationWarning::new(
                    "VALIDATION_TS_ORDER_VIOLATION",
                    "upTimeDate must be after downTimeDate",
                )
                .with_details(format!(
                    "downTimeDate={}; upTimeDate={}",
                    incident.down_at.as_deref().unwrap_or(""),
                    incident.up_at.as_deref().unwrap_or("")
                )),
            );
        }
    }

    warnings
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IncidentValidationReportItem {
    pub id: Option<i64>,
    pub category: String,
    pub entity_id: String,
    pub warnings: Vec<ValidationWarning>,
}

/// Validation items for every record with at least one warning, in a stable order
/// (category, entity, id).
pub fn validate_all_incidents(incidents: &[Incident]) -> Vec<IncidentValidationReportItem> {
    let mut out: Vec<IncidentValidationReportItem> = incidents
        .iter()
        .filter_map(|inc| {
            let warnings = validate_incident(inc);
            (!warnings.is_empty()).then(|| IncidentValidationReportItem {
                id: inc.id,
                category: inc.category.clone(),
                entity_id: inc.entity_id.clone(),
                warnings,
            })
        })
        .collect();

    out.sort_by(|a, b| {
        (a.category.as_str(), a.entity_id.as_str(), a.id)
            .cmp(&(b.category.as_str(), b.entity_id.as_str(), b.id))
    });
    out
}
