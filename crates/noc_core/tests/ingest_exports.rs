use std::fs;

use pretty_assertions::assert_eq;
use tempfile::tempdir;

use noc_core::domain::Cause;
use noc_core::error::{INGEST_JSON_INVALID, INGEST_MISSING_COLUMN, INGEST_READ_FAILED};
use noc_core::ingest::export_csv::ingest_incidents_csv;
use noc_core::ingest::export_json::ingest_incidents_json;
use noc_core::ingest::{fingerprint, load_incidents_file};

const EXPORT_JSON: &str = r#"[
  {"_id": "65f1", "id": 1, "category": "Core Switch", "subValue": "SW-1",
   "downTimeDate": "2024-03-10T10:00", "upTimeDate": "2024-03-10T11:30",
   "downType": "Unplanned", "escalatedPerson": "Kasun", "remarks": "fiber cut", "__v": 0},
  {"id": 2, "category": "Core Switch", "subValue": "SW-2",
   "downTimeDate": "-", "upTimeDate": "-", "downType": "Not Down",
   "escalatedPerson": "-", "remarks": "-"},
  {"id": 3, "category": "WAN Firewall", "subValue": "ADV-FW-1",
   "downTimeDate": "2024-03-11 08:00", "upTimeDate": "tomorrow", "downType": "planned"},
  {"id": 4, "category": "", "subValue": "SW-9", "downType": "Unplanned"},
  {"id": 5, "category": "WAN Firewall", "subValue": "DPL-FW-1", "downType": "Maintenance"}
]"#;

#[test]
fn json_export_maps_onto_incidents() {
    let summary = ingest_incidents_json(EXPORT_JSON).expect("ingest");
    assert_eq!(summary.incidents.len(), 4);
    assert_eq!(summary.skipped, 1);
    assert!(summary.conflicts.is_empty());

    let first = &summary.incidents[0];
    assert_eq!(first.id, Some(1));
    assert_eq!(first.entity_id, "SW-1");
    assert_eq!(first.cause, Cause::Unplanned);
    assert_eq!(first.note.as_deref(), Some("fiber cut"));
    assert_eq!(first.escalated_person.as_deref(), Some("Kasun"));

    assert_eq!(summary.incidents[1].cause, Cause::NotDown);
    assert_eq!(summary.incidents[2].cause, Cause::Planned);

    let mut codes: Vec<&str> = summary.warnings.iter().map(|w| w.code.as_str()).collect();
    codes.sort();
    assert_eq!(
        codes,
        vec!["INGEST_CAUSE_UNKNOWN", "INGEST_ROW_INCOMPLETE", "INGEST_TS_UNPARSEABLE"]
    );
}

#[test]
fn json_that_is_not_an_array_is_rejected() {
    let err = ingest_incidents_json(r#"{"incidents": []}"#).expect_err("object");
    assert_eq!(err.code, INGEST_JSON_INVALID);
}

#[test]
fn csv_export_with_duplicates_and_id_reuse() {
    let csv_text = "\
id,category,subValue,downTimeDate,upTimeDate,downType,escalatedPerson,remarks
1,Core Switch,SW-1,2024-03-10T10:00,2024-03-10T11:30,Unplanned,Kasun,fiber cut
1,Core Switch,SW-1,2024-03-10T10:00,2024-03-10T11:30,Unplanned,Kasun,fiber cut
1,Core Switch,SW-1,2024-03-12T10:00,2024-03-12T11:30,Planned,Kasun,patching
,WAN Firewall,ADV-FW-1,2024-03-01T00:00,2024-03-01T00:10,Planned,,
";
    let summary = ingest_incidents_csv(csv_text).expect("ingest");
    assert_eq!(summary.incidents.len(), 2);
    assert_eq!(summary.skipped, 2);
    let reasons: Vec<(usize, &str)> = summary
        .conflicts
        .iter()
        .map(|c| (c.row, c.reason.as_str()))
        .collect();
    assert_eq!(reasons, vec![(2, "duplicate"), (3, "id_conflict")]);
    assert_eq!(summary.incidents[1].id, None);
    assert_eq!(summary.incidents[1].note, None);
}

#[test]
fn json_row_with_a_wrong_field_type_is_skipped_alone() {
    let json_text = r#"[
  {"id": 1, "category": "Core Switch", "subValue": "SW-1",
   "downTimeDate": "2024-03-10T10:00", "upTimeDate": "2024-03-10T11:30", "downType": "Unplanned"},
  {"id": "2", "category": "Core Switch", "subValue": "SW-2",
   "downTimeDate": "2024-03-10T12:00", "upTimeDate": "2024-03-10T12:30", "downType": "Planned"},
  {"id": 3, "category": "WAN Firewall", "subValue": "ADV-FW-1",
   "downTimeDate": "2024-03-11T08:00", "upTimeDate": "2024-03-11T09:00", "downType": "Planned"}
]"#;
    let summary = ingest_incidents_json(json_text).expect("ingest");
    let ids: Vec<Option<i64>> = summary.incidents.iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![Some(1), Some(3)]);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.warnings.len(), 1);
    assert_eq!(summary.warnings[0].code, "INGEST_ROW_INVALID");
    assert!(summary.warnings[0].details.as_deref().unwrap_or("").starts_with("row=2;"));
}

#[test]
fn csv_row_with_a_non_numeric_id_is_skipped_alone() {
    let csv_text = "\
id,category,subValue,downTimeDate,upTimeDate,downType
1,Core Switch,SW-1,2024-03-10T10:00,2024-03-10T11:30,Unplanned
abc,Core Switch,SW-2,2024-03-10T12:00,2024-03-10T12:30,Planned
3,WAN Firewall,ADV-FW-1,2024-03-11T08:00,2024-03-11T09:00,Planned
";
    let summary = ingest_incidents_csv(csv_text).expect("ingest");
    let entities: Vec<&str> = summary.incidents.iter().map(|i| i.entity_id.as_str()).collect();
    assert_eq!(entities, vec!["SW-1", "ADV-FW-1"]);
    assert_eq!(summary.skipped, 1);
    let codes: Vec<&str> = summary.warnings.iter().map(|w| w.code.as_str()).collect();
    assert_eq!(codes, vec!["INGEST_ROW_INVALID"]);
}

#[test]
fn csv_without_required_columns_is_rejected() {
    let err = ingest_incidents_csv("id,category,downType\n1,Core Switch,Planned\n")
        .expect_err("missing subValue");
    assert_eq!(err.code, INGEST_MISSING_COLUMN);
    assert!(err.message.contains("subValue"));
}

#[test]
fn fingerprint_is_stable_and_content_sensitive() {
    let summary = ingest_incidents_json(EXPORT_JSON).expect("ingest");
    let a = fingerprint(&summary.incidents[0]);
    assert_eq!(a, fingerprint(&summary.incidents[0].clone()));
    assert_eq!(a.len(), 64);
    assert_ne!(a, fingerprint(&summary.incidents[1]));
}

#[test]
fn files_are_loaded_by_extension() {
    let tmp = tempdir().expect("tempdir");
    let json_path = tmp.path().join("incidents.json");
    fs::write(&json_path, EXPORT_JSON).expect("write json");
    let csv_path = tmp.path().join("incidents.csv");
    let csv_text = "\
category,subValue,downTimeDate,upTimeDate,downType
Core Switch,SW-1,2024-03-10T10:00,2024-03-10T11:00,Unplanned
";
    fs::write(&csv_path, csv_text).expect("write csv");

    assert_eq!(load_incidents_file(&json_path).expect("json").incidents.len(), 4);
    assert_eq!(load_incidents_file(&csv_path).expect("csv").incidents.len(), 1);

    let err = load_incidents_file(&tmp.path().join("missing.json")).expect_err("missing");
    assert_eq!(err.code, INGEST_READ_FAILED);
}
