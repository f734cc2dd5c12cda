use pretty_assertions::assert_eq;

use noc_core::domain::{Cause, Incident};
use noc_core::validate::{validate_all_incidents, validate_incident};

fn codes(incident: &Incident) -> Vec<String> {
    validate_incident(incident)
        .into_iter()
        .map(|w| w.code)
        .collect()
}

#[test]
fn validator_flags_ordering_violations() {
    let incident = Incident::new(
        "Core Switch",
        "SW-1",
        Some("2026-01-01T10:00"),
        Some("2026-01-01T09:00"),
        Cause::Unplanned,
    );
    assert_eq!(codes(&incident), vec!["VALIDATION_TS_ORDER_VIOLATION"]);

    let zero = Incident::new(
        "Core Switch",
        "SW-1",
        Some("2026-01-01T10:00"),
        Some("2026-01-01T10:00"),
        Cause::Unplanned,
    );
    assert_eq!(codes(&zero), vec!["VALIDATION_TS_ORDER_VIOLATION"]);
}

#[test]
fn validator_explains_missing_and_unparseable_times() {
    let missing_down = Incident::new(
        "Core Switch",
        "SW-1",
        Some("-"),
        Some("2026-01-01T10:00"),
        Cause::Planned,
    );
    assert_eq!(codes(&missing_down), vec!["VALIDATION_TS_MISSING"]);

    let garbage = Incident::new(
        "Core Switch",
        "SW-1",
        Some("2026-01-01T09:00"),
        Some("soon"),
        Cause::Planned,
    );
    let warnings = validate_incident(&garbage);
    assert_eq!(warnings[0].code, "VALIDATION_TS_UNPARSEABLE");
    assert_eq!(warnings[0].details.as_deref(), Some("value=soon"));

    let ongoing =
        Incident::new("Core Switch", "SW-1", Some("2026-01-01T09:00"), None, Cause::Unplanned);
    assert_eq!(codes(&ongoing), vec!["VALIDATION_ONGOING"]);
}

#[test]
fn not_down_records_only_warn_when_they_carry_times() {
    let placeholder = Incident::new("Core Switch", "SW-1", Some("-"), Some("-"), Cause::NotDown);
    assert!(validate_incident(&placeholder).is_empty());

    let timed = Incident::new(
        "Core Switch",
        "SW-1",
        Some("2026-01-01T09:00"),
        Some("2026-01-01T10:00"),
        Cause::NotDown,
    );
    assert_eq!(codes(&timed), vec!["VALIDATION_NOT_DOWN_WITH_TIMES"]);
}

#[test]
fn validation_report_lists_only_flagged_records_in_order() {
    let incidents = vec![
        Incident::new("WAN Firewall", "ADV-FW-1", Some("x"), Some("y"), Cause::Planned).with_id(3),
        Incident::new(
            "Core Switch",
            "SW-2",
            Some("2026-01-01T09:00"),
            Some("2026-01-01T10:00"),
            Cause::Planned,
        )
        .with_id(1),
        Incident::new("Core Switch", "SW-1", Some("2026-01-01T09:00"), None, Cause::Planned)
            .with_id(2),
    ];
    let items = validate_all_incidents(&incidents);
    let keys: Vec<(Option<i64>, &str)> =
        items.iter().map(|i| (i.id, i.entity_id.as_str())).collect();
    assert_eq!(keys, vec![(Some(2), "SW-1"), (Some(3), "ADV-FW-1")]);
    assert_eq!(items[1].warnings.len(), 2);
}
