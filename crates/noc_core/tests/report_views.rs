use pretty_assertions::assert_eq;

use noc_core::analytics::build_analytics_summary;
use noc_core::demo::seed_demo_incidents;
use noc_core::normalize::interval::OngoingPolicy;
use noc_core::normalize::timestamps::parse_instant;
use noc_core::report::sectors::{build_sector_report, DEFAULT_SECTOR_CATEGORY};
use noc_core::report::trend::build_monthly_trend;
use noc_core::report::ReportOptions;
use noc_core::universe::EntityUniverse;
use noc_core::window::ReportWindow;

const ACCESS: &str = "Access & Distribution Switches";

fn quarter() -> ReportWindow {
    ReportWindow::from_dates("2026-01-01", "2026-03-31").expect("window")
}

#[test]
fn sector_report_includes_configured_firewalls_without_incidents() {
    let seed = seed_demo_incidents().expect("seed");
    let configured = EntityUniverse::from_config(vec![(
        DEFAULT_SECTOR_CATEGORY,
        vec!["FIBER-FW-01", "AMAYA-FW-01", "HAYCARB-FW-01", "CORE-FW-01"],
    )]);
    let universe = EntityUniverse::derive_from_history(&seed.incidents).merged(&configured);

    let report = build_sector_report(
        &seed.incidents,
        &quarter(),
        &universe,
        DEFAULT_SECTOR_CATEGORY,
        &ReportOptions::default(),
    );

    let rows: Vec<(&str, usize, usize)> = report
        .sectors
        .iter()
        .map(|s| (s.label.as_str(), s.perfect_uptime_count, s.has_downtime_count))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("Advantis", 0, 2),
            ("Fiber", 1, 0),
            ("Agro", 0, 1),
            ("Fabric", 0, 1),
            ("Amaya", 1, 0),
            ("Alumex", 0, 1),
            ("DPL", 0, 1),
            ("Haycarb", 1, 0),
        ]
    );
    assert!(report.warnings.is_empty());
}

#[test]
fn monthly_trend_follows_the_ongoing_policy() {
    let seed = seed_demo_incidents().expect("seed");

    let excluded =
        build_monthly_trend(&seed.incidents, &quarter(), Some(ACCESS), OngoingPolicy::Exclude);
    let minutes: Vec<f64> = excluded.iter().map(|m| m.downtime_minutes).collect();
    assert_eq!(minutes, vec![120.0, 180.0, 0.0]);
    assert_eq!(excluded[2].availability_display, "100.00");

    let now = parse_instant("2026-03-20T10:00").expect("instant");
    let counted = build_monthly_trend(
        &seed.incidents,
        &quarter(),
        Some(ACCESS),
        OngoingPolicy::CountUntil(now),
    );
    assert_eq!(counted[2].downtime_minutes, 120.0);
    assert_eq!(counted[2].incident_count, 1);
}

#[test]
fn analytics_summary_reconciles_with_the_seed() {
    let seed = seed_demo_incidents().expect("seed");
    let universe = EntityUniverse::derive_from_history(&seed.incidents);
    let summary =
        build_analytics_summary(&seed.incidents, &quarter(), &universe, &ReportOptions::default());

    // 4 core, 6 firewall and 1 access outage, plus the swapped record. The ongoing and
    // placeholder rows have no up time, so they are not counted.
    assert_eq!(summary.total_incidents, 12);
    assert_eq!(summary.planned_incidents, 2);
    assert_eq!(summary.unplanned_incidents, 10);
    let category_unplanned: usize = summary.categories.iter().map(|c| c.unplanned_incidents).sum();
    assert_eq!(category_unplanned, 9);
    let categories: Vec<&str> = summary.categories.iter().map(|c| c.category.as_str()).collect();
    assert_eq!(categories, vec![ACCESS, "Core Switch", "WAN Firewall"]);
    assert_eq!(summary.top_downtime[0].entity_id, "ACC-SW-01");
}
