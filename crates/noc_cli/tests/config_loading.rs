use std::fs;

use pretty_assertions::assert_eq;
use tempfile::tempdir;

use noc_cli::config::{ReportConfig, UniverseEntry};

#[test]
fn yaml_file_overrides_defaults() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("noc.yaml");
    let yaml = "\
sector_category: Core Firewall
log_level: debug
entity_universe:
  - category: WAN Firewall
    entities: [ADV-FW-01, DPL-FW-01]
";
    fs::write(&path, yaml).expect("write");

    let config = ReportConfig::load(Some(&path)).expect("load");
    assert_eq!(config.sector_category, "Core Firewall");
    assert_eq!(config.log_level, "debug");
    assert_eq!(config.top_n, 5);
    assert!(config.derive_universe_from_history);
    assert_eq!(
        config.entity_universe,
        vec![UniverseEntry {
            category: "WAN Firewall".to_string(),
            entities: vec!["ADV-FW-01".to_string(), "DPL-FW-01".to_string()],
        }]
    );
}

#[test]
fn invalid_values_are_rejected() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("noc.toml");
    fs::write(&path, "top_n = 0\n").expect("write");
    let err = ReportConfig::load(Some(&path)).expect_err("zero top_n");
    assert!(err.to_string().contains("top_n"));
}

#[test]
fn missing_explicit_file_is_an_error() {
    let tmp = tempdir().expect("tempdir");
    assert!(ReportConfig::load(Some(&tmp.path().join("absent.toml"))).is_err());
}
