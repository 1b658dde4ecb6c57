// ==========================================
// 配置加载集成测试
// ==========================================
// JSON 配置文件 + 覆写 → ReconcileApi

use sku_pallet::config::{config_keys, ConfigError, ConfigManager};
use sku_pallet::{AllocationMode, ReconcileApi, ReconcileRequest};
use std::collections::HashMap;

use test_helpers::{create_work_dir, read_csv, write_ledger, write_vitaplena_source};

#[test]
fn test_config_file_drives_allocation() {
    let dir = create_work_dir().unwrap();
    let config_path = dir.path().join("run.json");
    std::fs::write(
        &config_path,
        r#"{
            "slot_capacity": 10,
            "allocation_mode": "global",
            "ledger": { "slot_count": 3 }
        }"#,
    )
    .unwrap();

    let config = ConfigManager::with_overrides(HashMap::new())
        .load(Some(&config_path))
        .unwrap();
    assert_eq!(config.allocation_mode, AllocationMode::Global);

    let ledger = write_ledger(dir.path(), "maestro.csv", &["A", "B"]).unwrap();
    let source =
        write_vitaplena_source(dir.path(), "vitaplena.csv", &[("A", "15"), ("B", "12")]).unwrap();

    let api = ReconcileApi::new(config);
    let response = api
        .reconcile(&ReconcileRequest {
            ledger_path: ledger,
            source_paths: vec![source],
            ..ReconcileRequest::default()
        })
        .unwrap();

    let rows = read_csv(&response.output_path).unwrap();
    assert_eq!(rows[1][2..], ["15", "10", "5", ""]);
    assert_eq!(rows[2][2..], ["12", "", "5", "7"]);
    assert_eq!(response.report.diagnostics.overflow_dropped, 0);
}

#[test]
fn test_custom_profile_from_config_file() {
    let dir = create_work_dir().unwrap();
    let config_path = dir.path().join("run.json");
    std::fs::write(
        &config_path,
        r#"{
            "profiles": [
                { "name": "mercado", "name_pattern": "mercado", "key_column": 0, "quantity_column": 1 }
            ]
        }"#,
    )
    .unwrap();

    let config = ConfigManager::with_overrides(HashMap::new())
        .load(Some(&config_path))
        .unwrap();
    assert_eq!(config.profiles[0].header_rows, 1);

    let ledger = write_ledger(dir.path(), "maestro.csv", &["A"]).unwrap();
    let source = test_helpers::write_csv(
        dir.path(),
        "Mercado_Central.csv",
        &[vec!["sku", "qty"], vec!["7:A", "4"], vec!["A", "1"]],
    )
    .unwrap();

    let response = ReconcileApi::new(config)
        .reconcile(&ReconcileRequest {
            ledger_path: ledger,
            source_paths: vec![source],
            ..ReconcileRequest::default()
        })
        .unwrap();

    assert_eq!(response.report.diagnostics.sources[0].profile, "mercado");
    assert!(response.report.diagnostics.unclassified_sources.is_empty());
    assert_eq!(read_csv(&response.output_path).unwrap()[1][2], "5");
}

#[test]
fn test_overrides_take_precedence_over_file() {
    let dir = create_work_dir().unwrap();
    let config_path = dir.path().join("run.json");
    std::fs::write(&config_path, r#"{ "slot_capacity": 10 }"#).unwrap();

    let mut overrides = HashMap::new();
    overrides.insert(config_keys::SLOT_CAPACITY.to_string(), "25".to_string());
    overrides.insert(config_keys::TOTALS_MARKER.to_string(), "Suma".to_string());

    let config = ConfigManager::with_overrides(overrides)
        .load(Some(&config_path))
        .unwrap();
    assert_eq!(config.slot_capacity, 25);
    assert_eq!(config.ledger.totals_marker, "Suma");
}

#[test]
fn test_zero_capacity_rejected() {
    let dir = create_work_dir().unwrap();
    let config_path = dir.path().join("run.json");
    std::fs::write(&config_path, r#"{ "slot_capacity": 0 }"#).unwrap();

    let result = ConfigManager::with_overrides(HashMap::new()).load(Some(&config_path));
    assert!(matches!(result, Err(ConfigError::InvalidCapacity(0))));
}

#[test]
fn test_missing_config_file() {
    let dir = create_work_dir().unwrap();
    let result =
        ConfigManager::with_overrides(HashMap::new()).load(Some(&dir.path().join("nope.json")));
    assert!(matches!(result, Err(ConfigError::ConfigReadError { .. })));
}
