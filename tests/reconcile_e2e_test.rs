// ==========================================
// 对账 API 端到端测试
// ==========================================
// 文件 → ReconcileApi → 输出台账 / JSON 报告

use sku_pallet::config::RunConfig;
use sku_pallet::importer::UniversalFileParser;
use sku_pallet::{AllocationMode, CellValue, ReconcileApi, ReconcileRequest};

use test_helpers::{
    create_work_dir, read_csv, write_csv, write_eggmarket_source, write_ledger,
    write_vitaplena_source, write_xlsx,
};

fn slot_config(mode: AllocationMode, slot_count: usize) -> RunConfig {
    let mut config = RunConfig::default();
    config.allocation_mode = mode;
    config.ledger.slot_count = slot_count;
    config
}

#[test]
fn test_reconcile_two_sources_full_flow() {
    let dir = create_work_dir().unwrap();
    let ledger = write_ledger(dir.path(), "maestro.csv", &["A", "B", "C"]).unwrap();
    let vita = write_vitaplena_source(
        dir.path(),
        "vitaplena_enero.csv",
        &[("0:A", "2"), ("1:A", "3"), ("0:Z", "7")],
    )
    .unwrap();
    let egg = write_eggmarket_source(dir.path(), "EggMarket-ventas.csv", &[("9:B", "10")]).unwrap();

    let api = ReconcileApi::new(RunConfig::default());
    let response = api
        .reconcile(&ReconcileRequest {
            ledger_path: ledger.clone(),
            source_paths: vec![vita, egg],
            ..ReconcileRequest::default()
        })
        .unwrap();

    assert_eq!(response.output_path, dir.path().join("maestro_with_totals.csv"));
    let rows = read_csv(&response.output_path).unwrap();
    assert_eq!(rows[0], vec!["SKU", "Descripcion", "Total"]);
    assert_eq!(rows[1][2], "5");
    assert_eq!(rows[2][2], "10");
    assert_eq!(rows[3][2], "0");

    let report = &response.report;
    assert_eq!(report.grand_total, 22);
    assert_eq!(report.matched_quantity, 15);
    assert_eq!(report.unmatched_quantity, 7);
    assert_eq!(report.diagnostics.unmatched_source_keys.len(), 1);
    assert_eq!(report.diagnostics.unmatched_source_keys[0].key, "Z");
    assert!(report.diagnostics.unclassified_sources.is_empty());
    assert_eq!(report.diagnostics.sources.len(), 2);
}

#[test]
fn test_source_order_does_not_change_totals() {
    let dir = create_work_dir().unwrap();
    let ledger = write_ledger(dir.path(), "maestro.csv", &["A", "B"]).unwrap();
    let first = write_vitaplena_source(dir.path(), "vitaplena_1.csv", &[("A", "4"), ("B", "1")]).unwrap();
    let second = write_eggmarket_source(dir.path(), "eggmarket_2.csv", &[("x:A", "6")]).unwrap();

    let api = ReconcileApi::new(RunConfig::default());
    let out_a = dir.path().join("a.csv");
    let out_b = dir.path().join("b.csv");

    api.reconcile(&ReconcileRequest {
        ledger_path: ledger.clone(),
        source_paths: vec![first.clone(), second.clone()],
        output_path: Some(out_a.clone()),
        report_path: None,
    })
    .unwrap();
    api.reconcile(&ReconcileRequest {
        ledger_path: ledger,
        source_paths: vec![second, first],
        output_path: Some(out_b.clone()),
        report_path: None,
    })
    .unwrap();

    assert_eq!(read_csv(&out_a).unwrap(), read_csv(&out_b).unwrap());
    assert_eq!(read_csv(&out_a).unwrap()[1][2], "10");
}

#[test]
fn test_unrecognized_source_uses_fallback_and_is_reported() {
    let dir = create_work_dir().unwrap();
    let ledger = write_ledger(dir.path(), "maestro.csv", &["A"]).unwrap();
    // 兜底配置与 vitaplena 列位置相同
    let misc = write_vitaplena_source(dir.path(), "otros_canales.csv", &[("A", "8")]).unwrap();

    let api = ReconcileApi::new(RunConfig::default());
    let response = api
        .reconcile(&ReconcileRequest {
            ledger_path: ledger,
            source_paths: vec![misc],
            ..ReconcileRequest::default()
        })
        .unwrap();

    let diagnostics = &response.report.diagnostics;
    assert_eq!(diagnostics.unclassified_sources, vec!["otros_canales.csv"]);
    assert!(diagnostics.sources[0].fallback);
    assert_eq!(read_csv(&response.output_path).unwrap()[1][2], "8");
}

#[test]
fn test_ledger_file_is_not_modified() {
    let dir = create_work_dir().unwrap();
    let ledger = write_ledger(dir.path(), "maestro.csv", &["A", "B"]).unwrap();
    let source = write_vitaplena_source(dir.path(), "vitaplena.csv", &[("A", "3")]).unwrap();
    let before = std::fs::read(&ledger).unwrap();

    let api = ReconcileApi::new(RunConfig::default());
    api.reconcile(&ReconcileRequest {
        ledger_path: ledger.clone(),
        source_paths: vec![source],
        ..ReconcileRequest::default()
    })
    .unwrap();

    assert_eq!(std::fs::read(&ledger).unwrap(), before);
}

#[test]
fn test_missing_totals_marker_writes_nothing() {
    let dir = create_work_dir().unwrap();
    let ledger = write_csv(
        dir.path(),
        "maestro.csv",
        &[vec!["SKU", "Descripcion", "Unidades"], vec!["A", "item", ""]],
    )
    .unwrap();
    let source = write_vitaplena_source(dir.path(), "vitaplena.csv", &[("A", "3")]).unwrap();
    let output = dir.path().join("out.csv");
    let report = dir.path().join("report.json");

    let api = ReconcileApi::new(RunConfig::default());
    let err = api
        .reconcile(&ReconcileRequest {
            ledger_path: ledger,
            source_paths: vec![source],
            output_path: Some(output.clone()),
            report_path: Some(report.clone()),
        })
        .unwrap_err();

    assert!(err.is_structural(), "应为台账结构错误: {:?}", err);
    assert!(!output.exists());
    assert!(!report.exists());
}

#[test]
fn test_append_totals_column_when_marker_missing() {
    let dir = create_work_dir().unwrap();
    let ledger = write_csv(
        dir.path(),
        "maestro.csv",
        &[vec!["SKU", "Descripcion"], vec!["A", "item"], vec!["B", "item"]],
    )
    .unwrap();
    let source = write_vitaplena_source(dir.path(), "vitaplena.csv", &[("A", "3")]).unwrap();

    let mut config = RunConfig::default();
    config.ledger.append_totals_column = true;
    let api = ReconcileApi::new(config);
    let response = api
        .reconcile(&ReconcileRequest {
            ledger_path: ledger,
            source_paths: vec![source],
            ..ReconcileRequest::default()
        })
        .unwrap();

    let rows = read_csv(&response.output_path).unwrap();
    assert_eq!(rows[0], vec!["SKU", "Descripcion", "Total"]);
    assert_eq!(rows[1][2], "3");
    assert_eq!(rows[2][2], "0");
    assert_eq!(response.report.totals_column, 2);
}

#[test]
fn test_per_row_pallet_allocation() {
    let dir = create_work_dir().unwrap();
    let ledger = write_ledger(dir.path(), "maestro.csv", &["A", "B"]).unwrap();
    let source =
        write_vitaplena_source(dir.path(), "vitaplena.csv", &[("A", "75"), ("B", "12")]).unwrap();

    let api = ReconcileApi::new(slot_config(AllocationMode::PerRow, 4));
    let response = api
        .reconcile(&ReconcileRequest {
            ledger_path: ledger,
            source_paths: vec![source],
            ..ReconcileRequest::default()
        })
        .unwrap();

    let rows = read_csv(&response.output_path).unwrap();
    assert_eq!(rows[1][2..], ["75", "30", "30", "15", ""]);
    // 每行从第一个托盘重新开始
    assert_eq!(rows[2][2..], ["12", "12", "", "", ""]);
    assert_eq!(response.report.allocated_quantity, 87);
    assert_eq!(response.report.diagnostics.overflow_dropped, 0);
}

#[test]
fn test_global_pallet_allocation_carries_cursor() {
    let dir = create_work_dir().unwrap();
    let ledger = write_ledger(dir.path(), "maestro.csv", &["A", "B"]).unwrap();
    let source =
        write_vitaplena_source(dir.path(), "vitaplena.csv", &[("A", "20"), ("B", "15")]).unwrap();

    let api = ReconcileApi::new(slot_config(AllocationMode::Global, 2));
    let response = api
        .reconcile(&ReconcileRequest {
            ledger_path: ledger,
            source_paths: vec![source],
            ..ReconcileRequest::default()
        })
        .unwrap();

    let rows = read_csv(&response.output_path).unwrap();
    assert_eq!(rows[1][2..], ["20", "20", ""]);
    assert_eq!(rows[2][2..], ["15", "10", "5"]);
    assert_eq!(response.report.allocation_mode, AllocationMode::Global);
}

#[test]
fn test_overflow_is_dropped_and_reported() {
    let dir = create_work_dir().unwrap();
    let ledger = write_ledger(dir.path(), "maestro.csv", &["A"]).unwrap();
    let source = write_vitaplena_source(dir.path(), "vitaplena.csv", &[("A", "100")]).unwrap();

    let api = ReconcileApi::new(slot_config(AllocationMode::PerRow, 2));
    let response = api
        .reconcile(&ReconcileRequest {
            ledger_path: ledger,
            source_paths: vec![source],
            ..ReconcileRequest::default()
        })
        .unwrap();

    let rows = read_csv(&response.output_path).unwrap();
    assert_eq!(rows[1][2..], ["100", "30", "30"]);

    let diagnostics = &response.report.diagnostics;
    assert_eq!(diagnostics.overflow_dropped, 40);
    assert_eq!(diagnostics.overflow.len(), 1);
    assert_eq!(diagnostics.overflow[0].key, "A");
    assert_eq!(
        response.report.allocated_quantity + diagnostics.overflow_dropped,
        100
    );
}

#[test]
fn test_quantity_conservation_across_sources() {
    let dir = create_work_dir().unwrap();
    let ledger = write_ledger(dir.path(), "maestro.csv", &["A", "B", "C"]).unwrap();
    let vita = write_vitaplena_source(
        dir.path(),
        "vitaplena.csv",
        &[("A", "1"), ("B", "abc"), ("C", "-4"), ("Q", "9"), ("A", "2.7")],
    )
    .unwrap();
    let egg = write_eggmarket_source(dir.path(), "eggmarket.csv", &[("B", "5"), ("", "3")]).unwrap();

    let api = ReconcileApi::new(RunConfig::default());
    let response = api
        .reconcile(&ReconcileRequest {
            ledger_path: ledger,
            source_paths: vec![vita, egg],
            ..ReconcileRequest::default()
        })
        .unwrap();

    let report = &response.report;
    let source_sum: u64 = report
        .diagnostics
        .sources
        .iter()
        .map(|s| s.quantity_total)
        .sum();
    assert_eq!(report.grand_total, source_sum);
    assert_eq!(
        report.matched_quantity + report.unmatched_quantity,
        report.grand_total
    );
    // "abc" / "-4" 置 0，"2.7" 截断
    assert_eq!(report.diagnostics.coerced_quantity_cells(), 3);

    let rows = read_csv(&response.output_path).unwrap();
    assert_eq!(rows[1][2], "3");
    assert_eq!(rows[2][2], "5");
    assert_eq!(rows[3][2], "0");
}

#[test]
fn test_report_written_as_json() {
    let dir = create_work_dir().unwrap();
    let ledger = write_ledger(dir.path(), "maestro.csv", &["A"]).unwrap();
    let source = write_vitaplena_source(dir.path(), "vitaplena.csv", &[("A", "3")]).unwrap();
    let report_path = dir.path().join("report.json");

    let api = ReconcileApi::new(RunConfig::default());
    let response = api
        .reconcile(&ReconcileRequest {
            ledger_path: ledger,
            source_paths: vec![source],
            output_path: None,
            report_path: Some(report_path.clone()),
        })
        .unwrap();

    let text = std::fs::read_to_string(&report_path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["run_id"], response.report.run_id.as_str());
    assert_eq!(json["grand_total"], 3);
    assert_eq!(json["allocation_mode"], "per_row");
    assert_eq!(json["slot_capacity"], 30);
}

#[test]
fn test_missing_source_file_fails() {
    let dir = create_work_dir().unwrap();
    let ledger = write_ledger(dir.path(), "maestro.csv", &["A"]).unwrap();

    let api = ReconcileApi::new(RunConfig::default());
    let err = api
        .reconcile(&ReconcileRequest {
            ledger_path: ledger,
            source_paths: vec![dir.path().join("vitaplena_missing.csv")],
            ..ReconcileRequest::default()
        })
        .unwrap_err();

    assert!(!err.is_structural());
    assert!(!dir.path().join("maestro_with_totals.csv").exists());
}

#[test]
fn test_ledger_padding_and_quotes_survive_round_trip() {
    let dir = create_work_dir().unwrap();
    let ledger = write_csv(
        dir.path(),
        "maestro.csv",
        &[
            vec!["SKU", " Nombre ", "Total"],
            vec!["A1", " Huevos grandes ", ""],
            vec!["B2", "Huevos, docena", ""],
        ],
    )
    .unwrap();
    let source = write_vitaplena_source(dir.path(), "vitaplena.csv", &[("A1", "5")]).unwrap();

    let response = ReconcileApi::new(RunConfig::default())
        .reconcile(&ReconcileRequest {
            ledger_path: ledger,
            source_paths: vec![source],
            ..ReconcileRequest::default()
        })
        .unwrap();

    let rows = read_csv(&response.output_path).unwrap();
    assert_eq!(rows[0], vec!["SKU", " Nombre ", "Total"]);
    assert_eq!(rows[1], vec!["A1", " Huevos grandes ", "5"]);
    assert_eq!(rows[2], vec!["B2", "Huevos, docena", "0"]);
}

#[test]
fn test_default_slot_range_over_key_column_is_structural() {
    let dir = create_work_dir().unwrap();
    let ledger = write_csv(
        dir.path(),
        "maestro.csv",
        &[vec!["Nombre", "Total", "SKU"], vec!["item", "", "A1"]],
    )
    .unwrap();
    let source = write_vitaplena_source(dir.path(), "vitaplena.csv", &[("A1", "5")]).unwrap();
    let output = dir.path().join("out.csv");

    let mut config = slot_config(AllocationMode::PerRow, 2);
    config.ledger.key_column = 2;
    assert!(config.validate().is_ok());

    let err = ReconcileApi::new(config)
        .reconcile(&ReconcileRequest {
            ledger_path: ledger,
            source_paths: vec![source],
            output_path: Some(output.clone()),
            report_path: None,
        })
        .unwrap_err();

    assert!(err.is_structural(), "应为台账结构错误: {:?}", err);
    assert!(!output.exists());
}

#[test]
fn test_xlsx_ledger_written_back_as_xlsx() {
    let dir = create_work_dir().unwrap();
    let ledger = write_xlsx(
        dir.path(),
        "maestro.xlsx",
        &[
            vec!["SKU", "Nombre", "Total"],
            vec!["A1", " Huevos grandes ", ""],
            vec!["B2", "Leche", ""],
        ],
    )
    .unwrap();
    let source =
        write_vitaplena_source(dir.path(), "vitaplena.csv", &[("0:A1", "4"), ("A1", "3")]).unwrap();

    let response = ReconcileApi::new(slot_config(AllocationMode::PerRow, 1))
        .reconcile(&ReconcileRequest {
            ledger_path: ledger,
            source_paths: vec![source],
            ..ReconcileRequest::default()
        })
        .unwrap();

    assert_eq!(response.output_path, dir.path().join("maestro_with_totals.xlsx"));
    let rows = UniversalFileParser.parse_ledger(&response.output_path).unwrap();
    assert_eq!(rows[1].cell(1), &CellValue::Text(" Huevos grandes ".to_string()));
    assert_eq!(rows[1].cell(2).to_text(), "7");
    assert_eq!(rows[1].cell(3).to_text(), "7");
    assert_eq!(rows[2].cell(2).to_text(), "0");
    assert_eq!(rows[2].cell(3), &CellValue::Empty);
}
