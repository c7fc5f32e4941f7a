use tpcc_dumpgen::catalog::{GrowthLaw, Initializer, CATALOG};
use tpcc_dumpgen::error::Error;

#[test]
fn test_catalog_is_in_load_order() {
    let templates: Vec<&str> = CATALOG.iter().map(|t| t.template).collect();
    assert_eq!(
        templates,
        [
            "0_config",
            "1_item",
            "2_warehouse",
            "3_stock",
            "4_district",
            "5_customer",
            "6_history",
            "7_order",
            "8_new_order",
        ]
    );
}

#[test]
fn test_single_warehouse_resolves_to_single_files() {
    let expected = [
        ("0_config", 1, 1, 4),
        ("1_item", 1, 1000, 100),
        ("2_warehouse", 1, 1, 1),
        ("3_stock", 1, 1000, 100),
        ("4_district", 1, 1, 100),
        ("5_customer", 1, 300, 100),
        ("6_history", 1, 300, 100),
        ("7_order", 1, 3000, 10),
        ("8_new_order", 1, 90, 100),
    ];
    for (spec, (template, files, inserts, rows)) in CATALOG.iter().zip(expected) {
        let params = spec.resolve(1).unwrap();
        assert_eq!(spec.template, template);
        assert_eq!(
            (params.files, params.inserts, params.rows),
            (files, inserts, rows),
            "wrong counts for {template}"
        );
        assert_eq!(params.last_inserts, None, "{template}");
    }
}

#[test]
fn test_warehouse_table_rows_track_warehouse_count() {
    let warehouse = &CATALOG[2];
    assert_eq!(warehouse.template, "2_warehouse");

    let params = warehouse.resolve(77).unwrap();
    assert_eq!(params.files, 1);
    assert_eq!(params.inserts, 1);
    assert_eq!(params.rows, 77);
}

#[test]
fn test_district_partial_final_batch() {
    let district = &CATALOG[4];
    assert_eq!(district.template, "4_district");

    // 23 warehouses: 3 inserts, the last holding 3 warehouses' rows.
    let params = district.resolve(23).unwrap();
    assert_eq!(params.files, 1);
    assert_eq!(params.inserts, 3);
    assert_eq!(params.rows, 100);
    assert_eq!(params.last_inserts, None);
    assert_eq!(params.last_rows, Some(30));

    // 20 warehouses divide evenly: no partial batch.
    let params = district.resolve(20).unwrap();
    assert_eq!(params.inserts, 2);
    assert_eq!(params.last_rows, None);
}

#[test]
fn test_stock_partitions_at_fifty_warehouses() {
    let stock = &CATALOG[3];
    assert_eq!(stock.template, "3_stock");

    let params = stock.resolve(50).unwrap();
    assert_eq!(params.files, 6);
    assert_eq!(params.inserts, 8000);
    assert_eq!(params.rows, 100);
    assert_eq!(params.last_inserts, Some(10000));
}

#[test]
fn test_resolution_conserves_rows_per_growth_law() {
    for warehouses in [1, 7, 16, 23, 50, 333, 1234] {
        for spec in &CATALOG {
            let params = spec.resolve(warehouses).unwrap();
            let expected = match spec.growth {
                GrowthLaw::Fixed { files, inserts, .. } => files * inserts * params.rows,
                GrowthLaw::Scaled {
                    inserts_per_warehouse,
                    rows_per_insert,
                    ..
                } => warehouses * inserts_per_warehouse * rows_per_insert,
                GrowthLaw::Stepped {
                    rows_per_warehouse, ..
                } => warehouses * rows_per_warehouse,
            };
            assert_eq!(
                params.total_rows(),
                expected,
                "row drift for {} at W={warehouses}",
                spec.template
            );
        }
    }
}

#[test]
fn test_resolution_rejects_zero_warehouses() {
    match CATALOG[0].resolve(0) {
        Err(Error::InvalidParameter(_)) => {}
        other => panic!("expected InvalidParameter, got {other:?}"),
    }
}

#[test]
fn test_initializer_rendering() {
    assert_eq!(
        Initializer::WarehousesAndNurandC.render(50, 123),
        Some("@warehouses := 50; @nurand_c := 123".to_string())
    );
    assert_eq!(
        Initializer::NurandC.render(50, 123),
        Some("@nurand_c := 123".to_string())
    );
    assert_eq!(Initializer::None.render(50, 123), None);
}

#[test]
fn test_only_config_and_customer_bind_session_variables() {
    let with_init: Vec<&str> = CATALOG
        .iter()
        .filter(|t| t.initializer != Initializer::None)
        .map(|t| t.template)
        .collect();
    assert_eq!(with_init, ["0_config", "5_customer"]);
}
