// ==========================================
// Batch import integration tests
// ==========================================
// Target: workbook file → batch of entity imports → store
// Covers xlsx and CSV sources, sheet resolution, entity-level
// failures, staged uploads and template round-trips
// ==========================================

mod test_helpers;

use appliance_registry::config::{config_keys, ConfigManager, ImportConfigReader};
use appliance_registry::domain::{from_document, Appliance, EntityRequest, Filter, Fuel};
use appliance_registry::importer::{
    import_batch, parse_requests, write_templates, BatchImporter, EntityKind, ImportError,
    StagedUpload,
};
use appliance_registry::repository::DocumentStore;
use appliance_registry::{logging, ApplianceType, ImportSettings, UserRole};
use serde_json::json;
use test_helpers::{create_test_store, fixture_path, write_csv};

#[tokio::test]
async fn test_xlsx_workbook_imports_every_entity() {
    logging::init_test();
    let (_tmp, store, _) = create_test_store().unwrap();
    let requests = parse_requests(["appliances", "fuels", "users", "userAppliances", "userFuels:Links"]);

    let results = import_batch(&store, fixture_path("registry.xlsx"), &requests)
        .await
        .unwrap();

    let counts: Vec<(&str, usize, usize, usize)> = results
        .iter()
        .map(|r| (r.entity.as_str(), r.inserted, r.updated, r.skipped))
        .collect();
    assert_eq!(
        counts,
        vec![
            ("Appliances", 2, 0, 0),
            ("Fuels", 2, 0, 1),
            ("Users", 2, 0, 0),
            ("UserAppliances", 2, 0, 0),
            ("UserFuels", 2, 0, 0),
        ]
    );
    // header is row 1, so the third data row is row 4
    assert_eq!(results[1].errors[0].row, Some(4));
    assert_eq!(results[1].errors[0].error, "Missing fuelId");

    let appliance: Appliance = from_document(
        store
            .find_one("Appliances", &Filter::new().eq("applianceId", "APP001"))
            .await
            .unwrap()
            .unwrap(),
    )
    .unwrap();
    assert_eq!(appliance.nominal_output, 12.5);
    assert_eq!(appliance.appliance_type, ApplianceType::Stove);
    assert!(appliance.is_variant);
    assert_eq!(
        appliance.permitted_fuels,
        Some(vec!["FUEL001".to_string(), "FUEL002".to_string()])
    );
    assert_eq!(appliance.instruction_manual_date.to_rfc3339(), "2024-07-01T00:00:00+00:00");

    let other = store
        .find_one("Appliances", &Filter::new().eq("applianceId", "APP002"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(other["applianceType"], json!("Other"));
    assert_eq!(other["nominalOutput"], json!(8.0));
    assert_eq!(other["permittedFuels"], json!(null));

    let fuel: Fuel = from_document(
        store
            .find_one("Fuels", &Filter::new().eq("fuelId", "FUEL001"))
            .await
            .unwrap()
            .unwrap(),
    )
    .unwrap();
    assert_eq!(fuel.sulphur_content, 1.5);
    assert_eq!(fuel.brand_names, Some(vec!["Brand A".to_string(), "Brand B".to_string()]));

    let user = store
        .find_one("Users", &Filter::new().eq("userId", "USER002"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user["role"], json!(UserRole::User.to_string()));
    assert_eq!(user["isActive"], json!(true));
}

#[tokio::test]
async fn test_reimporting_workbook_updates_only() {
    let (_tmp, store, _) = create_test_store().unwrap();
    let requests = parse_requests(["fuels", "users"]);

    import_batch(&store, fixture_path("registry.xlsx"), &requests).await.unwrap();
    let second = import_batch(&store, fixture_path("registry.xlsx"), &requests).await.unwrap();

    assert_eq!((second[0].inserted, second[0].updated), (0, 2));
    assert_eq!((second[1].inserted, second[1].updated), (0, 2));
    assert_eq!(store.count("Fuels").await.unwrap(), 2);
}

#[tokio::test]
async fn test_date_cells_in_1900_and_1904_workbooks_agree() {
    // same calendar day stored as serial 45474 (1900 system) and 44012 (1904 system)
    for name in ["dates-1900.xlsx", "dates-1904.xlsx"] {
        let (_tmp, store, _) = create_test_store().unwrap();
        let results = import_batch(&store, fixture_path(name), &parse_requests(["appliances"]))
            .await
            .unwrap();
        assert_eq!(results[0].inserted, 1, "{}", name);

        let appliance: Appliance = from_document(
            store
                .find_one("Appliances", &Filter::new().eq("applianceId", "APP001"))
                .await
                .unwrap()
                .unwrap(),
        )
        .unwrap();
        assert_eq!(
            appliance.instruction_manual_date.to_rfc3339(),
            "2024-07-01T00:00:00+00:00",
            "{}",
            name
        );
        assert_eq!(
            appliance.published_date.to_rfc3339(),
            "2024-07-01T12:00:00+00:00",
            "{}",
            name
        );
    }
}

#[tokio::test]
async fn test_entity_level_failures_do_not_stop_the_batch() {
    let (_tmp, store, _) = create_test_store().unwrap();
    let requests = vec![
        EntityRequest::new("widgets"),
        // the fixture links sheet is called "Links", not "UserFuels"
        EntityRequest::new("userFuels"),
        EntityRequest::with_sheet("fuels", "Fuels"),
    ];

    let results = import_batch(&store, fixture_path("registry.xlsx"), &requests)
        .await
        .unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].entity, "widgets");
    assert_eq!(results[0].errors[0].error, "Unknown entity type: widgets");
    assert_eq!(results[1].entity, "UserFuels");
    assert_eq!(results[1].errors[0].error, "Sheet \"UserFuels\" not found in workbook");
    assert_eq!(results[1].processed(), 0);
    assert_eq!(results[2].inserted, 2);
}

#[tokio::test]
async fn test_missing_file_fails_the_batch() {
    let (_tmp, store, _) = create_test_store().unwrap();
    let err = import_batch(&store, "/nonexistent/registry.xlsx", &parse_requests(["fuels"]))
        .await
        .unwrap_err();
    assert!(matches!(err, ImportError::FileNotFound(_)));
}

#[tokio::test]
async fn test_csv_file_is_its_own_sheet() {
    let (_tmp, store, _) = create_test_store().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        dir.path(),
        "export.csv",
        &[
            &["FuelID", "Fuel Name", "Has Complaints", "Sulphur Content (%)"],
            &["FUEL001", "Peat", "Yes", "3.5% max"],
            &["", "", "", ""],
            &["FUEL002", "Coal", "no", ""],
        ],
    )
    .unwrap();

    let results = import_batch(&store, &path, &parse_requests(["fuels"])).await.unwrap();
    assert_eq!((results[0].inserted, results[0].skipped), (2, 0));

    let peat = store
        .find_one("Fuels", &Filter::new().eq("fuelId", "FUEL001"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(peat["hasCustomerComplaints"], json!(true));
    assert_eq!(peat["sulphurContent"], json!(3.5));
}

#[tokio::test]
async fn test_header_only_sheet_yields_empty_result() {
    let (_tmp, store, _) = create_test_store().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(dir.path(), "Users.csv", &[&["userId", "email"]]).unwrap();

    let results = import_batch(&store, &path, &parse_requests(["users"])).await.unwrap();
    assert_eq!(results[0].entity, "Users");
    assert_eq!(results[0].processed(), 0);
    assert!(results[0].errors.is_empty());
}

#[tokio::test]
async fn test_staged_upload_removed_after_success_and_failure() {
    let (_tmp, store, _) = create_test_store().unwrap();
    let importer = BatchImporter::new(&store, ImportSettings::default());

    let bytes = std::fs::read(fixture_path("registry.xlsx")).unwrap();
    let upload = StagedUpload::from_reader(bytes.as_slice(), "registry.xlsx").unwrap();
    let staged = upload.path().to_path_buf();
    let results = importer
        .import_staged(upload, &parse_requests(["fuels"]))
        .await
        .unwrap();
    assert_eq!(results[0].inserted, 2);
    assert!(!staged.exists());

    let upload = StagedUpload::from_bytes(b"not a zip archive", "broken.xlsx").unwrap();
    let staged = upload.path().to_path_buf();
    let err = importer
        .import_staged(upload, &parse_requests(["fuels"]))
        .await
        .unwrap_err();
    assert!(matches!(err, ImportError::ExcelParseError(_)));
    assert!(!staged.exists());
}

#[tokio::test]
async fn test_templates_import_cleanly() {
    let (_tmp, store, _) = create_test_store().unwrap();
    let dir = tempfile::tempdir().unwrap();

    for (kind, path) in EntityKind::ALL.into_iter().zip(write_templates(dir.path()).unwrap()) {
        let results = import_batch(&store, &path, &[EntityRequest::new(kind.type_name())])
            .await
            .unwrap();
        assert_eq!(results[0].inserted, 1, "{}: {:?}", kind, results[0].errors);
        assert!(results[0].errors.is_empty());
    }

    let fuel = store
        .find_one("Fuels", &Filter::new().eq("fuelId", "FUEL001"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fuel["sulphurContent"], json!(20.0));
    assert_eq!(fuel["brandNames"], json!(["Fuel brand 1", "Fuel brand 2"]));
}

#[tokio::test]
async fn test_configured_sheet_override() {
    let (_tmp, store, _) = create_test_store().unwrap();
    let config = ConfigManager::from_connection(store.connection()).unwrap();
    config
        .set_global_config_value(&config_keys::sheet_override(EntityKind::UserFuels), "Links")
        .unwrap();

    let settings = config.load_import_settings().await.unwrap();
    let results = BatchImporter::new(&store, settings)
        .import_file(fixture_path("registry.xlsx"), &parse_requests(["userFuels"]))
        .await
        .unwrap();

    assert_eq!(results[0].inserted, 2);
    assert_eq!(store.count("UserFuels").await.unwrap(), 2);
}
