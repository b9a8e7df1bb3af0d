// ==========================================
// Reconciler integration tests
// ==========================================
// Target: row → document → store behaviour against a file-backed
// SQLite store (upsert identity, timestamps, defaults, isolation)
// ==========================================

mod test_helpers;

use appliance_registry::domain::{from_document, Appliance, Filter, Fuel, User, UserAppliance};
use appliance_registry::importer::{EntityKind, ImportReconciler};
use appliance_registry::logging;
use appliance_registry::repository::DocumentStore;
use appliance_registry::{ApplianceType, AssignmentStatus, FuelBagging, UserRole};
use serde_json::json;
use std::time::Duration;
use test_helpers::{create_test_store, row};

#[tokio::test]
async fn test_reimport_is_idempotent() {
    logging::init_test();
    let (_tmp, store, _) = create_test_store().unwrap();
    let rows = vec![
        row(2, &[("fuelId", "FUEL001"), ("fuelName", "Briquettes")]),
        row(3, &[("fuelId", "FUEL002"), ("fuelName", "Logs")]),
    ];
    let reconciler = ImportReconciler::new(&store);

    let first = reconciler.reconcile(EntityKind::Fuels, &rows).await;
    let snapshot = store
        .find_one("Fuels", &Filter::new().eq("fuelId", "FUEL002"))
        .await
        .unwrap()
        .unwrap();
    let second = reconciler.reconcile(EntityKind::Fuels, &rows).await;

    assert_eq!((first.inserted, first.updated), (2, 0));
    assert_eq!((second.inserted, second.updated), (0, 2));
    assert_eq!(store.count("Fuels").await.unwrap(), 2);

    let mut after = store
        .find_one("Fuels", &Filter::new().eq("fuelId", "FUEL002"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after["fuelName"], json!("Logs"));

    // only the update stamp moves; _id, createdAt and every field stay put
    let mut snapshot = snapshot;
    assert!(snapshot.remove("updatedAt").is_some());
    assert!(after.remove("updatedAt").is_some());
    assert_eq!(after, snapshot);
}

#[tokio::test]
async fn test_created_at_survives_update() {
    let (_tmp, store, _) = create_test_store().unwrap();
    let reconciler = ImportReconciler::new(&store);
    let filter = Filter::new().eq("userId", "USER001");

    reconciler
        .reconcile(EntityKind::Users, &[row(2, &[("userId", "USER001"), ("firstName", "Ann")])])
        .await;
    let first: User = from_document(store.find_one("Users", &filter).await.unwrap().unwrap()).unwrap();

    tokio::time::sleep(Duration::from_millis(5)).await;
    reconciler
        .reconcile(EntityKind::Users, &[row(2, &[("userId", "USER001"), ("firstName", "Anne")])])
        .await;
    let second: User = from_document(store.find_one("Users", &filter).await.unwrap().unwrap()).unwrap();

    assert_eq!(second.first_name, "Anne");
    assert_eq!(second.created_at, first.created_at);
    assert!(second.updated_at > first.updated_at);
}

#[tokio::test]
async fn test_composite_identity_for_links() {
    let (_tmp, store, _) = create_test_store().unwrap();
    let reconciler = ImportReconciler::new(&store);

    let summary = reconciler
        .reconcile(
            EntityKind::UserAppliances,
            &[
                row(2, &[("userId", "USER001"), ("applianceId", "APP001")]),
                row(3, &[("userId", "USER001"), ("applianceId", "APP002")]),
                row(4, &[("userId", "USER002"), ("applianceId", "APP001")]),
                row(5, &[("userId", "USER001"), ("applianceId", "APP001"), ("status", "expired")]),
            ],
        )
        .await;

    assert_eq!((summary.inserted, summary.updated), (3, 1));
    let link: UserAppliance = from_document(
        store
            .find_one(
                "UserAppliances",
                &Filter::new().eq("userId", "USER001").eq("applianceId", "APP001"),
            )
            .await
            .unwrap()
            .unwrap(),
    )
    .unwrap();
    assert_eq!(link.status, AssignmentStatus::Expired);
}

#[tokio::test]
async fn test_restricted_choices_fall_back() {
    let (_tmp, store, _) = create_test_store().unwrap();
    let reconciler = ImportReconciler::new(&store);

    reconciler
        .reconcile(
            EntityKind::Appliances,
            &[row(2, &[("applianceId", "APP001"), ("applianceType", "Microwave")])],
        )
        .await;
    reconciler
        .reconcile(
            EntityKind::Users,
            &[row(2, &[("userId", "USER001"), ("role", "superuser")])],
        )
        .await;
    reconciler
        .reconcile(
            EntityKind::UserFuels,
            &[row(2, &[("userId", "USER001"), ("fuelId", "FUEL001"), ("status", "revoked")])],
        )
        .await;

    let appliance: Appliance = from_document(
        store
            .find_one("Appliances", &Filter::new().eq("applianceId", "APP001"))
            .await
            .unwrap()
            .unwrap(),
    )
    .unwrap();
    assert_eq!(appliance.appliance_type, ApplianceType::Other);

    let user: User = from_document(
        store
            .find_one("Users", &Filter::new().eq("userId", "USER001"))
            .await
            .unwrap()
            .unwrap(),
    )
    .unwrap();
    assert_eq!(user.role, UserRole::User);

    let link = store
        .find_one("UserFuels", &Filter::new().eq("fuelId", "FUEL001"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(link["status"], json!("active"));
}

#[tokio::test]
async fn test_blank_fuel_row_gets_defaults() {
    let (_tmp, store, _) = create_test_store().unwrap();
    let summary = ImportReconciler::new(&store)
        .reconcile(
            EntityKind::Fuels,
            &[row(
                2,
                &[
                    ("fuelId", "FUEL009"),
                    ("fuelName", "Test Fuel"),
                    ("manufacturerName", ""),
                    ("hasCustomerComplaints", ""),
                    ("sulphurContent", ""),
                    ("fuelBagging", ""),
                ],
            )],
        )
        .await;
    assert_eq!(summary.inserted, 1);

    let fuel: Fuel = from_document(
        store
            .find_one("Fuels", &Filter::new().eq("fuelId", "FUEL009"))
            .await
            .unwrap()
            .unwrap(),
    )
    .unwrap();
    assert_eq!(fuel.fuel_name, "Test Fuel");
    assert_eq!(fuel.manufacturer_name, "Unknown");
    assert!(!fuel.has_customer_complaints);
    assert_eq!(fuel.sulphur_content, 0.0);
    assert_eq!(fuel.fuel_bagging, FuelBagging::Bagged);
    assert_eq!(fuel.brand_names, None);
    assert_eq!(fuel.created_at, fuel.updated_at);
}

#[tokio::test]
async fn test_permitted_fuels_list() {
    let (_tmp, store, _) = create_test_store().unwrap();
    ImportReconciler::new(&store)
        .reconcile(
            EntityKind::Appliances,
            &[
                row(2, &[("applianceId", "APP001"), ("permittedFuels", "FUEL001, FUEL002")]),
                row(3, &[("applianceId", "APP002")]),
            ],
        )
        .await;

    let listed = store
        .find_one("Appliances", &Filter::new().eq("applianceId", "APP001"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(listed["permittedFuels"], json!(["FUEL001", "FUEL002"]));

    let absent = store
        .find_one("Appliances", &Filter::new().eq("applianceId", "APP002"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(absent["permittedFuels"], json!(null));
}

#[tokio::test]
async fn test_failing_rows_are_isolated() {
    let (_tmp, store, _) = create_test_store().unwrap();
    let summary = ImportReconciler::new(&store)
        .reconcile(
            EntityKind::Users,
            &[
                row(2, &[("userId", "USER001"), ("email", "a@example.com")]),
                row(3, &[("userId", ""), ("email", "b@example.com")]),
                row(4, &[("userId", "USER004"), ("email", "d@example.com")]),
                // same email as row 2 under a different id
                row(5, &[("userId", "USER005"), ("email", "a@example.com")]),
            ],
        )
        .await;

    assert_eq!((summary.inserted, summary.updated, summary.skipped), (2, 0, 2));
    assert_eq!(summary.errors.len(), 2);
    assert_eq!(summary.errors[0].row, Some(3));
    assert_eq!(summary.errors[0].error, "Missing userId");
    assert_eq!(summary.errors[1].row, Some(5));
    assert!(summary.errors[1].error.starts_with("duplicate key"));
    assert_eq!(store.count("Users").await.unwrap(), 2);
}

#[tokio::test]
async fn test_invalid_bagging_rejected_by_store() {
    let (_tmp, store, _) = create_test_store().unwrap();
    let summary = ImportReconciler::new(&store)
        .reconcile(
            EntityKind::Fuels,
            &[
                row(2, &[("fuelId", "FUEL001"), ("fuelBagging", "Sacks")]),
                row(3, &[("fuelId", "FUEL002"), ("fuelBagging", "Bulk")]),
            ],
        )
        .await;

    assert_eq!((summary.inserted, summary.skipped), (1, 1));
    assert_eq!(summary.errors[0].row, Some(2));
    assert!(summary.errors[0].error.contains("fuelBagging must be one of Bagged, Loose, Bulk"));
}

#[tokio::test]
async fn test_sulphur_out_of_range_rejected() {
    let (_tmp, store, _) = create_test_store().unwrap();
    let summary = ImportReconciler::new(&store)
        .reconcile(
            EntityKind::Fuels,
            &[row(2, &[("fuelId", "FUEL001"), ("sulphurContent", "150")])],
        )
        .await;

    assert_eq!(summary.skipped, 1);
    assert!(summary.errors[0].error.contains("sulphurContent"));
    assert_eq!(store.count("Fuels").await.unwrap(), 0);
}
