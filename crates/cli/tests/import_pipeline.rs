//! End-to-end import runs: export file on disk, in-memory store, error log.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{TimeZone, Utc};
use domain::models::{
    ClientRef, ImportOptions, ImportRunStatus, JobStatus, SalaryPeriod, VincereJobField,
};
use domain::services::{compare_with_store, JobImporter, MockImportStore};
use fake::faker::company::en::CompanyName;
use fake::Fake;
use lighthouse_sync::commands::import::import_export;
use lighthouse_sync::export::{flag_in_database, load_export, write_json, ExportError};
use lighthouse_sync::report::format_import_summary;
use serde_json::{json, Map, Value as JsonValue};
use uuid::Uuid;

fn scratch_dir() -> PathBuf {
    std::env::temp_dir().join(format!("lighthouse-sync-test-{}", Uuid::new_v4()))
}

fn position(id: i64, title: &str, company_id: i64) -> JsonValue {
    let mut custom_fields = Map::new();
    for (field, value) in [
        (VincereJobField::Salary, "6.500€-8.000€"),
        (VincereJobField::HolidayPackage, "2:2 rotation"),
    ] {
        custom_fields.insert(
            field.key().to_string(),
            json!({ "key": field.key(), "name": field.label(), "field_value": value }),
        );
    }

    json!({
        "job": {
            "id": id,
            "job_title": title,
            "company_id": company_id,
            "job_status": "OPEN",
            "open_date": "2025-01-01"
        },
        "custom_fields": custom_fields
    })
}

fn write_export(dir: &Path, entries: Vec<JsonValue>) -> PathBuf {
    let path = dir.join("vincere-jobs-raw.json");
    write_json(&path, &entries).unwrap();
    path
}

fn options(batch_size: usize) -> ImportOptions {
    ImportOptions {
        batch_size,
        batch_delay_ms: 0,
        ..ImportOptions::default()
    }
}

fn new_importer(store: MockImportStore, options: ImportOptions) -> JobImporter<MockImportStore> {
    JobImporter::new(store, options)
}

#[tokio::test]
async fn test_import_writes_jobs_and_links_clients() {
    let dir = scratch_dir();
    let export_path = write_export(
        &dir,
        vec![
            position(101, "Captain", 5),
            position(102, "Chief Stew", 6),
            json!({ "job": { "job_title": "No id" } }),
        ],
    );

    let export = load_export(&export_path).unwrap();
    assert_eq!(export.records.len(), 2);
    assert_eq!(export.invalid, 1);

    let client_id = Uuid::new_v4();
    let store = MockImportStore::new().with_clients(vec![ClientRef {
        id: client_id,
        name: CompanyName().fake(),
        vincere_id: "5".to_string(),
    }]);
    let importer = new_importer(store, options(50));

    let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
    let error_log = dir.join("import-errors.json");
    let summary = import_export(&importer, &export, &error_log, now)
        .await
        .unwrap();

    assert_eq!(summary.status(), ImportRunStatus::Completed);
    assert_eq!(summary.fetched, 3);
    assert_eq!(summary.invalid, 1);
    assert_eq!(summary.inserted, 2);
    assert_eq!(summary.unresolved_clients, 1);
    assert_eq!(summary.by_status.get(&JobStatus::Open), Some(&2));
    assert!(!error_log.exists());

    let jobs = importer.store().jobs();
    let captain = jobs.iter().find(|job| job.external_id == "101").unwrap();
    assert_eq!(captain.client_id, Some(client_id));
    assert_eq!(captain.salary_min, Some(6500));
    assert_eq!(captain.salary_max, Some(8000));
    assert_eq!(captain.salary_period, Some(SalaryPeriod::Monthly));
    assert_eq!(captain.rotation_schedule.as_deref(), Some("2:2"));
    assert_eq!(captain.holiday_days, None);

    fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_rerun_imports_nothing() {
    let dir = scratch_dir();
    let export = load_export(&write_export(
        &dir,
        vec![position(201, "Deckhand", 1), position(202, "Bosun", 1)],
    ))
    .unwrap();
    let importer = new_importer(MockImportStore::new(), options(50));
    let error_log = dir.join("import-errors.json");
    let now = Utc::now();

    let first = import_export(&importer, &export, &error_log, now)
        .await
        .unwrap();
    assert_eq!(first.inserted, 2);

    let second = import_export(&importer, &export, &error_log, now)
        .await
        .unwrap();
    assert_eq!(second.skipped, 2);
    assert_eq!(second.to_import, 0);
    assert_eq!(second.status(), ImportRunStatus::NothingToImport);
    assert_eq!(importer.store().jobs().len(), 2);

    fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_failed_batch_is_logged_and_run_continues() {
    let dir = scratch_dir();
    let export = load_export(&write_export(
        &dir,
        (1..=5)
            .map(|id| position(300 + id, "Deckhand", 1))
            .collect(),
    ))
    .unwrap();
    let importer = new_importer(MockImportStore::new().failing_on("303"), options(2));
    let error_log = dir.join("logs/import-errors.json");

    let summary = import_export(&importer, &export, &error_log, Utc::now())
        .await
        .unwrap();

    assert_eq!(summary.batches.len(), 3);
    assert_eq!(summary.inserted, 3);
    assert_eq!(summary.failed, 2);
    assert_eq!(summary.status(), ImportRunStatus::CompletedWithErrors);

    let logged: JsonValue = serde_json::from_str(&fs::read_to_string(&error_log).unwrap()).unwrap();
    let ids: Vec<&str> = logged
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["303", "304"]);
    assert!(logged[0]["error"].as_str().unwrap().contains("303"));

    let text = format_import_summary(&summary, Some(&error_log));
    assert!(text.contains("1 of 3 batches failed"));
    assert!(text.contains("import-errors.json"));

    fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_dry_run_plans_without_inserting() {
    let dir = scratch_dir();
    let export = load_export(&write_export(
        &dir,
        (1..=5)
            .map(|id| position(400 + id, "Chef", 1))
            .collect(),
    ))
    .unwrap();
    let importer = new_importer(
        MockImportStore::new(),
        ImportOptions {
            dry_run: true,
            limit: Some(4),
            ..options(3)
        },
    );
    let error_log = dir.join("import-errors.json");

    let summary = import_export(&importer, &export, &error_log, Utc::now())
        .await
        .unwrap();

    assert_eq!(summary.status(), ImportRunStatus::DryRun);
    assert_eq!(summary.to_import, 4);
    assert_eq!(summary.over_limit, 1);
    assert_eq!(summary.planned_batches.len(), 2);
    assert_eq!(summary.planned_batches[1].first_external_id, "404");
    assert!(importer.store().jobs().is_empty());
    assert!(importer.store().received_batches().is_empty());
    assert!(!error_log.exists());

    fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_unavailable_store_fails_the_run() {
    let dir = scratch_dir();
    let export = load_export(&write_export(&dir, vec![position(501, "Purser", 1)])).unwrap();

    let importer = new_importer(MockImportStore::unavailable(), options(50));

    let result = import_export(&importer, &export, &dir.join("import-errors.json"), Utc::now()).await;
    assert!(result.is_err());

    fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_compare_pull_with_imported_jobs() {
    let dir = scratch_dir();
    let export = load_export(&write_export(
        &dir,
        vec![position(601, "Captain", 1), position(602, "Mate", 1)],
    ))
    .unwrap();
    let importer = new_importer(MockImportStore::new(), options(50));
    import_export(&importer, &export, &dir.join("import-errors.json"), Utc::now())
        .await
        .unwrap();

    // 602 was taken down in Vincere, 603 is new.
    let pulled = vec![position(601, "Captain", 1), position(603, "Chef", 1)];
    let comparison = compare_with_store(
        importer.store(),
        "vincere",
        ["601", "603"].iter().map(|id| id.to_string()),
    )
    .await
    .unwrap();

    assert_eq!(comparison.stored_count(), 1);
    assert_eq!(comparison.missing_from_db, vec!["603"]);
    assert_eq!(comparison.extra_in_db, vec!["602"]);

    let mut raw = pulled;
    flag_in_database(&mut raw, &comparison);
    assert_eq!(raw[0]["in_database"], json!(true));
    assert_eq!(raw[1]["in_database"], json!(false));

    let other_source = compare_with_store(importer.store(), "bubble", vec!["601".to_string()])
        .await
        .unwrap();
    assert_eq!(other_source.missing_from_db, vec!["601"]);

    assert!(
        compare_with_store(&MockImportStore::unavailable(), "vincere", Vec::new())
            .await
            .is_err()
    );

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_missing_export_fails_before_any_work() {
    let err = load_export(&scratch_dir().join("vincere-jobs-raw.json")).unwrap_err();
    assert!(matches!(err, ExportError::NotFound(_)));
}
