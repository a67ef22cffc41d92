//! `audit`: open Vincere jobs that are missing or hidden in the database.

use std::collections::HashMap;

use anyhow::Result;
use chrono::Utc;
use domain::models::SyncedJob;
use domain::services::audit_open_jobs;
use persistence::PgImportStore;

use crate::cli::AuditArgs;
use crate::config::Config;
use crate::export::{load_export, write_json};
use crate::report::format_audit_report;

pub async fn run(args: AuditArgs, config: &Config) -> Result<()> {
    config.require_database()?;
    let export = load_export(&args.export_path(&config.import))?;

    let pool = persistence::db::create_pool(&config.database.to_pool_config()).await?;
    let store = PgImportStore::new(pool);

    let synced: HashMap<String, SyncedJob> = store
        .synced_jobs(&config.import.external_source)
        .await?
        .into_iter()
        .map(|job| (job.external_id.clone(), job))
        .collect();
    tracing::info!(synced = synced.len(), "Loaded synced jobs");

    let report = audit_open_jobs(&export.records, &synced, Utc::now());
    write_json(&args.output, &report)?;

    println!("{}", format_audit_report(&report, &args.output));
    Ok(())
}
