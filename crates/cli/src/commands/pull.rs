//! `pull`: export every Vincere position with its custom fields.

use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use domain::models::{DbComparison, VincereExport};
use domain::services::{analyze_custom_fields, compare_with_store, pull_breakdown, summarize_job};
use persistence::PgImportStore;

use crate::cli::PullArgs;
use crate::config::Config;
use crate::export::{
    flag_in_database, write_json, write_summary_csv, FIELD_ANALYSIS_FILE, RAW_EXPORT_FILE,
    SUMMARY_CSV_FILE,
};
use crate::report::format_pull_summary;
use crate::vincere::VincereClient;

/// Progress is logged every this many positions.
const PROGRESS_INTERVAL: usize = 25;

pub async fn run(args: PullArgs, config: &Config) -> Result<()> {
    config.require_vincere()?;
    if args.compare_db {
        config.require_database()?;
    }
    let client = VincereClient::new(config.vincere.clone())?;

    let mut ids = client.list_position_ids().await?;
    if let Some(limit) = args.limit {
        ids.truncate(limit as usize);
    }
    let listed = ids.len();
    tracing::info!(positions = listed, "Fetching position details");

    let delay = Duration::from_millis(config.vincere.request_delay_ms);
    let mut records = Vec::with_capacity(listed);
    for (i, id) in ids.iter().copied().enumerate() {
        if i > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match client.fetch_job_record(id).await {
            Ok(record) => records.push(record),
            Err(e) => tracing::warn!(position_id = id, error = %e, "Skipping position"),
        }

        if (i + 1) % PROGRESS_INTERVAL == 0 {
            tracing::info!(done = i + 1, total = listed, "Pull progress");
        }
    }

    let comparison = if args.compare_db {
        compare_listed(config, ids.iter().map(|id| id.to_string())).await
    } else {
        None
    };
    if let Some(comparison) = &comparison {
        flag_in_database(&mut records, comparison);
    }

    write_json(&args.output_dir.join(RAW_EXPORT_FILE), &records)?;

    let now = Utc::now();
    let export = VincereExport::from_values(records);
    let rows: Vec<_> = export
        .records
        .iter()
        .map(|record| summarize_job(record, now))
        .collect();
    write_summary_csv(&args.output_dir.join(SUMMARY_CSV_FILE), &rows)?;

    let analysis = analyze_custom_fields(&export.records);
    write_json(&args.output_dir.join(FIELD_ANALYSIS_FILE), &analysis)?;

    let breakdown = pull_breakdown(&export.records, now);
    println!(
        "{}",
        format_pull_summary(
            listed,
            &breakdown,
            &analysis,
            comparison.as_ref(),
            &args.output_dir
        )
    );
    Ok(())
}

/// A failed comparison is logged and skipped so the pull itself is kept.
async fn compare_listed<I>(config: &Config, ids: I) -> Option<DbComparison>
where
    I: IntoIterator<Item = String>,
{
    let pool = match persistence::db::create_pool(&config.database.to_pool_config()).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::warn!(error = %e, "Skipping database comparison");
            return None;
        }
    };
    let store = PgImportStore::new(pool);

    match compare_with_store(&store, &config.import.external_source, ids).await {
        Ok(comparison) => Some(comparison),
        Err(e) => {
            tracing::warn!(error = %e, "Skipping database comparison");
            None
        }
    }
}
