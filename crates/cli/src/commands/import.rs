//! `import`: load a Vincere export into the jobs table.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use domain::models::{ImportSummary, VincereExport};
use domain::services::{ImportStore, JobImporter};
use persistence::metrics::record_pool_metrics;
use persistence::PgImportStore;
use validator::Validate;

use crate::cli::ImportArgs;
use crate::config::Config;
use crate::export::{load_export, write_error_log};
use crate::report::format_import_summary;

pub async fn run(args: ImportArgs, config: &Config) -> Result<()> {
    config.require_database()?;

    let options = args.options(&config.import);
    options.validate().context("Invalid import options")?;

    let export = load_export(&args.export_path(&config.import))?;
    let error_log = args.error_log_path(&config.import);

    let pool = persistence::db::create_pool(&config.database.to_pool_config()).await?;
    let importer = JobImporter::new(PgImportStore::new(pool.clone()), options);
    let summary = import_export(&importer, &export, &error_log, Utc::now()).await?;
    record_pool_metrics(&pool);

    println!("{}", format_import_summary(&summary, Some(&error_log)));
    Ok(())
}

/// Run an import against any store and write the error log when rows
/// failed. Batch failures do not make this fail.
pub async fn import_export<S: ImportStore>(
    importer: &JobImporter<S>,
    export: &VincereExport,
    error_log: &Path,
    now: DateTime<Utc>,
) -> Result<ImportSummary> {
    let summary = importer
        .run(export, now)
        .await
        .context("Import planning failed")?;

    let failed = summary.failed_rows();
    if !failed.is_empty() {
        write_error_log(error_log, &failed)?;
    }
    Ok(summary)
}
