//! Command line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use domain::models::ImportOptions;

use crate::config::ImportConfig;
use crate::export::AUDIT_REPORT_FILE;

#[derive(Debug, Parser)]
#[command(name = "lighthouse-sync")]
#[command(about = "Pull, import and audit Vincere job postings", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Import a Vincere export into the jobs table
    Import(ImportArgs),
    /// Pull every position from the Vincere API into a raw export
    Pull(PullArgs),
    /// Report open Vincere jobs that are missing or hidden in the database
    Audit(AuditArgs),
    /// Apply database migrations
    Migrate,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Export file, defaults to import.export_file
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Plan the import and print the batches without inserting
    #[arg(long)]
    pub dry_run: bool,

    /// Import at most N new jobs
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub limit: Option<u64>,

    /// Rows per insert batch, defaults to import.batch_size
    #[arg(long = "batch", value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub batch_size: Option<u64>,

    /// Pause between batches in milliseconds
    #[arg(long, value_name = "MS")]
    pub batch_delay_ms: Option<u64>,

    /// Where failed rows are written, defaults to import.error_log
    #[arg(long)]
    pub error_log: Option<PathBuf>,
}

impl ImportArgs {
    /// Merge flags over configured defaults.
    pub fn options(&self, config: &ImportConfig) -> ImportOptions {
        ImportOptions {
            batch_size: self
                .batch_size
                .map_or(config.batch_size, |size| size as usize),
            limit: self.limit.map(|limit| limit as usize),
            batch_delay_ms: self.batch_delay_ms.unwrap_or(config.batch_delay_ms),
            dry_run: self.dry_run,
            external_source: config.external_source.clone(),
        }
    }

    pub fn export_path(&self, config: &ImportConfig) -> PathBuf {
        self.file
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.export_file))
    }

    pub fn error_log_path(&self, config: &ImportConfig) -> PathBuf {
        self.error_log
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.error_log))
    }
}

#[derive(Debug, Args)]
pub struct PullArgs {
    /// Directory for the raw export and the custom field analysis
    #[arg(long, default_value = "output")]
    pub output_dir: PathBuf,

    /// Fetch details for at most N positions
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub limit: Option<u64>,

    /// Compare pulled ids with the jobs already imported
    #[arg(long)]
    pub compare_db: bool,
}

#[derive(Debug, Args)]
pub struct AuditArgs {
    /// Export file, defaults to import.export_file
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Report destination
    #[arg(long, default_value = AUDIT_REPORT_FILE)]
    pub output: PathBuf,
}

impl AuditArgs {
    pub fn export_path(&self, config: &ImportConfig) -> PathBuf {
        self.file
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.export_file))
    }
}
