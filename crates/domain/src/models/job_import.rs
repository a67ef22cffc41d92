//! Job import models: run options, batch outcomes and the run summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

use super::job::{JobStatus, EXTERNAL_SOURCE_VINCERE};

/// Default number of rows per insert batch.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Default pause between batches, to go easy on the database.
pub const DEFAULT_BATCH_DELAY_MS: u64 = 200;

/// Options for one import run.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct ImportOptions {
    /// Rows per insert batch.
    #[validate(custom(function = "shared::validation::validate_batch_size"))]
    pub batch_size: usize,

    /// Cap on the number of new rows processed.
    #[validate(range(min = 1, message = "limit must be at least 1"))]
    pub limit: Option<usize>,

    /// Pause between consecutive batches.
    #[validate(custom(function = "shared::validation::validate_batch_delay"))]
    pub batch_delay_ms: u64,

    /// Plan only, never write.
    pub dry_run: bool,

    /// Source tag half of the idempotency key.
    #[validate(custom(function = "shared::validation::validate_source_tag"))]
    pub external_source: String,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            limit: None,
            batch_delay_ms: DEFAULT_BATCH_DELAY_MS,
            dry_run: false,
            external_source: EXTERNAL_SOURCE_VINCERE.to_string(),
        }
    }
}

/// A row that could not be inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedRow {
    /// External id of the row.
    pub id: String,
    /// Database error message.
    pub error: String,
}

/// Outcome of a single insert batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BatchResult {
    /// 1-based batch number.
    pub index: usize,
    pub inserted: usize,
    pub failed: Vec<FailedRow>,
}

impl BatchResult {
    pub fn is_failure(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// A batch that would be sent, reported by dry runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PlannedBatch {
    pub index: usize,
    pub size: usize,
    pub first_external_id: String,
    pub last_external_id: String,
}

/// Overall outcome of an import run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportRunStatus {
    /// Planned only.
    DryRun,
    /// Every new row was already present; nothing was sent.
    NothingToImport,
    /// All batches succeeded.
    Completed,
    /// At least one batch failed.
    CompletedWithErrors,
}

impl ImportRunStatus {
    /// Convert to report string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DryRun => "dry_run",
            Self::NothingToImport => "nothing_to_import",
            Self::Completed => "completed",
            Self::CompletedWithErrors => "completed_with_errors",
        }
    }
}

impl std::fmt::Display for ImportRunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// End-of-run summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ImportSummary {
    pub external_source: String,
    pub dry_run: bool,
    /// Records in the export.
    pub fetched: usize,
    /// Records that could not be read (no usable job id).
    pub invalid: usize,
    /// Repeated external ids inside the export.
    pub duplicates: usize,
    /// External ids already present in the database for this source.
    pub existing: usize,
    /// Export records skipped because they were already imported.
    pub skipped: usize,
    /// New records left out by `--limit`.
    pub over_limit: usize,
    /// Records mapped and scheduled for insert.
    pub to_import: usize,
    pub inserted: usize,
    pub failed: usize,
    /// Scheduled rows whose company did not match any client.
    pub unresolved_clients: usize,
    /// Scheduled rows by derived status.
    pub by_status: BTreeMap<JobStatus, usize>,
    pub batches: Vec<BatchResult>,
    pub planned_batches: Vec<PlannedBatch>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ImportSummary {
    /// Overall run status.
    pub fn status(&self) -> ImportRunStatus {
        if self.dry_run {
            ImportRunStatus::DryRun
        } else if self.to_import == 0 {
            ImportRunStatus::NothingToImport
        } else if self.failed > 0 {
            ImportRunStatus::CompletedWithErrors
        } else {
            ImportRunStatus::Completed
        }
    }

    /// Every failed row across all batches, in batch order.
    pub fn failed_rows(&self) -> Vec<FailedRow> {
        self.batches
            .iter()
            .flat_map(|batch| batch.failed.iter().cloned())
            .collect()
    }
}
