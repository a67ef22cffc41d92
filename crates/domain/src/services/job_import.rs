//! Job import orchestration.
//!
//! load -> diff against existing ids -> map -> resolve clients -> insert.
//! Batches run strictly in order with a fixed pause between them. A failed
//! batch is recorded row by row and the run moves on.

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;

use super::job_mapper::map_vincere_job;
use crate::models::{
    build_client_lookup, BatchResult, ClientRef, FailedRow, ImportOptions, ImportSummary,
    JobStatus, NewJob, PlannedBatch, VincereExport,
};

/// Errors raised by an [`ImportStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error, carrying the driver's message.
    #[error("{0}")]
    Database(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Storage the importer reads from and writes to.
#[async_trait::async_trait]
pub trait ImportStore: Send + Sync {
    /// External ids already stored for a source.
    async fn existing_external_ids(&self, external_source: &str)
        -> Result<HashSet<String>, StoreError>;

    /// Clients carrying a Vincere company id.
    async fn clients_with_vincere_id(&self) -> Result<Vec<ClientRef>, StoreError>;

    /// Insert one batch. Either every row lands or none do.
    async fn insert_jobs(&self, jobs: &[NewJob]) -> Result<usize, StoreError>;
}

/// In-memory store for development and testing.
///
/// Rejects rows whose idempotency key is already stored, like the unique
/// index does, and can be told to fail any batch containing given ids.
#[derive(Debug, Default)]
pub struct MockImportStore {
    jobs: Mutex<Vec<NewJob>>,
    batches: Mutex<Vec<Vec<String>>>,
    clients: Vec<ClientRef>,
    failing_external_ids: HashSet<String>,
    unavailable: bool,
}

impl MockImportStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every call fails.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn with_clients(mut self, clients: Vec<ClientRef>) -> Self {
        self.clients = clients;
        self
    }

    /// Seed rows as if a previous run had stored them.
    pub fn with_jobs(self, jobs: Vec<NewJob>) -> Self {
        *self.jobs.lock().unwrap_or_else(PoisonError::into_inner) = jobs;
        self
    }

    /// Fail any batch that contains this external id.
    pub fn failing_on(mut self, external_id: impl Into<String>) -> Self {
        self.failing_external_ids.insert(external_id.into());
        self
    }

    /// Rows stored so far.
    pub fn jobs(&self) -> Vec<NewJob> {
        self.jobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// External ids of every batch received, failed ones included.
    pub fn received_batches(&self) -> Vec<Vec<String>> {
        self.batches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable {
            tracing::warn!("Mock import store simulating outage");
            return Err(StoreError::Unavailable("simulated outage".to_string()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ImportStore for MockImportStore {
    async fn existing_external_ids(
        &self,
        external_source: &str,
    ) -> Result<HashSet<String>, StoreError> {
        self.check_available()?;
        Ok(self
            .jobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|job| job.external_source == external_source)
            .map(|job| job.external_id.clone())
            .collect())
    }

    async fn clients_with_vincere_id(&self) -> Result<Vec<ClientRef>, StoreError> {
        self.check_available()?;
        Ok(self.clients.clone())
    }

    async fn insert_jobs(&self, jobs: &[NewJob]) -> Result<usize, StoreError> {
        self.check_available()?;
        self.batches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(jobs.iter().map(|job| job.external_id.clone()).collect());

        if let Some(job) = jobs
            .iter()
            .find(|job| self.failing_external_ids.contains(&job.external_id))
        {
            return Err(StoreError::Database(format!(
                "simulated failure on external id {}",
                job.external_id
            )));
        }

        let mut stored = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        let mut keys: HashSet<(String, String)> = stored
            .iter()
            .map(|job| (job.external_id.clone(), job.external_source.clone()))
            .collect();
        for job in jobs {
            if !keys.insert((job.external_id.clone(), job.external_source.clone())) {
                return Err(StoreError::Database(format!(
                    "duplicate key value violates unique constraint \"jobs_external_id_source_key\" ({})",
                    job.external_id
                )));
            }
        }

        stored.extend(jobs.iter().cloned());
        Ok(jobs.len())
    }
}

/// Everything decided before the first insert.
#[derive(Debug, Clone, Default)]
pub struct ImportPlan {
    pub fetched: usize,
    pub invalid: usize,
    pub duplicates: usize,
    pub existing: usize,
    pub skipped: usize,
    pub over_limit: usize,
    pub unresolved_clients: usize,
    /// Mapped rows with clients resolved, in export order.
    pub jobs: Vec<NewJob>,
}

impl ImportPlan {
    pub fn by_status(&self) -> BTreeMap<JobStatus, usize> {
        let mut counts = BTreeMap::new();
        for job in &self.jobs {
            *counts.entry(job.status).or_insert(0) += 1;
        }
        counts
    }
}

/// Split rows into the batches an import would send.
pub fn plan_batches(jobs: &[NewJob], batch_size: usize) -> Vec<PlannedBatch> {
    jobs.chunks(batch_size.max(1))
        .enumerate()
        .filter_map(|(i, chunk)| {
            Some(PlannedBatch {
                index: i + 1,
                size: chunk.len(),
                first_external_id: chunk.first()?.external_id.clone(),
                last_external_id: chunk.last()?.external_id.clone(),
            })
        })
        .collect()
}

/// Runs Vincere exports into an [`ImportStore`].
pub struct JobImporter<S> {
    store: S,
    options: ImportOptions,
}

impl<S: ImportStore> JobImporter<S> {
    pub fn new(store: S, options: ImportOptions) -> Self {
        Self { store, options }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// Read-only planning: diff against the store, limit, map and link clients.
    pub async fn plan(
        &self,
        export: &VincereExport,
        now: DateTime<Utc>,
    ) -> Result<ImportPlan, StoreError> {
        let source = self.options.external_source.as_str();

        let existing_ids = self.store.existing_external_ids(source).await?;
        tracing::info!(
            external_source = %source,
            existing = existing_ids.len(),
            "Loaded existing external ids"
        );

        let clients = self.store.clients_with_vincere_id().await?;
        let client_lookup = build_client_lookup(clients);
        tracing::info!(clients = client_lookup.len(), "Built client lookup");

        let mut plan = ImportPlan {
            fetched: export.len(),
            invalid: export.invalid,
            existing: existing_ids.len(),
            ..ImportPlan::default()
        };

        let mut seen = HashSet::new();
        let mut fresh = Vec::new();
        for record in &export.records {
            let external_id = record.external_id();
            if !seen.insert(external_id.clone()) {
                tracing::debug!(external_id = %external_id, "Duplicate id in export");
                plan.duplicates += 1;
                continue;
            }
            if existing_ids.contains(&external_id) {
                plan.skipped += 1;
                continue;
            }
            fresh.push(record);
        }

        if let Some(limit) = self.options.limit {
            if fresh.len() > limit {
                plan.over_limit = fresh.len() - limit;
                fresh.truncate(limit);
            }
        }

        for record in fresh {
            let job = map_vincere_job(record, source, now).resolve_client(&client_lookup);
            if job.client_id.is_none() {
                plan.unresolved_clients += 1;
            }
            plan.jobs.push(job);
        }

        tracing::info!(
            fetched = plan.fetched,
            invalid = plan.invalid,
            duplicates = plan.duplicates,
            skipped = plan.skipped,
            over_limit = plan.over_limit,
            to_import = plan.jobs.len(),
            unresolved_clients = plan.unresolved_clients,
            "Import planned"
        );

        Ok(plan)
    }

    /// Plan and, unless this is a dry run, insert.
    ///
    /// Only planning errors are returned. Insert failures end up in the
    /// summary's batch results.
    pub async fn run(
        &self,
        export: &VincereExport,
        now: DateTime<Utc>,
    ) -> Result<ImportSummary, StoreError> {
        let started_at = Utc::now();
        let plan = self.plan(export, now).await?;

        let mut summary = ImportSummary {
            external_source: self.options.external_source.clone(),
            dry_run: self.options.dry_run,
            fetched: plan.fetched,
            invalid: plan.invalid,
            duplicates: plan.duplicates,
            existing: plan.existing,
            skipped: plan.skipped,
            over_limit: plan.over_limit,
            to_import: plan.jobs.len(),
            inserted: 0,
            failed: 0,
            unresolved_clients: plan.unresolved_clients,
            by_status: plan.by_status(),
            batches: Vec::new(),
            planned_batches: plan_batches(&plan.jobs, self.options.batch_size),
            started_at,
            finished_at: started_at,
        };

        if self.options.dry_run {
            tracing::info!(
                batches = summary.planned_batches.len(),
                "Dry run, nothing written"
            );
        } else if !plan.jobs.is_empty() {
            summary.batches = self.insert_batches(&plan.jobs).await;
            summary.inserted = summary.batches.iter().map(|b| b.inserted).sum();
            summary.failed = summary.batches.iter().map(|b| b.failed.len()).sum();
        }

        summary.finished_at = Utc::now();
        tracing::info!(
            status = %summary.status(),
            inserted = summary.inserted,
            failed = summary.failed,
            "Import finished"
        );

        Ok(summary)
    }

    async fn insert_batches(&self, jobs: &[NewJob]) -> Vec<BatchResult> {
        let batch_size = self.options.batch_size.max(1);
        let delay = Duration::from_millis(self.options.batch_delay_ms);
        let total = jobs.len().div_ceil(batch_size);
        let mut results = Vec::with_capacity(total);

        for (i, chunk) in jobs.chunks(batch_size).enumerate() {
            let index = i + 1;
            if i > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            match self.store.insert_jobs(chunk).await {
                Ok(inserted) => {
                    tracing::info!(batch = index, total, inserted, "Batch inserted");
                    results.push(BatchResult {
                        index,
                        inserted,
                        failed: Vec::new(),
                    });
                }
                Err(e) => {
                    let ids: Vec<&str> = chunk.iter().map(|j| j.external_id.as_str()).collect();
                    tracing::error!(
                        batch = index,
                        total,
                        external_ids = ?ids,
                        error = %e,
                        "Batch insert failed"
                    );
                    let error = e.to_string();
                    results.push(BatchResult {
                        index,
                        inserted: 0,
                        failed: chunk
                            .iter()
                            .map(|job| FailedRow {
                                id: job.external_id.clone(),
                                error: error.clone(),
                            })
                            .collect(),
                    });
                }
            }
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ImportRunStatus, VincereJobRecord};
    use chrono::TimeZone;
    use serde_json::json;
    use uuid::Uuid;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn record(id: i64, company_id: Option<i64>) -> VincereJobRecord {
        serde_json::from_value(json!({
            "job": {
                "id": id,
                "job_title": format!("Position {}", id),
                "company_id": company_id,
                "job_status": "OPEN",
                "open_date": "2025-01-01"
            },
            "custom_fields": {}
        }))
        .unwrap()
    }

    fn export(ids: &[i64]) -> VincereExport {
        VincereExport {
            records: ids.iter().map(|id| record(*id, None)).collect(),
            invalid: 0,
        }
    }

    fn options(batch_size: usize) -> ImportOptions {
        ImportOptions {
            batch_size,
            batch_delay_ms: 0,
            ..ImportOptions::default()
        }
    }

    #[tokio::test]
    async fn test_import_inserts_in_batches() {
        let importer = JobImporter::new(MockImportStore::new(), options(2));
        let summary = importer.run(&export(&[1, 2, 3, 4, 5]), now()).await.unwrap();

        assert_eq!(summary.fetched, 5);
        assert_eq!(summary.to_import, 5);
        assert_eq!(summary.inserted, 5);
        assert_eq!(summary.batches.len(), 3);
        assert_eq!(summary.status(), ImportRunStatus::Completed);
        assert_eq!(summary.by_status.get(&JobStatus::Open), Some(&5));
        assert_eq!(
            importer.store().received_batches(),
            vec![
                vec!["1".to_string(), "2".to_string()],
                vec!["3".to_string(), "4".to_string()],
                vec!["5".to_string()],
            ]
        );
    }

    #[tokio::test]
    async fn test_second_run_is_idempotent() {
        let importer = JobImporter::new(MockImportStore::new(), options(50));
        let export = export(&[10, 11, 12]);

        let first = importer.run(&export, now()).await.unwrap();
        let second = importer.run(&export, now()).await.unwrap();

        assert_eq!(first.inserted, 3);
        assert_eq!(second.inserted, 0);
        assert_eq!(second.skipped, first.inserted);
        assert_eq!(second.status(), ImportRunStatus::NothingToImport);
        assert_eq!(importer.store().jobs().len(), 3);
    }

    #[tokio::test]
    async fn test_existing_ids_never_reach_a_batch() {
        let seeded = map_vincere_job(&record(2, None), "vincere", now()).job;
        let store = MockImportStore::new().with_jobs(vec![seeded]);
        let importer = JobImporter::new(store, options(50));

        let summary = importer.run(&export(&[1, 2, 3]), now()).await.unwrap();

        assert_eq!(summary.existing, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.inserted, 2);
        for batch in importer.store().received_batches() {
            assert!(!batch.contains(&"2".to_string()));
        }
    }

    #[tokio::test]
    async fn test_existing_ids_are_scoped_by_source() {
        let other = map_vincere_job(&record(1, None), "bubble", now()).job;
        let importer = JobImporter::new(MockImportStore::new().with_jobs(vec![other]), options(50));

        let summary = importer.run(&export(&[1]), now()).await.unwrap();
        assert_eq!(summary.skipped, 0);
        assert_eq!(summary.inserted, 1);
    }

    #[tokio::test]
    async fn test_failed_batch_does_not_stop_the_run() {
        let store = MockImportStore::new().failing_on("3");
        let importer = JobImporter::new(store, options(2));

        let summary = importer.run(&export(&[1, 2, 3, 4, 5]), now()).await.unwrap();

        assert_eq!(summary.batches.len(), 3);
        assert!(summary.batches[1].is_failure());
        assert_eq!(summary.inserted, 3);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.status(), ImportRunStatus::CompletedWithErrors);

        let failed = summary.failed_rows();
        assert_eq!(
            failed.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
            vec!["3", "4"]
        );
        assert!(failed[0].error.contains("simulated failure"));
        assert_eq!(importer.store().received_batches().len(), 3);
    }

    #[tokio::test]
    async fn test_dry_run_plans_without_writing() {
        let importer = JobImporter::new(
            MockImportStore::new(),
            ImportOptions {
                dry_run: true,
                ..options(2)
            },
        );

        let summary = importer.run(&export(&[7, 8, 9]), now()).await.unwrap();

        assert_eq!(summary.status(), ImportRunStatus::DryRun);
        assert_eq!(summary.inserted, 0);
        assert!(summary.batches.is_empty());
        assert_eq!(
            summary.planned_batches,
            vec![
                PlannedBatch {
                    index: 1,
                    size: 2,
                    first_external_id: "7".to_string(),
                    last_external_id: "8".to_string(),
                },
                PlannedBatch {
                    index: 2,
                    size: 1,
                    first_external_id: "9".to_string(),
                    last_external_id: "9".to_string(),
                },
            ]
        );
        assert!(importer.store().received_batches().is_empty());
    }

    #[tokio::test]
    async fn test_duplicates_and_limit() {
        let importer = JobImporter::new(
            MockImportStore::new(),
            ImportOptions {
                limit: Some(2),
                ..options(50)
            },
        );
        let mut export = export(&[1, 1, 2, 3, 4]);
        export.invalid = 1;

        let summary = importer.run(&export, now()).await.unwrap();

        assert_eq!(summary.fetched, 6);
        assert_eq!(summary.invalid, 1);
        assert_eq!(summary.duplicates, 1);
        assert_eq!(summary.over_limit, 2);
        assert_eq!(summary.inserted, 2);
        let ids: Vec<String> = importer.store().jobs().into_iter().map(|j| j.external_id).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_clients_are_resolved() {
        let client = ClientRef {
            id: Uuid::new_v4(),
            name: "Ocean Holdings".to_string(),
            vincere_id: "5".to_string(),
        };
        let store = MockImportStore::new().with_clients(vec![client.clone()]);
        let importer = JobImporter::new(store, options(50));
        let export = VincereExport {
            records: vec![record(1, Some(5)), record(2, Some(6)), record(3, None)],
            invalid: 0,
        };

        let summary = importer.run(&export, now()).await.unwrap();
        assert_eq!(summary.unresolved_clients, 2);

        let jobs = importer.store().jobs();
        assert_eq!(jobs[0].client_id, Some(client.id));
        assert_eq!(jobs[1].client_id, None);
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_planning() {
        let importer = JobImporter::new(MockImportStore::unavailable(), options(50));
        let result = importer.run(&export(&[1]), now()).await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }

    #[test]
    fn test_plan_batches_empty() {
        assert!(plan_batches(&[], 50).is_empty());
    }
}
