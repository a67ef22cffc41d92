//! PostgreSQL-backed [`ImportStore`].

use std::collections::HashSet;

use domain::models::{ClientRef, NewJob, SyncedJob};
use domain::services::{ImportStore, StoreError};
use sqlx::PgPool;

use crate::metrics::record_import_batch;
use crate::repositories::{ClientRepository, JobRepository};

fn to_store_error(e: sqlx::Error) -> StoreError {
    if matches!(
        e,
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
    ) {
        return StoreError::Unavailable(e.to_string());
    }
    match e {
        sqlx::Error::Database(db_err) => StoreError::Database(db_err.message().to_string()),
        other => StoreError::Database(other.to_string()),
    }
}

/// Import store over the jobs and clients tables.
#[derive(Clone)]
pub struct PgImportStore {
    jobs: JobRepository,
    clients: ClientRepository,
}

impl PgImportStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            jobs: JobRepository::new(pool.clone()),
            clients: ClientRepository::new(pool),
        }
    }

    /// Live synced jobs for a source, for the open job audit.
    pub async fn synced_jobs(&self, external_source: &str) -> Result<Vec<SyncedJob>, StoreError> {
        let rows = self
            .jobs
            .list_synced(external_source)
            .await
            .map_err(to_store_error)?;
        Ok(rows.into_iter().map(SyncedJob::from).collect())
    }
}

#[async_trait::async_trait]
impl ImportStore for PgImportStore {
    async fn existing_external_ids(
        &self,
        external_source: &str,
    ) -> Result<HashSet<String>, StoreError> {
        let ids = self
            .jobs
            .existing_external_ids(external_source)
            .await
            .map_err(to_store_error)?;
        Ok(ids.into_iter().collect())
    }

    async fn clients_with_vincere_id(&self) -> Result<Vec<ClientRef>, StoreError> {
        let rows = self
            .clients
            .find_with_vincere_id()
            .await
            .map_err(to_store_error)?;
        Ok(rows.into_iter().map(ClientRef::from).collect())
    }

    async fn insert_jobs(&self, jobs: &[NewJob]) -> Result<usize, StoreError> {
        let source = jobs
            .first()
            .map(|job| job.external_source.as_str())
            .unwrap_or_default();

        match self.jobs.insert_batch(jobs).await {
            Ok(inserted) => {
                record_import_batch(source, inserted, 0);
                Ok(inserted)
            }
            Err(e) => {
                record_import_batch(source, 0, jobs.len());
                Err(to_store_error(e))
            }
        }
    }
}
