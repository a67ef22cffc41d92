//! Job repository for database operations.

use domain::models::NewJob;
use sqlx::PgPool;

use crate::entities::{JobStatusDb, SyncedJobEntity};
use crate::metrics::QueryTimer;

/// Repository for the jobs table.
#[derive(Clone)]
pub struct JobRepository {
    pool: PgPool,
}

impl JobRepository {
    /// Creates a new JobRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// External ids already stored for a source.
    ///
    /// Soft-deleted rows are included: they still hold the unique key.
    pub async fn existing_external_ids(
        &self,
        external_source: &str,
    ) -> Result<Vec<String>, sqlx::Error> {
        let timer = QueryTimer::new("existing_job_external_ids");
        let result = sqlx::query_scalar::<_, String>(
            r#"
            SELECT external_id
            FROM jobs
            WHERE external_source = $1 AND external_id IS NOT NULL
            "#,
        )
        .bind(external_source)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Insert a batch of jobs in one transaction.
    pub async fn insert_batch(&self, jobs: &[NewJob]) -> Result<usize, sqlx::Error> {
        let timer = QueryTimer::new("insert_jobs_batch");
        let mut tx = self.pool.begin().await?;

        for job in jobs {
            sqlx::query(
                r#"
                INSERT INTO jobs (
                    external_id, external_source, title, description,
                    vessel_name, vessel_type, vessel_size_meters,
                    salary_min, salary_max, salary_currency, salary_period,
                    status, visibility, is_public,
                    holiday_days, rotation_schedule, contract_type, client_id,
                    start_date, requirements, itinerary, program,
                    published_at, external_created_at, external_updated_at
                )
                VALUES (
                    $1, $2, $3, $4,
                    $5, $6, $7,
                    $8, $9, $10, $11,
                    $12, $13, $14,
                    $15, $16, $17, $18,
                    $19, $20, $21, $22,
                    $23, $24, $25
                )
                "#,
            )
            .bind(&job.external_id)
            .bind(&job.external_source)
            .bind(&job.title)
            .bind(&job.description)
            .bind(&job.vessel_name)
            .bind(job.vessel_type.map(|t| t.as_str()))
            .bind(job.vessel_size_meters)
            .bind(job.salary_min)
            .bind(job.salary_max)
            .bind(&job.salary_currency)
            .bind(job.salary_period.map(|p| p.as_str()))
            .bind(JobStatusDb::from(job.status))
            .bind(job.visibility.as_str())
            .bind(job.is_public)
            .bind(job.holiday_days)
            .bind(&job.rotation_schedule)
            .bind(job.contract_type.map(|c| c.as_str()))
            .bind(job.client_id)
            .bind(job.start_date)
            .bind(&job.requirements)
            .bind(&job.itinerary)
            .bind(&job.program)
            .bind(job.published_at)
            .bind(job.external_created_at)
            .bind(job.external_updated_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        timer.record();
        Ok(jobs.len())
    }

    /// Live (not soft-deleted) jobs synced from a source.
    pub async fn list_synced(
        &self,
        external_source: &str,
    ) -> Result<Vec<SyncedJobEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_synced_jobs");
        let result = sqlx::query_as::<_, SyncedJobEntity>(
            r#"
            SELECT id, external_id, title, status, is_public, published_at
            FROM jobs
            WHERE external_source = $1
              AND external_id IS NOT NULL
              AND deleted_at IS NULL
            ORDER BY external_id
            "#,
        )
        .bind(external_source)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
