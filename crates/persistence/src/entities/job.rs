//! Job entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{JobStatus, SyncedJob};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for job_status that maps to PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "job_status", rename_all = "snake_case")]
pub enum JobStatusDb {
    Open,
    OnHold,
    Draft,
    Filled,
    Cancelled,
}

impl From<JobStatusDb> for JobStatus {
    fn from(db_status: JobStatusDb) -> Self {
        match db_status {
            JobStatusDb::Open => JobStatus::Open,
            JobStatusDb::OnHold => JobStatus::OnHold,
            JobStatusDb::Draft => JobStatus::Draft,
            JobStatusDb::Filled => JobStatus::Filled,
            JobStatusDb::Cancelled => JobStatus::Cancelled,
        }
    }
}

impl From<JobStatus> for JobStatusDb {
    fn from(status: JobStatus) -> Self {
        match status {
            JobStatus::Open => JobStatusDb::Open,
            JobStatus::OnHold => JobStatusDb::OnHold,
            JobStatus::Draft => JobStatusDb::Draft,
            JobStatus::Filled => JobStatusDb::Filled,
            JobStatus::Cancelled => JobStatusDb::Cancelled,
        }
    }
}

/// Slim row of the jobs table used by the open job audit.
#[derive(Debug, Clone, FromRow)]
pub struct SyncedJobEntity {
    pub id: Uuid,
    pub external_id: String,
    pub title: String,
    pub status: JobStatusDb,
    pub is_public: bool,
    pub published_at: Option<DateTime<Utc>>,
}

impl From<SyncedJobEntity> for SyncedJob {
    fn from(entity: SyncedJobEntity) -> Self {
        Self {
            id: entity.id,
            external_id: entity.external_id,
            title: entity.title,
            status: entity.status.into(),
            is_public: entity.is_public,
            published_at: entity.published_at,
        }
    }
}
