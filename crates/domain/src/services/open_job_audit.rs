//! Open job audit: which Vincere jobs should be live but are not.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use super::job_status::derive_job_status;
use crate::models::{
    IncorrectlyClosedJob, JobStatus, OpenJobAuditReport, OpenJobCandidate, SyncedJob,
    VincereJobRecord,
};

/// Classify every export job whose derived status is open against the
/// synced jobs, keyed by external id.
///
/// A job is correctly open only when the database has it open and public.
pub fn audit_open_jobs(
    records: &[VincereJobRecord],
    synced: &HashMap<String, SyncedJob>,
    now: DateTime<Utc>,
) -> OpenJobAuditReport {
    let mut report = OpenJobAuditReport::default();

    for record in records {
        if derive_job_status(&record.job, now) != JobStatus::Open {
            continue;
        }
        report.summary.total_should_be_open += 1;

        let candidate = candidate(record);
        match synced.get(&candidate.vincere_id) {
            Some(db_job) if db_job.status == JobStatus::Open && db_job.is_public => {
                report.summary.correctly_open += 1;
            }
            Some(db_job) => {
                report.incorrectly_closed.push(IncorrectlyClosedJob {
                    job: candidate,
                    db_status: db_job.status,
                    db_is_public: db_job.is_public,
                });
            }
            None => report.not_in_db.push(candidate),
        }
    }

    report.summary.incorrectly_closed = report.incorrectly_closed.len();
    report.summary.not_in_db = report.not_in_db.len();

    tracing::info!(
        should_be_open = report.summary.total_should_be_open,
        correctly_open = report.summary.correctly_open,
        incorrectly_closed = report.summary.incorrectly_closed,
        not_in_db = report.summary.not_in_db,
        "Open job audit complete"
    );

    report
}

fn candidate(record: &VincereJobRecord) -> OpenJobCandidate {
    let job = &record.job;
    OpenJobCandidate {
        vincere_id: record.external_id(),
        title: job.job_title.clone().unwrap_or_default(),
        open_date: job.open_date.clone(),
        close_date: job.close_date.clone(),
        closed_job: job.closed_job,
        status: job.reported_status().map(String::from),
    }
}
