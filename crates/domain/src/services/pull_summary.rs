//! Per-job summary rows, run counters and the stored-id comparison for a pull.

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use std::collections::HashSet;

use super::job_import::{ImportStore, StoreError};
use super::job_status::derive_job_status;
use crate::models::{
    DbComparison, JobStatus, JobSummaryRow, ListingVisibility, PullBreakdown, VincereCustomField,
    VincereJob, VincereJobField, VincereJobRecord, UNKNOWN_STATUS,
};

/// Public when the derived status is open, private when the ATS flags the
/// job closed, draft otherwise.
pub fn listing_visibility(job: &VincereJob, now: DateTime<Utc>) -> ListingVisibility {
    if derive_job_status(job, now) == JobStatus::Open {
        ListingVisibility::Public
    } else if job.closed_job {
        ListingVisibility::Private
    } else {
        ListingVisibility::Draft
    }
}

/// Build the CSV row for one pulled record.
pub fn summarize_job(record: &VincereJobRecord, now: DateTime<Utc>) -> JobSummaryRow {
    let job = &record.job;
    let mapped_fields_count = record
        .custom_fields
        .keys()
        .filter(|key| VincereJobField::from_key(key).is_some())
        .count();

    JobSummaryRow {
        vincere_id: record.external_id(),
        title: text(&job.job_title),
        company_name: text(&job.company_name),
        status: text(&job.status),
        job_status: text(&job.job_status),
        open_date: text(&job.open_date),
        close_date: text(&job.close_date),
        closed_job: job.closed_job,
        private_job: job.private_job,
        custom_field_count: record.custom_fields.len(),
        mapped_fields_count,
        visibility_status: listing_visibility(job, now),
        created_date: text(&job.created_date),
        last_update: text(&job.last_update),
        mapped_values: VincereJobField::ALL
            .iter()
            .map(|field| {
                record
                    .custom_field(*field)
                    .map(cell_value)
                    .unwrap_or_default()
            })
            .collect(),
    }
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// Text value, then date value, then drop-down values joined by commas.
fn cell_value(field: &VincereCustomField) -> String {
    if let Some(text) = field.text() {
        return text.to_string();
    }
    if let Some(date) = field.date_value.as_deref().filter(|d| !d.trim().is_empty()) {
        return date.to_string();
    }
    field
        .field_values
        .iter()
        .map(|value| match value {
            JsonValue::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Count pulled records by reported status and by listing visibility.
pub fn pull_breakdown(records: &[VincereJobRecord], now: DateTime<Utc>) -> PullBreakdown {
    let mut breakdown = PullBreakdown {
        total: records.len(),
        ..PullBreakdown::default()
    };

    for record in records {
        let job = &record.job;
        let status = job.reported_status().unwrap_or(UNKNOWN_STATUS);
        *breakdown.by_status.entry(status.to_string()).or_insert(0) += 1;
        *breakdown
            .by_visibility
            .entry(listing_visibility(job, now))
            .or_insert(0) += 1;
        if job.closed_job {
            breakdown.closed += 1;
        }
        if job.private_job {
            breakdown.private += 1;
        }
    }

    breakdown
}

/// Compare pulled ids with the ids stored for the source.
pub fn compare_with_database<I>(pulled_ids: I, stored_ids: &HashSet<String>) -> DbComparison
where
    I: IntoIterator<Item = String>,
{
    let pulled: HashSet<String> = pulled_ids.into_iter().collect();

    let mut comparison = DbComparison::default();
    for id in &pulled {
        let stored = stored_ids.contains(id);
        comparison.in_database.insert(id.clone(), stored);
        if !stored {
            comparison.missing_from_db.push(id.clone());
        }
    }
    comparison.extra_in_db = stored_ids
        .iter()
        .filter(|id| !pulled.contains(*id))
        .cloned()
        .collect();

    comparison.missing_from_db.sort();
    comparison.extra_in_db.sort();
    comparison
}

/// Load stored ids for `external_source` and compare.
pub async fn compare_with_store<S, I>(
    store: &S,
    external_source: &str,
    pulled_ids: I,
) -> Result<DbComparison, StoreError>
where
    S: ImportStore + ?Sized,
    I: IntoIterator<Item = String>,
{
    let stored = store.existing_external_ids(external_source).await?;
    let comparison = compare_with_database(pulled_ids, &stored);
    tracing::info!(
        stored = comparison.stored_count(),
        missing = comparison.missing_from_db.len(),
        extra = comparison.extra_in_db.len(),
        "Compared pull with database"
    );
    Ok(comparison)
}
