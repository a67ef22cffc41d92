//! Job status derivation.
//!
//! Vincere spreads a position's state over a status string, two dates and a
//! flag. Precedence, highest first:
//!
//! 1. status `FILLED` -> filled
//! 2. `closed_job` set, or a close date in the past -> cancelled
//! 3. no open date -> draft
//! 4. status `ON_HOLD` -> on hold
//! 5. otherwise -> open

use chrono::{DateTime, Utc};

use crate::models::{JobStatus, VincereJob};

/// The inputs status derivation depends on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusInputs<'a> {
    pub job_status: Option<&'a str>,
    pub has_open_date: bool,
    /// Parsed close date. Unparseable dates count as absent.
    pub close_date: Option<DateTime<Utc>>,
    pub closed_job: bool,
}

impl<'a> StatusInputs<'a> {
    pub fn from_job(job: &'a VincereJob) -> Self {
        Self {
            job_status: job.reported_status(),
            has_open_date: job
                .open_date
                .as_deref()
                .is_some_and(|d| !d.trim().is_empty()),
            close_date: job
                .close_date
                .as_deref()
                .and_then(shared::dates::parse_timestamp),
            closed_job: job.closed_job,
        }
    }
}

/// Derive the internal status. Pure and total.
pub fn derive_status(inputs: &StatusInputs<'_>, now: DateTime<Utc>) -> JobStatus {
    let reported = inputs.job_status.map(normalize_reported_status);
    let reported = reported.as_deref();

    if reported == Some("FILLED") {
        return JobStatus::Filled;
    }

    let past_close = inputs.close_date.is_some_and(|closed_at| closed_at < now);
    if inputs.closed_job || past_close {
        return JobStatus::Cancelled;
    }

    if !inputs.has_open_date {
        return JobStatus::Draft;
    }

    if matches!(reported, Some("ON_HOLD") | Some("ONHOLD")) {
        return JobStatus::OnHold;
    }

    JobStatus::Open
}

/// Status of a Vincere job at `now`.
pub fn derive_job_status(job: &VincereJob, now: DateTime<Utc>) -> JobStatus {
    derive_status(&StatusInputs::from_job(job), now)
}

/// "On hold", "on-hold" and "ON_HOLD" all normalize to "ON_HOLD".
fn normalize_reported_status(status: &str) -> String {
    status
        .trim()
        .to_uppercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}
