//! Open job audit report models.
//!
//! Produced by `lighthouse-sync audit` to find Vincere jobs that should be
//! live on the site but are missing or hidden in the database.

use serde::{Deserialize, Serialize};

use super::job::JobStatus;

/// A Vincere job whose derived status is open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OpenJobCandidate {
    pub vincere_id: String,
    pub title: String,
    pub open_date: Option<String>,
    pub close_date: Option<String>,
    pub closed_job: bool,
    /// Status as reported by Vincere.
    pub status: Option<String>,
}

/// An open Vincere job that the database has closed or hidden.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct IncorrectlyClosedJob {
    #[serde(flatten)]
    pub job: OpenJobCandidate,
    pub db_status: JobStatus,
    pub db_is_public: bool,
}

/// Audit counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OpenJobAuditSummary {
    pub total_should_be_open: usize,
    pub correctly_open: usize,
    pub incorrectly_closed: usize,
    pub not_in_db: usize,
}

/// Full audit report, written to `missing-open-jobs-report.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OpenJobAuditReport {
    pub summary: OpenJobAuditSummary,
    pub incorrectly_closed: Vec<IncorrectlyClosedJob>,
    pub not_in_db: Vec<OpenJobCandidate>,
}

impl OpenJobAuditReport {
    /// True when every open Vincere job is live in the database.
    pub fn is_clean(&self) -> bool {
        self.incorrectly_closed.is_empty() && self.not_in_db.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incorrectly_closed_flattens_job() {
        let entry = IncorrectlyClosedJob {
            job: OpenJobCandidate {
                vincere_id: "77".to_string(),
                title: "Bosun".to_string(),
                open_date: Some("2025-02-01".to_string()),
                close_date: None,
                closed_job: false,
                status: Some("OPEN".to_string()),
            },
            db_status: JobStatus::Draft,
            db_is_public: false,
        };

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["vincere_id"], "77");
        assert_eq!(value["db_status"], "draft");
        assert_eq!(value["db_is_public"], false);
    }

    #[test]
    fn test_empty_report_is_clean() {
        assert!(OpenJobAuditReport::default().is_clean());
    }
}
