//! Pull summary models: the per-job CSV row, run counters and the optional
//! comparison against stored jobs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::vincere_field::VincereJobField;

/// Status bucket used when a job reports none.
pub const UNKNOWN_STATUS: &str = "UNKNOWN";

/// How a pulled job would be listed once imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingVisibility {
    /// Derived status is open.
    Public,
    /// Flagged closed in the ATS.
    Private,
    /// Neither open nor closed, usually missing an open date.
    Draft,
}

impl ListingVisibility {
    pub const ALL: [ListingVisibility; 3] = [Self::Public, Self::Private, Self::Draft];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Draft => "draft",
        }
    }
}

impl std::fmt::Display for ListingVisibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One row of `vincere-jobs-summary.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct JobSummaryRow {
    pub vincere_id: String,
    pub title: String,
    pub company_name: String,
    pub status: String,
    pub job_status: String,
    pub open_date: String,
    pub close_date: String,
    pub closed_job: bool,
    pub private_job: bool,
    pub custom_field_count: usize,
    pub mapped_fields_count: usize,
    pub visibility_status: ListingVisibility,
    pub created_date: String,
    pub last_update: String,
    /// Value of each mapped custom field, in [`VincereJobField::ALL`] order.
    /// Empty when the record does not carry it.
    pub mapped_values: Vec<String>,
}

impl JobSummaryRow {
    const FIXED_COLUMNS: [&'static str; 14] = [
        "vincere_id",
        "title",
        "company_name",
        "status",
        "job_status",
        "open_date",
        "close_date",
        "closed_job",
        "private_job",
        "custom_field_count",
        "mapped_fields_count",
        "visibility_status",
        "created_date",
        "last_update",
    ];

    /// CSV header: the fixed columns then one `cf_<label>` per mapped field.
    pub fn headers() -> Vec<String> {
        Self::FIXED_COLUMNS
            .iter()
            .map(|column| column.to_string())
            .chain(
                VincereJobField::ALL
                    .iter()
                    .map(|field| format!("cf_{}", field.label())),
            )
            .collect()
    }

    /// Cells in header order. Flags are written as `Yes`/`No`.
    pub fn to_record(&self) -> Vec<String> {
        let mut record = vec![
            self.vincere_id.clone(),
            self.title.clone(),
            self.company_name.clone(),
            self.status.clone(),
            self.job_status.clone(),
            self.open_date.clone(),
            self.close_date.clone(),
            yes_no(self.closed_job).to_string(),
            yes_no(self.private_job).to_string(),
            self.custom_field_count.to_string(),
            self.mapped_fields_count.to_string(),
            self.visibility_status.to_string(),
            self.created_date.clone(),
            self.last_update.clone(),
        ];
        record.extend(self.mapped_values.iter().cloned());
        record
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// Counters printed at the end of a pull.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PullBreakdown {
    pub total: usize,
    /// Keyed by the status Vincere reports, [`UNKNOWN_STATUS`] when absent.
    pub by_status: BTreeMap<String, usize>,
    pub by_visibility: BTreeMap<ListingVisibility, usize>,
    pub closed: usize,
    pub private: usize,
}

impl PullBreakdown {
    /// Status buckets, largest first.
    pub fn statuses_by_count(&self) -> Vec<(&str, usize)> {
        let mut statuses: Vec<(&str, usize)> = self
            .by_status
            .iter()
            .map(|(status, count)| (status.as_str(), *count))
            .collect();
        statuses.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        statuses
    }

    pub fn visibility_count(&self, visibility: ListingVisibility) -> usize {
        self.by_visibility.get(&visibility).copied().unwrap_or(0)
    }
}

/// Pulled ids checked against the ids already stored for the source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DbComparison {
    /// Every pulled id and whether it is stored.
    pub in_database: BTreeMap<String, bool>,
    /// Pulled but not stored, sorted.
    pub missing_from_db: Vec<String>,
    /// Stored but not pulled, sorted.
    pub extra_in_db: Vec<String>,
}

impl DbComparison {
    pub fn stored_count(&self) -> usize {
        self.in_database.values().filter(|stored| **stored).count()
    }

    pub fn is_stored(&self, external_id: &str) -> Option<bool> {
        self.in_database.get(external_id).copied()
    }
}
