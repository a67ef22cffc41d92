//! Internal job domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Source tag for jobs imported from Vincere.
pub const EXTERNAL_SOURCE_VINCERE: &str = "vincere";

/// Lifecycle status of an internal job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Open,
    OnHold,
    Draft,
    Filled,
    Cancelled,
}

impl JobStatus {
    /// All statuses, in report order.
    pub const ALL: [JobStatus; 5] = [
        Self::Open,
        Self::OnHold,
        Self::Draft,
        Self::Filled,
        Self::Cancelled,
    ];

    /// Convert to database string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::OnHold => "on_hold",
            Self::Draft => "draft",
            Self::Filled => "filled",
            Self::Cancelled => "cancelled",
        }
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "on_hold" => Ok(Self::OnHold),
            "draft" => Ok(Self::Draft),
            "filled" => Ok(Self::Filled),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("Unknown job status: {}", s)),
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Listing visibility. Only open jobs are public.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobVisibility {
    Public,
    Private,
}

impl JobVisibility {
    pub fn for_status(status: JobStatus) -> Self {
        if status == JobStatus::Open {
            Self::Public
        } else {
            Self::Private
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }
}

impl std::fmt::Display for JobVisibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Vessel classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VesselType {
    Motor,
    Sail,
    Explorer,
    Catamaran,
    Classic,
}

impl VesselType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Motor => "motor",
            Self::Sail => "sail",
            Self::Explorer => "explorer",
            Self::Catamaran => "catamaran",
            Self::Classic => "classic",
        }
    }
}

impl std::fmt::Display for VesselType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Pay period a salary figure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SalaryPeriod {
    Monthly,
    Yearly,
}

impl SalaryPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl std::fmt::Display for SalaryPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Employment contract type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractType {
    Permanent,
    Rotational,
    Seasonal,
    Freelance,
    Temporary,
}

impl ContractType {
    /// Map a Vincere contract type option code. Unknown codes map to `None`.
    pub fn from_vincere_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Permanent),
            2 => Some(Self::Rotational),
            3 => Some(Self::Seasonal),
            4 => Some(Self::Freelance),
            5 => Some(Self::Temporary),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Permanent => "permanent",
            Self::Rotational => "rotational",
            Self::Seasonal => "seasonal",
            Self::Freelance => "freelance",
            Self::Temporary => "temporary",
        }
    }
}

impl std::fmt::Display for ContractType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A normalized job ready to be inserted into the `jobs` table.
///
/// `rotation_schedule` and `holiday_days` are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NewJob {
    pub external_id: String,
    pub external_source: String,
    pub title: String,
    pub description: Option<String>,
    pub vessel_name: Option<String>,
    pub vessel_type: Option<VesselType>,
    pub vessel_size_meters: Option<i32>,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub salary_currency: Option<String>,
    pub salary_period: Option<SalaryPeriod>,
    pub status: JobStatus,
    pub visibility: JobVisibility,
    pub is_public: bool,
    pub holiday_days: Option<i32>,
    pub rotation_schedule: Option<String>,
    pub contract_type: Option<ContractType>,
    pub client_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub requirements: Option<String>,
    pub itinerary: Option<String>,
    pub program: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub external_created_at: Option<DateTime<Utc>>,
    pub external_updated_at: Option<DateTime<Utc>>,
}

/// Read model of a job already synced from an external source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SyncedJob {
    pub id: Uuid,
    pub external_id: String,
    pub title: String,
    pub status: JobStatus,
    pub is_public: bool,
    pub published_at: Option<DateTime<Utc>>,
}
