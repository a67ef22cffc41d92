//! Vincere job to internal job mapping.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

use super::job_status::derive_job_status;
use super::salary_parser::{
    detect_currency, normalize_currency_code, parse_salary_from_text, resolve_salary_period,
    round_salary, SalaryRange,
};
use super::schedule_parser::{is_rotation_schedule, parse_holiday_days, parse_rotation_schedule};
use super::vessel_parser::parse_vessel_info;
use crate::models::{
    ContractType, JobStatus, JobVisibility, NewJob, SalaryPeriod, VincereJob, VincereJobField,
    VincereJobRecord,
};
use shared::dates::{parse_date, parse_timestamp};

/// Title used when the ATS has none.
pub const UNTITLED_JOB_TITLE: &str = "Untitled Position";

/// Currency assumed when a salary is present but no currency is given.
pub const DEFAULT_SALARY_CURRENCY: &str = "EUR";

/// A mapped job plus the Vincere company id still waiting for client resolution.
///
/// The company id never reaches the database: [`MappedJob::resolve_client`]
/// consumes it and returns the persisted [`NewJob`].
#[derive(Debug, Clone, PartialEq)]
pub struct MappedJob {
    pub job: NewJob,
    pub vincere_company_id: Option<String>,
}

impl MappedJob {
    /// Link the job to a client through the `vincere_id -> client id` lookup.
    /// A miss leaves `client_id` empty.
    pub fn resolve_client(self, client_lookup: &HashMap<String, Uuid>) -> NewJob {
        let mut job = self.job;
        job.client_id = self
            .vincere_company_id
            .as_deref()
            .and_then(|company_id| client_lookup.get(company_id))
            .copied();
        job
    }
}

#[derive(Debug, Default)]
struct ResolvedSalary {
    range: SalaryRange,
    currency: Option<String>,
    period: Option<SalaryPeriod>,
}

/// Map one export record. `now` drives status derivation.
pub fn map_vincere_job(
    record: &VincereJobRecord,
    external_source: &str,
    now: DateTime<Utc>,
) -> MappedJob {
    let job = &record.job;

    let status = derive_job_status(job, now);
    let visibility = JobVisibility::for_status(status);

    let vessel = record
        .custom_text(VincereJobField::Yacht)
        .map(parse_vessel_info)
        .unwrap_or_default();

    let salary = resolve_salary(job, record.custom_text(VincereJobField::Salary));

    let (rotation_schedule, holiday_days) = match record.custom_text(VincereJobField::HolidayPackage)
    {
        Some(text) if is_rotation_schedule(text) => (parse_rotation_schedule(text), None),
        Some(text) => (None, parse_holiday_days(text)),
        None => (None, None),
    };

    let contract_type = record
        .custom_field(VincereJobField::ContractType)
        .and_then(|field| field.option_code())
        .and_then(ContractType::from_vincere_code);

    let start_date = record
        .custom_field(VincereJobField::StartDate)
        .and_then(|field| field.date())
        .or_else(|| job.start_date.as_deref().and_then(parse_date));

    let published_at = if status == JobStatus::Open {
        job.open_date.as_deref().and_then(parse_timestamp)
    } else {
        None
    };

    let title = job
        .job_title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(UNTITLED_JOB_TITLE)
        .to_string();

    let new_job = NewJob {
        external_id: record.external_id(),
        external_source: external_source.to_string(),
        title,
        description: non_blank(job.public_description.as_deref()),
        vessel_name: vessel.name,
        vessel_type: vessel.vessel_type,
        vessel_size_meters: vessel.size_meters,
        salary_min: salary.range.min,
        salary_max: salary.range.max,
        salary_currency: salary.currency,
        salary_period: salary.period,
        status,
        visibility,
        is_public: visibility == JobVisibility::Public,
        holiday_days,
        rotation_schedule,
        contract_type,
        client_id: None,
        start_date,
        requirements: record.custom_text(VincereJobField::Requirements).map(String::from),
        itinerary: record.custom_text(VincereJobField::Itinerary).map(String::from),
        program: record.custom_text(VincereJobField::Program).map(String::from),
        published_at,
        external_created_at: job.created_date.as_deref().and_then(parse_timestamp),
        external_updated_at: job.last_update.as_deref().and_then(parse_timestamp),
    };

    MappedJob {
        job: new_job,
        vincere_company_id: job.company_id.map(|id| id.to_string()),
    }
}

/// Structured `salary_from`/`salary_to` win; the salary text is parsed only
/// when both are absent.
fn resolve_salary(job: &VincereJob, salary_text: Option<&str>) -> ResolvedSalary {
    let structured = SalaryRange {
        min: positive_amount(job.salary_from),
        max: positive_amount(job.salary_to),
    };
    let structured_used = !structured.is_empty();

    let range = if structured_used {
        structured
    } else {
        salary_text.map(parse_salary_from_text).unwrap_or_default()
    };

    if range.is_empty() {
        return ResolvedSalary::default();
    }

    let reported_currency = job.currency.as_deref().and_then(normalize_currency_code);
    let text_currency = salary_text.and_then(detect_currency).map(String::from);
    let currency = if structured_used {
        reported_currency.or(text_currency)
    } else {
        text_currency.or(reported_currency)
    }
    .unwrap_or_else(|| DEFAULT_SALARY_CURRENCY.to_string());

    ResolvedSalary {
        range,
        currency: Some(currency),
        period: resolve_salary_period(salary_text, range),
    }
}

fn positive_amount(value: Option<f64>) -> Option<i32> {
    value.filter(|v| *v > 0.0).and_then(round_salary)
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}
