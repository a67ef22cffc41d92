//! Domain services for the Vincere import.
//!
//! Text parsers, the job mapper, the import orchestrator and the reports
//! built on top of them.

pub mod field_analysis;
pub mod job_import;
pub mod job_mapper;
pub mod job_status;
pub mod open_job_audit;
pub mod pull_summary;
pub mod salary_parser;
pub mod schedule_parser;
pub mod vessel_parser;

pub use field_analysis::analyze_custom_fields;
pub use job_import::{
    plan_batches, ImportPlan, ImportStore, JobImporter, MockImportStore, StoreError,
};
pub use job_mapper::{map_vincere_job, MappedJob, DEFAULT_SALARY_CURRENCY, UNTITLED_JOB_TITLE};
pub use job_status::{derive_job_status, derive_status, StatusInputs};
pub use open_job_audit::audit_open_jobs;
pub use pull_summary::{
    compare_with_database, compare_with_store, listing_visibility, pull_breakdown, summarize_job,
};
pub use salary_parser::{
    detect_currency, detect_salary_period_from_text, infer_salary_period,
    parse_salary_from_text, resolve_salary_period, SalaryRange, YEARLY_SALARY_THRESHOLD,
};
pub use schedule_parser::{is_rotation_schedule, parse_holiday_days, parse_rotation_schedule};
pub use vessel_parser::{parse_vessel_info, VesselInfo};
