//! Domain models for the Lighthouse sync tooling.

pub mod client;
pub mod field_analysis;
pub mod job;
pub mod job_import;
pub mod open_job_audit;
pub mod pull_summary;
pub mod vincere;
pub mod vincere_field;

pub use client::{build_client_lookup, ClientRef};
pub use field_analysis::{CustomFieldAnalysis, CustomFieldUsage};
pub use job::{
    ContractType, JobStatus, JobVisibility, NewJob, SalaryPeriod, SyncedJob, VesselType,
    EXTERNAL_SOURCE_VINCERE,
};
pub use job_import::{
    BatchResult, FailedRow, ImportOptions, ImportRunStatus, ImportSummary, PlannedBatch,
    DEFAULT_BATCH_DELAY_MS, DEFAULT_BATCH_SIZE,
};
pub use open_job_audit::{
    IncorrectlyClosedJob, OpenJobAuditReport, OpenJobAuditSummary, OpenJobCandidate,
};
pub use pull_summary::{
    DbComparison, JobSummaryRow, ListingVisibility, PullBreakdown, UNKNOWN_STATUS,
};
pub use vincere::{VincereCustomField, VincereExport, VincereJob, VincereJobRecord};
pub use vincere_field::VincereJobField;
