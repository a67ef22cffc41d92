//! Console summaries printed to stdout at the end of each command.

use std::fmt::Write as _;
use std::path::Path;

use domain::models::{
    CustomFieldAnalysis, DbComparison, ImportSummary, JobStatus, ListingVisibility,
    OpenJobAuditReport, PullBreakdown,
};

/// Rows of each audit problem list shown on the console.
pub const AUDIT_PREVIEW_ROWS: usize = 20;

/// Import run summary. `error_log` is mentioned only when rows failed.
pub fn format_import_summary(summary: &ImportSummary, error_log: Option<&Path>) -> String {
    let mut out = String::new();

    let title = if summary.dry_run {
        "Import plan (dry run)"
    } else {
        "Import summary"
    };
    let _ = writeln!(out, "{} [{}]", title, summary.external_source);
    let _ = writeln!(out, "  fetched:            {}", summary.fetched);
    let _ = writeln!(out, "  invalid:            {}", summary.invalid);
    let _ = writeln!(out, "  duplicates:         {}", summary.duplicates);
    let _ = writeln!(out, "  existing in db:     {}", summary.existing);
    let _ = writeln!(out, "  skipped:            {}", summary.skipped);
    if summary.over_limit > 0 {
        let _ = writeln!(out, "  over limit:         {}", summary.over_limit);
    }
    let _ = writeln!(out, "  to import:          {}", summary.to_import);
    if !summary.dry_run {
        let _ = writeln!(out, "  inserted:           {}", summary.inserted);
        let _ = writeln!(out, "  failed:             {}", summary.failed);
    }
    let _ = writeln!(out, "  unresolved clients: {}", summary.unresolved_clients);

    let _ = writeln!(out, "By status:");
    for status in JobStatus::ALL {
        let count = summary.by_status.get(&status).copied().unwrap_or(0);
        let _ = writeln!(out, "  {:<10}{}", status.as_str(), count);
    }

    if summary.dry_run {
        let _ = writeln!(out, "Planned batches: {}", summary.planned_batches.len());
        for batch in &summary.planned_batches {
            let _ = writeln!(
                out,
                "  batch {}: {} rows ({} .. {})",
                batch.index, batch.size, batch.first_external_id, batch.last_external_id
            );
        }
    } else {
        let failed_batches = summary.batches.iter().filter(|b| b.is_failure()).count();
        if failed_batches > 0 {
            let _ = writeln!(
                out,
                "{} of {} batches failed",
                failed_batches,
                summary.batches.len()
            );
        }
        if let (true, Some(path)) = (summary.failed > 0, error_log) {
            let _ = writeln!(out, "Failed rows written to {}", path.display());
        }
    }

    let _ = write!(out, "Status: {}", summary.status());
    out
}

/// Open job audit summary with a preview of each problem list.
pub fn format_audit_report(report: &OpenJobAuditReport, output: &Path) -> String {
    let mut out = String::new();
    let summary = &report.summary;

    let _ = writeln!(out, "Open job audit");
    let _ = writeln!(out, "  should be open:     {}", summary.total_should_be_open);
    let _ = writeln!(out, "  correctly open:     {}", summary.correctly_open);
    let _ = writeln!(out, "  incorrectly closed: {}", summary.incorrectly_closed);
    let _ = writeln!(out, "  not in database:    {}", summary.not_in_db);

    if !report.incorrectly_closed.is_empty() {
        let _ = writeln!(out, "Incorrectly closed or private:");
        for entry in report.incorrectly_closed.iter().take(AUDIT_PREVIEW_ROWS) {
            let _ = writeln!(
                out,
                "  {}: {} (db status {}, public {})",
                entry.job.vincere_id, entry.job.title, entry.db_status, entry.db_is_public
            );
        }
        write_more(&mut out, report.incorrectly_closed.len());
    }

    if !report.not_in_db.is_empty() {
        let _ = writeln!(out, "Missing from database:");
        for job in report.not_in_db.iter().take(AUDIT_PREVIEW_ROWS) {
            let _ = writeln!(out, "  {}: {}", job.vincere_id, job.title);
        }
        write_more(&mut out, report.not_in_db.len());
    }

    let _ = write!(out, "Report written to {}", output.display());
    out
}

fn write_more(out: &mut String, total: usize) {
    if total > AUDIT_PREVIEW_ROWS {
        let _ = writeln!(out, "  ... and {} more", total - AUDIT_PREVIEW_ROWS);
    }
}

/// Pull summary. The database section appears only when a comparison ran.
pub fn format_pull_summary(
    listed: usize,
    breakdown: &PullBreakdown,
    analysis: &CustomFieldAnalysis,
    comparison: Option<&DbComparison>,
    output_dir: &Path,
) -> String {
    let fetched = breakdown.total;
    let mut out = String::new();
    let _ = writeln!(out, "Vincere pull");
    let _ = writeln!(out, "  positions listed:   {}", listed);
    let _ = writeln!(out, "  positions fetched:  {}", fetched);
    let _ = writeln!(out, "  failed:             {}", listed.saturating_sub(fetched));

    let _ = writeln!(out, "By status:");
    for (status, count) in breakdown.statuses_by_count() {
        let _ = writeln!(out, "  {:<10}{}", status, count);
    }
    let _ = writeln!(out, "By visibility:");
    for visibility in ListingVisibility::ALL {
        let _ = writeln!(
            out,
            "  {:<10}{}",
            visibility.as_str(),
            breakdown.visibility_count(visibility)
        );
    }
    let _ = writeln!(out, "  closed jobs:        {}", breakdown.closed);
    let _ = writeln!(out, "  private jobs:       {}", breakdown.private);

    let _ = writeln!(
        out,
        "  custom fields:      {} ({} mapped, {} unmapped)",
        analysis.total_unique_custom_fields, analysis.mapped_fields, analysis.unmapped_fields
    );

    if let Some(comparison) = comparison {
        let _ = writeln!(out, "Database comparison:");
        let _ = writeln!(out, "  in database:        {}", comparison.stored_count());
        let _ = writeln!(out, "  missing from db:    {}", comparison.missing_from_db.len());
        let _ = writeln!(out, "  not in Vincere:     {}", comparison.extra_in_db.len());
    }

    let _ = write!(out, "Output written to {}", output_dir.display());
    out
}
