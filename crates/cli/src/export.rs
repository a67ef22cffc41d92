//! Reading and writing the JSON files exchanged between commands.

use std::fs;
use std::path::{Path, PathBuf};

use domain::models::{DbComparison, FailedRow, JobSummaryRow, VincereExport};
use serde::Serialize;
use serde_json::Value as JsonValue;

/// Raw positions written by `pull` and read by `import` and `audit`.
pub const RAW_EXPORT_FILE: &str = "vincere-jobs-raw.json";

/// Custom field usage written by `pull`.
pub const FIELD_ANALYSIS_FILE: &str = "custom-fields-analysis.json";

/// One row per pulled job, written by `pull`.
pub const SUMMARY_CSV_FILE: &str = "vincere-jobs-summary.csv";

/// Default location of the open job audit report.
pub const AUDIT_REPORT_FILE: &str = "output/missing-open-jobs-report.json";

/// Error type for export file operations.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Export file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Export file {0} must contain a JSON array")]
    NotAnArray(PathBuf),

    #[error("Failed to write CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Load a Vincere export.
///
/// The file must exist and hold a JSON array. Entries that do not decode
/// as job records are counted as invalid and skipped.
pub fn load_export(path: &Path) -> Result<VincereExport, ExportError> {
    if !path.exists() {
        return Err(ExportError::NotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let value: JsonValue = serde_json::from_str(&content).map_err(|source| ExportError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let JsonValue::Array(entries) = value else {
        return Err(ExportError::NotAnArray(path.to_path_buf()));
    };

    let export = VincereExport::from_values(entries);
    tracing::info!(
        path = %path.display(),
        records = export.records.len(),
        invalid = export.invalid,
        "Loaded Vincere export"
    );
    Ok(export)
}

fn create_parent_dir(path: &Path) -> Result<(), ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ExportError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

/// Pretty-print a value to `path`, creating parent directories.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ExportError> {
    create_parent_dir(path)?;

    let content = serde_json::to_string_pretty(value).map_err(|source| ExportError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    fs::write(path, content).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Write the pull summary CSV. Nothing is written for an empty pull.
pub fn write_summary_csv(path: &Path, rows: &[JobSummaryRow]) -> Result<(), ExportError> {
    if rows.is_empty() {
        tracing::info!("No jobs to summarize");
        return Ok(());
    }
    create_parent_dir(path)?;

    let csv_error = |source| ExportError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    writer
        .write_record(JobSummaryRow::headers())
        .map_err(csv_error)?;
    for row in rows {
        writer.write_record(row.to_record()).map_err(csv_error)?;
    }
    writer.flush().map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(path = %path.display(), rows = rows.len(), "Wrote summary CSV");
    Ok(())
}

/// Set `in_database` on raw export entries whose job id was compared.
/// Entries outside the comparison are left untouched.
pub fn flag_in_database(entries: &mut [JsonValue], comparison: &DbComparison) {
    for entry in entries.iter_mut() {
        let id = match entry.pointer("/job/id") {
            Some(JsonValue::Number(n)) => n.to_string(),
            Some(JsonValue::String(s)) => s.trim().to_string(),
            _ => continue,
        };
        if let (Some(stored), JsonValue::Object(map)) = (comparison.is_stored(&id), entry) {
            map.insert("in_database".to_string(), JsonValue::Bool(stored));
        }
    }
}

/// Write failed rows as a `[{ "id", "error" }]` array.
pub fn write_error_log(path: &Path, failed: &[FailedRow]) -> Result<(), ExportError> {
    write_json(path, failed)?;
    tracing::warn!(path = %path.display(), rows = failed.len(), "Wrote import error log");
    Ok(())
}
