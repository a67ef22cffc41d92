//! Custom field usage analysis written alongside a Vincere pull.

use serde::{Deserialize, Serialize};

/// Usage of a single custom field key across an export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CustomFieldUsage {
    pub key: String,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub occurrences: usize,
    pub is_mapped: bool,
    /// Label of the mapped field, empty when unmapped.
    pub mapped_name: String,
}

/// Written to `custom-fields-analysis.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CustomFieldAnalysis {
    pub total_jobs_analyzed: usize,
    pub total_unique_custom_fields: usize,
    pub mapped_fields: usize,
    pub unmapped_fields: usize,
    /// Most frequent first.
    pub fields: Vec<CustomFieldUsage>,
}
