//! Custom field usage across an export.

use std::collections::HashMap;

use crate::models::{CustomFieldAnalysis, CustomFieldUsage, VincereJobField, VincereJobRecord};

const UNKNOWN: &str = "Unknown";

/// Count how often each custom field key appears and whether the importer
/// maps it. Name and type come from the first record carrying the key.
pub fn analyze_custom_fields(records: &[VincereJobRecord]) -> CustomFieldAnalysis {
    let mut usage: HashMap<&str, CustomFieldUsage> = HashMap::new();

    for record in records {
        for (key, field) in &record.custom_fields {
            let entry = usage.entry(key.as_str()).or_insert_with(|| {
                let mapped = VincereJobField::from_key(key);
                CustomFieldUsage {
                    key: key.clone(),
                    name: field.name.clone().unwrap_or_else(|| UNKNOWN.to_string()),
                    field_type: field
                        .field_type
                        .clone()
                        .unwrap_or_else(|| UNKNOWN.to_string()),
                    occurrences: 0,
                    is_mapped: mapped.is_some(),
                    mapped_name: mapped.map(|f| f.label().to_string()).unwrap_or_default(),
                }
            });
            entry.occurrences += 1;
        }
    }

    let mut fields: Vec<CustomFieldUsage> = usage.into_values().collect();
    fields.sort_by(|a, b| b.occurrences.cmp(&a.occurrences).then_with(|| a.key.cmp(&b.key)));

    let mapped_fields = fields.iter().filter(|f| f.is_mapped).count();

    CustomFieldAnalysis {
        total_jobs_analyzed: records.len(),
        total_unique_custom_fields: fields.len(),
        mapped_fields,
        unmapped_fields: fields.len() - mapped_fields,
        fields,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_counts_and_mapping() {
        let yacht = VincereJobField::Yacht.key();
        let records: Vec<VincereJobRecord> = vec![
            json!({
                "job": { "id": 1 },
                "custom_fields": {
                    "f8b2c1ddc995fb699973598e449193c3": {
                        "key": yacht,
                        "name": "Yacht",
                        "type": "TEXT"
                    },
                    "abc": { "key": "abc", "name": "Nationality" }
                }
            }),
            json!({
                "job": { "id": 2 },
                "custom_fields": {
                    "f8b2c1ddc995fb699973598e449193c3": { "key": yacht }
                }
            }),
            json!({ "job": { "id": 3 } }),
        ]
        .into_iter()
        .map(|v| serde_json::from_value(v).unwrap())
        .collect();

        let analysis = analyze_custom_fields(&records);

        assert_eq!(analysis.total_jobs_analyzed, 3);
        assert_eq!(analysis.total_unique_custom_fields, 2);
        assert_eq!(analysis.mapped_fields, 1);
        assert_eq!(analysis.unmapped_fields, 1);

        let first = &analysis.fields[0];
        assert_eq!(first.key, yacht);
        assert_eq!(first.occurrences, 2);
        assert!(first.is_mapped);
        assert_eq!(first.mapped_name, "Yacht");

        let second = &analysis.fields[1];
        assert_eq!(second.name, "Nationality");
        assert_eq!(second.field_type, "Unknown");
        assert!(!second.is_mapped);
        assert!(second.mapped_name.is_empty());
    }
}
