//! Vincere export records.
//!
//! These mirror the JSON written by `lighthouse-sync pull`: one
//! `{ "job": {...}, "custom_fields": { "<key>": {...} } }` object per
//! position. The ATS is inconsistent about scalar types (ids arrive as
//! numbers or strings, flags as booleans or "true"), so deserialization
//! is lenient and only the job id is mandatory.

use chrono::NaiveDate;
use serde::de::{Deserializer, Error as DeError};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

use super::vincere_field::VincereJobField;

/// A position as returned by `GET /position/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VincereJob {
    #[serde(deserialize_with = "deserialize_required_id")]
    pub id: i64,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub job_title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_id")]
    pub company_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub company_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_id")]
    pub contact_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub job_status: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_id")]
    pub status_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub open_date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub close_date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub created_date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub last_update: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_bool")]
    pub closed_job: bool,
    #[serde(default, deserialize_with = "deserialize_lenient_bool")]
    pub private_job: bool,
    #[serde(default, deserialize_with = "deserialize_lenient_number")]
    pub salary_from: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_number")]
    pub salary_to: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub public_description: Option<String>,
}

impl VincereJob {
    /// Status as reported by the ATS, preferring `job_status` over `status`.
    pub fn reported_status(&self) -> Option<&str> {
        self.job_status
            .as_deref()
            .or(self.status.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// One entry of `GET /position/{id}/customfields`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VincereCustomField {
    #[serde(default)]
    pub key: String,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub name: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "deserialize_lenient_string")]
    pub field_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub field_value: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub date_value: Option<String>,
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub field_values: Vec<JsonValue>,
}

impl VincereCustomField {
    /// Free-text value, trimmed. Empty strings count as absent.
    pub fn text(&self) -> Option<&str> {
        self.field_value
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Date value, falling back to a date typed into the text value.
    pub fn date(&self) -> Option<NaiveDate> {
        self.date_value
            .as_deref()
            .and_then(shared::dates::parse_date)
            .or_else(|| self.text().and_then(shared::dates::parse_date))
    }

    /// First numeric option code of a drop-down field.
    pub fn option_code(&self) -> Option<i64> {
        self.field_values
            .iter()
            .find_map(json_to_i64)
            .or_else(|| self.text().and_then(|t| t.parse().ok()))
    }

    /// Whether the field carries any value at all.
    pub fn has_value(&self) -> bool {
        self.text().is_some() || self.date_value.is_some() || !self.field_values.is_empty()
    }
}

/// A full export record: job details plus its custom fields indexed by key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VincereJobRecord {
    pub job: VincereJob,
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub custom_fields: HashMap<String, VincereCustomField>,
}

impl VincereJobRecord {
    /// Look up a mapped custom field.
    pub fn custom_field(&self, field: VincereJobField) -> Option<&VincereCustomField> {
        self.custom_fields.get(field.key())
    }

    /// Free-text value of a mapped custom field.
    pub fn custom_text(&self, field: VincereJobField) -> Option<&str> {
        self.custom_field(field).and_then(VincereCustomField::text)
    }

    /// The external id in the form stored on internal records.
    pub fn external_id(&self) -> String {
        self.job.id.to_string()
    }
}

/// A loaded export: readable records plus a count of unreadable ones.
#[derive(Debug, Clone, Default)]
pub struct VincereExport {
    pub records: Vec<VincereJobRecord>,
    /// Records without a usable job id.
    pub invalid: usize,
}

impl VincereExport {
    /// Decode raw export entries one by one. A bad entry is logged and
    /// counted, never fatal.
    pub fn from_values(values: Vec<JsonValue>) -> Self {
        let mut export = Self::default();
        for (position, value) in values.into_iter().enumerate() {
            match serde_json::from_value::<VincereJobRecord>(value) {
                Ok(record) => export.records.push(record),
                Err(e) => {
                    tracing::warn!(position, error = %e, "Skipping unreadable export record");
                    export.invalid += 1;
                }
            }
        }
        export
    }

    /// Entries in the export, readable or not.
    pub fn len(&self) -> usize {
        self.records.len() + self.invalid
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn json_to_i64(value: &JsonValue) -> Option<i64> {
    match value {
        JsonValue::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn json_to_f64(value: &JsonValue) -> Option<f64> {
    match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    }
}

fn deserialize_required_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = JsonValue::deserialize(deserializer)?;
    json_to_i64(&value).ok_or_else(|| D::Error::custom(format!("invalid job id: {}", value)))
}

fn deserialize_lenient_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(json_to_i64))
}

fn deserialize_lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(json_to_f64))
}

fn deserialize_lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(match value {
        Some(JsonValue::String(s)) => Some(s),
        Some(JsonValue::Number(n)) => Some(n.to_string()),
        Some(JsonValue::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

fn deserialize_lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(match value {
        Some(JsonValue::Bool(b)) => b,
        Some(JsonValue::Number(n)) => n.as_i64() == Some(1),
        Some(JsonValue::String(s)) => matches!(s.trim().to_lowercase().as_str(), "true" | "1" | "yes"),
        _ => false,
    })
}

fn deserialize_null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_deserialize() {
        let value = json!({
            "job": {
                "id": 1234,
                "job_title": "Chief Stewardess",
                "company_id": "88",
                "job_status": "OPEN",
                "open_date": "2025-01-01T00:00:00.000Z",
                "closed_job": null,
                "salary_from": "6500",
                "salary_to": 8000
            },
            "custom_fields": {
                "f8b2c1ddc995fb699973598e449193c3": {
                    "key": "f8b2c1ddc995fb699973598e449193c3",
                    "name": "Yacht",
                    "type": "TEXT",
                    "field_value": "55m Motor Yacht"
                }
            }
        });

        let record: VincereJobRecord = serde_json::from_value(value).unwrap();
        assert_eq!(record.job.id, 1234);
        assert_eq!(record.job.company_id, Some(88));
        assert!(!record.job.closed_job);
        assert_eq!(record.job.salary_from, Some(6500.0));
        assert_eq!(record.job.salary_to, Some(8000.0));
        assert_eq!(
            record.custom_text(VincereJobField::Yacht),
            Some("55m Motor Yacht")
        );
        assert_eq!(record.external_id(), "1234");
    }

    #[test]
    fn test_missing_id_is_rejected() {
        let value = json!({ "job": { "job_title": "Deckhand" }, "custom_fields": {} });
        assert!(serde_json::from_value::<VincereJobRecord>(value).is_err());

        let value = json!({ "job": { "id": "abc" } });
        assert!(serde_json::from_value::<VincereJobRecord>(value).is_err());
    }

    #[test]
    fn test_null_custom_fields_default_to_empty() {
        let value = json!({ "job": { "id": 7 }, "custom_fields": null });
        let record: VincereJobRecord = serde_json::from_value(value).unwrap();
        assert!(record.custom_fields.is_empty());
    }

    #[test]
    fn test_custom_field_accessors() {
        let field: VincereCustomField = serde_json::from_value(json!({
            "key": "c980a4f92992081ead936fb8a358fb79",
            "field_values": [2],
            "field_value": "  "
        }))
        .unwrap();
        assert_eq!(field.option_code(), Some(2));
        assert_eq!(field.text(), None);
        assert!(field.has_value());

        let field: VincereCustomField = serde_json::from_value(json!({
            "key": "9a214be2a25d61d1add26dca93aef45a",
            "date_value": "2025-03-15T00:00:00.000Z",
            "field_values": null
        }))
        .unwrap();
        assert_eq!(field.date(), NaiveDate::from_ymd_opt(2025, 3, 15));
        assert!(field.field_values.is_empty());
    }

    #[test]
    fn test_reported_status_prefers_job_status() {
        let job: VincereJob = serde_json::from_value(json!({
            "id": 1,
            "job_status": " FILLED ",
            "status": "OPEN"
        }))
        .unwrap();
        assert_eq!(job.reported_status(), Some("FILLED"));

        let job: VincereJob = serde_json::from_value(json!({ "id": 1, "status": "ON_HOLD" })).unwrap();
        assert_eq!(job.reported_status(), Some("ON_HOLD"));
    }

    #[test]
    fn test_export_counts_invalid_entries() {
        let export = VincereExport::from_values(vec![
            json!({ "job": { "id": 1 } }),
            json!({ "job": { "title": "no id" } }),
            json!("garbage"),
            json!({ "job": { "id": "2" }, "custom_fields": {} }),
        ]);
        assert_eq!(export.records.len(), 2);
        assert_eq!(export.invalid, 2);
        assert_eq!(export.len(), 4);
    }

    #[test]
    fn test_lenient_bool() {
        let job: VincereJob =
            serde_json::from_value(json!({ "id": 1, "closed_job": "true", "private_job": 1 })).unwrap();
        assert!(job.closed_job);
        assert!(job.private_job);
    }
}
