//! Vessel description parser.
//!
//! Turns the free-text "Yacht" custom field ("55m Motor Yacht Serenity",
//! "M/Y Lady Luck (62.5m)") into a name, a vessel type and a length.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::VesselType;

/// Structured vessel details. Every field is best effort.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct VesselInfo {
    pub name: Option<String>,
    pub vessel_type: Option<VesselType>,
    pub size_meters: Option<i32>,
}

lazy_static::lazy_static! {
    /// Length in meters: "55m", "42.5 m", "60 metres".
    static ref SIZE_REGEX: Regex =
        Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*m(?:eters?|etres?|trs?)?\b").unwrap();

    /// Type keywords, checked in order. The first match decides the type.
    static ref TYPE_PATTERNS: Vec<(VesselType, Regex)> = vec![
        (
            VesselType::Explorer,
            Regex::new(r"(?i)\b(?:explorer|expedition)(?:\s+(?:yacht|vessel))?\b").unwrap(),
        ),
        (
            VesselType::Catamaran,
            Regex::new(r"(?i)\b(?:(?:sailing|power|motor)\s+)?catamaran\b").unwrap(),
        ),
        (
            VesselType::Classic,
            Regex::new(r"(?i)\bclassic(?:\s+(?:motor|sailing|sail))?(?:\s+yacht)?\b").unwrap(),
        ),
        (
            VesselType::Sail,
            Regex::new(r"(?i)(?:\bs/y\b|\bsailing(?:\s+yacht)?\b|\bsail(?:\s+yacht)?\b|(?-i:\bSY\b))").unwrap(),
        ),
        (
            VesselType::Motor,
            Regex::new(r"(?i)(?:\bm/y\b|\bmotor(?:\s+yacht)?\b|\bpower(?:\s+yacht)?\b|(?-i:\bMY\b))").unwrap(),
        ),
    ];

    static ref EMPTY_BRACKETS: Regex = Regex::new(r"\(\s*\)|\[\s*\]").unwrap();
    static ref SEPARATOR_RUN: Regex = Regex::new(r"\s*(?:[-–|,]\s*){2,}").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Characters stripped from both ends of the leftover name.
const NAME_TRIM_CHARS: &[char] = &['-', '–', '|', ',', '/', ':', '(', ')', '[', ']'];

/// Parse a vessel description.
///
/// The name is whatever remains once the size and type tokens are removed.
/// When nothing remains, the original text is returned as the name, size and
/// type tokens included.
pub fn parse_vessel_info(text: &str) -> VesselInfo {
    let original = text.trim();
    if original.is_empty() {
        return VesselInfo::default();
    }

    let size_meters = SIZE_REGEX
        .captures(original)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .and_then(|meters| i32::try_from(meters.round() as i64).ok());

    let mut remaining = SIZE_REGEX.replace_all(original, " ").into_owned();

    let mut vessel_type = None;
    for (candidate, pattern) in TYPE_PATTERNS.iter() {
        if pattern.is_match(&remaining) {
            vessel_type = Some(*candidate);
            remaining = pattern.replace_all(&remaining, " ").into_owned();
            break;
        }
    }

    let name = clean_name(&remaining);
    let name = if name.is_empty() {
        original.to_string()
    } else {
        name
    };

    VesselInfo {
        name: Some(name),
        vessel_type,
        size_meters,
    }
}

fn clean_name(text: &str) -> String {
    let text = EMPTY_BRACKETS.replace_all(text, " ");
    let text = SEPARATOR_RUN.replace_all(&text, " - ");
    let text = WHITESPACE.replace_all(&text, " ");
    text.trim_matches(|c: char| c.is_whitespace() || NAME_TRIM_CHARS.contains(&c))
        .to_string()
}
