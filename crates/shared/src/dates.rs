//! Lenient timestamp parsing for values exported by the ATS.
//!
//! Exports mix RFC 3339 timestamps, naive timestamps and bare dates
//! depending on which endpoint produced them. Every function here is total:
//! unparseable input yields `None`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Naive timestamp layouts, tried in order. `%.f` also accepts no fraction.
const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Date-only layouts, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d.%m.%Y"];

/// Parses a timestamp in any of the layouts the ATS is known to emit.
///
/// Naive values are interpreted as UTC. Bare dates resolve to midnight UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    parse_datetime(trimmed).or_else(|| {
        parse_date_only(trimmed)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| Utc.from_utc_datetime(&naive))
    })
}

/// Parses a calendar date, accepting full timestamps as well.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    parse_date_only(trimmed).or_else(|| parse_datetime(trimmed).map(|dt| dt.date_naive()))
}

/// Layouts carrying a time part.
fn parse_datetime(trimmed: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    // Offsets without a colon, e.g. "+0000"
    if let Ok(dt) = DateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.with_timezone(&Utc));
    }

    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn parse_date_only(trimmed: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_rfc3339_with_millis() {
        let ts = parse_timestamp("2025-01-01T10:30:00.000Z").unwrap();
        assert_eq!(ts.year(), 2025);
        assert_eq!(ts.hour(), 10);
        assert_eq!(ts.minute(), 30);
    }

    #[test]
    fn test_parse_offset_without_colon() {
        let ts = parse_timestamp("2024-06-15T12:00:00.000+0200").unwrap();
        assert_eq!(ts.hour(), 10);
    }

    #[test]
    fn test_parse_naive_timestamp_as_utc() {
        let ts = parse_timestamp("2024-03-02 08:15:00").unwrap();
        assert_eq!(ts.day(), 2);
        assert_eq!(ts.hour(), 8);
    }

    #[test]
    fn test_parse_bare_date_is_midnight() {
        let ts = parse_timestamp("2025-01-01").unwrap();
        assert_eq!(ts.hour(), 0);
        assert_eq!(ts.month(), 1);
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("   ").is_none());
        assert!(parse_timestamp("ASAP").is_none());
        assert!(parse_timestamp("2025-13-45").is_none());
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        assert_eq!(parse_date("2025-04-01"), Some(expected));
        assert_eq!(parse_date("01/04/2025"), Some(expected));
        assert_eq!(parse_date("01.04.2025"), Some(expected));
        assert_eq!(parse_date("2025-04-01T09:00:00Z"), Some(expected));
    }

    #[test]
    fn test_parse_date_rejects_free_text() {
        assert!(parse_date("immediate start").is_none());
        assert!(parse_date("April").is_none());
        assert!(parse_date("ASAP, flexible start").is_none());
    }

    #[test]
    fn test_long_free_text_is_not_a_timestamp() {
        assert!(parse_timestamp("ASAP, flexible start").is_none());
        assert!(parse_timestamp("TBC with owner").is_none());
        assert!(parse_timestamp("2025-01-01 sometime in the morning").is_none());
    }
}
