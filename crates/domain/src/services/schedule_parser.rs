//! Holiday package parsing: rotation ratios and leave allowances.

use regex::Regex;

/// Ratio returned for "equal time" rotations.
pub const EQUAL_TIME_ROTATION: &str = "1:1";

const DAYS_PER_WEEK: f64 = 7.0;
const DAYS_PER_MONTH: f64 = 30.0;

lazy_static::lazy_static! {
    static ref EQUAL_TIME: Regex = Regex::new(r"(?i)\bequal\s+time\b").unwrap();

    static ref ON_OFF: Regex = Regex::new(
        r"(?i)\b(\d{1,2})\s*(?:(?:weeks?|wks?|months?|mths?|days?)\s*)?on\s*[,/&-]?\s*(?:and\s+)?(\d{1,2})\s*(?:(?:weeks?|wks?|months?|mths?|days?)\s*)?off\b"
    )
    .unwrap();

    static ref RATIO: Regex = Regex::new(r"\b(\d{1,2})\s*[:/]\s*(\d{1,2})\b").unwrap();

    static ref HOLIDAY: Regex = Regex::new(
        r"(?i)(\d+(?:[.,]\d+)?)\s*(days?|weeks?|wks?|months?|mths?)\b"
    )
    .unwrap();
}

/// Whether the text describes a rotation rather than a leave allowance.
pub fn is_rotation_schedule(text: &str) -> bool {
    parse_rotation_schedule(text).is_some()
}

/// Normalize a rotation to `"N:M"`.
///
/// Accepts "2:2", "10/10", "2 months on 2 off" and "equal time".
pub fn parse_rotation_schedule(text: &str) -> Option<String> {
    if EQUAL_TIME.is_match(text) {
        return Some(EQUAL_TIME_ROTATION.to_string());
    }

    if let Some(caps) = ON_OFF.captures(text) {
        if let Some(ratio) = ratio_from(caps.get(1)?.as_str(), caps.get(2)?.as_str()) {
            return Some(ratio);
        }
    }

    for caps in RATIO.captures_iter(text) {
        let whole = caps.get(0)?;
        // "12/05/2025" and "2025/12/05" are dates, not rotations.
        let rest = &text[whole.end()..];
        let before = &text[..whole.start()];
        if rest.starts_with(['/', ':'])
            || before.ends_with(|c: char| c == '/' || c == ':' || c.is_ascii_digit())
        {
            continue;
        }
        if let Some(ratio) = ratio_from(caps.get(1)?.as_str(), caps.get(2)?.as_str()) {
            return Some(ratio);
        }
    }

    None
}

fn ratio_from(on: &str, off: &str) -> Option<String> {
    let on: u32 = on.parse().ok()?;
    let off: u32 = off.parse().ok()?;
    if on == 0 || off == 0 {
        return None;
    }
    Some(format!("{}:{}", on, off))
}

/// Convert a leave allowance to whole days.
///
/// Weeks count 7 days and months 30. Decimal values ("1.5 months",
/// "2,5 weeks") are rounded after conversion.
pub fn parse_holiday_days(text: &str) -> Option<i32> {
    let caps = HOLIDAY.captures(text)?;
    let value: f64 = caps.get(1)?.as_str().replace(',', ".").parse().ok()?;
    let unit = caps.get(2)?.as_str().to_lowercase();

    let factor = if unit.starts_with('w') {
        DAYS_PER_WEEK
    } else if unit.starts_with('m') {
        DAYS_PER_MONTH
    } else {
        1.0
    };

    i32::try_from((value * factor).round() as i64).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_forms() {
        assert_eq!(parse_rotation_schedule("2:2"), Some("2:2".into()));
        assert_eq!(parse_rotation_schedule("10/10 rotation"), Some("10:10".into()));
        assert_eq!(parse_rotation_schedule("Rotation 3 : 1"), Some("3:1".into()));
    }

    #[test]
    fn test_on_off_forms() {
        assert_eq!(
            parse_rotation_schedule("2 months on 2 months off"),
            Some("2:2".into())
        );
        assert_eq!(
            parse_rotation_schedule("6 weeks on / 6 weeks off"),
            Some("6:6".into())
        );
        assert_eq!(parse_rotation_schedule("3 on 1 off"), Some("3:1".into()));
    }

    #[test]
    fn test_equal_time() {
        assert_eq!(parse_rotation_schedule("Equal time rotation"), Some("1:1".into()));
        assert_eq!(parse_rotation_schedule("equal  time"), Some("1:1".into()));
    }

    #[test]
    fn test_not_a_rotation() {
        assert!(!is_rotation_schedule("25 days + public holidays"));
        assert!(!is_rotation_schedule("Start 12/05/2025"));
        assert_eq!(parse_rotation_schedule("Joining 2025/12/05"), None);
        assert!(!is_rotation_schedule("Joining 2025/12/05"));
        assert!(!is_rotation_schedule("Shift 08:30:00"));
        assert!(!is_rotation_schedule("0:0"));
        assert!(!is_rotation_schedule(""));
        assert!(is_rotation_schedule("2:2 plus flights"));
    }

    #[test]
    fn test_holiday_units() {
        assert_eq!(parse_holiday_days("25 days"), Some(25));
        assert_eq!(parse_holiday_days("1 day per month worked"), Some(1));
        assert_eq!(parse_holiday_days("6 weeks paid leave"), Some(42));
        assert_eq!(parse_holiday_days("2 months"), Some(60));
    }

    #[test]
    fn test_holiday_decimal_rounding() {
        for (text, value, factor) in [
            ("1.5 months", 1.5_f64, 30.0_f64),
            ("2,5 weeks", 2.5_f64, 7.0_f64),
            ("10.5 days", 10.5_f64, 1.0_f64),
            ("0.3 weeks", 0.3_f64, 7.0_f64),
        ] {
            let expected = (value * factor).round() as i32;
            assert_eq!(parse_holiday_days(text), Some(expected), "{}", text);
        }
    }

    #[test]
    fn test_holiday_no_match() {
        assert_eq!(parse_holiday_days("Generous package"), None);
        assert_eq!(parse_holiday_days(""), None);
        assert_eq!(parse_holiday_days("99999999999 days"), None);
    }
}
