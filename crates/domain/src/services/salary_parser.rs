//! Salary text parsing.
//!
//! Recruiters type salaries however they like: "6.500€-8.000€",
//! "45k-60k", "€3,500 to €4,000 per month", "DOE". Everything here is
//! total: unmatched input yields `None`, never an error.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::SalaryPeriod;

/// Amounts above this are read as yearly, at or below as monthly.
///
/// A magnitude heuristic: a high monthly salary or a low yearly one is
/// misclassified. Only used when the text carries no explicit period marker.
pub const YEARLY_SALARY_THRESHOLD: i32 = 35_000;

/// Values with a `k` suffix are multiplied only below this.
pub const K_SUFFIX_CEILING: f64 = 100.0;

const K_MULTIPLIER: f64 = 1000.0;

/// A parsed salary range. Both bounds are `None` when nothing matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: Option<i32>,
    pub max: Option<i32>,
}

impl SalaryRange {
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// The figure used for period inference: max when present, else min.
    pub fn reference_amount(&self) -> Option<i32> {
        self.max.or(self.min)
    }
}

lazy_static::lazy_static! {
    /// "6.500" -> "6500". The trailing group stands in for "not followed by a digit or k".
    static ref EURO_THOUSANDS: Regex = Regex::new(r"(\d)\.(\d{3})([^\dkK]|$)").unwrap();

    static ref RANGE_REGEX: Regex = Regex::new(
        r"(?i)(\d+(?:\.\d+)?)\s*(k\b)?\s*[€$£]?\s*(?:-|–|—|\bto\b)\s*[€$£]?\s*(\d+(?:\.\d+)?)\s*(k\b)?"
    )
    .unwrap();

    static ref SINGLE_REGEX: Regex = Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(k\b)?").unwrap();

    static ref YEARLY_MARKERS: Regex = Regex::new(
        r"(?i)(?:\bp/a\b|\bp\.a\.|\bpa\b|\bper\s+annum\b|\bper\s+year\b|\ba\s+year\b|/\s*(?:year|yr|annum)\b|\bannual(?:ly)?\b|\byearly\b)"
    )
    .unwrap();

    static ref MONTHLY_MARKERS: Regex = Regex::new(
        r"(?i)(?:\bp/m\b|\bp\.m\.|\bpm\b|\bper\s+month\b|\ba\s+month\b|/\s*(?:month|mo|mth)\b|\bmonthly\b|\bpcm\b)"
    )
    .unwrap();

    static ref EUR_CODE: Regex = Regex::new(r"(?i)\beur(?:o|os)?\b").unwrap();
    static ref GBP_CODE: Regex = Regex::new(r"(?i)\bgbp\b").unwrap();
    static ref USD_CODE: Regex = Regex::new(r"(?i)\busd\b").unwrap();
    static ref CURRENCY_CODE: Regex = Regex::new(r"^[A-Z]{3}$").unwrap();
}

/// Rewrite European thousand separators ("6.500" -> "6500") and drop commas.
pub fn normalize_salary_text(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = EURO_THOUSANDS.replace_all(&current, "${1}${2}${3}").into_owned();
        if next == current {
            break;
        }
        current = next;
    }
    current.replace(',', "")
}

/// Parse a salary range or a single figure out of free text.
pub fn parse_salary_from_text(text: &str) -> SalaryRange {
    let normalized = normalize_salary_text(text);

    if let Some(caps) = RANGE_REGEX.captures(&normalized) {
        let min = caps.get(1).and_then(|m| m.as_str().parse::<f64>().ok());
        let max = caps.get(3).and_then(|m| m.as_str().parse::<f64>().ok());
        if let (Some(min), Some(max)) = (min, max) {
            let max_has_k = caps.get(4).is_some();
            // "45-60k": the suffix on the upper bound covers both.
            let min_has_k = caps.get(2).is_some() || max_has_k;
            return SalaryRange {
                min: round_salary(apply_k_suffix(min, min_has_k)),
                max: round_salary(apply_k_suffix(max, max_has_k)),
            };
        }
    }

    if let Some(caps) = SINGLE_REGEX.captures(&normalized) {
        if let Some(value) = caps.get(1).and_then(|m| m.as_str().parse::<f64>().ok()) {
            let amount = round_salary(apply_k_suffix(value, caps.get(2).is_some()));
            return SalaryRange {
                min: amount,
                max: amount,
            };
        }
    }

    SalaryRange::default()
}

fn apply_k_suffix(value: f64, has_k: bool) -> f64 {
    if has_k && value < K_SUFFIX_CEILING {
        value * K_MULTIPLIER
    } else {
        value
    }
}

/// Round to the integer stored in the salary columns. `None` when the
/// rounded figure does not fit.
pub fn round_salary(value: f64) -> Option<i32> {
    let rounded = value.round();
    if !rounded.is_finite() {
        return None;
    }
    i32::try_from(rounded as i64).ok()
}

/// Explicit period marker in the text. The earliest marker wins when both appear.
pub fn detect_salary_period_from_text(text: &str) -> Option<SalaryPeriod> {
    let yearly = YEARLY_MARKERS.find(text).map(|m| m.start());
    let monthly = MONTHLY_MARKERS.find(text).map(|m| m.start());

    match (yearly, monthly) {
        (Some(y), Some(m)) if m < y => Some(SalaryPeriod::Monthly),
        (Some(_), _) => Some(SalaryPeriod::Yearly),
        (None, Some(_)) => Some(SalaryPeriod::Monthly),
        (None, None) => None,
    }
}

/// Period from magnitude alone. See [`YEARLY_SALARY_THRESHOLD`].
pub fn infer_salary_period(amount: i32) -> SalaryPeriod {
    if amount > YEARLY_SALARY_THRESHOLD {
        SalaryPeriod::Yearly
    } else {
        SalaryPeriod::Monthly
    }
}

/// Detection first, then inference from the resolved range.
pub fn resolve_salary_period(text: Option<&str>, range: SalaryRange) -> Option<SalaryPeriod> {
    text.and_then(detect_salary_period_from_text)
        .or_else(|| range.reference_amount().map(infer_salary_period))
}

/// ISO code for a currency symbol or code found in the text.
pub fn detect_currency(text: &str) -> Option<&'static str> {
    if text.contains('€') || EUR_CODE.is_match(text) {
        Some("EUR")
    } else if text.contains('£') || GBP_CODE.is_match(text) {
        Some("GBP")
    } else if text.contains('$') || USD_CODE.is_match(text) {
        Some("USD")
    } else {
        None
    }
}

/// Normalize a currency code reported by the ATS ("eur " -> "EUR").
pub fn normalize_currency_code(code: &str) -> Option<String> {
    let code = code.trim().to_uppercase();
    if CURRENCY_CODE.is_match(&code) {
        Some(code)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(min: i32, max: i32) -> SalaryRange {
        SalaryRange {
            min: Some(min),
            max: Some(max),
        }
    }

    #[test]
    fn test_european_thousands() {
        assert_eq!(parse_salary_from_text("6.500€"), range(6500, 6500));
        assert_eq!(parse_salary_from_text("6.500€-8.000€"), range(6500, 8000));
        assert_eq!(parse_salary_from_text("€ 1.250.000"), range(1_250_000, 1_250_000));
        assert_eq!(normalize_salary_text("6.500 - 8.000 EUR"), "6500 - 8000 EUR");
    }

    #[test]
    fn test_decimal_is_not_thousands() {
        assert_eq!(parse_salary_from_text("6.5k"), range(6500, 6500));
        assert_eq!(parse_salary_from_text("4.25"), range(4, 4));
    }

    #[test]
    fn test_k_suffix() {
        assert_eq!(parse_salary_from_text("45k-60k"), range(45_000, 60_000));
        assert_eq!(parse_salary_from_text("45-60k"), range(45_000, 60_000));
        assert_eq!(parse_salary_from_text("€50K"), range(50_000, 50_000));
    }

    #[test]
    fn test_k_suffix_ceiling() {
        // At or above the ceiling the suffix is ignored.
        assert_eq!(parse_salary_from_text("150k"), range(150, 150));
    }

    #[test]
    fn test_commas_and_words() {
        assert_eq!(
            parse_salary_from_text("€3,500 to €4,000 per month"),
            range(3500, 4000)
        );
        assert_eq!(parse_salary_from_text("$7000 – $9000"), range(7000, 9000));
        assert_eq!(parse_salary_from_text("Up to 5500 EUR"), range(5500, 5500));
    }

    #[test]
    fn test_out_of_range_amounts_are_dropped() {
        assert!(parse_salary_from_text("99999999999").is_empty());
        assert_eq!(
            parse_salary_from_text("5000 - 99999999999"),
            SalaryRange {
                min: Some(5000),
                max: None,
            }
        );
        assert_eq!(round_salary(2_147_483_647.0), Some(i32::MAX));
        assert_eq!(round_salary(1e12), None);
        assert_eq!(round_salary(f64::NAN), None);
        assert_eq!(round_salary(6499.5), Some(6500));
    }

    #[test]
    fn test_no_match() {
        assert!(parse_salary_from_text("DOE").is_empty());
        assert!(parse_salary_from_text("").is_empty());
        assert!(parse_salary_from_text("Competitive").is_empty());
    }

    #[test]
    fn test_detect_period() {
        assert_eq!(
            detect_salary_period_from_text("€60,000 p/a"),
            Some(SalaryPeriod::Yearly)
        );
        assert_eq!(
            detect_salary_period_from_text("90k per annum"),
            Some(SalaryPeriod::Yearly)
        );
        assert_eq!(
            detect_salary_period_from_text("5000 per month"),
            Some(SalaryPeriod::Monthly)
        );
        assert_eq!(
            detect_salary_period_from_text("£4000 pcm"),
            Some(SalaryPeriod::Monthly)
        );
        assert_eq!(
            detect_salary_period_from_text("€6000/month (72k annual)"),
            Some(SalaryPeriod::Monthly)
        );
        assert_eq!(detect_salary_period_from_text("6500 EUR"), None);
    }

    // Known approximation: magnitude decides when no marker is present.
    #[test]
    fn test_infer_period_threshold() {
        assert_eq!(infer_salary_period(8000), SalaryPeriod::Monthly);
        assert_eq!(infer_salary_period(35_000), SalaryPeriod::Monthly);
        assert_eq!(infer_salary_period(35_001), SalaryPeriod::Yearly);
        // A 40k/month captain is misread as yearly.
        assert_eq!(infer_salary_period(40_000), SalaryPeriod::Yearly);
    }

    #[test]
    fn test_resolve_period() {
        assert_eq!(
            resolve_salary_period(Some("40000 per month"), range(40_000, 40_000)),
            Some(SalaryPeriod::Monthly)
        );
        assert_eq!(
            resolve_salary_period(Some("45k-60k"), range(45_000, 60_000)),
            Some(SalaryPeriod::Yearly)
        );
        assert_eq!(
            resolve_salary_period(None, SalaryRange { min: Some(4000), max: None }),
            Some(SalaryPeriod::Monthly)
        );
        assert_eq!(resolve_salary_period(Some("DOE"), SalaryRange::default()), None);
    }

    #[test]
    fn test_detect_currency() {
        assert_eq!(detect_currency("6.500€"), Some("EUR"));
        assert_eq!(detect_currency("5000 euros"), Some("EUR"));
        assert_eq!(detect_currency("£4000"), Some("GBP"));
        assert_eq!(detect_currency("USD 7000"), Some("USD"));
        assert_eq!(detect_currency("7000"), None);
    }

    #[test]
    fn test_normalize_currency_code() {
        assert_eq!(normalize_currency_code(" eur "), Some("EUR".to_string()));
        assert_eq!(normalize_currency_code("euro"), None);
        assert_eq!(normalize_currency_code(""), None);
    }
}
