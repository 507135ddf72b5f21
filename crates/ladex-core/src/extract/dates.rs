//! Date normalization to ISO-8601 calendar dates.

use chrono::NaiveDate;

use super::patterns::{DATE_ANY, DATE_MDY, DATE_YMD};

/// Normalize a single date-shaped token to a calendar date.
///
/// Ambiguous `a/b/y` tokens are read month-first (US convention); when that
/// produces no valid date the components are swapped, so `14/03/2024` still
/// resolves to March 14.
pub fn normalize_date(raw: &str) -> Option<NaiveDate> {
    if let Some(caps) = DATE_YMD.captures(raw) {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some(caps) = DATE_MDY.captures(raw) {
        let a: u32 = caps[1].parse().ok()?;
        let b: u32 = caps[2].parse().ok()?;
        let year = parse_year(&caps[3]);
        return NaiveDate::from_ymd_opt(year, a, b)
            .or_else(|| NaiveDate::from_ymd_opt(year, b, a));
    }

    None
}

/// First date-shaped substring in `text`, normalized to `YYYY-MM-DD`.
///
/// Only the first candidate is considered; if it does not normalize the
/// result is null rather than an error.
pub fn first_date(text: &str) -> Option<String> {
    let caps = DATE_ANY.captures(text)?;
    normalize_date(&caps[1]).map(|d| d.format("%Y-%m-%d").to_string())
}

fn parse_year(s: &str) -> i32 {
    let year: i32 = s.parse().unwrap_or(0);
    if year < 100 {
        // Two-digit year: assume 2000s for 00-50, 1900s for 51-99
        if year <= 50 { 2000 + year } else { 1900 + year }
    } else {
        year
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_us_date_is_month_first() {
        assert_eq!(first_date("shipped 03/14/2024").as_deref(), Some("2024-03-14"));
    }

    #[test]
    fn test_day_first_fallback_when_month_invalid() {
        assert_eq!(first_date("14/03/2024").as_deref(), Some("2024-03-14"));
    }

    #[test]
    fn test_iso_date_passes_through() {
        assert_eq!(first_date("date: 2024-03-14").as_deref(), Some("2024-03-14"));
    }

    #[test]
    fn test_two_digit_year() {
        assert_eq!(first_date("1/5/24").as_deref(), Some("2024-01-05"));
        assert_eq!(first_date("1/5/99").as_deref(), Some("1999-01-05"));
    }

    #[test]
    fn test_unparsable_first_candidate_yields_null() {
        // 45/45/2024 matches the date shape but is no calendar date
        assert_eq!(first_date("received 45/45/2024"), None);
    }

    #[test]
    fn test_no_date() {
        assert_eq!(first_date("no dates here"), None);
        assert_eq!(first_date(""), None);
    }
}
