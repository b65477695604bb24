use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

static DMY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{2})/(\d{2})/(\d{4})$").expect("valid date regex")
});

/// Parse a `DD/MM/YYYY` string. Anything else, including impossible
/// calendar dates like `31/02/2024`, is `None`.
pub fn parse_dmy(s: &str) -> Option<NaiveDate> {
    let caps = DMY_RE.captures(s)?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Millisecond timestamp (midnight UTC) used as the sort key for dates.
/// Unparsable or absent dates map to the epoch, so they sort first
/// ascending.
pub fn sort_timestamp(s: Option<&str>) -> i64 {
    s.and_then(parse_dmy)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
        .unwrap_or(0)
}

/// Format a date as `DD/MM/YYYY`
pub fn format_dmy(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// `DD/MM/YYYY` → `YYYY-MM-DD` for date picker inputs
pub fn to_input_format(s: &str) -> Option<String> {
    parse_dmy(s).map(|d| d.format("%Y-%m-%d").to_string())
}

/// `YYYY-MM-DD` → `DD/MM/YYYY`
pub fn from_input_format(s: &str) -> Option<String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .ok()
        .map(format_dmy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_exact_format_only() {
        assert_eq!(
            parse_dmy("15/05/2024"),
            NaiveDate::from_ymd_opt(2024, 5, 15)
        );
        assert_eq!(parse_dmy("5/5/2024"), None);
        assert_eq!(parse_dmy("2024-05-15"), None);
        assert_eq!(parse_dmy(" 15/05/2024"), None);
    }

    #[test]
    fn impossible_day_falls_back_to_epoch() {
        assert_eq!(parse_dmy("31/02/2024"), None);
        assert_eq!(sort_timestamp(Some("31/02/2024")), 0);
        assert_eq!(sort_timestamp(None), 0);
    }

    #[test]
    fn timestamps_follow_calendar_order() {
        let a = sort_timestamp(Some("28/05/2024"));
        let b = sort_timestamp(Some("29/05/2024"));
        assert_eq!(b - a, 86_400_000);
    }

    #[test]
    fn input_format_conversions() {
        assert_eq!(to_input_format("04/06/2024").as_deref(), Some("2024-06-04"));
        assert_eq!(from_input_format("2024-06-04").as_deref(), Some("04/06/2024"));
        assert_eq!(from_input_format("June 4"), None);
    }
}
