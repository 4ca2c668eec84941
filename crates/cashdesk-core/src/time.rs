//! Date handling for the transaction editor
//!
//! The store may send either a calendar date or a full timestamp; the editor
//! always works with `YYYY-MM-DD`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Date format used by the editor's date input and on the wire
pub const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a calendar date from editor input or a store timestamp
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps (converted to their UTC date)
/// and naive `YYYY-MM-DDTHH:MM:SS[.fff]` timestamps.
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, INPUT_DATE_FORMAT) {
        return Some(date);
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Some(datetime.with_timezone(&Utc).date_naive());
    }

    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|datetime| datetime.date())
}

/// Format a date the way the editor input expects it
pub fn format_input_date(date: NaiveDate) -> String {
    date.format(INPUT_DATE_FORMAT).to_string()
}

/// Reformat a stored date for the editor input
///
/// Values that cannot be parsed are passed through so validation can flag them.
pub fn to_input_date(value: &str) -> String {
    match parse_calendar_date(value) {
        Some(date) => format_input_date(date),
        None => value.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_date() {
        assert_eq!(
            parse_calendar_date("2024-02-29"),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
    }

    #[test]
    fn test_parse_rejects_impossible_dates() {
        assert_eq!(parse_calendar_date("2023-02-29"), None);
        assert_eq!(parse_calendar_date("2023-13-01"), None);
        assert_eq!(parse_calendar_date("yesterday"), None);
        assert_eq!(parse_calendar_date("   "), None);
    }

    #[test]
    fn test_parse_timestamps() {
        assert_eq!(
            parse_calendar_date("2023-05-10T00:00:00.000Z"),
            NaiveDate::from_ymd_opt(2023, 5, 10)
        );
        // 23:30 at -03:00 is already the next day in UTC
        assert_eq!(
            parse_calendar_date("2023-05-10T23:30:00-03:00"),
            NaiveDate::from_ymd_opt(2023, 5, 11)
        );
        assert_eq!(
            parse_calendar_date("2023-05-10T12:00:00"),
            NaiveDate::from_ymd_opt(2023, 5, 10)
        );
    }

    #[test]
    fn test_to_input_date() {
        assert_eq!(to_input_date("2023-05-10T00:00:00.000Z"), "2023-05-10");
        assert_eq!(to_input_date("2023-05-10"), "2023-05-10");
        assert_eq!(to_input_date(" not a date "), "not a date");
    }
}
