//! Date-key normalization
//!
//! The reconciliation join key. Source documents spell the same calendar
//! day in several ways (ISO day, RFC3339 timestamp, epoch millis); every
//! spelling of one day must land on the same display key so records from
//! different collections merge.
//!
//! Rules:
//! - absent date -> literal `"Unknown Date"`
//! - unparseable -> literal `"Invalid Date"` (a shared bucket; documents
//!   with unrelated broken dates will merge there - a known upstream data
//!   quality gap, kept visible rather than papered over)
//! - otherwise -> `"Mon DD, YYYY"` (e.g. `"Jan 03, 2026"`)

use chrono::{DateTime, NaiveDate, NaiveDateTime};

pub const UNKNOWN_DATE: &str = "Unknown Date";
pub const INVALID_DATE: &str = "Invalid Date";

/// Display format for date keys: three-letter month, zero-padded day,
/// four-digit year.
const KEY_FORMAT: &str = "%b %d, %Y";

/// Try to interpret a raw date value as a calendar day.
///
/// Accepted spellings, in order: ISO day, RFC3339, naive datetime,
/// slash-separated day, epoch milliseconds.
pub fn parse_raw_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        // Keep the calendar day as written in the document's own offset.
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y/%m/%d") {
        return Some(d);
    }
    if raw.chars().all(|c| c.is_ascii_digit())
        && let Ok(millis) = raw.parse::<i64>()
        && let Some(dt) = DateTime::from_timestamp_millis(millis)
    {
        return Some(dt.date_naive());
    }

    None
}

/// Resolve a document's raw date to `(display key, parsed day)`.
///
/// The parsed day is `None` for the `"Unknown Date"` and `"Invalid Date"`
/// buckets; those rows cannot participate in date-range filtering.
pub fn date_key(raw: Option<&str>) -> (String, Option<NaiveDate>) {
    match raw {
        None => (UNKNOWN_DATE.to_string(), None),
        Some(value) => match parse_raw_date(value) {
            Some(day) => (day.format(KEY_FORMAT).to_string(), Some(day)),
            None => (INVALID_DATE.to_string(), None),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn iso_day_formats_with_padded_day() {
        let (key, parsed) = date_key(Some("2026-01-03"));
        assert_eq!(key, "Jan 03, 2026");
        assert_eq!(parsed, Some(day(2026, 1, 3)));
    }

    #[test]
    fn same_day_different_spellings_share_one_key() {
        let iso = date_key(Some("2026-01-03")).0;
        let rfc = date_key(Some("2026-01-03T14:30:00+00:00")).0;
        let naive = date_key(Some("2026-01-03T09:15:00")).0;
        let slashed = date_key(Some("2026/01/03")).0;
        assert_eq!(iso, rfc);
        assert_eq!(iso, naive);
        assert_eq!(iso, slashed);
    }

    #[test]
    fn epoch_millis_resolve_to_a_day() {
        // 2026-01-03T00:00:00Z
        let millis = day(2026, 1, 3)
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc()
            .timestamp_millis();
        let (key, parsed) = date_key(Some(&millis.to_string()));
        assert_eq!(key, "Jan 03, 2026");
        assert_eq!(parsed, Some(day(2026, 1, 3)));
    }

    #[test]
    fn missing_date_goes_to_unknown_bucket() {
        assert_eq!(date_key(None), (UNKNOWN_DATE.to_string(), None));
    }

    #[test]
    fn garbage_goes_to_invalid_bucket() {
        assert_eq!(date_key(Some("yesterday")), (INVALID_DATE.to_string(), None));
        assert_eq!(date_key(Some("")), (INVALID_DATE.to_string(), None));
        assert_eq!(date_key(Some("03-01-2026")), (INVALID_DATE.to_string(), None));
    }
}
