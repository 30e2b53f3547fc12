//! Time helpers for request-side dates
//!
//! Request parameters carry ISO `YYYY-MM-DD` dates; response date keys are
//! human-readable (see `reports::date_key`). The asymmetry is intentional.

use chrono::NaiveDate;

use super::{AppError, AppResult};

/// Parse an ISO date string (YYYY-MM-DD) from a query parameter.
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_dates() {
        assert_eq!(
            parse_date("2026-01-03").unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 3).unwrap()
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_date("03/01/2026").is_err());
        assert!(parse_date("not-a-date").is_err());
    }
}
