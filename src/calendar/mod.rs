//! Month helpers for the swap submission form.

use std::fmt;

use chrono::{Datelike, NaiveDate};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    InvalidMonth(String),
    OutsideMonth { date: NaiveDate, year: i32, month: u32 },
}

impl fmt::Display for CalendarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarError::InvalidMonth(value) => write!(f, "invalid month '{}'", value),
            CalendarError::OutsideMonth { date, year, month } => {
                write!(f, "date {} is not in {:04}-{:02}", date, year, month)
            }
        }
    }
}

impl std::error::Error for CalendarError {}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate, CalendarError> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| CalendarError::InvalidMonth(format!("{:04}-{:02}", year, month)))
}

/// Every day of the given month, in order.
pub fn month_dates(year: i32, month: u32) -> Result<Vec<NaiveDate>, CalendarError> {
    let first = first_of_month(year, month)?;
    Ok(first
        .iter_days()
        .take_while(|d| d.month() == month)
        .collect())
}

/// Parse a `YYYY-MM` month.
pub fn parse_month(s: &str) -> Result<(i32, u32), CalendarError> {
    let invalid = || CalendarError::InvalidMonth(s.to_string());
    let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    first_of_month(year, month).map_err(|_| invalid())?;
    Ok((year, month))
}

/// Check that `date` falls inside `year`-`month`.
pub fn ensure_in_month(date: NaiveDate, year: i32, month: u32) -> Result<(), CalendarError> {
    if date.year() == year && date.month() == month {
        Ok(())
    } else {
        Err(CalendarError::OutsideMonth { date, year, month })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_lengths() {
        assert_eq!(month_dates(2024, 2).unwrap().len(), 29);
        assert_eq!(month_dates(2023, 2).unwrap().len(), 28);
        assert_eq!(month_dates(2024, 6).unwrap().len(), 30);
        assert_eq!(month_dates(2024, 1).unwrap().len(), 31);
    }

    #[test]
    fn test_december_wraps_cleanly() {
        let dates = month_dates(2024, 12).unwrap();
        assert_eq!(dates.len(), 31);
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
        assert_eq!(dates[30], NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }

    #[test]
    fn test_invalid_month() {
        assert!(month_dates(2024, 13).is_err());
        assert!(month_dates(2024, 0).is_err());
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2024-06"), Ok((2024, 6)));
        assert_eq!(parse_month("2024-6"), Ok((2024, 6)));
        assert!(parse_month("2024").is_err());
        assert!(parse_month("2024-13").is_err());
        assert!(parse_month("june").is_err());
    }

    #[test]
    fn test_ensure_in_month() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        assert!(ensure_in_month(date, 2024, 6).is_ok());
        assert_eq!(
            ensure_in_month(date, 2024, 7),
            Err(CalendarError::OutsideMonth {
                date,
                year: 2024,
                month: 7
            })
        );
    }
}
