//! Shift swap request model and its raw stored form.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{CanTake, ShiftCategory};

/// ISO date format used for keys, storage and the wire.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One employee's offer for one date: the shift they give away and what they would take instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftSwapRequest {
    pub employee_name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub give_away: Option<ShiftCategory>,
    #[serde(default)]
    pub can_take: CanTake,
}

impl ShiftSwapRequest {
    pub fn new(
        employee_name: impl Into<String>,
        date: NaiveDate,
        give_away: Option<ShiftCategory>,
        can_take: CanTake,
    ) -> Self {
        Self {
            employee_name: employee_name.into(),
            date,
            give_away,
            can_take,
        }
    }

    /// Store key: `{employee_name}_{date}`.
    pub fn key(&self) -> String {
        record_key(&self.employee_name, self.date)
    }
}

/// Build the store key for an employee and date.
pub fn record_key(employee_name: &str, date: NaiveDate) -> String {
    format!("{}_{}", employee_name, date.format(DATE_FORMAT))
}

/// Parse an ISO `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

/// A swap request exactly as it sits in the store, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwapRecord {
    pub employee_name: Option<String>,
    pub date: Option<String>,
    pub give_away: Option<String>,
    pub can_take_early: Option<String>,
    pub can_take_morning: Option<String>,
    pub can_take_evening: Option<String>,
    pub can_take_night: Option<String>,
    pub can_take_rest: Option<String>,
}

impl From<&ShiftSwapRequest> for SwapRecord {
    fn from(request: &ShiftSwapRequest) -> Self {
        let text = |c: Option<ShiftCategory>| c.map(|c| c.as_str().to_string());
        SwapRecord {
            employee_name: Some(request.employee_name.clone()),
            date: Some(request.date.format(DATE_FORMAT).to_string()),
            give_away: text(request.give_away),
            can_take_early: text(request.can_take.early),
            can_take_morning: text(request.can_take.morning),
            can_take_evening: text(request.can_take.evening),
            can_take_night: text(request.can_take.night),
            can_take_rest: text(request.can_take.rest),
        }
    }
}

/// Why a stored record cannot take part in matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    MissingEmployee,
    InvalidDate(String),
    UnknownCategory { field: &'static str, value: String },
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::MissingEmployee => write!(f, "employee name is missing"),
            RecordError::InvalidDate(value) => write!(f, "invalid date '{}'", value),
            RecordError::UnknownCategory { field, value } => {
                write!(f, "unknown shift category '{}' in {}", value, field)
            }
        }
    }
}

impl std::error::Error for RecordError {}

fn category_field(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<ShiftCategory>, RecordError> {
    match value {
        None => Ok(None),
        Some(v) => ShiftCategory::parse_optional(v)
            .map_err(|value| RecordError::UnknownCategory { field, value }),
    }
}

impl TryFrom<SwapRecord> for ShiftSwapRequest {
    type Error = RecordError;

    fn try_from(record: SwapRecord) -> Result<Self, Self::Error> {
        let employee_name = record
            .employee_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or(RecordError::MissingEmployee)?;

        let raw_date = record.date.unwrap_or_default();
        let date = parse_date(&raw_date).ok_or(RecordError::InvalidDate(raw_date))?;

        let give_away = category_field("giveAway", record.give_away.as_deref())?;
        let can_take = CanTake {
            early: category_field("canTake.early", record.can_take_early.as_deref())?,
            morning: category_field("canTake.morning", record.can_take_morning.as_deref())?,
            evening: category_field("canTake.evening", record.can_take_evening.as_deref())?,
            night: category_field("canTake.night", record.can_take_night.as_deref())?,
            rest: category_field("canTake.rest", record.can_take_rest.as_deref())?,
        };

        Ok(ShiftSwapRequest {
            employee_name,
            date,
            give_away,
            can_take,
        })
    }
}

/// Request body for submitting (or resubmitting) a swap request for a date.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertSwapRequest {
    #[serde(default)]
    pub give_away: Option<ShiftCategory>,
    #[serde(default)]
    pub can_take: CanTake,
    /// Month the request is being filed for (`YYYY-MM`); the date must fall inside it.
    #[serde(default)]
    pub month: Option<String>,
    /// Date of an existing request of the caller that this one replaces.
    #[serde(default)]
    pub replaces: Option<String>,
}

/// Result of a delete call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub key: String,
    pub deleted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, date: &str, give: &str) -> SwapRecord {
        SwapRecord {
            employee_name: Some(name.to_string()),
            date: Some(date.to_string()),
            give_away: Some(give.to_string()),
            can_take_morning: Some("morning".to_string()),
            ..SwapRecord::default()
        }
    }

    #[test]
    fn test_key_format() {
        let request = ShiftSwapRequest::new(
            "Alice",
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            Some(ShiftCategory::Early),
            CanTake::default(),
        );
        assert_eq!(request.key(), "Alice_2024-06-01");
    }

    #[test]
    fn test_record_parses() {
        let request = ShiftSwapRequest::try_from(record("Alice", "2024-06-01", "early")).unwrap();
        assert_eq!(request.employee_name, "Alice");
        assert_eq!(request.give_away, Some(ShiftCategory::Early));
        assert!(request.can_take.accepts(ShiftCategory::Morning));
        assert_eq!(request.can_take.night, None);
    }

    #[test]
    fn test_missing_fields_become_none() {
        let raw = SwapRecord {
            employee_name: Some("Bob".to_string()),
            date: Some("2024-06-02".to_string()),
            ..SwapRecord::default()
        };
        let request = ShiftSwapRequest::try_from(raw).unwrap();
        assert_eq!(request.give_away, None);
        assert!(request.can_take.is_empty());
    }

    #[test]
    fn test_malformed_records_rejected() {
        assert_eq!(
            ShiftSwapRequest::try_from(record("", "2024-06-01", "early")),
            Err(RecordError::MissingEmployee)
        );
        assert_eq!(
            ShiftSwapRequest::try_from(record("Alice", "2024-13-01", "early")),
            Err(RecordError::InvalidDate("2024-13-01".to_string()))
        );
        assert_eq!(
            ShiftSwapRequest::try_from(record("Alice", "2024-06-01", "siesta")),
            Err(RecordError::UnknownCategory {
                field: "giveAway",
                value: "siesta".to_string()
            })
        );
    }

    #[test]
    fn test_record_from_request_keeps_nulls() {
        let request = ShiftSwapRequest::new(
            "Carol",
            NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            None,
            CanTake::from_categories([ShiftCategory::Rest]),
        );
        let raw = SwapRecord::from(&request);
        assert_eq!(raw.give_away, None);
        assert_eq!(raw.can_take_rest.as_deref(), Some("rest"));
        assert_eq!(raw.date.as_deref(), Some("2024-06-03"));
    }

    #[test]
    fn test_upsert_body_defaults() {
        let body: UpsertSwapRequest = serde_json::from_str(r#"{"giveAway":"night"}"#).unwrap();
        assert_eq!(body.give_away, Some(ShiftCategory::Night));
        assert!(body.can_take.is_empty());
        assert!(body.month.is_none());
        assert!(body.replaces.is_none());
    }
}
