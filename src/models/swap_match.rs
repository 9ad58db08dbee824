//! Swap match model.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ShiftCategory;

/// Two employees who can swap on a date: A gives away `given_by_a`, B gives away `given_by_b`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapMatch {
    pub employee_a: String,
    pub employee_b: String,
    pub date: NaiveDate,
    pub given_by_a: ShiftCategory,
    pub given_by_b: ShiftCategory,
}

impl SwapMatch {
    /// Whether `employee_name` is either party.
    pub fn involves(&self, employee_name: &str) -> bool {
        self.employee_a == employee_name || self.employee_b == employee_name
    }

    /// The same match seen from B's side.
    #[cfg(test)]
    pub fn reversed(&self) -> Self {
        SwapMatch {
            employee_a: self.employee_b.clone(),
            employee_b: self.employee_a.clone(),
            date: self.date,
            given_by_a: self.given_by_b,
            given_by_b: self.given_by_a,
        }
    }
}

impl fmt::Display for SwapMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} and {} on {} can swap shifts: {} gives away {}, {} gives away {}",
            self.employee_a,
            self.employee_b,
            self.date,
            self.employee_a,
            self.given_by_a,
            self.employee_b,
            self.given_by_b
        )
    }
}
