//! Shift category and acceptance slot models.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A concrete shift category.
///
/// "No shift" is modelled as `Option::<ShiftCategory>::None` and travels as
/// `null` on the wire and `NULL` in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftCategory {
    Early,
    Morning,
    Evening,
    Night,
    Rest,
}

impl ShiftCategory {
    pub const ALL: [ShiftCategory; 5] = [
        ShiftCategory::Early,
        ShiftCategory::Morning,
        ShiftCategory::Evening,
        ShiftCategory::Night,
        ShiftCategory::Rest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftCategory::Early => "early",
            ShiftCategory::Morning => "morning",
            ShiftCategory::Evening => "evening",
            ShiftCategory::Night => "night",
            ShiftCategory::Rest => "rest",
        }
    }

    /// Parse a stored category value.
    ///
    /// Blank input means "no shift" and yields `Ok(None)`; anything that is not
    /// one of the five categories is rejected.
    pub fn parse_optional(s: &str) -> Result<Option<Self>, String> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        ShiftCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(trimmed))
            .map(Some)
            .ok_or_else(|| trimmed.to_string())
    }
}

impl fmt::Display for ShiftCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The five fixed "can take" slots of a swap request.
///
/// Each slot normally holds its own category or nothing. Acceptance is decided
/// by slot value, so a slot holding a foreign category still counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanTake {
    #[serde(default)]
    pub early: Option<ShiftCategory>,
    #[serde(default)]
    pub morning: Option<ShiftCategory>,
    #[serde(default)]
    pub evening: Option<ShiftCategory>,
    #[serde(default)]
    pub night: Option<ShiftCategory>,
    #[serde(default)]
    pub rest: Option<ShiftCategory>,
}

impl CanTake {
    /// Build the slots from a list of accepted categories, each in its own slot.
    #[cfg(test)]
    pub fn from_categories<I>(categories: I) -> Self
    where
        I: IntoIterator<Item = ShiftCategory>,
    {
        let mut can_take = CanTake::default();
        for category in categories {
            match category {
                ShiftCategory::Early => can_take.early = Some(category),
                ShiftCategory::Morning => can_take.morning = Some(category),
                ShiftCategory::Evening => can_take.evening = Some(category),
                ShiftCategory::Night => can_take.night = Some(category),
                ShiftCategory::Rest => can_take.rest = Some(category),
            }
        }
        can_take
    }

    pub fn slots(&self) -> [Option<ShiftCategory>; 5] {
        [self.early, self.morning, self.evening, self.night, self.rest]
    }

    /// Whether any slot holds `category`.
    pub fn accepts(&self, category: ShiftCategory) -> bool {
        self.slots().contains(&Some(category))
    }

    /// Distinct accepted categories in slot order.
    pub fn accepted(&self) -> Vec<ShiftCategory> {
        let mut out: Vec<ShiftCategory> = Vec::with_capacity(5);
        for category in self.slots().into_iter().flatten() {
            if !out.contains(&category) {
                out.push(category);
            }
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.slots().iter().all(Option::is_none)
    }
}
