use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use foodhub_core::ServiceError;

// ---------------------------------------------------------------------------
// Department
// ---------------------------------------------------------------------------

/// One entry of the configured department list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// Short upper-case code stored on every preference (e.g. `CSE`).
    pub code: String,
    /// Display name (e.g. `Computer Science`).
    pub name: String,
}

impl Department {
    pub fn new(code: &str, name: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
        }
    }
}

/// The department set residents may pick from.
///
/// Supplied by configuration; order is preserved for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departments {
    list: Vec<Department>,
}

impl Departments {
    /// Validate and wrap a department list.
    ///
    /// Codes must be non-empty, unique, and made of `A-Z`, `0-9` or `_`.
    pub fn new(list: Vec<Department>) -> Result<Self, ServiceError> {
        if list.is_empty() {
            return Err(ServiceError::Validation(
                "at least one department must be configured".into(),
            ));
        }

        let mut seen = HashSet::new();
        for dept in &list {
            let valid = !dept.code.is_empty()
                && dept
                    .code
                    .chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_');
            if !valid {
                return Err(ServiceError::Validation(format!(
                    "invalid department code '{}'",
                    dept.code
                )));
            }
            if !seen.insert(dept.code.as_str()) {
                return Err(ServiceError::Validation(format!(
                    "duplicate department code '{}'",
                    dept.code
                )));
            }
        }

        Ok(Self { list })
    }

    /// The seven departments the hostel started with.
    pub fn hostel_default() -> Self {
        Self {
            list: vec![
                Department::new("CSE", "Computer Science"),
                Department::new("ECE", "Electronics & Communication"),
                Department::new("EEE", "Electrical & Electronics"),
                Department::new("MECH", "Mechanical"),
                Department::new("IT", "Information Technology"),
                Department::new("AIDS", "Artificial Intelligence & Data Science"),
                Department::new("MBA", "MBA"),
            ],
        }
    }

    pub fn get(&self, code: &str) -> Option<&Department> {
        self.list.iter().find(|d| d.code == code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Look up a department or fail with a validation error.
    pub fn require(&self, code: &str) -> Result<&Department, ServiceError> {
        self.get(code)
            .ok_or_else(|| ServiceError::Validation(format!("unknown department '{code}'")))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Department> {
        self.list.iter()
    }

    pub fn as_slice(&self) -> &[Department] {
        &self.list
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Year
// ---------------------------------------------------------------------------

/// Year of study, 1 through 4. Serialized as a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Year {
    First = 1,
    Second = 2,
    Third = 3,
    Fourth = 4,
}

impl Year {
    pub const ALL: [Year; 4] = [Year::First, Year::Second, Year::Third, Year::Fourth];

    pub fn number(self) -> u8 {
        self as u8
    }

    /// "1st Year", "2nd Year", ...
    pub fn label(self) -> &'static str {
        match self {
            Year::First => "1st Year",
            Year::Second => "2nd Year",
            Year::Third => "3rd Year",
            Year::Fourth => "4th Year",
        }
    }
}

impl TryFrom<u8> for Year {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Year::First),
            2 => Ok(Year::Second),
            3 => Ok(Year::Third),
            4 => Ok(Year::Fourth),
            other => Err(format!("year must be between 1 and 4, got {other}")),
        }
    }
}

impl From<Year> for u8 {
    fn from(year: Year) -> u8 {
        year.number()
    }
}

impl std::fmt::Display for Year {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Who submitted a preference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub department: String,
    pub year: Year,
    /// Optional free text, trimmed; `None` when blank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Identity {
    pub fn new(department: &str, year: Year, name: Option<&str>) -> Self {
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        Self {
            department: department.to_string(),
            year,
            name,
        }
    }

    /// Name for display, `anonymous` when none was given.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("anonymous")
    }
}

// ---------------------------------------------------------------------------
// MealChoice
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MealChoice {
    Egg,
    SkipEgg,
    Veg,
    NonVeg,
    SkipMeal,
}

impl MealChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Egg => "EGG",
            Self::SkipEgg => "SKIP_EGG",
            Self::Veg => "VEG",
            Self::NonVeg => "NON_VEG",
            Self::SkipMeal => "SKIP_MEAL",
        }
    }

    /// Label shown on the warden roster.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Egg => "Needs Egg",
            Self::SkipEgg => "Skips Egg",
            Self::Veg => "Veg",
            Self::NonVeg => "Non-Veg",
            Self::SkipMeal => "Skips Meal",
        }
    }
}

impl std::fmt::Display for MealChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Preference
// ---------------------------------------------------------------------------

/// One recorded meal choice for one identity on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preference {
    pub identity: Identity,
    pub choice: MealChoice,
    /// Calendar date, serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// Weekday of `date`, 0 = Sunday.
    pub day: u8,
}

impl Preference {
    pub fn new(identity: Identity, choice: MealChoice, date: NaiveDate) -> Self {
        Self {
            identity,
            choice,
            date,
            day: day_index(date),
        }
    }
}

/// Weekday index with Sunday = 0, matching the stored `day` field.
pub fn day_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}
