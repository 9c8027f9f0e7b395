//! Per-date counts and roster for the warden dashboard.
//!
//! Everything here is derived from a slice of preferences and never stored.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::model::{Departments, MealChoice, Preference, Year};

/// One cell of the dashboard. `total` always equals the sum of the others.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyCounts {
    pub egg: u32,
    pub veg: u32,
    pub non_veg: u32,
    pub skipped: u32,
    pub total: u32,
}

impl DailyCounts {
    pub fn record(&mut self, choice: MealChoice) {
        match choice {
            MealChoice::Egg => self.egg += 1,
            MealChoice::Veg => self.veg += 1,
            MealChoice::NonVeg => self.non_veg += 1,
            MealChoice::SkipEgg | MealChoice::SkipMeal => self.skipped += 1,
        }
        self.total += 1;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentCounts {
    pub code: String,
    pub name: String,
    /// Always holds all four years.
    pub years: BTreeMap<Year, DailyCounts>,
    pub total: DailyCounts,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregation {
    /// In configured order, every department present.
    pub departments: Vec<DepartmentCounts>,
    pub grand_total: DailyCounts,
    /// Records whose department is not configured.
    pub ignored: u32,
}

impl Aggregation {
    pub fn department(&self, code: &str) -> Option<&DepartmentCounts> {
        self.departments.iter().find(|d| d.code == code)
    }

    pub fn cell(&self, code: &str, year: Year) -> Option<&DailyCounts> {
        self.department(code).and_then(|d| d.years.get(&year))
    }
}

/// Count `preferences` into every configured department and year.
pub fn aggregate(preferences: &[Preference], departments: &Departments) -> Aggregation {
    let mut rows: Vec<DepartmentCounts> = departments
        .iter()
        .map(|d| DepartmentCounts {
            code: d.code.clone(),
            name: d.name.clone(),
            years: Year::ALL.iter().map(|y| (*y, DailyCounts::default())).collect(),
            total: DailyCounts::default(),
        })
        .collect();

    let mut grand_total = DailyCounts::default();
    let mut ignored = 0;

    for pref in preferences {
        let Some(row) = rows
            .iter_mut()
            .find(|r| r.code == pref.identity.department)
        else {
            debug!(
                "ignoring preference from unknown department '{}'",
                pref.identity.department
            );
            ignored += 1;
            continue;
        };

        row.years
            .entry(pref.identity.year)
            .or_default()
            .record(pref.choice);
        row.total.record(pref.choice);
        grand_total.record(pref.choice);
    }

    Aggregation {
        departments: rows,
        grand_total,
        ignored,
    }
}

// ---------------------------------------------------------------------------
// Roster
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub name: String,
    pub year: Year,
    pub choice: MealChoice,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentRoster {
    pub code: String,
    pub name: String,
    pub entries: Vec<RosterEntry>,
}

/// Who chose what, per configured department, sorted by year then name.
pub fn roster(preferences: &[Preference], departments: &Departments) -> Vec<DepartmentRoster> {
    departments
        .iter()
        .map(|dept| {
            let mut entries: Vec<RosterEntry> = preferences
                .iter()
                .filter(|p| p.identity.department == dept.code)
                .map(|p| RosterEntry {
                    name: p.identity.display_name().to_string(),
                    year: p.identity.year,
                    choice: p.choice,
                    label: p.choice.label(),
                })
                .collect();
            entries.sort_by(|a, b| a.year.cmp(&b.year).then_with(|| a.name.cmp(&b.name)));

            DepartmentRoster {
                code: dept.code.clone(),
                name: dept.name.clone(),
                entries,
            }
        })
        .collect()
}
