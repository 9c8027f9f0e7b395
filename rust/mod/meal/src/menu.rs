use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use foodhub_core::ServiceError;

use crate::model::{day_index, MealChoice};

/// Which choices residents get on a given day.
///
/// ```text
/// Tue, Sat      → EGG
/// Thu, Sun      → MEAL
/// Mon, Wed, Fri → NO_MENU
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Menu {
    Egg,
    Meal,
    NoMenu,
}

const EGG_CHOICES: &[MealChoice] = &[MealChoice::Egg, MealChoice::SkipEgg];
const MEAL_CHOICES: &[MealChoice] = &[MealChoice::Veg, MealChoice::NonVeg, MealChoice::SkipMeal];

impl Menu {
    pub fn for_weekday(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Tue | Weekday::Sat => Menu::Egg,
            Weekday::Thu | Weekday::Sun => Menu::Meal,
            Weekday::Mon | Weekday::Wed | Weekday::Fri => Menu::NoMenu,
        }
    }

    /// Menu for a weekday index where 0 = Sunday.
    pub fn for_day(day: u8) -> Result<Self, ServiceError> {
        let weekday = match day {
            0 => Weekday::Sun,
            1 => Weekday::Mon,
            2 => Weekday::Tue,
            3 => Weekday::Wed,
            4 => Weekday::Thu,
            5 => Weekday::Fri,
            6 => Weekday::Sat,
            other => {
                return Err(ServiceError::Validation(format!(
                    "weekday must be between 0 and 6, got {other}"
                )))
            }
        };
        Ok(Self::for_weekday(weekday))
    }

    pub fn for_date(date: NaiveDate) -> Self {
        Self::for_weekday(date.weekday())
    }

    /// Selectable choices; empty when there is nothing to pick.
    pub fn choices(self) -> &'static [MealChoice] {
        match self {
            Menu::Egg => EGG_CHOICES,
            Menu::Meal => MEAL_CHOICES,
            Menu::NoMenu => &[],
        }
    }

    pub fn allows(self, choice: MealChoice) -> bool {
        self.choices().contains(&choice)
    }

    pub fn is_actionable(self) -> bool {
        !self.choices().is_empty()
    }

    pub fn title(self) -> &'static str {
        match self {
            Menu::Egg => "Today's Special: Egg",
            Menu::Meal => "Today's Menu Options",
            Menu::NoMenu => "No special menu options to select for today.",
        }
    }
}

/// A date together with its menu, ready to hand to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuView {
    pub date: NaiveDate,
    pub day: u8,
    pub menu: Menu,
    pub title: &'static str,
    pub choices: Vec<MealChoice>,
}

impl MenuView {
    pub fn for_date(date: NaiveDate) -> Self {
        let menu = Menu::for_date(date);
        Self {
            date,
            day: day_index(date),
            menu,
            title: menu.title(),
            choices: menu.choices().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_weekday_maps_to_one_of_three_sets() {
        use MealChoice::*;
        let egg = vec![Egg, SkipEgg];
        let meal = vec![Veg, NonVeg, SkipMeal];
        let none: Vec<MealChoice> = vec![];

        let expected = [
            (0, &meal),
            (1, &none),
            (2, &egg),
            (3, &none),
            (4, &meal),
            (5, &none),
            (6, &egg),
        ];
        for (day, choices) in expected {
            assert_eq!(&Menu::for_day(day).unwrap().choices().to_vec(), choices, "day {day}");
        }
    }

    #[test]
    fn day_out_of_range() {
        let err = Menu::for_day(7).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_FAILED");
    }

    #[test]
    fn date_drives_menu() {
        // 2026-10-20 is a Tuesday, 2026-10-22 a Thursday, 2026-10-21 a Wednesday.
        let tue = NaiveDate::from_ymd_opt(2026, 10, 20).unwrap();
        let thu = NaiveDate::from_ymd_opt(2026, 10, 22).unwrap();
        let wed = NaiveDate::from_ymd_opt(2026, 10, 21).unwrap();

        assert_eq!(Menu::for_date(tue), Menu::Egg);
        assert_eq!(Menu::for_date(thu), Menu::Meal);
        assert_eq!(Menu::for_date(wed), Menu::NoMenu);
        assert!(!Menu::for_date(wed).is_actionable());
        assert!(Menu::for_date(tue).allows(MealChoice::SkipEgg));
        assert!(!Menu::for_date(tue).allows(MealChoice::Veg));
    }

    #[test]
    fn menu_view_serializes_choices() {
        let sun = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let json = serde_json::to_value(MenuView::for_date(sun)).unwrap();
        assert_eq!(json["day"], 0);
        assert_eq!(json["menu"], "MEAL");
        assert_eq!(json["choices"], serde_json::json!(["VEG", "NON_VEG", "SKIP_MEAL"]));
    }
}
