// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Form input validation
//!
//! A failed check aborts the submission before any state is touched.

use crate::constants::limits;
use crate::models::{ActivityLevel, MealEntry, MealPlanRequest, PersonalInfo, ProfileGoals};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter a valid calorie target between 800-5000 kcal. (got {value})")]
    InvalidCalorieTarget { value: u32 },

    #[error("Please select a diet type.")]
    MissingDiet,

    #[error("Please enter a food name.")]
    EmptyFoodName,

    #[error("{field} must be a non-negative number (got {value})")]
    InvalidMacro { field: &'static str, value: f64 },

    #[error("{field} must be greater than zero (got {value})")]
    NonPositiveMeasurement { field: &'static str, value: f64 },

    #[error("Weekly goal must be a non-negative number of kg (got {value})")]
    InvalidWeeklyGoal { value: f64 },

    #[error("Unknown activity level multiplier: {value}")]
    UnknownActivityLevel { value: f64 },

    #[error("Page {page} is out of range (1-{total_pages})")]
    PageOutOfRange { page: u32, total_pages: u32 },
}

pub fn validate_meal_plan_request(request: &MealPlanRequest) -> Result<(), ValidationError> {
    let calories = request.target_calories;
    if !(limits::MIN_TARGET_CALORIES..=limits::MAX_TARGET_CALORIES).contains(&calories) {
        return Err(ValidationError::InvalidCalorieTarget { value: calories });
    }

    if request.diet.is_none() {
        return Err(ValidationError::MissingDiet);
    }

    Ok(())
}

pub fn validate_meal_entry(entry: &MealEntry) -> Result<(), ValidationError> {
    if entry.name.trim().is_empty() {
        return Err(ValidationError::EmptyFoodName);
    }

    for (field, value) in [("protein", entry.protein), ("carbs", entry.carbs), ("fat", entry.fat)] {
        if !value.is_finite() || value < 0.0 {
            return Err(ValidationError::InvalidMacro { field, value });
        }
    }

    Ok(())
}

pub fn validate_personal_info(info: &PersonalInfo) -> Result<(), ValidationError> {
    if let Some(weight) = info.weight {
        if !weight.is_finite() || weight <= 0.0 {
            return Err(ValidationError::NonPositiveMeasurement { field: "weight", value: weight });
        }
    }

    if let Some(height) = info.height {
        if height == 0 {
            return Err(ValidationError::NonPositiveMeasurement { field: "height", value: 0.0 });
        }
    }

    if let Some(0) = info.age {
        return Err(ValidationError::NonPositiveMeasurement { field: "age", value: 0.0 });
    }

    Ok(())
}

pub fn validate_profile_goals(goals: &ProfileGoals) -> Result<(), ValidationError> {
    if let Some(weekly) = goals.weekly_goal {
        if !weekly.is_finite() || weekly < 0.0 {
            return Err(ValidationError::InvalidWeeklyGoal { value: weekly });
        }
    }

    Ok(())
}

/// Map a raw multiplier from a form onto the closed activity level set
pub fn parse_activity_level(value: f64) -> Result<ActivityLevel, ValidationError> {
    ActivityLevel::from_multiplier(value).ok_or(ValidationError::UnknownActivityLevel { value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Diet, MealType, TimeFrame};

    fn request(target_calories: u32, diet: Option<Diet>) -> MealPlanRequest {
        MealPlanRequest {
            target_calories,
            diet,
            exclude: String::new(),
            time_frame: TimeFrame::Day,
        }
    }

    fn entry(name: &str, protein: f64) -> MealEntry {
        MealEntry {
            meal_type: MealType::Lunch,
            name: name.to_string(),
            calories: 450,
            protein,
            carbs: 40.0,
            fat: 12.0,
        }
    }

    #[test]
    fn test_calorie_target_bounds_are_inclusive() {
        assert!(validate_meal_plan_request(&request(800, Some(Diet::Any))).is_ok());
        assert!(validate_meal_plan_request(&request(5000, Some(Diet::Vegan))).is_ok());
        assert_eq!(
            validate_meal_plan_request(&request(799, Some(Diet::Any))),
            Err(ValidationError::InvalidCalorieTarget { value: 799 })
        );
        assert_eq!(
            validate_meal_plan_request(&request(5001, Some(Diet::Any))),
            Err(ValidationError::InvalidCalorieTarget { value: 5001 })
        );
    }

    #[test]
    fn test_missing_diet_is_rejected() {
        let err = validate_meal_plan_request(&request(2000, None)).unwrap_err();
        assert_eq!(err, ValidationError::MissingDiet);
        assert_eq!(err.to_string(), "Please select a diet type.");
    }

    #[test]
    fn test_blank_diet_selection_means_no_restriction() {
        let request: MealPlanRequest =
            serde_json::from_str(r#"{"targetCalories": 2000, "diet": ""}"#).unwrap();
        assert_eq!(request.diet, Some(Diet::Any));
        assert!(validate_meal_plan_request(&request).is_ok());

        let request: MealPlanRequest = serde_json::from_str(r#"{"targetCalories": 2000}"#).unwrap();
        assert_eq!(validate_meal_plan_request(&request), Err(ValidationError::MissingDiet));
    }

    #[test]
    fn test_meal_entry_checks() {
        assert!(validate_meal_entry(&entry("Chicken wrap", 30.0)).is_ok());
        assert_eq!(validate_meal_entry(&entry("  ", 30.0)), Err(ValidationError::EmptyFoodName));
        assert!(matches!(
            validate_meal_entry(&entry("Wrap", -1.0)),
            Err(ValidationError::InvalidMacro { field: "protein", .. })
        ));
        assert!(validate_meal_entry(&entry("Wrap", f64::NAN)).is_err());
    }

    #[test]
    fn test_personal_info_measurements() {
        let mut info = PersonalInfo {
            weight: Some(70.0),
            height: Some(175),
            age: Some(30),
            ..PersonalInfo::default()
        };
        assert!(validate_personal_info(&info).is_ok());

        info.weight = Some(0.0);
        assert!(matches!(
            validate_personal_info(&info),
            Err(ValidationError::NonPositiveMeasurement { field: "weight", .. })
        ));

        info.weight = None;
        info.height = Some(0);
        assert!(validate_personal_info(&info).is_err());

        assert!(validate_personal_info(&PersonalInfo::default()).is_ok());
    }

    #[test]
    fn test_activity_level_parsing() {
        assert_eq!(parse_activity_level(1.2), Ok(ActivityLevel::Sedentary));
        assert_eq!(
            parse_activity_level(3.0),
            Err(ValidationError::UnknownActivityLevel { value: 3.0 })
        );
    }

    #[test]
    fn test_negative_weekly_goal_rejected() {
        let goals = ProfileGoals {
            weekly_goal: Some(-0.5),
            ..ProfileGoals::default()
        };
        assert!(validate_profile_goals(&goals).is_err());
    }
}
