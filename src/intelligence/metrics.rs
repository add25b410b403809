// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Body metrics calculation: BMI, BMR, TDEE and calorie targets

use serde::{Deserialize, Serialize};

use crate::constants::{defaults, limits};
use crate::models::{ActivityLevel, Gender, HealthGoal, Profile};
use super::nutrition::progress_percent;

/// BMI classification bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BmiCategory {
    /// BMI < 18.5
    Underweight,
    /// 18.5 <= BMI < 25
    Normal,
    /// 25 <= BMI < 30
    Overweight,
    /// BMI >= 30
    Obese,
}

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < limits::BMI_UNDERWEIGHT_MAX {
            BmiCategory::Underweight
        } else if bmi < limits::BMI_NORMAL_MAX {
            BmiCategory::Normal
        } else if bmi < limits::BMI_OVERWEIGHT_MAX {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BmiResult {
    pub bmi: f64,
    pub category: BmiCategory,
}

impl BmiResult {
    /// BMI rounded to one decimal for display
    pub fn rounded(&self) -> f64 {
        (self.bmi * 10.0).round() / 10.0
    }
}

/// bmi = weight / (height/100)^2
///
/// Callers guarantee both inputs are present and positive.
pub fn compute_bmi(weight_kg: f64, height_cm: f64) -> BmiResult {
    let height_m = height_cm / 100.0;
    let bmi = weight_kg / (height_m * height_m);
    BmiResult {
        bmi,
        category: BmiCategory::from_bmi(bmi),
    }
}

/// Basal metabolic rate, Mifflin-St Jeor
pub fn compute_bmr(weight_kg: f64, height_cm: f64, age: u32, gender: Gender) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age);
    match gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    }
}

/// Total daily energy expenditure
pub fn compute_tdee(bmr: f64, activity_level: ActivityLevel) -> f64 {
    bmr * activity_level.multiplier()
}

/// Snapshot of everything the daily calorie target depends on
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CalorieTargetInputs {
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    /// Defaults to moderately active (1.55)
    pub activity_level: Option<ActivityLevel>,
    /// Defaults to maintain
    pub health_goal: Option<HealthGoal>,
}

impl CalorieTargetInputs {
    pub fn from_profile(profile: &Profile) -> Self {
        let info = &profile.personal_info;
        Self {
            weight_kg: info.weight,
            height_cm: info.height.map(f64::from),
            age: info.age,
            gender: info.gender,
            activity_level: profile.goals.activity_level,
            health_goal: profile.goals.health_goal,
        }
    }
}

/// round(TDEE -500 / +500 / +0 by goal)
///
/// Falls back to the default 2000 kcal whenever a body measurement, age or
/// gender is missing; zero values count as missing.
pub fn compute_daily_calorie_target(inputs: &CalorieTargetInputs) -> u32 {
    let weight = inputs.weight_kg.filter(|w| *w > 0.0);
    let height = inputs.height_cm.filter(|h| *h > 0.0);
    let age = inputs.age.filter(|a| *a > 0);

    let (Some(weight), Some(height), Some(age), Some(gender)) = (weight, height, age, inputs.gender)
    else {
        return defaults::CALORIE_GOAL;
    };

    let bmr = compute_bmr(weight, height, age, gender);
    let tdee = compute_tdee(bmr, inputs.activity_level.unwrap_or_default());

    let adjusted = match inputs.health_goal.unwrap_or_default() {
        HealthGoal::Lose => tdee - limits::GOAL_CALORIE_ADJUSTMENT,
        HealthGoal::Gain => tdee + limits::GOAL_CALORIE_ADJUSTMENT,
        HealthGoal::Maintain => tdee,
    };

    adjusted.round().max(0.0) as u32
}

/// Projected weight after `weeks` at `weekly_goal` kg/week
pub fn compute_target_weight(current_weight: f64, health_goal: HealthGoal, weekly_goal: f64, weeks: u32) -> f64 {
    let change = weekly_goal * f64::from(weeks);
    match health_goal {
        HealthGoal::Lose => current_weight - change,
        HealthGoal::Gain => current_weight + change,
        HealthGoal::Maintain => current_weight,
    }
}

/// How far current weight sits relative to the projected target, capped at 100
pub fn weight_progress_percent(current_weight: f64, target_weight: f64) -> f64 {
    progress_percent(current_weight, target_weight)
}

impl Profile {
    /// BMI when both weight and height are known and positive
    pub fn bmi(&self) -> Option<BmiResult> {
        let weight = self.personal_info.weight.filter(|w| *w > 0.0)?;
        let height = self.personal_info.height.filter(|h| *h > 0)?;
        Some(compute_bmi(weight, f64::from(height)))
    }

    pub fn daily_calorie_target(&self) -> u32 {
        compute_daily_calorie_target(&CalorieTargetInputs::from_profile(self))
    }

    /// Four week projection; a missing weekly goal means no change
    pub fn target_weight(&self) -> Option<f64> {
        let weight = self.personal_info.weight.filter(|w| *w > 0.0)?;
        Some(compute_target_weight(
            weight,
            self.goals.health_goal.unwrap_or_default(),
            self.goals.weekly_goal.unwrap_or(0.0),
            limits::TARGET_WEIGHT_WEEKS,
        ))
    }

    pub fn weight_progress(&self) -> Option<f64> {
        let target = self.target_weight()?;
        let current = self.personal_info.weight?;
        Some(weight_progress_percent(current, target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PersonalInfo;

    fn reference_inputs() -> CalorieTargetInputs {
        CalorieTargetInputs {
            weight_kg: Some(70.0),
            height_cm: Some(175.0),
            age: Some(30),
            gender: Some(Gender::Male),
            activity_level: Some(ActivityLevel::ModeratelyActive),
            health_goal: Some(HealthGoal::Maintain),
        }
    }

    #[test]
    fn test_bmi_formula() {
        let result = compute_bmi(70.0, 175.0);
        assert!((result.bmi - 70.0 / (1.75 * 1.75)).abs() < 1e-12);
        assert_eq!(result.category, BmiCategory::Normal);
        assert_eq!(result.rounded(), 22.9);
    }

    #[test]
    fn test_bmi_category_boundaries() {
        assert_eq!(BmiCategory::from_bmi(18.49), BmiCategory::Underweight);
        assert_eq!(BmiCategory::from_bmi(18.5), BmiCategory::Normal);
        assert_eq!(BmiCategory::from_bmi(24.99), BmiCategory::Normal);
        assert_eq!(BmiCategory::from_bmi(25.0), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(29.99), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(30.0), BmiCategory::Obese);
    }

    #[test]
    fn test_bmr_by_gender() {
        assert_eq!(compute_bmr(70.0, 175.0, 30, Gender::Male), 1648.75);
        assert_eq!(compute_bmr(70.0, 175.0, 30, Gender::Female), 1482.75);
    }

    #[test]
    fn test_daily_calorie_target_reference_value() {
        // 1648.75 * 1.55 = 2555.5625
        assert_eq!(compute_daily_calorie_target(&reference_inputs()), 2556);
    }

    #[test]
    fn test_daily_calorie_target_goal_adjustments() {
        let lose = CalorieTargetInputs {
            health_goal: Some(HealthGoal::Lose),
            ..reference_inputs()
        };
        let gain = CalorieTargetInputs {
            health_goal: Some(HealthGoal::Gain),
            ..reference_inputs()
        };
        assert_eq!(compute_daily_calorie_target(&lose), 2056);
        assert_eq!(compute_daily_calorie_target(&gain), 3056);
    }

    #[test]
    fn test_daily_calorie_target_defaults() {
        assert_eq!(compute_daily_calorie_target(&CalorieTargetInputs::default()), 2000);

        let missing_gender = CalorieTargetInputs {
            gender: None,
            ..reference_inputs()
        };
        assert_eq!(compute_daily_calorie_target(&missing_gender), 2000);

        // activity level and goal fall back to 1.55 / maintain
        let minimal = CalorieTargetInputs {
            activity_level: None,
            health_goal: None,
            ..reference_inputs()
        };
        assert_eq!(compute_daily_calorie_target(&minimal), 2556);
    }

    #[test]
    fn test_target_weight() {
        assert_eq!(compute_target_weight(80.0, HealthGoal::Lose, 0.5, 4), 78.0);
        assert_eq!(compute_target_weight(60.0, HealthGoal::Gain, 0.25, 4), 61.0);
        assert_eq!(compute_target_weight(70.0, HealthGoal::Maintain, 1.0, 4), 70.0);
    }

    #[test]
    fn test_weight_progress() {
        assert_eq!(weight_progress_percent(80.0, 78.0), 100.0);
        assert_eq!(weight_progress_percent(60.0, 61.0), 60.0 / 61.0 * 100.0);
        assert_eq!(weight_progress_percent(70.0, 0.0), 0.0);
    }

    #[test]
    fn test_profile_helpers_guard_missing_measurements() {
        let mut profile = Profile::default();
        assert!(profile.bmi().is_none());
        assert!(profile.target_weight().is_none());
        assert_eq!(profile.daily_calorie_target(), 2000);

        profile.personal_info = PersonalInfo {
            weight: Some(90.0),
            height: Some(180),
            ..PersonalInfo::default()
        };
        let bmi = profile.bmi().unwrap();
        assert_eq!(bmi.category, BmiCategory::Overweight);
        assert_eq!(profile.target_weight(), Some(90.0));
        assert_eq!(profile.weight_progress(), Some(100.0));
    }
}
