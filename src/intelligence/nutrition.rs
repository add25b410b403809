// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Nutrition totals and progress against daily goals

use serde::{Deserialize, Serialize};

use crate::models::{
    LoggedMeal, MealNutrition, MealPlanNutrients, NutritionGoals, NutritionTotals, PlannedMeal,
};

/// Anything that contributes calories and macros to a total
pub trait MacroSource {
    fn macros(&self) -> MealNutrition;
}

impl MacroSource for LoggedMeal {
    fn macros(&self) -> MealNutrition {
        MealNutrition {
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
        }
    }
}

impl MacroSource for PlannedMeal {
    fn macros(&self) -> MealNutrition {
        self.nutrition
    }
}

/// Field-wise sum; order of `items` does not matter
pub fn accumulate_totals<'a, T, I>(items: I) -> NutritionTotals
where
    T: MacroSource + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items
        .into_iter()
        .map(MacroSource::macros)
        .fold(NutritionTotals::default(), |total, m| NutritionTotals {
            calories: total.calories.saturating_add(m.calories),
            protein: total.protein + m.protein,
            carbs: total.carbs + m.carbs,
            fat: total.fat + m.fat,
        })
}

impl From<NutritionTotals> for MealPlanNutrients {
    fn from(totals: NutritionTotals) -> Self {
        Self {
            calories: f64::from(totals.calories),
            protein: totals.protein,
            carbohydrates: totals.carbs,
            fat: totals.fat,
        }
    }
}

/// min(current / goal * 100, 100), floored at 0
///
/// A non-positive goal has no meaningful percentage and reports 0.
pub fn progress_percent(current: f64, goal: f64) -> f64 {
    if goal <= 0.0 || !goal.is_finite() || !current.is_finite() {
        return 0.0;
    }
    (current / goal * 100.0).clamp(0.0, 100.0)
}

/// Per-macro progress toward the daily goals, in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroProgress {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

pub fn macro_progress(totals: &NutritionTotals, goals: &NutritionGoals) -> MacroProgress {
    MacroProgress {
        calories: progress_percent(f64::from(totals.calories), f64::from(goals.calories)),
        protein: progress_percent(totals.protein, f64::from(goals.protein)),
        carbs: progress_percent(totals.carbs, f64::from(goals.carbs)),
        fat: progress_percent(totals.fat, f64::from(goals.fat)),
    }
}
