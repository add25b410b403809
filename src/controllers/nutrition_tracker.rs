// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::errors::{DietError, DietResult};
use crate::intelligence::{accumulate_totals, macro_progress, MacroProgress};
use crate::logging::AppLogger;
use crate::models::{LoggedMeal, MealEntry, NutritionGoals, NutritionLog, NutritionTotals, Profile};
use crate::storage::{load_typed, save_typed, StateStore, StorageSlot};
use crate::validation::validate_meal_entry;

/// Today's meal log, totals and macro goals
///
/// Totals are always recomputed from the meal list, so adding and removing
/// meals cannot drift.
pub struct NutritionTracker {
    store: Arc<dyn StateStore>,
    state: Mutex<NutritionLog>,
}

impl NutritionTracker {
    /// Restore the persisted log, or start empty with default goals
    pub async fn load(store: Arc<dyn StateStore>) -> DietResult<Self> {
        let mut log: NutritionLog = load_typed(store.as_ref(), StorageSlot::Nutrition)
            .await?
            .unwrap_or_default();

        let recomputed = accumulate_totals(&log.todays_meals);
        if recomputed != log.daily_nutrition {
            warn!(
                stored_calories = log.daily_nutrition.calories,
                recomputed_calories = recomputed.calories,
                "Stored daily totals disagree with meal list, recomputing"
            );
            log.daily_nutrition = recomputed;
        }

        Ok(Self {
            store,
            state: Mutex::new(log),
        })
    }

    /// Append a meal, persist, and stamp the `lastMealLogged` marker
    pub async fn log_meal(&self, entry: MealEntry, now: DateTime<Utc>) -> DietResult<LoggedMeal> {
        if let Err(e) = validate_meal_entry(&entry) {
            AppLogger::log_validation_failure("meal_log", &e.to_string());
            return Err(e.into());
        }

        let mut state = self.state.lock().await;
        let mut next = state.clone();

        let meal = LoggedMeal {
            id: next_meal_id(&next.todays_meals, now),
            meal_type: entry.meal_type,
            name: entry.name.trim().to_string(),
            calories: entry.calories,
            protein: entry.protein,
            carbs: entry.carbs,
            fat: entry.fat,
            timestamp: now,
        };
        next.todays_meals.push(meal.clone());
        next.daily_nutrition = accumulate_totals(&next.todays_meals);

        save_typed(self.store.as_ref(), StorageSlot::Nutrition, &next).await?;
        *state = next;

        // the meal is committed; a missing marker only shortens the streak
        if let Err(e) = save_typed(self.store.as_ref(), StorageSlot::LastMealLogged, &now).await {
            warn!(error = %e, "Failed to update last meal marker");
        }

        info!(meal.id = meal.id, meal.calories = meal.calories, "Meal logged");
        Ok(meal)
    }

    /// Remove a meal by id and persist
    pub async fn remove_meal(&self, id: i64) -> DietResult<LoggedMeal> {
        let mut state = self.state.lock().await;
        let index = state
            .todays_meals
            .iter()
            .position(|m| m.id == id)
            .ok_or(DietError::MealNotFound { id })?;

        let mut next = state.clone();
        let removed = next.todays_meals.remove(index);
        next.daily_nutrition = accumulate_totals(&next.todays_meals);

        save_typed(self.store.as_ref(), StorageSlot::Nutrition, &next).await?;
        *state = next;
        Ok(removed)
    }

    pub async fn update_goals(&self, goals: NutritionGoals) -> DietResult<NutritionGoals> {
        let mut state = self.state.lock().await;
        let mut next = state.clone();
        next.goals = goals;

        save_typed(self.store.as_ref(), StorageSlot::Nutrition, &next).await?;
        *state = next;
        Ok(goals)
    }

    /// Set the calorie goal to the profile's computed daily target
    pub async fn sync_calorie_goal_from_profile(&self, profile: &Profile) -> DietResult<NutritionGoals> {
        let goals = NutritionGoals {
            calories: profile.daily_calorie_target(),
            ..self.goals().await
        };
        self.update_goals(goals).await
    }

    /// Start a new day: clear meals and totals, keep goals and weekly data
    pub async fn reset_day(&self) -> DietResult<()> {
        let mut state = self.state.lock().await;
        let mut next = state.clone();
        next.todays_meals.clear();
        next.daily_nutrition = NutritionTotals::default();

        save_typed(self.store.as_ref(), StorageSlot::Nutrition, &next).await?;
        *state = next;
        Ok(())
    }

    pub async fn progress(&self) -> MacroProgress {
        let state = self.state.lock().await;
        macro_progress(&state.daily_nutrition, &state.goals)
    }

    pub async fn meals(&self) -> Vec<LoggedMeal> {
        self.state.lock().await.todays_meals.clone()
    }

    pub async fn totals(&self) -> NutritionTotals {
        self.state.lock().await.daily_nutrition
    }

    pub async fn goals(&self) -> NutritionGoals {
        self.state.lock().await.goals
    }

    pub async fn snapshot(&self) -> NutritionLog {
        self.state.lock().await.clone()
    }
}

/// Millisecond timestamp ids, bumped past any existing id
fn next_meal_id(meals: &[LoggedMeal], now: DateTime<Utc>) -> i64 {
    let after_last = meals.iter().map(|m| m.id).max().map_or(i64::MIN, |max| max.saturating_add(1));
    now.timestamp_millis().max(after_last)
}
