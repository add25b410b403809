// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::sync::Arc;

use rand::rngs::StdRng;
use tokio::sync::{Mutex, RwLock};
use tracing::info;

use super::{Outcome, RequestSequencer, Served};
use crate::constants::messages;
use crate::demo::DemoGenerator;
use crate::errors::DietResult;
use crate::logging::AppLogger;
use crate::models::{MealPlan, MealPlanRequest};
use crate::providers::RecipeProvider;
use crate::storage::{load_typed, save_typed, StateStore, StorageSlot};
use crate::validation::validate_meal_plan_request;

/// Generates daily meal plans and remembers the last form input
pub struct MealPlanner {
    store: Arc<dyn StateStore>,
    provider: Arc<dyn RecipeProvider>,
    fallback: Mutex<DemoGenerator<StdRng>>,
    sequencer: RequestSequencer,
    current_plan: RwLock<Option<MealPlan>>,
}

impl MealPlanner {
    pub fn new(store: Arc<dyn StateStore>, provider: Arc<dyn RecipeProvider>) -> Self {
        Self {
            store,
            provider,
            fallback: Mutex::new(DemoGenerator::from_entropy()),
            sequencer: RequestSequencer::new(),
            current_plan: RwLock::new(None),
        }
    }

    /// Use a specific generator for fallback plans
    pub fn with_demo_generator(mut self, generator: DemoGenerator<StdRng>) -> Self {
        self.fallback = Mutex::new(generator);
        self
    }

    /// Saved form values, or defaults when nothing usable is stored
    pub async fn load_preferences(&self) -> DietResult<MealPlanRequest> {
        let saved = load_typed(self.store.as_ref(), StorageSlot::MealPlanPreferences).await?;
        Ok(saved.unwrap_or_default())
    }

    /// Validate, fetch a plan (falling back to demo data) and save the input
    ///
    /// Invalid input is rejected before any request or write. Preferences
    /// are saved after both live and fallback generation, but not when the
    /// response was superseded.
    pub async fn generate(&self, request: MealPlanRequest) -> DietResult<Outcome<Served<MealPlan>>> {
        if let Err(e) = validate_meal_plan_request(&request) {
            AppLogger::log_validation_failure("meal_plan", &e.to_string());
            return Err(e.into());
        }

        let token = self.sequencer.next();
        let served = match self.provider.generate_meal_plan(&request).await {
            Ok(plan) => Served::live(plan),
            Err(e) => {
                AppLogger::log_fallback("generate_meal_plan", &e.to_string());
                let plan = self.fallback.lock().await.generate_meal_plan(&request);
                Served::demo(plan, messages::MEAL_PLAN_FALLBACK)
            }
        };

        if !self.sequencer.is_current(token) {
            AppLogger::log_stale_response("generate_meal_plan", token.value(), self.sequencer.latest());
            return Ok(Outcome::Superseded);
        }

        save_typed(self.store.as_ref(), StorageSlot::MealPlanPreferences, &request).await?;
        *self.current_plan.write().await = Some(served.data.clone());

        info!(
            target_calories = request.target_calories,
            diet = %request.diet.as_ref().map(|d| d.to_string()).unwrap_or_default(),
            source = ?served.source,
            "Meal plan generated"
        );

        Ok(Outcome::Fresh(served))
    }

    /// Most recent plan shown to the user
    pub async fn current_plan(&self) -> Option<MealPlan> {
        self.current_plan.read().await.clone()
    }
}
