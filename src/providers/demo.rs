// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use async_trait::async_trait;
use rand::rngs::StdRng;
use tokio::sync::Mutex;

use super::{RecipeApiError, RecipeProvider};
use crate::demo::{demo_recipe_details, demo_recipes, DemoGenerator};
use crate::models::{
    MealPlan, MealPlanRequest, RecipeDetails, RecipeSearchFilters, RecipeSearchPage,
};

/// Offline provider serving generated plans and the built-in recipes
pub struct DemoRecipeProvider {
    generator: Mutex<DemoGenerator<StdRng>>,
}

impl DemoRecipeProvider {
    pub fn new() -> Self {
        Self::with_generator(DemoGenerator::from_entropy())
    }

    pub fn with_generator(generator: DemoGenerator<StdRng>) -> Self {
        Self {
            generator: Mutex::new(generator),
        }
    }
}

impl Default for DemoRecipeProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecipeProvider for DemoRecipeProvider {
    async fn generate_meal_plan(&self, request: &MealPlanRequest) -> Result<MealPlan, RecipeApiError> {
        Ok(self.generator.lock().await.generate_meal_plan(request))
    }

    async fn search_recipes(
        &self,
        filters: &RecipeSearchFilters,
        page: u32,
    ) -> Result<RecipeSearchPage, RecipeApiError> {
        let matching = demo_recipes(filters);
        let total_results = matching.len() as u32;
        // everything fits on the first page
        let results = if page <= 1 { matching } else { Vec::new() };
        Ok(RecipeSearchPage {
            results,
            total_results,
        })
    }

    async fn get_recipe_information(&self, id: u64) -> Result<RecipeDetails, RecipeApiError> {
        demo_recipe_details(id).ok_or(RecipeApiError::NotFound { id })
    }

    fn provider_name(&self) -> &'static str {
        "demo"
    }
}
