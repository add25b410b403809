// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use anyhow::Result;
use async_trait::async_trait;

use crate::config::RecipeApiConfig;
use crate::models::{MealPlan, MealPlanRequest, RecipeDetails, RecipeSearchFilters, RecipeSearchPage};

pub mod demo;
pub mod spoonacular;

pub use demo::DemoRecipeProvider;
pub use spoonacular::SpoonacularProvider;

/// Recipe API failures
///
/// Everything except [`RecipeApiError::NotFound`] means the service could
/// not answer, and callers fall back to demo data.
#[derive(Debug, thiserror::Error)]
pub enum RecipeApiError {
    #[error("Recipe API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Recipe API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected recipe API response: {0}")]
    MalformedResponse(String),

    #[error("Recipe {id} not found")]
    NotFound { id: u64 },
}

impl RecipeApiError {
    pub fn is_service_unavailable(&self) -> bool {
        !matches!(self, RecipeApiError::NotFound { .. })
    }
}

#[async_trait]
pub trait RecipeProvider: Send + Sync {
    /// One day plan with breakfast, lunch and dinner
    async fn generate_meal_plan(&self, request: &MealPlanRequest) -> Result<MealPlan, RecipeApiError>;

    /// One page of search results; `page` is 1-based
    async fn search_recipes(
        &self,
        filters: &RecipeSearchFilters,
        page: u32,
    ) -> Result<RecipeSearchPage, RecipeApiError>;

    async fn get_recipe_information(&self, id: u64) -> Result<RecipeDetails, RecipeApiError>;

    fn provider_name(&self) -> &'static str;
}

pub fn create_provider(provider_type: &str, config: &RecipeApiConfig) -> Result<Box<dyn RecipeProvider>> {
    match provider_type.to_lowercase().as_str() {
        "spoonacular" => Ok(Box::new(SpoonacularProvider::from_config(config)?)),
        "demo" => Ok(Box::new(DemoRecipeProvider::new())),
        _ => Err(anyhow::anyhow!(
            "Unknown recipe provider: {}. Currently supported: spoonacular, demo",
            provider_type
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: Option<&str>) -> RecipeApiConfig {
        RecipeApiConfig {
            provider: "spoonacular".into(),
            base_url: "http://localhost:9".into(),
            api_key: api_key.map(str::to_string),
            timeout_seconds: 5,
        }
    }

    #[test]
    fn test_create_provider() {
        let live = create_provider("Spoonacular", &config(Some("key"))).unwrap();
        assert_eq!(live.provider_name(), "spoonacular");

        let demo = create_provider("demo", &config(None)).unwrap();
        assert_eq!(demo.provider_name(), "demo");

        assert!(create_provider("spoonacular", &config(None)).is_err());
        assert!(create_provider("edamam", &config(Some("key"))).is_err());
    }

    #[test]
    fn test_service_unavailable_classification() {
        let status = RecipeApiError::Status {
            status: 402,
            body: "quota".into(),
        };
        assert!(status.is_service_unavailable());
        assert!(RecipeApiError::MalformedResponse("x".into()).is_service_unavailable());
        assert!(!RecipeApiError::NotFound { id: 1 }.is_service_unavailable());
    }
}
