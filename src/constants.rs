// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Constants Module
//!
//! Application constants and environment-based configuration values.
//! This module provides both hardcoded constants and environment variable configuration.

use std::env;

/// Environment-based configuration
pub mod env_config {
    use super::env;

    /// Get recipe API key from environment
    pub fn recipe_api_key() -> Option<String> {
        env::var("RECIPE_API_KEY").ok().filter(|key| !key.trim().is_empty())
    }

    /// Get recipe API base URL from environment or default
    pub fn recipe_api_base() -> String {
        env::var("RECIPE_API_BASE")
            .unwrap_or_else(|_| super::endpoints::SPOONACULAR_API_BASE.to_string())
    }

    /// Get recipe provider name from environment or default
    pub fn recipe_api_provider() -> String {
        env::var("RECIPE_API_PROVIDER").unwrap_or_else(|_| "spoonacular".to_string())
    }

    /// Get recipe API request timeout from environment or default
    pub fn recipe_api_timeout_secs() -> u64 {
        env::var("RECIPE_API_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .unwrap_or(10)
    }

    /// Get database URL from environment or default
    pub fn database_url() -> String {
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:./data/diet-tracker.db".to_string())
    }

    /// Get log level from environment or default
    pub fn log_level() -> String {
        env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string())
    }
}

/// API endpoints and URLs
pub mod endpoints {
    pub const SPOONACULAR_API_BASE: &str = "https://api.spoonacular.com";
    pub const MEAL_PLAN_GENERATE: &str = "mealplanner/generate";
    pub const RECIPE_COMPLEX_SEARCH: &str = "recipes/complexSearch";
    pub const RECIPE_IMAGE_BASE: &str = "https://spoonacular.com/recipeImages";
}

/// Storage slot keys
pub mod storage_keys {
    pub const PROFILE: &str = "userProfile_data";
    pub const NUTRITION: &str = "nutritionTracker_data";
    pub const MEAL_PLAN_PREFERENCES: &str = "mealPlanner_preferences";
    pub const THEME: &str = "theme";
    pub const LAST_MEAL_LOGGED: &str = "lastMealLogged";
}

/// Numeric limits and thresholds
pub mod limits {
    /// Accepted meal plan calorie target range (inclusive)
    pub const MIN_TARGET_CALORIES: u32 = 800;
    pub const MAX_TARGET_CALORIES: u32 = 5000;

    /// Recipe search page size
    pub const RECIPES_PER_PAGE: u32 = 12;
    /// Pages shown on each side of the current page
    pub const PAGINATION_WINDOW_RADIUS: u32 = 2;

    /// Calorie adjustment applied for lose/gain goals
    pub const GOAL_CALORIE_ADJUSTMENT: f64 = 500.0;
    /// Horizon used for the target weight projection
    pub const TARGET_WEIGHT_WEEKS: u32 = 4;

    /// Streak values are capped at this many days
    pub const MAX_STREAK_DAYS: u32 = 30;

    /// Shopping list entries produced by the demo generator
    pub const DEMO_SHOPPING_LIST_LEN: usize = 8;
    pub const DEMO_SHOPPING_MAX_AMOUNT: u32 = 3;

    pub const BMI_UNDERWEIGHT_MAX: f64 = 18.5;
    pub const BMI_NORMAL_MAX: f64 = 25.0;
    pub const BMI_OVERWEIGHT_MAX: f64 = 30.0;
}

/// User and application defaults
pub mod defaults {
    /// Daily calorie target used when the profile is incomplete
    pub const CALORIE_GOAL: u32 = 2000;
    pub const PROTEIN_GOAL: u32 = 150;
    pub const CARBS_GOAL: u32 = 250;
    pub const FAT_GOAL: u32 = 65;

    /// Query used for the featured recipe list
    pub const FEATURED_QUERY: &str = "healthy";

    pub const EXPORT_FILE_PREFIX: &str = "diet-app-data-";

    pub const CONFIG_DIR_NAME: &str = "diet-tracker";
    pub const CONFIG_FILE_NAME: &str = "config.toml";
}

/// User-facing messages
pub mod messages {
    pub const MEAL_PLAN_FALLBACK: &str = "API temporarily unavailable. Showing demo meal plan.";
    pub const RECIPE_SEARCH_FALLBACK: &str = "API temporarily unavailable. Showing demo recipes.";
    pub const RECIPE_DETAILS_FAILED: &str = "Failed to load recipe details";
    pub const GOALS_UPDATED: &str = "Goals updated successfully!";
    pub const PROFILE_UPDATED: &str = "Profile updated successfully!";
    pub const DATA_EXPORTED: &str = "Data exported successfully!";
    pub const DATA_CLEARED: &str = "All data cleared successfully!";
    pub const NO_MEALS_LOGGED: &str = "No meals logged today";
}
