// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Diet Tracker
//!
//! Personal diet and nutrition tracking: a user profile with body metrics,
//! a daily meal log with macro goals, generated meal plans and a paged
//! recipe search backed by a third-party recipe API.
//!
//! ## Features
//!
//! - **Body metrics**: BMI, Mifflin-St Jeor BMR, TDEE and a daily calorie target
//! - **Nutrition log**: meals, running totals and progress against macro goals
//! - **Meal plans**: diet-aware plans from the recipe API, with a local demo fallback
//! - **Recipe search**: filtered, paged search with recipe details
//! - **Persistence**: named JSON slots in SQLite, or in memory for throwaway runs
//!
//! ## Architecture
//!
//! - **Controllers**: meal planner, nutrition tracker, recipe browser, profile manager
//! - **Intelligence**: pure derived-metric functions
//! - **Providers**: recipe API clients behind a common trait
//! - **Demo**: seedable generator used when the recipe API is unavailable
//! - **Storage**: the persistence adapter
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use diet_tracker::config::Config;
//! use diet_tracker::controllers::MealPlanner;
//! use diet_tracker::models::{Diet, MealPlanRequest};
//! use diet_tracker::providers::create_provider;
//! use diet_tracker::storage::SqliteStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load(None)?;
//!     let store = Arc::new(SqliteStore::new(&config.storage.database_url).await?);
//!     let provider = create_provider(&config.recipe_api.provider, &config.recipe_api)?;
//!
//!     let planner = MealPlanner::new(store, Arc::from(provider));
//!     let request = MealPlanRequest {
//!         target_calories: 2000,
//!         diet: Some(Diet::Vegetarian),
//!         ..MealPlanRequest::default()
//!     };
//!
//!     if let Some(served) = planner.generate(request).await?.into_fresh() {
//!         for meal in &served.data.meals {
//!             println!("{}: {}", meal.meal_type.display_name(), meal.title);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

/// Configuration management and persistence
pub mod config;

/// Application constants and configuration values
pub mod constants;

/// Feature controllers tying storage, providers and metrics together
pub mod controllers;

/// Offline meal plan and recipe generator
pub mod demo;

/// Crate-level error types
pub mod errors;

/// Derived body and nutrition metrics
pub mod intelligence;

/// Production logging and structured output
pub mod logging;

/// Common data models
pub mod models;

/// Recipe API provider implementations
pub mod providers;

/// Persistence adapter
pub mod storage;

/// Form input validation
pub mod validation;
