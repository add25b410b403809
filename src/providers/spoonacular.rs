// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{RecipeApiError, RecipeProvider};
use crate::config::RecipeApiConfig;
use crate::constants::{endpoints, limits};
use crate::logging::AppLogger;
use crate::models::{
    MealNutrition, MealPlan, MealPlanNutrients, MealPlanRequest, MealType, PlannedMeal,
    RecipeDetails, RecipeIngredient, RecipeSearchFilters, RecipeSearchPage, RecipeSummary,
    ShoppingItem,
};

const PROVIDER_NAME: &str = "spoonacular";

/// Live client for the Spoonacular recipe API
///
/// Single request per call: no retries, no caching.
pub struct SpoonacularProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SpoonacularProvider {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RecipeApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    pub fn from_config(config: &RecipeApiConfig) -> anyhow::Result<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .context("Recipe API key not configured (set RECIPE_API_KEY)")?;

        let base_url = url::Url::parse(&config.base_url)
            .with_context(|| format!("Invalid recipe API base URL: {}", config.base_url))?;

        Self::new(
            base_url.as_str(),
            api_key,
            Duration::from_secs(config.timeout_seconds),
        )
        .context("Failed to build recipe API client")
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, RecipeApiError> {
        let start = Instant::now();
        let sent = self
            .client
            .get(format!("{}/{}", self.base_url, path))
            .query(query)
            .query(&[("apiKey", self.api_key.as_str())])
            .send()
            .await;

        let response = match sent {
            Ok(response) => response,
            Err(e) => {
                AppLogger::log_api_request(PROVIDER_NAME, path, None, elapsed_ms(start));
                return Err(e.into());
            }
        };

        let status = response.status();
        AppLogger::log_api_request(PROVIDER_NAME, path, Some(status.as_u16()), elapsed_ms(start));

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RecipeApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| RecipeApiError::MalformedResponse(e.to_string()))
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

#[async_trait]
impl RecipeProvider for SpoonacularProvider {
    async fn generate_meal_plan(&self, request: &MealPlanRequest) -> Result<MealPlan, RecipeApiError> {
        let query = vec![
            ("timeFrame", request.time_frame.as_str().to_string()),
            ("targetCalories", request.target_calories.to_string()),
            (
                "diet",
                request
                    .diet
                    .as_ref()
                    .map(|d| d.as_str().to_string())
                    .unwrap_or_default(),
            ),
            ("exclude", request.exclude.clone()),
        ];

        let response: MealPlanResponse = self.get_json(endpoints::MEAL_PLAN_GENERATE, &query).await?;
        response.into_meal_plan()
    }

    async fn search_recipes(
        &self,
        filters: &RecipeSearchFilters,
        page: u32,
    ) -> Result<RecipeSearchPage, RecipeApiError> {
        let page = page.max(1);
        let mut query = vec![
            ("number", limits::RECIPES_PER_PAGE.to_string()),
            ("offset", ((page - 1) * limits::RECIPES_PER_PAGE).to_string()),
        ];

        if !filters.query.trim().is_empty() {
            query.push(("query", filters.query.trim().to_string()));
        }
        if let Some(diet) = filters.diet.as_ref().filter(|d| !d.is_any()) {
            query.push(("diet", diet.as_str().to_string()));
        }
        if !filters.cuisine.trim().is_empty() {
            query.push(("cuisine", filters.cuisine.trim().to_string()));
        }
        if let Some(max_calories) = filters.max_calories {
            query.push(("maxCalories", max_calories.to_string()));
        }
        if let Some(max_time) = filters.max_time {
            query.push(("maxReadyTime", max_time.to_string()));
        }

        let response: SearchResponse = self.get_json(endpoints::RECIPE_COMPLEX_SEARCH, &query).await?;
        Ok(RecipeSearchPage {
            results: response.results.into_iter().map(Into::into).collect(),
            total_results: response.total_results,
        })
    }

    async fn get_recipe_information(&self, id: u64) -> Result<RecipeDetails, RecipeApiError> {
        let path = format!("recipes/{}/information", id);
        let query = [("includeNutrition", "true".to_string())];

        match self.get_json::<RecipeInformation>(&path, &query).await {
            Ok(info) => Ok(info.into()),
            Err(RecipeApiError::Status { status: 404, .. }) => Err(RecipeApiError::NotFound { id }),
            Err(e) => Err(e),
        }
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

// Wire formats

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MealPlanResponse {
    Day(DayPlan),
    Week { week: BTreeMap<String, DayPlan> },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DayPlan {
    meals: Vec<WireMeal>,
    nutrients: WireNutrients,
    #[serde(default)]
    shopping_list: Vec<ShoppingItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireMeal {
    #[serde(default)]
    id: Option<u64>,
    title: String,
    #[serde(default, rename = "type")]
    meal_type: Option<MealType>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    image_type: Option<String>,
    #[serde(default)]
    source_url: Option<String>,
    #[serde(default)]
    nutrition: Option<WireMealNutrition>,
}

/// Calories arrive as fractional numbers; the model keeps whole kcal
#[derive(Debug, Deserialize)]
struct WireMealNutrition {
    calories: f64,
    #[serde(default)]
    protein: f64,
    #[serde(default)]
    carbs: f64,
    #[serde(default)]
    fat: f64,
}

impl From<WireMealNutrition> for MealNutrition {
    fn from(n: WireMealNutrition) -> Self {
        Self {
            calories: n.calories.round().max(0.0) as u32,
            protein: n.protein,
            carbs: n.carbs,
            fat: n.fat,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireNutrients {
    calories: f64,
    protein: f64,
    fat: f64,
    carbohydrates: f64,
}

const PLAN_SLOTS: [MealType; 3] = [MealType::Breakfast, MealType::Lunch, MealType::Dinner];

impl MealPlanResponse {
    fn into_meal_plan(self) -> Result<MealPlan, RecipeApiError> {
        let day = match self {
            MealPlanResponse::Day(day) => day,
            MealPlanResponse::Week { mut week } => match week.remove("monday") {
                Some(day) => day,
                None => week.into_values().next().ok_or_else(|| {
                    RecipeApiError::MalformedResponse("week plan contains no days".into())
                })?,
            },
        };
        day.into_meal_plan()
    }
}

impl DayPlan {
    /// Meals without a type are assigned breakfast, lunch, dinner by
    /// position; meals without nutrition get a third of the day's nutrients.
    fn into_meal_plan(self) -> Result<MealPlan, RecipeApiError> {
        if self.meals.len() < PLAN_SLOTS.len() {
            return Err(RecipeApiError::MalformedResponse(format!(
                "expected {} meals, got {}",
                PLAN_SLOTS.len(),
                self.meals.len()
            )));
        }

        let share = MealNutrition {
            calories: (self.nutrients.calories / 3.0).round().max(0.0) as u32,
            protein: round1(self.nutrients.protein / 3.0),
            carbs: round1(self.nutrients.carbohydrates / 3.0),
            fat: round1(self.nutrients.fat / 3.0),
        };

        let meals = self
            .meals
            .into_iter()
            .zip(PLAN_SLOTS)
            .map(|(meal, slot)| {
                let image = meal.image_url();
                PlannedMeal {
                    meal_type: meal.meal_type.unwrap_or(slot),
                    title: meal.title,
                    image,
                    nutrition: meal.nutrition.map(MealNutrition::from).unwrap_or(share),
                    source_url: meal.source_url,
                }
            })
            .collect();

        Ok(MealPlan {
            meals,
            nutrients: MealPlanNutrients {
                calories: self.nutrients.calories,
                protein: self.nutrients.protein,
                carbohydrates: self.nutrients.carbohydrates,
                fat: self.nutrients.fat,
            },
            shopping_list: self.shopping_list,
        })
    }
}

impl WireMeal {
    fn image_url(&self) -> Option<String> {
        match (&self.image, self.id, &self.image_type) {
            (Some(image), _, _) if image.starts_with("http") => Some(image.clone()),
            (_, Some(id), Some(image_type)) => Some(format!(
                "{}/{}-312x231.{}",
                endpoints::RECIPE_IMAGE_BASE,
                id,
                image_type
            )),
            (Some(image), _, _) => Some(format!("{}/{}", endpoints::RECIPE_IMAGE_BASE, image)),
            _ => None,
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
    #[serde(default)]
    total_results: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResult {
    id: u64,
    title: String,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    ready_in_minutes: Option<u32>,
    #[serde(default)]
    servings: Option<u32>,
    #[serde(default)]
    vegetarian: bool,
    #[serde(default)]
    vegan: bool,
    #[serde(default)]
    gluten_free: bool,
    #[serde(default)]
    dairy_free: bool,
}

impl From<SearchResult> for RecipeSummary {
    fn from(r: SearchResult) -> Self {
        Self {
            id: r.id,
            title: r.title,
            image: r.image,
            ready_in_minutes: r.ready_in_minutes,
            servings: r.servings,
            vegetarian: r.vegetarian,
            vegan: r.vegan,
            gluten_free: r.gluten_free,
            dairy_free: r.dairy_free,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecipeInformation {
    id: u64,
    title: String,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    ready_in_minutes: Option<u32>,
    #[serde(default)]
    servings: Option<u32>,
    #[serde(default)]
    instructions: Option<String>,
    #[serde(default)]
    extended_ingredients: Vec<WireIngredient>,
    #[serde(default)]
    nutrition: Option<WireNutrition>,
}

#[derive(Debug, Deserialize)]
struct WireIngredient {
    #[serde(default)]
    original: String,
    #[serde(default)]
    amount: f64,
    #[serde(default)]
    unit: String,
}

#[derive(Debug, Deserialize)]
struct WireNutrition {
    #[serde(default)]
    nutrients: Vec<WireNutrient>,
}

#[derive(Debug, Deserialize)]
struct WireNutrient {
    name: String,
    amount: f64,
}

impl WireNutrition {
    fn amount(&self, name: &str) -> f64 {
        self.nutrients
            .iter()
            .find(|n| n.name.eq_ignore_ascii_case(name))
            .map(|n| n.amount.round())
            .unwrap_or(0.0)
    }
}

impl From<RecipeInformation> for RecipeDetails {
    fn from(info: RecipeInformation) -> Self {
        let nutrition = info
            .nutrition
            .map(|n| MealNutrition {
                calories: n.amount("Calories").max(0.0) as u32,
                protein: n.amount("Protein"),
                carbs: n.amount("Carbohydrates"),
                fat: n.amount("Fat"),
            })
            .unwrap_or_default();

        Self {
            id: info.id,
            title: info.title,
            image: info.image,
            ready_in_minutes: info.ready_in_minutes,
            servings: info.servings,
            instructions: info.instructions.filter(|s| !s.trim().is_empty()),
            ingredients: info
                .extended_ingredients
                .into_iter()
                .map(|i| RecipeIngredient {
                    original: i.original,
                    amount: i.amount,
                    unit: i.unit,
                })
                .collect(),
            nutrition,
        }
    }
}
