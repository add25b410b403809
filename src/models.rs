// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Data Models
//!
//! Core data structures shared by the storage layer, the recipe providers
//! and the page controllers.
//!
//! ## Design Principles
//!
//! - **Storage compatible**: persisted types serialize to the same camelCase
//!   JSON layout the stored blobs have always used
//! - **Tolerant on read**: optional fields and `#[serde(default)]` let a
//!   partially filled profile load without error
//! - **Closed where it matters**: genders, goals, meal types and activity
//!   levels are enums; diets stay open because providers accept free text
//!
//! ## Core Models
//!
//! - [`Profile`]: personal info, lifestyle goals and settings
//! - [`LoggedMeal`] / [`NutritionLog`]: today's manual food log
//! - [`MealPlanRequest`] / [`MealPlan`]: generated daily plans
//! - [`RecipeSearchFilters`] / [`RecipeSummary`] / [`Pagination`]: recipe browsing

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::constants::{defaults, limits};

/// Biological sex used by the Mifflin-St Jeor equation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            other => Err(format!("Unknown gender: {}", other)),
        }
    }
}

/// Direction the user wants their weight to move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthGoal {
    Lose,
    Gain,
    #[default]
    Maintain,
}

impl FromStr for HealthGoal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lose" => Ok(HealthGoal::Lose),
            "gain" => Ok(HealthGoal::Gain),
            "maintain" => Ok(HealthGoal::Maintain),
            other => Err(format!("Unknown health goal: {}", other)),
        }
    }
}

/// Activity level, persisted as its TDEE multiplier
///
/// Only the five standard multipliers are accepted, so a hand-edited blob
/// cannot smuggle in an arbitrary factor. Inside a stored profile an
/// unknown multiplier loads as unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub enum ActivityLevel {
    /// Little or no exercise (1.2)
    Sedentary,
    /// Light exercise 1-3 days/week (1.375)
    LightlyActive,
    /// Moderate exercise 3-5 days/week (1.55)
    #[default]
    ModeratelyActive,
    /// Hard exercise 6-7 days/week (1.725)
    VeryActive,
    /// Very hard exercise or a physical job (1.9)
    ExtraActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::LightlyActive,
        ActivityLevel::ModeratelyActive,
        ActivityLevel::VeryActive,
        ActivityLevel::ExtraActive,
    ];

    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtraActive => 1.9,
        }
    }

    pub fn from_multiplier(value: f64) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|level| (level.multiplier() - value).abs() < 1e-9)
    }
}

impl TryFrom<f64> for ActivityLevel {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::from_multiplier(value)
            .ok_or_else(|| format!("Unknown activity level multiplier: {}", value))
    }
}

impl From<ActivityLevel> for f64 {
    fn from(level: ActivityLevel) -> Self {
        level.multiplier()
    }
}

/// Personal details entered on the profile page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(
        default,
        deserialize_with = "lenient_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub gender: Option<Gender>,
    /// Body weight in kilograms
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Height in centimeters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// Lifestyle goals entered on the profile page
///
/// These describe intent (lose/gain/maintain, pace, activity). Daily macro
/// targets are a separate concern, see [`NutritionGoals`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileGoals {
    #[serde(
        default,
        deserialize_with = "lenient_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub activity_level: Option<ActivityLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diet_preference: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub health_goal: Option<HealthGoal>,
    /// Desired weight change in kg per week
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly_goal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allergies: Option<String>,
}

/// Application settings toggles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub notifications: bool,
    pub dark_mode: bool,
    pub auto_save: bool,
    pub analytics: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            notifications: true,
            dark_mode: false,
            auto_save: true,
            analytics: true,
        }
    }
}

/// Settings keys addressable through [`crate::controllers::ProfileManager::update_setting`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    Notifications,
    DarkMode,
    AutoSave,
    Analytics,
}

impl FromStr for SettingKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "notifications" => Ok(SettingKey::Notifications),
            "darkMode" | "dark_mode" | "dark-mode" => Ok(SettingKey::DarkMode),
            "autoSave" | "auto_save" | "auto-save" => Ok(SettingKey::AutoSave),
            "analytics" => Ok(SettingKey::Analytics),
            other => Err(format!("Unknown setting: {}", other)),
        }
    }
}

impl Settings {
    pub fn set(&mut self, key: SettingKey, value: bool) {
        match key {
            SettingKey::Notifications => self.notifications = value,
            SettingKey::DarkMode => self.dark_mode = value,
            SettingKey::AutoSave => self.auto_save = value,
            SettingKey::Analytics => self.analytics = value,
        }
    }
}

/// The `userProfile_data` blob
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub personal_info: PersonalInfo,
    pub goals: ProfileGoals,
    pub settings: Settings,
    /// Keys this version does not model, such as `progress`, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Optional select value: `""` and `null` mean unset, and a value that no
/// longer parses is dropped with a warning instead of failing the record.
fn lenient_option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(value) => match serde_json::from_value(value.clone()) {
            Ok(parsed) => Ok(Some(parsed)),
            Err(e) => {
                warn!(value = %value, error = %e, "Ignoring unreadable profile field");
                Ok(None)
            }
        },
    }
}

/// One-way JSON export of the profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileExport {
    pub profile: Profile,
    pub export_date: DateTime<Utc>,
}

impl ProfileExport {
    /// File name the export is written under, keyed by export date
    pub fn file_name(&self) -> String {
        format!(
            "{}{}.json",
            defaults::EXPORT_FILE_PREFIX,
            self.export_date.format("%Y-%m-%d")
        )
    }
}

/// Meal slot a logged or planned meal belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub fn display_name(&self) -> &'static str {
        match self {
            MealType::Breakfast => "Breakfast",
            MealType::Lunch => "Lunch",
            MealType::Dinner => "Dinner",
            MealType::Snack => "Snack",
        }
    }
}

impl FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            "snack" => Ok(MealType::Snack),
            other => Err(format!("Unknown meal type: {}", other)),
        }
    }
}

/// Calorie and macro totals for a day
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NutritionTotals {
    pub calories: u32,
    /// grams
    pub protein: f64,
    /// grams
    pub carbs: f64,
    /// grams
    pub fat: f64,
}

/// Food entry as submitted by the user, before it gets an id
#[derive(Debug, Clone, PartialEq)]
pub struct MealEntry {
    pub meal_type: MealType,
    pub name: String,
    pub calories: u32,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// A food entry in today's log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedMeal {
    /// Millisecond timestamp, strictly increasing within a log
    pub id: i64,
    #[serde(rename = "type")]
    pub meal_type: MealType,
    pub name: String,
    pub calories: u32,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub timestamp: DateTime<Utc>,
}

/// Daily calorie and macro targets for the nutrition tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NutritionGoals {
    pub calories: u32,
    pub protein: u32,
    pub carbs: u32,
    pub fat: u32,
}

impl Default for NutritionGoals {
    fn default() -> Self {
        Self {
            calories: defaults::CALORIE_GOAL,
            protein: defaults::PROTEIN_GOAL,
            carbs: defaults::CARBS_GOAL,
            fat: defaults::FAT_GOAL,
        }
    }
}

impl NutritionGoals {
    /// Build goals from form input; missing or zero values take the default
    pub fn from_form(
        calories: Option<u32>,
        protein: Option<u32>,
        carbs: Option<u32>,
        fat: Option<u32>,
    ) -> Self {
        let fallback = Self::default();
        let pick = |value: Option<u32>, default: u32| value.filter(|v| *v > 0).unwrap_or(default);
        Self {
            calories: pick(calories, fallback.calories),
            protein: pick(protein, fallback.protein),
            carbs: pick(carbs, fallback.carbs),
            fat: pick(fat, fallback.fat),
        }
    }
}

/// The `nutritionTracker_data` blob
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NutritionLog {
    pub daily_nutrition: NutritionTotals,
    pub goals: NutritionGoals,
    pub todays_meals: Vec<LoggedMeal>,
    pub weekly_data: Vec<f64>,
}

/// Dietary restriction understood by the recipe API
///
/// Serialized as the provider's query string value. Unknown values are kept
/// verbatim in [`Diet::Other`] and passed through to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Diet {
    /// No restriction (empty query value)
    #[default]
    Any,
    Vegetarian,
    Vegan,
    Ketogenic,
    GlutenFree,
    Paleo,
    Pescetarian,
    Other(String),
}

impl Diet {
    pub fn as_str(&self) -> &str {
        match self {
            Diet::Any => "",
            Diet::Vegetarian => "vegetarian",
            Diet::Vegan => "vegan",
            Diet::Ketogenic => "ketogenic",
            Diet::GlutenFree => "gluten free",
            Diet::Paleo => "paleo",
            Diet::Pescetarian => "pescetarian",
            Diet::Other(value) => value,
        }
    }

    pub fn is_any(&self) -> bool {
        self.as_str().is_empty()
    }
}

impl From<&str> for Diet {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "" | "any" | "none" => Diet::Any,
            "vegetarian" => Diet::Vegetarian,
            "vegan" => Diet::Vegan,
            "ketogenic" => Diet::Ketogenic,
            "gluten free" | "gluten-free" | "glutenfree" => Diet::GlutenFree,
            "paleo" => Diet::Paleo,
            "pescetarian" => Diet::Pescetarian,
            _ => Diet::Other(value.trim().to_string()),
        }
    }
}

impl From<String> for Diet {
    fn from(value: String) -> Self {
        Diet::from(value.as_str())
    }
}

impl From<Diet> for String {
    fn from(diet: Diet) -> Self {
        diet.as_str().to_string()
    }
}

impl fmt::Display for Diet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_any() {
            write!(f, "any")
        } else {
            write!(f, "{}", self.as_str())
        }
    }
}

/// Meal plan horizon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFrame {
    #[default]
    Day,
    Week,
}

impl TimeFrame {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFrame::Day => "day",
            TimeFrame::Week => "week",
        }
    }
}

impl FromStr for TimeFrame {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" => Ok(TimeFrame::Day),
            "week" => Ok(TimeFrame::Week),
            other => Err(format!("Unknown time frame: {}", other)),
        }
    }
}

/// Meal plan form input, also persisted as `mealPlanner_preferences`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MealPlanRequest {
    pub target_calories: u32,
    /// `None` means the user made no selection, which fails validation
    pub diet: Option<Diet>,
    /// Comma separated ingredients to exclude
    pub exclude: String,
    pub time_frame: TimeFrame,
}

impl Default for MealPlanRequest {
    fn default() -> Self {
        Self {
            target_calories: defaults::CALORIE_GOAL,
            diet: None,
            exclude: String::new(),
            time_frame: TimeFrame::Day,
        }
    }
}

/// Per-meal nutrition
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MealNutrition {
    pub calories: u32,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// One of the three meals of a generated plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedMeal {
    #[serde(rename = "type")]
    pub meal_type: MealType,
    pub title: String,
    pub image: Option<String>,
    pub nutrition: MealNutrition,
    pub source_url: Option<String>,
}

/// Aggregate nutrients of a plan (provider naming: `carbohydrates`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MealPlanNutrients {
    pub calories: f64,
    pub protein: f64,
    pub carbohydrates: f64,
    pub fat: f64,
}

/// Shopping list line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub name: String,
    pub amount: u32,
    pub unit: String,
}

/// A generated daily meal plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlan {
    pub meals: Vec<PlannedMeal>,
    pub nutrients: MealPlanNutrients,
    pub shopping_list: Vec<ShoppingItem>,
}

impl MealPlan {
    pub fn meal(&self, meal_type: MealType) -> Option<&PlannedMeal> {
        self.meals.iter().find(|m| m.meal_type == meal_type)
    }
}

/// Recipe search form filters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecipeSearchFilters {
    pub query: String,
    pub diet: Option<Diet>,
    pub cuisine: String,
    pub max_calories: Option<u32>,
    /// Maximum ready time in minutes
    pub max_time: Option<u32>,
}

impl RecipeSearchFilters {
    pub fn with_query(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }
}

/// Recipe card data returned by a search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSummary {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub ready_in_minutes: Option<u32>,
    #[serde(default)]
    pub servings: Option<u32>,
    #[serde(default)]
    pub vegetarian: bool,
    #[serde(default)]
    pub vegan: bool,
    #[serde(default)]
    pub gluten_free: bool,
    #[serde(default)]
    pub dairy_free: bool,
}

/// One page of search results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSearchPage {
    pub results: Vec<RecipeSummary>,
    pub total_results: u32,
}

/// Ingredient line of a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub original: String,
    pub amount: f64,
    pub unit: String,
}

/// Full recipe information for the detail view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetails {
    pub id: u64,
    pub title: String,
    pub image: Option<String>,
    pub ready_in_minutes: Option<u32>,
    pub servings: Option<u32>,
    pub instructions: Option<String>,
    pub ingredients: Vec<RecipeIngredient>,
    /// Per serving, rounded to whole units
    pub nutrition: MealNutrition,
}

/// Recipe result pagination state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 0,
        }
    }
}

impl Pagination {
    pub fn new(current_page: u32, total_results: u32) -> Self {
        Self {
            current_page: current_page.max(1),
            total_pages: Self::pages_for(total_results),
        }
    }

    /// ceil(total_results / page size)
    pub fn pages_for(total_results: u32) -> u32 {
        total_results.div_ceil(limits::RECIPES_PER_PAGE)
    }

    /// Zero-based result offset of the current page
    pub fn offset(&self) -> u32 {
        (self.current_page.max(1) - 1) * limits::RECIPES_PER_PAGE
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Page links shown around the current page, `None` when one page or less
    pub fn window(&self) -> Option<(u32, u32)> {
        if self.total_pages <= 1 {
            return None;
        }
        let radius = limits::PAGINATION_WINDOW_RADIUS;
        let start = self.current_page.saturating_sub(radius).max(1);
        let end = (self.current_page + radius).min(self.total_pages);
        Some((start, end))
    }
}
