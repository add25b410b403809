// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};

use diet_tracker::config::Config;
use diet_tracker::constants::messages;
use diet_tracker::controllers::{
    MealPlanner, NutritionTracker, Outcome, ProfileManager, RecipeBrowser, Served,
};
use diet_tracker::logging::LoggingConfig;
use diet_tracker::models::{
    ActivityLevel, Diet, Gender, HealthGoal, MealEntry, MealPlan, MealPlanRequest, MealType,
    NutritionGoals, Pagination, PersonalInfo, ProfileGoals, RecipeSearchFilters, RecipeSearchPage, SettingKey,
    TimeFrame,
};
use diet_tracker::providers::{create_provider, RecipeProvider};
use diet_tracker::storage::{MemoryStore, SqliteStore, StateStore};
use diet_tracker::validation::parse_activity_level;

#[derive(Parser)]
#[command(name = "diet-tracker")]
#[command(author, version, about = "Track meals, plan diets and search recipes")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Override the configured database URL
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Keep all state in memory for this run
    #[arg(long, global = true)]
    ephemeral: bool,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Profile, body metrics and settings
    Profile {
        #[command(subcommand)]
        command: ProfileCommand,
    },
    /// Today's meal log
    Log {
        #[command(subcommand)]
        command: LogCommand,
    },
    /// Generate a daily meal plan
    Plan(PlanArgs),
    /// Search and inspect recipes
    Recipes {
        #[command(subcommand)]
        command: RecipeCommand,
    },
    /// Write the effective configuration to the config file
    InitConfig {
        /// Recipe API key to store
        #[arg(long)]
        api_key: Option<String>,
    },
}

#[derive(Subcommand)]
enum ProfileCommand {
    /// Show the profile with BMI, calorie target and streak
    Show,
    /// Update personal information
    Set {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        age: Option<u32>,
        #[arg(long)]
        gender: Option<Gender>,
        /// Weight in kg
        #[arg(long)]
        weight: Option<f64>,
        /// Height in cm
        #[arg(long)]
        height: Option<u32>,
    },
    /// Update lifestyle goals
    Goals {
        /// Activity multiplier: 1.2, 1.375, 1.55, 1.725 or 1.9
        #[arg(long)]
        activity_level: Option<f64>,
        #[arg(long)]
        diet: Option<String>,
        #[arg(long)]
        health_goal: Option<HealthGoal>,
        /// Target change in kg per week
        #[arg(long)]
        weekly_goal: Option<f64>,
        #[arg(long)]
        allergies: Option<String>,
    },
    /// Toggle a setting (notifications, darkMode, autoSave, analytics)
    Setting {
        key: SettingKey,
        #[arg(action = clap::ArgAction::Set)]
        value: bool,
    },
    /// Export the profile as JSON
    Export {
        /// Directory to write into
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// Delete profile, meal log and meal plan preferences
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum LogCommand {
    /// Log a meal
    Add {
        #[arg(long = "type", default_value = "snack")]
        meal_type: MealType,
        #[arg(long)]
        name: String,
        #[arg(long, default_value_t = 0)]
        calories: u32,
        #[arg(long, default_value_t = 0.0)]
        protein: f64,
        #[arg(long, default_value_t = 0.0)]
        carbs: f64,
        #[arg(long, default_value_t = 0.0)]
        fat: f64,
    },
    /// Remove a logged meal by id
    Remove { id: i64 },
    /// Show today's meals, totals and progress
    List,
    /// Set daily macro goals; omitted or zero values use the defaults
    Goals {
        #[arg(long)]
        calories: Option<u32>,
        #[arg(long)]
        protein: Option<u32>,
        #[arg(long)]
        carbs: Option<u32>,
        #[arg(long)]
        fat: Option<u32>,
    },
    /// Clear today's meals, keeping goals
    Reset,
    /// Set the calorie goal from the profile's daily target
    SyncGoal,
}

#[derive(Args)]
struct PlanArgs {
    /// Target calories (800-5000); defaults to the last request
    #[arg(long)]
    calories: Option<u32>,
    /// Diet: any, vegetarian, vegan, ketogenic, ...
    #[arg(long)]
    diet: Option<String>,
    /// Comma separated ingredients to exclude
    #[arg(long)]
    exclude: Option<String>,
    #[arg(long)]
    time_frame: Option<TimeFrame>,
}

#[derive(Args, Default)]
struct FilterArgs {
    #[arg(long, default_value = "")]
    query: String,
    #[arg(long)]
    diet: Option<String>,
    #[arg(long, default_value = "")]
    cuisine: String,
    #[arg(long)]
    max_calories: Option<u32>,
    /// Maximum ready time in minutes
    #[arg(long)]
    max_time: Option<u32>,
}

impl From<FilterArgs> for RecipeSearchFilters {
    fn from(args: FilterArgs) -> Self {
        Self {
            query: args.query,
            diet: args.diet.map(Diet::from),
            cuisine: args.cuisine,
            max_calories: args.max_calories,
            max_time: args.max_time,
        }
    }
}

#[derive(Subcommand)]
enum RecipeCommand {
    /// Search recipes; no filters shows the featured list
    Search(FilterArgs),
    /// Show a specific result page of a search
    Page {
        page: u32,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Browse a category such as breakfast or dessert
    Category { name: String },
    /// Show full recipe details
    Show { id: u64 },
}

struct App {
    store: Arc<dyn StateStore>,
    provider: Arc<dyn RecipeProvider>,
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let logging = LoggingConfig::from_env();
    let logging = if cli.verbose { logging.with_level("debug") } else { logging };
    logging.init()?;

    let mut config = Config::load(cli.config.clone())?;

    if let Commands::InitConfig { api_key } = &cli.command {
        if api_key.is_some() {
            config.recipe_api.api_key = api_key.clone();
        }
        config.save(cli.config.clone())?;
        println!("Configuration saved");
        return Ok(());
    }

    let store: Arc<dyn StateStore> = if cli.ephemeral {
        Arc::new(MemoryStore::new())
    } else {
        let url = cli
            .database_url
            .clone()
            .unwrap_or_else(|| config.storage.database_url.clone());
        Arc::new(
            SqliteStore::new(&url)
                .await
                .with_context(|| format!("Failed to open database {}", url))?,
        )
    };

    let provider_name = if config.recipe_api.provider == "spoonacular" && !config.has_api_key() {
        warn!("No recipe API key configured, using demo recipes");
        "demo"
    } else {
        config.recipe_api.provider.as_str()
    };
    let provider: Arc<dyn RecipeProvider> = Arc::from(create_provider(provider_name, &config.recipe_api)?);

    info!(storage = store.backend_name(), provider = provider.provider_name(), "Starting");

    let app = App {
        store,
        provider,
        json: cli.json,
    };

    match cli.command {
        Commands::Profile { command } => app.profile(command).await,
        Commands::Log { command } => app.log(command).await,
        Commands::Plan(args) => app.plan(args).await,
        Commands::Recipes { command } => app.recipes(command).await,
        Commands::InitConfig { .. } => Ok(()),
    }
}

impl App {
    fn print_json<T: Serialize>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    async fn profile(&self, command: ProfileCommand) -> Result<()> {
        let manager = ProfileManager::load(self.store.clone()).await?;

        match command {
            ProfileCommand::Show => {
                let profile = manager.profile().await;
                let summary = manager.summary(Utc::now()).await?;
                if self.json {
                    return self.print_json(&serde_json::json!({
                        "profile": profile,
                        "summary": summary,
                    }));
                }

                let info = &profile.personal_info;
                println!("Name:            {}", info.full_name.as_deref().unwrap_or("-"));
                println!("Email:           {}", info.email.as_deref().unwrap_or("-"));
                match summary.bmi {
                    Some(bmi) => println!("BMI:             {:.1} ({})", bmi.bmi, bmi.category.display_name()),
                    None => println!("BMI:             -"),
                }
                println!("Daily calories:  {} kcal", summary.daily_calories);
                if let (Some(current), Some(target)) = (summary.current_weight, summary.target_weight) {
                    println!("Weight:          {} kg (4 week target {:.1} kg)", current, target);
                }
                println!(
                    "Streak:          {} days ({:.0}%)",
                    summary.streak_days, summary.streak_progress
                );
                println!("Theme:           {}", manager.theme().await?);
            }
            ProfileCommand::Set {
                name,
                email,
                age,
                gender,
                weight,
                height,
            } => {
                let current = manager.profile().await.personal_info;
                let info = PersonalInfo {
                    full_name: name.or(current.full_name),
                    email: email.or(current.email),
                    age: age.or(current.age),
                    gender: gender.or(current.gender),
                    weight: weight.or(current.weight),
                    height: height.or(current.height),
                };
                manager.update_personal_info(info).await?;
                println!("{}", messages::PROFILE_UPDATED);
            }
            ProfileCommand::Goals {
                activity_level,
                diet,
                health_goal,
                weekly_goal,
                allergies,
            } => {
                let current = manager.profile().await.goals;
                let activity_level: Option<ActivityLevel> =
                    activity_level.map(parse_activity_level).transpose()?;
                let goals = ProfileGoals {
                    activity_level: activity_level.or(current.activity_level),
                    diet_preference: diet.or(current.diet_preference),
                    health_goal: health_goal.or(current.health_goal),
                    weekly_goal: weekly_goal.or(current.weekly_goal),
                    allergies: allergies.or(current.allergies),
                };
                manager.update_goals(goals).await?;
                println!("{}", messages::GOALS_UPDATED);
            }
            ProfileCommand::Setting { key, value } => {
                let profile = manager.update_setting(key, value).await?;
                if self.json {
                    return self.print_json(&profile.settings);
                }
                println!("{}", messages::PROFILE_UPDATED);
            }
            ProfileCommand::Export { dir } => {
                let path = manager.export_to_dir(&dir, Utc::now()).await?;
                println!("{} {}", messages::DATA_EXPORTED, path.display());
            }
            ProfileCommand::Clear { yes } => {
                if !yes {
                    anyhow::bail!("Refusing to clear all data without --yes");
                }
                manager.clear_all().await?;
                println!("{}", messages::DATA_CLEARED);
            }
        }

        Ok(())
    }

    async fn log(&self, command: LogCommand) -> Result<()> {
        let tracker = NutritionTracker::load(self.store.clone()).await?;

        match command {
            LogCommand::Add {
                meal_type,
                name,
                calories,
                protein,
                carbs,
                fat,
            } => {
                let entry = MealEntry {
                    meal_type,
                    name,
                    calories,
                    protein,
                    carbs,
                    fat,
                };
                let meal = tracker.log_meal(entry, Utc::now()).await?;
                if self.json {
                    return self.print_json(&meal);
                }
                println!("Logged {} ({} kcal) with id {}", meal.name, meal.calories, meal.id);
            }
            LogCommand::Remove { id } => {
                let meal = tracker.remove_meal(id).await?;
                println!("Removed {}", meal.name);
            }
            LogCommand::List => {
                let snapshot = tracker.snapshot().await;
                let progress = tracker.progress().await;
                if self.json {
                    return self.print_json(&serde_json::json!({
                        "log": snapshot,
                        "progress": progress,
                    }));
                }

                if snapshot.todays_meals.is_empty() {
                    println!("{}", messages::NO_MEALS_LOGGED);
                }
                for meal in &snapshot.todays_meals {
                    println!(
                        "{:>14}  {:<9} {:<28} {:>5} kcal  P {:.1}g  C {:.1}g  F {:.1}g",
                        meal.id,
                        meal.meal_type.display_name(),
                        meal.name,
                        meal.calories,
                        meal.protein,
                        meal.carbs,
                        meal.fat
                    );
                }

                let totals = snapshot.daily_nutrition;
                let goals = snapshot.goals;
                println!();
                println!("Calories {:>7} / {} kcal ({:.0}%)", totals.calories, goals.calories, progress.calories);
                println!("Protein  {:>7.1} / {} g ({:.0}%)", totals.protein, goals.protein, progress.protein);
                println!("Carbs    {:>7.1} / {} g ({:.0}%)", totals.carbs, goals.carbs, progress.carbs);
                println!("Fat      {:>7.1} / {} g ({:.0}%)", totals.fat, goals.fat, progress.fat);
            }
            LogCommand::Goals {
                calories,
                protein,
                carbs,
                fat,
            } => {
                let goals = tracker
                    .update_goals(NutritionGoals::from_form(calories, protein, carbs, fat))
                    .await?;
                if self.json {
                    return self.print_json(&goals);
                }
                println!("{}", messages::GOALS_UPDATED);
            }
            LogCommand::Reset => {
                tracker.reset_day().await?;
                println!("Started a new day");
            }
            LogCommand::SyncGoal => {
                let profile = ProfileManager::load(self.store.clone()).await?.profile().await;
                let goals = tracker.sync_calorie_goal_from_profile(&profile).await?;
                println!("Calorie goal set to {} kcal", goals.calories);
            }
        }

        Ok(())
    }

    async fn plan(&self, args: PlanArgs) -> Result<()> {
        let planner = MealPlanner::new(self.store.clone(), self.provider.clone());
        let saved = planner.load_preferences().await?;

        let request = MealPlanRequest {
            target_calories: args.calories.unwrap_or(saved.target_calories),
            diet: args.diet.map(Diet::from).or(saved.diet),
            exclude: args.exclude.unwrap_or(saved.exclude),
            time_frame: args.time_frame.unwrap_or(saved.time_frame),
        };

        match planner.generate(request).await? {
            Outcome::Fresh(served) => self.print_plan(&served),
            Outcome::Superseded => Ok(()),
        }
    }

    fn print_plan(&self, served: &Served<MealPlan>) -> Result<()> {
        if self.json {
            return self.print_json(served);
        }
        if let Some(notice) = served.notice {
            eprintln!("{}", notice);
        }

        let plan = &served.data;
        for meal in &plan.meals {
            println!(
                "{:<10} {:<34} {:>5} kcal  P {}g  C {}g  F {}g",
                meal.meal_type.display_name(),
                meal.title,
                meal.nutrition.calories,
                meal.nutrition.protein,
                meal.nutrition.carbs,
                meal.nutrition.fat
            );
        }
        let n = &plan.nutrients;
        println!();
        println!(
            "Total: {:.0} kcal  protein {:.1}g  carbs {:.1}g  fat {:.1}g",
            n.calories, n.protein, n.carbohydrates, n.fat
        );

        if !plan.shopping_list.is_empty() {
            println!();
            println!("Shopping list:");
            for item in &plan.shopping_list {
                println!("  {} x {} {}", item.name, item.amount, item.unit);
            }
        }
        Ok(())
    }

    async fn recipes(&self, command: RecipeCommand) -> Result<()> {
        let browser = RecipeBrowser::new(self.provider.clone());

        let outcome = match command {
            RecipeCommand::Search(filters) => {
                let filters = RecipeSearchFilters::from(filters);
                if filters == RecipeSearchFilters::default() {
                    browser.load_featured().await?
                } else {
                    browser.search(filters).await?
                }
            }
            RecipeCommand::Page { page, filters } => {
                browser.search(filters.into()).await?;
                browser.go_to_page(page).await?
            }
            RecipeCommand::Category { name } => browser.search_category(&name).await?,
            RecipeCommand::Show { id } => {
                let details = browser.recipe_details(id).await?;
                if self.json {
                    return self.print_json(&details);
                }
                println!("{} (#{})", details.title, details.id);
                if let Some(minutes) = details.ready_in_minutes {
                    println!("Ready in {} min", minutes);
                }
                println!(
                    "{} kcal  P {}g  C {}g  F {}g",
                    details.nutrition.calories,
                    details.nutrition.protein,
                    details.nutrition.carbs,
                    details.nutrition.fat
                );
                println!();
                for ingredient in &details.ingredients {
                    println!("  - {}", ingredient.original);
                }
                if let Some(instructions) = &details.instructions {
                    println!();
                    println!("{}", instructions);
                }
                return Ok(());
            }
        };

        let Outcome::Fresh(served) = outcome else {
            return Ok(());
        };
        self.print_recipes(&served, browser.pagination().await)
    }

    fn print_recipes(&self, served: &Served<RecipeSearchPage>, pagination: Pagination) -> Result<()> {
        if self.json {
            return self.print_json(&serde_json::json!({
                "results": served,
                "pagination": pagination,
            }));
        }
        if let Some(notice) = served.notice {
            eprintln!("{}", notice);
        }

        if served.data.results.is_empty() {
            println!("No recipes found");
            return Ok(());
        }

        for recipe in &served.data.results {
            let mut tags = Vec::new();
            if recipe.vegetarian {
                tags.push("vegetarian");
            }
            if recipe.vegan {
                tags.push("vegan");
            }
            if recipe.gluten_free {
                tags.push("gluten-free");
            }
            if recipe.dairy_free {
                tags.push("dairy-free");
            }
            println!(
                "{:>8}  {:<40} {:>4} min  {}",
                recipe.id,
                recipe.title,
                recipe
                    .ready_in_minutes
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "N/A".into()),
                tags.join(", ")
            );
        }

        if let Some((start, end)) = pagination.window() {
            let page = pagination.current_page;
            let mut links: Vec<String> = (start..=end)
                .map(|p| if p == page { format!("[{}]", p) } else { p.to_string() })
                .collect();
            if pagination.has_previous() {
                links.insert(0, "<".to_string());
            }
            if pagination.has_next() {
                links.push(">".to_string());
            }
            println!();
            println!("Page {} of {}: {}", page, pagination.total_pages, links.join(" "));
        }
        Ok(())
    }
}
