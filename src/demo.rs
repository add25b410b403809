// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Demo Data Generator
//!
//! Locally synthesized meal plans and recipes, used whenever the recipe API
//! cannot answer. Meal plans are diet-aware: each supported diet has a fixed
//! table of candidates per meal slot, and one candidate is drawn per slot.
//!
//! The generator owns its RNG so tests can seed it.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::constants::{defaults, limits};
use crate::intelligence::accumulate_totals;
use crate::models::{
    Diet, MealNutrition, MealPlan, MealPlanRequest, MealType, PlannedMeal, RecipeDetails,
    RecipeIngredient, RecipeSearchFilters, RecipeSummary, ShoppingItem,
};

/// (title, protein g, carbs g, fat g)
type Candidate = (&'static str, f64, f64, f64);

struct DietTable {
    breakfast: &'static [Candidate],
    lunch: &'static [Candidate],
    dinner: &'static [Candidate],
}

const DEFAULT_TABLE: DietTable = DietTable {
    breakfast: &[
        ("Avocado Toast with Eggs", 18.0, 35.0, 28.0),
        ("Greek Yogurt Parfait", 20.0, 30.0, 15.0),
        ("Protein Pancakes", 25.0, 25.0, 20.0),
    ],
    lunch: &[
        ("Grilled Chicken Salad", 32.0, 15.0, 22.0),
        ("Turkey Wrap", 28.0, 40.0, 18.0),
        ("Salmon with Rice", 35.0, 30.0, 25.0),
    ],
    dinner: &[
        ("Baked Salmon with Vegetables", 35.0, 25.0, 30.0),
        ("Lean Beef Stir Fry", 30.0, 20.0, 28.0),
        ("Chicken Pasta", 28.0, 45.0, 20.0),
    ],
};

const VEGETARIAN_TABLE: DietTable = DietTable {
    breakfast: &[
        ("Vegetarian Omelette", 20.0, 15.0, 25.0),
        ("Quinoa Breakfast Bowl", 18.0, 35.0, 20.0),
    ],
    lunch: &[
        ("Vegetarian Buddha Bowl", 25.0, 40.0, 20.0),
        ("Caprese Salad", 20.0, 25.0, 30.0),
    ],
    dinner: &[
        ("Vegetarian Pasta", 22.0, 50.0, 18.0),
        ("Stuffed Bell Peppers", 18.0, 30.0, 22.0),
    ],
};

const VEGAN_TABLE: DietTable = DietTable {
    breakfast: &[
        ("Vegan Smoothie Bowl", 15.0, 40.0, 20.0),
        ("Oatmeal with Nuts", 18.0, 35.0, 25.0),
    ],
    lunch: &[
        ("Vegan Buddha Bowl", 20.0, 45.0, 18.0),
        ("Vegan Wrap", 15.0, 50.0, 15.0),
    ],
    dinner: &[
        ("Tofu Curry", 25.0, 30.0, 20.0),
        ("Vegan Pasta", 18.0, 55.0, 15.0),
    ],
};

const KETOGENIC_TABLE: DietTable = DietTable {
    breakfast: &[
        ("Keto Avocado Bowl", 20.0, 8.0, 45.0),
        ("Keto Pancakes", 25.0, 5.0, 50.0),
    ],
    lunch: &[
        ("Keto Chicken Salad", 35.0, 8.0, 40.0),
        ("Keto Wrap", 30.0, 6.0, 45.0),
    ],
    dinner: &[
        ("Keto Salmon", 40.0, 5.0, 50.0),
        ("Keto Beef Bowl", 35.0, 8.0, 45.0),
    ],
};

const BREAKFAST_IMAGE: &str = "https://images.unsplash.com/photo-1482049016688-2d3e1b311543?w=400";
const LUNCH_IMAGE: &str = "https://images.unsplash.com/photo-1512621776951-a57141f2eefd?w=400";
const DINNER_IMAGE: &str = "https://images.unsplash.com/photo-1467003909585-2f8a72700288?w=400";

/// Static shopping catalog; only the first entries are used
const INGREDIENT_CATALOG: &[&str] = &[
    "Avocado",
    "Eggs",
    "Whole grain bread",
    "Greek yogurt",
    "Berries",
    "Chicken breast",
    "Mixed greens",
    "Tomatoes",
    "Cucumber",
    "Olive oil",
    "Salmon fillet",
    "Broccoli",
    "Sweet potato",
    "Quinoa",
    "Almonds",
    "Spinach",
    "Bell peppers",
    "Onions",
    "Garlic",
    "Lemon",
];

struct DemoRecipe {
    summary: fn() -> RecipeSummary,
    nutrition: MealNutrition,
    ingredients: &'static [&'static str],
    instructions: &'static str,
}

fn grilled_chicken_salad() -> RecipeSummary {
    RecipeSummary {
        id: 1,
        title: "Grilled Chicken Salad".into(),
        image: Some(LUNCH_IMAGE.into()),
        ready_in_minutes: Some(25),
        servings: Some(2),
        vegetarian: false,
        vegan: false,
        gluten_free: true,
        dairy_free: true,
    }
}

fn quinoa_buddha_bowl() -> RecipeSummary {
    RecipeSummary {
        id: 2,
        title: "Quinoa Buddha Bowl".into(),
        image: Some("https://images.unsplash.com/photo-1512058564366-18510be2db19?w=400".into()),
        ready_in_minutes: Some(30),
        servings: Some(1),
        vegetarian: true,
        vegan: true,
        gluten_free: true,
        dairy_free: true,
    }
}

fn salmon_with_roasted_vegetables() -> RecipeSummary {
    RecipeSummary {
        id: 3,
        title: "Salmon with Roasted Vegetables".into(),
        image: Some(DINNER_IMAGE.into()),
        ready_in_minutes: Some(35),
        servings: Some(2),
        vegetarian: false,
        vegan: false,
        gluten_free: true,
        dairy_free: true,
    }
}

const DEMO_RECIPES: &[DemoRecipe] = &[
    DemoRecipe {
        summary: grilled_chicken_salad,
        nutrition: MealNutrition {
            calories: 386,
            protein: 32.0,
            carbs: 15.0,
            fat: 22.0,
        },
        ingredients: &["2 chicken breasts", "4 cups mixed greens", "1 cucumber", "2 tbsp olive oil"],
        instructions: "Grill the chicken, slice it and toss with the greens, cucumber and olive oil.",
    },
    DemoRecipe {
        summary: quinoa_buddha_bowl,
        nutrition: MealNutrition {
            calories: 422,
            protein: 20.0,
            carbs: 45.0,
            fat: 18.0,
        },
        ingredients: &["1 cup quinoa", "1 sweet potato", "1 cup spinach", "1 avocado"],
        instructions: "Cook the quinoa, roast the sweet potato and arrange everything in a bowl.",
    },
    DemoRecipe {
        summary: salmon_with_roasted_vegetables,
        nutrition: MealNutrition {
            calories: 510,
            protein: 35.0,
            carbs: 25.0,
            fat: 30.0,
        },
        ingredients: &["2 salmon fillets", "1 head broccoli", "2 bell peppers", "1 lemon"],
        instructions: "Roast the vegetables for 20 minutes, add the salmon and roast 15 minutes more.",
    },
];

/// Meal plan and recipe generator backed by an injectable RNG
pub struct DemoGenerator<R: Rng> {
    rng: R,
}

impl DemoGenerator<StdRng> {
    /// Deterministic generator for tests and reproducible output
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> DemoGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Plan with one breakfast, lunch and dinner for the requested diet
    ///
    /// Each meal gets round(target/3) calories regardless of the candidate.
    /// Diets without a table use the unrestricted one.
    pub fn generate_meal_plan(&mut self, request: &MealPlanRequest) -> MealPlan {
        let target = if request.target_calories == 0 {
            defaults::CALORIE_GOAL
        } else {
            request.target_calories
        };
        let calories_per_meal = (f64::from(target) / 3.0).round() as u32;
        let table = table_for(request.diet.as_ref());

        let meals = vec![
            self.pick_meal(MealType::Breakfast, table.breakfast, BREAKFAST_IMAGE, calories_per_meal),
            self.pick_meal(MealType::Lunch, table.lunch, LUNCH_IMAGE, calories_per_meal),
            self.pick_meal(MealType::Dinner, table.dinner, DINNER_IMAGE, calories_per_meal),
        ];

        MealPlan {
            nutrients: accumulate_totals(&meals).into(),
            shopping_list: self.shopping_list(),
            meals,
        }
    }

    /// First catalog entries with a random amount each
    ///
    /// Flavor data only: the list is not derived from the chosen meals.
    pub fn shopping_list(&mut self) -> Vec<ShoppingItem> {
        INGREDIENT_CATALOG
            .iter()
            .take(limits::DEMO_SHOPPING_LIST_LEN)
            .map(|name| ShoppingItem {
                name: (*name).to_string(),
                amount: self.rng.gen_range(1..=limits::DEMO_SHOPPING_MAX_AMOUNT),
                unit: "pieces".to_string(),
            })
            .collect()
    }

    fn pick_meal(
        &mut self,
        meal_type: MealType,
        candidates: &[Candidate],
        image: &str,
        calories: u32,
    ) -> PlannedMeal {
        let (title, protein, carbs, fat) = candidates[self.rng.gen_range(0..candidates.len())];
        PlannedMeal {
            meal_type,
            title: title.to_string(),
            image: Some(image.to_string()),
            nutrition: MealNutrition {
                calories,
                protein,
                carbs,
                fat,
            },
            source_url: None,
        }
    }
}

fn table_for(diet: Option<&Diet>) -> &'static DietTable {
    match diet {
        Some(Diet::Vegetarian) => &VEGETARIAN_TABLE,
        Some(Diet::Vegan) => &VEGAN_TABLE,
        Some(Diet::Ketogenic) => &KETOGENIC_TABLE,
        _ => &DEFAULT_TABLE,
    }
}

/// Built-in recipes matching the filters' diet flags, ready time and query
///
/// A query that matches no title is ignored, so a featured or category
/// search still lists every recipe the other filters allow.
pub fn demo_recipes(filters: &RecipeSearchFilters) -> Vec<RecipeSummary> {
    let allowed: Vec<RecipeSummary> = DEMO_RECIPES
        .iter()
        .map(|recipe| (recipe.summary)())
        .filter(|recipe| match filters.diet {
            Some(Diet::Vegetarian) => recipe.vegetarian,
            Some(Diet::Vegan) => recipe.vegan,
            Some(Diet::GlutenFree) => recipe.gluten_free,
            _ => true,
        })
        .filter(|recipe| match (filters.max_time, recipe.ready_in_minutes) {
            (Some(max), Some(ready)) => ready <= max,
            _ => true,
        })
        .collect();

    let query = filters.query.trim().to_lowercase();
    if query.is_empty() {
        return allowed;
    }

    let matching: Vec<RecipeSummary> = allowed
        .iter()
        .filter(|recipe| recipe.title.to_lowercase().contains(&query))
        .cloned()
        .collect();

    if matching.is_empty() {
        allowed
    } else {
        matching
    }
}

/// Full details for a built-in recipe
pub fn demo_recipe_details(id: u64) -> Option<RecipeDetails> {
    DEMO_RECIPES.iter().find_map(|recipe| {
        let summary = (recipe.summary)();
        (summary.id == id).then(|| RecipeDetails {
            id: summary.id,
            title: summary.title,
            image: summary.image,
            ready_in_minutes: summary.ready_in_minutes,
            servings: summary.servings,
            instructions: Some(recipe.instructions.to_string()),
            ingredients: recipe
                .ingredients
                .iter()
                .map(|line| RecipeIngredient {
                    original: (*line).to_string(),
                    amount: 0.0,
                    unit: String::new(),
                })
                .collect(),
            nutrition: recipe.nutrition,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(target_calories: u32, diet: &str) -> MealPlanRequest {
        MealPlanRequest {
            target_calories,
            diet: Some(Diet::from(diet)),
            ..MealPlanRequest::default()
        }
    }

    fn titles(table: &DietTable) -> Vec<&'static str> {
        table
            .breakfast
            .iter()
            .chain(table.lunch)
            .chain(table.dinner)
            .map(|c| c.0)
            .collect()
    }

    #[test]
    fn test_vegetarian_plan_uses_vegetarian_table() {
        let allowed = titles(&VEGETARIAN_TABLE);
        for seed in 0..25 {
            let plan = DemoGenerator::seeded(seed).generate_meal_plan(&request(2000, "vegetarian"));
            assert_eq!(plan.meals.len(), 3);
            for meal in &plan.meals {
                assert!(allowed.contains(&meal.title.as_str()), "unexpected {}", meal.title);
            }
        }
    }

    #[test]
    fn test_calories_split_evenly() {
        let plan = DemoGenerator::seeded(7).generate_meal_plan(&request(2000, "vegetarian"));
        for meal in &plan.meals {
            assert_eq!(meal.nutrition.calories, 667);
        }
        assert_eq!(plan.nutrients.calories, 2001.0);
    }

    #[test]
    fn test_unknown_diet_uses_default_table() {
        let allowed = titles(&DEFAULT_TABLE);
        let plan = DemoGenerator::seeded(3).generate_meal_plan(&request(1800, "keto"));
        for meal in &plan.meals {
            assert!(allowed.contains(&meal.title.as_str()));
            assert_eq!(meal.nutrition.calories, 600);
        }
        assert_eq!(plan.nutrients.calories, 1800.0);
    }

    #[test]
    fn test_title_and_macros_come_from_same_candidate() {
        for seed in 0..25 {
            let plan = DemoGenerator::seeded(seed).generate_meal_plan(&request(2400, "ketogenic"));
            for meal in &plan.meals {
                let candidate = titles(&KETOGENIC_TABLE)
                    .into_iter()
                    .zip(
                        KETOGENIC_TABLE
                            .breakfast
                            .iter()
                            .chain(KETOGENIC_TABLE.lunch)
                            .chain(KETOGENIC_TABLE.dinner),
                    )
                    .find(|(title, _)| *title == meal.title)
                    .map(|(_, c)| *c)
                    .unwrap();
                assert_eq!(meal.nutrition.protein, candidate.1);
                assert_eq!(meal.nutrition.carbs, candidate.2);
                assert_eq!(meal.nutrition.fat, candidate.3);
            }
        }
    }

    #[test]
    fn test_nutrients_sum_meals() {
        let plan = DemoGenerator::seeded(11).generate_meal_plan(&request(2100, ""));
        let protein: f64 = plan.meals.iter().map(|m| m.nutrition.protein).sum();
        let carbs: f64 = plan.meals.iter().map(|m| m.nutrition.carbs).sum();
        let fat: f64 = plan.meals.iter().map(|m| m.nutrition.fat).sum();
        assert_eq!(plan.nutrients.protein, protein);
        assert_eq!(plan.nutrients.carbohydrates, carbs);
        assert_eq!(plan.nutrients.fat, fat);
        assert_eq!(
            plan.meals.iter().map(|m| m.meal_type).collect::<Vec<_>>(),
            vec![MealType::Breakfast, MealType::Lunch, MealType::Dinner]
        );
    }

    #[test]
    fn test_shopping_list_shape() {
        let list = DemoGenerator::seeded(5).shopping_list();
        assert_eq!(list.len(), 8);
        assert_eq!(list[0].name, "Avocado");
        assert_eq!(list[7].name, "Tomatoes");
        for item in &list {
            assert!((1..=3).contains(&item.amount));
            assert_eq!(item.unit, "pieces");
        }
    }

    #[test]
    fn test_same_seed_same_plan() {
        let a = DemoGenerator::seeded(99).generate_meal_plan(&request(2000, "vegan"));
        let b = DemoGenerator::seeded(99).generate_meal_plan(&request(2000, "vegan"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_missing_target_uses_default() {
        let plan = DemoGenerator::seeded(1).generate_meal_plan(&request(0, ""));
        assert_eq!(plan.meals[0].nutrition.calories, 667);
    }

    #[test]
    fn test_demo_recipe_filters() {
        assert_eq!(demo_recipes(&RecipeSearchFilters::default()).len(), 3);

        let vegan = RecipeSearchFilters {
            diet: Some(Diet::Vegan),
            ..RecipeSearchFilters::default()
        };
        let results = demo_recipes(&vegan);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Quinoa Buddha Bowl");

        let salmon = demo_recipes(&RecipeSearchFilters::with_query("SALMON"));
        assert_eq!(salmon.len(), 1);
        assert_eq!(salmon[0].id, 3);

        let quick = RecipeSearchFilters {
            max_time: Some(25),
            ..RecipeSearchFilters::default()
        };
        assert_eq!(demo_recipes(&quick).len(), 1);
    }

    #[test]
    fn test_unmatched_query_keeps_demo_list_populated() {
        assert_eq!(demo_recipes(&RecipeSearchFilters::with_query("healthy")).len(), 3);

        let vegan_dessert = RecipeSearchFilters {
            query: "dessert".to_string(),
            diet: Some(Diet::Vegan),
            ..RecipeSearchFilters::default()
        };
        let results = demo_recipes(&vegan_dessert);
        assert_eq!(results.len(), 1);
        assert!(results[0].vegan);
    }

    #[test]
    fn test_demo_recipe_details() {
        let details = demo_recipe_details(2).unwrap();
        assert_eq!(details.title, "Quinoa Buddha Bowl");
        assert_eq!(details.ingredients.len(), 4);
        assert!(demo_recipe_details(42).is_none());
    }
}
