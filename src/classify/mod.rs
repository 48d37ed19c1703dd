//! Category classification: per-food group/keyword rules and the
//! nutritional-fitness meal classifier.

pub mod food_rules;
pub mod meal_fitness;

pub use food_rules::classify_food;
pub use meal_fitness::{
    classify_meal, summarize_nutrition, CategoryAlternative, MealClassification,
    MealNutritionSummary,
};
