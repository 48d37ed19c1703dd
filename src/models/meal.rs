use serde::Serialize;
use tracing::warn;

use crate::classify::{classify_meal, MealClassification};
use crate::models::{Category, Food};
use crate::nutrients;

/// A meal: an ordered list of foods with serving-size-weighted per-100g
/// totals and a category.
///
/// Everything is computed at construction; a `Meal` is immutable
/// afterward. Recomputation means building a new one.
#[derive(Debug, Clone, Serialize)]
pub struct Meal {
    pub foods: Vec<Food>,

    /// Sum of serving sizes in grams.
    pub total_weight: f64,

    // Weighted per-100g totals.
    pub energy_kcal: f64,
    pub energy_kj: f64,
    pub protein: f64,
    pub carbohydrate: f64,
    pub fiber: f64,
    pub sugars: f64,
    pub fat_total: f64,
    pub saturated_fat: f64,
    pub sodium: f64,
    pub calcium: f64,
    pub fvnl_percent: f64,

    pub category: Category,
    pub category_confidence: f64,
    pub category_analysis: MealClassification,

    /// Informational only; warnings never abort a calculation.
    pub category_warnings: Vec<String>,
}

/// Sum of serving sizes.
pub fn total_weight(foods: &[Food]) -> f64 {
    foods.iter().map(|f| f.serving_size).sum()
}

/// Serving-size-weighted average of a nutrient per 100g of combined mass.
///
/// Missing nutrient keys count as 0; zero total weight yields 0. Never
/// fails.
pub fn weighted_per_100g(foods: &[Food], nutrient: &str) -> f64 {
    let weight = total_weight(foods);
    if weight == 0.0 {
        return 0.0;
    }

    let total: f64 = foods
        .iter()
        .map(|f| f.nutrient(nutrient) * f.serving_size / 100.0)
        .sum();

    total / (weight / 100.0)
}

/// Serving-weighted FVNL percentage of the combined mass.
pub fn weighted_fvnl_percent(foods: &[Food]) -> f64 {
    let weight = total_weight(foods);
    if weight == 0.0 {
        return 0.0;
    }

    let fvnl_weight: f64 = foods
        .iter()
        .map(|f| f.serving_size * f.fvnl_percent / 100.0)
        .sum();

    fvnl_weight / weight * 100.0
}

impl Meal {
    /// Build a meal, auto-detecting its category.
    pub fn new(foods: Vec<Food>) -> Self {
        let analysis = classify_meal(&foods);
        Self::build(foods, analysis, Vec::new())
    }

    /// Build a meal with a caller-supplied category, validated against the
    /// detected one. A mismatch only records warnings.
    pub fn with_category(foods: Vec<Food>, category: Category) -> Self {
        let analysis = classify_meal(&foods);
        let mut warnings = Vec::new();

        if analysis.category != category {
            warnings.push(format!(
                "calculated category '{}' differs from assigned '{}'",
                analysis.category, category
            ));
        }
        if analysis.confidence < 0.6 {
            warnings.push(format!(
                "consider using the '{}' category instead",
                analysis.category
            ));
        }

        let mut meal = Self::build(foods, analysis, warnings);
        meal.category = category;
        meal
    }

    fn build(
        foods: Vec<Food>,
        analysis: MealClassification,
        mut warnings: Vec<String>,
    ) -> Self {
        if foods.is_empty() {
            warn!("empty meal constructed");
            warnings.push("empty meal - defaulting to the food category".to_string());
        }

        Self::validate_foods(&foods, &mut warnings);

        let weight = total_weight(&foods);
        if !foods.is_empty() && weight == 0.0 {
            warn!("meal has zero total weight");
            warnings.push("meal has zero total weight".to_string());
        }

        let energy_kcal = weighted_per_100g(&foods, nutrients::ENERGY_KCAL);

        let mut meal = Self {
            total_weight: weight,
            energy_kcal,
            energy_kj: energy_kcal * nutrients::KCAL_TO_KJ,
            protein: weighted_per_100g(&foods, nutrients::PROTEIN),
            carbohydrate: weighted_per_100g(&foods, nutrients::CARBOHYDRATE),
            fiber: weighted_per_100g(&foods, nutrients::FIBRE),
            sugars: weighted_per_100g(&foods, nutrients::SUGARS),
            fat_total: weighted_per_100g(&foods, nutrients::FAT_TOTAL),
            saturated_fat: weighted_per_100g(&foods, nutrients::SATURATED_FAT),
            sodium: weighted_per_100g(&foods, nutrients::SODIUM),
            calcium: weighted_per_100g(&foods, nutrients::CALCIUM),
            fvnl_percent: weighted_fvnl_percent(&foods),
            category: analysis.category,
            category_confidence: analysis.confidence,
            category_analysis: analysis,
            category_warnings: warnings,
            foods,
        };

        meal.validate_values();
        meal
    }

    fn validate_foods(foods: &[Food], warnings: &mut Vec<String>) {
        for (i, food) in foods.iter().enumerate() {
            if food.serving_size <= 0.0 {
                warnings.push(format!(
                    "food {} ('{}'): invalid serving size {} g",
                    i + 1,
                    food.food_name,
                    food.serving_size
                ));
            }
            if food.nutrients.is_empty() {
                warnings.push(format!(
                    "food {} ('{}'): missing nutrient data",
                    i + 1,
                    food.food_name
                ));
            }
        }
    }

    /// Reasonableness checks on the aggregated values. Warnings only.
    fn validate_values(&mut self) {
        if self.energy_kcal > 2000.0 {
            self.category_warnings
                .push(format!("very high energy content: {:.1} kcal/100g", self.energy_kcal));
        }
        if self.protein > 100.0 {
            self.category_warnings
                .push(format!("extremely high protein: {:.1} g/100g", self.protein));
        }
        if self.fat_total > 100.0 {
            self.category_warnings
                .push(format!("extremely high fat: {:.1} g/100g", self.fat_total));
        }
        if self.sodium > 5000.0 {
            self.category_warnings
                .push(format!("extremely high sodium: {:.1} mg/100g", self.sodium));
        }
        if self.fvnl_percent > 100.0 {
            self.category_warnings
                .push(format!("FVNL percent exceeds 100%: {:.1}%", self.fvnl_percent));
        }

        let named = [
            ("energy", self.energy_kcal),
            ("protein", self.protein),
            ("carbohydrate", self.carbohydrate),
            ("fiber", self.fiber),
            ("sugars", self.sugars),
            ("fat", self.fat_total),
            ("saturated fat", self.saturated_fat),
            ("sodium", self.sodium),
            ("calcium", self.calcium),
            ("fvnl_percent", self.fvnl_percent),
        ];
        for (name, value) in named {
            if value < 0.0 {
                self.category_warnings
                    .push(format!("negative {} value: {}", name, value));
            }
        }
    }
}
