use std::collections::HashMap;

use serde::Serialize;

use crate::classify::classify_food;
use crate::models::category::{Category, CategorySource};

/// A single food with nutrient data per 100g and a fixed serving size.
///
/// Classification runs once at construction; the record is immutable
/// afterward. Reassigning the category produces a new value.
#[derive(Debug, Clone, Serialize)]
pub struct Food {
    pub food_id: i64,
    pub food_name: String,

    /// Serving size in grams. Expected > 0; zero contributes nothing to a
    /// meal and triggers a warning there.
    pub serving_size: f64,

    /// Nutrient name -> amount per 100g.
    pub nutrients: HashMap<String, f64>,

    /// Fruit/vegetable/nut/legume content, 0-100, naturalness-adjusted.
    pub fvnl_percent: f64,

    /// CNF food group code, when the upstream database supplied one.
    pub food_group_id: Option<u32>,

    pub category: Category,
    pub category_confidence: f64,
    pub category_source: CategorySource,
}

impl Food {
    /// Build a food and classify it from its food group and name.
    ///
    /// Without a food group the category falls back to `Food` at low
    /// confidence, matching how unmapped database rows are treated.
    pub fn new(
        food_id: i64,
        food_name: impl Into<String>,
        serving_size: f64,
        nutrients: HashMap<String, f64>,
        fvnl_percent: f64,
        food_group_id: Option<u32>,
    ) -> Self {
        let food_name = food_name.into();

        let (category, category_confidence, category_source) = match food_group_id {
            Some(group_id) => {
                let category = classify_food(group_id, &food_name);
                (category, 0.9, CategorySource::AutoAssigned)
            }
            None => (Category::Food, 0.3, CategorySource::Fallback),
        };

        Self {
            food_id,
            food_name,
            serving_size,
            nutrients,
            fvnl_percent,
            food_group_id,
            category,
            category_confidence,
            category_source,
        }
    }

    /// Replace the category by hand, returning the updated food.
    pub fn with_category(mut self, category: Category, confidence: f64) -> Self {
        self.category = category;
        self.category_confidence = confidence;
        self.category_source = CategorySource::Manual;
        self
    }

    /// Mark the category as an error fallback (e.g. an unparseable
    /// category string in an input file).
    pub fn with_error_fallback(mut self) -> Self {
        self.category = Category::Food;
        self.category_confidence = 0.3;
        self.category_source = CategorySource::ErrorFallback;
        self
    }

    /// Nutrient amount per 100g, 0 when absent.
    #[inline]
    pub fn nutrient(&self, name: &str) -> f64 {
        self.nutrients.get(name).copied().unwrap_or(0.0)
    }

    /// Lowercased name for keyword heuristics.
    #[inline]
    pub fn name_lower(&self) -> String {
        self.food_name.to_lowercase()
    }

    /// True when the food belongs to a fruit/vegetable/nut/legume group.
    pub fn is_fvnl_group(&self) -> bool {
        self.food_group_id
            .map(|g| crate::nutrients::FVNL_GROUPS.contains(&g))
            .unwrap_or(false)
    }
}
