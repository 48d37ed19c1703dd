//! Food lookup seam and caching.
//!
//! The engine consumes `Food` records from an external database; this
//! module defines the trait boundary, an in-memory implementation, and an
//! explicit injected cache (no process-global state).

use std::collections::HashMap;
use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use lru::LruCache;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{HsrError, Result};
use crate::fvnl::estimate_fvnl_percent;
use crate::models::{Category, Food};

/// A provider of food records given an id and serving size.
pub trait FoodSource {
    fn fetch(&self, food_id: i64, serving_size: f64) -> Result<Food>;
}

/// Raw food description as found in a meal file or seeded into a
/// `MemoryFoodSource`.
#[derive(Debug, Clone, Deserialize)]
pub struct FoodRecord {
    pub food_id: i64,
    pub food_name: String,
    #[serde(default)]
    pub serving_size: f64,
    /// Nutrient name -> amount per 100g.
    #[serde(default)]
    pub nutrients: HashMap<String, f64>,
    /// Estimated from the name and group when absent.
    #[serde(default)]
    pub fvnl_percent: Option<f64>,
    #[serde(default)]
    pub food_group_id: Option<u32>,
    /// Optional explicit category (wire code or snake_case name).
    #[serde(default)]
    pub category: Option<String>,
}

impl FoodRecord {
    /// Materialize the record into a classified `Food` at a serving size.
    pub fn to_food(&self, serving_size: f64) -> Food {
        let fvnl = self
            .fvnl_percent
            .unwrap_or_else(|| estimate_fvnl_percent(&self.food_name, self.food_group_id));

        let food = Food::new(
            self.food_id,
            self.food_name.clone(),
            serving_size,
            self.nutrients.clone(),
            fvnl,
            self.food_group_id,
        );

        match &self.category {
            None => food,
            Some(raw) => match Category::parse(raw) {
                Some(category) => food.with_category(category, 1.0),
                None => {
                    warn!(category = raw.as_str(), food = self.food_name.as_str(),
                        "unrecognized category string, using food fallback");
                    food.with_error_fallback()
                }
            },
        }
    }
}

/// In-memory food database keyed by id.
pub struct MemoryFoodSource {
    records: HashMap<i64, FoodRecord>,
}

impl MemoryFoodSource {
    pub fn new(records: Vec<FoodRecord>) -> Self {
        let records = records.into_iter().map(|r| (r.food_id, r)).collect();
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FoodSource for MemoryFoodSource {
    fn fetch(&self, food_id: i64, serving_size: f64) -> Result<Food> {
        self.records
            .get(&food_id)
            .map(|r| r.to_food(serving_size))
            .ok_or(HsrError::FoodNotFound(food_id))
    }
}

/// Bounded cache in front of a `FoodSource`, keyed by
/// `(food_id, serving_size)`.
///
/// Entries are immutable once stored; the lock makes the cache safe to
/// share between readers. Owned by the caller, never a global.
pub struct CachedFoodSource<S> {
    inner: S,
    cache: Mutex<LruCache<(i64, u64), Food>>,
}

impl<S: FoodSource> CachedFoodSource<S> {
    pub fn new(inner: S, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).expect("nonzero after max(1)");
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<(i64, u64), Food>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S: FoodSource> FoodSource for CachedFoodSource<S> {
    fn fetch(&self, food_id: i64, serving_size: f64) -> Result<Food> {
        let key = (food_id, serving_size.to_bits());

        if let Some(food) = self.lock().get(&key) {
            debug!(food_id, serving_size, "food cache hit");
            return Ok(food.clone());
        }

        let food = self.inner.fetch(food_id, serving_size)?;
        self.lock().put(key, food.clone());
        Ok(food)
    }
}

/// Load a meal description (a JSON array of food records) from a file.
///
/// An empty list is the one input rejected here; everything else degrades
/// to warnings during meal construction.
pub fn load_meal_file<P: AsRef<Path>>(path: P) -> Result<Vec<Food>> {
    let content = fs::read_to_string(path)?;
    parse_meal_json(&content)
}

/// Parse a meal description from JSON text.
pub fn parse_meal_json(content: &str) -> Result<Vec<Food>> {
    let records: Vec<FoodRecord> = serde_json::from_str(content)?;
    if records.is_empty() {
        return Err(HsrError::EmptyMeal);
    }

    Ok(records.iter().map(|r| r.to_food(r.serving_size)).collect())
}
