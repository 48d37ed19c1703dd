use serde::Serialize;
use tracing::debug;

use crate::models::{Category, ProcessingLevel};
use crate::scoring::context::NutritionalContext;

/// Unified energy density thresholds (kcal/100g), same base for all categories.
pub const ENERGY_DENSITY_THRESHOLDS: [f64; 11] =
    [0.0, 50.0, 100.0, 150.0, 200.0, 250.0, 300.0, 400.0, 500.0, 600.0, 700.0];

/// Natural sugar thresholds (g/100g), lenient per WHO guidance.
pub const NATURAL_SUGAR_THRESHOLDS: [f64; 11] =
    [0.0, 5.0, 8.0, 12.0, 15.0, 18.0, 22.0, 25.0, 28.0, 32.0, 35.0];

/// Added sugar thresholds (g/100g), strict per WHO free-sugar guidance.
pub const ADDED_SUGAR_THRESHOLDS: [f64; 11] =
    [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 8.0, 10.0, 12.0, 15.0];

/// Saturated fat thresholds (g/100g).
pub const SATURATED_FAT_THRESHOLDS: [f64; 11] =
    [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 7.0, 9.0, 12.0, 15.0, 20.0];

/// Sodium thresholds (mg/100g).
pub const SODIUM_THRESHOLDS: [f64; 11] =
    [0.0, 100.0, 200.0, 300.0, 400.0, 500.0, 600.0, 800.0, 1000.0, 1200.0, 1500.0];

/// FVNL content thresholds (%).
pub const FVNL_THRESHOLDS: [f64; 11] =
    [0.0, 25.0, 40.0, 50.0, 60.0, 67.0, 75.0, 80.0, 90.0, 95.0, 100.0];

/// Protein thresholds (g/100g).
pub const PROTEIN_THRESHOLDS: [f64; 11] =
    [0.0, 3.0, 6.0, 10.0, 15.0, 20.0, 25.0, 30.0, 35.0, 40.0, 50.0];

/// Fiber thresholds (g/100g).
pub const FIBER_THRESHOLDS: [f64; 11] =
    [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 8.0, 10.0, 12.0, 15.0];

/// Score thresholds for star conversion.
pub const STAR_RATING_THRESHOLDS: [f64; 11] =
    [-10.0, -5.0, 0.0, 5.0, 10.0, 15.0, 20.0, 25.0, 30.0, 35.0, 40.0];

/// A full threshold set for one calculation.
///
/// Every list is ascending; produced fresh per calculation and read-only
/// afterward.
#[derive(Debug, Clone, Serialize)]
pub struct HsrThresholds {
    pub energy_density: Vec<f64>,
    pub sugar_natural: Vec<f64>,
    pub sugar_added: Vec<f64>,
    pub saturated_fat: Vec<f64>,
    pub sodium: Vec<f64>,
    pub fvnl: Vec<f64>,
    pub protein: Vec<f64>,
    pub fiber: Vec<f64>,
    pub star_rating: Vec<f64>,
    /// Every category starts from the same baseline.
    pub base_stars: f64,
}

/// Points for a value against an ascending threshold list.
///
/// Bisect-left tie rule: a value equal to a threshold counts as having
/// reached it. Capped at the highest index; an empty or sentinel-infinite
/// list always yields 0.
pub fn points_for(value: f64, thresholds: &[f64]) -> i32 {
    if thresholds.is_empty() || thresholds[0].is_infinite() {
        return 0;
    }
    let idx = thresholds.partition_point(|&t| t < value);
    idx.min(thresholds.len() - 1) as i32
}

/// Produce thresholds adjusted for context, then for category.
pub fn get_thresholds(category: Category, context: &NutritionalContext) -> HsrThresholds {
    let mut t = HsrThresholds {
        energy_density: ENERGY_DENSITY_THRESHOLDS.to_vec(),
        sugar_natural: NATURAL_SUGAR_THRESHOLDS.to_vec(),
        sugar_added: ADDED_SUGAR_THRESHOLDS.to_vec(),
        saturated_fat: SATURATED_FAT_THRESHOLDS.to_vec(),
        sodium: SODIUM_THRESHOLDS.to_vec(),
        fvnl: FVNL_THRESHOLDS.to_vec(),
        protein: PROTEIN_THRESHOLDS.to_vec(),
        fiber: FIBER_THRESHOLDS.to_vec(),
        star_rating: STAR_RATING_THRESHOLDS.to_vec(),
        base_stars: 0.0,
    };

    apply_contextual_adjustments(&mut t, context);
    apply_category_adjustments(&mut t, category);
    t
}

/// Scale a threshold list, truncating to whole numbers.
fn scale_trunc(thresholds: &mut [f64], factor: f64) {
    for t in thresholds {
        *t = (*t * factor).trunc();
    }
}

fn apply_contextual_adjustments(t: &mut HsrThresholds, context: &NutritionalContext) {
    // Higher satiety -> more lenient energy thresholds.
    if context.satiety_index != 1.0 {
        scale_trunc(&mut t.energy_density, context.satiety_index);
        debug!(factor = context.satiety_index, "satiety adjustment on energy thresholds");
    }

    // Ultra-processed meals face stricter added-sugar thresholds.
    if context.processing_level == ProcessingLevel::UltraProcessed {
        scale_trunc(&mut t.sugar_added, 0.8);
        debug!("ultra-processed penalty on added sugar thresholds");
    }

    // More liquid -> stricter energy and natural sugar, up to 30%.
    if context.liquid_percentage > 0.3 {
        let liquid_factor = 1.0 - context.liquid_percentage * 0.3;
        scale_trunc(&mut t.energy_density, liquid_factor);
        scale_trunc(&mut t.sugar_natural, liquid_factor);
        debug!(factor = liquid_factor, "liquid adjustment on energy and natural sugar");
    }

    // High-quality protein reaches higher points earlier.
    if context.protein_quality_score > 1.0 {
        for p in &mut t.protein {
            *p = (*p / context.protein_quality_score).trunc();
        }
        debug!(
            factor = context.protein_quality_score,
            "protein quality boost on protein thresholds"
        );
    }
}

fn apply_category_adjustments(t: &mut HsrThresholds, category: Category) {
    match category {
        // Cheese expects higher protein; shift its protein scale down.
        Category::Cheese => {
            for p in &mut t.protein {
                *p = (*p - 2.0).max(0.0);
            }
        }
        // Beverages never score fiber.
        Category::Beverage | Category::DairyBeverage => {
            for f in &mut t.fiber {
                *f = f64::INFINITY;
            }
        }
        // Oils are inherently energy-dense; tolerate more energy.
        Category::OilsAndSpreads => {
            for e in &mut t.energy_density {
                *e += 50.0;
            }
        }
        Category::Food | Category::DairyFood => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neutral_context() -> NutritionalContext {
        NutritionalContext::default()
    }

    #[test]
    fn test_points_lookup_basic() {
        let t = ENERGY_DENSITY_THRESHOLDS;
        assert_eq!(points_for(0.0, &t), 0);
        assert_eq!(points_for(49.9, &t), 1);
        // Equal to a threshold counts as reached.
        assert_eq!(points_for(50.0, &t), 1);
        assert_eq!(points_for(50.1, &t), 2);
        assert_eq!(points_for(700.0, &t), 10);
        // Capped at the last index.
        assert_eq!(points_for(5000.0, &t), 10);
    }

    #[test]
    fn test_points_lookup_monotonic() {
        let t = SODIUM_THRESHOLDS;
        let mut prev = points_for(0.0, &t);
        let mut v = 0.0;
        while v < 2000.0 {
            let p = points_for(v, &t);
            assert!(p >= prev, "points decreased at {}", v);
            assert!((0..=10).contains(&p));
            prev = p;
            v += 7.3;
        }
    }

    #[test]
    fn test_points_lookup_degenerate_lists() {
        assert_eq!(points_for(100.0, &[]), 0);
        assert_eq!(points_for(100.0, &[f64::INFINITY; 11]), 0);
    }

    #[test]
    fn test_satiety_scales_energy() {
        let context = NutritionalContext {
            satiety_index: 1.2,
            ..neutral_context()
        };
        let t = get_thresholds(Category::Food, &context);
        // 50 * 1.2 = 60, truncated.
        assert_eq!(t.energy_density[1], 60.0);
        assert_eq!(t.energy_density[10], 840.0);
        // Other scales untouched.
        assert_eq!(t.sodium, SODIUM_THRESHOLDS.to_vec());
    }

    #[test]
    fn test_ultra_processed_tightens_added_sugar() {
        let context = NutritionalContext {
            processing_level: ProcessingLevel::UltraProcessed,
            ..neutral_context()
        };
        let t = get_thresholds(Category::Food, &context);
        // 15 * 0.8 = 12; 1 * 0.8 truncates to 0.
        assert_eq!(t.sugar_added[10], 12.0);
        assert_eq!(t.sugar_added[1], 0.0);
    }

    #[test]
    fn test_liquid_tightens_energy_and_natural_sugar() {
        let context = NutritionalContext {
            liquid_percentage: 1.0,
            ..neutral_context()
        };
        let t = get_thresholds(Category::Food, &context);
        // Factor 0.7: 700 -> 489 (after trunc), 35 -> 24.
        assert_eq!(t.energy_density[10], (700.0_f64 * 0.7).trunc());
        assert_eq!(t.sugar_natural[10], (35.0_f64 * 0.7).trunc());
    }

    #[test]
    fn test_protein_quality_lowers_protein_thresholds() {
        let context = NutritionalContext {
            protein_quality_score: 1.2,
            ..neutral_context()
        };
        let t = get_thresholds(Category::Food, &context);
        assert_eq!(t.protein[10], (50.0_f64 / 1.2).trunc());
        assert!(t.protein[5] < PROTEIN_THRESHOLDS[5]);
    }

    #[test]
    fn test_cheese_protein_shift() {
        let t = get_thresholds(Category::Cheese, &neutral_context());
        assert_eq!(t.protein[0], 0.0);
        assert_eq!(t.protein[1], 1.0);
        assert_eq!(t.protein[10], 48.0);
    }

    #[test]
    fn test_beverage_fiber_disabled() {
        for cat in [Category::Beverage, Category::DairyBeverage] {
            let t = get_thresholds(cat, &neutral_context());
            assert!(t.fiber.iter().all(|f| f.is_infinite()));
            assert_eq!(points_for(50.0, &t.fiber), 0);
        }
    }

    #[test]
    fn test_oils_energy_tolerance() {
        let t = get_thresholds(Category::OilsAndSpreads, &neutral_context());
        assert_eq!(t.energy_density[0], 50.0);
        assert_eq!(t.energy_density[10], 750.0);
    }

    #[test]
    fn test_lists_stay_ascending() {
        let context = NutritionalContext {
            satiety_index: 1.35,
            processing_level: ProcessingLevel::UltraProcessed,
            liquid_percentage: 0.9,
            protein_quality_score: 1.18,
            ..neutral_context()
        };
        for cat in Category::ALL {
            let t = get_thresholds(cat, &context);
            for list in [
                &t.energy_density,
                &t.sugar_natural,
                &t.sugar_added,
                &t.saturated_fat,
                &t.sodium,
                &t.fvnl,
                &t.protein,
                &t.fiber,
                &t.star_rating,
            ] {
                for pair in list.windows(2) {
                    assert!(pair[0] <= pair[1], "list not ascending for {:?}", cat);
                }
            }
        }
    }
}
