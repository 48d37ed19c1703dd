use serde::Serialize;
use tracing::debug;

use crate::models::{Food, ProcessingLevel};
use crate::nutrients;

/// Contextual signals derived from a meal, used to adjust thresholds and
/// the final score. Recomputed fresh for each calculation.
#[derive(Debug, Clone, Serialize)]
pub struct NutritionalContext {
    /// 0.5-1.5, 1.0 = baseline. Higher means more filling.
    pub satiety_index: f64,
    pub processing_level: ProcessingLevel,
    /// 0.0-1.0 serving-weighted liquid fraction.
    pub liquid_percentage: f64,
    /// Fiber g/100g, carried for reporting.
    pub fiber_density: f64,
    /// >= 1.0; bonus up to 20% for complete-protein sources.
    pub protein_quality_score: f64,
    /// 0.0-1.0 fraction of FVNL foods that are minimally processed.
    pub fvnl_naturalness: f64,
    pub is_natural_sugar_dominant: bool,
    pub has_added_sugars: bool,
}

impl Default for NutritionalContext {
    fn default() -> Self {
        Self {
            satiety_index: 1.0,
            processing_level: ProcessingLevel::MinimallyProcessed,
            liquid_percentage: 0.0,
            fiber_density: 0.0,
            protein_quality_score: 1.0,
            fvnl_naturalness: 1.0,
            is_natural_sugar_dominant: false,
            has_added_sugars: false,
        }
    }
}

/// Natural vs added sugar split for a meal, per 100g of combined mass.
#[derive(Debug, Clone, Serialize)]
pub struct SugarAnalysis {
    pub total_sugars: f64,
    pub natural_sugars: f64,
    pub added_sugars: f64,
    /// 0-100, share of sugars from natural sources.
    pub natural_percentage: f64,
    /// Per-food provenance, e.g. "Apple, raw (natural)".
    pub sources: Vec<String>,
}

/// Analyze a meal's foods into the contextual signals.
pub fn analyze_context(foods: &[Food], protein: f64, fiber: f64) -> NutritionalContext {
    let liquid = liquid_percentage(foods);
    let satiety = satiety_index(protein, fiber, liquid);
    let processing = processing_level(foods);

    let natural_count = foods
        .iter()
        .filter(|f| {
            f.food_group_id
                .map(|g| nutrients::NATURAL_SUGAR_GROUPS.contains(&g))
                .unwrap_or(false)
        })
        .count();
    let processed_count = foods
        .iter()
        .filter(|f| {
            f.food_group_id
                .map(|g| nutrients::PROCESSED_SUGAR_GROUPS.contains(&g))
                .unwrap_or(false)
        })
        .count();

    let context = NutritionalContext {
        satiety_index: satiety,
        processing_level: processing,
        liquid_percentage: liquid,
        fiber_density: fiber,
        protein_quality_score: protein_quality_score(foods),
        fvnl_naturalness: fvnl_naturalness(foods),
        is_natural_sugar_dominant: natural_count > processed_count,
        has_added_sugars: foods.iter().any(|f| has_added_sugars(&f.name_lower())),
    };

    debug!(
        satiety = context.satiety_index,
        liquid = context.liquid_percentage,
        level = %context.processing_level,
        "analyzed nutritional context"
    );

    context
}

/// Satiety index from protein, fiber and liquid content.
///
/// Only the highest applicable protein and fiber tiers apply; the result
/// is clamped to [0.5, 1.5].
pub fn satiety_index(protein: f64, fiber: f64, liquid_percentage: f64) -> f64 {
    let mut satiety: f64 = 1.0;

    if protein >= 20.0 {
        satiety *= 1.2;
    } else if protein >= 15.0 {
        satiety *= 1.15;
    } else if protein >= 10.0 {
        satiety *= 1.1;
    }

    if fiber >= 10.0 {
        satiety *= 1.2;
    } else if fiber >= 6.0 {
        satiety *= 1.15;
    } else if fiber >= 3.0 {
        satiety *= 1.1;
    }

    if liquid_percentage > 0.5 {
        satiety *= 0.7;
    } else if liquid_percentage > 0.2 {
        satiety *= 0.85;
    }

    satiety.clamp(0.5, 1.5)
}

/// Per-food processing score: 1 = minimally processed, 3 = ultra-processed.
pub(crate) fn food_processing_score(name_lower: &str) -> u8 {
    const MINIMAL: [&str; 4] = ["raw", "fresh", "whole", "natural"];
    const MODERATE: [&str; 4] = ["canned", "frozen", "dried", "cooked"];
    const HEAVY: [&str; 4] = ["processed", "enriched", "flavored", "instant"];

    if MINIMAL.iter().any(|t| name_lower.contains(t)) {
        1
    } else if MODERATE.iter().any(|t| name_lower.contains(t)) {
        2
    } else if HEAVY.iter().any(|t| name_lower.contains(t)) {
        3
    } else {
        2
    }
}

/// Overall processing level: mean per-food score mapped to three bands.
pub fn processing_level(foods: &[Food]) -> ProcessingLevel {
    if foods.is_empty() {
        return ProcessingLevel::MinimallyProcessed;
    }

    let total: u32 = foods
        .iter()
        .map(|f| u32::from(food_processing_score(&f.name_lower())))
        .sum();
    let avg = f64::from(total) / foods.len() as f64;

    if avg <= 1.3 {
        ProcessingLevel::MinimallyProcessed
    } else if avg <= 2.3 {
        ProcessingLevel::Processed
    } else {
        ProcessingLevel::UltraProcessed
    }
}

/// Serving-weighted liquid fraction of the meal.
///
/// A food counts as liquid when its name carries a liquid term or its
/// category is a beverage; soup counts at 0.7 weight.
pub fn liquid_percentage(foods: &[Food]) -> f64 {
    const LIQUID_TERMS: [&str; 5] = ["juice", "drink", "beverage", "milk", "water"];

    let total_weight: f64 = foods.iter().map(|f| f.serving_size).sum();
    if total_weight == 0.0 {
        return 0.0;
    }

    let mut liquid_weight = 0.0;
    for food in foods {
        let name = food.name_lower();
        if LIQUID_TERMS.iter().any(|t| name.contains(t)) || food.category.is_beverage() {
            liquid_weight += food.serving_size;
        } else if name.contains("soup") {
            liquid_weight += food.serving_size * 0.7;
        }
    }

    liquid_weight / total_weight
}

/// Protein quality score: 1.0 plus up to 20% for protein mass coming from
/// complete-protein food groups.
pub fn protein_quality_score(foods: &[Food]) -> f64 {
    let protein_mass = |f: &Food| f.serving_size * f.nutrient(nutrients::PROTEIN) / 100.0;

    let total: f64 = foods.iter().map(protein_mass).sum();
    if total == 0.0 {
        return 1.0;
    }

    let high_quality: f64 = foods
        .iter()
        .filter(|f| {
            f.food_group_id
                .map(|g| nutrients::HIGH_QUALITY_PROTEIN_GROUPS.contains(&g))
                .unwrap_or(false)
        })
        .map(protein_mass)
        .sum();

    1.0 + (high_quality / total) * 0.2
}

/// Fraction of FVNL-group foods that are minimally processed; 1.0 when the
/// meal has no FVNL foods.
pub fn fvnl_naturalness(foods: &[Food]) -> f64 {
    let fvnl_foods: Vec<&Food> = foods.iter().filter(|f| f.is_fvnl_group()).collect();
    if fvnl_foods.is_empty() {
        return 1.0;
    }

    let whole = fvnl_foods
        .iter()
        .filter(|f| food_processing_score(&f.name_lower()) == 1)
        .count();

    whole as f64 / fvnl_foods.len() as f64
}

/// Keyword score for how natural the meal's foods read, 0.0-1.0.
pub fn natural_content_score(foods: &[Food]) -> f64 {
    if foods.is_empty() {
        return 0.5;
    }

    let total: f64 = foods
        .iter()
        .map(|f| {
            let name = f.name_lower();
            if ["fresh", "raw", "whole", "natural", "organic"]
                .iter()
                .any(|t| name.contains(t))
            {
                1.0
            } else if ["fruit", "vegetable", "nut", "seed"].iter().any(|t| name.contains(t)) {
                0.8
            } else if ["processed", "artificial", "synthetic"].iter().any(|t| name.contains(t)) {
                0.2
            } else {
                0.5
            }
        })
        .sum();

    total / foods.len() as f64
}

fn has_added_sugars(name_lower: &str) -> bool {
    const ADDED_SUGAR_TERMS: [&str; 10] = [
        "sweetened",
        "sugar",
        "syrup",
        "honey",
        "flavoured",
        "dessert",
        "candy",
        "chocolate",
        "cake",
        "cookie",
    ];
    ADDED_SUGAR_TERMS.iter().any(|t| name_lower.contains(t))
}

/// True when the food is primarily a natural sugar source: a fruit or
/// vegetable group, or a whole fruit by name (juices excluded).
fn is_natural_sugar_source(food: &Food) -> bool {
    if let Some(group) = food.food_group_id {
        if nutrients::NATURAL_SUGAR_GROUPS.contains(&group) {
            return true;
        }
    }

    const FRUIT_NAMES: [&str; 7] = ["apple", "banana", "orange", "grape", "berry", "peach", "pear"];
    let name = food.name_lower();
    FRUIT_NAMES.iter().any(|t| name.contains(t)) && !name.contains("juice")
}

/// Estimated share of a food's sugars that are naturally occurring.
fn natural_sugar_ratio(food: &Food) -> f64 {
    let name = food.name_lower();

    if let Some(group) = food.food_group_id {
        if nutrients::NATURAL_SUGAR_GROUPS.contains(&group) {
            return 0.9;
        }
        if group == 1 {
            // Lactose is natural.
            return 0.7;
        }
    }

    if name.contains("fruit") && !name.contains("juice") {
        0.8
    } else if name.contains("whole") || name.contains("raw") {
        0.8
    } else if ["candy", "dessert", "cake", "cookie"].iter().any(|t| name.contains(t)) {
        0.1
    } else if name.contains("sweetened") {
        0.3
    } else {
        0.5
    }
}

/// Split the meal's sugars into natural and added fractions per 100g.
pub fn analyze_sugars(foods: &[Food], total_sugars_per_100g: f64, total_weight: f64) -> SugarAnalysis {
    let mut natural_mass = 0.0;
    let mut added_mass = 0.0;
    let mut sources = Vec::new();

    for food in foods {
        let food_sugars = food.nutrient(nutrients::SUGARS) * food.serving_size / 100.0;

        if is_natural_sugar_source(food) {
            natural_mass += food_sugars;
            sources.push(format!("{} (natural)", food.food_name));
        } else {
            let ratio = natural_sugar_ratio(food);
            natural_mass += food_sugars * ratio;
            added_mass += food_sugars * (1.0 - ratio);

            if ratio > 0.5 {
                sources.push(format!("{} (mostly natural)", food.food_name));
            } else {
                sources.push(format!("{} (mostly added)", food.food_name));
            }
        }
    }

    let weight_factor = if total_weight > 0.0 { total_weight / 100.0 } else { 1.0 };
    let combined = natural_mass + added_mass;

    SugarAnalysis {
        total_sugars: total_sugars_per_100g,
        natural_sugars: natural_mass / weight_factor,
        added_sugars: added_mass / weight_factor,
        natural_percentage: if combined > 0.0 { natural_mass / combined * 100.0 } else { 0.0 },
        sources,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_float_eq::assert_float_absolute_eq;
    use std::collections::HashMap;

    fn food(name: &str, serving: f64, group: Option<u32>, per100: &[(&str, f64)]) -> Food {
        let map: HashMap<String, f64> =
            per100.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        Food::new(0, name, serving, map, 0.0, group)
    }

    #[test]
    fn test_satiety_tiers() {
        // Baseline
        assert_float_absolute_eq!(satiety_index(0.0, 0.0, 0.0), 1.0, 1e-9);
        // Highest protein tier only
        assert_float_absolute_eq!(satiety_index(25.0, 0.0, 0.0), 1.2, 1e-9);
        // Middle tiers stack multiplicatively
        assert_float_absolute_eq!(satiety_index(15.0, 6.0, 0.0), 1.15 * 1.15, 1e-9);
        // Liquid penalty
        assert_float_absolute_eq!(satiety_index(0.0, 0.0, 0.6), 0.7, 1e-9);
        assert_float_absolute_eq!(satiety_index(0.0, 0.0, 0.3), 0.85, 1e-9);
        // Clamped at the top
        assert_float_absolute_eq!(satiety_index(25.0, 12.0, 0.0), 1.2 * 1.2, 1e-9);
        assert!(satiety_index(25.0, 12.0, 0.0) <= 1.5);
    }

    #[test]
    fn test_satiety_clamp_bounds() {
        for protein in [0.0, 12.0, 18.0, 30.0] {
            for fiber in [0.0, 4.0, 8.0, 15.0] {
                for liquid in [0.0, 0.3, 0.9] {
                    let s = satiety_index(protein, fiber, liquid);
                    assert!((0.5..=1.5).contains(&s));
                }
            }
        }
    }

    #[test]
    fn test_processing_level_bands() {
        let minimal = vec![
            food("Spinach, raw", 100.0, Some(11), &[]),
            food("Apple, fresh", 100.0, Some(9), &[]),
        ];
        assert_eq!(processing_level(&minimal), ProcessingLevel::MinimallyProcessed);

        let mixed = vec![
            food("Beans, canned", 100.0, Some(16), &[]),
            food("Rice, cooked", 100.0, Some(20), &[]),
        ];
        assert_eq!(processing_level(&mixed), ProcessingLevel::Processed);

        let heavy = vec![
            food("Noodles, instant", 100.0, Some(20), &[]),
            food("Cheese, processed", 100.0, Some(1), &[]),
            food("Drink, flavored", 100.0, Some(14), &[]),
        ];
        assert_eq!(processing_level(&heavy), ProcessingLevel::UltraProcessed);
    }

    #[test]
    fn test_liquid_percentage_weighting() {
        let foods = vec![
            food("Orange juice", 250.0, Some(9), &[]),
            food("Toast, whole wheat", 50.0, Some(18), &[]),
        ];
        assert_float_absolute_eq!(liquid_percentage(&foods), 250.0 / 300.0, 1e-9);

        // Soup counts at 0.7 weight.
        let soup = vec![food("Tomato soup", 100.0, Some(6), &[])];
        assert_float_absolute_eq!(liquid_percentage(&soup), 0.7, 1e-9);

        assert_eq!(liquid_percentage(&[]), 0.0);
    }

    #[test]
    fn test_protein_quality_bonus() {
        let foods = vec![
            food("Chicken breast, roasted", 100.0, Some(5), &[(crate::nutrients::PROTEIN, 31.0)]),
            food("White rice, cooked", 100.0, Some(20), &[(crate::nutrients::PROTEIN, 2.7)]),
        ];
        let score = protein_quality_score(&foods);
        let expected = 1.0 + (31.0 / 33.7) * 0.2;
        assert_float_absolute_eq!(score, expected, 1e-9);

        // No protein at all -> neutral.
        let none = vec![food("Water", 100.0, Some(14), &[])];
        assert_float_absolute_eq!(protein_quality_score(&none), 1.0, 1e-9);
    }

    #[test]
    fn test_fvnl_naturalness() {
        let foods = vec![
            food("Spinach, raw", 100.0, Some(11), &[]),
            food("Peaches, canned in syrup", 100.0, Some(9), &[]),
        ];
        assert_float_absolute_eq!(fvnl_naturalness(&foods), 0.5, 1e-9);

        // No FVNL foods -> 1.0.
        let none = vec![food("Beef, ground", 100.0, Some(13), &[])];
        assert_float_absolute_eq!(fvnl_naturalness(&none), 1.0, 1e-9);
    }

    #[test]
    fn test_sugar_split_natural_source() {
        let foods = vec![food(
            "Apple, raw, with skin",
            200.0,
            Some(9),
            &[(crate::nutrients::SUGARS, 10.0)],
        )];
        let analysis = analyze_sugars(&foods, 10.0, 200.0);
        assert_float_absolute_eq!(analysis.natural_sugars, 10.0, 1e-9);
        assert_float_absolute_eq!(analysis.added_sugars, 0.0, 1e-9);
        assert_float_absolute_eq!(analysis.natural_percentage, 100.0, 1e-9);
        assert_eq!(analysis.sources.len(), 1);
    }

    #[test]
    fn test_sugar_split_mixed_source() {
        // Sweetened item: 30% natural ratio.
        let foods = vec![food(
            "Sweetened granola bar",
            100.0,
            Some(25),
            &[(crate::nutrients::SUGARS, 20.0)],
        )];
        let analysis = analyze_sugars(&foods, 20.0, 100.0);
        assert_float_absolute_eq!(analysis.natural_sugars, 6.0, 1e-9);
        assert_float_absolute_eq!(analysis.added_sugars, 14.0, 1e-9);
        assert!(analysis.sources[0].contains("mostly added"));
    }

    #[test]
    fn test_sugar_split_zero_weight() {
        let analysis = analyze_sugars(&[], 0.0, 0.0);
        assert_eq!(analysis.natural_percentage, 0.0);
        assert_eq!(analysis.natural_sugars, 0.0);
    }

    #[test]
    fn test_context_flags() {
        let foods = vec![
            food("Apple, raw", 150.0, Some(9), &[]),
            food("Chocolate cake", 80.0, Some(18), &[]),
        ];
        let context = analyze_context(&foods, 5.0, 2.0);
        assert!(context.is_natural_sugar_dominant);
        assert!(context.has_added_sugars);
    }
}
