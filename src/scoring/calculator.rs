use serde::Deserialize;
use tracing::debug;

use crate::models::{Category, HsrComponentScore, HsrLevel, Meal, MealHsrResult, ProcessingLevel};
use crate::scoring::context::{analyze_context, analyze_sugars, NutritionalContext, SugarAnalysis};
use crate::scoring::insights;
use crate::scoring::thresholds::{get_thresholds, points_for, HsrThresholds};

/// Feature toggles for a calculation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HsrConfig {
    /// Apply the satiety point adjustment to the final score.
    pub apply_satiety_adjustments: bool,
    /// Apply the processing-level penalty to the final score.
    pub consider_processing_level: bool,
    /// Assemble insight and recommendation lists on the result.
    pub detailed_explanations: bool,
}

impl Default for HsrConfig {
    fn default() -> Self {
        Self {
            apply_satiety_adjustments: true,
            consider_processing_level: true,
            detailed_explanations: true,
        }
    }
}

/// HSR calculator for one meal.
///
/// Context, sugar split and thresholds are derived once at construction;
/// `calculate` is a pure function of them and may be called repeatedly
/// with identical results.
pub struct HsrCalculator<'a> {
    meal: &'a Meal,
    config: HsrConfig,
    context: NutritionalContext,
    sugar_analysis: SugarAnalysis,
    thresholds: HsrThresholds,
}

/// Rate a meal with the default configuration.
pub fn calculate_hsr(meal: &Meal) -> MealHsrResult {
    HsrCalculator::new(meal).calculate()
}

impl<'a> HsrCalculator<'a> {
    pub fn new(meal: &'a Meal) -> Self {
        Self::with_config(meal, HsrConfig::default())
    }

    pub fn with_config(meal: &'a Meal, config: HsrConfig) -> Self {
        let context = analyze_context(&meal.foods, meal.protein, meal.fiber);
        let sugar_analysis = analyze_sugars(&meal.foods, meal.sugars, meal.total_weight);
        let thresholds = get_thresholds(meal.category, &context);

        Self {
            meal,
            config,
            context,
            sugar_analysis,
            thresholds,
        }
    }

    /// The derived context, for callers that want the signals themselves.
    pub fn context(&self) -> &NutritionalContext {
        &self.context
    }

    /// Rate the meal. Never fails for a constructed `Meal`.
    pub fn calculate(&self) -> MealHsrResult {
        let component_score = self.component_score();
        let star_rating = component_score.star_rating;
        let confidence_score = component_score.scientific_confidence;

        let nutrient_analyses = insights::build_nutrient_analyses(
            self.meal,
            &component_score,
            &self.sugar_analysis,
            &self.thresholds,
        );

        let (strengths, concerns, recommendations) = if self.config.detailed_explanations {
            let (strengths, concerns) =
                insights::build_insights(&self.context, &self.sugar_analysis);
            let recommendations =
                insights::build_recommendations(&self.context, &self.sugar_analysis);
            (strengths, concerns, recommendations)
        } else {
            (Vec::new(), Vec::new(), Vec::new())
        };

        MealHsrResult {
            star_rating,
            level: HsrLevel::from_stars(star_rating),
            category: self.meal.category,
            component_score,
            nutrient_analyses,
            strengths,
            concerns,
            recommendations,
            confidence_score,
            warnings: self.meal.category_warnings.clone(),
            total_weight: self.meal.total_weight,
            total_energy_kj: self.meal.energy_kj,
            total_energy_kcal: self.meal.energy_kcal,
        }
    }

    fn component_score(&self) -> HsrComponentScore {
        let t = &self.thresholds;

        // Risk components. Energy is looked up at its satiety-adjusted value.
        let adjusted_energy = self.meal.energy_kcal / self.context.satiety_index;
        let energy_points = points_for(adjusted_energy, &t.energy_density);
        let saturated_fat_points = points_for(self.meal.saturated_fat, &t.saturated_fat);

        let sugar_natural_points = points_for(self.sugar_analysis.natural_sugars, &t.sugar_natural);
        let sugar_added_points = points_for(self.sugar_analysis.added_sugars, &t.sugar_added);
        let sugar_points = blend_sugar_points(sugar_natural_points, sugar_added_points);

        let sodium_points = points_for(self.meal.sodium, &t.sodium);
        let baseline_points = energy_points + saturated_fat_points + sugar_points + sodium_points;

        // Beneficial components.
        let protein_points = points_for(
            self.meal.protein * self.context.protein_quality_score,
            &t.protein,
        );
        let fiber_points = if self.meal.category.is_beverage() {
            0
        } else {
            points_for(self.meal.fiber, &t.fiber)
        };
        let fvnl_points = points_for(
            self.meal.fvnl_percent * self.context.fvnl_naturalness,
            &t.fvnl,
        );
        let modifying_points = protein_points + fiber_points + fvnl_points;

        let satiety_adjustment = self.satiety_adjustment();
        let processing_penalty = self.processing_penalty();
        let naturalness_bonus = self.naturalness_bonus();

        let final_score = compose_final_score(
            baseline_points,
            modifying_points,
            satiety_adjustment,
            processing_penalty,
            naturalness_bonus,
        );
        let star_rating = star_rating_for_score(final_score);

        debug!(
            baseline_points,
            modifying_points, final_score, star_rating, "component scoring complete"
        );

        HsrComponentScore {
            baseline_points,
            energy_points,
            saturated_fat_points,
            sugar_points,
            sodium_points,
            modifying_points,
            protein_points,
            fiber_points,
            fvnl_points,
            final_score,
            star_rating,
            sugar_natural_points,
            sugar_added_points,
            satiety_adjustment,
            processing_penalty,
            naturalness_bonus,
            scientific_confidence: self.confidence(),
        }
    }

    /// Point delta from satiety; negative improves the score.
    fn satiety_adjustment(&self) -> f64 {
        if !self.config.apply_satiety_adjustments {
            return 0.0;
        }
        ((self.context.satiety_index - 1.0) * 2.0).clamp(-3.0, 3.0)
    }

    /// Added points for processing intensity; worsens the score.
    fn processing_penalty(&self) -> f64 {
        if !self.config.consider_processing_level {
            return 0.0;
        }
        match self.context.processing_level {
            ProcessingLevel::MinimallyProcessed => 0.0,
            ProcessingLevel::Processed => 1.0,
            ProcessingLevel::UltraProcessed => 2.5,
        }
    }

    /// Negative bonus for natural content; improves the score.
    fn naturalness_bonus(&self) -> f64 {
        let mut bonus = 0.0;

        if self.context.fvnl_naturalness > 0.8 {
            bonus += 1.0;
        } else if self.context.fvnl_naturalness > 0.6 {
            bonus += 0.5;
        }

        if self.sugar_analysis.natural_percentage > 80.0 {
            bonus += 0.5;
        }

        -bonus
    }

    /// Calculation confidence, floored at 0.5.
    fn confidence(&self) -> f64 {
        let mut confidence: f64 = 1.0;

        if self.meal.protein == 0.0 {
            confidence -= 0.1;
        }
        if self.meal.fiber == 0.0 {
            confidence -= 0.1;
        }
        if self.meal.sodium == 0.0 {
            confidence -= 0.05;
        }

        // Ultra-processed liquid meals are hard to rate accurately.
        if self.context.processing_level == ProcessingLevel::UltraProcessed
            && self.context.liquid_percentage > 0.5
        {
            confidence -= 0.1;
        }

        // A protein-heavy beverage is an unusual combination.
        if self.meal.category == Category::Beverage && self.meal.protein > 10.0 {
            confidence -= 0.15;
        }

        confidence.max(0.5)
    }
}

/// Blend natural and added sugar points; added sugar weighs ~1.86x as much
/// per point. Truncated to an integer.
pub(crate) fn blend_sugar_points(natural_points: i32, added_points: i32) -> i32 {
    (f64::from(natural_points) * 0.7 + f64::from(added_points) * 1.3).trunc() as i32
}

/// Combine point totals and adjustments into the final integer score.
pub(crate) fn compose_final_score(
    baseline_points: i32,
    modifying_points: i32,
    satiety_adjustment: f64,
    processing_penalty: f64,
    naturalness_bonus: f64,
) -> i32 {
    let base = f64::from((baseline_points - modifying_points).max(0));
    let adjusted = base + satiety_adjustment + processing_penalty + naturalness_bonus;
    (adjusted.floor() as i32).max(0)
}

/// Fixed descending step function from score to stars.
pub fn star_rating_for_score(score: i32) -> f64 {
    if score <= 0 {
        5.0
    } else if score <= 5 {
        4.5
    } else if score <= 10 {
        4.0
    } else if score <= 15 {
        3.5
    } else if score <= 20 {
        3.0
    } else if score <= 25 {
        2.5
    } else if score <= 30 {
        2.0
    } else if score <= 35 {
        1.5
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Food};
    use crate::nutrients;
    use assert_float_eq::assert_float_absolute_eq;
    use std::collections::HashMap;

    fn food(name: &str, serving: f64, group: u32, per100: &[(&str, f64)]) -> Food {
        let map: HashMap<String, f64> =
            per100.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        Food::new(0, name, serving, map, 0.0, Some(group))
    }

    fn chicken_meal() -> Meal {
        Meal::new(vec![food(
            "Chicken breast, roasted",
            150.0,
            5,
            &[
                (nutrients::ENERGY_KCAL, 165.0),
                (nutrients::PROTEIN, 31.0),
                (nutrients::FAT_TOTAL, 3.6),
                (nutrients::SATURATED_FAT, 1.0),
                (nutrients::SODIUM, 74.0),
            ],
        )])
    }

    #[test]
    fn test_star_step_function() {
        assert_eq!(star_rating_for_score(0), 5.0);
        assert_eq!(star_rating_for_score(-3), 5.0);
        assert_eq!(star_rating_for_score(5), 4.5);
        assert_eq!(star_rating_for_score(6), 4.0);
        assert_eq!(star_rating_for_score(15), 3.5);
        assert_eq!(star_rating_for_score(35), 1.5);
        assert_eq!(star_rating_for_score(36), 1.0);
        assert_eq!(star_rating_for_score(100), 1.0);
    }

    #[test]
    fn test_compose_final_score_spec_scenario() {
        // baseline 40, modifying 5, no adjustments -> 35 -> 1.5 stars.
        let score = compose_final_score(40, 5, 0.0, 0.0, 0.0);
        assert_eq!(score, 35);
        assert_eq!(star_rating_for_score(score), 1.5);
    }

    #[test]
    fn test_compose_final_score_floors_at_zero() {
        assert_eq!(compose_final_score(3, 10, 0.0, 0.0, 0.0), 0);
        assert_eq!(compose_final_score(0, 0, -3.0, 0.0, -1.5), 0);
    }

    #[test]
    fn test_adjustment_signs() {
        // Positive satiety lowers the score (improves the rating).
        assert_eq!(compose_final_score(20, 0, -2.0, 0.0, 0.0), 18);
        // Processing penalty raises the score (worsens the rating).
        assert_eq!(compose_final_score(20, 0, 0.0, 2.5, 0.0), 22);
        // Naturalness bonus lowers the score.
        assert_eq!(compose_final_score(20, 0, 0.0, 0.0, -1.5), 18);
    }

    #[test]
    fn test_blend_weights_added_sugar_heavier() {
        // Equal points: the added path must weigh at least as much.
        for p in 0..=10 {
            let natural_only = blend_sugar_points(p, 0);
            let added_only = blend_sugar_points(0, p);
            assert!(added_only >= natural_only);
        }
        assert_eq!(blend_sugar_points(3, 3), (3.0 * 0.7 + 3.0 * 1.3) as i32);
    }

    #[test]
    fn test_chicken_breast_scores_well() {
        let meal = chicken_meal();
        assert_eq!(meal.category, Category::Food);

        let result = calculate_hsr(&meal);
        assert!(result.star_rating >= 3.5, "lean protein should rate well");
        // Fiber scoring stays enabled for foods; here fiber is simply 0.
        assert_eq!(result.component_score.fiber_points, 0);
        assert!(result.component_score.protein_points > 0);
    }

    #[test]
    fn test_calculation_is_idempotent() {
        let meal = chicken_meal();
        let calculator = HsrCalculator::new(&meal);
        let a = calculator.calculate();
        let b = calculator.calculate();

        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );

        // And across calculator instances.
        let c = calculate_hsr(&meal);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&c).unwrap()
        );
    }

    #[test]
    fn test_beverage_fiber_forced_zero() {
        let meal = Meal::new(vec![food(
            "Bran smoothie drink",
            300.0,
            14,
            &[
                (nutrients::ENERGY_KCAL, 80.0),
                (nutrients::FIBRE, 12.0),
                (nutrients::SUGARS, 8.0),
            ],
        )]);
        assert!(meal.category.is_beverage());

        let result = calculate_hsr(&meal);
        assert_eq!(result.component_score.fiber_points, 0);
    }

    #[test]
    fn test_confidence_bounds_and_penalties() {
        let meal = chicken_meal();
        let result = calculate_hsr(&meal);
        assert!((0.5..=1.0).contains(&result.confidence_score));

        // All-zero nutrients push confidence down but never below 0.5.
        let sparse = Meal::new(vec![
            food("Water, tap", 200.0, 14, &[]),
            food("Ice, crushed", 100.0, 14, &[]),
        ]);
        let sparse_result = calculate_hsr(&sparse);
        assert!(sparse_result.confidence_score >= 0.5);
        assert!(sparse_result.confidence_score < 1.0);
    }

    #[test]
    fn test_config_toggles_disable_adjustments() {
        let meal = Meal::new(vec![
            food(
                "Noodles, instant",
                100.0,
                20,
                &[(nutrients::ENERGY_KCAL, 450.0), (nutrients::SODIUM, 1500.0)],
            ),
            food(
                "Sausage, processed",
                100.0,
                7,
                &[(nutrients::ENERGY_KCAL, 300.0), (nutrients::SATURATED_FAT, 10.0)],
            ),
        ]);

        let with_penalty = HsrCalculator::new(&meal).calculate();
        let without_penalty = HsrCalculator::with_config(
            &meal,
            HsrConfig {
                apply_satiety_adjustments: false,
                consider_processing_level: false,
                detailed_explanations: false,
            },
        )
        .calculate();

        assert_float_absolute_eq!(without_penalty.component_score.processing_penalty, 0.0, 1e-9);
        assert_float_absolute_eq!(without_penalty.component_score.satiety_adjustment, 0.0, 1e-9);
        assert!(without_penalty.recommendations.is_empty());
        assert!(
            with_penalty.component_score.processing_penalty
                >= without_penalty.component_score.processing_penalty
        );
    }

    #[test]
    fn test_added_sugar_path_scores_higher_than_natural() {
        // Same gram amount through each path: the added-sugar thresholds are
        // stricter and the blend weighs them 1.3 vs 0.7.
        use crate::scoring::thresholds::{
            points_for, ADDED_SUGAR_THRESHOLDS, NATURAL_SUGAR_THRESHOLDS,
        };
        for grams in [2.0, 5.0, 8.0, 12.0, 20.0] {
            let natural = points_for(grams, &NATURAL_SUGAR_THRESHOLDS);
            let added = points_for(grams, &ADDED_SUGAR_THRESHOLDS);
            let natural_blend = blend_sugar_points(natural, 0);
            let added_blend = blend_sugar_points(0, added);
            assert!(
                added_blend >= natural_blend,
                "added path must not score lighter at {} g",
                grams
            );
        }
    }
}
