use serde::Serialize;
use tracing::{debug, info};

use crate::models::meal::{total_weight, weighted_per_100g};
use crate::models::{Category, Food, ProcessingLevel};
use crate::nutrients;
use crate::scoring::context::{
    liquid_percentage, natural_content_score, processing_level, satiety_index,
};

/// Fitness gap under which a category counts as conflicting with the top one.
const CONFLICT_WINDOW: f64 = 0.15;

/// Aggregated view of a meal used for category fitness scoring.
#[derive(Debug, Clone, Serialize)]
pub struct MealNutritionSummary {
    pub energy_kcal: f64,
    pub protein: f64,
    pub fat_total: f64,
    pub saturated_fat: f64,
    pub carbohydrates: f64,
    pub sugars: f64,
    pub fiber: f64,
    pub sodium: f64,
    pub total_weight: f64,
    pub liquid_percentage: f64,
    pub processing_level: ProcessingLevel,
    pub natural_content_score: f64,
    pub satiety_index: f64,
}

/// Outcome of classifying a meal, with the evidence behind the decision.
#[derive(Debug, Clone, Serialize)]
pub struct MealClassification {
    pub category: Category,
    pub confidence: f64,
    pub reasoning: Vec<String>,
    pub rationale: String,
    /// Other categories with fitness >= 0.5, best first.
    pub alternatives: Vec<CategoryAlternative>,
    /// Fitness per category, best first.
    pub fitness: Vec<(Category, f64)>,
    pub nutrition: MealNutritionSummary,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryAlternative {
    pub category: Category,
    pub fitness: f64,
    pub reason: String,
}

enum LiquidBound {
    Min(f64),
    Max(f64),
}

enum ProcessingTolerance {
    Any,
    Processed,
}

/// Expected nutritional profile for a category.
struct CategoryProfile {
    category: Category,
    energy_range: (f64, f64),
    protein_range: (f64, f64),
    fat_range: (f64, f64),
    liquid_bound: LiquidBound,
    tolerance: ProcessingTolerance,
}

static PROFILES: [CategoryProfile; 6] = [
    CategoryProfile {
        category: Category::Beverage,
        energy_range: (0.0, 200.0),
        protein_range: (0.0, 3.0),
        fat_range: (0.0, 1.0),
        liquid_bound: LiquidBound::Min(0.8),
        tolerance: ProcessingTolerance::Processed,
    },
    CategoryProfile {
        category: Category::DairyBeverage,
        energy_range: (30.0, 150.0),
        protein_range: (2.0, 8.0),
        fat_range: (0.0, 6.0),
        liquid_bound: LiquidBound::Min(0.7),
        tolerance: ProcessingTolerance::Processed,
    },
    CategoryProfile {
        category: Category::Food,
        energy_range: (50.0, 800.0),
        protein_range: (0.0, 50.0),
        fat_range: (0.0, 50.0),
        liquid_bound: LiquidBound::Max(0.3),
        tolerance: ProcessingTolerance::Any,
    },
    CategoryProfile {
        category: Category::DairyFood,
        energy_range: (50.0, 400.0),
        protein_range: (3.0, 30.0),
        fat_range: (0.0, 25.0),
        liquid_bound: LiquidBound::Max(0.2),
        tolerance: ProcessingTolerance::Processed,
    },
    CategoryProfile {
        category: Category::Cheese,
        energy_range: (200.0, 450.0),
        protein_range: (10.0, 35.0),
        fat_range: (15.0, 35.0),
        liquid_bound: LiquidBound::Max(0.1),
        tolerance: ProcessingTolerance::Processed,
    },
    CategoryProfile {
        category: Category::OilsAndSpreads,
        energy_range: (300.0, 900.0),
        protein_range: (0.0, 5.0),
        fat_range: (30.0, 100.0),
        liquid_bound: LiquidBound::Max(0.2),
        tolerance: ProcessingTolerance::Any,
    },
];

fn profile_for(category: Category) -> &'static CategoryProfile {
    PROFILES
        .iter()
        .find(|p| p.category == category)
        .expect("profile exists for every category")
}

/// Summarize a meal's nutrition for fitness evaluation.
pub fn summarize_nutrition(foods: &[Food]) -> MealNutritionSummary {
    let weight = total_weight(foods);
    let protein = weighted_per_100g(foods, nutrients::PROTEIN);
    let fiber = weighted_per_100g(foods, nutrients::FIBRE);
    let liquid = liquid_percentage(foods);

    MealNutritionSummary {
        energy_kcal: weighted_per_100g(foods, nutrients::ENERGY_KCAL),
        protein,
        fat_total: weighted_per_100g(foods, nutrients::FAT_TOTAL),
        saturated_fat: weighted_per_100g(foods, nutrients::SATURATED_FAT),
        carbohydrates: weighted_per_100g(foods, nutrients::CARBOHYDRATE),
        sugars: weighted_per_100g(foods, nutrients::SUGARS),
        fiber,
        sodium: weighted_per_100g(foods, nutrients::SODIUM),
        total_weight: weight,
        liquid_percentage: liquid,
        processing_level: processing_level(foods),
        natural_content_score: natural_content_score(foods),
        satiety_index: satiety_index(protein, fiber, liquid),
    }
}

/// Score how well the meal fits a category's profile, 0.0-1.0.
fn category_fitness(profile: &CategoryProfile, n: &MealNutritionSummary) -> f64 {
    let mut score = 0.0;
    let mut max_score = 0.0;

    // Energy fit, linearly penalized outside the range.
    let (energy_min, energy_max) = profile.energy_range;
    if (energy_min..=energy_max).contains(&n.energy_kcal) {
        score += 20.0;
    } else if n.energy_kcal < energy_min {
        score += (20.0 - (energy_min - n.energy_kcal) / 10.0).max(0.0);
    } else {
        score += (20.0 - (n.energy_kcal - energy_max) / 20.0).max(0.0);
    }
    max_score += 20.0;

    // Protein fit.
    let (protein_min, protein_max) = profile.protein_range;
    if (protein_min..=protein_max).contains(&n.protein) {
        score += 15.0;
    } else if n.protein < protein_min {
        score += (15.0 - (protein_min - n.protein) * 2.0).max(0.0);
    } else {
        score += (15.0 - (n.protein - protein_max) / 2.0).max(0.0);
    }
    max_score += 15.0;

    // Fat fit.
    let (fat_min, fat_max) = profile.fat_range;
    if (fat_min..=fat_max).contains(&n.fat_total) {
        score += 15.0;
    } else if n.fat_total < fat_min {
        score += (15.0 - (fat_min - n.fat_total) * 2.0).max(0.0);
    } else {
        score += (15.0 - (n.fat_total - fat_max) / 3.0).max(0.0);
    }
    max_score += 15.0;

    // Liquid fraction fit: floor for liquid categories, ceiling for solid.
    match profile.liquid_bound {
        LiquidBound::Min(min) => {
            if n.liquid_percentage >= min {
                score += 25.0;
            } else {
                score += n.liquid_percentage / min * 25.0;
            }
        }
        LiquidBound::Max(max) => {
            if n.liquid_percentage <= max {
                score += 25.0;
            } else {
                let excess = n.liquid_percentage - max;
                score += (25.0 - excess * 50.0).max(0.0);
            }
        }
    }
    max_score += 25.0;

    // Processing tolerance.
    match profile.tolerance {
        ProcessingTolerance::Any => score += 15.0,
        ProcessingTolerance::Processed => {
            if n.processing_level == ProcessingLevel::UltraProcessed {
                score += 10.0;
            } else {
                score += 15.0;
            }
        }
    }
    max_score += 15.0;

    // Category-specific bonus, counted in the denominator only when earned.
    let bonus = match profile.category {
        Category::Cheese if n.protein >= 15.0 && n.fat_total >= 15.0 => true,
        Category::Beverage | Category::DairyBeverage if n.liquid_percentage > 0.8 => true,
        Category::OilsAndSpreads if n.fat_total > 50.0 => true,
        _ => false,
    };
    if bonus {
        score += 10.0;
        max_score += 10.0;
    }

    score / max_score
}

/// A tie-break strategy: given the conflicting candidates (top excluded,
/// best first) and the nutrition summary, pick a winner or pass.
type TieBreakRule = (&'static str, fn(&[Category], &MealNutritionSummary) -> Option<Category>);

fn liquid_dominance(candidates: &[Category], n: &MealNutritionSummary) -> Option<Category> {
    if n.liquid_percentage > 0.6 {
        candidates.iter().copied().find(Category::is_beverage)
    } else {
        None
    }
}

fn protein_fat_profile(candidates: &[Category], n: &MealNutritionSummary) -> Option<Category> {
    if n.protein >= 15.0 && n.fat_total >= 15.0 {
        candidates
            .iter()
            .copied()
            .find(|c| matches!(c, Category::Cheese | Category::DairyFood))
    } else {
        None
    }
}

fn energy_density(candidates: &[Category], n: &MealNutritionSummary) -> Option<Category> {
    if n.energy_kcal > 500.0 && n.fat_total > 40.0 {
        candidates
            .iter()
            .copied()
            .find(|c| *c == Category::OilsAndSpreads)
    } else {
        None
    }
}

fn inclusive_default(candidates: &[Category], _n: &MealNutritionSummary) -> Option<Category> {
    candidates.iter().copied().find(|c| *c == Category::Food)
}

/// Tie-break rules in priority order; the first non-None result wins.
const TIE_BREAK_RULES: [TieBreakRule; 4] = [
    ("liquid dominance", liquid_dominance),
    ("protein-fat profile", protein_fat_profile),
    ("energy density", energy_density),
    ("inclusive default", inclusive_default),
];

/// Classify a meal of two or more foods by nutritional fitness.
///
/// Single-food meals inherit the food's category at full confidence; empty
/// meals fall back to `Food` at zero confidence. Never fails.
pub fn classify_meal(foods: &[Food]) -> MealClassification {
    if foods.is_empty() {
        let mut result = fallback_classification("empty meal");
        result.confidence = 0.0;
        return result;
    }

    if foods.len() == 1 {
        let food = &foods[0];
        let nutrition = summarize_nutrition(foods);
        return MealClassification {
            category: food.category,
            confidence: 1.0,
            reasoning: vec!["single food keeps its assigned category".to_string()],
            rationale: format!(
                "Single-food meal; '{}' is already classified as {}.",
                food.food_name, food.category
            ),
            alternatives: Vec::new(),
            fitness: vec![(food.category, 1.0)],
            nutrition,
            warnings: Vec::new(),
        };
    }

    let nutrition = summarize_nutrition(foods);
    let mut warnings = Vec::new();
    if nutrition.total_weight == 0.0 {
        warnings.push("meal has zero total weight".to_string());
    }

    // Fitness per category, best first.
    let mut fitness: Vec<(Category, f64)> = PROFILES
        .iter()
        .map(|p| (p.category, category_fitness(p, &nutrition)))
        .collect();
    fitness.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let (top_category, top_score) = fitness[0];
    let conflicts: Vec<Category> = fitness[1..]
        .iter()
        .filter(|(_, s)| top_score - s < CONFLICT_WINDOW)
        .map(|(c, _)| *c)
        .collect();

    let mut reasoning = Vec::new();
    let mut category = top_category;

    if !conflicts.is_empty() {
        debug!(?top_category, ?conflicts, "category conflict detected");
        for (name, rule) in TIE_BREAK_RULES {
            if let Some(winner) = rule(&conflicts, &nutrition) {
                reasoning.push(format!("tie-break applied: {}", name));
                category = winner;
                break;
            }
        }
    }

    let chosen_fitness = fitness
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, s)| *s)
        .unwrap_or(top_score);

    reasoning.insert(
        0,
        format!("best nutritional profile match (fitness {:.2})", chosen_fitness),
    );
    append_category_reasoning(&mut reasoning, category, &nutrition);

    let confidence = classification_confidence(category, chosen_fitness, &nutrition);
    let alternatives = find_alternatives(category, chosen_fitness, &fitness);

    info!(%category, confidence, "meal classified");

    MealClassification {
        category,
        confidence,
        reasoning,
        rationale: rationale_for(category, &nutrition),
        alternatives,
        fitness,
        nutrition,
        warnings,
    }
}

fn fallback_classification(reason: &str) -> MealClassification {
    MealClassification {
        category: Category::Food,
        confidence: 0.3,
        reasoning: vec![reason.to_string()],
        rationale: format!("Fallback categorization: {}", reason),
        alternatives: Vec::new(),
        fitness: Vec::new(),
        nutrition: summarize_nutrition(&[]),
        warnings: vec![format!("{} - defaulting to the food category", reason)],
    }
}

/// Confidence = chosen fitness, plus consistency bonuses, minus
/// data-quality penalties, clamped to [0.1, 1.0].
fn classification_confidence(
    category: Category,
    fitness: f64,
    n: &MealNutritionSummary,
) -> f64 {
    let profile = profile_for(category);
    let mut confidence = fitness;

    let (energy_min, energy_max) = profile.energy_range;
    if (energy_min..=energy_max).contains(&n.energy_kcal) {
        confidence += 0.1;
    }

    let liquid_ok = match profile.liquid_bound {
        LiquidBound::Min(min) => n.liquid_percentage >= min,
        LiquidBound::Max(max) => n.liquid_percentage <= max,
    };
    if liquid_ok {
        confidence += 0.1;
    }

    if matches!(profile.tolerance, ProcessingTolerance::Any) {
        confidence += 0.05;
    }

    if n.protein == 0.0 {
        confidence -= 0.05;
    }
    if n.fiber == 0.0 {
        confidence -= 0.03;
    }

    confidence.clamp(0.1, 1.0)
}

fn find_alternatives(
    chosen: Category,
    chosen_fitness: f64,
    fitness: &[(Category, f64)],
) -> Vec<CategoryAlternative> {
    fitness
        .iter()
        .filter(|(c, s)| *c != chosen && *s >= 0.5)
        .map(|(c, s)| {
            let gap = chosen_fitness - s;
            let strength = if gap < 0.2 {
                "strong alternative"
            } else if gap < 0.4 {
                "viable alternative"
            } else {
                "possible alternative"
            };
            CategoryAlternative {
                category: *c,
                fitness: *s,
                reason: format!("{}: {}", strength, alternative_reason(*c)),
            }
        })
        .collect()
}

fn alternative_reason(category: Category) -> &'static str {
    match category {
        Category::Beverage => "if liquid characteristics are primary",
        Category::DairyBeverage => "if dairy content is significant",
        Category::Food => "if treated as a general food product",
        Category::DairyFood => "if dairy solids are the main component",
        Category::Cheese => "if the high protein/fat profile is emphasized",
        Category::OilsAndSpreads => "if fat content dominates the profile",
    }
}

fn append_category_reasoning(
    reasoning: &mut Vec<String>,
    category: Category,
    n: &MealNutritionSummary,
) {
    match category {
        Category::Beverage | Category::DairyBeverage => {
            reasoning.push(format!(
                "high liquid content ({:.0}%)",
                n.liquid_percentage * 100.0
            ));
            if n.energy_kcal < 150.0 {
                reasoning.push("low energy density appropriate for beverages".to_string());
            }
        }
        Category::Cheese => {
            reasoning.push(format!(
                "high protein ({:.1} g/100g) and fat ({:.1} g/100g)",
                n.protein, n.fat_total
            ));
        }
        Category::OilsAndSpreads => {
            reasoning.push(format!(
                "very high energy density ({:.0} kcal/100g)",
                n.energy_kcal
            ));
        }
        Category::Food | Category::DairyFood => {
            if n.liquid_percentage < 0.3 {
                reasoning.push("predominantly solid composition".to_string());
            }
        }
    }

    if n.satiety_index > 1.1 {
        reasoning.push("high satiety index supports solid food categorization".to_string());
    }
    if n.processing_level == ProcessingLevel::MinimallyProcessed {
        reasoning.push("minimally processed foods align with whole food categories".to_string());
    }
}

fn rationale_for(category: Category, n: &MealNutritionSummary) -> String {
    match category {
        Category::Beverage => format!(
            "Energy density of {:.0} kcal/100g and {:.0}% liquid content align with beverage standards.",
            n.energy_kcal,
            n.liquid_percentage * 100.0
        ),
        Category::DairyBeverage => format!(
            "Moderate energy density ({:.0} kcal/100g) with significant liquid content ({:.0}%) and moderate protein ({:.1} g) typical of dairy beverages.",
            n.energy_kcal,
            n.liquid_percentage * 100.0,
            n.protein
        ),
        Category::Cheese => format!(
            "High energy density ({:.0} kcal/100g) with substantial protein ({:.1} g) and fat ({:.1} g) characteristic of cheese products.",
            n.energy_kcal, n.protein, n.fat_total
        ),
        Category::OilsAndSpreads => format!(
            "Very high energy density ({:.0} kcal/100g) dominated by fat ({:.1} g/100g) with minimal protein ({:.1} g).",
            n.energy_kcal, n.fat_total, n.protein
        ),
        Category::Food => format!(
            "Balanced profile with {:.0} kcal/100g, {:.1} g protein and {:.1} g fat; predominantly solid composition ({:.0}% liquid).",
            n.energy_kcal,
            n.protein,
            n.fat_total,
            n.liquid_percentage * 100.0
        ),
        Category::DairyFood => format!(
            "Moderate energy density ({:.0} kcal/100g) with good protein ({:.1} g) and moderate fat ({:.1} g) consistent with dairy foods.",
            n.energy_kcal, n.protein, n.fat_total
        ),
    }
}
