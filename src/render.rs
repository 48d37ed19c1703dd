use crate::classify::MealClassification;
use crate::models::{Meal, MealHsrResult};

/// Display a rating result as a formatted summary.
pub fn display_result(result: &MealHsrResult) {
    println!();
    println!("=== Health Star Rating ===");
    println!();
    println!(
        "  {:.1} stars ({:?})  -  category: {}",
        result.star_rating, result.level, result.category
    );
    println!("  {}", result.rating_description());
    println!();

    let score = &result.component_score;
    println!(
        "  Baseline points:  {:>3}  (energy {}, sat fat {}, sugar {}, sodium {})",
        score.baseline_points,
        score.energy_points,
        score.saturated_fat_points,
        score.sugar_points,
        score.sodium_points
    );
    println!(
        "  Modifying points: {:>3}  (protein {}, fiber {}, FVNL {})",
        score.modifying_points, score.protein_points, score.fiber_points, score.fvnl_points
    );
    println!(
        "  Adjustments:      satiety {:+.1}, processing {:+.1}, naturalness {:+.1}",
        score.satiety_adjustment, score.processing_penalty, score.naturalness_bonus
    );
    println!("  Final score:      {:>3}", score.final_score);
    println!();

    println!(
        "  Total: {:.0} g, {:.0} kcal/100g ({:.0} kJ/100g), confidence {:.0}%",
        result.total_weight,
        result.total_energy_kcal,
        result.total_energy_kj,
        result.confidence_score * 100.0
    );

    if !result.nutrient_analyses.is_empty() {
        println!();
        println!("  Nutrients:");
        let max_name_len = result
            .nutrient_analyses
            .iter()
            .map(|a| a.nutrient_name.len())
            .max()
            .unwrap_or(10);
        for analysis in &result.nutrient_analyses {
            println!(
                "    {:<width$} {:>8.1} {:<9} {:>2} pts  {}",
                analysis.nutrient_name,
                analysis.value,
                analysis.unit,
                analysis.points,
                analysis.threshold_position,
                width = max_name_len
            );
        }
    }

    for (label, insights) in [
        ("Strengths", &result.strengths),
        ("Concerns", &result.concerns),
        ("Recommendations", &result.recommendations),
    ] {
        if insights.is_empty() {
            continue;
        }
        println!();
        println!("  {}:", label);
        for insight in insights {
            println!("    - {}: {}", insight.title, insight.description);
            if let Some(action) = &insight.action_text {
                println!("      -> {}", action);
            }
        }
    }

    if !result.warnings.is_empty() {
        println!();
        println!("  Warnings:");
        for warning in &result.warnings {
            println!("    ! {}", warning);
        }
    }

    println!();
}

/// Display the category analysis for a meal.
pub fn display_classification(meal: &Meal) {
    let analysis: &MealClassification = &meal.category_analysis;

    println!();
    println!("=== Meal Category ===");
    println!();
    println!(
        "  {}  (confidence {:.0}%)",
        meal.category,
        meal.category_confidence * 100.0
    );
    println!("  {}", analysis.rationale);

    if !analysis.reasoning.is_empty() {
        println!();
        for reason in &analysis.reasoning {
            println!("    - {}", reason);
        }
    }

    if !analysis.fitness.is_empty() {
        println!();
        println!("  Fitness by category:");
        for (category, fitness) in &analysis.fitness {
            println!("    {:<18} {:.2}", category.to_string(), fitness);
        }
    }

    if !analysis.alternatives.is_empty() {
        println!();
        println!("  Alternatives:");
        for alt in &analysis.alternatives {
            println!("    {} ({:.2}) - {}", alt.category, alt.fitness, alt.reason);
        }
    }

    if !meal.category_warnings.is_empty() {
        println!();
        println!("  Warnings:");
        for warning in &meal.category_warnings {
            println!("    ! {}", warning);
        }
    }

    println!();
}
