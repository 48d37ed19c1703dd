use crate::models::{
    HealthInsight, HsrComponentScore, InsightKind, Meal, NutrientAnalysis, NutrientImpact,
    Priority, ProcessingLevel,
};
use crate::scoring::context::{NutritionalContext, SugarAnalysis};
use crate::scoring::thresholds::{points_for, HsrThresholds};

/// Nutrients whose points worsen the score.
const RISK_NUTRIENTS: [&str; 3] = ["Energy Density", "Saturated Fat", "Sodium"];

/// Build the per-nutrient analysis list for a result.
///
/// The sugar entry carries the blended points and natural-share position;
/// the remaining entries score raw values against the produced thresholds.
pub fn build_nutrient_analyses(
    meal: &Meal,
    component_score: &HsrComponentScore,
    sugar: &SugarAnalysis,
    thresholds: &HsrThresholds,
) -> Vec<NutrientAnalysis> {
    let mut analyses = Vec::with_capacity(7);

    analyses.push(NutrientAnalysis {
        nutrient_name: "Sugars (Total)".to_string(),
        value: meal.sugars,
        unit: "g",
        points: component_score.sugar_points,
        impact: sugar_impact(sugar),
        threshold_position: format!("Natural: {:.1}%", sugar.natural_percentage),
        recommendation: sugar_recommendation(sugar),
    });

    let entries: [(&str, f64, &'static str, &[f64]); 6] = [
        ("Energy Density", meal.energy_kcal, "kcal/100g", &thresholds.energy_density),
        ("Saturated Fat", meal.saturated_fat, "g", &thresholds.saturated_fat),
        ("Sodium", meal.sodium, "mg", &thresholds.sodium),
        ("Protein", meal.protein, "g", &thresholds.protein),
        ("Fiber", meal.fiber, "g", &thresholds.fiber),
        ("FVNL", meal.fvnl_percent, "%", &thresholds.fvnl),
    ];

    for (name, value, unit, list) in entries {
        let points = points_for(value, list);
        analyses.push(NutrientAnalysis {
            nutrient_name: name.to_string(),
            value,
            unit,
            points,
            impact: nutrient_impact(name, points),
            threshold_position: threshold_position(points, list.len()),
            recommendation: nutrient_recommendation(name, value),
        });
    }

    analyses
}

/// Strengths and concerns from the contextual signals.
pub fn build_insights(
    context: &NutritionalContext,
    sugar: &SugarAnalysis,
) -> (Vec<HealthInsight>, Vec<HealthInsight>) {
    let mut strengths = Vec::new();
    let mut concerns = Vec::new();

    if sugar.natural_percentage > 70.0 {
        strengths.push(HealthInsight::new(
            InsightKind::Strength,
            "Predominantly natural sugars",
            format!(
                "{:.1}% of sugars are from natural sources like fruits",
                sugar.natural_percentage
            ),
            Priority::Medium,
        ));
    }

    if context.satiety_index > 1.1 {
        strengths.push(HealthInsight::new(
            InsightKind::Strength,
            "High satiety potential",
            "This food combination is likely to be more filling and satisfying",
            Priority::High,
        ));
    }

    match context.processing_level {
        ProcessingLevel::MinimallyProcessed => {
            strengths.push(HealthInsight::new(
                InsightKind::Strength,
                "Minimally processed",
                "Foods are in their natural or lightly processed state",
                Priority::Medium,
            ));
        }
        ProcessingLevel::UltraProcessed => {
            concerns.push(HealthInsight::new(
                InsightKind::Concern,
                "Ultra-processed foods",
                "Contains highly processed foods which may be less nutritious",
                Priority::High,
            ));
        }
        ProcessingLevel::Processed => {}
    }

    (strengths, concerns)
}

/// Actionable improvement recommendations.
pub fn build_recommendations(
    context: &NutritionalContext,
    sugar: &SugarAnalysis,
) -> Vec<HealthInsight> {
    let mut recommendations = Vec::new();

    if sugar.added_sugars > 5.0 {
        recommendations.push(
            HealthInsight::new(
                InsightKind::Recommendation,
                "Reduce added sugars",
                "Consider alternatives with less added sugar",
                Priority::High,
            )
            .with_action("Look for unsweetened versions or add natural sweetness with fruits"),
        );
    }

    if context.satiety_index < 0.9 {
        recommendations.push(
            HealthInsight::new(
                InsightKind::Recommendation,
                "Improve satiety",
                "Add protein or fiber to make this meal more filling",
                Priority::Medium,
            )
            .with_action("Consider adding nuts, seeds, or high-fiber vegetables"),
        );
    }

    if context.processing_level == ProcessingLevel::UltraProcessed {
        recommendations.push(
            HealthInsight::new(
                InsightKind::Recommendation,
                "Choose less processed options",
                "Opt for minimally processed alternatives when possible",
                Priority::Medium,
            )
            .with_action("Look for whole food alternatives or prepare from scratch"),
        );
    }

    recommendations
}

fn sugar_impact(sugar: &SugarAnalysis) -> NutrientImpact {
    if sugar.added_sugars > 10.0 {
        NutrientImpact::NegativeHigh
    } else if sugar.added_sugars > 5.0 {
        NutrientImpact::NegativeMedium
    } else if sugar.natural_percentage > 70.0 {
        NutrientImpact::Neutral
    } else {
        NutrientImpact::NegativeLow
    }
}

fn sugar_recommendation(sugar: &SugarAnalysis) -> String {
    if sugar.added_sugars > 10.0 {
        "Significantly reduce added sugar intake".to_string()
    } else if sugar.added_sugars > 5.0 {
        "Consider reducing added sugars".to_string()
    } else if sugar.natural_percentage > 80.0 {
        "Good choice - mostly natural sugars".to_string()
    } else {
        "Balance natural and added sugar sources".to_string()
    }
}

fn nutrient_impact(nutrient: &str, points: i32) -> NutrientImpact {
    if RISK_NUTRIENTS.contains(&nutrient) {
        if points >= 8 {
            NutrientImpact::NegativeHigh
        } else if points >= 5 {
            NutrientImpact::NegativeMedium
        } else if points >= 2 {
            NutrientImpact::NegativeLow
        } else {
            NutrientImpact::Neutral
        }
    } else if points >= 6 {
        NutrientImpact::PositiveHigh
    } else if points >= 4 {
        NutrientImpact::PositiveMedium
    } else if points >= 2 {
        NutrientImpact::PositiveLow
    } else {
        NutrientImpact::Neutral
    }
}

fn threshold_position(points: i32, threshold_count: usize) -> String {
    if threshold_count == 0 {
        return "no thresholds available".to_string();
    }
    let percentile = f64::from(points) / threshold_count as f64 * 100.0;
    format!("{:.0}th percentile", percentile)
}

fn nutrient_recommendation(nutrient: &str, value: f64) -> String {
    let level = if value > 15.0 {
        "high"
    } else if value > 5.0 {
        "medium"
    } else {
        "low"
    };

    let text = match (nutrient, level) {
        ("Energy Density", "high") => "Consider portion control and pairing with low-energy foods",
        ("Energy Density", "medium") => "Moderate energy content - suitable as part of a balanced diet",
        ("Energy Density", "low") => "Excellent for weight management and satiety",
        ("Protein", "high") => "Excellent protein source for muscle health",
        ("Protein", "medium") => "Good protein contribution",
        ("Protein", "low") => "Consider adding protein sources",
        ("Fiber", "high") => "Excellent for digestive health and satiety",
        ("Fiber", "medium") => "Good fiber contribution",
        ("Fiber", "low") => "Add fruits, vegetables, or whole grains",
        _ => "Standard nutritional guidelines apply",
    };

    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sugar(natural: f64, added: f64) -> SugarAnalysis {
        let combined = natural + added;
        SugarAnalysis {
            total_sugars: combined,
            natural_sugars: natural,
            added_sugars: added,
            natural_percentage: if combined > 0.0 { natural / combined * 100.0 } else { 0.0 },
            sources: Vec::new(),
        }
    }

    #[test]
    fn test_sugar_impact_tiers() {
        assert_eq!(sugar_impact(&sugar(0.0, 12.0)), NutrientImpact::NegativeHigh);
        assert_eq!(sugar_impact(&sugar(0.0, 7.0)), NutrientImpact::NegativeMedium);
        assert_eq!(sugar_impact(&sugar(9.0, 1.0)), NutrientImpact::Neutral);
        assert_eq!(sugar_impact(&sugar(2.0, 2.0)), NutrientImpact::NegativeLow);
    }

    #[test]
    fn test_nutrient_impact_direction() {
        assert_eq!(nutrient_impact("Sodium", 9), NutrientImpact::NegativeHigh);
        assert_eq!(nutrient_impact("Sodium", 1), NutrientImpact::Neutral);
        assert_eq!(nutrient_impact("Protein", 7), NutrientImpact::PositiveHigh);
        assert_eq!(nutrient_impact("Fiber", 2), NutrientImpact::PositiveLow);
        assert_eq!(nutrient_impact("FVNL", 0), NutrientImpact::Neutral);
    }

    #[test]
    fn test_threshold_position_format() {
        assert_eq!(threshold_position(5, 11), "45th percentile");
        assert_eq!(threshold_position(0, 11), "0th percentile");
        assert_eq!(threshold_position(3, 0), "no thresholds available");
    }

    #[test]
    fn test_recommendations_trigger_on_added_sugar() {
        let context = NutritionalContext::default();
        let recs = build_recommendations(&context, &sugar(1.0, 8.0));
        assert!(recs.iter().any(|r| r.title.contains("added sugars")));
        assert!(recs.iter().all(|r| r.kind == InsightKind::Recommendation));
    }

    #[test]
    fn test_insights_for_natural_sugars() {
        let context = NutritionalContext::default();
        let (strengths, concerns) = build_insights(&context, &sugar(9.0, 1.0));
        assert!(strengths.iter().any(|s| s.title.contains("natural sugars")));
        assert!(concerns.is_empty());
    }

    #[test]
    fn test_ultra_processed_concern() {
        let context = NutritionalContext {
            processing_level: ProcessingLevel::UltraProcessed,
            ..NutritionalContext::default()
        };
        let (strengths, concerns) = build_insights(&context, &sugar(0.0, 0.0));
        assert!(concerns.iter().any(|c| c.title.contains("Ultra-processed")));
        assert!(strengths.iter().all(|s| !s.title.contains("Minimally")));
    }
}
