use serde::Serialize;

use crate::models::{Category, HsrLevel, NutrientImpact};

/// Full breakdown of an HSR score.
///
/// Baseline (risk) points are offset by modifying (beneficial) points,
/// then the scientific adjustments move the total before star conversion.
#[derive(Debug, Clone, Serialize)]
pub struct HsrComponentScore {
    pub baseline_points: i32,
    pub energy_points: i32,
    pub saturated_fat_points: i32,
    pub sugar_points: i32,
    pub sodium_points: i32,

    pub modifying_points: i32,
    pub protein_points: i32,
    pub fiber_points: i32,
    pub fvnl_points: i32,

    pub final_score: i32,
    pub star_rating: f64,

    pub sugar_natural_points: i32,
    pub sugar_added_points: i32,
    pub satiety_adjustment: f64,
    pub processing_penalty: f64,
    pub naturalness_bonus: f64,
    pub scientific_confidence: f64,
}

/// Per-nutrient contribution to the score.
#[derive(Debug, Clone, Serialize)]
pub struct NutrientAnalysis {
    pub nutrient_name: String,
    pub value: f64,
    pub unit: &'static str,
    pub points: i32,
    pub impact: NutrientImpact,
    /// e.g. "40th percentile" or the sugar natural-share position.
    pub threshold_position: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Strength,
    Concern,
    Recommendation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// A structured health insight about the meal.
#[derive(Debug, Clone, Serialize)]
pub struct HealthInsight {
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub actionable: bool,
    pub action_text: Option<String>,
}

impl HealthInsight {
    pub fn new(
        kind: InsightKind,
        title: impl Into<String>,
        description: impl Into<String>,
        priority: Priority,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            description: description.into(),
            priority,
            actionable: false,
            action_text: None,
        }
    }

    pub fn with_action(mut self, action_text: impl Into<String>) -> Self {
        self.actionable = true;
        self.action_text = Some(action_text.into());
        self
    }
}

/// Result of rating a meal. Assembled once; never mutated afterward.
#[derive(Debug, Clone, Serialize)]
pub struct MealHsrResult {
    /// One of the nine discrete half-star values, 1.0 to 5.0.
    pub star_rating: f64,
    pub level: HsrLevel,
    pub category: Category,

    pub component_score: HsrComponentScore,
    pub nutrient_analyses: Vec<NutrientAnalysis>,

    pub strengths: Vec<HealthInsight>,
    pub concerns: Vec<HealthInsight>,
    pub recommendations: Vec<HealthInsight>,

    /// 0.5-1.0.
    pub confidence_score: f64,
    pub warnings: Vec<String>,

    pub total_weight: f64,
    pub total_energy_kj: f64,
    pub total_energy_kcal: f64,
}

impl MealHsrResult {
    /// Top recommendations, high priority first.
    pub fn priority_recommendations(&self, max_items: usize) -> Vec<&HealthInsight> {
        let mut sorted: Vec<&HealthInsight> = self.recommendations.iter().collect();
        sorted.sort_by(|a, b| b.priority.cmp(&a.priority));
        sorted.truncate(max_items);
        sorted
    }

    /// Short text for the rating band.
    pub fn rating_description(&self) -> &'static str {
        match self.level {
            HsrLevel::Poor => "Low nutritional quality. Consider healthier alternatives.",
            HsrLevel::BelowAverage => {
                "Below-average nutritional quality. Healthier options are available."
            }
            HsrLevel::Average => "Average nutritional quality. Fine as part of a balanced diet.",
            HsrLevel::Good => "Good nutritional quality. A healthy choice for regular consumption.",
            HsrLevel::Excellent => "Excellent nutritional quality. An ideal choice.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_recommendations_ordering() {
        let result = MealHsrResult {
            star_rating: 3.0,
            level: HsrLevel::Average,
            category: Category::Food,
            component_score: HsrComponentScore {
                baseline_points: 0,
                energy_points: 0,
                saturated_fat_points: 0,
                sugar_points: 0,
                sodium_points: 0,
                modifying_points: 0,
                protein_points: 0,
                fiber_points: 0,
                fvnl_points: 0,
                final_score: 0,
                star_rating: 3.0,
                sugar_natural_points: 0,
                sugar_added_points: 0,
                satiety_adjustment: 0.0,
                processing_penalty: 0.0,
                naturalness_bonus: 0.0,
                scientific_confidence: 1.0,
            },
            nutrient_analyses: Vec::new(),
            strengths: Vec::new(),
            concerns: Vec::new(),
            recommendations: vec![
                HealthInsight::new(InsightKind::Recommendation, "a", "", Priority::Low),
                HealthInsight::new(InsightKind::Recommendation, "b", "", Priority::High),
                HealthInsight::new(InsightKind::Recommendation, "c", "", Priority::Medium),
            ],
            confidence_score: 1.0,
            warnings: Vec::new(),
            total_weight: 100.0,
            total_energy_kj: 0.0,
            total_energy_kcal: 0.0,
        };

        let top = result.priority_recommendations(2);
        assert_eq!(top[0].title, "b");
        assert_eq!(top[1].title, "c");
    }
}
