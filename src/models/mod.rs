pub mod category;
pub mod food;
pub mod meal;
pub mod result;

pub use category::{Category, CategorySource, HsrLevel, NutrientImpact, ProcessingLevel};
pub use food::Food;
pub use meal::Meal;
pub use result::{
    HealthInsight, HsrComponentScore, InsightKind, MealHsrResult, NutrientAnalysis, Priority,
};
