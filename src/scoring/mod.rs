//! The HSR scoring pipeline: context analysis, threshold production,
//! component scoring and result assembly.

pub mod calculator;
pub mod context;
pub mod insights;
pub mod thresholds;

pub use calculator::{calculate_hsr, star_rating_for_score, HsrCalculator, HsrConfig};
pub use context::{NutritionalContext, SugarAnalysis};
pub use thresholds::{get_thresholds, points_for, HsrThresholds};
