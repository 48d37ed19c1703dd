pub mod classify;
pub mod cli;
pub mod error;
pub mod fvnl;
pub mod lookup;
pub mod models;
pub mod nutrients;
pub mod render;
pub mod scoring;

pub use error::{HsrError, Result};
pub use models::{Category, Food, Meal, MealHsrResult};
pub use scoring::{calculate_hsr, HsrCalculator, HsrConfig};
