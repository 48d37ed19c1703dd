use thiserror::Error;

#[derive(Debug, Error)]
pub enum HsrError {
    #[error("Meal contains no foods")]
    EmptyMeal,

    #[error("Invalid serving size for '{food}': {grams} g")]
    InvalidServingSize { food: String, grams: f64 },

    #[error("Food not found: {0}")]
    FoodNotFound(i64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, HsrError>;
