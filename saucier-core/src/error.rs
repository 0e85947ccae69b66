use thiserror::Error;
use uuid::Uuid;

/// Rejected user input. Always the caller's to fix.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Ingredients must be a non-empty list of non-empty strings")]
    InvalidIngredients,

    #[error("Unsupported language '{0}'. Available languages: en, fr, es")]
    UnsupportedLanguage(String),

    #[error("Duration must be an integer between 5 and 240 minutes")]
    InvalidDuration,

    #[error("Cuisine type must be a string")]
    InvalidCuisineType,

    #[error("Cuisine type must be at most 100 characters")]
    CuisineTypeTooLong,

    #[error("Rating must be a number between 0 and 5")]
    InvalidRating,

    #[error("Tags must be a list of strings")]
    InvalidTagPayload,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Recipe {0} not found")]
    NotFound(Uuid),

    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Stored row is invalid: {0}")]
    Corrupt(String),
}
