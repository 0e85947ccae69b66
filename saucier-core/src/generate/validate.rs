//! Boundary validation for generation requests and recipe updates.
//!
//! Inputs arrive as loosely typed JSON, so each check takes a
//! `serde_json::Value` and either returns the typed value or a
//! [`ValidationError`].

use serde::Deserialize;
use serde_json::Value;

use crate::error::ValidationError;
use crate::types::Language;

pub const DEFAULT_LANGUAGE: Language = Language::Fr;
pub const DEFAULT_CUISINE_TYPE: &str = "international";
pub const MAX_CUISINE_TYPE_LEN: usize = 100;
pub const DEFAULT_DURATION: i32 = 30;
pub const MIN_DURATION: i64 = 5;
pub const MAX_DURATION: i64 = 240;
pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 5.0;

/// Body of a generation request, as received.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct GenerateRequest {
    /// Main ingredients, e.g. `["tomato", "basil"]`. Required.
    #[cfg_attr(feature = "openapi", schema(value_type = Vec<String>))]
    pub ingredients: Option<Value>,
    /// `en`, `fr` or `es` (default `fr`).
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub language: Option<Value>,
    /// Default `international`.
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub cuisine_type: Option<Value>,
    /// Minutes, 5 to 240 (default 30).
    #[cfg_attr(feature = "openapi", schema(value_type = Option<i32>))]
    pub duration: Option<Value>,
}

/// Validated generation parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateParams {
    pub ingredients: Vec<String>,
    pub language: Language,
    pub cuisine_type: String,
    pub duration: i32,
}

/// Validate a whole request. Checks run ingredients, duration, then language.
pub fn validate_generate_request(
    request: &GenerateRequest,
) -> Result<GenerateParams, ValidationError> {
    let ingredients = validate_ingredients(request.ingredients.as_ref())?;
    let duration = validate_duration(request.duration.as_ref())?;
    let language = validate_language(request.language.as_ref())?;
    let cuisine_type = validate_cuisine_type(request.cuisine_type.as_ref())?;

    Ok(GenerateParams {
        ingredients,
        language,
        cuisine_type,
        duration,
    })
}

/// A non-empty list of non-empty strings. Returns the trimmed entries.
pub fn validate_ingredients(value: Option<&Value>) -> Result<Vec<String>, ValidationError> {
    let items = value
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())
        .ok_or(ValidationError::InvalidIngredients)?;

    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .ok_or(ValidationError::InvalidIngredients)
        })
        .collect()
}

/// Whole minutes in [5, 240]. Accepts a JSON integer or an integer string.
pub fn validate_duration(value: Option<&Value>) -> Result<i32, ValidationError> {
    let minutes = match value {
        None | Some(Value::Null) => return Ok(DEFAULT_DURATION),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(_) => None,
    }
    .ok_or(ValidationError::InvalidDuration)?;

    if !(MIN_DURATION..=MAX_DURATION).contains(&minutes) {
        return Err(ValidationError::InvalidDuration);
    }

    i32::try_from(minutes).map_err(|_| ValidationError::InvalidDuration)
}

/// One of `en`, `fr`, `es`, case-insensitive.
pub fn validate_language(value: Option<&Value>) -> Result<Language, ValidationError> {
    match value {
        None | Some(Value::Null) => Ok(DEFAULT_LANGUAGE),
        Some(Value::String(s)) => s
            .parse()
            .map_err(|_| ValidationError::UnsupportedLanguage(s.clone())),
        Some(other) => Err(ValidationError::UnsupportedLanguage(other.to_string())),
    }
}

/// Free-form label of at most [`MAX_CUISINE_TYPE_LEN`] characters once
/// trimmed. Blank values fall back to the default.
pub fn validate_cuisine_type(value: Option<&Value>) -> Result<String, ValidationError> {
    match value {
        None | Some(Value::Null) => Ok(DEFAULT_CUISINE_TYPE.to_string()),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(DEFAULT_CUISINE_TYPE.to_string()),
        Some(Value::String(s)) if s.trim().chars().count() > MAX_CUISINE_TYPE_LEN => {
            Err(ValidationError::CuisineTypeTooLong)
        }
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(_) => Err(ValidationError::InvalidCuisineType),
    }
}

/// A number (or numeric string) in [0, 5].
pub fn validate_rating(value: &Value) -> Result<f64, ValidationError> {
    let rating = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|r| r.is_finite())
    .ok_or(ValidationError::InvalidRating)?;

    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(ValidationError::InvalidRating);
    }
    Ok(rating)
}

/// A list of strings.
pub fn validate_tags(value: &Value) -> Result<Vec<String>, ValidationError> {
    value
        .as_array()
        .ok_or(ValidationError::InvalidTagPayload)?
        .iter()
        .map(|tag| {
            tag.as_str()
                .map(str::to_string)
                .ok_or(ValidationError::InvalidTagPayload)
        })
        .collect()
}
