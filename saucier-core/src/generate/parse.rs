//! Turn raw model output into a structured recipe.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";
const REQUIRED_FIELDS: [&str; 3] = ["title", "ingredients", "steps"];

/// The three fields the model is asked for. Extra keys are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedRecipe {
    pub title: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The text is not usable JSON of the expected shape.
    #[error("{0}")]
    Malformed(String),

    #[error("missing fields: {}", .0.join(", "))]
    Incomplete(Vec<String>),
}

/// The body of the first ```` ```json ```` block, or the whole text if there
/// is none. An unterminated block runs to the end of the text.
pub fn extract_json_payload(raw: &str) -> &str {
    match raw.split_once(JSON_FENCE) {
        Some((_, rest)) => rest.split(FENCE).next().unwrap_or(rest),
        None => raw,
    }
}

pub fn parse_generated_recipe(raw: &str) -> Result<GeneratedRecipe, ParseError> {
    let payload = extract_json_payload(raw).trim();

    let value: Value = serde_json::from_str(payload)
        .map_err(|e| ParseError::Malformed(format!("invalid JSON: {}", e)))?;

    let object = value
        .as_object()
        .ok_or_else(|| ParseError::Malformed("expected a JSON object".to_string()))?;

    let missing: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|field| !object.contains_key(**field))
        .map(|field| field.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ParseError::Incomplete(missing));
    }

    let recipe: GeneratedRecipe = serde_json::from_value(value)
        .map_err(|e| ParseError::Malformed(format!("unexpected field type: {}", e)))?;

    if recipe.title.trim().is_empty() {
        return Err(ParseError::Incomplete(vec!["title".to_string()]));
    }

    Ok(recipe)
}
