//! Recipe generation: validate the request, prompt the model, parse its
//! answer, derive tags and difficulty, look up a photo, and save.

mod derive;
mod parse;
mod pipeline;
mod prompt;
mod validate;

pub use derive::{
    derive_difficulty, derive_tags, is_meat_free, MEAT_KEYWORDS, TAG_EASY, TAG_LONG_PREP,
    TAG_QUICK, TAG_VEGETARIAN,
};
pub use parse::{extract_json_payload, parse_generated_recipe, GeneratedRecipe, ParseError};
pub use pipeline::{GenerationResult, Generator, Stage};
pub use prompt::{render_generate_recipe_prompt, GENERATE_RECIPE_PROMPT_NAME};
pub use validate::{
    validate_cuisine_type, validate_duration, validate_generate_request, validate_ingredients,
    validate_language, validate_rating, validate_tags, GenerateParams, GenerateRequest,
    DEFAULT_CUISINE_TYPE, DEFAULT_DURATION, DEFAULT_LANGUAGE, MAX_CUISINE_TYPE_LEN, MAX_DURATION,
    MIN_DURATION,
};

use thiserror::Error;

use crate::error::{StoreError, ValidationError};
use crate::llm::LlmError;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Generation service error: {0}")]
    Service(#[from] LlmError),

    #[error("Failed to parse the generated recipe: {0}")]
    MalformedResponse(String),

    #[error("The generated recipe is incomplete, missing: {}", .0.join(", "))]
    IncompleteRecipe(Vec<String>),

    #[error("Failed to save recipe: {0}")]
    Store(#[from] StoreError),
}

impl GenerateError {
    /// The stage the pipeline was in when it failed.
    pub fn stage(&self) -> Stage {
        match self {
            GenerateError::Validation(_) => Stage::Validating,
            GenerateError::Service(_) => Stage::AwaitingGeneration,
            GenerateError::MalformedResponse(_) | GenerateError::IncompleteRecipe(_) => {
                Stage::Parsing
            }
            GenerateError::Store(_) => Stage::Persisting,
        }
    }

    /// Whether the caller can fix this by changing the request.
    pub fn is_client_error(&self) -> bool {
        matches!(self, GenerateError::Validation(_))
    }
}

impl From<ParseError> for GenerateError {
    fn from(e: ParseError) -> Self {
        match e {
            ParseError::Malformed(details) => GenerateError::MalformedResponse(details),
            ParseError::Incomplete(fields) => GenerateError::IncompleteRecipe(fields),
        }
    }
}
