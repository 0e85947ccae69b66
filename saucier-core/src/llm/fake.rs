//! Fake LLM provider for testing.
//!
//! This provider returns deterministic responses based on prompt matching,
//! allowing tests to run without network access or API costs.

use super::{LlmError, LlmProvider};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// A recipe in the shape the generation prompt asks for, wrapped in a
/// markdown fence the way real models tend to answer.
pub const SAMPLE_RECIPE_RESPONSE: &str = r#"```json
{
    "title": "Tomato and Basil Bruschetta",
    "ingredients": [
        "4 tomatoes",
        "10 g fresh basil",
        "1 baguette",
        "30 ml olive oil",
        "1 clove garlic"
    ],
    "steps": [
        "1. Dice the tomatoes and chop the basil.",
        "2. Slice and toast the baguette.",
        "3. Rub the toast with garlic.",
        "4. Top with tomatoes and basil, drizzle with olive oil."
    ]
}
```"#;

/// A fake LLM provider for testing.
///
/// Responses are matched by checking if the prompt contains a registered substring.
/// If no match is found, returns a default response or error.
#[derive(Debug)]
pub struct FakeProvider {
    /// Map of prompt substring -> response
    responses: RwLock<HashMap<String, String>>,
    /// Default response if no match found
    default_response: Option<String>,
    /// Every prompt received, in order
    prompts: RwLock<Vec<String>>,
}

impl Default for FakeProvider {
    fn default() -> Self {
        Self::with_sample_recipe()
    }
}

impl FakeProvider {
    /// Create a new FakeProvider with no registered responses.
    pub fn new() -> Self {
        Self {
            responses: RwLock::new(HashMap::new()),
            default_response: None,
            prompts: RwLock::new(Vec::new()),
        }
    }

    /// Provider that answers every prompt with [`SAMPLE_RECIPE_RESPONSE`].
    pub fn with_sample_recipe() -> Self {
        Self::new().with_default_response(SAMPLE_RECIPE_RESPONSE)
    }

    /// Create a FakeProvider that returns a specific response for prompts containing a substring.
    pub fn with_response(prompt_contains: &str, response: &str) -> Self {
        let provider = Self::new();
        provider.add_response(prompt_contains, response);
        provider
    }

    /// Add a response for prompts containing a specific substring.
    pub fn add_response(&self, prompt_contains: &str, response: &str) {
        if let Ok(mut responses) = self.responses.write() {
            responses.insert(prompt_contains.to_string(), response.to_string());
        }
    }

    /// Set the default response when no pattern matches.
    pub fn with_default_response(mut self, response: &str) -> Self {
        self.default_response = Some(response.to_string());
        self
    }

    /// Prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.read().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmProvider for FakeProvider {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        if let Ok(mut prompts) = self.prompts.write() {
            prompts.push(prompt.to_string());
        }

        let responses = self
            .responses
            .read()
            .map_err(|_| LlmError::RequestFailed("FakeProvider lock poisoned".to_string()))?;

        // Find first matching pattern (case-insensitive)
        let prompt_lower = prompt.to_lowercase();
        for (pattern, response) in responses.iter() {
            if prompt_lower.contains(&pattern.to_lowercase()) {
                return Ok(response.clone());
            }
        }

        match &self.default_response {
            Some(response) => Ok(response.clone()),
            None => Err(LlmError::RequestFailed(format!(
                "FakeProvider: No response configured for prompt (first 100 chars): {}",
                prompt.chars().take(100).collect::<String>()
            ))),
        }
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }
}
