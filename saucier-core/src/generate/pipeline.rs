//! Generation pipeline orchestration.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{info_span, Instrument};

use super::derive::{derive_difficulty, derive_tags, is_meat_free};
use super::parse::parse_generated_recipe;
use super::prompt::{render_generate_recipe_prompt, GENERATE_RECIPE_PROMPT_NAME};
use super::validate::{validate_generate_request, GenerateRequest};
use super::GenerateError;
use crate::image_search::{find_recipe_image, ImageSearch};
use crate::llm::LlmProvider;
use crate::store::RecipeStore;
use crate::types::{GenerationMetadata, NewRecipe, Recipe};

/// Pipeline stages in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    Prompting,
    AwaitingGeneration,
    Parsing,
    Deriving,
    SearchingImage,
    Persisting,
    Done,
}

impl Stage {
    /// All stages in execution order
    pub const ALL: &'static [Stage] = &[
        Stage::Validating,
        Stage::Prompting,
        Stage::AwaitingGeneration,
        Stage::Parsing,
        Stage::Deriving,
        Stage::SearchingImage,
        Stage::Persisting,
        Stage::Done,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Validating => "validating",
            Stage::Prompting => "prompting",
            Stage::AwaitingGeneration => "awaiting_generation",
            Stage::Parsing => "parsing",
            Stage::Deriving => "deriving",
            Stage::SearchingImage => "searching_image",
            Stage::Persisting => "persisting",
            Stage::Done => "done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A saved recipe and how it was produced.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct GenerationResult {
    pub recipe: Recipe,
    pub metadata: GenerationMetadata,
}

/// Runs the generation pipeline against injected collaborators.
#[derive(Clone)]
pub struct Generator {
    llm: Arc<dyn LlmProvider>,
    images: Arc<dyn ImageSearch>,
    store: Arc<dyn RecipeStore>,
}

fn stage_span(stage: Stage) -> tracing::Span {
    info_span!("generation_stage", stage = %stage)
}

fn rounded_secs(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 100.0).round() / 100.0
}

impl Generator {
    pub fn new(
        llm: Arc<dyn LlmProvider>,
        images: Arc<dyn ImageSearch>,
        store: Arc<dyn RecipeStore>,
    ) -> Self {
        Self { llm, images, store }
    }

    /// Generate, enrich and save one recipe. Stops at the first failing stage.
    pub async fn generate(
        &self,
        request: &GenerateRequest,
    ) -> Result<GenerationResult, GenerateError> {
        let result = self.run(request).await;
        if let Err(e) = &result {
            if e.is_client_error() {
                tracing::info!(stage = %e.stage(), "Rejected generation request: {}", e);
            } else {
                tracing::error!(stage = %e.stage(), "Recipe generation failed: {}", e);
            }
        }
        result
    }

    async fn run(&self, request: &GenerateRequest) -> Result<GenerationResult, GenerateError> {
        let params = stage_span(Stage::Validating).in_scope(|| validate_generate_request(request))?;

        let prompt =
            stage_span(Stage::Prompting).in_scope(|| render_generate_recipe_prompt(&params));

        let started = Instant::now();
        let raw = self
            .llm
            .complete(&prompt)
            .instrument(info_span!(
                "generation_stage",
                stage = %Stage::AwaitingGeneration,
                prompt_name = GENERATE_RECIPE_PROMPT_NAME,
                provider = self.llm.provider_name(),
                model = %self.llm.model_name(),
            ))
            .await?;
        let generation_time = started.elapsed();

        let generated = stage_span(Stage::Parsing).in_scope(|| parse_generated_recipe(&raw))?;

        let (tags, difficulty) = stage_span(Stage::Deriving).in_scope(|| {
            (
                derive_tags(&params.ingredients, &params.cuisine_type, params.duration),
                derive_difficulty(generated.steps.len(), params.duration),
            )
        });

        let started = Instant::now();
        let image_url = find_recipe_image(
            self.images.as_ref(),
            &generated.title,
            Some(params.cuisine_type.as_str()),
        )
        .instrument(stage_span(Stage::SearchingImage))
        .await;
        let image_search_time = started.elapsed();

        let metadata = GenerationMetadata {
            generation_time: rounded_secs(generation_time),
            image_search_time: rounded_secs(image_search_time),
            total_ingredients: generated.ingredients.len(),
            total_steps: generated.steps.len(),
            is_vegetarian: is_meat_free(&params.ingredients),
        };

        let recipe = stage_span(Stage::Persisting).in_scope(|| {
            self.store.insert(NewRecipe {
                title: generated.title,
                ingredients: generated.ingredients,
                steps: generated.steps,
                cuisine_type: params.cuisine_type,
                language: params.language,
                duration: params.duration,
                tags,
                difficulty,
                image_url,
            })
        })?;

        tracing::info!(
            stage = %Stage::Done,
            recipe_id = %recipe.id,
            difficulty = %recipe.difficulty,
            generation_ms = generation_time.as_millis() as u64,
            image_search_ms = image_search_time.as_millis() as u64,
            "Recipe generated"
        );

        Ok(GenerationResult { recipe, metadata })
    }
}
