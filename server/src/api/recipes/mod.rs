pub mod generate;
pub mod get;
pub mod list;
pub mod update;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;
use uuid::Uuid;

/// Routes for /api/recipes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/recipes/", get(list::list_recipes))
        .route("/api/recipes/generate/", post(generate::generate_recipe))
        .route(
            "/api/recipes/{id}/",
            get(get::get_recipe).post(update::update_recipe),
        )
}

/// Ids that are not UUIDs cannot name a recipe.
pub(crate) fn parse_recipe_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok()
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_recipes,
        get::get_recipe,
        update::update_recipe,
        generate::generate_recipe,
    ),
    components(schemas(
        saucier_core::Recipe,
        saucier_core::Language,
        saucier_core::Difficulty,
        saucier_core::GenerationMetadata,
        saucier_core::GenerationResult,
        saucier_core::GenerateRequest,
        list::ListRecipesResponse,
        update::UpdateRecipeRequest,
    ))
)]
pub struct ApiDoc;
