use super::parse_recipe_id;
use crate::api::{store_error_response, ErrorResponse, RECIPE_NOT_FOUND};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use saucier_core::Recipe;

#[utoipa::path(
    get,
    path = "/api/recipes/{id}/",
    tag = "recipes",
    params(
        ("id" = String, Path, description = "Recipe ID (UUID)")
    ),
    responses(
        (status = 200, description = "Recipe details", body = Recipe),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn get_recipe(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    let Some(id) = parse_recipe_id(&id) else {
        return ErrorResponse::new(RECIPE_NOT_FOUND).into_response_with(StatusCode::NOT_FOUND);
    };

    match state.store.get(id) {
        Ok(recipe) => (StatusCode::OK, Json(recipe)).into_response(),
        Err(e) => store_error_response(e),
    }
}
