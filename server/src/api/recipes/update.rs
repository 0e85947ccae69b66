use super::parse_recipe_id;
use crate::api::{store_error_response, ErrorResponse, RECIPE_NOT_FOUND};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use saucier_core::generate::{validate_rating, validate_tags};
use saucier_core::Recipe;
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

/// Rating and/or tags to apply. Both are optional.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateRecipeRequest {
    /// A number between 0 and 5, folded into the running mean
    #[schema(value_type = Option<f64>)]
    pub rating: Option<Value>,
    /// Tags to add to the recipe's existing tags
    #[schema(value_type = Option<Vec<String>>)]
    pub tags: Option<Value>,
}

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/",
    tag = "recipes",
    params(
        ("id" = String, Path, description = "Recipe ID (UUID)")
    ),
    request_body = UpdateRecipeRequest,
    responses(
        (status = 200, description = "Updated recipe", body = Recipe),
        (status = 400, description = "Invalid rating or tags", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn update_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateRecipeRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Some(id) = parse_recipe_id(&id) else {
        return ErrorResponse::new(RECIPE_NOT_FOUND).into_response_with(StatusCode::NOT_FOUND);
    };

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return ErrorResponse::new(rejection.body_text())
                .into_response_with(StatusCode::BAD_REQUEST)
        }
    };

    let mut recipe = match state.store.get(id) {
        Ok(r) => r,
        Err(e) => return store_error_response(e),
    };

    // Validate everything before applying anything
    let rating = match request.rating.as_ref().map(validate_rating).transpose() {
        Ok(r) => r,
        Err(e) => {
            return ErrorResponse::new(e.to_string()).into_response_with(StatusCode::BAD_REQUEST)
        }
    };
    let tags = match request.tags.as_ref().map(validate_tags).transpose() {
        Ok(t) => t,
        Err(e) => {
            return ErrorResponse::new(e.to_string()).into_response_with(StatusCode::BAD_REQUEST)
        }
    };

    if let Some(rating) = rating {
        recipe = match state.store.add_rating(id, rating) {
            Ok(r) => r,
            Err(e) => return store_error_response(e),
        };
        tracing::info!(
            recipe_id = %id,
            rating,
            ratings_count = recipe.ratings_count,
            "Recipe rated"
        );
    }

    if let Some(tags) = tags {
        recipe = match state.store.merge_tags(id, &tags) {
            Ok(r) => r,
            Err(e) => return store_error_response(e),
        };
        tracing::info!(recipe_id = %id, tags = ?recipe.tags, "Recipe tags updated");
    }

    (StatusCode::OK, Json(recipe)).into_response()
}
