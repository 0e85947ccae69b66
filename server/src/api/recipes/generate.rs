use crate::api::ErrorResponse;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use saucier_core::{GenerateError, GenerateRequest, GenerationResult};

fn error_label(e: &GenerateError) -> &'static str {
    match e {
        GenerateError::Validation(_) => "Invalid request",
        GenerateError::Service(_) => "Recipe generation service error",
        GenerateError::MalformedResponse(_) => "Invalid response from the generation service",
        GenerateError::IncompleteRecipe(_) => "Generated recipe is incomplete",
        GenerateError::Store(_) => "Failed to save the generated recipe",
    }
}

/// Map a pipeline failure onto a response: 400 for bad input, 500 otherwise.
fn generate_error_response(e: GenerateError) -> axum::response::Response {
    if e.is_client_error() {
        return ErrorResponse::new(e.to_string()).into_response_with(StatusCode::BAD_REQUEST);
    }
    ErrorResponse::with_details(error_label(&e), e.to_string())
        .into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
}

#[utoipa::path(
    post,
    path = "/api/recipes/generate/",
    tag = "recipes",
    request_body = GenerateRequest,
    responses(
        (status = 201, description = "Recipe generated and saved", body = GenerationResult),
        (status = 400, description = "Invalid ingredients, language or duration", body = ErrorResponse),
        (status = 500, description = "Generation failed", body = ErrorResponse)
    )
)]
pub async fn generate_recipe(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return ErrorResponse::new(rejection.body_text())
                .into_response_with(StatusCode::BAD_REQUEST)
        }
    };

    match state.generator.generate(&request).await {
        Ok(result) => (StatusCode::CREATED, Json(result)).into_response(),
        Err(e) => generate_error_response(e),
    }
}
