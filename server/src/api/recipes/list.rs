use crate::api::{store_error_response, ErrorResponse};
use crate::AppState;
use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use saucier_core::store::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use saucier_core::{Difficulty, Language, Recipe, RecipeFilter, RecipePage};
use serde::Serialize;
use utoipa::{IntoParams, ToSchema};

pub const INVALID_PAGE: &str = "Invalid page.";

/// Query parameters for the recipe list. Parsed by hand from the raw query so
/// that `tags` can repeat and a bad `min_rating` is ignored rather than
/// rejected.
#[derive(Debug, Default, PartialEq, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListRecipesParams {
    /// Case-insensitive substring of the title or any ingredient
    pub search: Option<String>,
    /// Exact cuisine type
    pub cuisine_type: Option<String>,
    /// Exact language code (`en`, `fr`, `es`)
    pub language: Option<String>,
    /// Repeatable; the recipe must carry every tag given
    pub tags: Vec<String>,
    /// Exact difficulty (`easy`, `medium`, `hard`)
    pub difficulty: Option<String>,
    /// Minimum rating; ignored if not a number
    pub min_rating: Option<String>,
    /// Page number (default: 1)
    pub page: Option<String>,
    /// Items per page (default: 10, max: 100)
    pub page_size: Option<String>,
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

impl ListRecipesParams {
    pub fn from_query(query: Option<&str>) -> Self {
        let mut params = Self::default();
        let Some(query) = query else {
            return params;
        };

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let value = value.into_owned();
            match key.as_ref() {
                "search" => params.search = non_empty(value.trim().to_string()),
                "cuisine_type" => params.cuisine_type = non_empty(value),
                "language" => params.language = non_empty(value),
                "tags" => params.tags.push(value),
                "difficulty" => params.difficulty = non_empty(value),
                "min_rating" => params.min_rating = non_empty(value),
                "page" => params.page = Some(value),
                "page_size" => params.page_size = Some(value),
                _ => {}
            }
        }

        params
    }

    /// The store filter, or `None` when a label cannot match any recipe.
    pub fn filter(&self) -> Option<RecipeFilter> {
        let language = match &self.language {
            Some(label) => Some(label.parse::<Language>().ok()?),
            None => None,
        };
        let difficulty = match &self.difficulty {
            Some(label) => Some(label.parse::<Difficulty>().ok()?),
            None => None,
        };

        Some(RecipeFilter {
            search: self.search.clone(),
            cuisine_type: self.cuisine_type.clone(),
            language,
            tags: self.tags.clone(),
            difficulty,
            min_rating: self
                .min_rating
                .as_deref()
                .and_then(|r| r.trim().parse::<f64>().ok())
                .filter(|r| !r.is_nan()),
        })
    }

    /// Requested page and page size. Fails when `page` is not a positive
    /// integer; a bad `page_size` falls back to the default.
    pub fn page_request(&self) -> Option<(i64, i64)> {
        let page_size = self
            .page_size
            .as_deref()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .filter(|n| *n > 0)
            .map(|n| n.min(MAX_PAGE_SIZE))
            .unwrap_or(DEFAULT_PAGE_SIZE);

        let page = match self.page.as_deref() {
            None => 1,
            Some(raw) => raw.trim().parse::<i64>().ok().filter(|p| *p >= 1)?,
        };

        Some((page, page_size))
    }
}

/// Rows to skip for a 1-based page, or `None` on overflow.
fn page_offset(page: i64, page_size: i64) -> Option<i64> {
    page.checked_sub(1)?.checked_mul(page_size)
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListRecipesResponse {
    /// Total number of matching recipes
    pub count: i64,
    /// Next page number, if any
    pub next: Option<i64>,
    /// Previous page number, if any
    pub previous: Option<i64>,
    pub results: Vec<Recipe>,
}

impl ListRecipesResponse {
    /// Page envelope, or `None` if `page` is past the last page.
    fn paginate(page: i64, page_size: i64, result: RecipePage) -> Option<Self> {
        let num_pages = ((result.total + page_size - 1) / page_size).max(1);
        if page > num_pages {
            return None;
        }

        Some(Self {
            count: result.total,
            next: (page < num_pages).then_some(page + 1),
            previous: (page > 1).then_some(page - 1),
            results: result.recipes,
        })
    }
}

#[utoipa::path(
    get,
    path = "/api/recipes/",
    tag = "recipes",
    params(ListRecipesParams),
    responses(
        (status = 200, description = "Matching recipes, newest first", body = ListRecipesResponse),
        (status = 404, description = "Invalid page", body = ErrorResponse)
    )
)]
pub async fn list_recipes(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> impl IntoResponse {
    let params = ListRecipesParams::from_query(query.as_deref());

    let Some((page, page_size)) = params.page_request() else {
        return ErrorResponse::new(INVALID_PAGE).into_response_with(StatusCode::NOT_FOUND);
    };

    // A page whose offset overflows is necessarily past the end
    let Some(offset) = page_offset(page, page_size) else {
        return ErrorResponse::new(INVALID_PAGE).into_response_with(StatusCode::NOT_FOUND);
    };

    let result = match params.filter() {
        Some(filter) => match state.store.list(&filter, page_size, offset) {
            Ok(r) => r,
            Err(e) => return store_error_response(e),
        },
        None => RecipePage {
            total: 0,
            recipes: Vec::new(),
        },
    };

    match ListRecipesResponse::paginate(page, page_size, result) {
        Some(response) => (StatusCode::OK, Json(response)).into_response(),
        None => ErrorResponse::new(INVALID_PAGE).into_response_with(StatusCode::NOT_FOUND),
    }
}
