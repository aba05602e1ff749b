use axum::extract::State;
use nutriscope_core::domain::ingredient_search::ports::IngredientSearchService;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::application::http::{
    ingredient_search::validators::SearchIngredientsQuery,
    server::{
        api_entities::{
            api_error::{ApiError, ValidateQuery},
            response::Response,
        },
        app_state::AppState,
    },
};

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct SearchIngredientsResponse {
    /// Ingredient names, most similar first.
    pub ingredients: Vec<String>,
}

#[utoipa::path(
    get,
    path = "",
    tag = "ingredient-search",
    summary = "Find similar ingredients",
    description = "Embeds the query text and returns the closest ingredients in the index. \
        An empty result is reported as 404 so existing clients keep working.",
    params(SearchIngredientsQuery),
    responses(
        (status = 200, body = SearchIngredientsResponse),
        (status = 400, description = "Blank query or k out of range"),
        (status = 404, description = "No similar ingredients"),
        (status = 500, description = "Embedding service failure")
    ),
)]
pub async fn search_ingredients(
    State(state): State<AppState>,
    ValidateQuery(params): ValidateQuery<SearchIngredientsQuery>,
) -> Result<Response<SearchIngredientsResponse>, ApiError> {
    let matches = state
        .service
        .search_ingredients(params.query, params.k)
        .await
        .map_err(|e| {
            error!(error = %e, "ingredient search failed");
            ApiError::from(e)
        })?;

    // Empty results stay a 404 for clients written against the first release.
    if matches.is_empty() {
        return Err(ApiError::NotFound("no similar ingredients found".to_string()));
    }

    Ok(Response::OK(SearchIngredientsResponse {
        ingredients: matches.into_iter().map(|m| m.name).collect(),
    }))
}
