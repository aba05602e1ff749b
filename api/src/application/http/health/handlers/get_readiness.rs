use axum::extract::State;
use nutriscope_core::domain::vector_index::ports::VectorIndex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::http::server::{
    api_entities::{api_error::ApiError, response::Response},
    app_state::AppState,
};

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ReadinessResponse {
    pub status: String,
    pub index_items: usize,
}

#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    summary = "Readiness probe",
    description = "Ready once the ingredient index is loaded and holds at least one item.",
    responses(
        (status = 200, body = ReadinessResponse),
        (status = 503, description = "The ingredient index is empty")
    ),
)]
pub async fn get_readiness(
    State(state): State<AppState>,
) -> Result<Response<ReadinessResponse>, ApiError> {
    let index_items = state.service.vector_index().item_count();
    if index_items == 0 {
        return Err(ApiError::ServiceUnavailable("ingredient index is empty".to_string()));
    }

    Ok(Response::OK(ReadinessResponse {
        status: "ready".to_string(),
        index_items,
    }))
}
