use axum::{Router, extract::DefaultBodyLimit, routing::post};
use utoipa::OpenApi;

use crate::application::http::server::app_state::AppState;

use super::handlers::upload_meal::{__path_upload_meal, upload_meal};

/// Room for multipart boundaries and headers around the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

#[derive(OpenApi)]
#[openapi(paths(upload_meal))]
pub struct MealAnalysisApiDoc;

pub fn meal_analysis_routes(state: AppState) -> Router<AppState> {
    let body_limit = state.service.upload_config().max_bytes + MULTIPART_OVERHEAD;

    Router::new()
        .route(
            &format!("{}/upload", state.args.server.root_path),
            post(upload_meal),
        )
        .layer(DefaultBodyLimit::max(body_limit))
}
