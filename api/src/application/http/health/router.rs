use axum::{Router, routing::get};
use utoipa::OpenApi;

use crate::application::http::server::app_state::AppState;

use super::handlers::{
    get_health::{__path_get_health, get_health},
    get_readiness::{__path_get_readiness, get_readiness},
};

#[derive(OpenApi)]
#[openapi(paths(get_health, get_readiness))]
pub struct HealthApiDoc;

pub fn health_routes(root_path: &str) -> Router<AppState> {
    Router::new()
        .route(&format!("{}/health", root_path), get(get_health))
        .route(&format!("{}/health/ready", root_path), get(get_readiness))
}
