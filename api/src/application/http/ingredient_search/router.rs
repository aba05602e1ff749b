use axum::{Router, routing::get};
use utoipa::OpenApi;

use crate::application::http::server::app_state::AppState;

use super::handlers::search_ingredients::{__path_search_ingredients, search_ingredients};

#[derive(OpenApi)]
#[openapi(paths(search_ingredients))]
pub struct IngredientSearchApiDoc;

pub fn ingredient_search_routes(state: AppState) -> Router<AppState> {
    Router::new().route(
        &format!("{}/search", state.args.server.root_path),
        get(search_ingredients),
    )
}
