use axum::{Router, routing::get};

use crate::application::http::server::app_state::AppState;

use super::handlers::chat_socket::chat_socket;

pub fn chat_routes(state: AppState) -> Router<AppState> {
    Router::new().route(
        &format!("{}/chat", state.args.server.root_path),
        get(chat_socket),
    )
}
