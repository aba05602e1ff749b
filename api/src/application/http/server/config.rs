use axum::extract::State;
use nutriscope_core::domain::vector_index::{entities::DistanceMetric, ports::VectorIndex};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{api_entities::response::Response, app_state::AppState};

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ConfigResponse {
    pub chat_model: String,
    pub embedding_model: String,
    pub vision_model: String,
    pub index: IndexInfo,
    pub search_default_k: usize,
    pub search_max_k: usize,
    pub upload_max_bytes: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct IndexInfo {
    pub dimension: usize,
    pub metric: DistanceMetric,
    pub items: usize,
}

#[utoipa::path(
    get,
    path = "/config",
    tag = "config",
    summary = "Public runtime configuration",
    responses(
        (status = 200, body = ConfigResponse)
    ),
)]
pub async fn get_config(State(state): State<AppState>) -> Response<ConfigResponse> {
    let index = state.service.vector_index();

    Response::OK(ConfigResponse {
        chat_model: state.args.llm.chat_model.clone(),
        embedding_model: state.args.llm.embedding_model.clone(),
        vision_model: state.args.llm.vision_model.clone(),
        index: IndexInfo {
            dimension: index.dimension(),
            metric: index.metric(),
            items: index.item_count(),
        },
        search_default_k: state.service.search_config().default_k,
        search_max_k: state.service.search_config().max_k,
        upload_max_bytes: state.service.upload_config().max_bytes,
    })
}
