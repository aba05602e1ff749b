use std::sync::Arc;

use crate::domain::common::{ChatConfig, SearchConfig, UploadConfig};

/// Aggregate service holding every collaborator the use cases need.
///
/// The vector index is shared read-only across clones; the clients are cheap
/// handles over pooled HTTP connections.
pub struct Service<V, E, L, N> {
    pub(crate) vector_index: Arc<V>,
    pub(crate) embedding_client: E,
    pub(crate) llm_client: L,
    pub(crate) nutrition_extractor: N,
    pub(crate) chat_config: ChatConfig,
    pub(crate) search_config: SearchConfig,
    pub(crate) upload_config: UploadConfig,
}

impl<V, E, L, N> Service<V, E, L, N> {
    pub fn new(
        vector_index: Arc<V>,
        embedding_client: E,
        llm_client: L,
        nutrition_extractor: N,
        chat_config: ChatConfig,
        search_config: SearchConfig,
        upload_config: UploadConfig,
    ) -> Self {
        Self {
            vector_index,
            embedding_client,
            llm_client,
            nutrition_extractor,
            chat_config,
            search_config,
            upload_config,
        }
    }

    pub fn chat_config(&self) -> &ChatConfig {
        &self.chat_config
    }

    pub fn search_config(&self) -> &SearchConfig {
        &self.search_config
    }

    pub fn upload_config(&self) -> &UploadConfig {
        &self.upload_config
    }

    pub fn vector_index(&self) -> &V {
        &self.vector_index
    }
}

impl<V, E, L, N> Clone for Service<V, E, L, N>
where
    E: Clone,
    L: Clone,
    N: Clone,
{
    fn clone(&self) -> Self {
        Self {
            vector_index: Arc::clone(&self.vector_index),
            embedding_client: self.embedding_client.clone(),
            llm_client: self.llm_client.clone(),
            nutrition_extractor: self.nutrition_extractor.clone(),
            chat_config: self.chat_config.clone(),
            search_config: self.search_config.clone(),
            upload_config: self.upload_config.clone(),
        }
    }
}
