use std::sync::Arc;

use crate::{
    domain::common::{NutriscopeConfig, entities::app_errors::CoreError, services::Service},
    infrastructure::{llm::GeminiLLMClient, vector_index::FlatVectorIndex},
};

pub type NutriscopeService =
    Service<FlatVectorIndex, GeminiLLMClient, GeminiLLMClient, GeminiLLMClient>;

/// Loads the vector index and wires the Gemini collaborators.
///
/// Fails when the index cannot be loaded or the upload directory cannot be created.
pub async fn create_service(config: NutriscopeConfig) -> Result<NutriscopeService, CoreError> {
    let vector_index = FlatVectorIndex::load(&config.index.path, config.index.dimension).await?;

    tokio::fs::create_dir_all(&config.upload.directory)
        .await
        .map_err(|e| {
            tracing::error!(
                directory = %config.upload.directory.display(),
                "Failed to create upload directory: {}",
                e
            );
            CoreError::from(e)
        })?;

    let gemini = GeminiLLMClient::new(config.llm).with_embedding_dimension(config.index.dimension);

    Ok(Service::new(
        Arc::new(vector_index),
        gemini.clone(),
        gemini.clone(),
        gemini,
        config.chat,
        config.search,
        config.upload,
    ))
}
