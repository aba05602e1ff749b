use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    domain::{common::entities::app_errors::CoreError, ingredient_search::ports::EmbeddingClient},
    infrastructure::llm::gemini_client::{
        Content, GeminiLLMClient, ensure_success, transport_error,
    },
};

#[derive(Debug, Serialize)]
struct EmbedContentRequest {
    content: Content,
    task_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    output_dimensionality: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct EmbedContentResponse {
    embedding: ContentEmbedding,
}

#[derive(Debug, Deserialize)]
struct ContentEmbedding {
    values: Vec<f32>,
}

impl EmbeddingClient for GeminiLLMClient {
    #[instrument(skip_all, fields(model = %self.embedding_model, text_len = text.len()))]
    async fn embed(&self, text: String) -> Result<Vec<f32>, CoreError> {
        let url = self.model_url(&self.embedding_model, "embedContent");
        let request = EmbedContentRequest {
            content: Content::text(None, text),
            task_type: "RETRIEVAL_QUERY",
            output_dimensionality: self.embedding_dimension,
        };

        let response = self
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error("Embedding API error", e))?;

        let response = ensure_success(response).await?;

        let body: EmbedContentResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Gemini embedding response: {}", e);
            CoreError::ExternalServiceError(format!("Failed to parse embedding response: {}", e))
        })?;

        if body.embedding.values.is_empty() {
            return Err(CoreError::ExternalServiceError(
                "Embedding API returned an empty vector".to_string(),
            ));
        }

        Ok(body.embedding.values)
    }
}
