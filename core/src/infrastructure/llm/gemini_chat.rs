use eventsource_stream::{EventStreamError, Eventsource};
use futures::{StreamExt, TryStreamExt};
use tracing::instrument;

use crate::{
    domain::{
        chat::{
            entities::CompletionMessage,
            ports::{ChatCompletionClient, CompletionStream},
        },
        common::entities::app_errors::CoreError,
    },
    infrastructure::llm::gemini_client::{
        GeminiLLMClient, GeminiResponse, chat_request, ensure_success, transport_error,
    },
};

impl ChatCompletionClient for GeminiLLMClient {
    #[instrument(skip_all, fields(model = %self.chat_model, messages = messages.len()))]
    async fn stream_completion(
        &self,
        messages: Vec<CompletionMessage>,
    ) -> Result<CompletionStream, CoreError> {
        let url = format!(
            "{}?alt=sse",
            self.model_url(&self.chat_model, "streamGenerateContent")
        );

        let response = self
            .post(&url)
            .json(&chat_request(messages))
            .send()
            .await
            .map_err(|e| transport_error("LLM API error", e))?;

        let response = ensure_success(response).await?;

        let stream = response
            .bytes_stream()
            .eventsource()
            .map_err(|e| match e {
                EventStreamError::Transport(e) => transport_error("LLM stream error", e),
                other => CoreError::ExternalServiceError(format!("LLM stream error: {}", other)),
            })
            .and_then(|event| async move { parse_stream_chunk(&event.data) });

        Ok(stream.boxed())
    }
}

/// Extracts the text delta carried by one SSE `data:` payload.
pub(super) fn parse_stream_chunk(data: &str) -> Result<String, CoreError> {
    let chunk: GeminiResponse = serde_json::from_str(data).map_err(|e| {
        tracing::error!("Failed to parse Gemini stream chunk: {}", e);
        CoreError::ExternalServiceError(format!("Failed to parse LLM stream chunk: {}", e))
    })?;

    if let Some(reason) = chunk.block_reason() {
        return Err(CoreError::ExternalServiceError(format!(
            "LLM blocked the request: {}",
            reason
        )));
    }

    if let Some(reason) = chunk
        .candidates
        .first()
        .and_then(|c| c.finish_reason.as_deref())
        .filter(|reason| *reason != "STOP")
    {
        tracing::warn!(finish_reason = reason, "Gemini stream finished early");
    }

    Ok(chunk.text().unwrap_or_default())
}
