use base64::{Engine as _, engine::general_purpose};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};

use crate::domain::{
    chat::entities::{CompletionMessage, CompletionRole},
    common::{LLMConfig, entities::app_errors::CoreError},
};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Clone)]
pub struct GeminiLLMClient {
    api_key: String,
    base_url: String,
    pub(super) chat_model: String,
    pub(super) embedding_model: String,
    pub(super) vision_model: String,
    pub(super) embedding_dimension: Option<usize>,
    pub(super) client: Client,
}

#[derive(Debug, Serialize)]
pub(super) struct GeminiRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
pub(super) struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(super) enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
pub(super) struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Serialize)]
pub(super) struct GenerationConfig {
    pub response_mime_type: String,
    pub response_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct Candidate {
    pub content: Option<ContentResponse>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ContentResponse {
    #[serde(default)]
    pub parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
pub(super) struct PartResponse {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PromptFeedback {
    pub block_reason: Option<String>,
}

impl GeminiResponse {
    /// Concatenated text of the first candidate.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        Some(
            content
                .parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect(),
        )
    }

    pub fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback.as_ref()?.block_reason.as_deref()
    }
}

impl Content {
    pub fn text(role: Option<&str>, text: String) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part::Text { text }],
        }
    }
}

impl GeminiLLMClient {
    pub fn new(config: LLMConfig) -> Self {
        Self {
            api_key: config.gemini_api_key,
            base_url: config.gemini_base_url.trim_end_matches('/').to_string(),
            chat_model: config.chat_model,
            embedding_model: config.embedding_model,
            vision_model: config.vision_model,
            embedding_dimension: None,
            client: Client::new(),
        }
    }

    /// Requests embeddings truncated to `dimension` components.
    pub fn with_embedding_dimension(mut self, dimension: usize) -> Self {
        self.embedding_dimension = Some(dimension);
        self
    }

    pub(super) fn model_url(&self, model: &str, method: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, model, method)
    }

    /// POST request carrying the API key as a header, never in the URL.
    pub(super) fn post(&self, url: &str) -> RequestBuilder {
        self.client
            .post(url)
            .header(API_KEY_HEADER, self.api_key.as_str())
    }

    pub(super) async fn call_gemini_api(
        &self,
        model: &str,
        request: GeminiRequest,
    ) -> Result<String, CoreError> {
        let url = self.model_url(model, "generateContent");

        let response = self
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error("LLM API error", e))?;

        let response = ensure_success(response).await?;

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}", e);
            CoreError::ExternalServiceError(format!("Failed to parse LLM response: {}", e))
        })?;

        if let Some(reason) = gemini_response.block_reason() {
            return Err(CoreError::ExternalServiceError(format!(
                "LLM blocked the request: {}",
                reason
            )));
        }

        gemini_response
            .text()
            .filter(|text| !text.is_empty())
            .ok_or_else(|| CoreError::ExternalServiceError("No response from LLM".to_string()))
    }

    pub(super) async fn generate_with_image(
        &self,
        prompt: String,
        image_data: Vec<u8>,
        mime_type: &str,
        response_schema: serde_json::Value,
    ) -> Result<String, CoreError> {
        let base64_image = general_purpose::STANDARD.encode(&image_data);

        let request = GeminiRequest {
            contents: vec![Content {
                role: None,
                parts: vec![
                    Part::Text { text: prompt },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: mime_type.to_string(),
                            data: base64_image,
                        },
                    },
                ],
            }],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema,
            }),
        };

        self.call_gemini_api(&self.vision_model, request).await
    }
}

/// Maps a chat transcript onto Gemini's request shape. System messages become
/// the system instruction; the model role is called `model` by Gemini.
pub(super) fn chat_request(messages: Vec<CompletionMessage>) -> GeminiRequest {
    let mut system_parts = Vec::new();
    let mut contents = Vec::new();

    for message in messages {
        match message.role {
            CompletionRole::System => system_parts.push(Part::Text {
                text: message.content,
            }),
            CompletionRole::User => contents.push(Content::text(Some("user"), message.content)),
            CompletionRole::Model => contents.push(Content::text(Some("model"), message.content)),
        }
    }

    GeminiRequest {
        contents,
        system_instruction: (!system_parts.is_empty()).then(|| Content {
            role: None,
            parts: system_parts,
        }),
        generation_config: None,
    }
}

/// Maps a reqwest failure to a collaborator error. The request URL is
/// stripped so nothing about the endpoint reaches API clients.
pub(super) fn transport_error(context: &str, error: reqwest::Error) -> CoreError {
    let error = error.without_url();
    tracing::error!("Gemini request failed: {}: {}", context, error);
    CoreError::ExternalServiceError(format!("{}: {}", context, error))
}

pub(super) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, CoreError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let error_text = response.text().await.unwrap_or_default();
    tracing::error!("Gemini API error: {} - {}", status, error_text);
    Err(CoreError::ExternalServiceError(format!(
        "LLM API returned error: {} - {}",
        status, error_text
    )))
}
