use tracing::instrument;

use crate::domain::{
    chat::{
        entities::{ChatMessage, CompletionMessage},
        ports::{ChatCompletionClient, ChatService, CompletionStream},
    },
    common::{entities::app_errors::CoreError, services::Service},
    ingredient_search::ports::EmbeddingClient,
    meal_analysis::ports::NutritionExtractor,
    vector_index::ports::VectorIndex,
};

impl<V, E, L, N> ChatService for Service<V, E, L, N>
where
    V: VectorIndex,
    E: EmbeddingClient,
    L: ChatCompletionClient,
    N: NutritionExtractor,
{
    #[instrument(skip(self, message), fields(correlation_id = %message.correlation_id))]
    async fn open_completion(&self, message: ChatMessage) -> Result<CompletionStream, CoreError> {
        let messages = vec![
            CompletionMessage::system(self.chat_config.system_directive.as_str()),
            CompletionMessage::user(message.text),
        ];

        self.llm_client.stream_completion(messages).await
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;
    use uuid::Uuid;

    use super::*;
    use crate::{
        domain::chat::entities::CompletionRole,
        test_support::{FakeChatClient, ScriptedReply, chat_service_with},
    };

    #[tokio::test]
    async fn sends_system_directive_then_user_text() {
        let client = FakeChatClient::new(vec![ScriptedReply::fragments(&["Hi"])]);
        let requests = client.requests.clone();
        let service = chat_service_with(client);

        let stream = service
            .open_completion(ChatMessage {
                correlation_id: Uuid::nil(),
                text: "How much protein is in an egg?".to_string(),
            })
            .await
            .unwrap();
        let fragments: Vec<_> = stream.collect().await;
        assert_eq!(fragments, vec![Ok("Hi".to_string())]);

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let messages = &requests[0];
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, CompletionRole::System);
        assert!(messages[0].content.contains("nutrition"));
        assert_eq!(messages[1].role, CompletionRole::User);
        assert_eq!(messages[1].content, "How much protein is in an egg?");
    }
}
