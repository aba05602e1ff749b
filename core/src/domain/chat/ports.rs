use std::future::Future;

use futures::stream::BoxStream;

use crate::domain::{
    chat::entities::{ChatMessage, CompletionMessage},
    common::entities::app_errors::CoreError,
};

/// Incremental text fragments of one completion. Each item is a delta, not the
/// cumulative text.
pub type CompletionStream = BoxStream<'static, Result<String, CoreError>>;

/// Streaming chat-completion collaborator.
#[cfg_attr(test, mockall::automock)]
pub trait ChatCompletionClient: Send + Sync {
    fn stream_completion(
        &self,
        messages: Vec<CompletionMessage>,
    ) -> impl Future<Output = Result<CompletionStream, CoreError>> + Send;
}

#[cfg_attr(test, mockall::automock)]
pub trait ChatService: Send + Sync {
    /// Opens the upstream completion for one user message, prefixed by the
    /// configured system directive.
    fn open_completion(
        &self,
        message: ChatMessage,
    ) -> impl Future<Output = Result<CompletionStream, CoreError>> + Send;
}
