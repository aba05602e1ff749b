use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionRole {
    System,
    User,
    Model,
}

/// One entry of the message list sent to the chat completion collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionMessage {
    pub role: CompletionRole,
    pub content: String,
}

impl CompletionMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: CompletionRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: CompletionRole::User,
            content: content.into(),
        }
    }
}

/// An inbound user message tagged with the identifier used for every frame of its answer.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub correlation_id: Uuid,
    pub text: String,
}

/// Outbound frame on the chat transport.
///
/// Text frames are `"<id> <cumulative text>"`. Control frames put a colon
/// right after the id (`"<id>:done"`, `"<id>:error <message>"`), so a client
/// tells them apart by the character following the 36-character id.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatFrame {
    Partial { correlation_id: Uuid, text: String },
    Done { correlation_id: Uuid },
    Error { correlation_id: Uuid, message: String },
}

impl ChatFrame {
    pub fn correlation_id(&self) -> Uuid {
        match self {
            ChatFrame::Partial { correlation_id, .. }
            | ChatFrame::Done { correlation_id }
            | ChatFrame::Error { correlation_id, .. } => *correlation_id,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ChatFrame::Partial { .. })
    }
}

impl fmt::Display for ChatFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatFrame::Partial {
                correlation_id,
                text,
            } => write!(f, "{} {}", correlation_id, text),
            ChatFrame::Done { correlation_id } => write!(f, "{}:done", correlation_id),
            ChatFrame::Error {
                correlation_id,
                message,
            } => write!(f, "{}:error {}", correlation_id, message),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Open,
    AwaitingCompletion,
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_render_with_correlation_prefix() {
        let id = Uuid::nil();

        let partial = ChatFrame::Partial {
            correlation_id: id,
            text: "Avocados are rich in fat".to_string(),
        };
        assert_eq!(
            partial.to_string(),
            "00000000-0000-0000-0000-000000000000 Avocados are rich in fat"
        );

        let done = ChatFrame::Done { correlation_id: id };
        assert_eq!(done.to_string(), "00000000-0000-0000-0000-000000000000:done");

        let error = ChatFrame::Error {
            correlation_id: id,
            message: "upstream unavailable".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "00000000-0000-0000-0000-000000000000:error upstream unavailable"
        );
    }

    #[test]
    fn only_partial_frames_are_non_terminal() {
        let id = Uuid::nil();
        assert!(
            !ChatFrame::Partial {
                correlation_id: id,
                text: String::new()
            }
            .is_terminal()
        );
        assert!(ChatFrame::Done { correlation_id: id }.is_terminal());
    }
}
