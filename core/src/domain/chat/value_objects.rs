use uuid::Uuid;

use crate::domain::common::{entities::app_errors::CoreError, generate_uuid_v7};

pub const DEFAULT_SYSTEM_DIRECTIVE: &str = "You are a nutrition assistant. Only answer questions \
about food, ingredients, diets and nutrition. If a question is outside that domain, politely \
decline and remind the user what you can help with. If a question is ambiguous, ask a short \
clarifying question before answering.";

/// Instruction sent ahead of every user message to keep the assistant on topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemDirective(String);

impl SystemDirective {
    pub fn new(directive: impl Into<String>) -> Result<Self, CoreError> {
        let directive = directive.into();
        if directive.trim().is_empty() {
            return Err(CoreError::Validation(
                "system directive must not be empty".to_string(),
            ));
        }
        Ok(Self(directive.trim().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SystemDirective {
    fn default() -> Self {
        Self(DEFAULT_SYSTEM_DIRECTIVE.to_string())
    }
}

/// Issues UUIDv7 correlation ids that strictly increase within one session,
/// even when two ids fall in the same millisecond.
#[derive(Debug, Default)]
pub struct CorrelationIdGenerator {
    last: Option<Uuid>,
}

impl CorrelationIdGenerator {
    pub fn next_id(&mut self) -> Uuid {
        let candidate = generate_uuid_v7();
        let id = match self.last {
            Some(last) if candidate <= last => Uuid::from_u128(last.as_u128() + 1),
            _ => candidate,
        };
        self.last = Some(id);
        id
    }
}
