use std::path::PathBuf;

use chrono::{DateTime, Utc};
use uuid::{NoContext, Timestamp, Uuid};

use crate::domain::chat::value_objects::SystemDirective;

pub mod entities;
pub mod services;

#[derive(Clone, Debug)]
pub struct NutriscopeConfig {
    pub llm: LLMConfig,
    pub index: IndexConfig,
    pub chat: ChatConfig,
    pub search: SearchConfig,
    pub upload: UploadConfig,
}

#[derive(Clone, Debug)]
pub struct LLMConfig {
    pub gemini_api_key: String,
    pub gemini_base_url: String,
    pub chat_model: String,
    pub embedding_model: String,
    pub vision_model: String,
}

#[derive(Clone, Debug)]
pub struct IndexConfig {
    pub path: PathBuf,
    /// Dimensionality the embedding model produces. The persisted index must match it.
    pub dimension: usize,
}

/// Messages a chat connection may queue while an answer is still streaming.
pub const DEFAULT_MAX_PENDING_MESSAGES: usize = 16;

#[derive(Clone, Debug)]
pub struct ChatConfig {
    pub system_directive: SystemDirective,
    pub max_pending: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            system_directive: SystemDirective::default(),
            max_pending: DEFAULT_MAX_PENDING_MESSAGES,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SearchConfig {
    pub default_k: usize,
    pub max_k: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_k: 5,
            max_k: 50,
        }
    }
}

#[derive(Clone, Debug)]
pub struct UploadConfig {
    pub directory: PathBuf,
    pub max_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            directory: std::env::temp_dir(),
            max_bytes: 10 * 1024 * 1024,
        }
    }
}

pub fn generate_timestamp() -> (DateTime<Utc>, Timestamp) {
    let now = Utc::now();
    let seconds = now.timestamp().try_into().unwrap_or(0);
    let timestamp = Timestamp::from_unix(NoContext, seconds, now.timestamp_subsec_nanos());

    (now, timestamp)
}

pub fn generate_uuid_v7() -> Uuid {
    let (_, timestamp) = generate_timestamp();
    Uuid::new_v7(timestamp)
}
