use std::path::PathBuf;

use clap::Parser;
use nutriscope_core::domain::{
    chat::value_objects::SystemDirective,
    common::{
        ChatConfig, DEFAULT_MAX_PENDING_MESSAGES, IndexConfig, LLMConfig, NutriscopeConfig,
        SearchConfig, UploadConfig, entities::app_errors::CoreError,
    },
};
use nutriscope_core::infrastructure::llm::gemini_client::DEFAULT_GEMINI_BASE_URL;

#[derive(Debug, Clone, Parser)]
#[command(name = "nutriscope-server", about, version)]
pub struct Args {
    #[command(flatten)]
    pub server: ServerArgs,

    #[command(flatten)]
    pub log: LogArgs,

    #[command(flatten)]
    pub llm: LlmArgs,

    #[command(flatten)]
    pub index: IndexArgs,

    #[command(flatten)]
    pub chat: ChatArgs,

    #[command(flatten)]
    pub search: SearchArgs,

    #[command(flatten)]
    pub upload: UploadArgs,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ServerArgs {
    #[arg(
        long = "server-host",
        env = "SERVER_HOST",
        name = "SERVER_HOST",
        default_value = "0.0.0.0"
    )]
    pub host: String,

    #[arg(
        long = "server-port",
        env = "SERVER_PORT",
        name = "SERVER_PORT",
        default_value_t = 8000
    )]
    pub port: u16,

    #[arg(
        long = "server-root-path",
        env = "SERVER_ROOT_PATH",
        name = "SERVER_ROOT_PATH",
        default_value = ""
    )]
    pub root_path: String,

    #[arg(
        long = "server-allowed-origins",
        env = "ALLOWED_ORIGINS",
        name = "ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:3000"
    )]
    pub allowed_origins: Vec<String>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct LogArgs {
    #[arg(
        long = "log-filter",
        env = "LOG_FILTER",
        name = "LOG_FILTER",
        default_value = "info"
    )]
    pub filter: String,

    #[arg(long = "log-json", env = "LOG_JSON", name = "LOG_JSON")]
    pub json: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct LlmArgs {
    #[arg(long = "gemini-api-key", env = "GEMINI_API_KEY", name = "GEMINI_API_KEY")]
    pub gemini_api_key: String,

    #[arg(
        long = "gemini-base-url",
        env = "GEMINI_BASE_URL",
        name = "GEMINI_BASE_URL",
        default_value = DEFAULT_GEMINI_BASE_URL
    )]
    pub gemini_base_url: String,

    #[arg(
        long = "gemini-chat-model",
        env = "GEMINI_CHAT_MODEL",
        name = "GEMINI_CHAT_MODEL",
        default_value = "gemini-2.0-flash"
    )]
    pub chat_model: String,

    #[arg(
        long = "gemini-embedding-model",
        env = "GEMINI_EMBEDDING_MODEL",
        name = "GEMINI_EMBEDDING_MODEL",
        default_value = "text-embedding-004"
    )]
    pub embedding_model: String,

    #[arg(
        long = "gemini-vision-model",
        env = "GEMINI_VISION_MODEL",
        name = "GEMINI_VISION_MODEL",
        default_value = "gemini-2.0-flash"
    )]
    pub vision_model: String,
}

#[derive(clap::Args, Debug, Clone)]
pub struct IndexArgs {
    #[arg(long = "index-path", env = "INDEX_PATH", name = "INDEX_PATH")]
    pub path: PathBuf,

    #[arg(
        long = "index-dimension",
        env = "INDEX_DIMENSION",
        name = "INDEX_DIMENSION",
        default_value_t = 768
    )]
    pub dimension: usize,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ChatArgs {
    #[arg(
        long = "chat-system-directive",
        env = "CHAT_SYSTEM_DIRECTIVE",
        name = "CHAT_SYSTEM_DIRECTIVE",
        conflicts_with = "CHAT_SYSTEM_DIRECTIVE_FILE"
    )]
    pub system_directive: Option<String>,

    #[arg(
        long = "chat-system-directive-file",
        env = "CHAT_SYSTEM_DIRECTIVE_FILE",
        name = "CHAT_SYSTEM_DIRECTIVE_FILE"
    )]
    pub system_directive_file: Option<PathBuf>,

    /// Messages a connection may queue while an answer is streaming.
    #[arg(
        long = "chat-max-pending",
        env = "CHAT_MAX_PENDING",
        name = "CHAT_MAX_PENDING",
        default_value_t = DEFAULT_MAX_PENDING_MESSAGES
    )]
    pub max_pending: usize,
}

#[derive(clap::Args, Debug, Clone)]
pub struct SearchArgs {
    #[arg(
        long = "search-default-k",
        env = "SEARCH_DEFAULT_K",
        name = "SEARCH_DEFAULT_K",
        default_value_t = 5
    )]
    pub default_k: usize,

    #[arg(
        long = "search-max-k",
        env = "SEARCH_MAX_K",
        name = "SEARCH_MAX_K",
        default_value_t = 50
    )]
    pub max_k: usize,
}

#[derive(clap::Args, Debug, Clone)]
pub struct UploadArgs {
    /// Directory holding in-flight meal images. Defaults to the system temp directory.
    #[arg(long = "upload-dir", env = "UPLOAD_DIR", name = "UPLOAD_DIR")]
    pub directory: Option<PathBuf>,

    #[arg(
        long = "upload-max-bytes",
        env = "UPLOAD_MAX_BYTES",
        name = "UPLOAD_MAX_BYTES",
        default_value_t = 10 * 1024 * 1024
    )]
    pub max_bytes: usize,
}

impl ChatArgs {
    fn system_directive(&self) -> Result<SystemDirective, CoreError> {
        match (&self.system_directive, &self.system_directive_file) {
            (Some(directive), _) => SystemDirective::new(directive.clone()),
            (None, Some(path)) => {
                let directive = std::fs::read_to_string(path).map_err(|e| {
                    CoreError::Validation(format!(
                        "cannot read system directive from {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                SystemDirective::new(directive)
            }
            (None, None) => Ok(SystemDirective::default()),
        }
    }
}

impl TryFrom<Args> for NutriscopeConfig {
    type Error = CoreError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let system_directive = args.chat.system_directive()?;

        if args.search.default_k == 0 || args.search.default_k > args.search.max_k {
            return Err(CoreError::Validation(format!(
                "search default k must be between 1 and {}",
                args.search.max_k
            )));
        }

        Ok(NutriscopeConfig {
            llm: LLMConfig {
                gemini_api_key: args.llm.gemini_api_key,
                gemini_base_url: args.llm.gemini_base_url,
                chat_model: args.llm.chat_model,
                embedding_model: args.llm.embedding_model,
                vision_model: args.llm.vision_model,
            },
            index: IndexConfig {
                path: args.index.path,
                dimension: args.index.dimension,
            },
            chat: ChatConfig {
                system_directive,
                max_pending: args.chat.max_pending,
            },
            search: SearchConfig {
                default_k: args.search.default_k,
                max_k: args.search.max_k,
            },
            upload: UploadConfig {
                directory: args
                    .upload
                    .directory
                    .unwrap_or_else(|| UploadConfig::default().directory),
                max_bytes: args.upload.max_bytes,
            },
        })
    }
}
