pub mod gemini_chat;
pub mod gemini_client;
pub mod gemini_embedding;
pub mod gemini_nutrition;

pub use gemini_client::GeminiLLMClient;
