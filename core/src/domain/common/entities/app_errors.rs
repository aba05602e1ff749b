use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Failed to load vector index: {0}")]
    IndexLoad(String),

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("External service error: {0}")]
    ExternalServiceError(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Internal server error")]
    InternalServerError,
}

impl From<std::io::Error> for CoreError {
    fn from(value: std::io::Error) -> Self {
        CoreError::Io(value.to_string())
    }
}
