use crate::domain::common::{SearchConfig, entities::app_errors::CoreError};

/// A validated similarity lookup. Only constructible through [`SimilarityQuery::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityQuery {
    text: String,
    k: usize,
}

impl SimilarityQuery {
    /// Normalizes whitespace and checks bounds. `k` falls back to the configured default.
    pub fn new(text: &str, k: Option<usize>, config: &SearchConfig) -> Result<Self, CoreError> {
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if text.is_empty() {
            return Err(CoreError::Validation(
                "query must not be empty".to_string(),
            ));
        }

        let k = k.unwrap_or(config.default_k);
        if k == 0 {
            return Err(CoreError::Validation("k must be positive".to_string()));
        }
        if k > config.max_k {
            return Err(CoreError::Validation(format!(
                "k must not exceed {}",
                config.max_k
            )));
        }

        Ok(Self { text, k })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn k(&self) -> usize {
        self.k
    }
}
