use serde::{Deserialize, Serialize};
use utoipa::IntoParams;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, IntoParams)]
pub struct SearchIngredientsQuery {
    /// Free-text ingredient description.
    #[validate(length(min = 1, max = 512, message = "query must be 1 to 512 characters"))]
    pub query: String,

    /// Number of matches to return. Falls back to the configured default.
    #[validate(range(min = 1, message = "k must be positive"))]
    pub k: Option<usize>,
}
