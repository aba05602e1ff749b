use std::future::Future;

use crate::domain::{
    common::entities::app_errors::CoreError, ingredient_search::entities::IngredientMatch,
};

/// Converts text into the fixed-dimension vector space of the ingredient index.
#[cfg_attr(test, mockall::automock)]
pub trait EmbeddingClient: Send + Sync {
    fn embed(&self, text: String) -> impl Future<Output = Result<Vec<f32>, CoreError>> + Send;
}

#[cfg_attr(test, mockall::automock)]
pub trait IngredientSearchService: Send + Sync {
    /// Ingredients most similar to `text`, best first. An empty vector is a
    /// successful lookup with no close matches.
    fn search_ingredients(
        &self,
        text: String,
        k: Option<usize>,
    ) -> impl Future<Output = Result<Vec<IngredientMatch>, CoreError>> + Send;
}
