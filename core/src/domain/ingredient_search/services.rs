use tracing::instrument;

use crate::domain::{
    chat::ports::ChatCompletionClient,
    common::{entities::app_errors::CoreError, services::Service},
    ingredient_search::{
        entities::IngredientMatch,
        ports::{EmbeddingClient, IngredientSearchService},
        value_objects::SimilarityQuery,
    },
    meal_analysis::ports::NutritionExtractor,
    vector_index::ports::VectorIndex,
};

impl<V, E, L, N> IngredientSearchService for Service<V, E, L, N>
where
    V: VectorIndex,
    E: EmbeddingClient,
    L: ChatCompletionClient,
    N: NutritionExtractor,
{
    #[instrument(skip(self, text), fields(query_len = text.len()))]
    async fn search_ingredients(
        &self,
        text: String,
        k: Option<usize>,
    ) -> Result<Vec<IngredientMatch>, CoreError> {
        let query = SimilarityQuery::new(&text, k, &self.search_config)?;

        let embedding = self
            .embedding_client
            .embed(query.text().to_string())
            .await?;

        let matches: Vec<IngredientMatch> = self
            .vector_index
            .query(&embedding, query.k())?
            .into_iter()
            .map(IngredientMatch::from)
            .collect();

        tracing::debug!(k = query.k(), found = matches.len(), "Ingredient search completed");

        Ok(matches)
    }
}
