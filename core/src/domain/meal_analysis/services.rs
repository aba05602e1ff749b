use tracing::instrument;

use crate::domain::{
    chat::ports::ChatCompletionClient,
    common::{entities::app_errors::CoreError, services::Service},
    ingredient_search::ports::EmbeddingClient,
    meal_analysis::{
        entities::{MealAnalysis, NutritionBreakdown},
        ports::{MealAnalysisService, NutritionExtractor},
        staging::StagedImage,
        value_objects::AnalyzeMealInput,
    },
    vector_index::ports::VectorIndex,
};

impl<V, E, L, N> MealAnalysisService for Service<V, E, L, N>
where
    V: VectorIndex,
    E: EmbeddingClient,
    L: ChatCompletionClient,
    N: NutritionExtractor,
{
    #[instrument(skip(self, input), fields(size = input.image_data.len()))]
    async fn analyze_meal(&self, input: AnalyzeMealInput) -> Result<MealAnalysis, CoreError> {
        if input.image_data.is_empty() {
            return Err(CoreError::Validation("image must not be empty".to_string()));
        }

        // The staged file lives until the end of this function on every path.
        let staged = StagedImage::stage(
            &self.upload_config.directory,
            input.filename.as_deref(),
            input.image_data,
        )
        .await?;

        let extracted = self.nutrition_extractor.extract(&staged).await?;
        let detected = extracted.ingredients.len();

        match NutritionBreakdown::from_extraction(extracted) {
            Some(breakdown) => {
                tracing::info!(
                    detected,
                    kept = breakdown.ingredients.len(),
                    "Meal analysis completed"
                );
                Ok(MealAnalysis::Breakdown(breakdown))
            }
            None => {
                tracing::info!(detected, "No ingredients extracted from meal image");
                Ok(MealAnalysis::NoIngredients)
            }
        }
    }
}
