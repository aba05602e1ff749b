use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::instrument;

use crate::{
    domain::{
        common::entities::app_errors::CoreError,
        meal_analysis::{
            entities::{ExtractedMeal, Ingredient, IngredientEstimate},
            ports::NutritionExtractor,
            schema::{MEAL_EXTRACTION_PROMPT, get_meal_extraction_schema},
            staging::StagedImage,
        },
    },
    infrastructure::llm::gemini_client::GeminiLLMClient,
};

#[derive(Debug, Deserialize)]
struct ExtractionResponse {
    #[serde(default)]
    ingredients: Vec<ExtractedIngredientResponse>,
}

#[derive(Debug, Deserialize)]
struct ExtractedIngredientResponse {
    name: String,
    grams: f64,
    calories: f64,
    protein_g: f64,
    carbohydrates_g: f64,
    fat_g: f64,
    fiber_g: Option<f64>,
    sugar_g: Option<f64>,
    sodium_mg: Option<f64>,
}

impl From<ExtractedIngredientResponse> for IngredientEstimate {
    fn from(value: ExtractedIngredientResponse) -> Self {
        let mut nutrients = BTreeMap::from([
            ("calories".to_string(), value.calories),
            ("protein_g".to_string(), value.protein_g),
            ("carbohydrates_g".to_string(), value.carbohydrates_g),
            ("fat_g".to_string(), value.fat_g),
        ]);
        let optional = [
            ("fiber_g", value.fiber_g),
            ("sugar_g", value.sugar_g),
            ("sodium_mg", value.sodium_mg),
        ];
        for (nutrient, amount) in optional {
            if let Some(amount) = amount {
                nutrients.insert(nutrient.to_string(), amount);
            }
        }

        IngredientEstimate {
            ingredient: Ingredient {
                name: value.name,
                grams: value.grams,
            },
            nutrients,
        }
    }
}

pub(super) fn parse_extraction(raw_response: &str) -> Result<ExtractedMeal, CoreError> {
    let parsed: ExtractionResponse = serde_json::from_str(raw_response).map_err(|e| {
        tracing::error!("Invalid ingredients format: {}", e);
        CoreError::ExternalServiceError(format!("Invalid ingredients format: {}", e))
    })?;

    Ok(ExtractedMeal {
        ingredients: parsed.ingredients.into_iter().map(Into::into).collect(),
        total_meal: None,
    })
}

impl NutritionExtractor for GeminiLLMClient {
    #[instrument(skip_all, fields(model = %self.vision_model, mime_type = image.mime_type()))]
    async fn extract(&self, image: &StagedImage) -> Result<ExtractedMeal, CoreError> {
        let image_data = tokio::fs::read(image.path()).await?;

        let raw_response = self
            .generate_with_image(
                MEAL_EXTRACTION_PROMPT.to_string(),
                image_data,
                image.mime_type(),
                get_meal_extraction_schema(),
            )
            .await?;

        parse_extraction(&raw_response)
    }
}
