use std::future::Future;

use crate::domain::{
    common::entities::app_errors::CoreError,
    meal_analysis::{
        entities::{ExtractedMeal, MealAnalysis},
        staging::StagedImage,
        value_objects::AnalyzeMealInput,
    },
};

/// Image-to-nutrition collaborator. Reads the staged image and estimates the
/// ingredients it shows.
#[cfg_attr(test, mockall::automock)]
pub trait NutritionExtractor: Send + Sync {
    fn extract(
        &self,
        image: &StagedImage,
    ) -> impl Future<Output = Result<ExtractedMeal, CoreError>> + Send;
}

#[cfg_attr(test, mockall::automock)]
pub trait MealAnalysisService: Send + Sync {
    fn analyze_meal(
        &self,
        input: AnalyzeMealInput,
    ) -> impl Future<Output = Result<MealAnalysis, CoreError>> + Send;
}
