use utoipa::OpenApi;

use crate::application::http::{
    health::router::HealthApiDoc, ingredient_search::router::IngredientSearchApiDoc,
    meal_analysis::router::MealAnalysisApiDoc,
};

use super::config::__path_get_config;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Nutriscope API"
    ),
    paths(get_config),
    nest(
        (path = "/health", api = HealthApiDoc),
        (path = "/search", api = IngredientSearchApiDoc),
        (path = "/upload", api = MealAnalysisApiDoc),
    )
)]
pub struct ApiDoc;
