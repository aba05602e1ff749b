use axum::extract::{
    Multipart, State,
    multipart::{MultipartError, MultipartRejection},
};
use axum::http::StatusCode;
use nutriscope_core::domain::meal_analysis::{
    entities::{MealAnalysis, NutritionBreakdown},
    ports::MealAnalysisService,
    value_objects::AnalyzeMealInput,
};
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::application::http::server::{
    api_entities::{api_error::ApiError, response::Response},
    app_state::AppState,
};

/// Multipart body accepted by the upload endpoint.
#[derive(ToSchema)]
pub struct MealUploadForm {
    /// JPEG, PNG, WebP or HEIC photo of the meal.
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::PayloadTooLarge("File too large".to_string());
    }
    error!("Failed to read multipart field: {}", e);
    ApiError::BadRequest(format!("Failed to read multipart field: {}", e.body_text()))
}

#[utoipa::path(
    post,
    path = "",
    tag = "meal-analysis",
    summary = "Analyze a meal photo",
    description = "Upload a meal photo as the `file` field of a multipart form. The image is \
        kept in a temporary file only while it is analyzed.",
    request_body(content = MealUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Per-ingredient and total nutrition", body = NutritionBreakdown),
        (status = 400, description = "Missing or empty file, or no ingredients recognized"),
        (status = 413, description = "File too large"),
        (status = 500, description = "Nutrition extraction failed")
    ),
)]
pub async fn upload_meal(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response<NutritionBreakdown>, ApiError> {
    let mut multipart = multipart.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let max_bytes = state.service.upload_config().max_bytes;

    let mut upload: Option<AnalyzeMealInput> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().map(str::to_string);
        let data = field.bytes().await.map_err(multipart_error)?;

        if data.is_empty() {
            warn!(filename = ?filename, "Empty meal upload attempted");
            return Err(ApiError::BadRequest("File cannot be empty".to_string()));
        }

        if data.len() > max_bytes {
            return Err(ApiError::PayloadTooLarge(format!(
                "File too large. Max size is {} bytes",
                max_bytes
            )));
        }

        upload = Some(AnalyzeMealInput {
            filename,
            image_data: data,
        });
        break;
    }

    let input = upload.ok_or_else(|| {
        ApiError::BadRequest("Missing 'file' field in multipart form".to_string())
    })?;

    let analysis = state.service.analyze_meal(input).await.map_err(|e| {
        error!(error = %e, "Failed to analyze meal");
        ApiError::from(e)
    })?;

    match analysis {
        MealAnalysis::Breakdown(breakdown) => Ok(Response::OK(breakdown)),
        MealAnalysis::NoIngredients => Err(ApiError::BadRequest(
            "could not extract ingredients".to_string(),
        )),
    }
}
