use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::AppState;
use crate::error::AppError;
use crate::models::{FeedbackReport, ResultSource};

#[derive(Deserialize, ToSchema)]
pub struct FeedbackRequest {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct FeedbackResponse {
    #[serde(flatten)]
    pub report: FeedbackReport,
    pub source: ResultSource,
}

#[utoipa::path(
    post,
    path = "/api/feedback",
    request_body = FeedbackRequest,
    responses(
        (status = 200, description = "QA feedback report (live or fallback)", body = FeedbackResponse),
        (status = 400, description = "No text provided"),
        (status = 500, description = "Provider credential missing")
    ),
    tag = "inference"
)]
pub async fn generate_feedback(
    State(state): State<AppState>,
    Json(request): Json<FeedbackRequest>,
) -> Result<Json<FeedbackResponse>, AppError> {
    let pipeline = state.pipeline()?;

    let text = request
        .text
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("No text provided".to_string()))?;

    let (report, source) = pipeline.score_text(&text).await;

    Ok(Json(FeedbackResponse { report, source }))
}
