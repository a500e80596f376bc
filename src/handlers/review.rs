use axum::{Json, extract::Multipart, extract::State};
use serde::Serialize;
use utoipa::ToSchema;

use crate::AppState;
use crate::error::AppError;
use crate::handlers::extract_file_field;
use crate::models::{FeedbackReport, ResultSource};
use crate::utils::validation::validate_audio_mime;

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    #[serde(flatten)]
    pub report: FeedbackReport,
    /// Source-language transcript as recognized
    pub transcript: String,
    /// Transcript translated to the reviewer language
    pub translated_transcript: String,
    pub source: ResultSource,
}

/// Combined endpoint: one upload runs the whole chain (stage,
/// compress if oversized, transcribe, translate, score).
#[utoipa::path(
    post,
    path = "/api/review",
    request_body(content = String, content_type = "multipart/form-data", description = "Audio recording in a `file` field"),
    responses(
        (status = 200, description = "Feedback report with transcripts (live or fallback)", body = ReviewResponse),
        (status = 400, description = "No file field or unsupported type"),
        (status = 500, description = "Provider credential missing")
    ),
    tag = "inference"
)]
pub async fn review_call(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ReviewResponse>, AppError> {
    let pipeline = state.pipeline()?;

    let upload = extract_file_field(&mut multipart)
        .await?
        .ok_or_else(|| AppError::BadRequest("No file uploaded".to_string()))?;

    validate_audio_mime(upload.content_type.as_deref())
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let outcome = pipeline.review_audio(&upload.data, &upload.filename).await;

    Ok(Json(ReviewResponse {
        report: outcome.report,
        transcript: outcome.transcript,
        translated_transcript: outcome.translated_transcript,
        source: outcome.source,
    }))
}
