use axum::{Json, extract::Multipart, extract::State};
use serde::Serialize;
use utoipa::ToSchema;

use crate::AppState;
use crate::error::AppError;
use crate::handlers::extract_file_field;
use crate::models::ResultSource;
use crate::utils::validation::validate_audio_mime;

#[derive(Serialize, ToSchema)]
pub struct TranscriptionResponse {
    /// Transcript translated to the reviewer language, or the fixed
    /// fallback text
    pub text: String,
    pub source: ResultSource,
}

#[utoipa::path(
    post,
    path = "/api/transcribe",
    request_body(content = String, content_type = "multipart/form-data", description = "Audio recording in a `file` field"),
    responses(
        (status = 200, description = "Transcription (live or fallback)", body = TranscriptionResponse),
        (status = 400, description = "No file field or unsupported type"),
        (status = 500, description = "Provider credential missing")
    ),
    tag = "inference"
)]
pub async fn transcribe_audio(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<TranscriptionResponse>, AppError> {
    // Credential check precedes all file I/O and remote calls.
    let pipeline = state.pipeline()?;

    let upload = extract_file_field(&mut multipart)
        .await?
        .ok_or_else(|| AppError::BadRequest("No file uploaded".to_string()))?;

    validate_audio_mime(upload.content_type.as_deref())
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let outcome = pipeline
        .transcribe_audio(&upload.data, &upload.filename)
        .await;

    Ok(Json(TranscriptionResponse {
        text: outcome.text,
        source: outcome.source,
    }))
}
