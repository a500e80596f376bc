use axum::{Json, extract::Multipart, extract::State};
use serde::Serialize;
use utoipa::ToSchema;

use crate::AppState;
use crate::error::AppError;
use crate::handlers::extract_file_field;
use crate::services::storage::MediaStorage;
use crate::utils::validation::{sanitize_filename, validate_image_upload};

#[derive(Serialize, ToSchema)]
pub struct MediaUploadResponse {
    /// CDN-fronted public URL of the stored object
    pub url: String,
}

#[utoipa::path(
    post,
    path = "/api/upload",
    request_body(content = String, content_type = "multipart/form-data", description = "Image in a `file` field"),
    responses(
        (status = 200, description = "Object stored", body = MediaUploadResponse),
        (status = 400, description = "No file field or not an image"),
        (status = 500, description = "Storage error")
    ),
    tag = "media"
)]
pub async fn upload_media(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<MediaUploadResponse>, AppError> {
    let upload = extract_file_field(&mut multipart)
        .await?
        .ok_or_else(|| AppError::BadRequest("File is required".to_string()))?;

    validate_image_upload(upload.content_type.as_deref(), &upload.data)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let filename =
        sanitize_filename(&upload.filename).map_err(|e| AppError::BadRequest(e.to_string()))?;
    let key = MediaStorage::unique_key(&filename);

    let url = state
        .storage
        .upload_media(&key, upload.data, upload.content_type.as_deref())
        .await
        .map_err(|e| AppError::Storage(e.to_string()))?;

    Ok(Json(MediaUploadResponse { url }))
}
