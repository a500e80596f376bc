pub mod feedback;
pub mod health;
pub mod media;
pub mod review;
pub mod transcribe;

use axum::extract::Multipart;

use crate::error::AppError;

/// One uploaded binary: raw bytes plus what the client declared about
/// them. Owned by the handler, gone when the request finishes.
pub struct UploadedMedia {
    pub data: Vec<u8>,
    pub filename: String,
    pub content_type: Option<String>,
}

/// Pulls the single `file` field out of a multipart form. Returns
/// `None` when the form has no such field.
pub(crate) async fn extract_file_field(
    multipart: &mut Multipart,
) -> Result<Option<UploadedMedia>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name().unwrap_or_default() != "file" {
            continue;
        }

        let filename = field.file_name().unwrap_or("unnamed").to_string();
        let content_type = field.content_type().map(|s| s.to_string());

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
            .to_vec();

        return Ok(Some(UploadedMedia {
            data,
            filename,
            content_type,
        }));
    }

    Ok(None)
}
