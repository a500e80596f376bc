use anyhow::{Result, anyhow};
use std::path::Path;

/// MIME types accepted on the inference endpoints. Whisper handles
/// common audio formats plus audio tracks inside video containers.
pub const ALLOWED_AUDIO_MIME_TYPES: &[&str] = &[
    "audio/mpeg",
    "audio/mp3",
    "audio/mp4",
    "audio/wav",
    "audio/x-wav",
    "audio/ogg",
    "audio/flac",
    "audio/x-flac",
    "audio/aac",
    "audio/webm",
    "audio/x-m4a",
    "video/mp4",
    "video/webm",
    "application/octet-stream",
];

/// MIME types accepted on the media upload endpoint.
pub const ALLOWED_IMAGE_MIME_TYPES: &[&str] =
    &["image/jpeg", "image/png", "image/gif", "image/webp"];

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub code: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Sanitizes a client-supplied filename to prevent path traversal and
/// injection. Keeps alphanumerics, dots and dashes; everything else
/// becomes an underscore.
pub fn sanitize_filename(filename: &str) -> Result<String> {
    let name = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");

    if name.is_empty() {
        return Err(anyhow!(ValidationError {
            code: "INVALID_FILENAME",
            message: "Filename cannot be empty".to_string(),
        }));
    }

    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        tracing::warn!("Path traversal attempt detected: {}", filename);
    }

    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let sanitized = if sanitized.len() > 128 {
        sanitized[sanitized.len() - 128..].to_string()
    } else {
        sanitized
    };

    if sanitized.chars().all(|c| c == '.' || c == '_') {
        return Err(anyhow!(ValidationError {
            code: "INVALID_FILENAME",
            message: format!("Filename '{}' contains no usable characters", filename),
        }));
    }

    Ok(sanitized)
}

fn normalize_mime(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase()
}

/// Validates the declared MIME type of an audio upload.
pub fn validate_audio_mime(content_type: Option<&str>) -> Result<()> {
    // Browsers recording via MediaRecorder often omit or generalize
    // the content type, so a missing declaration is accepted.
    let Some(content_type) = content_type else {
        return Ok(());
    };

    let normalized = normalize_mime(content_type);
    if ALLOWED_AUDIO_MIME_TYPES.iter().any(|&m| m == normalized) {
        return Ok(());
    }

    Err(anyhow!(ValidationError {
        code: "INVALID_MIME_TYPE",
        message: format!("'{}' is not a supported audio type", content_type),
    }))
}

/// Validates an image upload by declared MIME type and magic bytes.
pub fn validate_image_upload(content_type: Option<&str>, header: &[u8]) -> Result<()> {
    if let Some(content_type) = content_type {
        let normalized = normalize_mime(content_type);
        if !ALLOWED_IMAGE_MIME_TYPES.iter().any(|&m| m == normalized) {
            return Err(anyhow!(ValidationError {
                code: "INVALID_MIME_TYPE",
                message: format!("'{}' is not a supported image type", content_type),
            }));
        }
    }

    let detected = infer::get(header).map(|t| t.mime_type().to_string());
    match detected {
        Some(mime) if ALLOWED_IMAGE_MIME_TYPES.iter().any(|&m| m == mime) => Ok(()),
        Some(mime) => Err(anyhow!(ValidationError {
            code: "CONTENT_MISMATCH",
            message: format!("File content is '{}', not an allowed image type", mime),
        })),
        None => Err(anyhow!(ValidationError {
            code: "UNRECOGNIZED_CONTENT",
            message: "File content does not match any known image format".to_string(),
        })),
    }
}
