pub mod config;
pub mod error;
pub mod handlers;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod utils;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::services::pipeline::ReviewPipeline;
use crate::services::storage::MediaStorage;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::transcribe::transcribe_audio,
        handlers::feedback::generate_feedback,
        handlers::review::review_call,
        handlers::media::upload_media,
        handlers::health::health_check,
    ),
    components(
        schemas(
            handlers::transcribe::TranscriptionResponse,
            handlers::feedback::FeedbackRequest,
            handlers::feedback::FeedbackResponse,
            handlers::review::ReviewResponse,
            handlers::media::MediaUploadResponse,
            handlers::health::HealthResponse,
            models::FeedbackReport,
            models::CriterionScore,
            models::ResultSource,
        )
    ),
    tags(
        (name = "inference", description = "Transcription and QA scoring endpoints"),
        (name = "media", description = "Media storage endpoints"),
        (name = "system", description = "Health and diagnostics")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    /// `None` when no provider credential is configured; inference
    /// endpoints answer 500 in that case.
    pub pipeline: Option<Arc<ReviewPipeline>>,
    pub storage: Arc<MediaStorage>,
    pub config: AppConfig,
}

impl AppState {
    pub fn pipeline(&self) -> Result<&ReviewPipeline, AppError> {
        self.pipeline
            .as_deref()
            .ok_or(AppError::MissingCredential)
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(handlers::health::health_check))
        .route("/api/transcribe", post(handlers::transcribe::transcribe_audio))
        .route("/api/feedback", post(handlers::feedback::generate_feedback))
        .route("/api/review", post(handlers::review::review_call))
        .route("/api/upload", post(handlers::media::upload_media))
        .with_state(state)
}
