#![allow(dead_code)]

use aws_sdk_s3::config::{Credentials, Region};
use call_qa_backend::AppState;
use call_qa_backend::config::{AppConfig, GroqConfig, PipelineConfig, StorageConfig};
use call_qa_backend::services::inference::InferenceClient;
use call_qa_backend::services::pipeline::ReviewPipeline;
use call_qa_backend::services::prompts::ScoringMode;
use call_qa_backend::services::storage::MediaStorage;
use std::path::Path;
use std::sync::Arc;

/// Storage config pointing at a local endpoint nothing listens on.
pub fn test_storage_config() -> StorageConfig {
    StorageConfig {
        region: "us-east-1".to_string(),
        endpoint: "http://127.0.0.1:9000".to_string(),
        bucket: "test-media".to_string(),
        access_key_id: "minioadmin".to_string(),
        secret_access_key: "minioadmin".to_string(),
        cdn_base_url: "https://cdn.example.com".to_string(),
    }
}

pub async fn test_media_storage(config: &StorageConfig) -> Arc<MediaStorage> {
    let aws_config = aws_config::from_env()
        .endpoint_url(&config.endpoint)
        .region(Region::new(config.region.clone()))
        .credentials_provider(Credentials::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            None,
            None,
            "static",
        ))
        .load()
        .await;

    let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
        .force_path_style(true)
        .build();

    Arc::new(MediaStorage::new(
        aws_sdk_s3::Client::from_conf(s3_config),
        config.bucket.clone(),
        config.cdn_base_url.clone(),
    ))
}

/// App state with an injected inference client (or none, to exercise
/// the missing-credential path).
pub async fn test_state(
    inference: Option<Arc<dyn InferenceClient>>,
    scratch_dir: &Path,
) -> AppState {
    let storage_config = test_storage_config();
    let pipeline_config = PipelineConfig {
        scratch_dir: scratch_dir.to_path_buf(),
        ..PipelineConfig::default()
    };

    let pipeline = inference.map(|client| {
        Arc::new(ReviewPipeline::new(
            &pipeline_config,
            client,
            ScoringMode::Summary,
        ))
    });

    AppState {
        pipeline,
        storage: test_media_storage(&storage_config).await,
        config: AppConfig {
            groq: GroqConfig::default(),
            storage: storage_config,
            pipeline: pipeline_config,
        },
    }
}

/// Multipart request body with a single `file` field.
pub fn multipart_body(boundary: &str, filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
             Content-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

pub const BOUNDARY: &str = "---------------------------123456789012345678901234567";
