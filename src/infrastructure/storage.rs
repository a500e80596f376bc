use std::sync::Arc;
use tracing::info;

use crate::config::StorageConfig;
use crate::services::storage::MediaStorage;

/// Builds the S3 client once at startup. All requests share it.
pub async fn setup_storage(config: &StorageConfig) -> Arc<MediaStorage> {
    info!(
        "☁️  Media storage: {} (Bucket: {})",
        config.endpoint, config.bucket
    );

    let aws_config = aws_config::from_env()
        .endpoint_url(&config.endpoint)
        .region(aws_sdk_s3::config::Region::new(config.region.clone()))
        .credentials_provider(aws_sdk_s3::config::Credentials::new(
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

    let s3_client = aws_sdk_s3::Client::from_conf(s3_config);
    Arc::new(MediaStorage::new(
        s3_client,
        config.bucket.clone(),
        config.cdn_base_url.clone(),
    ))
}
