use anyhow::Result;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use rand::Rng;

/// S3-compatible object store fronted by a CDN. Objects are uploaded
/// under unique keys and served from `{cdn_base_url}/{key}`.
pub struct MediaStorage {
    client: Client,
    bucket: String,
    cdn_base_url: String,
}

impl MediaStorage {
    pub fn new(client: Client, bucket: String, cdn_base_url: String) -> Self {
        Self {
            client,
            bucket,
            cdn_base_url: cdn_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Builds a unique object key from a sanitized filename. Collision
    /// avoidance is purely by naming; there is no coordination.
    pub fn unique_key(filename: &str) -> String {
        let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
        format!(
            "{}-{}-{}",
            chrono::Utc::now().timestamp_millis(),
            suffix,
            filename
        )
    }

    /// Uploads one object and returns its public CDN URL.
    pub async fn upload_media(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<String> {
        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data));

        if let Some(content_type) = content_type {
            request = request.content_type(content_type);
        }

        request.send().await?;

        tracing::info!(key, bucket = %self.bucket, "uploaded media object");
        Ok(self.public_url(key))
    }

    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.cdn_base_url, key)
    }

    pub async fn delete_media(&self, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await?;
        Ok(())
    }

    /// Connectivity probe for the health endpoint.
    pub async fn is_reachable(&self) -> bool {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .is_ok()
    }
}
