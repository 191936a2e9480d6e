use super::storage_repository::{StorageRepository, StoredObject};
use async_trait::async_trait;
use aws_sdk_s3::{primitives::ByteStream, Client as S3Client};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Amazon S3 implementation of the storage repository
pub struct S3StorageRepository {
    s3_client: Arc<S3Client>,
    bucket: String,
    public_base_url: String,
}

impl S3StorageRepository {
    /// `public_base_url` defaults to the bucket's virtual-hosted endpoint
    pub fn new(
        s3_client: Arc<S3Client>,
        bucket: String,
        region: &str,
        public_base_url: Option<String>,
    ) -> Self {
        let public_base_url = public_base_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| format!("https://{}.s3.{}.amazonaws.com", bucket, region));

        Self {
            s3_client,
            bucket,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }
}

/// Percent-encode the file name, leaving the directory part readable
fn encode_key(key: &str) -> String {
    match key.rsplit_once('/') {
        Some((dir, file)) => format!("{}/{}", dir, urlencoding::encode(file)),
        None => urlencoding::encode(key).into_owned(),
    }
}

#[async_trait]
impl StorageRepository for S3StorageRepository {
    async fn upload(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<String, String> {
        let size = data.len();

        self.s3_client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = ?e, bucket = %self.bucket, key = %key, "S3 put_object failed");
                format!("S3 upload error: {}", e)
            })?;

        tracing::info!(bucket = %self.bucket, key = %key, size, "Object uploaded");

        Ok(self.public_url(key))
    }

    async fn download(&self, key: &str) -> Result<Option<Vec<u8>>, String> {
        let output = match self
            .s3_client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => output,
            Err(e) => {
                if e.as_service_error().map(|se| se.is_no_such_key()).unwrap_or(false) {
                    tracing::debug!(bucket = %self.bucket, key = %key, "Object not found");
                    return Ok(None);
                }
                tracing::error!(error = ?e, bucket = %self.bucket, key = %key, "S3 get_object failed");
                return Err(format!("S3 download error: {}", e));
            }
        };

        let data = output
            .body
            .collect()
            .await
            .map_err(|e| format!("Failed to read S3 object body: {}", e))?;

        Ok(Some(data.into_bytes().to_vec()))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<StoredObject>, String> {
        let mut objects = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let output = self
                .s3_client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix)
                .set_continuation_token(continuation_token.take())
                .send()
                .await
                .map_err(|e| {
                    tracing::error!(error = ?e, bucket = %self.bucket, prefix = %prefix, "S3 list_objects_v2 failed");
                    format!("S3 list error: {}", e)
                })?;

            for object in output.contents() {
                let Some(key) = object.key() else {
                    continue;
                };
                let last_modified = object
                    .last_modified()
                    .and_then(|dt| DateTime::<Utc>::from_timestamp(dt.secs(), dt.subsec_nanos()))
                    .unwrap_or_default();
                objects.push(StoredObject {
                    key: key.to_string(),
                    size: object.size().unwrap_or(0).max(0) as u64,
                    last_modified,
                });
            }

            match output.next_continuation_token() {
                Some(token) if output.is_truncated().unwrap_or(false) => {
                    continuation_token = Some(token.to_string());
                }
                _ => break,
            }
        }

        tracing::debug!(bucket = %self.bucket, prefix = %prefix, count = objects.len(), "Objects listed");

        Ok(objects)
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, encode_key(key))
    }
}
