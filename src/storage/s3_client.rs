//! S3-compatible blob store
//!
//! Wraps the AWS SDK for S3-compatible storage access (DigitalOcean Spaces,
//! MinIO, R2, AWS S3).

use aws_config::BehaviorVersion;
use aws_sdk_s3::{
    config::{Credentials, Region},
    primitives::ByteStream,
    types::ObjectCannedAcl,
    Client,
};
use axum::body::Bytes;

use super::blob_store::BlobStore;
use super::types::{ObjectMetadata, StoredObject};
use crate::config::StorageConfig;
use crate::error::StorageError;

/// S3-compatible storage client
#[derive(Clone)]
pub struct S3BlobStore {
    client: Client,
    bucket: String,
    endpoint: String,
}

impl S3BlobStore {
    /// Create a new S3 client from configuration.
    ///
    /// The bucket is probed once; an unreachable bucket is logged, not fatal.
    pub async fn new(config: &StorageConfig) -> Self {
        let credentials = Credentials::new(
            &config.access_key,
            &config.secret_key,
            None,
            None,
            "log-ingest-server",
        );

        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(&config.endpoint)
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        let client = Client::from_conf(s3_config);

        let bucket = config.bucket.clone();
        match client.head_bucket().bucket(&bucket).send().await {
            Ok(_) => {
                tracing::info!("Connected to S3 bucket: {}", bucket);
            }
            Err(e) => {
                tracing::warn!(
                    "Could not verify bucket {}: {}. Will attempt uploads anyway.",
                    bucket,
                    e
                );
            }
        }

        Self {
            client,
            bucket,
            endpoint: config.endpoint.clone(),
        }
    }

    /// Public URL of an object under path-style addressing
    pub fn object_url(&self, key: &str) -> String {
        object_url(&self.endpoint, &self.bucket, key)
    }
}

fn object_url(endpoint: &str, bucket: &str, key: &str) -> String {
    format!(
        "{}/{}/{}",
        endpoint.trim_end_matches('/'),
        bucket,
        urlencoding::encode(key)
    )
}

#[async_trait::async_trait]
impl BlobStore for S3BlobStore {
    async fn put(
        &self,
        key: &str,
        body: Bytes,
        metadata: ObjectMetadata,
    ) -> Result<StoredObject, StorageError> {
        let size = body.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(&metadata.content_type)
            .acl(ObjectCannedAcl::PublicRead)
            .metadata(ObjectMetadata::HASH_KEY, &metadata.sha256_hash)
            .send()
            .await
            .map_err(|e| {
                let reason = e.to_string();
                if reason.contains("AccessDenied") || reason.contains("403") {
                    StorageError::AccessDenied(format!("{}: {}", key, reason))
                } else {
                    StorageError::PutFailed {
                        key: key.to_string(),
                        reason,
                    }
                }
            })?;

        tracing::debug!(bucket = %self.bucket, key = %key, size, "Object stored");

        Ok(StoredObject {
            key: key.to_string(),
            location: self.object_url(key),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_url() {
        assert_eq!(
            object_url("https://nyc3.digitaloceanspaces.com/", "logs", "dev1-run.zip"),
            "https://nyc3.digitaloceanspaces.com/logs/dev1-run.zip"
        );
    }

    #[test]
    fn test_object_url_encodes_key() {
        assert_eq!(
            object_url("http://localhost:9000", "logs", "dev 1-crash log.zip"),
            "http://localhost:9000/logs/dev%201-crash%20log.zip"
        );
    }
}
