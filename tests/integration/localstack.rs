//! LocalStack test context and utilities.

use aws_sdk_s3::Client as S3Client;
use layup_core::aws::SessionConfig;

/// LocalStack test context providing an S3 client scoped to the emulator.
pub struct LocalStackTestContext {
    pub s3: S3Client,
    pub endpoint: String,
    pub region: String,
}

impl LocalStackTestContext {
    /// Create a new LocalStack test context.
    ///
    /// Uses the `LOCALSTACK_ENDPOINT` environment variable if set,
    /// otherwise defaults to `http://localhost:4566`.
    pub async fn new() -> Self {
        let endpoint = std::env::var("LOCALSTACK_ENDPOINT")
            .unwrap_or_else(|_| "http://localhost:4566".to_string());
        let region = "us-east-1".to_string();

        let config = SessionConfig::new()
            .with_region(&region)
            .with_endpoint(&endpoint);

        Self {
            s3: layup_core::aws::s3_client(&config).await,
            endpoint,
            region,
        }
    }

    /// Check if LocalStack is available and healthy.
    pub async fn is_available(&self) -> bool {
        self.s3.list_buckets().send().await.is_ok()
    }

    /// Create an S3 bucket for testing, tolerating reruns.
    pub async fn create_bucket(&self, name: &str) -> Result<(), aws_sdk_s3::Error> {
        let buckets = self.s3.list_buckets().send().await?;
        let exists = buckets
            .buckets()
            .iter()
            .any(|b| b.name().unwrap_or_default() == name);

        if !exists {
            self.s3.create_bucket().bucket(name).send().await?;
        }
        Ok(())
    }

    /// Put a small object so listing probes have something to see.
    pub async fn put_object(&self, bucket: &str, key: &str) -> Result<(), aws_sdk_s3::Error> {
        self.s3
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(aws_sdk_s3::primitives::ByteStream::from_static(b"probe"))
            .send()
            .await?;
        Ok(())
    }

    /// Delete a bucket and everything in it.
    pub async fn delete_bucket(&self, name: &str) -> Result<(), aws_sdk_s3::Error> {
        let objects = self.s3.list_objects_v2().bucket(name).send().await?;
        for object in objects.contents() {
            if let Some(key) = object.key() {
                self.s3
                    .delete_object()
                    .bucket(name)
                    .key(key)
                    .send()
                    .await?;
            }
        }
        self.s3.delete_bucket().bucket(name).send().await?;
        Ok(())
    }
}
