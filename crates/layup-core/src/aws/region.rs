//! Bucket existence and region discovery via `HeadBucket`.

use async_trait::async_trait;
use aws_sdk_s3::error::ProvideErrorMetadata;
use aws_smithy_runtime_api::client::result::SdkError;
use tracing::{debug, warn};

use crate::aws::client::{s3_client, SessionConfig};

/// Region used to seed discovery; S3 redirects from here carry the real
/// region in the `x-amz-bucket-region` header.
pub const FALLBACK_REGION: &str = "us-east-1";

/// Regions that answer `Forbidden` for nonexistent buckets as well, making
/// the 403-means-exists inference unsound there.
const OPAQUE_FORBIDDEN_REGIONS: &[&str] = &["cn-north-1", "cn-northwest-1"];

/// Checks whether a bucket exists and which region hosts it.
#[async_trait]
pub trait BucketProbe: Send + Sync {
    /// With a region hint, issue `HeadBucket` there and report the outcome
    /// together with the hint. Without one, discover the region first;
    /// discovery failure reports `(false, None)`.
    async fn check(&self, bucket: &str, region_hint: Option<&str>) -> (bool, Option<String>);
}

/// [`BucketProbe`] backed by the S3 SDK.
pub struct RegionProbe {
    profile: Option<String>,
}

impl RegionProbe {
    pub fn new(profile: Option<String>) -> Self {
        Self { profile }
    }

    fn session(&self, region: &str) -> SessionConfig {
        let mut config = SessionConfig::new().with_region(region);
        if let Some(profile) = &self.profile {
            config = config.with_profile(profile);
        }
        config
    }

    /// Discover the bucket's region by heading it in `us-east-1` and reading
    /// the region S3 reports, either on the response itself or on the
    /// redirect it answers with.
    async fn discover_region(&self, bucket: &str) -> Option<String> {
        let client = s3_client(&self.session(FALLBACK_REGION)).await;
        match client.head_bucket().bucket(bucket).send().await {
            Ok(output) => Some(
                output
                    .bucket_region()
                    .unwrap_or(FALLBACK_REGION)
                    .to_string(),
            ),
            Err(SdkError::ServiceError(ctx)) => {
                let region = ctx
                    .raw()
                    .headers()
                    .get("x-amz-bucket-region")
                    .map(str::to_string);
                if region.is_none() {
                    debug!(bucket, "no region reported for bucket");
                }
                region
            }
            Err(e) => {
                debug!(bucket, error = %e, "region discovery failed");
                None
            }
        }
    }

    /// Issue `HeadBucket` against a specific region and interpret the result.
    async fn head_bucket(&self, bucket: &str, region: &str) -> bool {
        let client = s3_client(&self.session(region)).await;
        match client.head_bucket().bucket(bucket).send().await {
            Ok(_) => true,
            Err(err) => {
                let status = match &err {
                    SdkError::ServiceError(ctx) => Some(ctx.raw().status().as_u16()),
                    _ => None,
                };
                interpret_head_failure(err.code(), status, region)
            }
        }
    }
}

#[async_trait]
impl BucketProbe for RegionProbe {
    async fn check(&self, bucket: &str, region_hint: Option<&str>) -> (bool, Option<String>) {
        match region_hint.filter(|hint| !hint.is_empty()) {
            None => match self.discover_region(bucket).await {
                Some(region) => (true, Some(region)),
                None => (false, None),
            },
            Some(region) => (
                self.head_bucket(bucket, region).await,
                Some(region.to_string()),
            ),
        }
    }
}

/// Decide whether a failed `HeadBucket` still means the bucket exists.
///
/// `Forbidden` means the bucket exists but the principal lacks HEAD
/// permission, except in the China regions where nonexistent buckets answer
/// the same way. `NoSuchKey` means the bucket exists behind a deleted
/// object. `MissingEndpoint`/`MissingRegion` show up under rate limiting
/// and are treated as absent so the caller may retry.
fn interpret_head_failure(code: Option<&str>, status: Option<u16>, region: &str) -> bool {
    if code == Some("Forbidden") || status == Some(403) {
        return !OPAQUE_FORBIDDEN_REGIONS.contains(&region);
    }
    match code {
        Some("NoSuchKey") => true,
        Some("MissingEndpoint") | Some("MissingRegion") => {
            warn!(region, "may be encountering a rate limit or timeout");
            false
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forbidden_means_exists() {
        assert!(interpret_head_failure(Some("Forbidden"), Some(403), "us-west-2"));
        assert!(interpret_head_failure(None, Some(403), "eu-central-1"));
    }

    #[test]
    fn test_forbidden_in_china_means_absent() {
        assert!(!interpret_head_failure(Some("Forbidden"), Some(403), "cn-north-1"));
        assert!(!interpret_head_failure(None, Some(403), "cn-northwest-1"));
    }

    #[test]
    fn test_no_such_key_means_exists() {
        assert!(interpret_head_failure(Some("NoSuchKey"), Some(404), "us-east-1"));
    }

    #[test]
    fn test_rate_limit_symptoms_mean_absent() {
        assert!(!interpret_head_failure(Some("MissingEndpoint"), None, "us-east-1"));
        assert!(!interpret_head_failure(Some("MissingRegion"), None, "us-east-1"));
    }

    #[test]
    fn test_everything_else_means_absent() {
        assert!(!interpret_head_failure(Some("NoSuchBucket"), Some(404), "us-east-1"));
        assert!(!interpret_head_failure(Some("InvalidBucketName"), Some(400), "us-east-1"));
        assert!(!interpret_head_failure(None, None, "us-east-1"));
    }
}
