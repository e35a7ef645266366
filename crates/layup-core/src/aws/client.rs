//! AWS session and client construction.

use aws_config::{BehaviorVersion, Region};
use serde::{Deserialize, Serialize};

/// Configuration for an AWS session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// AWS profile name; `None` uses the default credential chain
    pub profile: Option<String>,

    /// AWS region
    pub region: Option<String>,

    /// Custom endpoint URL (for LocalStack)
    pub endpoint: Option<String>,
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the AWS profile.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Set the AWS region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set a custom endpoint (for LocalStack).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    async fn load(&self) -> aws_config::SdkConfig {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(region) = &self.region {
            loader = loader.region(Region::new(region.clone()));
        }

        if let Some(endpoint) = &self.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        if let Some(profile) = &self.profile {
            loader = loader.profile_name(profile);
        }

        loader.load().await
    }
}

/// Create an S3 client from configuration.
pub async fn s3_client(config: &SessionConfig) -> aws_sdk_s3::Client {
    let aws_config = config.load().await;
    let builder = aws_sdk_s3::config::Builder::from(&aws_config);

    // Path-style access for LocalStack compatibility
    let s3_config = if config.endpoint.is_some() {
        builder.force_path_style(true).build()
    } else {
        builder.build()
    };

    aws_sdk_s3::Client::from_conf(s3_config)
}

/// Create an STS client from configuration.
pub async fn sts_client(config: &SessionConfig) -> aws_sdk_sts::Client {
    let aws_config = config.load().await;
    aws_sdk_sts::Client::new(&aws_config)
}
