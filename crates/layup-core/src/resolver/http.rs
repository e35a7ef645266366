//! HTTP page fetching for the resolver.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{LayupError, Result};

/// Per-request timeout for resolver GETs. Dangling endpoints routinely hang,
/// so requests are cut short rather than stalling the whole run.
const FETCH_TIMEOUT: Duration = Duration::from_secs(3);

/// The parts of an HTTP response the inference stages look at.
#[derive(Debug, Clone, Default)]
pub struct Page {
    /// `Server` response header
    pub server: Option<String>,

    /// `x-amz-bucket-region` response header
    pub bucket_region: Option<String>,

    /// `X-GUploader-UploadID` response header, present on GCS responses
    pub gcs_upload_id: Option<String>,

    /// Response body
    pub body: String,
}

/// Fetches a page for classification.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// GET the URL and extract the signature headers and body.
    async fn fetch(&self, url: &str) -> Result<Page>;
}

/// [`PageFetcher`] backed by a reqwest client with a hard 3-second timeout.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| LayupError::Other(e.into()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Page> {
        let transport = |e: reqwest::Error| LayupError::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        };

        let resp = self.client.get(url).send().await.map_err(transport)?;

        let header = |name: &str| {
            resp.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let server = header("server");
        let bucket_region = header("x-amz-bucket-region");
        let gcs_upload_id = header("x-guploader-uploadid");

        let body = resp.text().await.map_err(transport)?;

        Ok(Page {
            server,
            bucket_region,
            gcs_upload_id,
            body,
        })
    }
}
