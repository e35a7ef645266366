//! Error types for layup.
//!
//! The taxonomy mirrors how failures are handled: item-level errors
//! ([`LayupError::Transport`], [`LayupError::UnsupportedProvider`],
//! [`LayupError::BucketNotFound`]) are logged and skipped by callers so the
//! remaining items proceed, while input errors abort the whole command.
//! SDK errors raised inside playbook probes never surface as `LayupError`;
//! they are collapsed into a "capability absent" boolean at the probe site.

use thiserror::Error;

/// Top-level error type for layup.
#[derive(Error, Debug)]
pub enum LayupError {
    /// Invalid or missing user input (no targets, unknown playbook action)
    #[error("input error: {0}")]
    Input(String),

    /// The target already points at amazonaws.com, nothing to resolve
    #[error("{0} is already an S3 URL, no need to resolve further")]
    AlreadyS3(String),

    /// HTTP transport failure (timeout, DNS failure, body read)
    #[error("transport failure for {url}: {reason}")]
    Transport { url: String, reason: String },

    /// The endpoint is served by a non-S3 storage provider
    #[error("{url} is backed by {provider}, which is not supported")]
    UnsupportedProvider { url: String, provider: &'static str },

    /// Region discovery found no region hosting the bucket
    #[error("bucket {0} does not exist in any region")]
    BucketNotFound(String),

    /// Caller identity could not be resolved
    #[error("identity error: {0}")]
    Identity(String),

    /// Filesystem errors (list files, output writing)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors (wrapped anyhow)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LayupError {
    /// True for errors that should skip the current item rather than abort
    /// the whole run.
    pub fn is_item_level(&self) -> bool {
        matches!(
            self,
            Self::AlreadyS3(_)
                | Self::Transport { .. }
                | Self::UnsupportedProvider { .. }
                | Self::BucketNotFound(_)
        )
    }
}

/// Result type alias using LayupError.
pub type Result<T> = std::result::Result<T, LayupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_level_classification() {
        assert!(LayupError::AlreadyS3("x.amazonaws.com".into()).is_item_level());
        assert!(LayupError::BucketNotFound("missing".into()).is_item_level());
        assert!(
            LayupError::Transport {
                url: "http://example.com".into(),
                reason: "timed out".into(),
            }
            .is_item_level()
        );
        assert!(!LayupError::Input("no targets given".into()).is_item_level());
    }

    #[test]
    fn test_error_display() {
        let err = LayupError::UnsupportedProvider {
            url: "gcs.example.com".into(),
            provider: "Google Cloud Storage",
        };
        assert!(err.to_string().contains("Google Cloud Storage"));

        let err = LayupError::BucketNotFound("ghost-bucket".into());
        assert!(err.to_string().contains("ghost-bucket"));
    }
}
