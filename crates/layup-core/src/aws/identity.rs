//! Caller identity checks.

use std::path::PathBuf;

use tracing::debug;

use crate::aws::client::{sts_client, SessionConfig};
use crate::error::{LayupError, Result};

/// The identity the auditor operates as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// No credentials file present; requests go out unsigned.
    Unauthenticated,
    /// Authenticated principal with its resolved ARN.
    Principal(String),
}

/// Standard location of the shared credentials file.
fn credentials_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".aws").join("credentials"))
}

/// True iff a credentials file exists at the standard location. The contents
/// are not parsed; the SDK does its own validation when sessions are built.
pub fn is_authenticated() -> bool {
    credentials_path().is_some_and(|path| path.exists())
}

/// Resolve the caller's ARN via STS `GetCallerIdentity` under the named
/// profile.
pub async fn caller_arn(profile: Option<&str>) -> Result<String> {
    let mut config = SessionConfig::new();
    if let Some(profile) = profile {
        config = config.with_profile(profile);
    }

    let sts = sts_client(&config).await;
    let output = sts
        .get_caller_identity()
        .send()
        .await
        .map_err(|e| LayupError::Identity(e.to_string()))?;

    output
        .arn()
        .map(str::to_string)
        .ok_or_else(|| LayupError::Identity("caller identity carried no ARN".into()))
}

/// Determine the identity to display before an audit run: the caller ARN
/// when credentials exist and STS recognizes them, unauthenticated otherwise.
pub async fn current(profile: Option<&str>) -> Result<Identity> {
    if !is_authenticated() {
        debug!("no credentials file found, continuing unauthenticated");
        return Ok(Identity::Unauthenticated);
    }
    caller_arn(profile).await.map(Identity::Principal)
}
