//! CNAME chain resolution.

use async_trait::async_trait;
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::proto::rr::RecordType;
use hickory_resolver::TokioResolver;
use tracing::debug;

use crate::error::{LayupError, Result};

/// Resolves a host's CNAME chain.
#[async_trait]
pub trait CnameLookup: Send + Sync {
    /// Follow the CNAME chain for `host` and return the terminal target, or
    /// `None` when the host has no CNAME.
    async fn cname(&self, host: &str) -> Option<String>;
}

/// [`CnameLookup`] backed by a hickory [`TokioResolver`] using the system
/// resolver configuration.
pub struct DnsCname {
    resolver: TokioResolver,
}

impl DnsCname {
    pub fn new() -> Result<Self> {
        let resolver = TokioResolver::builder(TokioConnectionProvider::default())
            .map_err(|e| LayupError::Other(anyhow::anyhow!("failed to build DNS resolver: {e}")))?
            .build();
        Ok(Self { resolver })
    }
}

#[async_trait]
impl CnameLookup for DnsCname {
    async fn cname(&self, host: &str) -> Option<String> {
        let lookup = match self.resolver.lookup(host, RecordType::CNAME).await {
            Ok(lookup) => lookup,
            Err(e) => {
                debug!(host, error = %e, "CNAME lookup failed");
                return None;
            }
        };
        let target = lookup
            .iter()
            .find_map(|record| record.as_cname())
            .map(|cname| cname.0.to_string())?;
        normalize_cname(host, &target)
    }
}

/// Strip trailing dots and discard self-referential or empty results, which
/// mean the host has no CNAME worth following.
fn normalize_cname(host: &str, target: &str) -> Option<String> {
    let host = host.trim_end_matches('.');
    let target = target.trim_end_matches('.');
    if target.is_empty() || target == host {
        return None;
    }
    Some(target.to_string())
}
