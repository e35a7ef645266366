//! Playbook-driven permission auditing.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::aws::client::{s3_client, SessionConfig};
use crate::aws::region::{BucketProbe, RegionProbe};
use crate::error::{LayupError, Result};
use crate::playbook::{self, Playbook, ProbeContext};

/// Region used for `ListBuckets`; the API is global, so any one region works.
const LIST_BUCKETS_REGION: &str = "us-east-2";

/// bucket-name → action-name → "the principal can exercise it".
pub type AuditMatrix = BTreeMap<String, BTreeMap<&'static str, bool>>;

/// One auditing session: a filtered playbook applied bucket by bucket, with
/// results accumulating in a matrix.
pub struct Auditor {
    profile: Option<String>,
    playbook: Playbook,
    probe: Box<dyn BucketProbe>,
    results: AuditMatrix,
}

impl Auditor {
    /// Build an auditor for the requested actions (all of them when the list
    /// is empty; unknown names are silently ignored) under a credential
    /// profile. Write probes stay out of the playbook unless opted into.
    pub fn new(actions: &[String], profile: Option<String>, include_writes: bool) -> Self {
        let playbook = playbook::filtered(actions, include_writes);
        let probe = Box::new(RegionProbe::new(profile.clone()));
        Self::with_parts(playbook, probe, profile)
    }

    /// Assemble an auditor from explicit parts.
    pub fn with_parts(
        playbook: Playbook,
        probe: Box<dyn BucketProbe>,
        profile: Option<String>,
    ) -> Self {
        Self {
            profile,
            playbook,
            probe,
            results: AuditMatrix::new(),
        }
    }

    /// The actions this session will probe.
    pub fn playbook(&self) -> &Playbook {
        &self.playbook
    }

    /// Results collected so far. Append-only, so a snapshot taken on
    /// interrupt is self-consistent.
    pub fn results(&self) -> &AuditMatrix {
        &self.results
    }

    /// Audit a single bucket: locate its region, scope a session to it, and
    /// run every playbook probe sequentially.
    ///
    /// Fails with [`LayupError::BucketNotFound`] when no region hosts the
    /// bucket; the caller is expected to log and move on to the next one.
    pub async fn run(&mut self, bucket: &str) -> Result<()> {
        let (exists, region) = self.probe.check(bucket, None).await;
        let region = match region {
            Some(region) if exists => region,
            _ => return Err(LayupError::BucketNotFound(bucket.to_string())),
        };
        info!(bucket, region, "bucket located");

        let ctx = ProbeContext::new(self.profile.as_deref(), &region).await?;
        self.run_with_context(&ctx, bucket).await;
        Ok(())
    }

    /// Run the playbook against a bucket using a pre-built context. All
    /// probes share the session; SDK errors inside a probe collapse to
    /// "denied" and never surface.
    pub async fn run_with_context(&mut self, ctx: &ProbeContext, bucket: &str) {
        let mut audit = BTreeMap::new();
        for (name, action) in &self.playbook {
            debug!(bucket, action = *name, "probing");
            let allowed = action.probe(ctx, bucket).await;
            audit.insert(*name, allowed);
        }
        self.results.insert(bucket.to_string(), audit);
    }
}

/// Enumerate the bucket names visible to the principal via `ListBuckets`.
pub async fn list_buckets(profile: Option<&str>) -> Result<Vec<String>> {
    let mut config = SessionConfig::new().with_region(LIST_BUCKETS_REGION);
    if let Some(profile) = profile {
        config = config.with_profile(profile);
    }
    let client = s3_client(&config).await;

    let output = client
        .list_buckets()
        .send()
        .await
        .map_err(|e| LayupError::Other(anyhow::anyhow!("ListBuckets failed: {e}")))?;

    Ok(output
        .buckets()
        .iter()
        .filter_map(|bucket| bucket.name())
        .map(str::to_string)
        .collect())
}
