//! The playbook: a static catalog of capability probes.
//!
//! Each entry maps an S3 action name to a probe that answers one question:
//! can the current principal exercise this action against a given bucket?
//! Probes interpret any SDK error as "denied", which conflates denial with
//! "no such resource" (a bucket with no policy configured reports the same
//! as a denied `GetBucketPolicy`) — acceptable because such actions never
//! grant capability.

pub mod probes;

use std::collections::{BTreeMap, HashSet};

use futures::future::BoxFuture;
use tracing::debug;

use crate::aws::client::{s3_client, SessionConfig};
use crate::error::{LayupError, Result};

/// Everything a probe needs to interrogate one bucket: an S3 client scoped
/// to the bucket's region and a plain HTTP client for delivering presigned
/// requests out-of-band.
pub struct ProbeContext {
    pub s3: aws_sdk_s3::Client,
    pub http: reqwest::Client,
}

impl ProbeContext {
    /// Build a context scoped to a profile and region.
    pub async fn new(profile: Option<&str>, region: &str) -> Result<Self> {
        let mut config = SessionConfig::new().with_region(region);
        if let Some(profile) = profile {
            config = config.with_profile(profile);
        }
        let s3 = s3_client(&config).await;
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| LayupError::Other(e.into()))?;
        Ok(Self { s3, http })
    }

    /// Assemble a context from pre-built clients.
    pub fn from_parts(s3: aws_sdk_s3::Client, http: reqwest::Client) -> Self {
        Self { s3, http }
    }
}

/// Whether an action only inspects the bucket or would write to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Issues the call as-is; success means authorized.
    Read,
    /// Would mutate the target; probed with a checksum-poisoned request the
    /// server rejects before committing. Gated behind an explicit opt-in.
    Write,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
        }
    }
}

/// Probe signature: interrogate one bucket through the given context.
pub type ProbeFn = for<'a> fn(&'a ProbeContext, &'a str) -> BoxFuture<'a, bool>;

/// A single capability check in the playbook.
#[derive(Debug, Clone, Copy)]
pub struct Action {
    /// What holding this capability means
    pub description: &'static str,

    /// Equivalent AWS CLI invocation
    pub cli: &'static str,

    pub kind: ActionKind,

    probe: ProbeFn,
}

impl Action {
    pub fn new(
        description: &'static str,
        cli: &'static str,
        kind: ActionKind,
        probe: ProbeFn,
    ) -> Self {
        Self {
            description,
            cli,
            kind,
            probe,
        }
    }

    /// Run the probe: true iff the principal can exercise this action.
    pub async fn probe(&self, ctx: &ProbeContext, bucket: &str) -> bool {
        (self.probe)(ctx, bucket).await
    }
}

/// Action-name → [`Action`] catalog; ordered so listings are stable.
pub type Playbook = BTreeMap<&'static str, Action>;

/// The full registry of supported actions.
pub fn registry() -> Playbook {
    let mut book = Playbook::new();
    book.insert(
        "ListObjects",
        Action {
            description: "Enumerate objects in the bucket without being its owner",
            cli: "aws s3api list-objects-v2 --bucket {bucket} --max-keys 2",
            kind: ActionKind::Read,
            probe: probes::list_objects,
        },
    );
    book.insert(
        "PutObject",
        Action {
            description: "Upload arbitrary objects into the bucket",
            cli: "aws s3api put-object --bucket {bucket} --key {key} --body {file}",
            kind: ActionKind::Write,
            probe: probes::put_object,
        },
    );
    book.insert(
        "GetBucketAcl",
        Action {
            description: "Read the bucket's access control list",
            cli: "aws s3api get-bucket-acl --bucket {bucket}",
            kind: ActionKind::Read,
            probe: probes::get_bucket_acl,
        },
    );
    book.insert(
        "PutBucketAcl",
        Action {
            description: "Rewrite the bucket's ACL, e.g. granting read to AllUsers",
            cli: "aws s3api put-bucket-acl --bucket {bucket} \
                  --grant-read uri=http://acs.amazonaws.com/groups/global/AllUsers",
            kind: ActionKind::Write,
            probe: probes::put_bucket_acl,
        },
    );
    book.insert(
        "GetBucketPolicy",
        Action {
            description: "Read the bucket policy document",
            cli: "aws s3api get-bucket-policy --bucket {bucket}",
            kind: ActionKind::Read,
            probe: probes::get_bucket_policy,
        },
    );
    book.insert(
        "PutBucketPolicy",
        Action {
            description: "Replace the bucket policy document",
            cli: "aws s3api put-bucket-policy --bucket {bucket} --policy file://policy.json",
            kind: ActionKind::Write,
            probe: probes::put_bucket_policy,
        },
    );
    book.insert(
        "GetBucketCors",
        Action {
            description: "Read the bucket's CORS configuration",
            cli: "aws s3api get-bucket-cors --bucket {bucket}",
            kind: ActionKind::Read,
            probe: probes::get_bucket_cors,
        },
    );
    book.insert(
        "PutBucketCors",
        Action {
            description: "Replace the bucket's CORS configuration",
            cli: "aws s3api put-bucket-cors --bucket {bucket} --cors-configuration file://cors.json",
            kind: ActionKind::Write,
            probe: probes::put_bucket_cors,
        },
    );
    book.insert(
        "GetBucketLogging",
        Action {
            description: "Read the bucket's access logging configuration",
            cli: "aws s3api get-bucket-logging --bucket {bucket}",
            kind: ActionKind::Read,
            probe: probes::get_bucket_logging,
        },
    );
    book.insert(
        "GetBucketWebsite",
        Action {
            description: "Read the bucket's static website configuration",
            cli: "aws s3api get-bucket-website --bucket {bucket}",
            kind: ActionKind::Read,
            probe: probes::get_bucket_website,
        },
    );
    book.insert(
        "GetBucketVersioning",
        Action {
            description: "Read the bucket's versioning state",
            cli: "aws s3api get-bucket-versioning --bucket {bucket}",
            kind: ActionKind::Read,
            probe: probes::get_bucket_versioning,
        },
    );
    book.insert(
        "GetBucketEncryption",
        Action {
            description: "Read the bucket's server-side encryption configuration",
            cli: "aws s3api get-bucket-encryption --bucket {bucket}",
            kind: ActionKind::Read,
            probe: probes::get_bucket_encryption,
        },
    );
    book
}

/// Build the playbook for a run: keep only the requested actions (all when
/// the list is empty; unknown names are silently ignored) and drop write
/// probes unless they were explicitly enabled.
pub fn filtered(actions: &[String], include_writes: bool) -> Playbook {
    let mut book = registry();

    if !actions.is_empty() {
        let wanted: HashSet<&str> = actions.iter().map(String::as_str).collect();
        book.retain(|name, _| wanted.contains(name));
    }

    if !include_writes {
        book.retain(|name, action| {
            let keep = action.kind == ActionKind::Read;
            if !keep {
                debug!(action = name, "skipping write probe without write opt-in");
            }
            keep
        });
    }

    book
}
