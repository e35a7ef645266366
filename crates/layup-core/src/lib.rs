//! layup-core - bucket resolution, takeover detection and permission
//! auditing for S3-family object storage.
//!
//! Two subsystems do the work:
//!
//! - The [`resolver`] takes arbitrary URLs and infers whether an S3 bucket
//!   sits behind them, recovering the bucket name and region where possible
//!   and flagging dangling references open to takeover.
//! - The [`auditor`] takes bucket names and runs a [`playbook`] of
//!   capability probes against each, reporting which IAM actions the
//!   current principal can exercise without mutating the target.
//!
//! # Example
//!
//! ```ignore
//! use layup_core::resolver::Resolver;
//!
//! let mut resolver = Resolver::with_defaults()?;
//! if let Err(e) = resolver.resolve("files.example.com").await {
//!     eprintln!("skipping: {e}");
//! }
//! let stats = resolver.finish();
//! eprintln!("{} endpoints found", stats.endpoints);
//! ```

pub mod auditor;
pub mod aws;
pub mod error;
pub mod playbook;
pub mod resolver;

pub use auditor::{list_buckets, AuditMatrix, Auditor};
pub use aws::{is_authenticated, BucketProbe, Identity, RegionProbe};
pub use error::{LayupError, Result};
pub use playbook::{Action, ActionKind, Playbook, ProbeContext};
pub use resolver::status::{Bucket, Region, ResolveStats, ResolverStatus};
pub use resolver::Resolver;
