//! Resolution results and per-run statistics.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// What the resolver learned about the bucket behind a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bucket {
    /// No S3 bucket was found behind the URL.
    Missing,
    /// An S3 endpoint exists but the bucket name could not be recovered.
    Unnamed,
    /// A concrete bucket name.
    Named(String),
}

impl Bucket {
    /// Returns the concrete bucket name, if one was resolved.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_named(&self) -> bool {
        matches!(self, Self::Named(_))
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "no bucket found"),
            Self::Unnamed => write!(f, "some S3 bucket"),
            Self::Named(name) => write!(f, "{name}"),
        }
    }
}

/// The region hosting a resolved bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    /// No region could be determined.
    Unknown,
    /// A concrete region name.
    Named(String),
}

impl Region {
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            Self::Unknown => None,
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "no region found"),
            Self::Named(name) => write!(f, "{name}"),
        }
    }
}

/// Outcome of resolving a single URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverStatus {
    /// The input URL, normalized to its host-only form
    pub url: String,

    /// Resolved bucket, if any
    pub bucket: Bucket,

    /// Bucket region, if found
    pub region: Region,

    /// Set when the referenced bucket no longer exists and can be re-registered
    pub takeover: bool,
}

impl ResolverStatus {
    /// A fresh status with nothing resolved yet.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            bucket: Bucket::Missing,
            region: Region::Unknown,
            takeover: false,
        }
    }

    /// Table row for display: url, bucket, region, takeover.
    pub fn row(&self) -> [String; 4] {
        [
            self.url.clone(),
            self.bucket.to_string(),
            self.region.to_string(),
            self.takeover.to_string(),
        ]
    }
}

/// Statistics collected across one resolver run.
///
/// A URL is counted as either processed or failed, never both, so
/// `urls_processed == statuses.len()` and `urls_processed + urls_failed`
/// equals the number of URLs submitted. `endpoints` and
/// `takeovers_possible` are derived when a status is recorded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolveStats {
    /// When resolution started
    pub started_at: Option<DateTime<Utc>>,

    /// When resolution completed
    pub completed_at: Option<DateTime<Utc>>,

    /// One entry per successfully classified URL, in submission order
    pub statuses: Vec<ResolverStatus>,

    /// URLs classified end-to-end
    pub urls_processed: usize,

    /// URLs rejected before classification (timeout, already-S3, GCS)
    pub urls_failed: usize,

    /// URLs confirmed to be S3 endpoints, named or not
    pub endpoints: usize,

    /// Endpoints referencing a deleted bucket that can be re-registered
    pub takeovers_possible: usize,
}

impl ResolveStats {
    /// Create a new stats tracker with the current time as start time.
    pub fn new() -> Self {
        Self {
            started_at: Some(Utc::now()),
            ..Default::default()
        }
    }

    /// Mark resolution as complete with the current time.
    pub fn complete(&mut self) {
        self.completed_at = Some(Utc::now());
    }

    /// Record a classified URL, deriving the endpoint and takeover counters.
    ///
    /// A takeover claim without a concrete bucket name is contradictory, so
    /// the flag is dropped here rather than propagated.
    pub fn record(&mut self, mut status: ResolverStatus) {
        if status.takeover && !status.bucket.is_named() {
            status.takeover = false;
        }
        self.urls_processed += 1;
        if !status.bucket.is_missing() {
            self.endpoints += 1;
        }
        if status.takeover {
            self.takeovers_possible += 1;
        }
        self.statuses.push(status);
    }

    /// Record a URL that could not be classified.
    pub fn record_failure(&mut self) {
        self.urls_failed += 1;
    }

    /// Bucket names suitable for further auditing: concrete names whose
    /// buckets still exist (takeover candidates are deleted by definition).
    pub fn auditable_names(&self) -> Vec<&str> {
        self.statuses
            .iter()
            .filter(|s| !s.takeover)
            .filter_map(|s| s.bucket.name())
            .collect()
    }

    /// Number of statuses carrying a concrete bucket name.
    pub fn named_count(&self) -> usize {
        self.statuses.iter().filter(|s| s.bucket.is_named()).count()
    }

    /// Get the duration of the run.
    pub fn duration(&self) -> Option<Duration> {
        match (self.started_at, self.completed_at) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(url: &str, bucket: &str, takeover: bool) -> ResolverStatus {
        ResolverStatus {
            url: url.into(),
            bucket: Bucket::Named(bucket.into()),
            region: Region::Named("us-east-1".into()),
            takeover,
        }
    }

    #[test]
    fn test_record_derives_counters() {
        let mut stats = ResolveStats::new();
        stats.record(named("a.example.com", "a-assets", false));
        stats.record(named("b.example.com", "b-assets", true));
        stats.record(ResolverStatus::new("c.example.com"));

        assert_eq!(stats.urls_processed, 3);
        assert_eq!(stats.statuses.len(), 3);
        assert_eq!(stats.endpoints, 2);
        assert_eq!(stats.takeovers_possible, 1);
    }

    #[test]
    fn test_record_failure_is_disjoint_from_processed() {
        let mut stats = ResolveStats::new();
        stats.record_failure();
        stats.record(named("a.example.com", "a-assets", false));

        assert_eq!(stats.urls_processed, 1);
        assert_eq!(stats.urls_failed, 1);
        assert_eq!(stats.statuses.len(), stats.urls_processed);
    }

    #[test]
    fn test_takeover_requires_named_bucket() {
        let mut stats = ResolveStats::new();
        let mut status = ResolverStatus::new("x.example.com");
        status.bucket = Bucket::Unnamed;
        status.takeover = true;
        stats.record(status);

        assert_eq!(stats.takeovers_possible, 0);
        assert!(!stats.statuses[0].takeover);
    }

    #[test]
    fn test_counter_invariants_hold() {
        let mut stats = ResolveStats::new();
        stats.record(named("a.example.com", "a", true));
        stats.record(named("b.example.com", "b", false));
        let mut unnamed = ResolverStatus::new("c.example.com");
        unnamed.bucket = Bucket::Unnamed;
        stats.record(unnamed);
        stats.record(ResolverStatus::new("d.example.com"));

        let endpoints = stats
            .statuses
            .iter()
            .filter(|s| !s.bucket.is_missing())
            .count();
        let takeovers = stats.statuses.iter().filter(|s| s.takeover).count();
        assert_eq!(stats.endpoints, endpoints);
        assert_eq!(stats.takeovers_possible, takeovers);
        for status in &stats.statuses {
            if status.takeover {
                assert!(status.bucket.is_named());
            }
        }
    }

    #[test]
    fn test_auditable_names_skip_takeovers_and_sentinels() {
        let mut stats = ResolveStats::new();
        stats.record(named("a.example.com", "live-bucket", false));
        stats.record(named("b.example.com", "deleted-bucket", true));
        let mut unnamed = ResolverStatus::new("c.example.com");
        unnamed.bucket = Bucket::Unnamed;
        stats.record(unnamed);

        assert_eq!(stats.auditable_names(), vec!["live-bucket"]);
        assert_eq!(stats.named_count(), 2);
    }

    #[test]
    fn test_display_sentinels() {
        assert_eq!(Bucket::Missing.to_string(), "no bucket found");
        assert_eq!(Bucket::Unnamed.to_string(), "some S3 bucket");
        assert_eq!(Bucket::Named("pics".into()).to_string(), "pics");
        assert_eq!(Region::Unknown.to_string(), "no region found");
    }
}
