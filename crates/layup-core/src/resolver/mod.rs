//! Multi-stage URL → (bucket, region, takeover) inference.
//!
//! Given an arbitrary URL, the resolver decides whether it is backed by an
//! S3 bucket, recovers the bucket name and region when it can, and flags
//! endpoints whose bucket has been deleted and is open to re-registration.
//! Four stages run in order, each refining what the previous ones learned:
//!
//! 1. HTTP response headers (`Server`, `x-amz-bucket-region`)
//! 2. The DNS CNAME chain, matched against the S3 hostname shapes
//! 3. The URL's own host tried as a bucket name via `HeadBucket`
//! 4. The response body parsed as an S3 XML error document or listing
//!
//! A CNAME hit is conclusive and skips stages 3 and 4. Later stages never
//! replace a concrete bucket name with a sentinel.

pub mod dns;
pub mod http;
pub mod status;
pub mod url;
pub mod xml;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use crate::aws::region::{BucketProbe, RegionProbe, FALLBACK_REGION};
use crate::error::{LayupError, Result};
use dns::{CnameLookup, DnsCname};
use http::{HttpFetcher, Page, PageFetcher};
use status::{Bucket, Region, ResolveStats, ResolverStatus};
use url::UrlPair;
use xml::BodySignal;

/// Path-style S3 hostname: `s3-<region>.amazonaws.com/<bucket>`.
static PATH_STYLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"s3-(?P<region>[^.]+)\.amazonaws\.com/(?P<bucket>[^/]+)").expect("valid regex")
});

/// Virtual-host-style S3 hostname: `<bucket>.s3.<region>.amazonaws.com`.
static VHOST_STYLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<bucket>[^/]+)\.s3\.(?P<region>[^.]+)\.amazonaws\.com").expect("valid regex")
});

/// The resolver and its per-run aggregate.
pub struct Resolver {
    fetcher: Box<dyn PageFetcher>,
    dns: Box<dyn CnameLookup>,
    probe: Box<dyn BucketProbe>,
    stats: ResolveStats,
}

impl Resolver {
    /// Assemble a resolver from explicit collaborators.
    pub fn new(
        fetcher: Box<dyn PageFetcher>,
        dns: Box<dyn CnameLookup>,
        probe: Box<dyn BucketProbe>,
    ) -> Self {
        Self {
            fetcher,
            dns,
            probe,
            stats: ResolveStats::new(),
        }
    }

    /// Resolver wired to the real network: reqwest with the hard timeout,
    /// the system DNS configuration, and an SDK-backed bucket probe under
    /// the default credential chain.
    pub fn with_defaults() -> Result<Self> {
        Ok(Self::new(
            Box::new(HttpFetcher::new()?),
            Box::new(DnsCname::new()?),
            Box::new(RegionProbe::new(None)),
        ))
    }

    /// The aggregate collected so far. Append-only, so a snapshot taken on
    /// interrupt is self-consistent.
    pub fn stats(&self) -> &ResolveStats {
        &self.stats
    }

    /// Finish the run and hand back the aggregate.
    pub fn finish(mut self) -> ResolveStats {
        self.stats.complete();
        self.stats
    }

    /// Classify one URL, appending a status and updating counters.
    ///
    /// Errors are returned only for inputs that cannot be classified at all
    /// (already an S3 URL, transport failure, non-S3 storage); "no bucket
    /// found" is a successful classification. Each URL counts as either
    /// processed or failed, never both.
    pub async fn resolve(&mut self, url: &str) -> Result<()> {
        let pair = UrlPair::new(url);

        if pair.host().contains("amazonaws.com") {
            self.stats.record_failure();
            return Err(LayupError::AlreadyS3(pair.host().to_string()));
        }

        debug!(url = pair.full(), "fetching target");
        let page = match self.fetcher.fetch(pair.full()).await {
            Ok(page) => page,
            Err(e) => {
                self.stats.record_failure();
                return Err(e);
            }
        };

        if page.gcs_upload_id.is_some() {
            self.stats.record_failure();
            return Err(LayupError::UnsupportedProvider {
                url: pair.host().to_string(),
                provider: "Google Cloud Storage",
            });
        }

        let mut status = ResolverStatus::new(pair.host());

        // Stage 1: response headers. The Server header may be rewritten by
        // a CDN or proxy, so it only ever proves "some bucket".
        if page.server.as_deref() == Some("AmazonS3") {
            debug!(host = pair.host(), "S3 endpoint detected from Server header");
            status.bucket = Bucket::Unnamed;
        }
        if let Some(region) = page.bucket_region.as_deref().filter(|r| !r.is_empty()) {
            debug!(host = pair.host(), region, "region detected from response header");
            status.region = Region::Named(region.to_string());
        }

        // Stage 2: CNAME chain. Conclusive when it names the bucket.
        if self.stage_cname(&mut status, &pair, &page).await {
            self.stats.record(status);
            return Ok(());
        }

        // Stage 3: the host itself as a bucket name. A region learned in
        // stage 1 turns this into a single targeted HeadBucket.
        let (exists, region) = self.probe.check(pair.host(), status.region.name()).await;
        if exists {
            debug!(host = pair.host(), "host is itself a bucket name");
            status.bucket = Bucket::Named(pair.host().to_string());
            if let Some(region) = region {
                status.region = Region::Named(region);
            }
        }

        // Stage 4: the body as an S3 XML document.
        stage_xml(&mut status, &page);

        self.stats.record(status);
        Ok(())
    }

    /// Stage 2: follow the CNAME chain and match the S3 hostname shapes.
    /// Returns true when the chain conclusively named the bucket.
    async fn stage_cname(&self, status: &mut ResolverStatus, pair: &UrlPair, page: &Page) -> bool {
        let Some(cname) = self.dns.cname(pair.host()).await else {
            return false;
        };
        if !cname.contains(".amazonaws.com") {
            return false;
        }
        debug!(host = pair.host(), cname, "AWS target in CNAME chain");

        if let Some(caps) = PATH_STYLE.captures(&cname) {
            status.region = Region::Named(caps["region"].to_string());
            status.bucket = Bucket::Named(caps["bucket"].to_string());
        }
        // The virtual-host form wins when both shapes match.
        if let Some(caps) = VHOST_STYLE.captures(&cname) {
            status.bucket = Bucket::Named(caps["bucket"].to_string());
            status.region = Region::Named(caps["region"].to_string());
        }

        // An AWS CNAME that fits neither shape: let the later stages try.
        if !status.bucket.is_named() {
            return false;
        }

        if status.region == Region::Unknown {
            status.region = Region::Named(FALLBACK_REGION.to_string());
        }

        // The CNAME names a bucket; if the origin reports it missing, the
        // name is free to re-register.
        if page.body.contains("NoSuchBucket") {
            info!(url = pair.host(), bucket = %status.bucket, "takeover possible");
            status.takeover = true;
        }

        true
    }
}

/// Stage 4: interpret the body as an S3 XML document, if it is one.
fn stage_xml(status: &mut ResolverStatus, page: &Page) {
    let Some(signal) = xml::classify(&page.body) else {
        return;
    };
    match signal {
        BodySignal::ErrorDoc { code, bucket_name } => match code.as_str() {
            // The bucket is deleted but still referenced: takeover.
            "NoSuchBucket" => {
                if let Some(name) = bucket_name {
                    info!(url = %status.url, bucket = %name, "takeover possible");
                    status.bucket = Bucket::Named(name);
                    status.takeover = true;
                }
            }
            // Wrong region, but the error names the bucket.
            "PermanentRedirect" => {
                if let Some(name) = bucket_name {
                    status.bucket = Bucket::Named(name);
                }
            }
            // AccessDenied, NoSuchKey and friends prove an endpoint exists
            // without naming it. Never downgrade a concrete name.
            _ => {
                if !status.bucket.is_named() {
                    status.bucket = Bucket::Unnamed;
                }
            }
        },
        // A fully public listing hands us the name directly.
        BodySignal::Listing { name } => {
            status.bucket = Bucket::Named(name);
        }
    }
}
