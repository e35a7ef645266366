//! Probe implementations for the playbook.
//!
//! Read probes issue the SDK call directly; authorization is inferred from
//! whether it succeeds. Write probes must not mutate the target, so they
//! carry a `Content-MD5` computed over a body *different* from the one
//! actually sent. S3 validates the digest before committing the write and
//! answers 400 `BadDigest` — which still proves the principal holds the
//! verb, while a 403 proves denial.

use std::time::Duration;

use aws_sdk_s3::presigning::{PresignedRequest, PresigningConfig};
use aws_sdk_s3::types::{CorsConfiguration, CorsRule};
use aws_smithy_runtime_api::client::result::SdkError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use futures::future::BoxFuture;
use md5::{Digest, Md5};
use tracing::debug;

use super::ProbeContext;

/// Validity window for presigned probe requests.
const PRESIGN_VALIDITY: Duration = Duration::from_secs(15 * 60);

/// Key used for object-level write probes. Never created: the poisoned
/// checksum guarantees rejection before commit.
const PROBE_KEY: &str = "layup-access-probe";

/// Body actually sent with poisoned writes; the digest is computed over the
/// empty string instead.
const PROBE_BODY: &str = "CONTENT";

/// All-users group URI for the ACL write probe.
const ALL_USERS: &str = "uri=http://acs.amazonaws.com/groups/global/AllUsers";

/// `Content-MD5` over a body that will not be sent.
fn poisoned_digest() -> String {
    BASE64.encode(Md5::digest(b""))
}

/// A write probe's HTTP status proves capability: 200 means the write went
/// through (only possible when authorized), 400 means the server validated
/// the request far enough to reject the digest — past the authorization
/// check. Everything else, 403 included, means denied.
pub(crate) fn grants_capability(status: u16) -> bool {
    matches!(status, 200 | 400)
}

/// Collapse a poisoned SDK write result into the capability boolean.
fn write_outcome<T, E>(
    result: Result<T, SdkError<E, aws_smithy_runtime_api::http::Response>>,
) -> bool {
    match result {
        Ok(_) => true,
        Err(SdkError::ServiceError(ctx)) => grants_capability(ctx.raw().status().as_u16()),
        Err(e) => {
            debug!(error = %e, "write probe failed before reaching the service");
            false
        }
    }
}

/// Deliver a presigned request out-of-band with the poisoned digest header
/// and a mismatching body.
async fn deliver_poisoned(ctx: &ProbeContext, presigned: PresignedRequest) -> bool {
    let method = match reqwest::Method::from_bytes(presigned.method().as_bytes()) {
        Ok(method) => method,
        Err(_) => return false,
    };

    let mut request = ctx.http.request(method, presigned.uri());
    for (name, value) in presigned.headers() {
        request = request.header(name, value);
    }
    request = request.header("Content-MD5", poisoned_digest());

    match request.body(PROBE_BODY).send().await {
        Ok(resp) => grants_capability(resp.status().as_u16()),
        Err(e) => {
            debug!(error = %e, "presigned delivery failed");
            false
        }
    }
}

pub(crate) fn list_objects<'a>(ctx: &'a ProbeContext, bucket: &'a str) -> BoxFuture<'a, bool> {
    Box::pin(async move {
        ctx.s3
            .list_objects_v2()
            .bucket(bucket)
            .max_keys(2)
            .send()
            .await
            .is_ok()
    })
}

pub(crate) fn put_object<'a>(ctx: &'a ProbeContext, bucket: &'a str) -> BoxFuture<'a, bool> {
    Box::pin(async move {
        let config = match PresigningConfig::expires_in(PRESIGN_VALIDITY) {
            Ok(config) => config,
            Err(_) => return false,
        };
        let presigned = match ctx
            .s3
            .put_object()
            .bucket(bucket)
            .key(PROBE_KEY)
            .presigned(config)
            .await
        {
            Ok(presigned) => presigned,
            Err(e) => {
                debug!(error = %e, "could not presign PutObject");
                return false;
            }
        };
        deliver_poisoned(ctx, presigned).await
    })
}

pub(crate) fn get_bucket_acl<'a>(ctx: &'a ProbeContext, bucket: &'a str) -> BoxFuture<'a, bool> {
    Box::pin(async move { ctx.s3.get_bucket_acl().bucket(bucket).send().await.is_ok() })
}

pub(crate) fn put_bucket_acl<'a>(ctx: &'a ProbeContext, bucket: &'a str) -> BoxFuture<'a, bool> {
    Box::pin(async move {
        let result = ctx
            .s3
            .put_bucket_acl()
            .bucket(bucket)
            .grant_read(ALL_USERS)
            .customize()
            .mutate_request(|req| {
                req.headers_mut().insert("content-md5", poisoned_digest());
            })
            .send()
            .await;
        write_outcome(result)
    })
}

pub(crate) fn get_bucket_policy<'a>(ctx: &'a ProbeContext, bucket: &'a str) -> BoxFuture<'a, bool> {
    Box::pin(async move {
        ctx.s3
            .get_bucket_policy()
            .bucket(bucket)
            .send()
            .await
            .is_ok()
    })
}

pub(crate) fn put_bucket_policy<'a>(ctx: &'a ProbeContext, bucket: &'a str) -> BoxFuture<'a, bool> {
    Box::pin(async move {
        let policy = minimal_policy(bucket);
        let result = ctx
            .s3
            .put_bucket_policy()
            .bucket(bucket)
            .policy(policy)
            .customize()
            .mutate_request(|req| {
                req.headers_mut().insert("content-md5", poisoned_digest());
            })
            .send()
            .await;
        write_outcome(result)
    })
}

pub(crate) fn get_bucket_cors<'a>(ctx: &'a ProbeContext, bucket: &'a str) -> BoxFuture<'a, bool> {
    Box::pin(async move { ctx.s3.get_bucket_cors().bucket(bucket).send().await.is_ok() })
}

pub(crate) fn put_bucket_cors<'a>(ctx: &'a ProbeContext, bucket: &'a str) -> BoxFuture<'a, bool> {
    Box::pin(async move {
        let rule = match CorsRule::builder()
            .allowed_methods("GET")
            .allowed_origins("*")
            .build()
        {
            Ok(rule) => rule,
            Err(_) => return false,
        };
        let cors = match CorsConfiguration::builder().cors_rules(rule).build() {
            Ok(cors) => cors,
            Err(_) => return false,
        };
        let result = ctx
            .s3
            .put_bucket_cors()
            .bucket(bucket)
            .cors_configuration(cors)
            .customize()
            .mutate_request(|req| {
                req.headers_mut().insert("content-md5", poisoned_digest());
            })
            .send()
            .await;
        write_outcome(result)
    })
}

pub(crate) fn get_bucket_logging<'a>(ctx: &'a ProbeContext, bucket: &'a str) -> BoxFuture<'a, bool> {
    Box::pin(async move {
        ctx.s3
            .get_bucket_logging()
            .bucket(bucket)
            .send()
            .await
            .is_ok()
    })
}

pub(crate) fn get_bucket_website<'a>(ctx: &'a ProbeContext, bucket: &'a str) -> BoxFuture<'a, bool> {
    Box::pin(async move {
        ctx.s3
            .get_bucket_website()
            .bucket(bucket)
            .send()
            .await
            .is_ok()
    })
}

pub(crate) fn get_bucket_versioning<'a>(
    ctx: &'a ProbeContext,
    bucket: &'a str,
) -> BoxFuture<'a, bool> {
    Box::pin(async move {
        ctx.s3
            .get_bucket_versioning()
            .bucket(bucket)
            .send()
            .await
            .is_ok()
    })
}

pub(crate) fn get_bucket_encryption<'a>(
    ctx: &'a ProbeContext,
    bucket: &'a str,
) -> BoxFuture<'a, bool> {
    Box::pin(async move {
        ctx.s3
            .get_bucket_encryption()
            .bucket(bucket)
            .send()
            .await
            .is_ok()
    })
}

/// Minimal Allow-s3:GetObject policy targeting the bucket's own ARN.
fn minimal_policy(bucket: &str) -> String {
    serde_json::json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Effect": "Allow",
            "Principal": "*",
            "Action": "s3:GetObject",
            "Resource": format!("arn:aws:s3:::{bucket}/*"),
        }]
    })
    .to_string()
}
