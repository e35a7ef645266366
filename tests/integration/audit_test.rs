//! Auditor integration tests against LocalStack.

use layup_core::playbook::{registry, ProbeContext};
use layup_integration_tests::localstack::LocalStackTestContext;

/// Read probes against a bucket the test principal owns should all succeed.
#[tokio::test]
#[ignore]
async fn read_probes_succeed_on_owned_bucket() {
    let ctx = LocalStackTestContext::new().await;
    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping");
        return;
    }

    let bucket = "layup-audit-test";
    ctx.create_bucket(bucket).await.unwrap();
    ctx.put_object(bucket, "fixture.txt").await.unwrap();

    let probe_ctx = ProbeContext::from_parts(ctx.s3.clone(), reqwest::Client::new());
    let book = registry();

    let list = book["ListObjects"].probe(&probe_ctx, bucket).await;
    assert!(list, "owner should be able to list objects");

    let acl = book["GetBucketAcl"].probe(&probe_ctx, bucket).await;
    assert!(acl, "owner should be able to read the ACL");

    // No policy is configured, so the probe reports the action as
    // unavailable even though the principal could read one.
    let policy = book["GetBucketPolicy"].probe(&probe_ctx, bucket).await;
    assert!(!policy, "absent policy reads as denied");

    ctx.delete_bucket(bucket).await.unwrap();
}

/// Probes against a bucket that does not exist should all come back denied.
#[tokio::test]
#[ignore]
async fn probes_fail_on_missing_bucket() {
    let ctx = LocalStackTestContext::new().await;
    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping");
        return;
    }

    let probe_ctx = ProbeContext::from_parts(ctx.s3.clone(), reqwest::Client::new());
    let book = registry();

    for name in ["ListObjects", "GetBucketAcl", "GetBucketVersioning"] {
        let allowed = book[name].probe(&probe_ctx, "layup-no-such-bucket").await;
        assert!(!allowed, "{name} should be denied on a missing bucket");
    }
}
