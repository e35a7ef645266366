//! Integration tests for layup.
//!
//! These tests require LocalStack to be running. They are marked as
//! `#[ignore]` by default to avoid running them in CI without proper setup.
//!
//! ## Running Integration Tests
//!
//! 1. Start LocalStack:
//!    ```bash
//!    docker run --rm -p 4566:4566 localstack/localstack
//!    ```
//!
//! 2. Run the integration tests:
//!    ```bash
//!    LOCALSTACK_ENDPOINT=http://localhost:4566 \
//!        cargo test -p layup-integration-tests -- --ignored
//!    ```

mod audit_test;
