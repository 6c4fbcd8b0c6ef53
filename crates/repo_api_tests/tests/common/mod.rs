//! Shared helpers for the repository API test binaries.

#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use api_harness::{HarnessConfig, TestContext};
use repo_api_tests::mock_github::FakeGitHub;
use wiremock::MockServer;

pub const OWNER: &str = "octocat";
pub const TOKEN: &str = "ghp_offline";
pub const FIXTURE_REPO: &str = "hello-world";

/// Initialize logging for tests.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_test_writer()
        .try_init();
}

/// Context against the API named by the suite configuration.
pub fn live_context() -> Result<TestContext> {
    init_test_logging();
    let config = HarnessConfig::load().context("Failed to load test configuration")?;
    Ok(TestContext::from_config(Arc::new(config))?)
}

/// A fake account holding the fixture repository.
pub struct Offline {
    pub fake: FakeGitHub,
    pub server: MockServer,
}

impl Offline {
    pub async fn start() -> Self {
        init_test_logging();
        let fake = FakeGitHub::new(OWNER, TOKEN).with_repository(FIXTURE_REPO, Some("fixture"));
        let server = fake.start().await;
        Self { fake, server }
    }

    pub fn context(&self) -> TestContext {
        let config = self
            .fake
            .harness_config(&self.server, FIXTURE_REPO)
            .expect("offline config");
        TestContext::from_config(Arc::new(config)).expect("offline context")
    }

    /// Asserts that only the fixture repository is left.
    pub fn assert_only_fixture_left(&self) {
        assert_eq!(
            self.fake.repository_names(),
            vec![FIXTURE_REPO.to_string()],
            "test repositories leaked"
        );
    }
}
