//! Per-test context and guaranteed teardown.
//!
//! A [`TestContext`] records every repository a test creates. Teardown
//! deletes them again, expecting `204 No Content`, and runs whether the test
//! body returned an error, succeeded, or panicked. Teardown failures are
//! logged and reported but never replace the outcome of the test body.

use std::{
    future::Future,
    panic::{self, AssertUnwindSafe},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use futures_util::FutureExt;
use secrecy::ExposeSecret;
use tracing::{info, warn};

use crate::{
    assertions::Expectations,
    client::ApiClient,
    config::HarnessConfig,
    errors::HarnessError,
    request::{ApiRequest, REPO},
    response::ApiResponse,
};

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;

/// State shared by one test, or by one group of tests with class-level
/// setup and teardown.
#[derive(Debug)]
pub struct TestContext {
    client: ApiClient,
    config: Arc<HarnessConfig>,
    created: Mutex<Vec<String>>,
}

impl TestContext {
    pub fn new(client: ApiClient, config: Arc<HarnessConfig>) -> Self {
        Self {
            client,
            config,
            created: Mutex::new(Vec::new()),
        }
    }

    /// Builds a client for the configured base URL.
    pub fn from_config(config: Arc<HarnessConfig>) -> Result<Self, HarnessError> {
        let client = ApiClient::new(config.base_url.clone())?;
        Ok(Self::new(client, config))
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn owner(&self) -> &str {
        &self.config.owner
    }

    /// Name of the pre-existing fixture repository.
    pub fn fixture_repo(&self) -> &str {
        &self.config.repo_name
    }

    pub fn auth_token(&self) -> &str {
        self.config.auth_token.expose_secret()
    }

    pub async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, HarnessError> {
        self.client.send(request).await
    }

    /// Records a repository for deletion at teardown.
    pub fn record_created(&self, name: impl Into<String>) {
        let name = name.into();
        info!(repo = %name, "Recorded repository for teardown");
        let mut created = self.lock_created();
        if !created.contains(&name) {
            created.push(name);
        }
    }

    /// Stops tracking a repository the test already deleted itself.
    pub fn forget(&self, name: &str) -> bool {
        let mut created = self.lock_created();
        let before = created.len();
        created.retain(|recorded| recorded != name);
        before != created.len()
    }

    pub fn created(&self) -> Vec<String> {
        self.lock_created().clone()
    }

    /// Deletes every recorded repository.
    ///
    /// Each deletion is attempted even if an earlier one failed. The recorded
    /// list is empty afterwards.
    pub async fn teardown(&self) -> TeardownReport {
        let pending: Vec<String> = self.lock_created().drain(..).collect();
        let mut report = TeardownReport::default();

        for repo in pending {
            let request = ApiRequest::delete(REPO)
                .path_param("owner", self.owner())
                .path_param("repo", repo.as_str())
                .bearer_token(self.auth_token());

            let outcome = match self.client.send(&request).await {
                Ok(response) => Expectations::status(204)
                    .verify(&response)
                    .map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            };

            match outcome {
                Ok(()) => {
                    info!(owner = self.owner(), repo = %repo, "✓ Deleted test repository");
                    report.deleted.push(repo);
                }
                Err(reason) => {
                    warn!(
                        owner = self.owner(),
                        repo = %repo,
                        error = %reason,
                        "Failed to delete test repository during teardown"
                    );
                    report.failures.push(TeardownFailure { repo, reason });
                }
            }
        }

        report
    }

    fn lock_created(&self) -> MutexGuard<'_, Vec<String>> {
        self.created.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let leaked = self.lock_created();
        if !leaked.is_empty() {
            warn!(
                owner = %self.config.owner,
                repositories = ?*leaked,
                "Test context dropped without teardown; repositories may have leaked"
            );
        }
    }
}

/// Result of a teardown pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TeardownReport {
    pub deleted: Vec<String>,
    pub failures: Vec<TeardownFailure>,
}

impl TeardownReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A repository that could not be deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeardownFailure {
    pub repo: String,
    pub reason: String,
}

/// Runs `body`, then tears `ctx` down.
///
/// A panic in `body` is caught, teardown runs, and the panic is resumed. The
/// teardown report is returned alongside the body's output; a failed teardown
/// does not alter that output.
///
/// ```no_run
/// # use api_harness::{TestContext, run_with_teardown};
/// # async fn scenario(ctx: &TestContext) -> Result<(), String> { Ok(()) }
/// # async fn example(ctx: TestContext) {
/// let (result, teardown) = run_with_teardown(&ctx, scenario(&ctx)).await;
/// assert!(result.is_ok());
/// assert!(teardown.is_clean());
/// # }
/// ```
pub async fn run_with_teardown<Fut>(ctx: &TestContext, body: Fut) -> (Fut::Output, TeardownReport)
where
    Fut: Future,
{
    let outcome = AssertUnwindSafe(body).catch_unwind().await;
    let report = ctx.teardown().await;

    if !report.is_clean() {
        warn!(
            failures = report.failures.len(),
            "Teardown finished with failures"
        );
    }

    match outcome {
        Ok(output) => (output, report),
        Err(payload) => panic::resume_unwind(payload),
    }
}
