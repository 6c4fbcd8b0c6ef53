//! Harness for exercising the GitHub repository REST endpoints.
//!
//! The harness is deliberately small: a configuration loader, a request
//! builder, an HTTP client, declarative response assertions, and a test
//! context that deletes whatever a test created once the test is over.

pub mod assertions;
pub mod client;
pub mod config;
pub mod errors;
pub mod json_path;
pub mod lifecycle;
pub mod naming;
pub mod request;
pub mod response;

pub use assertions::{Expectations, Matcher};
pub use client::ApiClient;
pub use config::{Configuration, HarnessConfig};
pub use errors::{AssertionError, ConfigError, HarnessError};
pub use json_path::JsonPath;
pub use lifecycle::{TeardownFailure, TeardownReport, TestContext, run_with_teardown};
pub use naming::{generate_test_repo_name, get_workflow_context, is_test_repository};
pub use request::{ApiRequest, REPO, USER_REPOS};
pub use response::ApiResponse;

/// Initialize logging for suite binaries.
///
/// Honours `RUST_LOG`, defaulting to `info`.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();
}
