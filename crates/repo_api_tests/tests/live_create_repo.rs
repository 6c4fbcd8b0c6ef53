//! Create scenarios against the configured GitHub account.
//!
//! Each test creates at most one repository and deletes it again in its
//! teardown.

mod common;

use anyhow::Result;
use api_harness::run_with_teardown;
use repo_api_tests::Scenario;
use serial_test::serial;

async fn run(scenario: Scenario) -> Result<()> {
    let ctx = common::live_context()?;
    let (result, report) = run_with_teardown(&ctx, scenario.run(&ctx)).await;
    assert!(report.is_clean(), "teardown failed: {:?}", report.failures);
    result
}

#[tokio::test]
#[serial]
#[ignore = "Requires GitHub credentials"]
async fn test_create_repo() -> Result<()> {
    run(Scenario::CreateRepo).await
}

#[tokio::test]
#[serial]
#[ignore = "Requires GitHub credentials"]
async fn test_create_repo_without_description() -> Result<()> {
    run(Scenario::CreateRepoWithoutDescription).await
}

#[tokio::test]
#[serial]
#[ignore = "Requires GitHub credentials"]
async fn test_create_repo_without_auth_header() -> Result<()> {
    run(Scenario::CreateRepoWithoutAuthHeader).await
}

#[tokio::test]
#[serial]
#[ignore = "Requires GitHub credentials"]
async fn test_create_repo_with_invalid_token() -> Result<()> {
    run(Scenario::CreateRepoWithInvalidToken).await
}

#[tokio::test]
#[serial]
#[ignore = "Requires GitHub credentials"]
async fn test_create_repo_with_invalid_token_header() -> Result<()> {
    run(Scenario::CreateRepoWithInvalidTokenHeader).await
}

#[tokio::test]
#[serial]
#[ignore = "Requires GitHub credentials"]
async fn test_create_repo_without_name() -> Result<()> {
    run(Scenario::CreateRepoWithoutName).await
}

#[tokio::test]
#[serial]
#[ignore = "Requires GitHub credentials"]
async fn test_create_repo_with_malformed_json() -> Result<()> {
    run(Scenario::CreateRepoWithMalformedJson).await
}

#[tokio::test]
#[serial]
#[ignore = "Requires GitHub credentials"]
async fn test_create_then_delete_repo() -> Result<()> {
    run(Scenario::CreateThenDeleteRepo).await
}
