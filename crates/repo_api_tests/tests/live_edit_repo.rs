//! Edit scenarios against the configured fixture repository.
//!
//! The fixture's description is left at whatever the last edit set.

mod common;

use anyhow::Result;
use repo_api_tests::scenarios::edit::{self, NEW_DESCRIPTIONS};
use serial_test::serial;

#[tokio::test]
#[serial]
#[ignore = "Requires GitHub credentials"]
async fn test_edit_repo() -> Result<()> {
    let ctx = common::live_context()?;
    for description in NEW_DESCRIPTIONS {
        edit::edit_repo(&ctx, description).await?;
    }
    Ok(())
}

#[tokio::test]
#[serial]
#[ignore = "Requires GitHub credentials"]
async fn test_edit_repo_round_trip() -> Result<()> {
    let ctx = common::live_context()?;
    edit::edit_repo_round_trip(&ctx).await
}

#[tokio::test]
#[serial]
#[ignore = "Requires GitHub credentials"]
async fn test_edit_repo_without_auth_header() -> Result<()> {
    let ctx = common::live_context()?;
    edit::edit_repo_without_auth_header(&ctx).await
}

#[tokio::test]
#[serial]
#[ignore = "Requires GitHub credentials"]
async fn test_edit_repo_with_invalid_owner() -> Result<()> {
    let ctx = common::live_context()?;
    edit::edit_repo_with_invalid_owner(&ctx).await
}

#[tokio::test]
#[serial]
#[ignore = "Requires GitHub credentials"]
async fn test_edit_repo_with_invalid_name() -> Result<()> {
    let ctx = common::live_context()?;
    edit::edit_repo_with_invalid_name(&ctx).await
}

#[tokio::test]
#[serial]
#[ignore = "Requires GitHub credentials"]
async fn test_edit_repo_with_invalid_token() -> Result<()> {
    let ctx = common::live_context()?;
    edit::edit_repo_with_invalid_token(&ctx).await
}
