//! `PATCH /repos/{owner}/{repo}` scenarios against the fixture repository.
//!
//! Edits are limited to the fixture's description field.

use anyhow::Result;
use api_harness::{ApiRequest, Expectations, Matcher, REPO, TestContext};
use chrono::Utc;

use super::{
    BAD_CREDENTIALS, INVALID_AUTH_TOKEN, INVALID_OWNER_USERNAME, INVALID_REPO_NAME, NOT_FOUND,
    github_error, repository_body,
};

/// Descriptions the parameterized edit scenario sends, one run each.
pub const NEW_DESCRIPTIONS: [&str; 3] = [
    "Updated description only string",
    "12345",
    "!#$%^&*()_+|",
];

fn edit_request(owner: &str, repo: &str, description: &str) -> ApiRequest {
    ApiRequest::patch(REPO)
        .path_param("owner", owner)
        .path_param("repo", repo)
        .body(repository_body(None, Some(description)))
}

fn timestamped_description() -> String {
    format!("Update description {}", Utc::now().format("%Y%m%d-%H%M%S"))
}

/// Updates the fixture description; the new value is echoed back.
pub async fn edit_repo(ctx: &TestContext, description: &str) -> Result<()> {
    let request =
        edit_request(ctx.owner(), ctx.fixture_repo(), description).bearer_token(ctx.auth_token());

    let response = ctx.send(&request).await?;

    Expectations::status(200)
        .body("description", Matcher::equal_to(description))
        .verify(&response)?;
    Ok(())
}

/// An edit is visible to a subsequent read.
pub async fn edit_repo_round_trip(ctx: &TestContext) -> Result<()> {
    let description = timestamped_description();
    edit_repo(ctx, &description).await?;

    let request = ApiRequest::get(REPO)
        .path_param("owner", ctx.owner())
        .path_param("repo", ctx.fixture_repo())
        .bearer_token(ctx.auth_token());
    let response = ctx.send(&request).await?;

    Expectations::status(200)
        .body("description", Matcher::equal_to(description.as_str()))
        .verify(&response)?;
    Ok(())
}

/// GitHub answers an anonymous edit with `404`, not `401`.
pub async fn edit_repo_without_auth_header(ctx: &TestContext) -> Result<()> {
    let request = edit_request(ctx.owner(), ctx.fixture_repo(), &timestamped_description());

    let response = ctx.send(&request).await?;

    github_error(404, NOT_FOUND).verify(&response)?;
    Ok(())
}

pub async fn edit_repo_with_invalid_owner(ctx: &TestContext) -> Result<()> {
    let request = edit_request(
        INVALID_OWNER_USERNAME,
        ctx.fixture_repo(),
        &timestamped_description(),
    )
    .bearer_token(ctx.auth_token());

    let response = ctx.send(&request).await?;

    github_error(404, NOT_FOUND).verify(&response)?;
    Ok(())
}

pub async fn edit_repo_with_invalid_name(ctx: &TestContext) -> Result<()> {
    let request = edit_request(ctx.owner(), INVALID_REPO_NAME, &timestamped_description())
        .bearer_token(ctx.auth_token());

    let response = ctx.send(&request).await?;

    github_error(404, NOT_FOUND).verify(&response)?;
    Ok(())
}

pub async fn edit_repo_with_invalid_token(ctx: &TestContext) -> Result<()> {
    let request = edit_request(ctx.owner(), ctx.fixture_repo(), &timestamped_description())
        .bearer_token(INVALID_AUTH_TOKEN);

    let response = ctx.send(&request).await?;

    github_error(401, BAD_CREDENTIALS).verify(&response)?;
    Ok(())
}
