//! `DELETE /repos/{owner}/{repo}` scenarios.
//!
//! The group shares one context. [`setup`] creates the repository that
//! [`delete_repo`] removes; if that scenario fails or never runs, the group
//! teardown deletes it instead. The negative scenarios target the fixture
//! repository and never delete anything.

use anyhow::{Context, Result};
use api_harness::{
    ApiRequest, Expectations, Matcher, REPO, TestContext, USER_REPOS, generate_test_repo_name,
};
use tracing::info;

use super::{
    ADMIN_RIGHTS_REQUIRED, BAD_CREDENTIALS, INVALID_AUTH_TOKEN, INVALID_OWNER_USERNAME,
    INVALID_REPO_NAME, NOT_FOUND, github_error, record_if_created, repository_body,
};

pub const DELETION_DESCRIPTION: &str = "This is a test repository for deletion";

fn delete_request(owner: &str, repo: &str) -> ApiRequest {
    ApiRequest::delete(REPO)
        .path_param("owner", owner)
        .path_param("repo", repo)
}

/// Group setup: creates the repository [`delete_repo`] removes.
pub async fn setup(ctx: &TestContext) -> Result<String> {
    let name = generate_test_repo_name("delete");
    let request = ApiRequest::post(USER_REPOS)
        .bearer_token(ctx.auth_token())
        .body(repository_body(Some(&name), Some(DELETION_DESCRIPTION)));

    let response = ctx.send(&request).await?;
    record_if_created(ctx, &response)?;

    Expectations::status(201)
        .body("name", Matcher::equal_to(name.as_str()))
        .body("description", Matcher::equal_to(DELETION_DESCRIPTION))
        .verify(&response)
        .context("creating the repository for the deletion scenarios")?;

    info!(repo = %name, "Created repository for deletion");
    Ok(name)
}

/// Deletes the repository created by [`setup`].
pub async fn delete_repo(ctx: &TestContext) -> Result<()> {
    let target = ctx
        .created()
        .into_iter()
        .next()
        .context("no repository was created for deletion")?;

    let request = delete_request(ctx.owner(), &target).bearer_token(ctx.auth_token());
    let response = ctx.send(&request).await?;

    Expectations::status(204).verify(&response)?;
    ctx.forget(&target);
    Ok(())
}

/// GitHub answers an anonymous delete with `403`.
pub async fn delete_repo_without_auth_header(ctx: &TestContext) -> Result<()> {
    let request = delete_request(ctx.owner(), ctx.fixture_repo());

    let response = ctx.send(&request).await?;

    github_error(403, ADMIN_RIGHTS_REQUIRED).verify(&response)?;
    Ok(())
}

pub async fn delete_repo_with_invalid_token(ctx: &TestContext) -> Result<()> {
    let request = delete_request(ctx.owner(), ctx.fixture_repo()).bearer_token(INVALID_AUTH_TOKEN);

    let response = ctx.send(&request).await?;

    github_error(401, BAD_CREDENTIALS).verify(&response)?;
    Ok(())
}

pub async fn delete_repo_with_invalid_owner(ctx: &TestContext) -> Result<()> {
    let request =
        delete_request(INVALID_OWNER_USERNAME, ctx.fixture_repo()).bearer_token(ctx.auth_token());

    let response = ctx.send(&request).await?;

    github_error(404, NOT_FOUND).verify(&response)?;
    Ok(())
}

pub async fn delete_repo_with_invalid_name(ctx: &TestContext) -> Result<()> {
    let request = delete_request(ctx.owner(), INVALID_REPO_NAME).bearer_token(ctx.auth_token());

    let response = ctx.send(&request).await?;

    github_error(404, NOT_FOUND).verify(&response)?;
    Ok(())
}
