//! `POST /user/repos` scenarios.
//!
//! Every scenario here runs in its own context with per-test teardown. A
//! repository is recorded as soon as a `201 Created` comes back, including
//! from negative scenarios that unexpectedly succeed.

use anyhow::{Context, Result};
use api_harness::{
    ApiRequest, Expectations, Matcher, REPO, TestContext, USER_REPOS, generate_test_repo_name,
};
use tracing::info;

use super::{
    BAD_CREDENTIALS, INVALID_AUTH_TOKEN, PROBLEMS_PARSING_JSON, REPOSITORY_CREATION_FAILED,
    REQUIRES_AUTHENTICATION, github_error, record_if_created, repository_body,
};

pub const TEST_DESCRIPTION: &str = "This is a test repository";

/// Creates a repository with a name and description; both are echoed back.
pub async fn create_repo(ctx: &TestContext) -> Result<()> {
    let name = generate_test_repo_name("create");
    create_repo_named(ctx, &name, Some(TEST_DESCRIPTION)).await
}

/// Creates a repository with only a name.
pub async fn create_repo_without_description(ctx: &TestContext) -> Result<()> {
    let name = generate_test_repo_name("create-no-description");
    create_repo_named(ctx, &name, None).await
}

/// Creates `name` with an optional description and checks the echo.
pub async fn create_repo_named(
    ctx: &TestContext,
    name: &str,
    description: Option<&str>,
) -> Result<()> {
    let request = ApiRequest::post(USER_REPOS)
        .bearer_token(ctx.auth_token())
        .body(repository_body(Some(name), description));

    let response = ctx.send(&request).await?;
    record_if_created(ctx, &response)?;

    let mut expectations = Expectations::status(201).body("name", Matcher::equal_to(name));
    if let Some(description) = description {
        expectations = expectations.body("description", Matcher::equal_to(description));
    }
    expectations.verify(&response)?;

    info!(repo = name, "Created repository");
    Ok(())
}

pub async fn create_repo_without_auth_header(ctx: &TestContext) -> Result<()> {
    let name = generate_test_repo_name("create-no-auth");
    let request =
        ApiRequest::post(USER_REPOS).body(repository_body(Some(&name), Some(TEST_DESCRIPTION)));

    let response = ctx.send(&request).await?;
    record_if_created(ctx, &response)?;

    github_error(401, REQUIRES_AUTHENTICATION).verify(&response)?;
    Ok(())
}

/// Invalid-token create, kept with its documented expectation.
///
/// The documented message is the one GitHub returns for a request with no
/// credentials at all, so the invalid token is not attached here.
/// [`create_repo_with_invalid_token_header`] sends the token.
pub async fn create_repo_with_invalid_token(ctx: &TestContext) -> Result<()> {
    let name = generate_test_repo_name("create-invalid-token");
    let request =
        ApiRequest::post(USER_REPOS).body(repository_body(Some(&name), Some(TEST_DESCRIPTION)));

    let response = ctx.send(&request).await?;
    record_if_created(ctx, &response)?;

    github_error(401, REQUIRES_AUTHENTICATION).verify(&response)?;
    Ok(())
}

/// Create with `Authorization: Bearer INVALID_AUTH_TOKEN`.
pub async fn create_repo_with_invalid_token_header(ctx: &TestContext) -> Result<()> {
    let name = generate_test_repo_name("create-invalid-header");
    let request = ApiRequest::post(USER_REPOS)
        .bearer_token(INVALID_AUTH_TOKEN)
        .body(repository_body(Some(&name), Some(TEST_DESCRIPTION)));

    let response = ctx.send(&request).await?;
    record_if_created(ctx, &response)?;

    github_error(401, BAD_CREDENTIALS).verify(&response)?;
    Ok(())
}

pub async fn create_repo_without_name(ctx: &TestContext) -> Result<()> {
    let request = ApiRequest::post(USER_REPOS)
        .bearer_token(ctx.auth_token())
        .body(repository_body(None, Some(TEST_DESCRIPTION)));

    let response = ctx.send(&request).await?;
    record_if_created(ctx, &response)?;

    Expectations::status(422)
        .body("message", Matcher::equal_to(REPOSITORY_CREATION_FAILED))
        .body("errors[0].code", Matcher::equal_to("missing_field"))
        .body("errors[0].field", Matcher::equal_to("name"))
        .verify(&response)?;
    Ok(())
}

pub async fn create_repo_with_malformed_json(ctx: &TestContext) -> Result<()> {
    let name = generate_test_repo_name("create-malformed");
    let request = ApiRequest::post(USER_REPOS)
        .bearer_token(ctx.auth_token())
        .body(format!("{{ \"name\": \"{name}\", \"description\": "));

    let response = ctx.send(&request).await?;
    record_if_created(ctx, &response)?;

    github_error(400, PROBLEMS_PARSING_JSON).verify(&response)?;
    Ok(())
}

/// Creates a repository and deletes exactly that name again.
pub async fn create_then_delete_repo(ctx: &TestContext) -> Result<()> {
    let name = generate_test_repo_name("create-delete");
    create_repo_named(ctx, &name, Some(TEST_DESCRIPTION)).await?;

    let request = ApiRequest::delete(REPO)
        .path_param("owner", ctx.owner())
        .path_param("repo", name.as_str())
        .bearer_token(ctx.auth_token());
    let response = ctx.send(&request).await?;

    Expectations::status(204)
        .verify(&response)
        .with_context(|| format!("deleting freshly created repository {name}"))?;
    ctx.forget(&name);

    Ok(())
}
