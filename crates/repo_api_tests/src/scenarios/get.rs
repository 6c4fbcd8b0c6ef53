//! `GET /user/repos` and `GET /repos/{owner}/{repo}` scenarios against the
//! fixture repository.

use anyhow::{Result, ensure};
use api_harness::{ApiRequest, Expectations, Matcher, REPO, TestContext, USER_REPOS};

use super::{
    BAD_CREDENTIALS, INVALID_AUTH_TOKEN, INVALID_OWNER_USERNAME, INVALID_REPO_NAME, NOT_FOUND,
    REQUIRES_AUTHENTICATION, github_error,
};

fn repo_request(owner: &str, repo: &str) -> ApiRequest {
    ApiRequest::get(REPO)
        .path_param("owner", owner)
        .path_param("repo", repo)
}

pub async fn get_repos(ctx: &TestContext) -> Result<()> {
    let request = ApiRequest::get(USER_REPOS).bearer_token(ctx.auth_token());

    let response = ctx.send(&request).await?;

    Expectations::status(200)
        .body("size()", Matcher::greater_than(0))
        .verify(&response)?;
    Ok(())
}

pub async fn get_specific_repo(ctx: &TestContext) -> Result<()> {
    let owner = ctx.owner();
    let repo = ctx.fixture_repo();
    let request = repo_request(owner, repo).bearer_token(ctx.auth_token());

    let response = ctx.send(&request).await?;

    Expectations::status(200)
        .body("name", Matcher::equal_to(repo))
        .body("owner.login", Matcher::equal_to(owner))
        .body("id", Matcher::not_null())
        .body("node_id", Matcher::not_null())
        .body("full_name", Matcher::equal_to(format!("{owner}/{repo}")))
        .body("private", Matcher::equal_to(false))
        .verify(&response)?;
    Ok(())
}

/// Two identical reads return identical bodies.
pub async fn get_specific_repo_is_idempotent(ctx: &TestContext) -> Result<()> {
    let request = repo_request(ctx.owner(), ctx.fixture_repo()).bearer_token(ctx.auth_token());

    let first = ctx.send(&request).await?;
    Expectations::status(200).verify(&first)?;
    let second = ctx.send(&request).await?;
    Expectations::status(200).verify(&second)?;

    ensure!(
        first.body == second.body,
        "repeated GET returned different bodies:\nfirst:  {}\nsecond: {}",
        first.raw_body,
        second.raw_body
    );
    Ok(())
}

pub async fn get_repos_without_auth_header(ctx: &TestContext) -> Result<()> {
    let response = ctx.send(&ApiRequest::get(USER_REPOS)).await?;

    github_error(401, REQUIRES_AUTHENTICATION).verify(&response)?;
    Ok(())
}

pub async fn get_repos_with_invalid_token(ctx: &TestContext) -> Result<()> {
    let request = ApiRequest::get(USER_REPOS).bearer_token(INVALID_AUTH_TOKEN);

    let response = ctx.send(&request).await?;

    github_error(401, BAD_CREDENTIALS).verify(&response)?;
    Ok(())
}

pub async fn get_specific_repo_with_invalid_token(ctx: &TestContext) -> Result<()> {
    let request = repo_request(ctx.owner(), ctx.fixture_repo()).bearer_token(INVALID_AUTH_TOKEN);

    let response = ctx.send(&request).await?;

    github_error(401, BAD_CREDENTIALS).verify(&response)?;
    Ok(())
}

pub async fn get_specific_repo_with_invalid_name(ctx: &TestContext) -> Result<()> {
    let request = repo_request(ctx.owner(), INVALID_REPO_NAME).bearer_token(ctx.auth_token());

    let response = ctx.send(&request).await?;

    github_error(404, NOT_FOUND).verify(&response)?;
    Ok(())
}

pub async fn get_specific_repo_with_invalid_owner(ctx: &TestContext) -> Result<()> {
    let request =
        repo_request(INVALID_OWNER_USERNAME, ctx.fixture_repo()).bearer_token(ctx.auth_token());

    let response = ctx.send(&request).await?;

    github_error(404, NOT_FOUND).verify(&response)?;
    Ok(())
}
