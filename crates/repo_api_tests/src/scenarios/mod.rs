//! Scenario definitions for the repository endpoints.
//!
//! Each scenario builds a request, sends it, and asserts on the response.
//! Scenarios that create a repository record it on the [`TestContext`]
//! before asserting, so teardown removes it even when an assertion fails.

use std::fmt;

use anyhow::Result;
use api_harness::{ApiResponse, Expectations, Matcher, TestContext};

pub mod create;
pub mod delete;
pub mod edit;
pub mod get;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub const INVALID_AUTH_TOKEN: &str = "INVALID_AUTH_TOKEN";
pub const INVALID_REPO_NAME: &str = "invalidRepo";
pub const INVALID_OWNER_USERNAME: &str = "invalidOwner";

pub const REQUIRES_AUTHENTICATION: &str = "Requires authentication";
pub const BAD_CREDENTIALS: &str = "Bad credentials";
pub const NOT_FOUND: &str = "Not Found";
pub const ADMIN_RIGHTS_REQUIRED: &str = "Must have admin rights to Repository.";
pub const REPOSITORY_CREATION_FAILED: &str = "Repository creation failed.";
pub const PROBLEMS_PARSING_JSON: &str = "Problems parsing JSON";

pub const DOCUMENTATION_URL_PREFIX: &str = "https://docs.github.com/";

/// Expected shape of a GitHub error response.
pub fn github_error(status: u16, message: &str) -> Expectations {
    Expectations::status(status)
        .body("message", Matcher::equal_to(message))
        .body(
            "documentation_url",
            Matcher::contains(DOCUMENTATION_URL_PREFIX),
        )
}

/// Hand-built JSON body for create and edit requests.
///
/// Values are quoted as JSON strings; fields left as `None` are omitted.
pub fn repository_body(name: Option<&str>, description: Option<&str>) -> String {
    let fields: Vec<String> = [("name", name), ("description", description)]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| format!("\"{key}\": {}", json_string(v))))
        .collect();
    format!("{{ {} }}", fields.join(", "))
}

fn json_string(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}

/// Records the repository named in a `201 Created` response for teardown.
pub(crate) fn record_if_created(ctx: &TestContext, response: &ApiResponse) -> Result<()> {
    if response.status_code() == 201 {
        if let Some(name) = response.json_string("name")? {
            ctx.record_created(name);
        }
    }
    Ok(())
}

/// Scenario groups, mirroring the four repository operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScenarioGroup {
    Create,
    Get,
    Edit,
    Delete,
}

impl ScenarioGroup {
    pub fn title(&self) -> &'static str {
        match self {
            ScenarioGroup::Create => "Create repository",
            ScenarioGroup::Get => "Get repository",
            ScenarioGroup::Edit => "Edit repository",
            ScenarioGroup::Delete => "Delete repository",
        }
    }

    /// Whether the group shares one context with class-level setup and
    /// teardown rather than one context per scenario.
    pub fn shares_context(&self) -> bool {
        matches!(self, ScenarioGroup::Delete)
    }
}

/// Every scenario the suite runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario {
    CreateRepo,
    CreateRepoWithoutDescription,
    CreateRepoWithoutAuthHeader,
    CreateRepoWithInvalidToken,
    CreateRepoWithInvalidTokenHeader,
    CreateRepoWithoutName,
    CreateRepoWithMalformedJson,
    CreateThenDeleteRepo,

    GetRepos,
    GetSpecificRepo,
    GetSpecificRepoIsIdempotent,
    GetReposWithoutAuthHeader,
    GetReposWithInvalidToken,
    GetSpecificRepoWithInvalidToken,
    GetSpecificRepoWithInvalidName,
    GetSpecificRepoWithInvalidOwner,

    EditRepo(&'static str),
    EditRepoRoundTrip,
    EditRepoWithoutAuthHeader,
    EditRepoWithInvalidOwner,
    EditRepoWithInvalidName,
    EditRepoWithInvalidToken,

    DeleteRepo,
    DeleteRepoWithoutAuthHeader,
    DeleteRepoWithInvalidToken,
    DeleteRepoWithInvalidOwner,
    DeleteRepoWithInvalidName,
}

impl Scenario {
    /// All scenarios in execution order.
    pub fn all() -> Vec<Scenario> {
        let mut scenarios = vec![
            Scenario::CreateRepo,
            Scenario::CreateRepoWithoutDescription,
            Scenario::CreateRepoWithoutAuthHeader,
            Scenario::CreateRepoWithInvalidToken,
            Scenario::CreateRepoWithInvalidTokenHeader,
            Scenario::CreateRepoWithoutName,
            Scenario::CreateRepoWithMalformedJson,
            Scenario::CreateThenDeleteRepo,
            Scenario::GetRepos,
            Scenario::GetSpecificRepo,
            Scenario::GetSpecificRepoIsIdempotent,
            Scenario::GetReposWithoutAuthHeader,
            Scenario::GetReposWithInvalidToken,
            Scenario::GetSpecificRepoWithInvalidToken,
            Scenario::GetSpecificRepoWithInvalidName,
            Scenario::GetSpecificRepoWithInvalidOwner,
        ];
        scenarios.extend(edit::NEW_DESCRIPTIONS.into_iter().map(Scenario::EditRepo));
        scenarios.extend([
            Scenario::EditRepoRoundTrip,
            Scenario::EditRepoWithoutAuthHeader,
            Scenario::EditRepoWithInvalidOwner,
            Scenario::EditRepoWithInvalidName,
            Scenario::EditRepoWithInvalidToken,
            Scenario::DeleteRepo,
            Scenario::DeleteRepoWithoutAuthHeader,
            Scenario::DeleteRepoWithInvalidToken,
            Scenario::DeleteRepoWithInvalidOwner,
            Scenario::DeleteRepoWithInvalidName,
        ]);
        scenarios
    }

    pub fn group(&self) -> ScenarioGroup {
        match self {
            Scenario::CreateRepo
            | Scenario::CreateRepoWithoutDescription
            | Scenario::CreateRepoWithoutAuthHeader
            | Scenario::CreateRepoWithInvalidToken
            | Scenario::CreateRepoWithInvalidTokenHeader
            | Scenario::CreateRepoWithoutName
            | Scenario::CreateRepoWithMalformedJson
            | Scenario::CreateThenDeleteRepo => ScenarioGroup::Create,
            Scenario::GetRepos
            | Scenario::GetSpecificRepo
            | Scenario::GetSpecificRepoIsIdempotent
            | Scenario::GetReposWithoutAuthHeader
            | Scenario::GetReposWithInvalidToken
            | Scenario::GetSpecificRepoWithInvalidToken
            | Scenario::GetSpecificRepoWithInvalidName
            | Scenario::GetSpecificRepoWithInvalidOwner => ScenarioGroup::Get,
            Scenario::EditRepo(_)
            | Scenario::EditRepoRoundTrip
            | Scenario::EditRepoWithoutAuthHeader
            | Scenario::EditRepoWithInvalidOwner
            | Scenario::EditRepoWithInvalidName
            | Scenario::EditRepoWithInvalidToken => ScenarioGroup::Edit,
            Scenario::DeleteRepo
            | Scenario::DeleteRepoWithoutAuthHeader
            | Scenario::DeleteRepoWithInvalidToken
            | Scenario::DeleteRepoWithInvalidOwner
            | Scenario::DeleteRepoWithInvalidName => ScenarioGroup::Delete,
        }
    }

    pub fn name(&self) -> String {
        let name = match self {
            Scenario::CreateRepo => "create_repo",
            Scenario::CreateRepoWithoutDescription => "create_repo_without_description",
            Scenario::CreateRepoWithoutAuthHeader => "create_repo_without_auth_header",
            Scenario::CreateRepoWithInvalidToken => "create_repo_with_invalid_token",
            Scenario::CreateRepoWithInvalidTokenHeader => "create_repo_with_invalid_token_header",
            Scenario::CreateRepoWithoutName => "create_repo_without_name",
            Scenario::CreateRepoWithMalformedJson => "create_repo_with_malformed_json",
            Scenario::CreateThenDeleteRepo => "create_then_delete_repo",
            Scenario::GetRepos => "get_repos",
            Scenario::GetSpecificRepo => "get_specific_repo",
            Scenario::GetSpecificRepoIsIdempotent => "get_specific_repo_is_idempotent",
            Scenario::GetReposWithoutAuthHeader => "get_repos_without_auth_header",
            Scenario::GetReposWithInvalidToken => "get_repos_with_invalid_token",
            Scenario::GetSpecificRepoWithInvalidToken => "get_specific_repo_with_invalid_token",
            Scenario::GetSpecificRepoWithInvalidName => "get_specific_repo_with_invalid_name",
            Scenario::GetSpecificRepoWithInvalidOwner => "get_specific_repo_with_invalid_owner",
            Scenario::EditRepo(description) => return format!("edit_repo[{description}]"),
            Scenario::EditRepoRoundTrip => "edit_repo_round_trip",
            Scenario::EditRepoWithoutAuthHeader => "edit_repo_without_auth_header",
            Scenario::EditRepoWithInvalidOwner => "edit_repo_with_invalid_owner",
            Scenario::EditRepoWithInvalidName => "edit_repo_with_invalid_name",
            Scenario::EditRepoWithInvalidToken => "edit_repo_with_invalid_token",
            Scenario::DeleteRepo => "delete_repo",
            Scenario::DeleteRepoWithoutAuthHeader => "delete_repo_without_auth_header",
            Scenario::DeleteRepoWithInvalidToken => "delete_repo_with_invalid_token",
            Scenario::DeleteRepoWithInvalidOwner => "delete_repo_with_invalid_owner",
            Scenario::DeleteRepoWithInvalidName => "delete_repo_with_invalid_name",
        };
        name.to_string()
    }

    /// Runs the scenario against `ctx`.
    ///
    /// `DeleteRepo` deletes the repository created by the deletion group's
    /// setup, so it must run in the shared group context.
    pub async fn run(&self, ctx: &TestContext) -> Result<()> {
        match self {
            Scenario::CreateRepo => create::create_repo(ctx).await,
            Scenario::CreateRepoWithoutDescription => {
                create::create_repo_without_description(ctx).await
            }
            Scenario::CreateRepoWithoutAuthHeader => {
                create::create_repo_without_auth_header(ctx).await
            }
            Scenario::CreateRepoWithInvalidToken => create::create_repo_with_invalid_token(ctx).await,
            Scenario::CreateRepoWithInvalidTokenHeader => {
                create::create_repo_with_invalid_token_header(ctx).await
            }
            Scenario::CreateRepoWithoutName => create::create_repo_without_name(ctx).await,
            Scenario::CreateRepoWithMalformedJson => {
                create::create_repo_with_malformed_json(ctx).await
            }
            Scenario::CreateThenDeleteRepo => create::create_then_delete_repo(ctx).await,
            Scenario::GetRepos => get::get_repos(ctx).await,
            Scenario::GetSpecificRepo => get::get_specific_repo(ctx).await,
            Scenario::GetSpecificRepoIsIdempotent => get::get_specific_repo_is_idempotent(ctx).await,
            Scenario::GetReposWithoutAuthHeader => get::get_repos_without_auth_header(ctx).await,
            Scenario::GetReposWithInvalidToken => get::get_repos_with_invalid_token(ctx).await,
            Scenario::GetSpecificRepoWithInvalidToken => {
                get::get_specific_repo_with_invalid_token(ctx).await
            }
            Scenario::GetSpecificRepoWithInvalidName => {
                get::get_specific_repo_with_invalid_name(ctx).await
            }
            Scenario::GetSpecificRepoWithInvalidOwner => {
                get::get_specific_repo_with_invalid_owner(ctx).await
            }
            Scenario::EditRepo(description) => edit::edit_repo(ctx, description).await,
            Scenario::EditRepoRoundTrip => edit::edit_repo_round_trip(ctx).await,
            Scenario::EditRepoWithoutAuthHeader => edit::edit_repo_without_auth_header(ctx).await,
            Scenario::EditRepoWithInvalidOwner => edit::edit_repo_with_invalid_owner(ctx).await,
            Scenario::EditRepoWithInvalidName => edit::edit_repo_with_invalid_name(ctx).await,
            Scenario::EditRepoWithInvalidToken => edit::edit_repo_with_invalid_token(ctx).await,
            Scenario::DeleteRepo => delete::delete_repo(ctx).await,
            Scenario::DeleteRepoWithoutAuthHeader => {
                delete::delete_repo_without_auth_header(ctx).await
            }
            Scenario::DeleteRepoWithInvalidToken => delete::delete_repo_with_invalid_token(ctx).await,
            Scenario::DeleteRepoWithInvalidOwner => delete::delete_repo_with_invalid_owner(ctx).await,
            Scenario::DeleteRepoWithInvalidName => delete::delete_repo_with_invalid_name(ctx).await,
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
