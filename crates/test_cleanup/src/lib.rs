//! Test repository cleanup utilities.
//!
//! Scenario teardown deletes what a run creates, but a run that is killed
//! part-way leaves repositories behind. This crate finds repositories named
//! by [`api_harness::generate_test_repo_name`] that are older than a cutoff
//! and deletes them. It can be used from test code or via the
//! `cleanup-orphans` binary.

use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use api_harness::{
    ApiClient, ApiRequest, Configuration, Expectations, REPO, USER_REPOS,
    config::{AUTH_TOKEN, BASE_URL, CONFIG_PATH_ENV, OWNER_USERNAME, default_config_path},
};
use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, info, warn};
use url::Url;

pub use api_harness::init_logging;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

const PER_PAGE: u32 = 100;

/// Configuration for cleanup operations.
///
/// Uses the suite's properties file and environment overrides, but only the
/// keys the sweeper needs.
#[derive(Debug)]
pub struct CleanupConfig {
    pub base_url: Url,
    pub owner: String,
    pub auth_token: SecretString,
}

impl CleanupConfig {
    /// Load cleanup configuration.
    ///
    /// The properties file is `API_TEST_CONFIG` if set, otherwise
    /// `config.properties` when present. Environment variables override file
    /// values. Required keys:
    /// - `BASE_URL`
    /// - `OWNER_USERNAME`
    /// - `AUTH_TOKEN`
    pub fn load() -> Result<Self> {
        let explicit = env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from);
        Self::load_from(explicit.as_deref())
    }

    /// Loads from an explicit file, or `config.properties` when present.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let default_path = default_config_path();
        let configuration = match path {
            Some(path) => Configuration::load(path)?,
            None if default_path.exists() => Configuration::load(&default_path)?,
            None => Configuration::default(),
        };
        Self::from_configuration(&configuration.with_env_overrides())
    }

    pub fn from_configuration(configuration: &Configuration) -> Result<Self> {
        let raw_base_url = configuration.require(BASE_URL)?;
        let base_url = Url::parse(raw_base_url)
            .with_context(|| format!("BASE_URL is not a valid URL: {raw_base_url}"))?;

        Ok(Self {
            base_url,
            owner: configuration.require(OWNER_USERNAME)?.to_string(),
            auth_token: SecretString::from(configuration.require(AUTH_TOKEN)?.to_string()),
        })
    }
}

#[derive(Debug, Deserialize)]
struct RepositorySummary {
    name: String,
    owner: OwnerSummary,
    created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct OwnerSummary {
    login: String,
}

/// Repository cleanup operations for test repositories.
pub struct RepositoryCleanup {
    client: ApiClient,
    owner: String,
    auth_token: SecretString,
}

impl RepositoryCleanup {
    pub fn new(client: ApiClient, owner: String, auth_token: SecretString) -> Self {
        Self {
            client,
            owner,
            auth_token,
        }
    }

    pub fn from_config(config: CleanupConfig) -> Result<Self> {
        let client =
            ApiClient::new(config.base_url).context("Failed to create API client for cleanup")?;
        Ok(Self::new(client, config.owner, config.auth_token))
    }

    /// Check if a repository name matches the test repository naming pattern.
    pub fn is_test_repository(repo_name: &str) -> bool {
        api_harness::is_test_repository(repo_name)
    }

    /// Find and delete orphaned test repositories.
    ///
    /// Lists every repository of the authenticated user, selects the test
    /// repositories owned by the configured owner that were created more than
    /// `max_age_hours` ago, and deletes them. Deletion is best-effort; the
    /// names that were deleted are returned. An age too large to subtract
    /// from the current time is an error and nothing is deleted.
    pub async fn cleanup_orphaned_repositories(&self, max_age_hours: u64) -> Result<Vec<String>> {
        info!(
            owner = self.owner,
            max_age_hours = max_age_hours,
            "Searching for orphaned test repositories"
        );

        let max_age = i64::try_from(max_age_hours)
            .ok()
            .and_then(Duration::try_hours)
            .with_context(|| format!("Maximum age of {max_age_hours} hours is out of range"))?;
        let cutoff_time = Utc::now()
            .checked_sub_signed(max_age)
            .with_context(|| format!("Maximum age of {max_age_hours} hours is out of range"))?;

        // Collect first: deleting while paging would shift later pages.
        let mut candidates = Vec::new();
        let mut page = 1u32;
        loop {
            let repositories = self.list_page(page).await?;
            if repositories.is_empty() {
                info!(
                    owner = self.owner,
                    total_pages = page - 1,
                    "No more repositories to process"
                );
                break;
            }

            for repo in repositories {
                if repo.owner.login != self.owner || !Self::is_test_repository(&repo.name) {
                    continue;
                }

                match repo.created_at {
                    Some(created_at) if created_at < cutoff_time => {
                        info!(
                            repo_name = repo.name,
                            created_at = %created_at,
                            cutoff_time = %cutoff_time,
                            "Found orphaned test repository"
                        );
                        candidates.push(repo.name);
                    }
                    Some(created_at) => {
                        debug!(
                            repo_name = repo.name,
                            age_hours = (Utc::now() - created_at).num_hours(),
                            "Repository is too new, skipping"
                        );
                    }
                    None => {
                        debug!(repo_name = repo.name, "Repository has no creation time, skipping");
                    }
                }
            }

            page += 1;
        }

        let mut deleted_repos = Vec::new();
        for repo_name in candidates {
            if self.delete_repository(&repo_name).await.is_ok() {
                deleted_repos.push(repo_name);
            }
        }

        info!(
            owner = self.owner,
            deleted_count = deleted_repos.len(),
            "Cleanup completed"
        );

        Ok(deleted_repos)
    }

    /// Delete a repository by name.
    ///
    /// Failures are logged and returned; callers sweeping many repositories
    /// carry on with the rest.
    pub async fn delete_repository(&self, repo_name: &str) -> Result<()> {
        info!(owner = self.owner, repo_name = repo_name, "Deleting repository");

        let request = ApiRequest::delete(REPO)
            .path_param("owner", self.owner.as_str())
            .path_param("repo", repo_name)
            .bearer_token(self.auth_token.expose_secret());

        let outcome = match self.client.send(&request).await {
            Ok(response) => Expectations::status(204)
                .verify(&response)
                .map_err(anyhow::Error::from),
            Err(err) => Err(err.into()),
        };

        match outcome {
            Ok(()) => {
                info!(
                    owner = self.owner,
                    repo_name = repo_name,
                    "Successfully deleted repository"
                );
                Ok(())
            }
            Err(err) => {
                warn!(
                    owner = self.owner,
                    repo_name = repo_name,
                    error = %err,
                    "Failed to delete repository (may not exist or lack permissions)"
                );
                Err(err).context(format!("Failed to delete repository {}", repo_name))
            }
        }
    }

    async fn list_page(&self, page: u32) -> Result<Vec<RepositorySummary>> {
        debug!(owner = self.owner, page = page, "Fetching page {} of repositories", page);

        let request = ApiRequest::get(USER_REPOS)
            .query("per_page", PER_PAGE.to_string())
            .query("page", page.to_string())
            .bearer_token(self.auth_token.expose_secret());

        let response = self
            .client
            .send(&request)
            .await
            .context("Failed to list repositories")?;
        Expectations::status(200)
            .verify(&response)
            .context("Failed to list repositories")?;

        let body = response
            .body
            .context("Repository listing is not JSON")?;
        serde_json::from_value(body).context("Unexpected repository listing format")
    }
}
