//! Naming of repositories created by the suite.
//!
//! Every repository a scenario creates gets a unique, recognisable name so
//! concurrent CI runs never collide and leftovers can be swept later.

use std::env;

use chrono::Utc;
use uuid::Uuid;

#[cfg(test)]
#[path = "naming_tests.rs"]
mod tests;

/// Prefix shared by every repository the suite creates.
pub const TEST_REPO_PREFIX: &str = "test-repo-api-";

/// Extract workflow context from the GitHub Actions environment.
///
/// Returns:
/// - `pr{number}` for pull request workflows (e.g., "pr123")
/// - `main` for pushes to main/master branch
/// - the branch name with `/` replaced by `-` for other branches
/// - `local` outside GitHub Actions
pub fn get_workflow_context() -> String {
    if let Ok(github_ref) = env::var("GITHUB_REF") {
        if let Some(rest) = github_ref.strip_prefix("refs/pull/") {
            if let Some(pr_num) = rest.split('/').next().filter(|n| !n.is_empty()) {
                return format!("pr{}", pr_num);
            }
        } else if let Some(branch) = github_ref.strip_prefix("refs/heads/") {
            if branch == "main" || branch == "master" {
                return "main".to_string();
            }
            return branch.replace('/', "-");
        }
    }

    "local".to_string()
}

/// Generate a unique test repository name.
///
/// Format: `test-repo-api-{context}-{timestamp}-{test-name}-{random}`
///
/// ```
/// use api_harness::generate_test_repo_name;
///
/// let name = generate_test_repo_name("delete");
/// // test-repo-api-local-20240108-120000-delete-a1b2c3
/// assert!(name.starts_with("test-repo-api-"));
/// ```
pub fn generate_test_repo_name(test_name: &str) -> String {
    let context = get_workflow_context();
    let timestamp = Utc::now().format("%Y%m%d-%H%M%S");
    let random_suffix = &Uuid::new_v4().simple().to_string()[..6];
    format!(
        "{}{}-{}-{}-{}",
        TEST_REPO_PREFIX, context, timestamp, test_name, random_suffix
    )
}

/// Returns true for names produced by [`generate_test_repo_name`].
pub fn is_test_repository(repo_name: &str) -> bool {
    repo_name.starts_with(TEST_REPO_PREFIX)
}
