//! Cleanup orphaned test repositories.
//!
//! This binary cleans up test repositories older than a specified age.
//! It's designed to be run from GitHub Actions or manually for maintenance.
//!
//! Usage:
//!   cleanup-orphans [--max-age-hours N] [--config FILE]
//!
//! Configuration keys (properties file or environment):
//! - BASE_URL: API base URL (e.g., "https://api.github.com")
//! - OWNER_USERNAME: Account that owns the test repositories
//! - AUTH_TOKEN: Token allowed to delete repositories

use std::path::PathBuf;

use clap::Parser;
use test_cleanup::{CleanupConfig, RepositoryCleanup};

#[cfg(test)]
#[path = "cleanup_orphans_tests.rs"]
mod tests;

/// One year.
const MAX_AGE_HOURS_LIMIT: u64 = 8760;

#[derive(Parser, Debug)]
#[command(name = "cleanup-orphans")]
#[command(about = "Deletes test repositories left behind by aborted runs", long_about = None)]
struct Args {
    /// Minimum age in hours for a repository to be deleted
    #[arg(
        long,
        value_name = "HOURS",
        default_value_t = 1,
        value_parser = clap::value_parser!(u64).range(1..=MAX_AGE_HOURS_LIMIT)
    )]
    max_age_hours: u64,

    /// Properties file to load instead of $API_TEST_CONFIG or ./config.properties
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    test_cleanup::init_logging();
    let args = Args::parse();

    println!("🧹 GitHub API Test Repository Cleanup");
    println!("=====================================");
    println!();

    let config = match &args.config {
        Some(path) => CleanupConfig::load_from(Some(path.as_path()))?,
        None => CleanupConfig::load()?,
    };

    println!("📋 Configuration:");
    println!("   API: {}", config.base_url);
    println!("   Owner: {}", config.owner);
    println!("   Max age: {} hours", args.max_age_hours);
    println!();

    let cleanup = RepositoryCleanup::from_config(config)?;

    println!("🔍 Searching for orphaned test repositories...");
    let deleted = cleanup
        .cleanup_orphaned_repositories(args.max_age_hours)
        .await?;

    println!();
    println!("✅ Cleanup completed!");
    println!("   Deleted {} repositories", deleted.len());

    if !deleted.is_empty() {
        println!();
        println!("📋 Deleted repositories:");
        for repo in &deleted {
            println!("   - {}", repo);
        }
    } else {
        println!(
            "   No repositories found older than {} hours",
            args.max_age_hours
        );
    }

    Ok(())
}
