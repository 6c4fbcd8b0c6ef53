//! Runs the repository API scenarios against a live API.
//!
//! ## Usage
//!
//! ```bash
//! # Run every scenario using ./config.properties
//! cargo run --bin repo-api-tests
//!
//! # Run only the edit scenarios with an explicit configuration file
//! cargo run --bin repo-api-tests -- --filter edit_repo --config ci.properties
//! ```
//!
//! ## Configuration
//!
//! `BASE_URL`, `OWNER_USERNAME`, `AUTH_TOKEN` and `REPO_NAME` are read from
//! the properties file and may be overridden by environment variables of the
//! same name.

use std::{path::PathBuf, process};

use anyhow::{Context, Result};
use api_harness::{HarnessConfig, init_logging};
use clap::Parser;
use repo_api_tests::{DEFAULT_REPORT_PATH, SuiteRunner, write_report};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "repo-api-tests")]
#[command(about = "Tests the GitHub repository REST endpoints", long_about = None)]
struct Args {
    /// Properties file to load (defaults to $API_TEST_CONFIG or ./config.properties)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Only run scenarios whose name contains this text
    #[arg(long, value_name = "TEXT")]
    filter: Option<String>,

    /// Where to write the Markdown report
    #[arg(long, value_name = "FILE", default_value = DEFAULT_REPORT_PATH)]
    report: PathBuf,
}

#[tokio::main]
async fn main() {
    init_logging();
    let args = Args::parse();

    match run(args).await {
        Ok(true) => info!("All scenarios passed"),
        Ok(false) => process::exit(1),
        Err(e) => {
            error!(error = %format!("{e:#}"), "Test run aborted");
            process::exit(1);
        }
    }
}

async fn run(args: Args) -> Result<bool> {
    let config = match &args.config {
        Some(path) => HarnessConfig::load_from(Some(path.as_path())),
        None => HarnessConfig::load(),
    }
    .context("Failed to load test configuration")?;

    info!(
        base_url = %config.base_url,
        owner = %config.owner,
        fixture_repo = %config.repo_name,
        "Loaded test configuration"
    );

    let runner = SuiteRunner::new(config);
    let results = runner.run_all(args.filter.as_deref()).await;

    let passed = results.iter().filter(|r| r.success).count();
    let failed = results.len() - passed;
    let teardown_failures: usize = results.iter().map(|r| r.teardown_failures.len()).sum();
    info!(
        total = results.len(),
        passed,
        failed,
        teardown_failures,
        "=== Test Suite Summary ==="
    );

    write_report(&args.report, &results)?;

    if failed > 0 {
        error!("Test suite failed with {} failed scenarios", failed);
    }
    Ok(failed == 0)
}
