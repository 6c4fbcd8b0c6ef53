//! Delete scenarios against the configured GitHub account.
//!
//! The group shares one setup and one teardown, so it runs as a single test
//! through the suite runner.

mod common;

use anyhow::Result;
use api_harness::HarnessConfig;
use repo_api_tests::{Scenario, ScenarioGroup, SuiteRunner};
use serial_test::serial;

#[tokio::test]
#[serial]
#[ignore = "Requires GitHub credentials"]
async fn test_delete_group() -> Result<()> {
    common::init_test_logging();
    let runner = SuiteRunner::new(HarnessConfig::load()?);
    let scenarios: Vec<Scenario> = Scenario::all()
        .into_iter()
        .filter(|s| s.group() == ScenarioGroup::Delete)
        .collect();

    let results = runner.run_shared_group(&scenarios).await;

    for result in &results {
        assert!(
            result.success,
            "{} failed: {}",
            result.scenario,
            result.error.as_deref().unwrap_or_default()
        );
        assert!(
            result.teardown_failures.is_empty(),
            "teardown failed: {:?}",
            result.teardown_failures
        );
    }
    Ok(())
}
