//! Suite runner.
//!
//! Create, get and edit scenarios each run in a fresh [`TestContext`] that is
//! torn down when the scenario finishes. The delete group shares one context:
//! its setup creates the repository the group deletes, and the group teardown
//! removes whatever is still recorded once every scenario in the group has
//! run.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::Error;
use api_harness::{HarnessConfig, TeardownFailure, TeardownReport, TestContext, run_with_teardown};
use tracing::{error, info, warn};

use crate::scenarios::{Scenario, ScenarioGroup, delete};

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;

/// Outcome of one scenario.
#[derive(Debug, Clone)]
pub struct TestResult {
    pub scenario: Scenario,
    pub success: bool,
    pub duration: Duration,
    pub error: Option<String>,
    /// Repositories the scenario's teardown failed to delete. For the delete
    /// group these belong to the group teardown and are attached to the last
    /// result of the group.
    pub teardown_failures: Vec<TeardownFailure>,
}

impl TestResult {
    fn new(scenario: Scenario, duration: Duration, outcome: Result<(), Error>) -> Self {
        let error = outcome.err().map(|e| format!("{e:#}"));
        Self {
            scenario,
            success: error.is_none(),
            duration,
            error,
            teardown_failures: Vec::new(),
        }
    }

    fn failed(scenario: Scenario, error: String) -> Self {
        Self {
            scenario,
            success: false,
            duration: Duration::ZERO,
            error: Some(error),
            teardown_failures: Vec::new(),
        }
    }
}

/// Runs scenarios against the configured API.
#[derive(Debug, Clone)]
pub struct SuiteRunner {
    config: Arc<HarnessConfig>,
}

impl SuiteRunner {
    pub fn new(config: HarnessConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Runs every scenario whose name contains `filter`, in execution order.
    pub async fn run_all(&self, filter: Option<&str>) -> Vec<TestResult> {
        let selected: Vec<Scenario> = Scenario::all()
            .into_iter()
            .filter(|scenario| filter.is_none_or(|f| scenario.name().contains(f)))
            .collect();

        info!(
            scenarios = selected.len(),
            filter = filter.unwrap_or(""),
            "Running repository API scenarios"
        );

        let (shared, isolated): (Vec<Scenario>, Vec<Scenario>) = selected
            .into_iter()
            .partition(|scenario| scenario.group().shares_context());

        let mut results = Vec::new();
        for scenario in isolated {
            results.push(self.run_isolated(scenario).await);
        }
        if !shared.is_empty() {
            results.extend(self.run_shared_group(&shared).await);
        }
        results
    }

    /// Runs one scenario in its own context with per-test teardown.
    pub async fn run_isolated(&self, scenario: Scenario) -> TestResult {
        let ctx = match TestContext::from_config(Arc::clone(&self.config)) {
            Ok(ctx) => ctx,
            Err(e) => return TestResult::failed(scenario, e.to_string()),
        };

        let started = Instant::now();
        let (outcome, report) = run_with_teardown(&ctx, scenario.run(&ctx)).await;
        let mut result = TestResult::new(scenario, started.elapsed(), outcome);
        result.teardown_failures = report.failures;

        log_result(&result);
        result
    }

    /// Runs the scenarios of a shared-context group.
    ///
    /// Group setup runs first. If it fails every scenario in the group fails
    /// with the setup error, and the group teardown still runs.
    pub async fn run_shared_group(&self, scenarios: &[Scenario]) -> Vec<TestResult> {
        let ctx = match TestContext::from_config(Arc::clone(&self.config)) {
            Ok(ctx) => ctx,
            Err(e) => {
                return scenarios
                    .iter()
                    .map(|s| TestResult::failed(*s, e.to_string()))
                    .collect();
            }
        };

        let body = async {
            if let Err(e) = setup_group(scenarios, &ctx).await {
                error!(error = %format!("{e:#}"), "Group setup failed");
                let reason = format!("group setup failed: {e:#}");
                return scenarios
                    .iter()
                    .map(|s| TestResult::failed(*s, reason.clone()))
                    .collect::<Vec<_>>();
            }

            let mut results = Vec::with_capacity(scenarios.len());
            for scenario in scenarios {
                let started = Instant::now();
                let outcome = scenario.run(&ctx).await;
                let result = TestResult::new(*scenario, started.elapsed(), outcome);
                log_result(&result);
                results.push(result);
            }
            results
        };

        let (mut results, report) = run_with_teardown(&ctx, body).await;
        attach_group_teardown(&mut results, report);
        results
    }
}

async fn setup_group(scenarios: &[Scenario], ctx: &TestContext) -> anyhow::Result<()> {
    if scenarios
        .iter()
        .any(|scenario| scenario.group() == ScenarioGroup::Delete)
    {
        delete::setup(ctx).await?;
    }
    Ok(())
}

fn attach_group_teardown(results: &mut [TestResult], report: TeardownReport) {
    if report.is_clean() {
        return;
    }
    warn!(
        failures = report.failures.len(),
        "Group teardown left repositories behind"
    );
    if let Some(last) = results.last_mut() {
        last.teardown_failures.extend(report.failures);
    }
}

fn log_result(result: &TestResult) {
    let duration_ms = result.duration.as_millis();
    match &result.error {
        None => info!(scenario = %result.scenario, duration_ms, "PASS"),
        Some(error) => error!(scenario = %result.scenario, duration_ms, error = %error, "FAIL"),
    }
}
