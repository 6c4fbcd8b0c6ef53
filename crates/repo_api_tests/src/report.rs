//! Markdown report for CI systems.

use std::{fmt::Write as _, fs, path::Path};

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::info;

use crate::{runner::TestResult, scenarios::ScenarioGroup};

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;

/// Default report file name.
pub const DEFAULT_REPORT_PATH: &str = "api-test-report.md";

/// Renders the results as a Markdown report.
pub fn render_report(results: &[TestResult]) -> Result<String> {
    let mut report = String::new();

    let passed = results.iter().filter(|r| r.success).count();
    let failed = results.len() - passed;
    let teardown_failures: usize = results.iter().map(|r| r.teardown_failures.len()).sum();
    let total_duration: f64 = results.iter().map(|r| r.duration.as_secs_f64()).sum();

    writeln!(report, "# GitHub Repository API Test Report")?;
    writeln!(report)?;
    writeln!(
        report,
        "Generated: {}",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    writeln!(report)?;

    writeln!(report, "## Summary")?;
    writeln!(report)?;
    writeln!(report, "| Metric | Value |")?;
    writeln!(report, "|--------|-------|")?;
    writeln!(report, "| Total Tests | {} |", results.len())?;
    writeln!(report, "| Passed | {passed} |")?;
    writeln!(report, "| Failed | {failed} |")?;
    writeln!(report, "| Teardown Failures | {teardown_failures} |")?;
    writeln!(report, "| Total Duration | {total_duration:.2}s |")?;
    writeln!(report)?;

    for group in [
        ScenarioGroup::Create,
        ScenarioGroup::Get,
        ScenarioGroup::Edit,
        ScenarioGroup::Delete,
    ] {
        let in_group: Vec<&TestResult> = results
            .iter()
            .filter(|r| r.scenario.group() == group)
            .collect();
        if in_group.is_empty() {
            continue;
        }

        writeln!(report, "## {}", group.title())?;
        writeln!(report)?;
        for result in in_group {
            let status_emoji = if result.success { "✅" } else { "❌" };
            writeln!(report, "### {status_emoji} {}", result.scenario)?;
            writeln!(report)?;
            writeln!(
                report,
                "- **Status**: {}",
                if result.success { "PASSED" } else { "FAILED" }
            )?;
            writeln!(
                report,
                "- **Duration**: {:.2}s",
                result.duration.as_secs_f64()
            )?;
            if let Some(error) = &result.error {
                writeln!(report, "- **Error**:")?;
                writeln!(report)?;
                writeln!(report, "```text")?;
                writeln!(report, "{error}")?;
                writeln!(report, "```")?;
            }
            for failure in &result.teardown_failures {
                writeln!(
                    report,
                    "- **Teardown**: failed to delete `{}`: {}",
                    failure.repo, failure.reason
                )?;
            }
            writeln!(report)?;
        }
    }

    Ok(report)
}

/// Writes the report to `path`.
pub fn write_report(path: &Path, results: &[TestResult]) -> Result<()> {
    let report = render_report(results)?;
    fs::write(path, report)
        .with_context(|| format!("Failed to write test report to {}", path.display()))?;

    info!(path = %path.display(), "Test report written");
    Ok(())
}
