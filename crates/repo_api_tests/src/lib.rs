//! Scenarios for the GitHub repository REST API.
//!
//! The suite creates, reads, edits and deletes repositories for the
//! configured account and checks status codes and response bodies. Every
//! repository a scenario creates is deleted again when the scenario, or the
//! delete group, finishes.
//!
//! [`mock_github::FakeGitHub`] answers the same endpoints in-process so the
//! suite can be exercised without credentials.

pub mod mock_github;
pub mod report;
pub mod runner;
pub mod scenarios;

pub use report::{DEFAULT_REPORT_PATH, render_report, write_report};
pub use runner::{SuiteRunner, TestResult};
pub use scenarios::{Scenario, ScenarioGroup};
