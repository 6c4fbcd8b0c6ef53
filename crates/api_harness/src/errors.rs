//! Error types for the API test harness.
//!
//! Three layers are kept apart: configuration problems that must abort the
//! suite before any request is sent, harness problems (bad path templates,
//! transport failures, malformed JSON paths), and assertion failures, which
//! are the expected way for a scenario to fail.

use std::path::PathBuf;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors raised while loading or validating the suite configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    /// The configuration file exists but could not be read.
    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The properties text is malformed, e.g. a bad `\uXXXX` escape.
    #[error("Invalid configuration properties: {message}")]
    Parse {
        line: Option<usize>,
        message: String,
    },

    /// A required key is absent or empty.
    #[error("Required configuration key {0} is not set")]
    MissingKey(String),

    /// `BASE_URL` is not an absolute http(s) URL.
    #[error("BASE_URL is not a valid http(s) URL: {0}")]
    InvalidBaseUrl(String),
}

/// Errors raised by the harness itself rather than by the API under test.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// The path template still contains a `{placeholder}` after substitution.
    #[error("Path template {template} has no value for placeholder {{{placeholder}}}")]
    UnresolvedPlaceholder {
        template: String,
        placeholder: String,
    },

    /// A path parameter was supplied that the template never references.
    #[error("Path template {template} does not use parameter {parameter}")]
    UnusedPathParameter { template: String, parameter: String },

    /// The path template has unbalanced braces.
    #[error("Malformed path template: {0}")]
    MalformedPathTemplate(String),

    /// The base URL and path could not be joined into a valid URL.
    #[error("Invalid request URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A header name or value was rejected by the HTTP client.
    #[error("Invalid header {0}")]
    InvalidHeader(String),

    /// The underlying HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// The request never produced a response.
    #[error("Request {method} {url} failed: {source}")]
    Transport {
        method: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// A JSON path expression could not be parsed.
    #[error("Malformed JSON path {path}: {reason}")]
    MalformedJsonPath { path: String, reason: String },
}

/// A response did not meet an expectation.
#[derive(Debug, thiserror::Error)]
pub enum AssertionError {
    /// The status code differs from the expected one.
    #[error("Expected status {expected} but got {actual}. Body: {body}")]
    Status {
        expected: u16,
        actual: u16,
        body: String,
    },

    /// The value at `path` does not satisfy the matcher.
    #[error("Body path {path}: expected {expected} but was {actual}")]
    Mismatch {
        path: String,
        expected: String,
        actual: String,
    },

    /// Nothing exists at `path`.
    #[error("Body path {path}: expected {expected} but the path is absent")]
    Missing { path: String, expected: String },

    /// A body assertion was made against a response that is not JSON.
    #[error("Body path {path}: response body is not JSON: {raw}")]
    BodyNotJson { path: String, raw: String },

    /// The expectation itself names an unparseable path.
    #[error(transparent)]
    InvalidPath(#[from] HarnessError),
}
