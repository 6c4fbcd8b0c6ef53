//! Declarative response assertions.
//!
//! An [`Expectations`] value holds one expected status code and an ordered
//! list of `(path, matcher)` pairs. [`Expectations::verify`] checks the status
//! first and then each body expectation in order, returning the first
//! mismatch with the actual and expected values at that path.
//!
//! ```
//! use api_harness::{Expectations, Matcher};
//!
//! let expectations = Expectations::status(401)
//!     .body("message", Matcher::equal_to("Bad credentials"))
//!     .body("documentation_url", Matcher::contains("https://docs.github.com/"));
//! # let _ = expectations;
//! ```

use serde_json::Value;
use tracing::debug;

use crate::{errors::AssertionError, json_path::JsonPath, response::ApiResponse};

#[cfg(test)]
#[path = "assertions_tests.rs"]
mod tests;

const MAX_REPORTED_BODY: usize = 500;

/// A check applied to the value found at a JSON path.
#[derive(Debug, Clone, PartialEq)]
pub enum Matcher {
    /// The value equals the given JSON value.
    Equals(Value),
    /// A string value contains the text, or an array has a string element
    /// equal to it.
    Contains(String),
    /// The path exists and is not JSON `null`.
    NotNull,
    /// The value is a number strictly greater than the bound.
    GreaterThan(f64),
}

impl Matcher {
    pub fn equal_to(expected: impl Into<Value>) -> Self {
        Matcher::Equals(expected.into())
    }

    pub fn contains(expected: impl Into<String>) -> Self {
        Matcher::Contains(expected.into())
    }

    pub fn not_null() -> Self {
        Matcher::NotNull
    }

    pub fn greater_than(bound: impl Into<f64>) -> Self {
        Matcher::GreaterThan(bound.into())
    }

    pub fn matches(&self, actual: &Value) -> bool {
        match self {
            Matcher::Equals(expected) => actual == expected,
            Matcher::Contains(needle) => match actual {
                Value::String(text) => text.contains(needle.as_str()),
                Value::Array(items) => items
                    .iter()
                    .any(|item| item.as_str() == Some(needle.as_str())),
                _ => false,
            },
            Matcher::NotNull => !actual.is_null(),
            Matcher::GreaterThan(bound) => actual.as_f64().is_some_and(|n| n > *bound),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Matcher::Equals(expected) => format!("equal to {expected}"),
            Matcher::Contains(needle) => format!("containing {needle:?}"),
            Matcher::NotNull => "not null".to_string(),
            Matcher::GreaterThan(bound) => format!("greater than {bound}"),
        }
    }
}

/// The expected status and body of a response.
#[derive(Debug, Clone)]
pub struct Expectations {
    status: u16,
    body: Vec<(String, Matcher)>,
}

impl Expectations {
    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: Vec::new(),
        }
    }

    pub fn body(mut self, path: impl Into<String>, matcher: Matcher) -> Self {
        self.body.push((path.into(), matcher));
        self
    }

    pub fn expected_status(&self) -> u16 {
        self.status
    }

    /// Checks `response` against every expectation, in order.
    ///
    /// # Errors
    ///
    /// Returns the first failing expectation as an [`AssertionError`].
    pub fn verify(&self, response: &ApiResponse) -> Result<(), AssertionError> {
        if response.status_code() != self.status {
            return Err(AssertionError::Status {
                expected: self.status,
                actual: response.status_code(),
                body: truncate(&response.raw_body),
            });
        }

        for (raw_path, matcher) in &self.body {
            let path = JsonPath::parse(raw_path)?;
            let body = response
                .body
                .as_ref()
                .ok_or_else(|| AssertionError::BodyNotJson {
                    path: raw_path.clone(),
                    raw: truncate(&response.raw_body),
                })?;

            let actual = path.resolve(body).ok_or_else(|| AssertionError::Missing {
                path: raw_path.clone(),
                expected: matcher.describe(),
            })?;

            if !matcher.matches(&actual) {
                return Err(AssertionError::Mismatch {
                    path: raw_path.clone(),
                    expected: matcher.describe(),
                    actual: actual.to_string(),
                });
            }

            debug!(path = %path, expected = %matcher.describe(), "Body expectation met");
        }

        Ok(())
    }
}

fn truncate(raw: &str) -> String {
    if raw.chars().count() <= MAX_REPORTED_BODY {
        return raw.to_string();
    }
    let mut truncated: String = raw.chars().take(MAX_REPORTED_BODY).collect();
    truncated.push_str("...");
    truncated
}
