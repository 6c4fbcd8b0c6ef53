//! Captured API responses.

use reqwest::{StatusCode, header::HeaderMap};
use serde_json::Value;

use crate::{errors::HarnessError, json_path::JsonPath};

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;

/// Status, headers and body of a completed request.
///
/// The body is parsed as JSON when possible. Empty bodies (such as `204 No
/// Content`) and non-JSON bodies leave `body` as `None`; `raw_body` always
/// holds the text as received.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub raw_body: String,
    pub body: Option<Value>,
}

impl ApiResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, raw_body: String) -> Self {
        let body = if raw_body.trim().is_empty() {
            None
        } else {
            serde_json::from_str(&raw_body).ok()
        };

        Self {
            status,
            headers,
            raw_body,
            body,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Resolves `path` against the JSON body.
    ///
    /// Returns `Ok(None)` when the body is not JSON or the path is absent.
    pub fn json(&self, path: &str) -> Result<Option<Value>, HarnessError> {
        let path = JsonPath::parse(path)?;
        Ok(self.body.as_ref().and_then(|body| path.resolve(body)))
    }

    /// Returns the string at `path`, if there is one.
    pub fn json_string(&self, path: &str) -> Result<Option<String>, HarnessError> {
        Ok(self
            .json(path)?
            .and_then(|value| value.as_str().map(str::to_string)))
    }
}
