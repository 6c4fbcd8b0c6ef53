//! Request construction.
//!
//! An [`ApiRequest`] is a method, a path template with `{name}` placeholders,
//! optional query parameters, headers, bearer token and a literal JSON body.
//! Bodies are sent exactly as given: scenarios hand-build their JSON so that
//! malformed payloads remain a valid input.

use std::collections::HashSet;

use reqwest::Method;
use secrecy::SecretString;
use url::Url;

use crate::errors::HarnessError;

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;

/// `GET` lists, `POST` creates repositories for the authenticated user.
pub const USER_REPOS: &str = "/user/repos";

/// `GET`, `PATCH` and `DELETE` a single repository.
pub const REPO: &str = "/repos/{owner}/{repo}";

/// A request ready to be sent by [`crate::ApiClient`].
#[derive(Debug)]
pub struct ApiRequest {
    method: Method,
    path_template: String,
    path_params: Vec<(String, String)>,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    bearer_token: Option<SecretString>,
    body: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path_template: impl Into<String>) -> Self {
        Self {
            method,
            path_template: path_template.into(),
            path_params: Vec::new(),
            query: Vec::new(),
            headers: Vec::new(),
            bearer_token: None,
            body: None,
        }
    }

    pub fn get(path_template: impl Into<String>) -> Self {
        Self::new(Method::GET, path_template)
    }

    pub fn post(path_template: impl Into<String>) -> Self {
        Self::new(Method::POST, path_template)
    }

    pub fn patch(path_template: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path_template)
    }

    pub fn delete(path_template: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path_template)
    }

    /// Binds a value to the `{name}` placeholder.
    ///
    /// Values are percent-encoded as a single path segment when the URL is
    /// built, so a `/` in a value cannot change the route.
    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.push((name.into(), value.into()));
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sends `Authorization: Bearer <token>`.
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(SecretString::from(token.into()));
        self
    }

    /// Sends the token when one is given; `None` sends no `Authorization`
    /// header at all.
    pub fn maybe_bearer_token(self, token: Option<&str>) -> Self {
        match token {
            Some(token) => self.bearer_token(token),
            None => self,
        }
    }

    /// Sets the literal JSON text of the body.
    pub fn body(mut self, json: impl Into<String>) -> Self {
        self.body = Some(json.into());
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path_template(&self) -> &str {
        &self.path_template
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn bearer(&self) -> Option<&SecretString> {
        self.bearer_token.as_ref()
    }

    pub fn body_text(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Substitutes path parameters into the template.
    ///
    /// # Errors
    ///
    /// - `MalformedPathTemplate` for unbalanced braces
    /// - `UnresolvedPlaceholder` for a placeholder without a value
    /// - `UnusedPathParameter` for a value the template never references
    pub fn resolve_path(&self) -> Result<String, HarnessError> {
        let segments = self.resolve_segments()?;
        Ok(format!("/{}", segments.join("/")))
    }

    /// Builds the full URL under `base_url`, keeping any path prefix the base
    /// carries (for example `/api/v3` on GitHub Enterprise).
    pub fn resolve_url(&self, base_url: &Url) -> Result<Url, HarnessError> {
        let segments = self.resolve_segments()?;
        let mut url = base_url.clone();

        {
            let mut path = url.path_segments_mut().map_err(|_| {
                HarnessError::MalformedPathTemplate(format!(
                    "base URL {base_url} cannot carry a path"
                ))
            })?;
            path.pop_if_empty();
            path.extend(segments.iter());
        }

        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in &self.query {
                pairs.append_pair(name, value);
            }
        }

        Ok(url)
    }

    fn resolve_segments(&self) -> Result<Vec<String>, HarnessError> {
        let mut used = HashSet::new();
        let mut segments = Vec::new();

        for raw_segment in self.path_template.split('/').filter(|s| !s.is_empty()) {
            segments.push(self.substitute(raw_segment, &mut used)?);
        }

        if let Some((name, _)) = self
            .path_params
            .iter()
            .find(|(name, _)| !used.contains(name.as_str()))
        {
            return Err(HarnessError::UnusedPathParameter {
                template: self.path_template.clone(),
                parameter: name.clone(),
            });
        }

        Ok(segments)
    }

    fn substitute<'a>(
        &'a self,
        segment: &str,
        used: &mut HashSet<&'a str>,
    ) -> Result<String, HarnessError> {
        let mut resolved = String::with_capacity(segment.len());
        let mut rest = segment;

        while let Some(open) = rest.find(['{', '}']) {
            if rest.as_bytes()[open] == b'}' {
                return Err(HarnessError::MalformedPathTemplate(
                    self.path_template.clone(),
                ));
            }

            resolved.push_str(&rest[..open]);
            let after_open = &rest[open + 1..];
            let close = after_open.find('}').ok_or_else(|| {
                HarnessError::MalformedPathTemplate(self.path_template.clone())
            })?;
            let placeholder = &after_open[..close];
            if placeholder.is_empty() || placeholder.contains('{') {
                return Err(HarnessError::MalformedPathTemplate(
                    self.path_template.clone(),
                ));
            }

            let (name, value) = self
                .path_params
                .iter()
                .find(|(name, _)| name == placeholder)
                .ok_or_else(|| HarnessError::UnresolvedPlaceholder {
                    template: self.path_template.clone(),
                    placeholder: placeholder.to_string(),
                })?;
            used.insert(name.as_str());
            resolved.push_str(value);

            rest = &after_open[close + 1..];
        }

        resolved.push_str(rest);
        Ok(resolved)
    }
}
