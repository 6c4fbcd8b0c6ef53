//! HTTP client for the API under test.

use std::time::Instant;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use secrecy::ExposeSecret;
use tracing::{debug, instrument};
use url::Url;

use crate::{errors::HarnessError, request::ApiRequest, response::ApiResponse};

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;

/// `User-Agent` sent with every request; GitHub rejects requests without one.
pub const USER_AGENT: &str = concat!("github-repo-api-tests/", env!("CARGO_PKG_VERSION"));

/// REST API version pinned for every request.
pub const API_VERSION: &str = "2022-11-28";

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "x-github-api-version";

/// Sends [`ApiRequest`]s relative to a base URL.
///
/// The client holds no per-test state. It is cheap to clone and is passed
/// explicitly to every scenario.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Creates a client for `base_url` with the GitHub default headers.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::ClientBuild` if the TLS backend cannot be
    /// initialised.
    pub fn new(base_url: Url) -> Result<Self, HarnessError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_MEDIA_TYPE));
        headers.insert(
            HeaderName::from_static(API_VERSION_HEADER),
            HeaderValue::from_static(API_VERSION),
        );

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(HarnessError::ClientBuild)?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sends `request` and captures the full response.
    ///
    /// Any HTTP status is a successful send; only transport failures and
    /// invalid requests are errors.
    #[instrument(skip(self, request), fields(method = %request.method(), path = request.path_template()))]
    pub async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, HarnessError> {
        let url = request.resolve_url(&self.base_url)?;
        let mut builder = self.http.request(request.method().clone(), url.clone());

        let mut has_content_type = false;
        for (name, value) in request.headers() {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| HarnessError::InvalidHeader(name.clone()))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| HarnessError::InvalidHeader(name.clone()))?;
            has_content_type |= header_name == CONTENT_TYPE;
            builder = builder.header(header_name, header_value);
        }

        if let Some(token) = request.bearer() {
            builder = builder.bearer_auth(token.expose_secret());
        }

        if let Some(body) = request.body_text() {
            if !has_content_type {
                builder = builder.header(CONTENT_TYPE, "application/json");
            }
            builder = builder.body(body.to_string());
        }

        let transport_error = |source| HarnessError::Transport {
            method: request.method().to_string(),
            url: url.to_string(),
            source,
        };

        let started = Instant::now();
        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        let headers = response.headers().clone();
        let raw_body = response.text().await.map_err(transport_error)?;

        debug!(
            url = %url,
            status = status.as_u16(),
            authenticated = request.bearer().is_some(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Received response"
        );

        Ok(ApiResponse::new(status, headers, raw_body))
    }
}
