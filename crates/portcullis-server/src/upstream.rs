//! Server-side client for the upstream provisioning API.
//!
//! The API key is read from configuration once at startup and lives only
//! in this process: it is attached to outbound requests on this trusted
//! hop and never appears in a response body, a log line, or a `Debug`
//! rendering. Browser-facing code reaches the upstream API exclusively
//! through the `/api/` routes that delegate here.

use std::time::Duration;

use axum::http::{Method, StatusCode};
use serde_json::Value;

/// Request timeout for upstream calls.
const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from upstream calls.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// The HTTP client could not be built or the request failed.
    #[error("upstream request failed: {0}")]
    Network(#[from] reqwest::Error),
}

/// Authenticated client for the provisioning API.
pub struct UpstreamClient {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl UpstreamClient {
    /// Build a client for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::Network`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .user_agent(concat!("portcullis/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key,
            client,
        })
    }

    /// Forward a request to the provisioning API, attaching the
    /// server-held key as a bearer authorization header.
    ///
    /// Returns the upstream status and JSON body unchanged so the proxy
    /// routes can pass both through. A non-JSON upstream body maps to
    /// `null`.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::Network`] if the upstream cannot be
    /// reached or times out.
    pub async fn forward(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value), UpstreamError> {
        let url = format!("{}{}", self.base_url, path);

        let mut request = self.client.request(method, &url);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.json::<Value>().await.unwrap_or(Value::Null);

        Ok((status, body))
    }
}

impl std::fmt::Debug for UpstreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        let client = UpstreamClient::new("https://api.example.com/", None).unwrap();
        assert_eq!(client.base_url, "https://api.example.com");
    }

    #[test]
    fn debug_does_not_leak_the_key() {
        let client =
            UpstreamClient::new("https://api.example.com", Some("sk-live-abc".to_owned())).unwrap();
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("sk-live-abc"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
