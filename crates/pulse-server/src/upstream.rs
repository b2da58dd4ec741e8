//! HTTP client for the upstream post-listing service.
//!
//! The proxy endpoint is a single-attempt pass-through: one `GET
//! {base_url}/post/list/?platform=<code>` per inbound request, bounded
//! by the configured timeout, with no retries. Any failure is reported
//! as an [`UpstreamError`] and surfaced to the caller as a 500.

use std::time::Duration;

use axum::body::Bytes;
use axum::http::StatusCode;
use pulse_core::UpstreamConfig;
use tracing::debug;

/// Errors raised while contacting or reading the upstream service.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// The HTTP client could not be constructed.
    #[error("failed to build upstream client: {0}")]
    Client(reqwest::Error),

    /// The request did not complete within the configured timeout.
    #[error("upstream request timed out after {timeout_ms}ms: {source}")]
    Timeout {
        /// The configured timeout in milliseconds.
        timeout_ms: u128,
        /// The underlying client error.
        source: reqwest::Error,
    },

    /// Connection refused, DNS failure, or another transport error.
    #[error("upstream request failed: {0}")]
    Request(reqwest::Error),

    /// The upstream answered with a non-success status.
    #[error("upstream returned {status}: {body}")]
    Status {
        /// The upstream status code.
        status: StatusCode,
        /// The upstream response body, as text.
        body: String,
    },

    /// The upstream body was not valid JSON.
    #[error("upstream response was not valid JSON: {0}")]
    Decode(serde_json::Error),
}

/// A successful upstream reply, relayed verbatim.
///
/// `body` holds the bytes exactly as the upstream sent them. It has been
/// checked to parse as JSON but is never re-encoded, so key order and
/// number formatting survive the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    /// The upstream's success status.
    pub status: StatusCode,
    /// The upstream's JSON body.
    pub body: Bytes,
}

/// Pooled client bound to one upstream base URL.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl UpstreamClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::Client`] if the TLS backend cannot be
    /// initialized.
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let timeout = config.timeout();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(UpstreamError::Client)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            timeout,
        })
    }

    /// The configured base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of the upstream listing endpoint.
    pub fn list_url(&self) -> String {
        format!("{}/post/list/", self.base_url)
    }

    /// Fetch the post list for `platform` from the upstream service.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] on timeout, transport failure, a
    /// non-success status, or a body that is not JSON.
    pub async fn fetch_posts(&self, platform: &str) -> Result<UpstreamResponse, UpstreamError> {
        let url = self.list_url();

        let response = self
            .client
            .get(&url)
            .query(&[("platform", platform)])
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(UpstreamError::Status { status, body });
        }

        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        ensure_json(&body)?;
        debug!(platform, %status, bytes = body.len(), "Upstream response");

        Ok(UpstreamResponse { status, body })
    }

    fn classify(&self, error: reqwest::Error) -> UpstreamError {
        if error.is_timeout() {
            UpstreamError::Timeout {
                timeout_ms: self.timeout.as_millis(),
                source: error,
            }
        } else {
            UpstreamError::Request(error)
        }
    }
}

/// Check that `body` is one well-formed JSON document without building it.
fn ensure_json(body: &[u8]) -> Result<(), UpstreamError> {
    serde_json::from_slice::<serde::de::IgnoredAny>(body).map_err(UpstreamError::Decode)?;
    Ok(())
}
