//! HTTP transport with typed error translation
//!
//! [`HttpTransport`] is the single place where raw `reqwest` failures are
//! turned into the crate's error taxonomy: connection-level problems
//! become [`StoreError::Network`], error responses from the store become
//! [`StoreError::StoreServer`] with the status and drained body attached.
//! Successful (2xx) and redirect responses pass through untouched.
//!
//! The transport deliberately carries no retry or timeout layer of its
//! own; both are left to `reqwest` and to callers.

use std::sync::Arc;

use reqwest::header::HeaderMap;
use reqwest::{Method, Response};

use crate::error::{Result, StoreError};

// ---------------------------------------------------------------------------
// HttpTransport
// ---------------------------------------------------------------------------

/// Thin wrapper around a shared [`reqwest::Client`].
///
/// The underlying client is built once with the configured `User-Agent`
/// and shared (via [`Arc`]) with any collaborator that needs to reach the
/// network, such as the discharge acquirer.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Arc<reqwest::Client>,
}

impl HttpTransport {
    /// Creates a transport with a fresh HTTP client.
    ///
    /// # Arguments
    ///
    /// * `user_agent` - `User-Agent` header value sent with every request.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if the underlying client cannot be
    /// constructed (e.g. TLS backend initialization failure).
    pub fn new(user_agent: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| StoreError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http: Arc::new(http),
        })
    }

    /// Creates a transport around an existing shared client.
    ///
    /// Useful when the caller already owns a configured client and wants
    /// connection pooling shared across components.
    pub fn with_client(http: Arc<reqwest::Client>) -> Self {
        Self { http }
    }

    /// The shared HTTP client.
    ///
    /// Collaborators such as the discharge acquirer reuse this client so
    /// all outbound traffic carries the same configuration.
    pub fn client(&self) -> Arc<reqwest::Client> {
        Arc::clone(&self.http)
    }

    /// Performs an HTTP request and translates failures.
    ///
    /// # Arguments
    ///
    /// * `method` - HTTP method.
    /// * `url` - Absolute URL to request.
    /// * `params` - Optional query parameters.
    /// * `headers` - Optional headers, passed through unchanged.
    /// * `body` - Optional JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Network`] when the request cannot be sent or
    /// the connection fails mid-flight, and [`StoreError::StoreServer`]
    /// for any non-2xx/non-redirect response (the body is drained into the
    /// error for diagnostics).
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        params: Option<&[(String, String)]>,
        headers: Option<HeaderMap>,
        body: Option<&serde_json::Value>,
    ) -> Result<Response> {
        let mut builder = self.http.request(method.clone(), url);

        if let Some(params) = params {
            builder = builder.query(params);
        }
        if let Some(headers) = headers {
            builder = builder.headers(headers);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        tracing::debug!(%method, url, "sending store request");

        let response = builder
            .send()
            .await
            .map_err(|e| StoreError::Network(format!("{method} {url} failed: {e}")))?;

        let status = response.status();
        if status.is_success() || status.is_redirection() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), "store returned error response");
        Err(StoreError::StoreServer {
            status: status.as_u16(),
            body,
        }
        .into())
    }
}
