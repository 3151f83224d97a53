// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for backend exposure APIs.
//!
//! Provides [`HttpTransport`], which sends JSON requests with a fixed
//! per-call timeout and normalizes status and connection failures into
//! [`BridgeError`] variants. It never retries.

use std::time::Duration;

use async_trait::async_trait;
use camara_core::{BackendTransport, BridgeError, HttpMethod};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Default per-call timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Structured error body returned by NEF and RIC implementations.
#[derive(Debug, Deserialize)]
struct BackendErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    detail: Option<Value>,
}

impl BackendErrorBody {
    fn summary(self) -> Option<String> {
        match (self.message, self.detail) {
            (Some(message), _) if !message.is_empty() => Some(message),
            (_, Some(Value::String(detail))) => Some(detail),
            (_, Some(Value::Null)) | (_, None) => None,
            (_, Some(detail)) => Some(detail.to_string()),
        }
    }
}

/// JSON-over-HTTP transport backed by a shared reqwest connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpTransport {
    /// Creates a transport whose every call is bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, BridgeError> {
        let mut headers = HeaderMap::new();
        headers.insert("accept", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| BridgeError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn unreachable(&self, url: &str, err: &reqwest::Error) -> BridgeError {
        let reason = if err.is_timeout() {
            format!("no response within {:?}", self.timeout)
        } else if err.is_connect() {
            format!("connection failed: {err}")
        } else {
            err.to_string()
        };
        BridgeError::BackendUnreachable {
            url: url.to_string(),
            reason,
        }
    }
}

fn to_reqwest(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl BackendTransport for HttpTransport {
    async fn send(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<&Value>,
    ) -> Result<Option<Value>, BridgeError> {
        let mut request = self.client.request(to_reqwest(method), url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_builder() {
                BridgeError::Config(format!("invalid backend URL `{url}`: {e}"))
            } else {
                self.unreachable(url, &e)
            }
        })?;

        let status = response.status();
        debug!(%method, url, status = %status, "backend response received");

        let text = response
            .text()
            .await
            .map_err(|e| self.unreachable(url, &e))?;

        if !status.is_success() {
            warn!(%method, url, status = status.as_u16(), "backend returned error status");
            let message = serde_json::from_str::<BackendErrorBody>(&text)
                .ok()
                .and_then(BackendErrorBody::summary);
            return Err(BridgeError::BackendHttp {
                status: status.as_u16(),
                message,
                body: text,
            });
        }

        if text.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| BridgeError::MalformedBackendResponse {
                detail: format!("{method} {url} returned invalid JSON: {e}"),
            })
    }
}
