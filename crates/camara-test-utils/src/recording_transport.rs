// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted backend transport for deterministic testing.
//!
//! `RecordingTransport` implements `BackendTransport` by popping pre-configured
//! outcomes from a FIFO queue and recording each request it was asked to send,
//! so tests can assert both what went out and how many calls were made.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use camara_core::{BackendTransport, BridgeError, HttpMethod};

/// One request seen by the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: HttpMethod,
    pub url: String,
    pub body: Option<Value>,
}

type Outcome = Result<Option<Value>, BridgeError>;

/// A transport that answers from a queue and records requests.
///
/// When the queue is empty every call succeeds with an empty body.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    outcomes: Arc<Mutex<VecDeque<Outcome>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful JSON response.
    pub async fn respond_json(&self, body: Value) {
        self.outcomes.lock().await.push_back(Ok(Some(body)));
    }

    /// Queue a successful response without a body.
    pub async fn respond_empty(&self) {
        self.outcomes.lock().await.push_back(Ok(None));
    }

    /// Queue a failure.
    pub async fn respond_err(&self, error: BridgeError) {
        self.outcomes.lock().await.push_back(Err(error));
    }

    /// Queue a non-2xx backend answer.
    pub async fn respond_status(&self, status: u16, body: &str) {
        self.respond_err(BridgeError::BackendHttp {
            status,
            message: None,
            body: body.to_string(),
        })
        .await;
    }

    /// Every request seen so far, in order.
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    /// The most recent request, if any.
    pub async fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.lock().await.last().cloned()
    }
}

#[async_trait]
impl BackendTransport for RecordingTransport {
    async fn send(&self, method: HttpMethod, url: &str, body: Option<&Value>) -> Outcome {
        tracing::debug!(%method, url, "recording transport call");
        self.requests.lock().await.push(RecordedRequest {
            method,
            url: url.to_string(),
            body: body.cloned(),
        });
        self.outcomes.lock().await.pop_front().unwrap_or(Ok(None))
    }
}
