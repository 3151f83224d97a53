// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP transport seam between adapters and backends.

use async_trait::async_trait;
use serde_json::Value;
use strum::{Display, EnumString};

use crate::error::BridgeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// Sends JSON requests to a backend exposure endpoint.
///
/// Implementations apply a fixed per-call timeout and never retry. Non-2xx
/// responses surface as [`BridgeError::BackendHttp`], connection failures as
/// [`BridgeError::BackendUnreachable`]. A successful response with an empty
/// body yields `Ok(None)`.
#[async_trait]
pub trait BackendTransport: Send + Sync + 'static {
    async fn send(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<&Value>,
    ) -> Result<Option<Value>, BridgeError>;

    async fn post(&self, url: &str, body: &Value) -> Result<Option<Value>, BridgeError> {
        self.send(HttpMethod::Post, url, Some(body)).await
    }

    async fn get(&self, url: &str) -> Result<Option<Value>, BridgeError> {
        self.send(HttpMethod::Get, url, None).await
    }

    async fn put(&self, url: &str, body: &Value) -> Result<Option<Value>, BridgeError> {
        self.send(HttpMethod::Put, url, Some(body)).await
    }

    async fn delete(&self, url: &str) -> Result<Option<Value>, BridgeError> {
        self.send(HttpMethod::Delete, url, None).await
    }
}
