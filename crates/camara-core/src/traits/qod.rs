// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Quality-on-demand adapter trait.

use async_trait::async_trait;

use crate::error::BridgeError;
use crate::traits::adapter::BackendAdapter;
use crate::types::{Capability, CreateSession, Session};

/// Adapter for quality-on-demand session lifecycle.
#[async_trait]
pub trait QodAdapter: BackendAdapter {
    /// The capability gating this adapter's QoD operations.
    fn qod_capability(&self) -> Capability {
        Capability::Qod
    }

    /// Creates a session. The returned session is in status REQUESTED.
    async fn create_session(&self, request: &CreateSession) -> Result<Session, BridgeError>;

    /// Fetches a session from the backend.
    ///
    /// `original` is the creation request when the caller still holds it; it
    /// fills in fields the backend does not echo back.
    async fn get_session(
        &self,
        session_id: &str,
        original: Option<&CreateSession>,
    ) -> Result<Session, BridgeError>;

    /// Removes a session from the backend.
    async fn delete_session(&self, session_id: &str) -> Result<(), BridgeError>;
}
