// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Device location retrieval adapter trait.

use async_trait::async_trait;

use crate::error::BridgeError;
use crate::traits::adapter::BackendAdapter;
use crate::types::{Location, LocationRetrievalRequest};

#[async_trait]
pub trait LocationAdapter: BackendAdapter {
    /// Retrieves the last known location of the device.
    ///
    /// Callers must check [`Location::precision`](crate::types::Location) to
    /// tell reported coordinates from a synthesized placeholder area.
    async fn retrieve_location(
        &self,
        request: &LocationRetrievalRequest,
    ) -> Result<Location, BridgeError>;
}
