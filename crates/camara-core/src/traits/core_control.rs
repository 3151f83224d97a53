// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Simulator operations and maintenance trait.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::BridgeError;
use crate::traits::adapter::BackendAdapter;

/// Control surface of a simulated core network.
#[async_trait]
pub trait CoreControlAdapter: BackendAdapter {
    async fn simulation_status(&self) -> Result<Value, BridgeError>;

    /// Starts the simulation. A running simulation is left alone.
    async fn start_simulation(&self) -> Result<Value, BridgeError>;

    async fn stop_simulation(&self) -> Result<Value, BridgeError>;

    async fn configure_simulation(&self, config: &Value) -> Result<Value, BridgeError>;
}
