// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Traffic-influence adapter trait.

use async_trait::async_trait;

use crate::error::BridgeError;
use crate::traits::adapter::BackendAdapter;
use crate::types::TrafficInfluence;

/// Adapter steering device traffic towards an edge application instance.
#[async_trait]
pub trait TrafficInfluenceAdapter: BackendAdapter {
    /// Creates the resource and returns the request carrying the backend-assigned id.
    async fn create_traffic_influence(
        &self,
        request: &TrafficInfluence,
    ) -> Result<TrafficInfluence, BridgeError>;

    /// Replaces the resource `id` with `request`.
    async fn update_traffic_influence(
        &self,
        id: &str,
        request: &TrafficInfluence,
    ) -> Result<TrafficInfluence, BridgeError>;

    async fn get_traffic_influence(&self, id: &str) -> Result<TrafficInfluence, BridgeError>;

    async fn list_traffic_influence(&self) -> Result<Vec<TrafficInfluence>, BridgeError>;

    async fn delete_traffic_influence(&self, id: &str) -> Result<(), BridgeError>;
}
