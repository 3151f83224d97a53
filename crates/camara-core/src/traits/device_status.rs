// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Device status adapter trait.

use async_trait::async_trait;

use crate::error::BridgeError;
use crate::traits::adapter::BackendAdapter;
use crate::types::{ReachabilityStatus, RoamingStatus, UeLookup, UeProfile};

/// Subscriber state read from a core's UE identity service.
#[async_trait]
pub trait DeviceStatusAdapter: BackendAdapter {
    /// Fails with [`BridgeError::NotFound`] when no service knows the UE.
    async fn ue_profile(&self, lookup: &UeLookup) -> Result<UeProfile, BridgeError>;

    /// An unknown UE is reported as `NOT_CONNECTED` rather than an error.
    async fn reachability_status(&self, ip: &str) -> Result<ReachabilityStatus, BridgeError>;

    /// Compares the serving PLMN with the configured home PLMN. An unknown UE
    /// or a profile without a serving PLMN is not roaming.
    async fn roaming_status(&self, ip: &str) -> Result<RoamingStatus, BridgeError>;
}
