// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base adapter trait that every backend adapter implements.

use async_trait::async_trait;

use crate::capability::CapabilitySet;
use crate::error::BridgeError;
use crate::traits::core_control::CoreControlAdapter;
use crate::traits::device_status::DeviceStatusAdapter;
use crate::traits::location::LocationAdapter;
use crate::traits::number_verification::NumberVerificationAdapter;
use crate::traits::qod::QodAdapter;
use crate::traits::traffic_influence::TrafficInfluenceAdapter;
use crate::types::{AdapterDomain, HealthStatus};

/// The base trait for all backend adapters.
///
/// Operation families are exposed through typed accessors instead of runtime
/// probing: an adapter that does not implement traffic influence simply
/// returns `None` from [`BackendAdapter::as_traffic_influence`].
#[async_trait]
pub trait BackendAdapter: Send + Sync + 'static {
    /// Returns the backend name this adapter was registered under.
    fn name(&self) -> &str;

    /// Returns the semantic version of this adapter.
    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    /// Returns the adapter family (network core or O-RAN).
    fn domain(&self) -> AdapterDomain;

    /// Returns the statically declared capabilities.
    fn capabilities(&self) -> &CapabilitySet;

    fn as_qod(&self) -> Option<&dyn QodAdapter> {
        None
    }

    fn as_traffic_influence(&self) -> Option<&dyn TrafficInfluenceAdapter> {
        None
    }

    fn as_location(&self) -> Option<&dyn LocationAdapter> {
        None
    }

    fn as_core_control(&self) -> Option<&dyn CoreControlAdapter> {
        None
    }

    fn as_device_status(&self) -> Option<&dyn DeviceStatusAdapter> {
        None
    }

    fn as_number_verification(&self) -> Option<&dyn NumberVerificationAdapter> {
        None
    }

    /// Performs a health check and returns the backend's current status.
    async fn health_check(&self) -> Result<HealthStatus, BridgeError>;

    /// Gracefully shuts down the adapter, stopping any background work.
    async fn shutdown(&self) -> Result<(), BridgeError>;
}
