// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the CAMARA bridge.
//!
//! This crate provides the canonical CAMARA model, the error taxonomy, the
//! capability gate, device identity resolution and the adapter traits that
//! every backend (NEF-style cores and O-RAN RICs) implements.

pub mod capability;
pub mod error;
pub mod identity;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use capability::{CapabilitySet, require_capability, supports};
pub use error::BridgeError;
pub use identity::{AddressKind, AddressPolicy, ResolvedAddress};
pub use types::{AdapterDomain, BackendAdapterConfig, Capability, HealthStatus};

pub use traits::{
    BackendAdapter, BackendTransport, CoreControlAdapter, DeviceStatusAdapter, HttpMethod,
    LocationAdapter, NumberVerificationAdapter, QodAdapter, TrafficInfluenceAdapter,
};
