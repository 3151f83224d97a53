// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter registry and service facade for the CAMARA bridge.
//!
//! The [`AdapterRegistry`] maps each adapter domain to the active backend
//! adapter. Backends are built by name through [`factory::resolve`] and can be
//! replaced at runtime with [`AdapterRegistry::switch`]. [`BridgeService`]
//! sits on top of the registry and keeps the lifecycle of the sessions and
//! traffic-influence resources created through it.

pub mod catalog;
pub mod factory;
pub mod locks;
pub mod registry;
pub mod service;

pub use catalog::{BackendDescriptor, builtin_catalog, describe};
pub use factory::{activate, resolve};
pub use locks::{ResourceGuard, ResourceLocks};
pub use registry::AdapterRegistry;
pub use service::BridgeService;
