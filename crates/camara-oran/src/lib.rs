// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! O-RAN near-RT RIC adapter.
//!
//! Turns CAMARA QoD sessions into RIC policies scoped to the cell serving the
//! device. The device-IP to cell mapping is held in an atomically swapped
//! table that a cancellable background loop can reload from disk.

pub mod client;
pub mod mapping;
pub mod refresh;
pub mod schemas;

pub use client::OranClient;
pub use mapping::{CellScope, IpScopeMap};
pub use refresh::{RefreshHandle, Refreshable, spawn_refresh};
