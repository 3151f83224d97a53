// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! All operation-family traits extend [`BackendAdapter`] and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod core_control;
pub mod device_status;
pub mod location;
pub mod number_verification;
pub mod qod;
pub mod traffic_influence;
pub mod transport;

pub use adapter::BackendAdapter;
pub use core_control::CoreControlAdapter;
pub use device_status::DeviceStatusAdapter;
pub use location::LocationAdapter;
pub use number_verification::NumberVerificationAdapter;
pub use qod::QodAdapter;
pub use traffic_influence::TrafficInfluenceAdapter;
pub use transport::{BackendTransport, HttpMethod};
