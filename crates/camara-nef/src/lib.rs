// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! NEF-family translation engine for the CAMARA bridge.
//!
//! Translates canonical CAMARA requests into 3GPP northbound subscriptions
//! (AsSessionWithQoS, TrafficInfluence, MonitoringEvent) and maps backend
//! responses back. Backend differences live in [`BackendStrategy`]
//! implementations under [`backends`]; [`NefClient`] drives any of them over a
//! [`camara_core::BackendTransport`].

pub mod backends;
pub mod builder;
pub mod client;
pub mod flows;
pub mod schemas;
pub mod strategy;
pub mod subscriber;
pub mod translate;

pub use backends::{CoreSimStrategy, OaiStrategy, Open5gcoreStrategy, Open5gsStrategy};
pub use builder::SubscriptionBuilder;
pub use client::NefClient;
pub use strategy::{BackendStrategy, NefEndpoints, NefSettings, QodContext};
pub use subscriber::UeIdentityEndpoints;
pub use translate::PlaceholderArea;
