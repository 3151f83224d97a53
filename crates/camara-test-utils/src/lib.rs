// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for CAMARA bridge integration tests.
//!
//! # Components
//!
//! - [`RecordingTransport`] - Scripted backend transport that records every request
//! - [`fixtures`] - Canonical requests used across the test suites

pub mod fixtures;
pub mod recording_transport;

pub use recording_transport::{RecordedRequest, RecordingTransport};
