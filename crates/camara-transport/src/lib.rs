// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! reqwest implementation of [`camara_core::BackendTransport`].

pub mod client;

pub use client::{DEFAULT_TIMEOUT, HttpTransport};
