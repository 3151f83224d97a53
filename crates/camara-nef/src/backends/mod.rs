// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Strategies for the supported core network backends.

pub mod coresim;
pub mod oai;
pub mod open5gcore;
pub mod open5gs;

pub use coresim::CoreSimStrategy;
pub use oai::OaiStrategy;
pub use open5gcore::Open5gcoreStrategy;
pub use open5gs::Open5gsStrategy;
