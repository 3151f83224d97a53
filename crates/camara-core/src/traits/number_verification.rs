// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Number verification adapter trait.

use async_trait::async_trait;

use crate::error::BridgeError;
use crate::traits::adapter::BackendAdapter;
use crate::types::{DevicePhoneNumber, NumberVerification, NumberVerificationRequest};

#[async_trait]
pub trait NumberVerificationAdapter: BackendAdapter {
    /// The MSISDN the network allocated to the UE holding `ip`.
    async fn device_phone_number(&self, ip: &str) -> Result<DevicePhoneNumber, BridgeError>;

    /// Whether the claimed number, plain or hashed, is the one behind `ip`.
    async fn verify_phone_number(
        &self,
        ip: &str,
        request: &NumberVerificationRequest,
    ) -> Result<NumberVerification, BridgeError>;
}
