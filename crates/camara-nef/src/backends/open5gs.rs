// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Open5GS NEF.

use camara_core::types::{BackendAdapterConfig, Capability, CreateSession, LocationRetrievalRequest};
use camara_core::{BridgeError, CapabilitySet};

use crate::flows::{pack_flow, synthesize_filters};
use crate::schemas::AsSessionWithQosSubscription;
use crate::strategy::{BackendStrategy, NefSettings, ProfileTable, QodContext};

pub const NAME: &str = "open5gs";

/// QoS profile to flow id.
const PROFILES: ProfileTable = ProfileTable(&[
    ("qos-e", 3),
    ("qos-s", 4),
    ("qos-m", 5),
    ("qos-l", 6),
]);

const SUPPORTED_FEATURES: &str = "003C";

#[derive(Debug, Clone)]
pub struct Open5gsStrategy {
    settings: NefSettings,
    capabilities: CapabilitySet,
}

impl Open5gsStrategy {
    pub fn new(config: &BackendAdapterConfig) -> Result<Self, BridgeError> {
        Ok(Self {
            settings: NefSettings::from_config(config)?,
            capabilities: CapabilitySet::new([Capability::Qod, Capability::LocationRetrieval]),
        })
    }
}

impl BackendStrategy for Open5gsStrategy {
    fn name(&self) -> &str {
        NAME
    }

    fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    fn settings(&self) -> &NefSettings {
        &self.settings
    }

    fn map_profile(&self, profile: &str) -> Option<u32> {
        PROFILES.get(profile)
    }

    fn validate(&self, request: &CreateSession) -> Result<(), BridgeError> {
        PROFILES.check(NAME, &request.qos_profile).map(|_| ())
    }

    fn enrich(
        &self,
        subscription: &mut AsSessionWithQosSubscription,
        ctx: &QodContext<'_>,
    ) -> Result<(), BridgeError> {
        subscription.supported_features = Some(SUPPORTED_FEATURES.to_string());
        let lines = synthesize_filters(
            ctx.device_address,
            ctx.request.device_ports.as_ref(),
            ctx.server_address,
            ctx.request.application_server_ports.as_ref(),
        );
        subscription.flow_info = Some(vec![pack_flow(ctx.profile_id, &lines)]);
        Ok(())
    }

    fn validate_location(&self, request: &LocationRetrievalRequest) -> Result<(), BridgeError> {
        match request.device.as_ref().and_then(|d| d.phone_number.as_deref()) {
            Some(phone) if !phone.is_empty() => Ok(()),
            _ => Err(BridgeError::validation(
                NAME,
                "location retrieval needs device.phoneNumber",
            )),
        }
    }
}
