// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Open5GCore NEF.
//!
//! Profile names are matched case-insensitively. Some lab deployments route
//! every UE through one address; set the `ue_ipv4_override` extra to put that
//! address in `ueIpv4Addr` while the flow descriptors keep the real device.

use camara_core::types::{BackendAdapterConfig, Capability, CreateSession};
use camara_core::{BridgeError, CapabilitySet};

use crate::flows::{pack_flow, synthesize_filters};
use crate::schemas::AsSessionWithQosSubscription;
use crate::strategy::{BackendStrategy, NefSettings, ProfileTable, QodContext};

pub const NAME: &str = "open5gcore";

const PROFILES: ProfileTable = ProfileTable(&[
    ("qos-e", 1),
    ("qos-s", 5),
    ("qos-m", 9),
    ("qos-l", 9),
]);

#[derive(Debug, Clone)]
pub struct Open5gcoreStrategy {
    settings: NefSettings,
    capabilities: CapabilitySet,
    ue_ipv4_override: Option<String>,
}

impl Open5gcoreStrategy {
    pub fn new(config: &BackendAdapterConfig) -> Result<Self, BridgeError> {
        if config.base_url.trim().is_empty() {
            return Err(BridgeError::Config(format!("{NAME}: base_url is required")));
        }
        if config.service_id.trim().is_empty() {
            return Err(BridgeError::Config(format!("{NAME}: service_id is required")));
        }
        Ok(Self {
            settings: NefSettings::from_config(config)?,
            capabilities: CapabilitySet::new([Capability::Qod]),
            ue_ipv4_override: config.extra("ue_ipv4_override").map(str::to_string),
        })
    }
}

fn normalize(profile: &str) -> String {
    profile.trim().to_lowercase()
}

impl BackendStrategy for Open5gcoreStrategy {
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
        PROFILES.get(&normalize(profile))
    }

    fn validate(&self, request: &CreateSession) -> Result<(), BridgeError> {
        PROFILES
            .check(NAME, &normalize(&request.qos_profile))
            .map(|_| ())
    }

    fn enrich(
        &self,
        subscription: &mut AsSessionWithQosSubscription,
        ctx: &QodContext<'_>,
    ) -> Result<(), BridgeError> {
        let lines = synthesize_filters(
            ctx.device_address,
            ctx.request.device_ports.as_ref(),
            ctx.server_address,
            ctx.request.application_server_ports.as_ref(),
        );
        subscription.flow_info = Some(vec![pack_flow(ctx.profile_id, &lines)]);
        if let Some(ue) = &self.ue_ipv4_override {
            subscription.ue_ipv4_addr = Some(ue.clone());
        }
        Ok(())
    }
}
