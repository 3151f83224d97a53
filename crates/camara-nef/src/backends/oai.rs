// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAirInterface NEF.

use camara_core::types::{BackendAdapterConfig, Capability, CreateSession, TrafficInfluence};
use camara_core::{BridgeError, CapabilitySet};

use crate::flows::host_filter;
use crate::schemas::{AsSessionWithQosSubscription, FlowInfo, Snssai, TrafficInfluSub};
use crate::strategy::{
    BackendStrategy, NefSettings, ProfileTable, QodContext, TrafficInfluenceContext,
};

pub const NAME: &str = "oai";

const PROFILES: ProfileTable = ProfileTable(&[
    ("qos-e", 1),
    ("qos-s", 1),
    ("qos-m", 1),
    ("qos-l", 1),
]);

const DEFAULT_DNN: &str = "oai";

fn default_snssai() -> Snssai {
    Snssai {
        sst: 1,
        sd: Some("FFFFFF".to_string()),
    }
}

#[derive(Debug, Clone)]
pub struct OaiStrategy {
    settings: NefSettings,
    capabilities: CapabilitySet,
    dnn: String,
}

impl OaiStrategy {
    pub fn new(config: &BackendAdapterConfig) -> Result<Self, BridgeError> {
        Ok(Self {
            settings: NefSettings::from_config(config)?,
            capabilities: CapabilitySet::new([Capability::Qod, Capability::TrafficInfluence]),
            dnn: config.extra_or("dnn", DEFAULT_DNN),
        })
    }
}

impl BackendStrategy for OaiStrategy {
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
        let mut reasons = Vec::new();
        if request.device.as_ref().and_then(|d| d.public_ipv4()).is_none() {
            reasons.push("device.ipv4Address.publicAddress is required".to_string());
        }
        if request.application_server.ipv4_address.as_deref().unwrap_or_default().is_empty() {
            reasons.push("applicationServer.ipv4Address is required".to_string());
        }
        if PROFILES.get(&request.qos_profile).is_none() {
            reasons.push(format!(
                "unsupported qosProfile `{}`, supported: {}",
                request.qos_profile,
                PROFILES.names().join(", ")
            ));
        }
        if reasons.is_empty() {
            Ok(())
        } else {
            Err(BridgeError::Validation {
                backend: NAME.to_string(),
                reasons,
            })
        }
    }

    fn enrich(
        &self,
        subscription: &mut AsSessionWithQosSubscription,
        ctx: &QodContext<'_>,
    ) -> Result<(), BridgeError> {
        // The UPF matches on the UE's private address when one is known.
        let ue = ctx
            .request
            .device
            .as_ref()
            .and_then(|d| d.private_ipv4())
            .unwrap_or(ctx.device_address);
        subscription.flow_info = Some(vec![FlowInfo {
            flow_id: ctx.profile_id,
            flow_descriptions: vec![host_filter(Some("out"), ue, ctx.server_address)],
        }]);
        subscription.snssai = Some(default_snssai());
        subscription.dnn = Some(self.dnn.clone());
        Ok(())
    }

    fn enrich_traffic_influence(
        &self,
        subscription: &mut TrafficInfluSub,
        _ctx: &TrafficInfluenceContext<'_>,
    ) -> Result<(), BridgeError> {
        subscription.dnn = Some(self.dnn.clone());
        subscription.snssai = Some(default_snssai());
        subscription.af_service_id = Some(self.settings.endpoints.service_id().to_string());
        Ok(())
    }

    fn validate_traffic_influence(&self, request: &TrafficInfluence) -> Result<(), BridgeError> {
        if request.app_instance_id.trim().is_empty() {
            return Err(BridgeError::validation(NAME, "appInstanceId is required"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::SubscriptionBuilder;
    use camara_core::types::{ApplicationServer, Device, DeviceIpv4Addr};

    fn strategy() -> OaiStrategy {
        OaiStrategy::new(&BackendAdapterConfig::new("http://oai-nef", "af-oai")).unwrap()
    }

    #[test]
    fn qod_uses_private_address_and_slice() {
        let request = CreateSession {
            device: Some(Device {
                ipv4_address: Some(DeviceIpv4Addr {
                    public_address: Some("84.1.1.1".into()),
                    private_address: Some("12.1.0.7".into()),
                    public_port: None,
                }),
                ..Default::default()
            }),
            application_server: ApplicationServer::ipv4("10.0.0.1"),
            qos_profile: "qos-s".into(),
            duration: 60,
            ..Default::default()
        };
        let sub = SubscriptionBuilder::new(&strategy()).qod(&request).unwrap();
        assert_eq!(
            sub.first_flow_description(),
            Some("permit out ip from 12.1.0.7/32 to 10.0.0.1/32")
        );
        assert_eq!(sub.dnn.as_deref(), Some("oai"));
        assert_eq!(sub.snssai, Some(Snssai { sst: 1, sd: Some("FFFFFF".into()) }));
    }

    #[test]
    fn qod_collects_every_reason() {
        let request = CreateSession {
            device: Some(Device {
                phone_number: Some("+34600000001".into()),
                ..Default::default()
            }),
            qos_profile: "qos-z".into(),
            duration: 60,
            ..Default::default()
        };
        match strategy().validate(&request).unwrap_err() {
            BridgeError::Validation { reasons, .. } => assert_eq!(reasons.len(), 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn traffic_influence_carries_service_id() {
        let request = TrafficInfluence {
            app_id: "app".into(),
            app_instance_id: "10.10.0.5".into(),
            device: Some(Device::from_ipv4("12.1.0.2")),
            ..Default::default()
        };
        let sub = SubscriptionBuilder::new(&strategy())
            .traffic_influence(&request)
            .unwrap();
        assert_eq!(sub.af_service_id.as_deref(), Some("af-oai"));
        assert_eq!(sub.dnn.as_deref(), Some("oai"));
        assert_eq!(
            sub.traffic_filters[0].flow_descriptions[0],
            "permit out ip from 12.1.0.2/32 to 10.10.0.5/32"
        );
    }
}
