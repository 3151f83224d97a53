// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! 5G core simulator.
//!
//! The simulator only routes UEs allocated from its IPAM subnet, so device
//! addresses outside that subnet are swapped for a fallback UE address. It
//! also exposes an OAM API for starting, stopping and configuring the
//! simulation.
//!
//! Recognized extras:
//!
//! | key | default |
//! |---|---|
//! | `ipam_subnet` | `12.1.0.0/16` |
//! | `fallback_ue_ip` | `12.1.0.1` |
//! | `dnn` | `internet` |
//! | `default_dnai` | `DNAI1` |
//! | `qod_base_url`, `ti_base_url`, `location_base_url` | `base_url` |
//! | `oam_base_url` | `base_url` host on `oam_port` |
//! | `oam_port` | `8081` |
//! | `ue_identity_base_url` | `base_url` host on `ue_identity_port` |
//! | `ue_identity_port` | `8103` |
//! | `ue_profile_base_url` | unset |
//! | `home_mcc`, `home_mnc` | `001`, `06` |

use camara_core::identity::AddressPolicy;
use camara_core::types::{
    BackendAdapterConfig, Capability, CreateSession, LocationRetrievalRequest, Plmn,
    TrafficInfluence,
};
use camara_core::{BridgeError, CapabilitySet};
use tracing::warn;

use crate::flows::{host_filter, pack_flow, synthesize_filters};
use crate::schemas::{
    AsSessionWithQosSubscription, FlowInfo, MonitoringEventSubscription, RouteToLocation,
    TrafficInfluSub,
};
use crate::strategy::{
    BackendStrategy, MONITORING_TYPE_LOCATION, NefSettings, ProfileTable, QodContext,
    TrafficInfluenceContext, msisdn_of,
};
use crate::subscriber::UeIdentityEndpoints;

pub const NAME: &str = "coresim";

const PROFILES: ProfileTable = ProfileTable(&[
    ("qos-e", 1),
    ("qos-s", 1),
    ("qos-m", 1),
    ("qos-l", 1),
]);

const SUPPORTED_FEATURES: &str = "0C";
const DEFAULT_SUBNET: &str = "12.1.0.0/16";
const DEFAULT_FALLBACK_UE: &str = "12.1.0.1";
const DEFAULT_DNN: &str = "internet";
const DEFAULT_DNAI: &str = "DNAI1";
const DEFAULT_OAM_PORT: u16 = 8081;
const DEFAULT_UE_IDENTITY_PORT: u16 = 8103;
const DEFAULT_HOME_MCC: &str = "001";
const DEFAULT_HOME_MNC: &str = "06";

#[derive(Debug, Clone)]
pub struct CoreSimStrategy {
    settings: NefSettings,
    capabilities: CapabilitySet,
    policy: AddressPolicy,
    dnn: String,
    default_dnai: String,
    oam_base: String,
    ue_identity: UeIdentityEndpoints,
}

impl CoreSimStrategy {
    pub fn new(config: &BackendAdapterConfig) -> Result<Self, BridgeError> {
        let mut settings = NefSettings::from_config(config)?;
        if let Some(base) = config.extra("qod_base_url") {
            settings.endpoints = settings.endpoints.with_qod_base(base);
        }
        if let Some(base) = config.extra("ti_base_url") {
            settings.endpoints = settings.endpoints.with_ti_base(base);
        }
        if let Some(base) = config.extra("location_base_url") {
            settings.endpoints = settings.endpoints.with_location_base(base);
        }

        let policy = AddressPolicy::new(
            config.extra("ipam_subnet").unwrap_or(DEFAULT_SUBNET),
            config.extra("fallback_ue_ip").unwrap_or(DEFAULT_FALLBACK_UE),
        )?;

        let oam_base = service_base(config, "oam_base_url", "oam_port", DEFAULT_OAM_PORT)?;

        let home = Plmn::new(
            config.extra_or("home_mcc", DEFAULT_HOME_MCC),
            config.extra_or("home_mnc", DEFAULT_HOME_MNC),
        );
        let identity_base = service_base(
            config,
            "ue_identity_base_url",
            "ue_identity_port",
            DEFAULT_UE_IDENTITY_PORT,
        )?;
        let mut ue_identity = UeIdentityEndpoints::new(&identity_base, home);
        if let Some(base) = config.extra("ue_profile_base_url") {
            ue_identity = ue_identity.with_profile_base(base);
        }

        Ok(Self {
            settings,
            capabilities: CapabilitySet::new([
                Capability::Qod,
                Capability::LocationRetrieval,
                Capability::TrafficInfluence,
                Capability::CoreControl,
                Capability::DeviceStatus,
                Capability::NumberVerification,
            ]),
            policy,
            dnn: config.extra_or("dnn", DEFAULT_DNN),
            default_dnai: config.extra_or("default_dnai", DEFAULT_DNAI),
            oam_base,
            ue_identity,
        })
    }
}

/// An explicit `url_key` base, or the adapter host on the `port_key` port.
fn service_base(
    config: &BackendAdapterConfig,
    url_key: &str,
    port_key: &str,
    default_port: u16,
) -> Result<String, BridgeError> {
    if let Some(base) = config.extra(url_key) {
        return Ok(base.trim_end_matches('/').to_string());
    }
    let port = match config.extra(port_key) {
        Some(raw) => raw.parse::<u16>().map_err(|_| {
            BridgeError::Config(format!("{NAME}: {port_key} `{raw}` is not a port number"))
        })?,
        None => default_port,
    };
    Ok(with_port(config.base(), port))
}

/// `scheme://host:port` for `url`, dropping any existing port and path.
fn with_port(url: &str, port: u16) -> String {
    let (scheme, rest) = url.split_once("://").unwrap_or(("http", url));
    let authority = rest.split('/').next().unwrap_or(rest);
    let host = match authority.rsplit_once(':') {
        Some((host, p)) if !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()) => host,
        _ => authority,
    };
    format!("{scheme}://{host}:{port}")
}

impl BackendStrategy for CoreSimStrategy {
    fn name(&self) -> &str {
        NAME
    }

    fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    fn settings(&self) -> &NefSettings {
        &self.settings
    }

    fn address_policy(&self) -> Option<&AddressPolicy> {
        Some(&self.policy)
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
        let lines = synthesize_filters(
            ctx.device_address,
            ctx.request.device_ports.as_ref(),
            ctx.server_address,
            ctx.request.application_server_ports.as_ref(),
        );
        subscription.flow_info = Some(vec![pack_flow(ctx.profile_id, &lines)]);
        subscription.dnn = Some(self.dnn.clone());
        subscription.supported_features = Some(SUPPORTED_FEATURES.to_string());
        // The simulator rejects subscriptions carrying a usage threshold.
        subscription.usage_threshold = None;
        Ok(())
    }

    fn validate_traffic_influence(&self, request: &TrafficInfluence) -> Result<(), BridgeError> {
        let mut reasons = Vec::new();
        if request.app_id.trim().is_empty() {
            reasons.push("appId is required".to_string());
        }
        if request.app_instance_id.trim().is_empty() {
            reasons.push("appInstanceId is required".to_string());
        }
        if request.device.as_ref().and_then(|d| d.public_ipv4()).is_none() {
            reasons.push("device.ipv4Address.publicAddress is required".to_string());
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

    fn enrich_traffic_influence(
        &self,
        subscription: &mut TrafficInfluSub,
        ctx: &TrafficInfluenceContext<'_>,
    ) -> Result<(), BridgeError> {
        subscription.dnn = Some(self.dnn.clone());
        subscription.traffic_filters = vec![FlowInfo {
            flow_id: 1,
            flow_descriptions: vec![host_filter(
                None,
                ctx.device_address,
                &ctx.request.app_instance_id,
            )],
        }];
        if subscription.traffic_routes.is_empty() {
            warn!(
                default_dnai = %self.default_dnai,
                "no edgeCloudZoneId given, routing to default DNAI"
            );
            subscription.traffic_routes = vec![RouteToLocation {
                dnai: self.default_dnai.clone(),
            }];
        }
        Ok(())
    }

    fn validate_location(&self, request: &LocationRetrievalRequest) -> Result<(), BridgeError> {
        let identified = request.device.as_ref().is_some_and(|d| {
            d.phone_number.as_deref().is_some_and(|p| !p.is_empty())
                || d.network_access_identifier.as_deref().is_some_and(|n| !n.is_empty())
        });
        if identified {
            Ok(())
        } else {
            Err(BridgeError::validation(
                NAME,
                "location retrieval needs device.phoneNumber or device.networkAccessIdentifier",
            ))
        }
    }

    fn location_subscription(
        &self,
        request: &LocationRetrievalRequest,
    ) -> MonitoringEventSubscription {
        MonitoringEventSubscription {
            msisdn: msisdn_of(request),
            external_id: request
                .device
                .as_ref()
                .and_then(|d| d.network_access_identifier.clone()),
            notification_destination: self.settings.location_notification_url.clone(),
            monitoring_type: MONITORING_TYPE_LOCATION.to_string(),
            ..MonitoringEventSubscription::default()
        }
    }

    fn oam_base(&self) -> Option<&str> {
        Some(&self.oam_base)
    }

    fn ue_identity(&self) -> Option<&UeIdentityEndpoints> {
        Some(&self.ue_identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::SubscriptionBuilder;
    use camara_core::types::{ApplicationServer, Device, PortsSpec};

    fn strategy() -> CoreSimStrategy {
        CoreSimStrategy::new(&BackendAdapterConfig::new("http://coresim:8080/", "nef")).unwrap()
    }

    #[test]
    fn oam_base_swaps_port() {
        assert_eq!(strategy().oam_base(), Some("http://coresim:8081"));
        assert_eq!(with_port("http://coresim", 9000), "http://coresim:9000");
        assert_eq!(with_port("https://[::1]:8080/api", 8081), "https://[::1]:8081");
    }

    #[test]
    fn oam_base_honors_extras() {
        let config =
            BackendAdapterConfig::new("http://coresim:8080", "nef").with_extra("oam_port", "9191");
        assert_eq!(
            CoreSimStrategy::new(&config).unwrap().oam_base(),
            Some("http://coresim:9191")
        );
        let config = BackendAdapterConfig::new("http://coresim:8080", "nef")
            .with_extra("oam_base_url", "http://oam.local:7000/");
        assert_eq!(
            CoreSimStrategy::new(&config).unwrap().oam_base(),
            Some("http://oam.local:7000")
        );
        let config =
            BackendAdapterConfig::new("http://coresim:8080", "nef").with_extra("oam_port", "http");
        assert!(CoreSimStrategy::new(&config).is_err());
    }

    #[test]
    fn ue_identity_defaults_to_port_8103() {
        let strategy = strategy();
        let ids = strategy.ue_identity().unwrap();
        assert_eq!(ids.msisdn_by_ip("12.1.0.2"), "http://coresim:8103/msisdn?ip=12.1.0.2");
        assert_eq!(ids.home(), &Plmn::new("001", "06"));
        assert!(ids.stored_profile("001010000000001").is_none());
    }

    #[test]
    fn ue_identity_honors_extras() {
        let config = BackendAdapterConfig::new("http://coresim:8080", "nef")
            .with_extra("ue_identity_base_url", "http://ue-identity:9000/")
            .with_extra("ue_profile_base_url", "http://ue-profile:8080")
            .with_extra("home_mcc", "208")
            .with_extra("home_mnc", "93");
        let strategy = CoreSimStrategy::new(&config).unwrap();
        let ids = strategy.ue_identity().unwrap();
        assert_eq!(
            ids.supi_by_ip("12.1.0.2"),
            "http://ue-identity:9000/ue-identity/v1/supi?ip=12.1.0.2"
        );
        assert!(ids.stored_profile("1").unwrap().starts_with("http://ue-profile:8080/"));
        assert_eq!(ids.home(), &Plmn::new("208", "93"));

        let config = BackendAdapterConfig::new("http://coresim:8080", "nef")
            .with_extra("ue_identity_port", "identity");
        assert!(CoreSimStrategy::new(&config).is_err());
    }

    #[test]
    fn per_api_base_urls() {
        let config = BackendAdapterConfig::new("http://coresim:8080", "nef")
            .with_extra("qod_base_url", "http://localhost:8100");
        let strategy = CoreSimStrategy::new(&config).unwrap();
        assert_eq!(
            strategy.endpoints().qod_subscriptions(),
            "http://localhost:8100/3gpp-as-session-with-qos/v1/nef/subscriptions"
        );
        assert_eq!(
            strategy.endpoints().ti_subscriptions(),
            "http://coresim:8080/3gpp-traffic-influence/v1/nef/subscriptions"
        );
    }

    #[test]
    fn qod_joins_filters_without_threshold() {
        let request = CreateSession {
            device: Some(Device::from_ipv4("12.1.0.2")),
            application_server: ApplicationServer::ipv4("10.0.0.1"),
            device_ports: Some(PortsSpec::ports([5000, 5001])),
            qos_profile: "qos-l".into(),
            duration: 60,
            ..Default::default()
        };
        let sub = SubscriptionBuilder::new(&strategy()).qod(&request).unwrap();
        let flows = sub.flow_info.unwrap();
        assert_eq!(flows[0].flow_id, 1);
        assert_eq!(flows[0].flow_descriptions.len(), 1);
        let filters: Vec<&str> = flows[0].flow_descriptions[0].split(", ").collect();
        assert_eq!(filters.len(), 4);
        assert_eq!(filters[0], "permit in ip from 12.1.0.2 5000 to 10.0.0.1 0-65535");
        assert!(sub.usage_threshold.is_none());
        assert_eq!(sub.dnn.as_deref(), Some("internet"));
        assert_eq!(sub.supported_features.as_deref(), Some("0C"));
    }

    #[test]
    fn traffic_influence_defaults_dnai() {
        let request = TrafficInfluence {
            app_id: "app".into(),
            app_instance_id: "10.10.0.5".into(),
            device: Some(Device::from_ipv4("12.1.0.2")),
            ..Default::default()
        };
        let sub = SubscriptionBuilder::new(&strategy())
            .traffic_influence(&request)
            .unwrap();
        assert_eq!(sub.traffic_routes, vec![RouteToLocation { dnai: "DNAI1".into() }]);
        assert_eq!(
            sub.traffic_filters[0].flow_descriptions,
            vec!["permit ip 12.1.0.2/32 to 10.10.0.5/32"]
        );
    }

    #[test]
    fn traffic_influence_requires_ids_and_ipv4() {
        match strategy()
            .validate_traffic_influence(&TrafficInfluence::default())
            .unwrap_err()
        {
            BridgeError::Validation { reasons, .. } => assert_eq!(reasons.len(), 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn location_skeleton_has_no_location_type() {
        let request = LocationRetrievalRequest {
            device: Some(Device {
                network_access_identifier: Some("ue1@coresim".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let strategy = strategy();
        strategy.validate_location(&request).unwrap();
        let sub = SubscriptionBuilder::new(&strategy).location(&request).unwrap();
        assert_eq!(sub.external_id.as_deref(), Some("ue1@coresim"));
        assert!(sub.msisdn.is_none());
        assert!(sub.location_type.is_none());
    }

    #[test]
    fn location_without_phone_or_nai_is_rejected() {
        let request = LocationRetrievalRequest {
            device: Some(Device::from_ipv4("12.1.0.2")),
            ..Default::default()
        };
        assert!(strategy().validate_location(&request).is_err());
    }
}
