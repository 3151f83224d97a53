// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend strategy trait and the settings every NEF-style backend shares.
//!
//! A strategy supplies the backend-specific pieces of the subscription
//! builder: profile mapping, validation and enrichment hooks. The builder owns
//! the order in which they run.

use camara_core::identity::AddressPolicy;
use camara_core::types::{
    BackendAdapterConfig, CreateSession, LocationRetrievalRequest, TrafficInfluence,
};
use camara_core::{BridgeError, CapabilitySet};

use crate::schemas::{AsSessionWithQosSubscription, MonitoringEventSubscription, TrafficInfluSub};
use crate::subscriber::UeIdentityEndpoints;
use crate::translate::PlaceholderArea;

/// Where location reports are delivered when the backend does not override it.
pub const DEFAULT_LOCATION_NOTIFICATION_URL: &str = "http://127.0.0.1:8001";

pub const MONITORING_TYPE_LOCATION: &str = "LOCATION_REPORTING";

pub const LOCATION_TYPE_LAST_KNOWN: &str = "LAST_KNOWN_LOCATION";

/// Exposure API URLs of one backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NefEndpoints {
    qod_base: String,
    ti_base: String,
    location_base: String,
    service_id: String,
}

impl NefEndpoints {
    /// All three APIs served from the same base URL.
    pub fn new(base_url: &str, service_id: &str) -> Self {
        let base = base_url.trim_end_matches('/').to_string();
        Self {
            qod_base: base.clone(),
            ti_base: base.clone(),
            location_base: base,
            service_id: service_id.to_string(),
        }
    }

    pub fn with_qod_base(mut self, base: &str) -> Self {
        self.qod_base = base.trim_end_matches('/').to_string();
        self
    }

    pub fn with_ti_base(mut self, base: &str) -> Self {
        self.ti_base = base.trim_end_matches('/').to_string();
        self
    }

    pub fn with_location_base(mut self, base: &str) -> Self {
        self.location_base = base.trim_end_matches('/').to_string();
        self
    }

    pub fn service_id(&self) -> &str {
        &self.service_id
    }

    pub fn qod_subscriptions(&self) -> String {
        format!(
            "{}/3gpp-as-session-with-qos/v1/{}/subscriptions",
            self.qod_base, self.service_id
        )
    }

    pub fn qod_subscription(&self, id: &str) -> String {
        format!("{}/{id}", self.qod_subscriptions())
    }

    pub fn ti_subscriptions(&self) -> String {
        format!(
            "{}/3gpp-traffic-influence/v1/{}/subscriptions",
            self.ti_base, self.service_id
        )
    }

    pub fn ti_subscription(&self, id: &str) -> String {
        format!("{}/{id}", self.ti_subscriptions())
    }

    pub fn location_subscriptions(&self) -> String {
        format!(
            "{}/3gpp-monitoring-event/v1/{}/subscriptions",
            self.location_base, self.service_id
        )
    }
}

/// Settings shared by every NEF-style strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct NefSettings {
    pub endpoints: NefEndpoints,
    pub location_notification_url: String,
    pub placeholder: PlaceholderArea,
}

impl NefSettings {
    /// Reads the common settings from an adapter config.
    ///
    /// Recognized extras: `location_notification_url` and `fallback_location`
    /// (`"lat,lon"`).
    pub fn from_config(config: &BackendAdapterConfig) -> Result<Self, BridgeError> {
        let placeholder = match config.extra("fallback_location") {
            Some(raw) => PlaceholderArea::parse(raw)?,
            None => PlaceholderArea::default(),
        };
        Ok(Self {
            endpoints: NefEndpoints::new(config.base(), &config.service_id),
            location_notification_url: config
                .extra_or("location_notification_url", DEFAULT_LOCATION_NOTIFICATION_URL),
            placeholder,
        })
    }
}

/// A static QoS-profile lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileTable(pub &'static [(&'static str, u32)]);

impl ProfileTable {
    pub fn get(&self, profile: &str) -> Option<u32> {
        self.0
            .iter()
            .find(|(name, _)| *name == profile)
            .map(|(_, id)| *id)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.0.iter().map(|(name, _)| *name).collect()
    }

    /// Validation failure listing the supported profiles, or `Ok` when `profile` is known.
    pub fn check(&self, backend: &str, profile: &str) -> Result<u32, BridgeError> {
        self.get(profile).ok_or_else(|| {
            BridgeError::validation(
                backend,
                format!(
                    "unsupported qosProfile `{profile}`, supported: {}",
                    self.names().join(", ")
                ),
            )
        })
    }
}

/// Inputs available to the QoD enrichment hook.
#[derive(Debug, Clone, Copy)]
pub struct QodContext<'a> {
    pub request: &'a CreateSession,
    /// Device address after identity resolution and any address-space coercion.
    pub device_address: &'a str,
    pub server_address: &'a str,
    /// The backend id the profile mapped to.
    pub profile_id: u32,
}

/// Inputs available to the traffic-influence enrichment hook.
#[derive(Debug, Clone, Copy)]
pub struct TrafficInfluenceContext<'a> {
    pub request: &'a TrafficInfluence,
    pub device_address: &'a str,
}

/// Backend-specific behavior plugged into the subscription builder.
///
/// `validate`, `enrich` and `map_profile` are required; the traffic-influence
/// and location hooks default to no-ops for backends that need nothing extra.
pub trait BackendStrategy: Send + Sync + 'static {
    /// Backend name used in errors and logs.
    fn name(&self) -> &str;

    fn capabilities(&self) -> &CapabilitySet;

    fn settings(&self) -> &NefSettings;

    fn endpoints(&self) -> &NefEndpoints {
        &self.settings().endpoints
    }

    /// IPv4 allocation policy for simulated backends.
    fn address_policy(&self) -> Option<&AddressPolicy> {
        None
    }

    /// Maps a QoS profile name to the backend id. `None` means unsupported.
    fn map_profile(&self, profile: &str) -> Option<u32>;

    /// Rejects QoD requests the backend cannot serve.
    fn validate(&self, request: &CreateSession) -> Result<(), BridgeError>;

    /// Adds or overrides backend-specific QoD fields.
    fn enrich(
        &self,
        subscription: &mut AsSessionWithQosSubscription,
        ctx: &QodContext<'_>,
    ) -> Result<(), BridgeError>;

    fn validate_traffic_influence(&self, _request: &TrafficInfluence) -> Result<(), BridgeError> {
        Ok(())
    }

    fn enrich_traffic_influence(
        &self,
        _subscription: &mut TrafficInfluSub,
        _ctx: &TrafficInfluenceContext<'_>,
    ) -> Result<(), BridgeError> {
        Ok(())
    }

    fn validate_location(&self, _request: &LocationRetrievalRequest) -> Result<(), BridgeError> {
        Ok(())
    }

    /// Backend-specific monitoring-event skeleton.
    ///
    /// The default identifies the device by MSISDN and asks for the last known location.
    fn location_subscription(
        &self,
        request: &LocationRetrievalRequest,
    ) -> MonitoringEventSubscription {
        MonitoringEventSubscription {
            msisdn: msisdn_of(request),
            notification_destination: self.settings().location_notification_url.clone(),
            monitoring_type: MONITORING_TYPE_LOCATION.to_string(),
            location_type: Some(LOCATION_TYPE_LAST_KNOWN.to_string()),
            ..MonitoringEventSubscription::default()
        }
    }

    /// Base URL of the simulator OAM API, for backends declaring `core_control`.
    fn oam_base(&self) -> Option<&str> {
        None
    }

    /// UE identity service, for backends declaring `device_status` or
    /// `number_verification`.
    fn ue_identity(&self) -> Option<&UeIdentityEndpoints> {
        None
    }
}

/// The device phone number without its leading `+`.
pub fn msisdn_of(request: &LocationRetrievalRequest) -> Option<String> {
    request
        .device
        .as_ref()?
        .phone_number
        .as_deref()
        .map(|p| p.trim_start_matches('+').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_follow_3gpp_paths() {
        let endpoints = NefEndpoints::new("http://nef:8080/", "af-1");
        assert_eq!(
            endpoints.qod_subscriptions(),
            "http://nef:8080/3gpp-as-session-with-qos/v1/af-1/subscriptions"
        );
        assert_eq!(
            endpoints.ti_subscription("abc"),
            "http://nef:8080/3gpp-traffic-influence/v1/af-1/subscriptions/abc"
        );
        assert_eq!(
            endpoints.location_subscriptions(),
            "http://nef:8080/3gpp-monitoring-event/v1/af-1/subscriptions"
        );
    }

    #[test]
    fn per_api_bases_override() {
        let endpoints =
            NefEndpoints::new("http://nef:8080", "nef").with_qod_base("http://localhost:8100/");
        assert!(endpoints.qod_subscription("1").starts_with("http://localhost:8100/3gpp"));
        assert!(endpoints.ti_subscriptions().starts_with("http://nef:8080/"));
    }

    #[test]
    fn profile_table_check_lists_supported() {
        let table = ProfileTable(&[("qos-e", 3), ("qos-s", 4)]);
        assert_eq!(table.check("open5gs", "qos-s").unwrap(), 4);
        let err = table.check("open5gs", "qos-x").unwrap_err();
        assert!(err.to_string().contains("supported: qos-e, qos-s"), "got: {err}");
    }

    #[test]
    fn settings_read_extras() {
        let config = BackendAdapterConfig::new("http://nef", "af")
            .with_extra("location_notification_url", "http://sink:9000/loc")
            .with_extra("fallback_location", "41.38,2.17");
        let settings = NefSettings::from_config(&config).unwrap();
        assert_eq!(settings.location_notification_url, "http://sink:9000/loc");
        assert_eq!(settings.placeholder.center.latitude, 41.38);
    }

    #[test]
    fn msisdn_strips_plus() {
        let request = LocationRetrievalRequest {
            device: Some(camara_core::types::Device {
                phone_number: Some("+34600000001".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(msisdn_of(&request).as_deref(), Some("34600000001"));
    }
}
