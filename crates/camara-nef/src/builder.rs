// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subscription builder.
//!
//! Every build runs the same fixed sequence: capability gate, backend
//! validation, identity resolution (with address coercion when the backend
//! has an allocation policy), canonical skeleton, backend enrichment. Nothing
//! is sent anywhere; the caller posts the result.

use camara_core::identity::{self, ResolvedAddress};
use camara_core::types::{
    Capability, CreateSession, Device, LocationRetrievalRequest, TrafficInfluence,
};
use camara_core::BridgeError;
use tracing::debug;

use crate::flows::host_filter;
use crate::schemas::{
    AsSessionWithQosSubscription, FlowInfo, MonitoringEventSubscription, RouteToLocation,
    TrafficInfluSub, UsageThreshold,
};
use crate::strategy::{BackendStrategy, QodContext, TrafficInfluenceContext};

/// Builds backend subscriptions from canonical requests using one strategy.
#[derive(Debug, Clone, Copy)]
pub struct SubscriptionBuilder<'a, S: ?Sized> {
    strategy: &'a S,
}

impl<'a, S: BackendStrategy + ?Sized> SubscriptionBuilder<'a, S> {
    pub fn new(strategy: &'a S) -> Self {
        Self { strategy }
    }

    fn gate(&self, capability: Capability) -> Result<(), BridgeError> {
        self.strategy
            .capabilities()
            .require(self.strategy.name(), capability)
    }

    /// The IPv4 address to put on the wire, after any allocation policy.
    fn device_ipv4(&self, device: &Device) -> Option<String> {
        match self.strategy.address_policy() {
            Some(policy) => Some(policy.apply(device.public_ipv4())),
            None => device.public_ipv4().map(str::to_string),
        }
    }

    /// Builds an AsSessionWithQoS subscription.
    pub fn qod(
        &self,
        request: &CreateSession,
    ) -> Result<AsSessionWithQosSubscription, BridgeError> {
        self.gate(Capability::Qod)?;
        self.strategy.validate(request)?;

        let name = self.strategy.name();
        let profile_id = self.strategy.map_profile(&request.qos_profile).ok_or_else(|| {
            BridgeError::validation(
                name,
                format!("unsupported qosProfile `{}`", request.qos_profile),
            )
        })?;

        let resolved = identity::resolve(request.device.as_ref())?;
        let device = request.device.as_ref().ok_or(BridgeError::MissingIdentifier)?;
        let ue_ipv4 = self.device_ipv4(device);
        let ue_ipv6 = device.ipv6_address.clone().filter(|a| !a.is_empty());
        let device_address = ue_ipv4
            .clone()
            .or_else(|| ue_ipv6.clone())
            .ok_or_else(|| {
                BridgeError::validation(
                    name,
                    format!(
                        "QoD needs a device IP address, device is identified by {}",
                        resolved.kind
                    ),
                )
            })?;
        let server_address = request.application_server.address().ok_or_else(|| {
            BridgeError::validation(name, "applicationServer has no address")
        })?;

        let mut subscription = AsSessionWithQosSubscription {
            notification_destination: request.sink.clone(),
            qos_reference: Some(request.qos_profile.clone()),
            ue_ipv4_addr: ue_ipv4,
            ue_ipv6_addr: ue_ipv6,
            usage_threshold: Some(UsageThreshold {
                duration: Some(request.duration),
                total_volume: None,
            }),
            ..AsSessionWithQosSubscription::default()
        };

        let ctx = QodContext {
            request,
            device_address: &device_address,
            server_address,
            profile_id,
        };
        self.strategy.enrich(&mut subscription, &ctx)?;

        debug!(
            backend = name,
            profile = %request.qos_profile,
            profile_id,
            "built QoD subscription"
        );
        Ok(subscription)
    }

    /// Builds a TrafficInfluence subscription.
    pub fn traffic_influence(
        &self,
        request: &TrafficInfluence,
    ) -> Result<TrafficInfluSub, BridgeError> {
        self.gate(Capability::TrafficInfluence)?;
        self.strategy.validate_traffic_influence(request)?;

        let name = self.strategy.name();
        identity::resolve(request.device.as_ref())?;
        let device = request.device.as_ref().ok_or(BridgeError::MissingIdentifier)?;
        let device_address = self.device_ipv4(device).ok_or_else(|| {
            BridgeError::validation(name, "traffic influence needs a device IPv4 address")
        })?;

        let mut subscription = TrafficInfluSub {
            af_app_id: Some(request.app_id.clone()),
            ipv4_addr: Some(device_address.clone()),
            ipv6_addr: device.ipv6_address.clone().filter(|a| !a.is_empty()),
            notification_destination: request.notification_uri.clone(),
            traffic_filters: vec![FlowInfo {
                flow_id: 1,
                flow_descriptions: vec![host_filter(
                    Some("out"),
                    &device_address,
                    &request.app_instance_id,
                )],
            }],
            traffic_routes: request
                .edge_cloud_zone_id
                .iter()
                .map(|zone| RouteToLocation { dnai: zone.clone() })
                .collect(),
            ..TrafficInfluSub::default()
        };

        let ctx = TrafficInfluenceContext {
            request,
            device_address: &device_address,
        };
        self.strategy.enrich_traffic_influence(&mut subscription, &ctx)?;

        debug!(backend = name, app_id = %request.app_id, "built traffic influence subscription");
        Ok(subscription)
    }

    /// Builds a MonitoringEvent subscription for a one-shot location report.
    pub fn location(
        &self,
        request: &LocationRetrievalRequest,
    ) -> Result<MonitoringEventSubscription, BridgeError> {
        self.gate(Capability::LocationRetrieval)?;
        self.strategy.validate_location(request)?;

        let resolved: ResolvedAddress = identity::resolve(request.device.as_ref())?;
        let device = request.device.as_ref().ok_or(BridgeError::MissingIdentifier)?;

        let mut subscription = self.strategy.location_subscription(request);
        if subscription.external_id.is_none() {
            subscription.external_id = device.network_access_identifier.clone();
        }
        if subscription.ipv4_addr.is_none() {
            subscription.ipv4_addr = device.public_ipv4().map(str::to_string);
        }
        if subscription.ipv6_addr.is_none() {
            subscription.ipv6_addr = device.ipv6_address.clone();
        }

        debug!(
            backend = self.strategy.name(),
            identified_by = %resolved.kind,
            "built location subscription"
        );
        Ok(subscription)
    }
}
