// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generic NEF-style adapter.
//!
//! [`NefClient`] pairs a [`BackendStrategy`] with a [`BackendTransport`] and
//! implements every operation family the strategy declares. Each entry point
//! checks the capability gate first, so an undeclared operation fails before
//! any request is built or sent.
//!
//! Subscriber lookups walk the UE identity service in order: SUPI first, then
//! the full profile. A lookup step answered with an error status falls through
//! to the next one; a backend that cannot be reached fails the call.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Value, json};
use tracing::{debug, info};

use camara_core::types::{
    AdapterDomain, Capability, CreateSession, DevicePhoneNumber, HealthStatus, Location,
    LocationRetrievalRequest, NumberVerification, NumberVerificationRequest, ReachabilityStatus,
    RoamingStatus, Session, TrafficInfluence, UeLookup, UeProfile,
};
use camara_core::{
    BackendAdapter, BackendTransport, BridgeError, CapabilitySet, CoreControlAdapter,
    DeviceStatusAdapter, LocationAdapter, NumberVerificationAdapter, QodAdapter,
    TrafficInfluenceAdapter,
};

use crate::builder::SubscriptionBuilder;
use crate::schemas::{AsSessionWithQosSubscription, MonitoringEventReport, TrafficInfluSub};
use crate::strategy::BackendStrategy;
use crate::subscriber::{self, UeIdentityEndpoints, supi_of};
use crate::translate::{
    extract_resource_id, location_from_report, parse, session_from_subscription,
    traffic_influence_from_subscription,
};

/// Status value the simulator reports while a simulation is running.
const SIMULATION_STARTED: &str = "STARTED";

/// A NEF-family backend adapter.
pub struct NefClient<S> {
    strategy: S,
    transport: Arc<dyn BackendTransport>,
}

impl<S: BackendStrategy> NefClient<S> {
    pub fn new(strategy: S, transport: Arc<dyn BackendTransport>) -> Self {
        Self {
            strategy,
            transport,
        }
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    fn builder(&self) -> SubscriptionBuilder<'_, S> {
        SubscriptionBuilder::new(&self.strategy)
    }

    fn oam_url(&self, action: &str) -> Result<String, BridgeError> {
        let base = self.strategy.oam_base().ok_or_else(|| {
            BridgeError::Internal(format!(
                "{} declares core_control without an OAM base",
                self.strategy.name()
            ))
        })?;
        Ok(format!("{base}/core-simulator/v1/{action}"))
    }

    fn ue_identity(&self) -> Result<&UeIdentityEndpoints, BridgeError> {
        self.strategy.ue_identity().ok_or_else(|| {
            BridgeError::Internal(format!(
                "{} declares subscriber lookups without a UE identity service",
                self.strategy.name()
            ))
        })
    }

    /// A lookup answer, or `None` when the service answered with an error status.
    async fn lookup(&self, url: &str) -> Result<Option<Value>, BridgeError> {
        match self.transport.get(url).await {
            Ok(body) => Ok(body.filter(|b| !b.is_null())),
            Err(BridgeError::BackendHttp { status, .. }) => {
                debug!(backend = self.name(), url, status, "UE lookup missed");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn profile_by_supi(&self, supi: &str) -> Result<UeProfile, BridgeError> {
        let ids = self.ue_identity()?;
        if let Some(url) = ids.stored_profile(supi)
            && let Some(body) = self.lookup(&url).await?
        {
            return parse(Some(body), "UE profile");
        }
        match self.lookup(&ids.profile_by_supi(supi)).await? {
            Some(body) => parse(Some(body), "UE profile"),
            None => Err(profile_not_found(supi)),
        }
    }

    async fn profile_by_ip(&self, ip: &str) -> Result<UeProfile, BridgeError> {
        let ids = self.ue_identity()?;
        if let Some(body) = self.lookup(&ids.supi_by_ip(ip)).await?
            && let Some(supi) = supi_of(&body)
        {
            return self.profile_by_supi(supi).await;
        }
        match self.lookup(&ids.profile_by_ip(ip)).await? {
            Some(body) => parse(Some(body), "UE profile"),
            None => Err(profile_not_found(ip)),
        }
    }

    async fn profile_by_msisdn(&self, msisdn: &str) -> Result<UeProfile, BridgeError> {
        let ids = self.ue_identity()?;
        match self.lookup(&ids.supi_by_msisdn(msisdn)).await? {
            Some(body) => match supi_of(&body) {
                Some(supi) => self.profile_by_supi(supi).await,
                None => Err(profile_not_found(msisdn)),
            },
            None => Err(profile_not_found(msisdn)),
        }
    }

    /// The profile behind `ip`, or `None` when no service knows the UE.
    async fn known_profile(&self, ip: &str) -> Result<Option<UeProfile>, BridgeError> {
        match self.profile_by_ip(ip).await {
            Ok(profile) => Ok(Some(profile)),
            Err(BridgeError::NotFound { .. }) => {
                debug!(backend = self.name(), ip, "no UE profile, reporting defaults");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn to_body<T: serde::Serialize>(payload: &T) -> Result<Value, BridgeError> {
        serde_json::to_value(payload)
            .map_err(|e| BridgeError::Internal(format!("failed to encode subscription: {e}")))
    }
}

#[async_trait]
impl<S: BackendStrategy> BackendAdapter for NefClient<S> {
    fn name(&self) -> &str {
        self.strategy.name()
    }

    fn domain(&self) -> AdapterDomain {
        AdapterDomain::Network
    }

    fn capabilities(&self) -> &CapabilitySet {
        self.strategy.capabilities()
    }

    fn as_qod(&self) -> Option<&dyn QodAdapter> {
        Some(self)
    }

    fn as_traffic_influence(&self) -> Option<&dyn TrafficInfluenceAdapter> {
        Some(self)
    }

    fn as_location(&self) -> Option<&dyn LocationAdapter> {
        Some(self)
    }

    fn as_core_control(&self) -> Option<&dyn CoreControlAdapter> {
        self.capabilities()
            .contains(Capability::CoreControl)
            .then_some(self as &dyn CoreControlAdapter)
    }

    fn as_device_status(&self) -> Option<&dyn DeviceStatusAdapter> {
        self.capabilities()
            .contains(Capability::DeviceStatus)
            .then_some(self as &dyn DeviceStatusAdapter)
    }

    fn as_number_verification(&self) -> Option<&dyn NumberVerificationAdapter> {
        self.capabilities()
            .contains(Capability::NumberVerification)
            .then_some(self as &dyn NumberVerificationAdapter)
    }

    async fn health_check(&self) -> Result<HealthStatus, BridgeError> {
        if !self.capabilities().contains(Capability::CoreControl) {
            return Ok(HealthStatus::Healthy);
        }
        match self.transport.get(&self.oam_url("status")?).await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e @ BridgeError::BackendHttp { .. }) => Ok(HealthStatus::Degraded(e.to_string())),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), BridgeError> {
        debug!(backend = self.name(), "adapter shut down");
        Ok(())
    }
}

#[async_trait]
impl<S: BackendStrategy> QodAdapter for NefClient<S> {
    async fn create_session(&self, request: &CreateSession) -> Result<Session, BridgeError> {
        let subscription = self.builder().qod(request)?;
        let url = self.strategy.endpoints().qod_subscriptions();
        let response = self.transport.post(&url, &Self::to_body(&subscription)?).await?;
        let body = response.ok_or_else(|| BridgeError::MalformedBackendResponse {
            detail: "empty QoD subscription response".to_string(),
        })?;
        let session_id = extract_resource_id(&body)?;
        info!(backend = self.name(), session_id = %session_id, "QoD session created");
        Ok(Session::requested(session_id, request))
    }

    async fn get_session(
        &self,
        session_id: &str,
        original: Option<&CreateSession>,
    ) -> Result<Session, BridgeError> {
        self.capabilities().require(self.name(), Capability::Qod)?;
        let url = self.strategy.endpoints().qod_subscription(session_id);
        let raw: AsSessionWithQosSubscription =
            parse(self.transport.get(&url).await?, "QoD subscription")?;
        Ok(session_from_subscription(session_id, &raw, original, Utc::now()))
    }

    async fn delete_session(&self, session_id: &str) -> Result<(), BridgeError> {
        self.capabilities().require(self.name(), Capability::Qod)?;
        let url = self.strategy.endpoints().qod_subscription(session_id);
        self.transport.delete(&url).await?;
        info!(backend = self.name(), session_id, "QoD session deleted");
        Ok(())
    }
}

#[async_trait]
impl<S: BackendStrategy> TrafficInfluenceAdapter for NefClient<S> {
    async fn create_traffic_influence(
        &self,
        request: &TrafficInfluence,
    ) -> Result<TrafficInfluence, BridgeError> {
        let subscription = self.builder().traffic_influence(request)?;
        let url = self.strategy.endpoints().ti_subscriptions();
        let response = self.transport.post(&url, &Self::to_body(&subscription)?).await?;
        let body = response.ok_or_else(|| BridgeError::MalformedBackendResponse {
            detail: "empty traffic influence response".to_string(),
        })?;
        let id = extract_resource_id(&body)?;
        info!(backend = self.name(), id = %id, "traffic influence created");

        let mut created = request.clone();
        created.traffic_influence_id = Some(id);
        Ok(created)
    }

    async fn update_traffic_influence(
        &self,
        id: &str,
        request: &TrafficInfluence,
    ) -> Result<TrafficInfluence, BridgeError> {
        let subscription = self.builder().traffic_influence(request)?;
        let url = self.strategy.endpoints().ti_subscription(id);
        self.transport.put(&url, &Self::to_body(&subscription)?).await?;
        info!(backend = self.name(), id, "traffic influence updated");

        let mut updated = request.clone();
        updated.traffic_influence_id = Some(id.to_string());
        Ok(updated)
    }

    async fn get_traffic_influence(&self, id: &str) -> Result<TrafficInfluence, BridgeError> {
        self.capabilities()
            .require(self.name(), Capability::TrafficInfluence)?;
        let url = self.strategy.endpoints().ti_subscription(id);
        let raw: TrafficInfluSub = parse(self.transport.get(&url).await?, "traffic influence")?;
        Ok(traffic_influence_from_subscription(id, &raw))
    }

    async fn list_traffic_influence(&self) -> Result<Vec<TrafficInfluence>, BridgeError> {
        self.capabilities()
            .require(self.name(), Capability::TrafficInfluence)?;
        let url = self.strategy.endpoints().ti_subscriptions();
        let raw: Vec<TrafficInfluSub> = match self.transport.get(&url).await? {
            None | Some(Value::Null) => Vec::new(),
            response => parse(response, "traffic influence list")?,
        };

        raw.iter()
            .map(|sub| {
                let id = sub
                    .self_link
                    .as_ref()
                    .map(|link| extract_resource_id(&json!({ "self": link })))
                    .transpose()?
                    .unwrap_or_default();
                Ok(traffic_influence_from_subscription(&id, sub))
            })
            .collect()
    }

    async fn delete_traffic_influence(&self, id: &str) -> Result<(), BridgeError> {
        self.capabilities()
            .require(self.name(), Capability::TrafficInfluence)?;
        let url = self.strategy.endpoints().ti_subscription(id);
        self.transport.delete(&url).await?;
        info!(backend = self.name(), id, "traffic influence deleted");
        Ok(())
    }
}

#[async_trait]
impl<S: BackendStrategy> LocationAdapter for NefClient<S> {
    async fn retrieve_location(
        &self,
        request: &LocationRetrievalRequest,
    ) -> Result<Location, BridgeError> {
        let subscription = self.builder().location(request)?;
        let url = self.strategy.endpoints().location_subscriptions();
        let report: MonitoringEventReport = parse(
            self.transport.post(&url, &Self::to_body(&subscription)?).await?,
            "monitoring event report",
        )?;
        location_from_report(&report, &self.strategy.settings().placeholder, Utc::now())
    }
}

#[async_trait]
impl<S: BackendStrategy> CoreControlAdapter for NefClient<S> {
    async fn simulation_status(&self) -> Result<Value, BridgeError> {
        self.capabilities().require(self.name(), Capability::CoreControl)?;
        Ok(self
            .transport
            .get(&self.oam_url("status")?)
            .await?
            .unwrap_or(Value::Null))
    }

    async fn start_simulation(&self) -> Result<Value, BridgeError> {
        let status = self.simulation_status().await?;
        if status.get("Status").and_then(Value::as_str) == Some(SIMULATION_STARTED) {
            info!(backend = self.name(), "simulation already running, skipping start");
            return Ok(status);
        }
        let response = self
            .transport
            .post(&self.oam_url("start")?, &json!({}))
            .await?;
        info!(backend = self.name(), "simulation started");
        Ok(response.unwrap_or(Value::Null))
    }

    async fn stop_simulation(&self) -> Result<Value, BridgeError> {
        self.capabilities().require(self.name(), Capability::CoreControl)?;
        let response = self.transport.post(&self.oam_url("stop")?, &json!({})).await?;
        info!(backend = self.name(), "simulation stopped");
        Ok(response.unwrap_or(Value::Null))
    }

    async fn configure_simulation(&self, config: &Value) -> Result<Value, BridgeError> {
        self.capabilities().require(self.name(), Capability::CoreControl)?;
        let response = self.transport.post(&self.oam_url("configure")?, config).await?;
        Ok(response.unwrap_or(Value::Null))
    }
}

#[async_trait]
impl<S: BackendStrategy> DeviceStatusAdapter for NefClient<S> {
    async fn ue_profile(&self, lookup: &UeLookup) -> Result<UeProfile, BridgeError> {
        self.capabilities().require(self.name(), Capability::DeviceStatus)?;
        match lookup {
            UeLookup::Ip(ip) => self.profile_by_ip(ip).await,
            UeLookup::Supi(supi) => self.profile_by_supi(supi).await,
            UeLookup::Msisdn(msisdn) => self.profile_by_msisdn(msisdn).await,
        }
    }

    async fn reachability_status(&self, ip: &str) -> Result<ReachabilityStatus, BridgeError> {
        self.capabilities().require(self.name(), Capability::DeviceStatus)?;
        let profile = self.known_profile(ip).await?;
        let status = subscriber::reachability(profile.as_ref(), Utc::now());
        debug!(
            backend = self.name(),
            ip,
            status = %status.reachability_status,
            "device reachability"
        );
        Ok(status)
    }

    async fn roaming_status(&self, ip: &str) -> Result<RoamingStatus, BridgeError> {
        self.capabilities().require(self.name(), Capability::DeviceStatus)?;
        let profile = self.known_profile(ip).await?;
        Ok(subscriber::roaming(profile.as_ref(), self.ue_identity()?.home()))
    }
}

#[async_trait]
impl<S: BackendStrategy> NumberVerificationAdapter for NefClient<S> {
    async fn device_phone_number(&self, ip: &str) -> Result<DevicePhoneNumber, BridgeError> {
        self.capabilities()
            .require(self.name(), Capability::NumberVerification)?;
        let url = self.ue_identity()?.msisdn_by_ip(ip);
        let body = self.transport.get(&url).await?;
        let msisdn = body
            .as_ref()
            .and_then(|b| b.get("Msisdn"))
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .ok_or_else(|| BridgeError::NotFound {
                resource: "MSISDN".to_string(),
                id: ip.to_string(),
            })?;
        Ok(DevicePhoneNumber {
            device_phone_number: msisdn.to_string(),
        })
    }

    async fn verify_phone_number(
        &self,
        ip: &str,
        request: &NumberVerificationRequest,
    ) -> Result<NumberVerification, BridgeError> {
        self.capabilities()
            .require(self.name(), Capability::NumberVerification)?;
        let reasons = request.validation_errors();
        if !reasons.is_empty() {
            return Err(BridgeError::Validation {
                backend: self.name().to_string(),
                reasons,
            });
        }
        let actual = self.device_phone_number(ip).await?;
        let verified = subscriber::number_matches(&actual.device_phone_number, request);
        info!(backend = self.name(), ip, verified, "phone number verified");
        Ok(NumberVerification {
            device_phone_number_verified: verified,
        })
    }
}

fn profile_not_found(id: &str) -> BridgeError {
    BridgeError::NotFound {
        resource: "UE profile".to_string(),
        id: id.to_string(),
    }
}
