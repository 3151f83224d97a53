// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service facade over the active adapters.
//!
//! [`BridgeService`] keeps the sessions and traffic-influence resources it
//! created, drives their lifecycle state, and serialises mutations of a
//! single resource through [`ResourceLocks`]. Everything else is delegated to
//! the adapter active in the registry at call time.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use serde_json::Value;
use tracing::{info, warn};

use camara_core::types::{
    CreateSession, Device, DevicePhoneNumber, Location, LocationRetrievalRequest,
    NumberVerification, NumberVerificationRequest, QosStatus, ReachabilityStatus, RoamingStatus,
    Session, StatusInfo, TrafficInfluence, TrafficInfluenceState, UeLookup, UeProfile,
};
use camara_core::{AdapterDomain, BackendAdapter, BridgeError, Capability};

use crate::locks::ResourceLocks;
use crate::registry::AdapterRegistry;

/// Conflict code for an illegal traffic-influence state change.
pub const TRAFFIC_INFLUENCE_INVALID_STATE: &str = "TRAFFIC_INFLUENCE.INVALID_STATE";

const SESSION: &str = "session";
const TRAFFIC_INFLUENCE: &str = "traffic influence";

struct SessionRecord {
    domain: AdapterDomain,
    session: Session,
}

pub struct BridgeService {
    registry: Arc<AdapterRegistry>,
    locks: ResourceLocks,
    sessions: DashMap<String, SessionRecord>,
    traffic: DashMap<String, TrafficInfluence>,
}

fn not_found(resource: &str, id: &str) -> BridgeError {
    BridgeError::NotFound {
        resource: resource.to_string(),
        id: id.to_string(),
    }
}

fn unsupported(adapter: &dyn BackendAdapter, capability: Capability) -> BridgeError {
    BridgeError::CapabilityNotSupported {
        backend: adapter.name().to_string(),
        capability,
    }
}

fn qod_capability(domain: AdapterDomain) -> Capability {
    match domain {
        AdapterDomain::Network => Capability::Qod,
        AdapterDomain::Oran => Capability::OranQod,
    }
}

/// Moves `resource` to `next`, refusing transitions the lifecycle forbids.
fn advance(
    resource: &mut TrafficInfluence,
    next: TrafficInfluenceState,
) -> Result<(), BridgeError> {
    let current = resource.state.unwrap_or(TrafficInfluenceState::Ordered);
    if current != next && !current.can_transition_to(next) {
        return Err(BridgeError::Conflict {
            code: TRAFFIC_INFLUENCE_INVALID_STATE.to_string(),
            message: format!(
                "traffic influence {} cannot move from {current} to {next}",
                resource.traffic_influence_id.as_deref().unwrap_or("<new>")
            ),
        });
    }
    resource.state = Some(next);
    Ok(())
}

impl BridgeService {
    pub fn new(registry: Arc<AdapterRegistry>) -> Self {
        Self {
            registry,
            locks: ResourceLocks::new(),
            sessions: DashMap::new(),
            traffic: DashMap::new(),
        }
    }

    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    // --- Quality on demand ---

    /// Creates a session on the active adapter of `domain`.
    ///
    /// The capability gate comes first, then the request shape is checked
    /// before the adapter sees it.
    pub async fn create_session(
        &self,
        domain: AdapterDomain,
        request: &CreateSession,
    ) -> Result<Session, BridgeError> {
        let adapter = self.registry.require(domain)?;
        adapter
            .capabilities()
            .require(adapter.name(), qod_capability(domain))?;
        let qod = adapter
            .as_qod()
            .ok_or_else(|| unsupported(adapter.as_ref(), qod_capability(domain)))?;
        let errors = request.validation_errors();
        if !errors.is_empty() {
            return Err(BridgeError::Validation {
                backend: adapter.name().to_string(),
                reasons: errors,
            });
        }

        let session = qod.create_session(request).await?;
        if session.session_id.is_empty() {
            // The backend refused the session and the adapter reported it
            // instead of failing. There is nothing to track.
            warn!(
                backend = adapter.name(),
                status = ?session.status_info,
                "session not created"
            );
            return Ok(session);
        }

        info!(
            backend = adapter.name(),
            session_id = %session.session_id,
            qos_profile = %session.qos_profile,
            "session created"
        );
        self.sessions.insert(
            session.session_id.clone(),
            SessionRecord {
                domain,
                session: session.clone(),
            },
        );
        Ok(session)
    }

    /// Refreshes a session from its backend.
    ///
    /// A confirmed session becomes AVAILABLE. A backend failure that implies
    /// the session is gone marks it UNAVAILABLE before the error is returned.
    pub async fn get_session(&self, session_id: &str) -> Result<Session, BridgeError> {
        let _guard = self.locks.lock(session_id).await;
        let (domain, mut session) = self
            .sessions
            .get(session_id)
            .map(|r| (r.domain, r.session.clone()))
            .ok_or_else(|| not_found(SESSION, session_id))?;

        let adapter = self.registry.require(domain)?;
        let qod = adapter
            .as_qod()
            .ok_or_else(|| unsupported(adapter.as_ref(), qod_capability(domain)))?;

        match qod.get_session(session_id, Some(&session.to_request())).await {
            Ok(remote) if remote.qos_status == QosStatus::Unavailable => {
                session.terminate(remote.status_info.unwrap_or(StatusInfo::NetworkTerminated));
            }
            Ok(_) => session.confirm(Utc::now()),
            Err(e) => {
                if let Some(reason) = e.status_info() {
                    warn!(session_id, %reason, error = %e, "backend lost session");
                    session.terminate(reason);
                    self.store_session(domain, &session);
                }
                return Err(e);
            }
        }
        self.store_session(domain, &session);
        Ok(session)
    }

    fn store_session(&self, domain: AdapterDomain, session: &Session) {
        if let Some(mut record) = self.sessions.get_mut(&session.session_id) {
            record.domain = domain;
            record.session = session.clone();
        }
    }

    /// Deletes a session on its backend and forgets it.
    pub async fn delete_session(&self, session_id: &str) -> Result<Session, BridgeError> {
        let _guard = self.locks.lock(session_id).await;
        let domain = self
            .sessions
            .get(session_id)
            .map(|r| r.domain)
            .ok_or_else(|| not_found(SESSION, session_id))?;

        let adapter = self.registry.require(domain)?;
        let qod = adapter
            .as_qod()
            .ok_or_else(|| unsupported(adapter.as_ref(), qod_capability(domain)))?;
        qod.delete_session(session_id).await?;

        let (_, record) = self
            .sessions
            .remove(session_id)
            .ok_or_else(|| not_found(SESSION, session_id))?;
        let mut session = record.session;
        session.terminate(StatusInfo::DeleteRequested);
        info!(backend = adapter.name(), session_id, "session deleted");
        Ok(session)
    }

    /// Extends an AVAILABLE session by `additional_secs`.
    ///
    /// Any other status is a conflict and leaves the session unchanged.
    pub async fn extend_session(
        &self,
        session_id: &str,
        additional_secs: u32,
    ) -> Result<Session, BridgeError> {
        let _guard = self.locks.lock(session_id).await;
        let mut record = self
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| not_found(SESSION, session_id))?;
        record.session.extend(additional_secs)?;
        info!(
            session_id,
            additional_secs,
            duration = record.session.duration,
            "session extended"
        );
        Ok(record.session.clone())
    }

    /// Sessions known to this bridge, optionally only those of `device`.
    pub fn list_sessions(&self, device: Option<&Device>) -> Vec<Session> {
        let mut sessions: Vec<Session> = self
            .sessions
            .iter()
            .filter(|r| device.is_none_or(|d| r.session.device.as_ref() == Some(d)))
            .map(|r| r.session.clone())
            .collect();
        sessions.sort_by(|a, b| a.session_id.cmp(&b.session_id));
        sessions
    }

    // --- Traffic influence ---

    /// Creates a resource: `ordered`, then `active` once the backend accepts it.
    pub async fn create_traffic_influence(
        &self,
        request: &TrafficInfluence,
    ) -> Result<TrafficInfluence, BridgeError> {
        let adapter = self.registry.network()?;
        let ti = adapter
            .as_traffic_influence()
            .ok_or_else(|| unsupported(adapter.as_ref(), Capability::TrafficInfluence))?;

        let mut resource = request.clone();
        resource.state = Some(TrafficInfluenceState::Ordered);
        let created = ti.create_traffic_influence(&resource).await?;
        let id = created.traffic_influence_id.clone().ok_or_else(|| {
            BridgeError::MalformedBackendResponse {
                detail: "traffic influence created without an id".to_string(),
            }
        })?;

        resource.traffic_influence_id = Some(id.clone());
        advance(&mut resource, TrafficInfluenceState::Active)?;
        info!(backend = adapter.name(), traffic_influence_id = %id, "traffic influence active");
        self.traffic.insert(id, resource.clone());
        Ok(resource)
    }

    /// Replaces an `active` resource. It is re-ordered while the backend
    /// applies the change and ends `active`, or `error` on failure.
    pub async fn update_traffic_influence(
        &self,
        id: &str,
        request: &TrafficInfluence,
    ) -> Result<TrafficInfluence, BridgeError> {
        let _guard = self.locks.lock(id).await;
        let mut resource = self
            .traffic
            .get(id)
            .map(|r| r.value().clone())
            .ok_or_else(|| not_found(TRAFFIC_INFLUENCE, id))?;
        if resource.state != Some(TrafficInfluenceState::Active) {
            return Err(BridgeError::Conflict {
                code: TRAFFIC_INFLUENCE_INVALID_STATE.to_string(),
                message: format!(
                    "traffic influence {id} is {} and cannot be modified",
                    resource.state.unwrap_or(TrafficInfluenceState::Ordered)
                ),
            });
        }

        let adapter = self.registry.network()?;
        let ti = adapter
            .as_traffic_influence()
            .ok_or_else(|| unsupported(adapter.as_ref(), Capability::TrafficInfluence))?;

        advance(&mut resource, TrafficInfluenceState::Ordered)?;
        self.traffic.insert(id.to_string(), resource.clone());

        match ti.update_traffic_influence(id, request).await {
            Ok(_) => {
                let mut updated = request.clone();
                updated.traffic_influence_id = Some(id.to_string());
                updated.state = resource.state;
                advance(&mut updated, TrafficInfluenceState::Active)?;
                self.traffic.insert(id.to_string(), updated.clone());
                info!(traffic_influence_id = id, "traffic influence updated");
                Ok(updated)
            }
            Err(e) => {
                advance(&mut resource, TrafficInfluenceState::Error)?;
                self.traffic.insert(id.to_string(), resource);
                warn!(traffic_influence_id = id, error = %e, "traffic influence update failed");
                Err(e)
            }
        }
    }

    /// Fetches a resource from the backend, keeping the locally tracked state.
    pub async fn get_traffic_influence(&self, id: &str) -> Result<TrafficInfluence, BridgeError> {
        let state = self
            .traffic
            .get(id)
            .map(|r| r.state)
            .ok_or_else(|| not_found(TRAFFIC_INFLUENCE, id))?;

        let adapter = self.registry.network()?;
        let ti = adapter
            .as_traffic_influence()
            .ok_or_else(|| unsupported(adapter.as_ref(), Capability::TrafficInfluence))?;
        let mut resource = ti.get_traffic_influence(id).await?;
        resource.state = state;
        Ok(resource)
    }

    /// Every resource the backend holds, with local state where it is tracked.
    pub async fn list_traffic_influence(&self) -> Result<Vec<TrafficInfluence>, BridgeError> {
        let adapter = self.registry.network()?;
        let ti = adapter
            .as_traffic_influence()
            .ok_or_else(|| unsupported(adapter.as_ref(), Capability::TrafficInfluence))?;

        let mut resources = ti.list_traffic_influence().await?;
        for resource in &mut resources {
            let tracked = resource
                .traffic_influence_id
                .as_deref()
                .and_then(|id| self.traffic.get(id).and_then(|r| r.state));
            if tracked.is_some() {
                resource.state = tracked;
            }
        }
        Ok(resources)
    }

    /// Deletes a resource: `deletion_in_progress`, then `deleted`.
    pub async fn delete_traffic_influence(
        &self,
        id: &str,
    ) -> Result<TrafficInfluence, BridgeError> {
        let _guard = self.locks.lock(id).await;
        let mut resource = self
            .traffic
            .get(id)
            .map(|r| r.value().clone())
            .ok_or_else(|| not_found(TRAFFIC_INFLUENCE, id))?;

        let adapter = self.registry.network()?;
        let ti = adapter
            .as_traffic_influence()
            .ok_or_else(|| unsupported(adapter.as_ref(), Capability::TrafficInfluence))?;

        advance(&mut resource, TrafficInfluenceState::DeletionInProgress)?;
        self.traffic.insert(id.to_string(), resource.clone());

        if let Err(e) = ti.delete_traffic_influence(id).await {
            advance(&mut resource, TrafficInfluenceState::Error)?;
            self.traffic.insert(id.to_string(), resource);
            warn!(traffic_influence_id = id, error = %e, "traffic influence delete failed");
            return Err(e);
        }

        advance(&mut resource, TrafficInfluenceState::Deleted)?;
        self.traffic.remove(id);
        info!(traffic_influence_id = id, "traffic influence deleted");
        Ok(resource)
    }

    // --- Location and simulator control ---

    pub async fn retrieve_location(
        &self,
        request: &LocationRetrievalRequest,
    ) -> Result<Location, BridgeError> {
        let adapter = self.registry.network()?;
        let location = adapter
            .as_location()
            .ok_or_else(|| unsupported(adapter.as_ref(), Capability::LocationRetrieval))?;
        location.retrieve_location(request).await
    }

    pub async fn simulation_status(&self) -> Result<Value, BridgeError> {
        let adapter = self.registry.network()?;
        let control = adapter
            .as_core_control()
            .ok_or_else(|| unsupported(adapter.as_ref(), Capability::CoreControl))?;
        control.simulation_status().await
    }

    pub async fn start_simulation(&self) -> Result<Value, BridgeError> {
        let adapter = self.registry.network()?;
        let control = adapter
            .as_core_control()
            .ok_or_else(|| unsupported(adapter.as_ref(), Capability::CoreControl))?;
        control.start_simulation().await
    }

    pub async fn stop_simulation(&self) -> Result<Value, BridgeError> {
        let adapter = self.registry.network()?;
        let control = adapter
            .as_core_control()
            .ok_or_else(|| unsupported(adapter.as_ref(), Capability::CoreControl))?;
        control.stop_simulation().await
    }

    pub async fn configure_simulation(&self, config: &Value) -> Result<Value, BridgeError> {
        let adapter = self.registry.network()?;
        let control = adapter
            .as_core_control()
            .ok_or_else(|| unsupported(adapter.as_ref(), Capability::CoreControl))?;
        control.configure_simulation(config).await
    }

    // --- Device status and number verification ---

    pub async fn ue_profile(&self, lookup: &UeLookup) -> Result<UeProfile, BridgeError> {
        let adapter = self.registry.network()?;
        let status = adapter
            .as_device_status()
            .ok_or_else(|| unsupported(adapter.as_ref(), Capability::DeviceStatus))?;
        status.ue_profile(lookup).await
    }

    pub async fn reachability_status(&self, ip: &str) -> Result<ReachabilityStatus, BridgeError> {
        let adapter = self.registry.network()?;
        let status = adapter
            .as_device_status()
            .ok_or_else(|| unsupported(adapter.as_ref(), Capability::DeviceStatus))?;
        status.reachability_status(ip).await
    }

    pub async fn roaming_status(&self, ip: &str) -> Result<RoamingStatus, BridgeError> {
        let adapter = self.registry.network()?;
        let status = adapter
            .as_device_status()
            .ok_or_else(|| unsupported(adapter.as_ref(), Capability::DeviceStatus))?;
        status.roaming_status(ip).await
    }

    pub async fn device_phone_number(&self, ip: &str) -> Result<DevicePhoneNumber, BridgeError> {
        let adapter = self.registry.network()?;
        let numbers = adapter
            .as_number_verification()
            .ok_or_else(|| unsupported(adapter.as_ref(), Capability::NumberVerification))?;
        numbers.device_phone_number(ip).await
    }

    pub async fn verify_phone_number(
        &self,
        ip: &str,
        request: &NumberVerificationRequest,
    ) -> Result<NumberVerification, BridgeError> {
        let adapter = self.registry.network()?;
        let numbers = adapter
            .as_number_verification()
            .ok_or_else(|| unsupported(adapter.as_ref(), Capability::NumberVerification))?;
        numbers.verify_phone_number(ip, request).await
    }
}
