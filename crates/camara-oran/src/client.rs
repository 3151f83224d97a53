// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! RIC policy client.
//!
//! A QoD session maps to one `qod_prb_prio` policy scoped to the cell that
//! serves the device. The policy id doubles as the session id.
//!
//! Two opt-in extras soften backend HTTP failures. With `return_on_error`, a
//! rejected policy creation yields an UNAVAILABLE session carrying the
//! backend's `ErrorInfo`. With `fallback_unavailable`, a failed policy lookup
//! reports the session UNAVAILABLE. Connection failures are always errors.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use camara_core::types::{
    AdapterDomain, BackendAdapterConfig, Capability, CreateSession, Device, HealthStatus,
    QosStatus, Session,
};
use camara_core::{BackendAdapter, BackendTransport, BridgeError, CapabilitySet, QodAdapter};

use crate::mapping::IpScopeMap;
use crate::refresh::{RefreshHandle, spawn_refresh};
use crate::schemas::{
    OranNotification, OranPolicy, POLICY_TYPE_QOD, PolicyScope, PolicyStatement, policy_id,
};

pub const NAME: &str = "i2cat_ric";

/// Default period of the mapping refresh loop.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// QoS profile to RIC priority and flow id.
const PRIORITIES: &[(&str, &str, u32)] = &[
    ("qos-e", "qos-e", 3),
    ("qos-s", "qos-s", 4),
    ("qos-m", "qos-m", 5),
    ("qos-l", "qos-l", 6),
];

fn priority_of(profile: &str) -> Option<(&'static str, u32)> {
    PRIORITIES
        .iter()
        .find(|(name, _, _)| *name == profile)
        .map(|(_, prio, flow)| (*prio, *flow))
}

/// Device IPv4 candidates: public first, then private when different.
fn ip_candidates(device: Option<&Device>) -> Vec<&str> {
    let mut candidates = Vec::with_capacity(2);
    if let Some(device) = device {
        candidates.extend(device.public_ipv4());
        if let Some(private) = device.private_ipv4()
            && !candidates.contains(&private)
        {
            candidates.push(private);
        }
    }
    candidates
}

pub struct OranClient {
    base_url: String,
    service_id: String,
    capabilities: CapabilitySet,
    mapping: Arc<IpScopeMap>,
    transport: Arc<dyn BackendTransport>,
    refresh_interval: Duration,
    refresh: Mutex<Option<RefreshHandle>>,
    return_on_error: bool,
    fallback_unavailable: bool,
}

fn flag(config: &BackendAdapterConfig, key: &str) -> Result<bool, BridgeError> {
    match config.extra(key) {
        None => Ok(false),
        Some(raw) => raw.trim().parse().map_err(|_| {
            BridgeError::Config(format!("{NAME}: {key} `{raw}` must be `true` or `false`"))
        }),
    }
}

/// An UNAVAILABLE session standing in for a failed backend call.
fn unavailable_session(id: &str, request: &CreateSession, error: &BridgeError) -> Session {
    let mut session = Session::requested(id, request);
    session.qos_status = QosStatus::Unavailable;
    session.status_info = error.status_info();
    session.error = Some(error.upstream_error_info());
    session
}

impl OranClient {
    /// Creates a client from `config`.
    ///
    /// Serves the built-in IP mapping unless the `ip_mapping_file` extra names
    /// a file; `refresh_interval_secs` sets the reload period.
    pub fn new(
        config: &BackendAdapterConfig,
        transport: Arc<dyn BackendTransport>,
    ) -> Result<Self, BridgeError> {
        if config.base_url.trim().is_empty() {
            return Err(BridgeError::Config(format!("{NAME}: base_url is required")));
        }
        let refresh_interval = match config.extra("refresh_interval_secs") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(BridgeError::Config(format!(
                        "{NAME}: refresh_interval_secs `{raw}` must be a positive integer"
                    )));
                }
            },
            None => DEFAULT_REFRESH_INTERVAL,
        };

        let client = Self {
            base_url: config.base().to_string(),
            service_id: config.service_id.clone(),
            capabilities: CapabilitySet::new([Capability::OranQod, Capability::OranPerformance]),
            mapping: Arc::new(IpScopeMap::builtin()),
            transport,
            refresh_interval,
            refresh: Mutex::new(None),
            return_on_error: flag(config, "return_on_error")?,
            fallback_unavailable: flag(config, "fallback_unavailable")?,
        };
        Ok(match config.extra("ip_mapping_file") {
            Some(path) => client.with_mapping_file(path, refresh_interval),
            None => client,
        })
    }

    /// Serves the mapping from `path`, reloaded every `interval` once
    /// [`start_refresh`](Self::start_refresh) is called.
    pub fn with_mapping_file(mut self, path: impl Into<PathBuf>, interval: Duration) -> Self {
        self.mapping = Arc::new(IpScopeMap::from_file(path));
        self.refresh_interval = interval;
        self
    }

    pub fn mapping(&self) -> &IpScopeMap {
        &self.mapping
    }

    /// Starts the mapping refresh loop. No-op without a mapping file or when already running.
    pub async fn start_refresh(&self, cancel: CancellationToken) -> bool {
        if self.mapping.source().is_none() {
            return false;
        }
        let mut slot = self.refresh.lock().await;
        if slot.as_ref().is_some_and(|h| !h.is_finished()) {
            return false;
        }
        *slot = Some(spawn_refresh(self.mapping.clone(), self.refresh_interval, cancel));
        info!(interval_secs = self.refresh_interval.as_secs(), "IP mapping refresh started");
        true
    }

    /// Stops the refresh loop and waits for it to exit.
    pub async fn stop_refresh(&self) {
        let handle = self.refresh.lock().await.take();
        if let Some(handle) = handle {
            handle.stop().await;
        }
    }

    fn policies_url(&self) -> String {
        format!("{}/{}/oran-policies/", self.base_url, self.service_id)
    }

    fn policy_url(&self, id: &str) -> String {
        format!("{}/{}/oran-policies/{id}", self.base_url, self.service_id)
    }

    /// Builds the policy for `request` without sending it.
    pub fn build_policy(&self, request: &CreateSession) -> Result<OranPolicy, BridgeError> {
        let (qos_prio, flow_id) = priority_of(&request.qos_profile).ok_or_else(|| {
            BridgeError::validation(
                NAME,
                format!(
                    "unsupported qosProfile `{}`, supported: {}",
                    request.qos_profile,
                    PRIORITIES
                        .iter()
                        .map(|(name, _, _)| *name)
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            )
        })?;

        let candidates = ip_candidates(request.device.as_ref());
        if candidates.is_empty() {
            return Err(BridgeError::MissingIdentifier);
        }
        let cell = self.mapping.resolve(candidates.iter().copied()).ok_or_else(|| {
            BridgeError::validation(
                NAME,
                format!("no cell mapping for device addresses {}", candidates.join(", ")),
            )
        })?;

        Ok(OranPolicy {
            policy_type: POLICY_TYPE_QOD.to_string(),
            policy_scope: PolicyScope { cell, flow_id },
            policy_statement: PolicyStatement {
                qos_prio: qos_prio.to_string(),
            },
            expiry: Some(request.duration),
            notification_uri: request.sink.clone(),
        })
    }

    /// Translates a RIC policy notification into a session.
    pub fn notification_to_session(
        &self,
        notification: &OranNotification,
        original: Option<&CreateSession>,
    ) -> Session {
        let id = notification.resource_id().unwrap_or_default();
        let mut session = active_session(id, original, None, None, Utc::now());
        if !notification.is_enforced() {
            session.qos_status = QosStatus::Unavailable;
        }
        session
    }
}

/// A session as the RIC reports it: AVAILABLE from `now`.
fn active_session(
    id: &str,
    original: Option<&CreateSession>,
    expiry: Option<u32>,
    notification_uri: Option<String>,
    now: DateTime<Utc>,
) -> Session {
    let request = original.cloned().unwrap_or_else(|| CreateSession {
        duration: expiry.unwrap_or_default(),
        ..CreateSession::default()
    });
    let mut session = Session::requested(id, &request);
    if notification_uri.is_some() {
        session.sink = notification_uri;
    }
    session.qos_status = QosStatus::Available;
    session.started_at = Some(now);
    let duration = original.map(|o| o.duration).or(expiry);
    session.expires_at = duration.map(|d| now + chrono::Duration::seconds(i64::from(d)));
    session
}

#[async_trait]
impl BackendAdapter for OranClient {
    fn name(&self) -> &str {
        NAME
    }

    fn domain(&self) -> AdapterDomain {
        AdapterDomain::Oran
    }

    fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    fn as_qod(&self) -> Option<&dyn QodAdapter> {
        Some(self)
    }

    async fn health_check(&self) -> Result<HealthStatus, BridgeError> {
        if self.mapping.snapshot().is_empty() {
            return Ok(HealthStatus::Degraded("IP mapping is empty".to_string()));
        }
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), BridgeError> {
        self.stop_refresh().await;
        Ok(())
    }
}

#[async_trait]
impl QodAdapter for OranClient {
    fn qod_capability(&self) -> Capability {
        Capability::OranQod
    }

    async fn create_session(&self, request: &CreateSession) -> Result<Session, BridgeError> {
        self.capabilities.require(NAME, Capability::OranQod)?;
        let policy = self.build_policy(request)?;
        let body = serde_json::to_value(&policy)
            .map_err(|e| BridgeError::Internal(format!("failed to encode policy: {e}")))?;

        let response = match self.transport.post(&self.policies_url(), &body).await {
            Ok(response) => response.unwrap_or(Value::Null),
            Err(e @ BridgeError::BackendHttp { .. }) if self.return_on_error => {
                warn!(error = %e, "RIC rejected policy, reporting session unavailable");
                return Ok(unavailable_session("", request, &e));
            }
            Err(e) => return Err(e),
        };
        let id = policy_id(&response).ok_or_else(|| BridgeError::MalformedBackendResponse {
            detail: "policy creation returned no policy id".to_string(),
        })?;

        info!(policy_id = %id, flow_id = policy.policy_scope.flow_id, "RIC policy created");
        Ok(Session::requested(id, request))
    }

    async fn get_session(
        &self,
        session_id: &str,
        original: Option<&CreateSession>,
    ) -> Result<Session, BridgeError> {
        self.capabilities.require(NAME, Capability::OranQod)?;
        let response = match self.transport.get(&self.policy_url(session_id)).await {
            Ok(response) => response.unwrap_or(Value::Null),
            Err(e @ BridgeError::BackendHttp { .. }) if self.fallback_unavailable => {
                warn!(
                    policy_id = session_id,
                    error = %e,
                    "policy lookup failed, reporting unavailable"
                );
                let request = original.cloned().unwrap_or_default();
                return Ok(unavailable_session(session_id, &request, &e));
            }
            Err(e) => return Err(e),
        };

        let id = policy_id(&response).unwrap_or_else(|| session_id.to_string());
        let expiry = response
            .get("expiry")
            .and_then(Value::as_u64)
            .and_then(|e| u32::try_from(e).ok());
        let notification_uri = response
            .get("notificationUri")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        if original.is_none() && expiry.is_none() {
            warn!(policy_id = %id, "policy has no expiry, session end time unknown");
        }
        Ok(active_session(&id, original, expiry, notification_uri, Utc::now()))
    }

    async fn delete_session(&self, session_id: &str) -> Result<(), BridgeError> {
        self.capabilities.require(NAME, Capability::OranQod)?;
        self.transport.delete(&self.policy_url(session_id)).await?;
        info!(policy_id = session_id, "RIC policy deleted");
        Ok(())
    }
}
