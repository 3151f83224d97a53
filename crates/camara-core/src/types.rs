// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canonical CAMARA types shared by every backend adapter.
//!
//! These are the normalized request and response shapes that the REST
//! front-end hands to the translation engine and receives back. Field names
//! serialize in the CAMARA camelCase convention and absent optional fields are
//! omitted from the JSON output.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::BridgeError;

static PHONE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+[1-9][0-9]{4,14}$").expect("static regex"));

static HASHED_PHONE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-fA-F0-9]{64}$").expect("static regex"));

static QOS_PROFILE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_.-]+$").expect("static regex"));

/// Error code returned when an extension is attempted on a session that is not AVAILABLE.
pub const SESSION_EXTENSION_NOT_ALLOWED: &str = "QUALITY_ON_DEMAND.SESSION_EXTENSION_NOT_ALLOWED";

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Backend is reachable and operational.
    Healthy,
    /// Backend answered but reported a problem.
    Degraded(String),
    /// Backend is not operational.
    Unhealthy(String),
}

/// The family an adapter belongs to. The registry holds one active adapter per domain.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AdapterDomain {
    /// 5G core / NEF style backends.
    Network,
    /// O-RAN near-RT RIC backends.
    Oran,
}

/// An operation-support tag declared statically by each backend adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, Serialize,
    Deserialize,
)]
pub enum Capability {
    #[strum(serialize = "qod")]
    #[serde(rename = "qod")]
    Qod,
    #[strum(serialize = "traffic_influence")]
    #[serde(rename = "traffic_influence")]
    TrafficInfluence,
    #[strum(serialize = "location_retrieval")]
    #[serde(rename = "location_retrieval")]
    LocationRetrieval,
    #[strum(serialize = "core_control")]
    #[serde(rename = "core_control")]
    CoreControl,
    #[strum(serialize = "device_status")]
    #[serde(rename = "device_status")]
    DeviceStatus,
    #[strum(serialize = "number_verification")]
    #[serde(rename = "number_verification")]
    NumberVerification,
    #[strum(serialize = "oran-qod")]
    #[serde(rename = "oran-qod")]
    OranQod,
    #[strum(serialize = "oran-performance")]
    #[serde(rename = "oran-performance")]
    OranPerformance,
}

/// Connection parameters for one backend adapter.
///
/// Built once from configuration and handed to the adapter by value; the
/// adapter never mutates it afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendAdapterConfig {
    pub base_url: String,
    pub service_id: String,
    pub extra: BTreeMap<String, String>,
}

impl BackendAdapterConfig {
    pub fn new(base_url: impl Into<String>, service_id: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            service_id: service_id.into(),
            extra: BTreeMap::new(),
        }
    }

    /// Adds a backend-specific parameter.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Returns a backend-specific parameter, treating blank values as absent.
    pub fn extra(&self, key: &str) -> Option<&str> {
        self.extra
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    pub fn extra_or(&self, key: &str, default: &str) -> String {
        self.extra(key).unwrap_or(default).to_string()
    }

    /// The base URL without a trailing slash.
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

// --- Device identity ---

/// IPv4 addressing of a device as seen from the network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceIpv4Addr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_port: Option<u16>,
}

/// A device identifier. At least one field must be populated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_access_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4_address: Option<DeviceIpv4Addr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_address: Option<String>,
}

impl Device {
    /// A device identified only by an IPv4 address used as both public and private address.
    pub fn from_ipv4(addr: impl Into<String>) -> Self {
        let addr = addr.into();
        Self {
            ipv4_address: Some(DeviceIpv4Addr {
                public_address: Some(addr.clone()),
                private_address: Some(addr),
                public_port: None,
            }),
            ..Self::default()
        }
    }

    pub fn public_ipv4(&self) -> Option<&str> {
        self.ipv4_address
            .as_ref()
            .and_then(|a| a.public_address.as_deref())
            .filter(|a| !a.is_empty())
    }

    pub fn private_ipv4(&self) -> Option<&str> {
        self.ipv4_address
            .as_ref()
            .and_then(|a| a.private_address.as_deref())
            .filter(|a| !a.is_empty())
    }

    /// Number of identifier kinds populated on this device.
    pub fn populated_count(&self) -> usize {
        [
            self.phone_number.is_some(),
            self.network_access_identifier.is_some(),
            self.public_ipv4().is_some() || self.private_ipv4().is_some(),
            self.ipv6_address.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.populated_count() == 0
    }

    fn validation_errors(&self, errors: &mut Vec<String>) {
        if self.is_empty() {
            errors.push("device must carry at least one identifier".to_string());
        }
        if let Some(phone) = &self.phone_number
            && !PHONE_NUMBER.is_match(phone)
        {
            errors.push(format!("device.phoneNumber `{phone}` is not in E.164 format"));
        }
    }
}

/// Address of the application server the device talks to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationServer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_address: Option<String>,
}

impl ApplicationServer {
    pub fn ipv4(addr: impl Into<String>) -> Self {
        Self {
            ipv4_address: Some(addr.into()),
            ipv6_address: None,
        }
    }

    /// The IPv4 address when present, otherwise the IPv6 address.
    pub fn address(&self) -> Option<&str> {
        self.ipv4_address
            .as_deref()
            .or(self.ipv6_address.as_deref())
            .filter(|a| !a.is_empty())
    }
}

/// An inclusive port range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRange {
    pub from: u16,
    pub to: u16,
}

/// Ports of one side of a flow, as explicit ports and/or ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortsSpec {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ranges: Vec<PortRange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<u16>,
}

impl PortsSpec {
    pub fn ports(ports: impl IntoIterator<Item = u16>) -> Self {
        Self {
            ranges: Vec::new(),
            ports: ports.into_iter().collect(),
        }
    }

    pub fn ranges(ranges: impl IntoIterator<Item = (u16, u16)>) -> Self {
        Self {
            ranges: ranges
                .into_iter()
                .map(|(from, to)| PortRange { from, to })
                .collect(),
            ports: Vec::new(),
        }
    }
}

// --- Quality on demand ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QosStatus {
    Requested,
    Available,
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusInfo {
    DurationExpired,
    NetworkTerminated,
    DeleteRequested,
}

/// A request to create a quality-on-demand session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<Device>,
    pub application_server: ApplicationServer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_ports: Option<PortsSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_server_ports: Option<PortsSpec>,
    pub qos_profile: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sink: Option<String>,
    pub duration: u32,
}

impl CreateSession {
    /// Checks the request shape. Returns every problem found, not just the first.
    pub fn validation_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();
        match &self.device {
            Some(device) => device.validation_errors(&mut errors),
            None => errors.push("device is required".to_string()),
        }
        if self.application_server.address().is_none() {
            errors.push("applicationServer must carry an IPv4 or IPv6 address".to_string());
        }
        let len = self.qos_profile.chars().count();
        if !(3..=256).contains(&len) || !QOS_PROFILE_NAME.is_match(&self.qos_profile) {
            errors.push(format!("qosProfile `{}` is not a valid profile name", self.qos_profile));
        }
        if self.duration < 1 {
            errors.push("duration must be at least 1 second".to_string());
        }
        for spec in [&self.device_ports, &self.application_server_ports]
            .into_iter()
            .flatten()
        {
            for range in &spec.ranges {
                if range.from > range.to {
                    errors.push(format!("port range {}-{} is inverted", range.from, range.to));
                }
            }
        }
        errors
    }
}

/// A quality-on-demand session as reported to API consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<Device>,
    pub application_server: ApplicationServer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_ports: Option<PortsSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_server_ports: Option<PortsSpec>,
    pub qos_profile: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sink: Option<String>,
    pub duration: u32,
    pub qos_status: QosStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_info: Option<StatusInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    /// Backend failure behind an UNAVAILABLE session reported instead of an error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl Session {
    /// A freshly created session echoing the request, in status REQUESTED.
    pub fn requested(session_id: impl Into<String>, request: &CreateSession) -> Self {
        Self {
            session_id: session_id.into(),
            device: request.device.clone(),
            application_server: request.application_server.clone(),
            device_ports: request.device_ports.clone(),
            application_server_ports: request.application_server_ports.clone(),
            qos_profile: request.qos_profile.clone(),
            sink: request.sink.clone(),
            duration: request.duration,
            qos_status: QosStatus::Requested,
            status_info: None,
            started_at: None,
            expires_at: None,
            error: None,
        }
    }

    /// The request this session answers, for adapters that need it on refresh.
    pub fn to_request(&self) -> CreateSession {
        CreateSession {
            device: self.device.clone(),
            application_server: self.application_server.clone(),
            device_ports: self.device_ports.clone(),
            application_server_ports: self.application_server_ports.clone(),
            qos_profile: self.qos_profile.clone(),
            sink: self.sink.clone(),
            duration: self.duration,
        }
    }

    /// Marks the session as confirmed by the backend.
    pub fn confirm(&mut self, now: DateTime<Utc>) {
        self.qos_status = QosStatus::Available;
        self.status_info = None;
        let started = *self.started_at.get_or_insert(now);
        if self.expires_at.is_none() {
            self.expires_at = Some(started + Duration::seconds(i64::from(self.duration)));
        }
    }

    /// Marks the session as torn down for the given reason.
    pub fn terminate(&mut self, reason: StatusInfo) {
        self.qos_status = QosStatus::Unavailable;
        self.status_info = Some(reason);
    }

    /// Extends a running session.
    ///
    /// Only an AVAILABLE session can be extended. Any other status yields a
    /// conflict and leaves `duration` and `expires_at` untouched.
    pub fn extend(&mut self, additional_secs: u32) -> Result<(), BridgeError> {
        if self.qos_status != QosStatus::Available {
            return Err(BridgeError::Conflict {
                code: SESSION_EXTENSION_NOT_ALLOWED.to_string(),
                message: format!(
                    "session {} is {} and cannot be extended",
                    self.session_id, self.qos_status
                ),
            });
        }
        self.duration = self.duration.saturating_add(additional_secs);
        if let Some(expires_at) = self.expires_at {
            self.expires_at = Some(expires_at + Duration::seconds(i64::from(additional_secs)));
        }
        Ok(())
    }
}

// --- Traffic influence ---

/// Lifecycle state of a traffic-influence resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TrafficInfluenceState {
    Ordered,
    Created,
    Active,
    Error,
    DeletionInProgress,
    Deleted,
}

impl TrafficInfluenceState {
    /// Whether moving from `self` to `next` is a legal transition.
    ///
    /// States only move forward, except that an active resource is re-ordered
    /// while a modification is applied, and can fall into `error` when the
    /// backend rejects a call.
    pub fn can_transition_to(self, next: Self) -> bool {
        use TrafficInfluenceState::*;
        matches!(
            (self, next),
            (Ordered, Created | Active | Error | DeletionInProgress)
                | (Created, Active | Error | DeletionInProgress)
                | (Active, Ordered | Error | DeletionInProgress)
                | (Error, DeletionInProgress)
                | (DeletionInProgress, Deleted | Error)
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceTrafficFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_port: Option<u16>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationTrafficFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_protocol: Option<String>,
}

/// A traffic-influence resource steering device traffic to an edge application instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficInfluence {
    #[serde(rename = "trafficInfluenceID", default, skip_serializing_if = "Option::is_none")]
    pub traffic_influence_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_consumer_id: Option<String>,
    pub app_id: String,
    pub app_instance_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_cloud_region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_cloud_zone_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_traffic_filters: Option<SourceTrafficFilters>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_traffic_filters: Option<DestinationTrafficFilters>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_auth_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<Device>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<TrafficInfluenceState>,
}

// --- Location retrieval ---

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRetrievalRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<Device>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_surface: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
}

/// A geographic area, tagged by `areaType` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "areaType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Area {
    Circle { center: Point, radius: f64 },
    Polygon { boundary: Vec<Point> },
}

/// How trustworthy the coordinates of a [`Location`] are.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LocationPrecision {
    /// Coordinates reported by the backend.
    #[default]
    Precise,
    /// Placeholder area built because the backend supplied no coordinates.
    Synthesized,
}

impl LocationPrecision {
    pub fn is_precise(&self) -> bool {
        matches!(self, LocationPrecision::Precise)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub last_location_time: DateTime<Utc>,
    pub area: Area,
    #[serde(default, skip_serializing_if = "LocationPrecision::is_precise")]
    pub precision: LocationPrecision,
    /// Cell the device was seen in, carried along for synthesized areas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell_id: Option<String>,
}

// --- Device status and number verification ---

/// A public land mobile network id. Identity services spell the keys either way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plmn {
    #[serde(default, alias = "Mcc")]
    pub mcc: String,
    #[serde(default, alias = "Mnc")]
    pub mnc: String,
}

impl Plmn {
    pub fn new(mcc: impl Into<String>, mnc: impl Into<String>) -> Self {
        Self {
            mcc: mcc.into(),
            mnc: mnc.into(),
        }
    }
}

/// How a UE profile is looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UeLookup {
    Ip(String),
    Supi(String),
    Msisdn(String),
}

impl UeLookup {
    pub fn kind(&self) -> &'static str {
        match self {
            UeLookup::Ip(_) => "ip",
            UeLookup::Supi(_) => "supi",
            UeLookup::Msisdn(_) => "msisdn",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            UeLookup::Ip(v) | UeLookup::Supi(v) | UeLookup::Msisdn(v) => v,
        }
    }
}

impl std::fmt::Display for UeLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind(), self.value())
    }
}

/// Subscriber record held by a core's UE identity service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UeProfile {
    #[serde(default, alias = "supi", skip_serializing_if = "Option::is_none")]
    pub supi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msisdn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    /// `REGISTERED`, `DEREGISTERED` or `NOT_REGISTERED`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_status: Option<String>,
    /// `CONNECTED` or `IDLE`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plmn: Option<Plmn>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdu_sessions: Option<serde_json::Value>,
}

impl UeProfile {
    pub fn has_pdu_sessions(&self) -> bool {
        match &self.pdu_sessions {
            Some(serde_json::Value::Object(map)) => !map.is_empty(),
            Some(serde_json::Value::Array(list)) => !list.is_empty(),
            _ => false,
        }
    }

    /// CAMARA connectivity of this UE.
    ///
    /// A deregistered UE is never connected. A connected UE with a PDU
    /// session carries data; without one, or while idle, it can still be
    /// paged for SMS.
    pub fn connectivity(&self) -> ConnectivityStatus {
        let upper = |v: &Option<String>| v.as_deref().unwrap_or_default().to_ascii_uppercase();
        if matches!(
            upper(&self.registration_status).as_str(),
            "DEREGISTERED" | "NOT_REGISTERED"
        ) {
            return ConnectivityStatus::NotConnected;
        }
        match upper(&self.connection_status).as_str() {
            "CONNECTED" if self.has_pdu_sessions() => ConnectivityStatus::ConnectedData,
            "CONNECTED" | "IDLE" => ConnectivityStatus::ConnectedSms,
            _ => ConnectivityStatus::NotConnected,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectivityStatus {
    ConnectedData,
    ConnectedSms,
    NotConnected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReachabilityStatus {
    pub reachability_status: ConnectivityStatus,
    pub last_status_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoamingStatus {
    pub roaming: bool,
    /// ISO 3166-1 alpha-2 code of the serving network's country.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_name: Option<Vec<String>>,
}

/// The number to check against the one the network allocated to the device.
///
/// Exactly one of the two fields must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NumberVerificationRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// Lowercase or uppercase hex SHA-256 of the E.164 number, `+` included.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashed_phone_number: Option<String>,
}

impl NumberVerificationRequest {
    pub fn plain(phone_number: impl Into<String>) -> Self {
        Self {
            phone_number: Some(phone_number.into()),
            hashed_phone_number: None,
        }
    }

    pub fn hashed(digest: impl Into<String>) -> Self {
        Self {
            phone_number: None,
            hashed_phone_number: Some(digest.into()),
        }
    }

    pub fn validation_errors(&self) -> Vec<String> {
        let phone = self.phone_number.as_deref().filter(|p| !p.is_empty());
        let hashed = self.hashed_phone_number.as_deref().filter(|h| !h.is_empty());
        let mut errors = Vec::new();
        match (phone, hashed) {
            (None, None) => {
                errors.push("either phoneNumber or hashedPhoneNumber is required".to_string())
            }
            (Some(_), Some(_)) => errors
                .push("only one of phoneNumber or hashedPhoneNumber may be given".to_string()),
            _ => {}
        }
        if let Some(phone) = phone
            && !PHONE_NUMBER.is_match(phone)
        {
            errors.push(format!("phoneNumber `{phone}` is not in E.164 format"));
        }
        if let Some(hashed) = hashed
            && !HASHED_PHONE_NUMBER.is_match(hashed)
        {
            errors.push("hashedPhoneNumber must be 64 hex characters".to_string());
        }
        errors
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberVerification {
    pub device_phone_number_verified: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevicePhoneNumber {
    pub device_phone_number: String,
}

// --- Errors ---

/// The CAMARA error envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub status: u16,
    pub code: String,
    pub message: String,
}
