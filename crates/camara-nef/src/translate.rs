// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Response translation from 3GPP payloads back to the canonical model.

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use tracing::warn;

use camara_core::types::{
    ApplicationServer, Area, CreateSession, Device, Location, LocationPrecision, Point, Session,
    TrafficInfluence, TrafficInfluenceState,
};
use camara_core::BridgeError;

use crate::flows::destination_address;
use crate::schemas::{AsSessionWithQosSubscription, MonitoringEventReport, TrafficInfluSub};

/// Extracts the resource id from the `self` link of a backend response.
///
/// The id is the last non-empty path segment, ignoring any query string and
/// trailing slash.
pub fn extract_resource_id(response: &Value) -> Result<String, BridgeError> {
    let link = response
        .get("self")
        .and_then(Value::as_str)
        .ok_or_else(|| BridgeError::MalformedBackendResponse {
            detail: "response has no `self` link".to_string(),
        })?;

    link.split(['?', '#'])
        .next()
        .unwrap_or(link)
        .split('/')
        .rev()
        .find(|segment| !segment.is_empty())
        .map(str::to_string)
        .ok_or_else(|| BridgeError::MalformedBackendResponse {
            detail: format!("cannot extract a resource id from `{link}`"),
        })
}

/// Parses a typed payload out of a backend response.
pub fn parse<T: serde::de::DeserializeOwned>(
    response: Option<Value>,
    what: &str,
) -> Result<T, BridgeError> {
    let value = response.ok_or_else(|| BridgeError::MalformedBackendResponse {
        detail: format!("empty {what} response"),
    })?;
    serde_json::from_value(value).map_err(|e| BridgeError::MalformedBackendResponse {
        detail: format!("unexpected {what} payload: {e}"),
    })
}

/// Rebuilds a canonical session from a backend subscription.
///
/// Fields from `original` win; fields it lacks are recovered from the
/// subscription. The session is reported as AVAILABLE.
pub fn session_from_subscription(
    session_id: &str,
    raw: &AsSessionWithQosSubscription,
    original: Option<&CreateSession>,
    now: DateTime<Utc>,
) -> Session {
    let request = match original {
        Some(original) => original.clone(),
        None => CreateSession {
            device: raw.ue_ipv4_addr.as_deref().map(Device::from_ipv4).or_else(|| {
                raw.ue_ipv6_addr.as_ref().map(|v6| Device {
                    ipv6_address: Some(v6.clone()),
                    ..Device::default()
                })
            }),
            application_server: raw
                .first_flow_description()
                .and_then(destination_address)
                .map(ApplicationServer::ipv4)
                .unwrap_or_default(),
            device_ports: None,
            application_server_ports: None,
            qos_profile: raw.qos_reference.clone().unwrap_or_default(),
            sink: raw.notification_destination.clone(),
            duration: raw
                .usage_threshold
                .as_ref()
                .and_then(|t| t.duration)
                .unwrap_or_default(),
        },
    };

    let mut session = Session::requested(session_id, &request);
    session.confirm(now);
    session
}

/// Rebuilds a canonical traffic-influence resource from a backend subscription.
pub fn traffic_influence_from_subscription(id: &str, raw: &TrafficInfluSub) -> TrafficInfluence {
    let app_instance_id = raw
        .traffic_filters
        .first()
        .and_then(|flow| flow.flow_descriptions.first())
        .and_then(|filter| destination_address(filter))
        .unwrap_or_default();

    TrafficInfluence {
        traffic_influence_id: Some(id.to_string()),
        app_id: raw.af_app_id.clone().unwrap_or_default(),
        app_instance_id,
        edge_cloud_zone_id: raw.traffic_routes.first().map(|r| r.dnai.clone()),
        notification_uri: raw.notification_destination.clone(),
        device: raw.ipv4_addr.as_deref().map(Device::from_ipv4),
        state: Some(TrafficInfluenceState::Created),
        ..TrafficInfluence::default()
    }
}

/// Placeholder square reported when a backend returns no coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaceholderArea {
    pub center: Point,
    /// Half the side of the square, in degrees.
    pub half_side: f64,
}

impl Default for PlaceholderArea {
    fn default() -> Self {
        Self {
            center: Point {
                latitude: 48.8566,
                longitude: 2.3522,
            },
            half_side: 0.001,
        }
    }
}

impl PlaceholderArea {
    /// Parses a `"lat,lon"` center.
    pub fn parse(raw: &str) -> Result<Self, BridgeError> {
        let invalid = || BridgeError::Config(format!("fallback_location `{raw}` is not `lat,lon`"));
        let (lat, lon) = raw.split_once(',').ok_or_else(invalid)?;
        let latitude: f64 = lat.trim().parse().map_err(|_| invalid())?;
        let longitude: f64 = lon.trim().parse().map_err(|_| invalid())?;
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(invalid());
        }
        Ok(Self {
            center: Point { latitude, longitude },
            ..Self::default()
        })
    }

    pub fn boundary(&self) -> Vec<Point> {
        let Point { latitude, longitude } = self.center;
        let d = self.half_side;
        vec![
            Point { latitude: latitude - d, longitude: longitude - d },
            Point { latitude: latitude - d, longitude: longitude + d },
            Point { latitude: latitude + d, longitude: longitude + d },
            Point { latitude: latitude + d, longitude: longitude - d },
        ]
    }
}

/// Translates a monitoring-event report into a canonical location.
///
/// A polygon with at least three vertices is reported as precise. Anything
/// less yields the placeholder square marked [`LocationPrecision::Synthesized`].
pub fn location_from_report(
    report: &MonitoringEventReport,
    placeholder: &PlaceholderArea,
    now: DateTime<Utc>,
) -> Result<Location, BridgeError> {
    let info = report
        .location_info
        .as_ref()
        .ok_or_else(|| BridgeError::MalformedBackendResponse {
            detail: "monitoring event report has no locationInfo".to_string(),
        })?;

    let age = info.age_of_location_info.map_or(0, |a| a.duration);
    let last_location_time = report.event_time.unwrap_or(now) - Duration::minutes(i64::from(age));

    let coords = info
        .geographic_area
        .as_ref()
        .and_then(|area| area.polygon.as_ref())
        .map(|polygon| polygon.point_list.geographical_coords.as_slice())
        .unwrap_or_default();

    if coords.len() >= 3 {
        return Ok(Location {
            last_location_time,
            area: Area::Polygon {
                boundary: coords
                    .iter()
                    .map(|c| Point {
                        latitude: c.lat,
                        longitude: c.lon,
                    })
                    .collect(),
            },
            precision: LocationPrecision::Precise,
            cell_id: info.cell_id.clone(),
        });
    }

    warn!(
        cell_id = info.cell_id.as_deref().unwrap_or("unknown"),
        vertices = coords.len(),
        "backend reported no usable coordinates, returning synthesized placeholder area"
    );
    Ok(Location {
        last_location_time,
        area: Area::Polygon {
            boundary: placeholder.boundary(),
        },
        precision: LocationPrecision::Synthesized,
        cell_id: info.cell_id.clone(),
    })
}
