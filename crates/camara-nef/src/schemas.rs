// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! 3GPP northbound payloads exchanged with NEF-style backends.
//!
//! Covers the AsSessionWithQoS (TS 29.122), TrafficInfluence (TS 29.522) and
//! MonitoringEvent (TS 29.122) subscription shapes. Optional fields that are
//! `None` are omitted from the serialized JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A packet-filter set identified by a flow id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowInfo {
    pub flow_id: u32,
    #[serde(default)]
    pub flow_descriptions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageThreshold {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_volume: Option<u64>,
}

/// Network slice selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snssai {
    pub sst: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sd: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsSessionWithQosSubscription {
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qos_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ue_ipv4_addr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ue_ipv6_addr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_info: Option<Vec<FlowInfo>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dnn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snssai: Option<Snssai>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_features: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_threshold: Option<UsageThreshold>,
}

impl AsSessionWithQosSubscription {
    /// The first flow description, where the application server address lives.
    pub fn first_flow_description(&self) -> Option<&str> {
        self.flow_info
            .as_ref()?
            .first()?
            .flow_descriptions
            .first()
            .map(String::as_str)
    }
}

/// Routing target of a traffic-influence subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteToLocation {
    pub dnai: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficInfluSub {
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub af_service_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub af_app_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dnn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snssai: Option<Snssai>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4_addr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_addr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_destination: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub traffic_filters: Vec<FlowInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub traffic_routes: Vec<RouteToLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_features: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringEventSubscription {
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msisdn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4_addr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_addr: Option<String>,
    pub notification_destination: String,
    pub monitoring_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_number_of_reports: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_features: Option<String>,
}

/// Age of a location fix, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationMin {
    pub duration: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeographicalCoordinates {
    pub lon: f64,
    pub lat: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointList {
    pub geographical_coords: Vec<GeographicalCoordinates>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NefPolygon {
    pub point_list: PointList,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeographicArea {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polygon: Option<NefPolygon>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_of_location_info: Option<DurationMin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_area_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enode_b_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geographic_area: Option<GeographicArea>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringEventReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msisdn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitoring_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_info: Option<LocationInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn qos_subscription_omits_absent_fields() {
        let sub = AsSessionWithQosSubscription {
            qos_reference: Some("qos-e".into()),
            ue_ipv4_addr: Some("12.1.0.2".into()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&sub).unwrap(),
            json!({"qosReference": "qos-e", "ueIpv4Addr": "12.1.0.2"})
        );
    }

    #[test]
    fn self_link_uses_reserved_name() {
        let sub: TrafficInfluSub =
            serde_json::from_value(json!({"self": "http://nef/subscriptions/7", "afAppId": "app"}))
                .unwrap();
        assert_eq!(sub.self_link.as_deref(), Some("http://nef/subscriptions/7"));
        assert_eq!(sub.af_app_id.as_deref(), Some("app"));
    }

    #[test]
    fn monitoring_report_parses_polygon() {
        let report: MonitoringEventReport = serde_json::from_value(json!({
            "eventTime": "2025-01-01T12:00:00Z",
            "locationInfo": {
                "ageOfLocationInfo": {"duration": 5},
                "cellId": "cell-1",
                "geographicArea": {"polygon": {"point_list": {"geographical_coords": [
                    {"lon": 2.0, "lat": 48.0}, {"lon": 2.1, "lat": 48.0}, {"lon": 2.1, "lat": 48.1}
                ]}}}
            }
        }))
        .unwrap();
        let info = report.location_info.unwrap();
        assert_eq!(info.age_of_location_info.unwrap().duration, 5);
        let coords = info
            .geographic_area
            .unwrap()
            .polygon
            .unwrap()
            .point_list
            .geographical_coords;
        assert_eq!(coords.len(), 3);
    }
}
