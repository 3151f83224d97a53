// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canonical request fixtures.

use serde_json::{Value, json};

use camara_core::types::{
    ApplicationServer, CreateSession, Device, LocationRetrievalRequest, TrafficInfluence,
};

/// A QoD request for an IPv4 device with unset ports.
pub fn qod_request(device_ip: &str, server_ip: &str, profile: &str) -> CreateSession {
    CreateSession {
        device: Some(Device::from_ipv4(device_ip)),
        application_server: ApplicationServer::ipv4(server_ip),
        device_ports: None,
        application_server_ports: None,
        qos_profile: profile.to_string(),
        sink: Some("https://application-server.example.com/notifications".to_string()),
        duration: 3600,
    }
}

pub fn traffic_influence_request(
    device_ip: &str,
    instance: &str,
    zone: Option<&str>,
) -> TrafficInfluence {
    TrafficInfluence {
        app_id: "app-edge-demo".to_string(),
        app_instance_id: instance.to_string(),
        edge_cloud_zone_id: zone.map(str::to_string),
        notification_uri: Some("https://application-server.example.com/ti".to_string()),
        device: Some(Device::from_ipv4(device_ip)),
        ..TrafficInfluence::default()
    }
}

pub fn location_request(phone: &str) -> LocationRetrievalRequest {
    LocationRetrievalRequest {
        device: Some(Device {
            phone_number: Some(phone.to_string()),
            ..Device::default()
        }),
        max_age: Some(60),
        max_surface: None,
    }
}

/// A backend answer carrying a `self` link to `{collection}/{id}`.
pub fn created(collection: &str, id: &str) -> Value {
    json!({ "self": format!("{collection}/{id}") })
}
