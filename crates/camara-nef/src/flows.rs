// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flow descriptor synthesis.
//!
//! Expands device and server port specifications into IPFW-style packet
//! filters of the form `permit <dir> ip from <addr> <ports> to <addr> <ports>`.
//! Every (device port, server port) pair yields two filters: one for traffic
//! arriving at the device and one for traffic leaving the server. The filters
//! are then packed into a single [`FlowInfo`] whose one description joins
//! them all.

use camara_core::types::PortsSpec;

use crate::schemas::FlowInfo;

/// Token used when a side specifies no ports at all.
pub const ALL_PORTS: &str = "0-65535";

/// Separator between filters when they are joined into one description.
pub const JOIN_SEPARATOR: &str = ", ";

/// Flattens a port specification into string tokens.
///
/// Explicit ports come first, in input order, followed by ranges rendered as
/// `from-to`. A missing or empty specification yields `["0-65535"]`.
pub fn flatten_ports(spec: Option<&PortsSpec>) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    if let Some(spec) = spec {
        tokens.extend(spec.ports.iter().map(|p| p.to_string()));
        tokens.extend(spec.ranges.iter().map(|r| format!("{}-{}", r.from, r.to)));
    }
    if tokens.is_empty() {
        tokens.push(ALL_PORTS.to_string());
    }
    tokens
}

/// Builds the filter lines for every device/server port pair.
///
/// Returns exactly `2 * m * n` lines for `m` device tokens and `n` server tokens.
pub fn synthesize_filters(
    device_addr: &str,
    device_ports: Option<&PortsSpec>,
    server_addr: &str,
    server_ports: Option<&PortsSpec>,
) -> Vec<String> {
    let device_tokens = flatten_ports(device_ports);
    let server_tokens = flatten_ports(server_ports);

    let mut lines = Vec::with_capacity(2 * device_tokens.len() * server_tokens.len());
    for dp in &device_tokens {
        for sp in &server_tokens {
            lines.push(format!(
                "permit in ip from {device_addr} {dp} to {server_addr} {sp}"
            ));
            lines.push(format!(
                "permit out ip from {server_addr} {sp} to {device_addr} {dp}"
            ));
        }
    }
    lines
}

/// Packs filter lines into a single flow with one comma-joined description.
pub fn pack_flow(flow_id: u32, lines: &[String]) -> FlowInfo {
    FlowInfo {
        flow_id,
        flow_descriptions: vec![lines.join(JOIN_SEPARATOR)],
    }
}

/// A single host-to-host filter, as used by traffic steering and some QoD backends.
pub fn host_filter(direction: Option<&str>, from: &str, to: &str) -> String {
    match direction {
        Some(dir) => format!("permit {dir} ip from {from}/32 to {to}/32"),
        None => format!("permit ip {from}/32 to {to}/32"),
    }
}

/// Extracts the destination address from a filter line.
///
/// Takes the first token after the `to` keyword and strips any prefix length,
/// so both `... to 10.0.0.1 0-65535` and `... to 10.0.0.1/32` yield `10.0.0.1`.
pub fn destination_address(filter: &str) -> Option<String> {
    let tokens: Vec<&str> = filter.split_whitespace().collect();
    let to_idx = tokens.iter().position(|&t| t == "to")?;
    let addr = tokens.get(to_idx + 1)?;
    let addr = addr.trim_end_matches(',');
    let addr = addr.split('/').next().unwrap_or(addr);
    (!addr.is_empty()).then(|| addr.to_string())
}
