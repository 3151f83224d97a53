// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Device identity resolution.
//!
//! Picks a single usable network address out of the polymorphic CAMARA device
//! object, in a fixed order: public IPv4, IPv6, phone number, NAI.
//! Simulated backends may additionally declare an [`AddressPolicy`] that pins
//! IPv4 addresses to their allocation subnet.

use std::net::Ipv4Addr;

use strum::Display;
use tracing::warn;

use crate::error::BridgeError;
use crate::types::Device;

/// The kind of identifier a device was resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum AddressKind {
    Ipv4,
    Ipv6,
    Msisdn,
    Nai,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAddress {
    pub kind: AddressKind,
    pub value: String,
}

impl ResolvedAddress {
    pub fn is_ip(&self) -> bool {
        matches!(self.kind, AddressKind::Ipv4 | AddressKind::Ipv6)
    }
}

/// Resolves the device to one address, or fails with [`BridgeError::MissingIdentifier`].
pub fn resolve(device: Option<&Device>) -> Result<ResolvedAddress, BridgeError> {
    let device = device.ok_or(BridgeError::MissingIdentifier)?;
    let non_empty = |v: Option<&str>| v.map(str::trim).filter(|v| !v.is_empty()).map(String::from);

    let candidates = [
        (AddressKind::Ipv4, non_empty(device.public_ipv4())),
        (AddressKind::Ipv6, non_empty(device.ipv6_address.as_deref())),
        (AddressKind::Msisdn, non_empty(device.phone_number.as_deref())),
        (
            AddressKind::Nai,
            non_empty(device.network_access_identifier.as_deref()),
        ),
    ];

    candidates
        .into_iter()
        .find_map(|(kind, value)| value.map(|value| ResolvedAddress { kind, value }))
        .ok_or(BridgeError::MissingIdentifier)
}

/// An IPv4 allocation subnet with a substitute address.
///
/// Addresses outside the subnet (or missing, or unparseable) are replaced by
/// the fallback and the substitution is logged. Requests are never rejected
/// on these grounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressPolicy {
    network: Ipv4Addr,
    prefix: u8,
    fallback: Ipv4Addr,
}

impl AddressPolicy {
    /// Builds a policy from CIDR notation (`12.1.0.0/16`) and a fallback address.
    pub fn new(subnet: &str, fallback: &str) -> Result<Self, BridgeError> {
        let (addr, prefix) = subnet
            .split_once('/')
            .ok_or_else(|| BridgeError::Config(format!("subnet `{subnet}` is not in CIDR form")))?;
        let network: Ipv4Addr = addr
            .trim()
            .parse()
            .map_err(|e| BridgeError::Config(format!("invalid subnet address `{addr}`: {e}")))?;
        let prefix: u8 = prefix
            .trim()
            .parse()
            .ok()
            .filter(|p| *p <= 32)
            .ok_or_else(|| BridgeError::Config(format!("invalid subnet prefix in `{subnet}`")))?;
        let fallback: Ipv4Addr = fallback.trim().parse().map_err(|e| {
            BridgeError::Config(format!("invalid fallback address `{fallback}`: {e}"))
        })?;

        let policy = Self {
            network,
            prefix,
            fallback,
        };
        if !policy.contains(fallback) {
            return Err(BridgeError::Config(format!(
                "fallback address {fallback} is outside subnet {subnet}"
            )));
        }
        Ok(policy)
    }

    fn mask(&self) -> u32 {
        match self.prefix {
            0 => 0,
            p => u32::MAX << (32 - u32::from(p)),
        }
    }

    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        let mask = self.mask();
        u32::from(addr) & mask == u32::from(self.network) & mask
    }

    pub fn fallback(&self) -> Ipv4Addr {
        self.fallback
    }

    /// Returns the address to put on the wire for `addr`.
    pub fn apply(&self, addr: Option<&str>) -> String {
        let Some(raw) = addr.map(str::trim).filter(|a| !a.is_empty()) else {
            warn!(
                fallback = %self.fallback,
                "device has no IPv4 address, using fallback address"
            );
            return self.fallback.to_string();
        };

        match raw.parse::<Ipv4Addr>() {
            Ok(ip) if self.contains(ip) => raw.to_string(),
            Ok(_) => {
                warn!(
                    original = raw,
                    fallback = %self.fallback,
                    subnet = %format_args!("{}/{}", self.network, self.prefix),
                    "device address outside allocation subnet, substituting fallback address"
                );
                self.fallback.to_string()
            }
            Err(_) => {
                warn!(
                    original = raw,
                    fallback = %self.fallback,
                    "device address is not a valid IPv4 address, substituting fallback address"
                );
                self.fallback.to_string()
            }
        }
    }
}
