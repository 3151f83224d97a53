// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in backend catalog.
//!
//! Static descriptions of every backend compiled into the bridge. Used for
//! `backends` listings and for the "available" list of unknown-name errors.
//! No adapter is constructed and no network calls are made.

use camara_core::types::{AdapterDomain, Capability};

/// Static description of a compiled-in backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendDescriptor {
    pub name: &'static str,
    pub domain: AdapterDomain,
    pub description: &'static str,
    pub capabilities: &'static [Capability],
}

const CATALOG: &[BackendDescriptor] = &[
    BackendDescriptor {
        name: camara_nef::backends::coresim::NAME,
        domain: AdapterDomain::Network,
        description: "5G core simulator with NEF northbound and OAM control API",
        capabilities: &[
            Capability::Qod,
            Capability::TrafficInfluence,
            Capability::LocationRetrieval,
            Capability::CoreControl,
            Capability::DeviceStatus,
            Capability::NumberVerification,
        ],
    },
    BackendDescriptor {
        name: camara_nef::backends::open5gs::NAME,
        domain: AdapterDomain::Network,
        description: "Open5GS core through its NEF",
        capabilities: &[Capability::Qod, Capability::LocationRetrieval],
    },
    BackendDescriptor {
        name: camara_nef::backends::open5gcore::NAME,
        domain: AdapterDomain::Network,
        description: "Fraunhofer Open5GCore NEF",
        capabilities: &[Capability::Qod],
    },
    BackendDescriptor {
        name: camara_nef::backends::oai::NAME,
        domain: AdapterDomain::Network,
        description: "OpenAirInterface core through its NEF",
        capabilities: &[Capability::Qod, Capability::TrafficInfluence],
    },
    BackendDescriptor {
        name: camara_oran::client::NAME,
        domain: AdapterDomain::Oran,
        description: "i2CAT near-RT RIC policy API",
        capabilities: &[Capability::OranQod, Capability::OranPerformance],
    },
];

/// Every compiled-in backend, network cores first.
pub fn builtin_catalog() -> &'static [BackendDescriptor] {
    CATALOG
}

/// Looks up a backend by name.
pub fn describe(name: &str) -> Option<&'static BackendDescriptor> {
    CATALOG.iter().find(|d| d.name == name)
}

/// Names of the backends serving `domain`.
pub fn names(domain: AdapterDomain) -> Vec<String> {
    CATALOG
        .iter()
        .filter(|d| d.domain == domain)
        .map(|d| d.name.to_string())
        .collect()
}

/// Names of every compiled-in backend.
pub fn all_names() -> Vec<String> {
    CATALOG.iter().map(|d| d.name.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use camara_config::model::{NETWORK_BACKENDS, ORAN_BACKENDS};

    #[test]
    fn catalog_matches_config_backend_names() {
        assert_eq!(names(AdapterDomain::Network), NETWORK_BACKENDS);
        assert_eq!(names(AdapterDomain::Oran), ORAN_BACKENDS);
    }

    #[test]
    fn describe_finds_known_backends() {
        let ric = describe("i2cat_ric").unwrap();
        assert_eq!(ric.domain, AdapterDomain::Oran);
        assert!(ric.capabilities.contains(&Capability::OranQod));
        assert!(describe("free5gc").is_none());
    }
}
