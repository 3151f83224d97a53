// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the CAMARA bridge.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::collections::BTreeMap;
use std::path::PathBuf;

use camara_core::BackendAdapterConfig;
use serde::{Deserialize, Serialize};

/// Backend names accepted in the `[network]` section.
pub const NETWORK_BACKENDS: &[&str] = &["coresim", "open5gs", "open5gcore", "oai"];

/// Backend names accepted in the `[oran]` section.
pub const ORAN_BACKENDS: &[&str] = &["i2cat_ric"];

/// Top-level bridge configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// The backend sections are optional; a bridge with neither configured can
/// still list backends and validate configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BridgeConfig {
    /// Process-wide settings.
    #[serde(default)]
    pub bridge: BridgeSettings,

    /// The active 5G core / NEF backend.
    #[serde(default)]
    pub network: Option<NetworkConfig>,

    /// The active O-RAN RIC backend.
    #[serde(default)]
    pub oran: Option<OranConfig>,
}

/// Process-wide settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BridgeSettings {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Timeout applied to every backend HTTP call.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Settings for a NEF-style core network backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkConfig {
    /// Backend name: `coresim`, `open5gs`, `open5gcore` or `oai`.
    pub backend: String,

    /// Base URL of the exposure API.
    pub base_url: String,

    /// Service (SCS/AS) identifier used in every resource path.
    #[serde(alias = "scs_as_id")]
    pub service_id: String,

    /// Backend-specific parameters, passed through to the adapter untouched.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl NetworkConfig {
    pub fn adapter_config(&self) -> BackendAdapterConfig {
        BackendAdapterConfig {
            base_url: self.base_url.clone(),
            service_id: self.service_id.clone(),
            extra: self.extra.clone(),
        }
    }
}

/// Settings for an O-RAN near-RT RIC backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OranConfig {
    /// Backend name: `i2cat_ric`.
    pub backend: String,

    /// Base URL of the RIC policy API.
    pub base_url: String,

    /// Service (SCS/AS) identifier used in every resource path.
    #[serde(alias = "scs_as_id")]
    pub service_id: String,

    /// JSON file mapping device IPs to cell scopes. Built-in entries are used when unset.
    #[serde(default)]
    pub ip_mapping_file: Option<PathBuf>,

    /// How often the mapping file is reloaded.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    /// Backend-specific parameters, passed through to the adapter untouched.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl OranConfig {
    /// Adapter config carrying the mapping file and refresh period as extras.
    pub fn adapter_config(&self) -> BackendAdapterConfig {
        let mut extra = self.extra.clone();
        if let Some(path) = &self.ip_mapping_file {
            extra.insert("ip_mapping_file".to_string(), path.display().to_string());
        }
        extra.insert(
            "refresh_interval_secs".to_string(),
            self.refresh_interval_secs.to_string(),
        );
        BackendAdapterConfig {
            base_url: self.base_url.clone(),
            service_id: self.service_id.clone(),
            extra,
        }
    }
}

fn default_refresh_interval_secs() -> u64 {
    60
}
