// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as known backend names, URL schemes and positive intervals.

use crate::diagnostic::{ConfigError, suggest_key};
use crate::model::{BridgeConfig, NETWORK_BACKENDS, ORAN_BACKENDS};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &BridgeConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.bridge.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "bridge.log_level `{}` must be one of {}",
                config.bridge.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.bridge.request_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "bridge.request_timeout_secs must be at least 1".to_string(),
        });
    }

    if let Some(network) = &config.network {
        validate_backend_section(
            "network",
            &network.backend,
            NETWORK_BACKENDS,
            &network.base_url,
            &network.service_id,
            &mut errors,
        );
    }

    if let Some(oran) = &config.oran {
        validate_backend_section(
            "oran",
            &oran.backend,
            ORAN_BACKENDS,
            &oran.base_url,
            &oran.service_id,
            &mut errors,
        );
        if oran.refresh_interval_secs == 0 {
            errors.push(ConfigError::Validation {
                message: "oran.refresh_interval_secs must be at least 1".to_string(),
            });
        }
        if let Some(path) = &oran.ip_mapping_file
            && path.as_os_str().is_empty()
        {
            errors.push(ConfigError::Validation {
                message: "oran.ip_mapping_file must not be empty when set".to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_backend_section(
    section: &str,
    backend: &str,
    known: &[&str],
    base_url: &str,
    service_id: &str,
    errors: &mut Vec<ConfigError>,
) {
    if !known.contains(&backend) {
        errors.push(ConfigError::UnknownBackend {
            section: section.to_string(),
            name: backend.to_string(),
            suggestion: suggest_key(backend, known),
            valid_backends: known.join(", "),
        });
    }

    let url = base_url.trim();
    if url.is_empty() {
        errors.push(ConfigError::Validation {
            message: format!("{section}.base_url must not be empty"),
        });
    } else if !(url.starts_with("http://") || url.starts_with("https://")) {
        errors.push(ConfigError::Validation {
            message: format!("{section}.base_url `{url}` must start with http:// or https://"),
        });
    }

    if service_id.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: format!("{section}.service_id must not be empty"),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NetworkConfig, OranConfig};

    fn network(backend: &str) -> NetworkConfig {
        NetworkConfig {
            backend: backend.to_string(),
            base_url: "http://core-simulator:8080".to_string(),
            service_id: "nef".to_string(),
            extra: Default::default(),
        }
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&BridgeConfig::default()).is_ok());
    }

    #[test]
    fn configured_backend_validates() {
        let config = BridgeConfig {
            network: Some(network("coresim")),
            ..BridgeConfig::default()
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn unknown_backend_gets_suggestion() {
        let config = BridgeConfig {
            network: Some(network("open5g")),
            ..BridgeConfig::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(
            e,
            ConfigError::UnknownBackend { suggestion: Some(s), .. } if s == "open5gs"
        )));
    }

    #[test]
    fn empty_service_id_and_bad_scheme_both_reported() {
        let mut net = network("oai");
        net.service_id = " ".to_string();
        net.base_url = "ftp://nef".to_string();
        let config = BridgeConfig {
            network: Some(net),
            ..BridgeConfig::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn zero_refresh_interval_fails() {
        let config = BridgeConfig {
            oran: Some(OranConfig {
                backend: "i2cat_ric".to_string(),
                base_url: "http://ric:8000".to_string(),
                service_id: "af".to_string(),
                ip_mapping_file: None,
                refresh_interval_secs: 0,
                extra: Default::default(),
            }),
            ..BridgeConfig::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(
                e,
                ConfigError::Validation { message } if message.contains("refresh_interval_secs")
            )
        ));
    }

    #[test]
    fn bad_log_level_fails() {
        let mut config = BridgeConfig::default();
        config.bridge.log_level = "loud".to_string();
        assert!(validate_config(&config).is_err());
    }
}
