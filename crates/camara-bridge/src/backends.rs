// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `camara-bridge backends` command implementation.

use serde::Serialize;

use camara_core::HealthStatus;
use camara_registry::{AdapterRegistry, builtin_catalog};

/// One row of the backend listing.
#[derive(Debug, Serialize)]
pub struct BackendRow {
    pub name: &'static str,
    pub domain: String,
    pub description: &'static str,
    pub capabilities: Vec<String>,
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<String>,
}

fn describe_health(status: HealthStatus) -> String {
    match status {
        HealthStatus::Healthy => "healthy".to_string(),
        HealthStatus::Degraded(reason) => format!("degraded: {reason}"),
        HealthStatus::Unhealthy(reason) => format!("unhealthy: {reason}"),
    }
}

/// Lists every compiled-in backend and health-checks the active ones.
pub async fn list_backends(registry: &AdapterRegistry) -> Vec<BackendRow> {
    let mut rows = Vec::with_capacity(builtin_catalog().len());
    for entry in builtin_catalog() {
        let active = registry
            .get(entry.domain)
            .filter(|adapter| adapter.name() == entry.name);
        let health = match &active {
            Some(adapter) => Some(match adapter.health_check().await {
                Ok(status) => describe_health(status),
                Err(e) => format!("unhealthy: {e}"),
            }),
            None => None,
        };
        rows.push(BackendRow {
            name: entry.name,
            domain: entry.domain.to_string(),
            description: entry.description,
            capabilities: entry.capabilities.iter().map(ToString::to_string).collect(),
            active: active.is_some(),
            health,
        });
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use camara_core::BackendAdapterConfig;
    use camara_test_utils::RecordingTransport;
    use tokio_util::sync::CancellationToken;

    #[tokio::test]
    async fn active_backends_are_health_checked() {
        let registry =
            AdapterRegistry::new(Arc::new(RecordingTransport::new()), CancellationToken::new());
        registry
            .switch("i2cat_ric", &BackendAdapterConfig::new("http://ric:8000", "af"))
            .await
            .unwrap();

        let rows = list_backends(&registry).await;
        assert_eq!(rows.len(), builtin_catalog().len());

        let ric = rows.iter().find(|r| r.name == "i2cat_ric").unwrap();
        assert!(ric.active);
        assert_eq!(ric.health.as_deref(), Some("healthy"));
        assert_eq!(ric.capabilities, ["oran-qod", "oran-performance"]);

        let coresim = rows.iter().find(|r| r.name == "coresim").unwrap();
        assert!(!coresim.active);
        assert!(coresim.health.is_none());
    }
}
