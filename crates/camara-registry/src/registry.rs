// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Active adapter registry.
//!
//! Holds at most one adapter per [`AdapterDomain`]. Each slot is an
//! [`ArcSwapOption`], so request handlers load the current adapter without
//! locking and a switch replaces the whole entry; adapter internals are never
//! mutated in place.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use camara_config::BridgeConfig;
use camara_core::{
    AdapterDomain, BackendAdapter, BackendAdapterConfig, BackendTransport, BridgeError,
};

use crate::factory;

struct Registered {
    adapter: Arc<dyn BackendAdapter>,
}

/// The adapters currently serving each domain.
pub struct AdapterRegistry {
    network: ArcSwapOption<Registered>,
    oran: ArcSwapOption<Registered>,
    transport: Arc<dyn BackendTransport>,
    cancel: CancellationToken,
}

impl AdapterRegistry {
    /// An empty registry. Adapters activated later share `transport`, and
    /// their background work stops when `cancel` fires.
    pub fn new(transport: Arc<dyn BackendTransport>, cancel: CancellationToken) -> Self {
        Self {
            network: ArcSwapOption::empty(),
            oran: ArcSwapOption::empty(),
            transport,
            cancel,
        }
    }

    /// Builds a registry with the backends named in `config`.
    pub async fn from_config(
        config: &BridgeConfig,
        transport: Arc<dyn BackendTransport>,
        cancel: CancellationToken,
    ) -> Result<Self, BridgeError> {
        let registry = Self::new(transport, cancel);
        if let Some(network) = &config.network {
            registry.switch(&network.backend, &network.adapter_config()).await?;
        }
        if let Some(oran) = &config.oran {
            registry.switch(&oran.backend, &oran.adapter_config()).await?;
        }
        Ok(registry)
    }

    fn slot(&self, domain: AdapterDomain) -> &ArcSwapOption<Registered> {
        match domain {
            AdapterDomain::Network => &self.network,
            AdapterDomain::Oran => &self.oran,
        }
    }

    /// Publishes `adapter` in its domain slot and returns the one it replaced.
    pub fn install(&self, adapter: Arc<dyn BackendAdapter>) -> Option<Arc<dyn BackendAdapter>> {
        let domain = adapter.domain();
        let previous = self
            .slot(domain)
            .swap(Some(Arc::new(Registered { adapter })));
        previous.map(|entry| entry.adapter.clone())
    }

    /// Activates backend `name` and makes it the active adapter of its domain.
    ///
    /// The replaced adapter, if any, is shut down after the swap. On error the
    /// registry is left untouched.
    pub async fn switch(
        &self,
        name: &str,
        config: &BackendAdapterConfig,
    ) -> Result<Arc<dyn BackendAdapter>, BridgeError> {
        let adapter = factory::activate(
            name,
            config,
            self.transport.clone(),
            self.cancel.child_token(),
        )
        .await?;

        if let Some(previous) = self.install(adapter.clone()) {
            info!(
                domain = %adapter.domain(),
                from = previous.name(),
                to = adapter.name(),
                "active backend switched"
            );
            if let Err(e) = previous.shutdown().await {
                warn!(
                    backend = previous.name(),
                    error = %e,
                    "replaced adapter failed to shut down"
                );
            }
        }
        Ok(adapter)
    }

    /// The active adapter of `domain`, if one is configured.
    pub fn get(&self, domain: AdapterDomain) -> Option<Arc<dyn BackendAdapter>> {
        self.slot(domain)
            .load_full()
            .map(|entry| entry.adapter.clone())
    }

    /// The active adapter of `domain`, or a configuration error.
    pub fn require(&self, domain: AdapterDomain) -> Result<Arc<dyn BackendAdapter>, BridgeError> {
        self.get(domain)
            .ok_or_else(|| BridgeError::Config(format!("no {domain} backend is configured")))
    }

    pub fn network(&self) -> Result<Arc<dyn BackendAdapter>, BridgeError> {
        self.require(AdapterDomain::Network)
    }

    pub fn oran(&self) -> Result<Arc<dyn BackendAdapter>, BridgeError> {
        self.require(AdapterDomain::Oran)
    }

    /// All active adapters, network first.
    pub fn adapters(&self) -> Vec<Arc<dyn BackendAdapter>> {
        [AdapterDomain::Network, AdapterDomain::Oran]
            .into_iter()
            .filter_map(|domain| self.get(domain))
            .collect()
    }

    /// Stops background work and shuts every adapter down.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        for domain in [AdapterDomain::Network, AdapterDomain::Oran] {
            let Some(entry) = self.slot(domain).swap(None) else {
                continue;
            };
            if let Err(e) = entry.adapter.shutdown().await {
                warn!(backend = entry.adapter.name(), error = %e, "adapter shutdown failed");
            }
        }
        info!("adapter registry shut down");
    }
}
