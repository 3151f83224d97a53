// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend adapter construction by name.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use camara_core::{BackendAdapter, BackendAdapterConfig, BackendTransport, BridgeError};
use camara_nef::backends::{coresim, oai, open5gcore, open5gs};
use camara_nef::{CoreSimStrategy, NefClient, OaiStrategy, Open5gcoreStrategy, Open5gsStrategy};
use camara_oran::OranClient;

use crate::catalog;

/// Builds the adapter registered under `name`, bound to `config`.
///
/// The adapter is inert: background work such as the RIC mapping refresh is
/// only started by [`activate`].
pub fn resolve(
    name: &str,
    config: &BackendAdapterConfig,
    transport: Arc<dyn BackendTransport>,
) -> Result<Arc<dyn BackendAdapter>, BridgeError> {
    let adapter: Arc<dyn BackendAdapter> = match name {
        coresim::NAME => Arc::new(NefClient::new(CoreSimStrategy::new(config)?, transport)),
        open5gs::NAME => Arc::new(NefClient::new(Open5gsStrategy::new(config)?, transport)),
        open5gcore::NAME => Arc::new(NefClient::new(Open5gcoreStrategy::new(config)?, transport)),
        oai::NAME => Arc::new(NefClient::new(OaiStrategy::new(config)?, transport)),
        camara_oran::client::NAME => Arc::new(OranClient::new(config, transport)?),
        other => {
            return Err(BridgeError::UnknownBackend {
                name: other.to_string(),
                available: catalog::all_names(),
            });
        }
    };
    Ok(adapter)
}

/// Builds the adapter for `name` and starts its background work.
///
/// The RIC adapter's mapping refresh loop runs until `cancel` fires or the
/// adapter is shut down.
pub async fn activate(
    name: &str,
    config: &BackendAdapterConfig,
    transport: Arc<dyn BackendTransport>,
    cancel: CancellationToken,
) -> Result<Arc<dyn BackendAdapter>, BridgeError> {
    let adapter: Arc<dyn BackendAdapter> = if name == camara_oran::client::NAME {
        let client = Arc::new(OranClient::new(config, transport)?);
        client.start_refresh(cancel).await;
        client
    } else {
        resolve(name, config, transport)?
    };
    info!(
        backend = name,
        domain = %adapter.domain(),
        capabilities = adapter.capabilities().len(),
        "backend adapter initialized"
    );
    Ok(adapter)
}
