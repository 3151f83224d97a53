// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Operation commands.
//!
//! Every command activates the configured backends, runs one operation and
//! prints the result as JSON on stdout. Failures are printed as a CAMARA
//! `ErrorInfo` on stderr.
//!
//! Creation goes through [`BridgeService`] so requests are validated before
//! dispatch. Lookups and deletions address the backend directly: a CLI run
//! holds no records of resources created by earlier runs.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use camara_config::BridgeConfig;
use camara_core::types::{
    CreateSession, LocationRetrievalRequest, NumberVerificationRequest, StatusInfo,
    TrafficInfluence, UeLookup,
};
use camara_core::{
    AdapterDomain, BackendAdapter, BridgeError, Capability, QodAdapter, TrafficInfluenceAdapter,
};
use camara_registry::{AdapterRegistry, BridgeService};
use camara_transport::HttpTransport;

use crate::{Commands, CoresimAction, DeviceStatusAction, NumberAction, QodAction, TiAction};

/// Runs `command` against the backends configured in `config`.
pub async fn run(command: Commands, config: &BridgeConfig) -> Result<(), BridgeError> {
    let transport = Arc::new(HttpTransport::new(Duration::from_secs(
        config.bridge.request_timeout_secs,
    ))?);
    let registry = Arc::new(
        AdapterRegistry::from_config(config, transport, CancellationToken::new()).await?,
    );
    let service = BridgeService::new(registry.clone());

    let result = dispatch(command, &service).await;
    registry.shutdown().await;
    print_json(&result?)
}

async fn dispatch(command: Commands, service: &BridgeService) -> Result<Value, BridgeError> {
    match command {
        Commands::Backends => to_json(&crate::backends::list_backends(service.registry()).await),
        Commands::Qod { oran, action } => {
            let domain = if oran {
                AdapterDomain::Oran
            } else {
                AdapterDomain::Network
            };
            qod(service, domain, action).await
        }
        Commands::Ti { action } => traffic_influence(service, action).await,
        Commands::Location { file } => {
            let request: LocationRetrievalRequest = read_json(&file)?;
            to_json(&service.retrieve_location(&request).await?)
        }
        Commands::Coresim { action } => match action {
            CoresimAction::Status => service.simulation_status().await,
            CoresimAction::Start => service.start_simulation().await,
            CoresimAction::Stop => service.stop_simulation().await,
            CoresimAction::Configure { file } => {
                let config: Value = read_json(&file)?;
                service.configure_simulation(&config).await
            }
        },
        Commands::DeviceStatus { action } => match action {
            DeviceStatusAction::Reachability { ip } => {
                to_json(&service.reachability_status(&ip).await?)
            }
            DeviceStatusAction::Roaming { ip } => to_json(&service.roaming_status(&ip).await?),
            DeviceStatusAction::Profile { ip, supi, msisdn } => {
                let lookup = match (ip, supi, msisdn) {
                    (Some(ip), _, _) => UeLookup::Ip(ip),
                    (_, Some(supi), _) => UeLookup::Supi(supi),
                    (_, _, Some(msisdn)) => UeLookup::Msisdn(msisdn),
                    (None, None, None) => {
                        return Err(BridgeError::validation(
                            "request",
                            "one of --ip, --supi or --msisdn is required",
                        ));
                    }
                };
                debug!(%lookup, "profile lookup");
                to_json(&service.ue_profile(&lookup).await?)
            }
        },
        Commands::NumberVerification { action } => match action {
            NumberAction::Share { ip } => to_json(&service.device_phone_number(&ip).await?),
            NumberAction::Verify {
                ip,
                phone_number,
                hashed_phone_number,
            } => {
                let request = NumberVerificationRequest {
                    phone_number,
                    hashed_phone_number,
                };
                to_json(&service.verify_phone_number(&ip, &request).await?)
            }
        },
    }
}

fn unsupported(adapter: &dyn BackendAdapter, capability: Capability) -> BridgeError {
    BridgeError::CapabilityNotSupported {
        backend: adapter.name().to_string(),
        capability,
    }
}

fn qod_of(
    adapter: &Arc<dyn BackendAdapter>,
    domain: AdapterDomain,
) -> Result<&dyn QodAdapter, BridgeError> {
    let capability = match domain {
        AdapterDomain::Network => Capability::Qod,
        AdapterDomain::Oran => Capability::OranQod,
    };
    adapter
        .as_qod()
        .ok_or_else(|| unsupported(adapter.as_ref(), capability))
}

fn traffic_influence_of(
    adapter: &Arc<dyn BackendAdapter>,
) -> Result<&dyn TrafficInfluenceAdapter, BridgeError> {
    adapter
        .as_traffic_influence()
        .ok_or_else(|| unsupported(adapter.as_ref(), Capability::TrafficInfluence))
}

async fn qod(
    service: &BridgeService,
    domain: AdapterDomain,
    action: QodAction,
) -> Result<Value, BridgeError> {
    match action {
        QodAction::Create { file } => {
            let request: CreateSession = read_json(&file)?;
            to_json(&service.create_session(domain, &request).await?)
        }
        QodAction::Get { id } => {
            let adapter = service.registry().require(domain)?;
            to_json(&qod_of(&adapter, domain)?.get_session(&id, None).await?)
        }
        QodAction::Delete { id } => {
            let adapter = service.registry().require(domain)?;
            qod_of(&adapter, domain)?.delete_session(&id).await?;
            Ok(json!({
                "sessionId": id,
                "qosStatus": "UNAVAILABLE",
                "statusInfo": StatusInfo::DeleteRequested,
            }))
        }
    }
}

async fn traffic_influence(
    service: &BridgeService,
    action: TiAction,
) -> Result<Value, BridgeError> {
    match action {
        TiAction::Create { file } => {
            let request: TrafficInfluence = read_json(&file)?;
            to_json(&service.create_traffic_influence(&request).await?)
        }
        TiAction::Get { id } => {
            let adapter = service.registry().network()?;
            to_json(&traffic_influence_of(&adapter)?.get_traffic_influence(&id).await?)
        }
        TiAction::List => {
            let adapter = service.registry().network()?;
            to_json(&traffic_influence_of(&adapter)?.list_traffic_influence().await?)
        }
        TiAction::Delete { id } => {
            let adapter = service.registry().network()?;
            traffic_influence_of(&adapter)?.delete_traffic_influence(&id).await?;
            Ok(json!({ "trafficInfluenceID": id, "state": "deleted" }))
        }
    }
}

/// Reads a JSON request body from `path`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, BridgeError> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        BridgeError::validation("request", format!("cannot read {}: {e}", path.display()))
    })?;
    debug!(path = %path.display(), bytes = raw.len(), "read request file");
    serde_json::from_str(&raw).map_err(|e| {
        BridgeError::validation(
            "request",
            format!("{} is not a valid request: {e}", path.display()),
        )
    })
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, BridgeError> {
    serde_json::to_value(value)
        .map_err(|e| BridgeError::Internal(format!("failed to encode result: {e}")))
}

fn print_json(value: &Value) -> Result<(), BridgeError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| BridgeError::Internal(format!("failed to render result: {e}")))?;
    println!("{rendered}");
    Ok(())
}

/// Prints `error` as a CAMARA `ErrorInfo` on stderr.
pub fn print_error(error: &BridgeError) {
    let info = error.error_info();
    match serde_json::to_string_pretty(&info) {
        Ok(rendered) => eprintln!("{rendered}"),
        Err(_) => eprintln!("{}: {}", info.code, info.message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use camara_core::BackendAdapterConfig;
    use camara_test_utils::RecordingTransport;
    use camara_test_utils::fixtures::created;

    fn request_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    async fn coresim_service(transport: Arc<RecordingTransport>) -> BridgeService {
        let registry = AdapterRegistry::new(transport, CancellationToken::new());
        registry
            .switch("coresim", &BackendAdapterConfig::new("http://coresim:8000", "af"))
            .await
            .unwrap();
        BridgeService::new(Arc::new(registry))
    }

    #[test]
    fn unreadable_request_is_a_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_json::<CreateSession>(&dir.path().join("absent.json")).unwrap_err();
        assert_eq!(err.error_info().status, 400);

        let file = request_file("{\"qosProfile\": 3}");
        let err = read_json::<CreateSession>(file.path()).unwrap_err();
        assert!(err.to_string().contains("not a valid request"));
    }

    #[tokio::test]
    async fn qod_create_reads_request_file() {
        let transport = Arc::new(RecordingTransport::new());
        transport
            .respond_json(created(
                "http://coresim:8000/3gpp-as-session-with-qos/v1/af/subscriptions",
                "s-1",
            ))
            .await;
        let service = coresim_service(transport.clone()).await;

        let file = request_file(
            r#"{
                "device": {"ipv4Address": {"publicAddress": "12.1.0.2"}},
                "applicationServer": {"ipv4Address": "10.0.0.1"},
                "qosProfile": "qos-e",
                "duration": 60
            }"#,
        );
        let command = Commands::Qod {
            oran: false,
            action: QodAction::Create {
                file: file.path().to_path_buf(),
            },
        };
        let result = dispatch(command, &service).await.unwrap();
        assert_eq!(result["sessionId"], "s-1");
        assert_eq!(result["qosStatus"], "REQUESTED");
    }

    #[tokio::test]
    async fn qod_on_unconfigured_domain_fails() {
        let service = coresim_service(Arc::new(RecordingTransport::new())).await;
        let command = Commands::Qod {
            oran: true,
            action: QodAction::Get { id: "pol-1".into() },
        };
        assert!(matches!(
            dispatch(command, &service).await,
            Err(BridgeError::Config(_))
        ));
    }

    #[tokio::test]
    async fn ti_delete_reports_deleted_state() {
        let transport = Arc::new(RecordingTransport::new());
        let service = coresim_service(transport.clone()).await;
        let command = Commands::Ti {
            action: TiAction::Delete { id: "ti-7".into() },
        };
        let result = dispatch(command, &service).await.unwrap();
        assert_eq!(result["state"], "deleted");
        assert_eq!(transport.call_count().await, 1);
    }

    #[tokio::test]
    async fn reachability_prints_camara_status() {
        let transport = Arc::new(RecordingTransport::new());
        transport.respond_status(404, "").await;
        transport.respond_status(404, "").await;
        let service = coresim_service(transport).await;
        let command = Commands::DeviceStatus {
            action: DeviceStatusAction::Reachability {
                ip: "12.1.9.9".into(),
            },
        };
        let result = dispatch(command, &service).await.unwrap();
        assert_eq!(result["reachabilityStatus"], "NOT_CONNECTED");
        assert!(result["lastStatusTime"].is_string());
    }

    #[tokio::test]
    async fn number_verify_reports_match() {
        let transport = Arc::new(RecordingTransport::new());
        transport.respond_json(json!({"Msisdn": "+33612345678"})).await;
        let service = coresim_service(transport).await;
        let command = Commands::NumberVerification {
            action: NumberAction::Verify {
                ip: "12.1.0.2".into(),
                phone_number: Some("+33612345678".into()),
                hashed_phone_number: None,
            },
        };
        let result = dispatch(command, &service).await.unwrap();
        assert_eq!(result, json!({"devicePhoneNumberVerified": true}));
    }
}
