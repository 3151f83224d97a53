// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Device status and number verification against the simulator's UE identity service.

use std::sync::Arc;

use camara_core::types::{
    BackendAdapterConfig, Capability, ConnectivityStatus, NumberVerificationRequest, UeLookup,
};
use camara_core::{
    BackendAdapter, BridgeError, DeviceStatusAdapter, HttpMethod, NumberVerificationAdapter,
};
use camara_nef::{CoreSimStrategy, NefClient, Open5gcoreStrategy};
use camara_test_utils::RecordingTransport;
use serde_json::{Value, json};

const IDENTITY: &str = "http://coresim:8103";
const SUPI: &str = "001010000000001";

fn coresim_with(
    config: BackendAdapterConfig,
    transport: Arc<RecordingTransport>,
) -> NefClient<CoreSimStrategy> {
    NefClient::new(CoreSimStrategy::new(&config).unwrap(), transport)
}

fn coresim(transport: Arc<RecordingTransport>) -> NefClient<CoreSimStrategy> {
    coresim_with(BackendAdapterConfig::new("http://coresim:8080", "af"), transport)
}

fn profile(registration: &str, connection: &str, pdu: Value) -> Value {
    json!({
        "Supi": SUPI,
        "Msisdn": "+33612345678",
        "IpAddress": "12.1.0.2",
        "RegistrationStatus": registration,
        "ConnectionStatus": connection,
        "Plmn": {"mcc": "001", "mnc": "06"},
        "PduSessions": pdu,
    })
}

fn roaming_profile(mcc: &str, mnc: &str) -> Value {
    json!({
        "Supi": SUPI,
        "RegistrationStatus": "REGISTERED",
        "ConnectionStatus": "CONNECTED",
        "Plmn": {"mcc": mcc, "mnc": mnc},
    })
}

/// Queues the SUPI answer and then the profile served for it.
async fn serve_profile(transport: &RecordingTransport, profile: Value) {
    transport.respond_json(json!({"Supi": SUPI})).await;
    transport.respond_json(profile).await;
}

async fn reachability_of(profile: Value) -> ConnectivityStatus {
    let transport = Arc::new(RecordingTransport::new());
    serve_profile(&transport, profile).await;
    coresim(transport)
        .reachability_status("12.1.0.2")
        .await
        .unwrap()
        .reachability_status
}

#[tokio::test]
async fn connected_ue_with_pdu_session_carries_data() {
    let transport = Arc::new(RecordingTransport::new());
    serve_profile(
        &transport,
        profile("REGISTERED", "CONNECTED", json!({"1": {"dnn": "internet"}})),
    )
    .await;
    let client = coresim(transport.clone());

    let status = client.reachability_status("12.1.0.2").await.unwrap();
    assert_eq!(status.reachability_status, ConnectivityStatus::ConnectedData);

    let urls: Vec<String> = transport.requests().await.into_iter().map(|r| r.url).collect();
    assert_eq!(
        urls,
        vec![
            format!("{IDENTITY}/ue-identity/v1/supi?ip=12.1.0.2"),
            format!("{IDENTITY}/ue-identity/v1/profile?supi={SUPI}"),
        ]
    );
}

#[tokio::test]
async fn connected_ue_without_pdu_session_is_sms_only() {
    let status = reachability_of(profile("REGISTERED", "CONNECTED", json!({}))).await;
    assert_eq!(status, ConnectivityStatus::ConnectedSms);
}

#[tokio::test]
async fn idle_ue_is_sms_only() {
    let status = reachability_of(profile("REGISTERED", "IDLE", json!({"1": {}}))).await;
    assert_eq!(status, ConnectivityStatus::ConnectedSms);
}

#[tokio::test]
async fn deregistered_ue_is_not_connected() {
    let status = reachability_of(profile("DEREGISTERED", "CONNECTED", json!({"1": {}}))).await;
    assert_eq!(status, ConnectivityStatus::NotConnected);
    let status = reachability_of(profile("NOT_REGISTERED", "IDLE", json!({}))).await;
    assert_eq!(status, ConnectivityStatus::NotConnected);
}

#[tokio::test]
async fn unknown_connection_state_is_not_connected() {
    let status = reachability_of(profile("REGISTERED", "SUSPENDED", json!({"1": {}}))).await;
    assert_eq!(status, ConnectivityStatus::NotConnected);
}

#[tokio::test]
async fn unknown_ue_is_not_connected() {
    let transport = Arc::new(RecordingTransport::new());
    transport.respond_status(404, "no such UE").await;
    transport.respond_status(404, "no such UE").await;
    let client = coresim(transport.clone());

    let status = client.reachability_status("12.1.9.9").await.unwrap();
    assert_eq!(status.reachability_status, ConnectivityStatus::NotConnected);
    assert_eq!(transport.call_count().await, 2);
    assert_eq!(
        transport.last_request().await.unwrap().url,
        format!("{IDENTITY}/ue-identity/v1/profile?ip=12.1.9.9")
    );
}

#[tokio::test]
async fn missing_supi_falls_back_to_profile_by_ip() {
    let transport = Arc::new(RecordingTransport::new());
    transport.respond_json(json!({})).await;
    transport
        .respond_json(profile("REGISTERED", "CONNECTED", json!({"1": {}})))
        .await;
    let client = coresim(transport.clone());

    let profile = client
        .ue_profile(&UeLookup::Ip("12.1.0.2".into()))
        .await
        .unwrap();
    assert_eq!(profile.supi.as_deref(), Some(SUPI));
    assert_eq!(profile.connectivity(), ConnectivityStatus::ConnectedData);
    assert_eq!(transport.call_count().await, 2);
}

#[tokio::test]
async fn unreachable_identity_service_fails_the_call() {
    let transport = Arc::new(RecordingTransport::new());
    transport
        .respond_err(BridgeError::BackendUnreachable {
            url: format!("{IDENTITY}/ue-identity/v1/supi?ip=12.1.0.2"),
            reason: "connection refused".into(),
        })
        .await;
    let client = coresim(transport.clone());

    let err = client.reachability_status("12.1.0.2").await.unwrap_err();
    assert!(matches!(err, BridgeError::BackendUnreachable { .. }), "got: {err}");
    assert_eq!(transport.call_count().await, 1);
}

#[tokio::test]
async fn home_network_is_not_roaming() {
    let transport = Arc::new(RecordingTransport::new());
    serve_profile(&transport, roaming_profile("001", "06")).await;

    let status = coresim(transport).roaming_status("12.1.0.2").await.unwrap();
    assert!(!status.roaming);
    assert_eq!(status.country_code.as_deref(), Some("XX"));
}

#[tokio::test]
async fn foreign_network_is_roaming() {
    let transport = Arc::new(RecordingTransport::new());
    serve_profile(&transport, roaming_profile("208", "93")).await;

    let status = coresim(transport).roaming_status("12.1.0.2").await.unwrap();
    assert!(status.roaming);
    assert_eq!(status.country_code.as_deref(), Some("FR"));
    assert_eq!(status.country_name, Some(vec!["France".to_string()]));
}

#[tokio::test]
async fn other_operator_in_home_country_is_roaming() {
    let transport = Arc::new(RecordingTransport::new());
    serve_profile(&transport, roaming_profile("001", "01")).await;

    let status = coresim(transport).roaming_status("12.1.0.2").await.unwrap();
    assert!(status.roaming);
}

#[tokio::test]
async fn configured_home_network_is_honored() {
    let transport = Arc::new(RecordingTransport::new());
    serve_profile(&transport, roaming_profile("208", "93")).await;
    let config = BackendAdapterConfig::new("http://coresim:8080", "af")
        .with_extra("home_mcc", "208")
        .with_extra("home_mnc", "93");

    let status = coresim_with(config, transport)
        .roaming_status("12.1.0.2")
        .await
        .unwrap();
    assert!(!status.roaming);
    assert_eq!(status.country_code.as_deref(), Some("FR"));
}

#[tokio::test]
async fn unknown_ue_is_not_roaming() {
    let transport = Arc::new(RecordingTransport::new());
    transport.respond_status(404, "").await;
    transport.respond_status(404, "").await;

    let status = coresim(transport).roaming_status("12.1.9.9").await.unwrap();
    assert!(!status.roaming);
    assert!(status.country_code.is_none());
}

#[tokio::test]
async fn profile_by_msisdn_escapes_the_plus() {
    let transport = Arc::new(RecordingTransport::new());
    serve_profile(&transport, profile("REGISTERED", "IDLE", json!({}))).await;
    let client = coresim(transport.clone());

    let profile = client
        .ue_profile(&UeLookup::Msisdn("+33612345678".into()))
        .await
        .unwrap();
    assert_eq!(profile.msisdn.as_deref(), Some("+33612345678"));
    let requests = transport.requests().await;
    assert_eq!(
        requests[0].url,
        format!("{IDENTITY}/ue-identity/v1/supi?msisdn=%2B33612345678")
    );
}

#[tokio::test]
async fn unknown_msisdn_is_not_found() {
    let transport = Arc::new(RecordingTransport::new());
    transport.respond_status(404, "").await;

    let err = coresim(transport)
        .ue_profile(&UeLookup::Msisdn("+33600000000".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, BridgeError::NotFound { .. }), "got: {err}");
}

#[tokio::test]
async fn profile_service_is_asked_first_when_configured() {
    let transport = Arc::new(RecordingTransport::new());
    transport.respond_status(404, "").await;
    transport
        .respond_json(profile("REGISTERED", "CONNECTED", json!({})))
        .await;
    let config = BackendAdapterConfig::new("http://coresim:8080", "af")
        .with_extra("ue_profile_base_url", "http://ue-profile:8080");
    let client = coresim_with(config, transport.clone());

    client
        .ue_profile(&UeLookup::Supi(SUPI.into()))
        .await
        .unwrap();
    let urls: Vec<String> = transport.requests().await.into_iter().map(|r| r.url).collect();
    assert_eq!(
        urls,
        vec![
            format!("http://ue-profile:8080/ue-profile/v1/profiles/{SUPI}"),
            format!("{IDENTITY}/ue-identity/v1/profile?supi={SUPI}"),
        ]
    );
}

#[tokio::test]
async fn device_phone_number_comes_from_identity_service() {
    let transport = Arc::new(RecordingTransport::new());
    transport.respond_json(json!({"Msisdn": "+33612345678"})).await;
    let client = coresim(transport.clone());

    let number = client.device_phone_number("12.1.0.2").await.unwrap();
    assert_eq!(number.device_phone_number, "+33612345678");
    let request = transport.last_request().await.unwrap();
    assert_eq!(request.method, HttpMethod::Get);
    assert_eq!(request.url, format!("{IDENTITY}/msisdn?ip=12.1.0.2"));
}

#[tokio::test]
async fn missing_msisdn_is_not_found() {
    let transport = Arc::new(RecordingTransport::new());
    transport.respond_json(json!({"Msisdn": ""})).await;

    let err = coresim(transport)
        .device_phone_number("12.1.0.2")
        .await
        .unwrap_err();
    assert!(matches!(err, BridgeError::NotFound { .. }), "got: {err}");
}

#[tokio::test]
async fn plain_and_hashed_claims_are_verified() {
    let transport = Arc::new(RecordingTransport::new());
    for _ in 0..3 {
        transport.respond_json(json!({"Msisdn": "+33612345678"})).await;
    }
    let client = coresim(transport);

    let plain = NumberVerificationRequest::plain("+33612345678");
    assert!(client
        .verify_phone_number("12.1.0.2", &plain)
        .await
        .unwrap()
        .device_phone_number_verified);

    let other = NumberVerificationRequest::plain("+33612345679");
    assert!(!client
        .verify_phone_number("12.1.0.2", &other)
        .await
        .unwrap()
        .device_phone_number_verified);

    let hashed = NumberVerificationRequest::hashed(
        "42D573CFC315801D4CD8EDDD5416B416A0BF298B9B9E12D6B07442C91DB42BD8",
    );
    assert!(client
        .verify_phone_number("12.1.0.2", &hashed)
        .await
        .unwrap()
        .device_phone_number_verified);
}

#[tokio::test]
async fn malformed_claim_is_rejected_before_lookup() {
    let transport = Arc::new(RecordingTransport::new());
    let client = coresim(transport.clone());

    let err = client
        .verify_phone_number("12.1.0.2", &NumberVerificationRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, BridgeError::Validation { .. }), "got: {err}");
    assert_eq!(transport.call_count().await, 0);
}

#[tokio::test]
async fn nef_backends_do_not_expose_subscriber_lookups() {
    let transport = Arc::new(RecordingTransport::new());
    let client = NefClient::new(
        Open5gcoreStrategy::new(&BackendAdapterConfig::new("http://nef:8080", "af")).unwrap(),
        transport.clone(),
    );
    assert!(client.as_device_status().is_none());
    assert!(client.as_number_verification().is_none());

    match client.reachability_status("12.1.0.2").await.unwrap_err() {
        BridgeError::CapabilityNotSupported { capability, .. } => {
            assert_eq!(capability, Capability::DeviceStatus);
        }
        other => panic!("unexpected error: {other}"),
    }
    let err = client.device_phone_number("12.1.0.2").await.unwrap_err();
    assert!(matches!(err, BridgeError::CapabilityNotSupported { .. }));
    assert_eq!(transport.call_count().await, 0);
}

#[tokio::test]
async fn coresim_exposes_subscriber_lookups() {
    let client = coresim(Arc::new(RecordingTransport::new()));
    assert!(client.as_device_status().is_some());
    assert!(client.as_number_verification().is_some());
}
