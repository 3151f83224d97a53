// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end adapter tests: canonical request in, backend call out, canonical result back.

use std::sync::Arc;
use std::time::Duration;

use camara_core::types::{BackendAdapterConfig, Capability, LocationPrecision, QosStatus};
use camara_core::{
    BackendAdapter, BridgeError, CoreControlAdapter, HttpMethod, LocationAdapter, QodAdapter,
    TrafficInfluenceAdapter,
};
use camara_nef::{CoreSimStrategy, NefClient, Open5gcoreStrategy, Open5gsStrategy};
use camara_test_utils::RecordingTransport;
use camara_test_utils::fixtures::{
    created, location_request, qod_request, traffic_influence_request,
};
use camara_transport::HttpTransport;
use serde_json::json;
use tracing_test::traced_test;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const QOD_COLLECTION: &str = "http://nef:8080/3gpp-as-session-with-qos/v1/af/subscriptions";

fn config(base: &str) -> BackendAdapterConfig {
    BackendAdapterConfig::new(base, "af")
}

fn open5gcore(transport: Arc<RecordingTransport>) -> NefClient<Open5gcoreStrategy> {
    NefClient::new(
        Open5gcoreStrategy::new(&config("http://nef:8080")).unwrap(),
        transport,
    )
}

#[tokio::test]
async fn undeclared_capability_fails_without_backend_call() {
    let transport = Arc::new(RecordingTransport::new());
    let client = open5gcore(transport.clone());

    let err = client
        .create_traffic_influence(&traffic_influence_request("12.1.0.2", "10.0.0.5", None))
        .await
        .unwrap_err();
    match err {
        BridgeError::CapabilityNotSupported { backend, capability } => {
            assert_eq!(backend, "open5gcore");
            assert_eq!(capability, Capability::TrafficInfluence);
        }
        other => panic!("unexpected error: {other}"),
    }

    let err = client.retrieve_location(&location_request("+34600000001")).await.unwrap_err();
    assert!(matches!(err, BridgeError::CapabilityNotSupported { .. }));
    assert!(client.list_traffic_influence().await.is_err());
    assert_eq!(transport.call_count().await, 0);
}

#[tokio::test]
async fn create_session_posts_subscription_and_extracts_id() {
    let transport = Arc::new(RecordingTransport::new());
    transport.respond_json(created(QOD_COLLECTION, "abc-123")).await;
    let client = open5gcore(transport.clone());

    let session = client
        .create_session(&qod_request("12.1.0.2", "10.0.0.1", "qos-e"))
        .await
        .unwrap();
    assert_eq!(session.session_id, "abc-123");
    assert_eq!(session.qos_status, QosStatus::Requested);

    let request = transport.last_request().await.unwrap();
    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(request.url, QOD_COLLECTION);
    let body = request.body.unwrap();
    assert_eq!(body["ueIpv4Addr"], "12.1.0.2");
    assert_eq!(body["qosReference"], "qos-e");
    assert_eq!(body["flowInfo"][0]["flowId"], 1);
    assert_eq!(
        body["flowInfo"][0]["flowDescriptions"][0],
        "permit in ip from 12.1.0.2 0-65535 to 10.0.0.1 0-65535, permit out ip from 10.0.0.1 0-65535 to 12.1.0.2 0-65535"
    );
}

#[tokio::test]
async fn get_session_round_trips_through_subscription() {
    let transport = Arc::new(RecordingTransport::new());
    let client = open5gcore(transport.clone());
    let request = qod_request("12.1.0.2", "10.0.0.1", "qos-e");

    transport.respond_json(created(QOD_COLLECTION, "s-1")).await;
    client.create_session(&request).await.unwrap();
    let posted = transport.last_request().await.unwrap().body.unwrap();

    // The backend echoes what it stored.
    transport.respond_json(posted).await;
    let session = client.get_session("s-1", None).await.unwrap();

    assert_eq!(session.qos_status, QosStatus::Available);
    assert_eq!(session.qos_profile, "qos-e");
    assert_eq!(session.duration, 3600);
    assert_eq!(session.application_server.ipv4_address.as_deref(), Some("10.0.0.1"));
    assert_eq!(session.device.unwrap().public_ipv4(), Some("12.1.0.2"));
    assert!(session.started_at.is_some());

    let get = transport.last_request().await.unwrap();
    assert_eq!(get.method, HttpMethod::Get);
    assert_eq!(get.url, format!("{QOD_COLLECTION}/s-1"));
}

#[tokio::test]
async fn backend_error_status_is_preserved() {
    let transport = Arc::new(RecordingTransport::new());
    transport.respond_status(404, "{\"message\":\"no such subscription\"}").await;
    let client = open5gcore(transport.clone());

    let err = client.delete_session("missing").await.unwrap_err();
    assert_eq!(err.error_info().status, 404);
    assert_eq!(transport.call_count().await, 1);
}

#[tokio::test]
async fn response_without_self_link_is_malformed() {
    let transport = Arc::new(RecordingTransport::new());
    transport.respond_json(json!({"qosReference": "qos-e"})).await;
    let client = open5gcore(transport);

    let err = client
        .create_session(&qod_request("12.1.0.2", "10.0.0.1", "qos-e"))
        .await
        .unwrap_err();
    assert!(matches!(err, BridgeError::MalformedBackendResponse { .. }));
}

#[tokio::test]
#[traced_test]
async fn location_without_polygon_is_synthesized() {
    let transport = Arc::new(RecordingTransport::new());
    transport
        .respond_json(json!({
            "msisdn": "34600000001",
            "eventTime": "2025-03-01T10:00:00Z",
            "locationInfo": {"cellId": "cell-42", "ageOfLocationInfo": {"duration": 2}}
        }))
        .await;
    let client = NefClient::new(
        Open5gsStrategy::new(
            &config("http://nef:8080").with_extra("fallback_location", "41.3874,2.1686"),
        )
        .unwrap(),
        transport.clone(),
    );

    let location = client
        .retrieve_location(&location_request("+34600000001"))
        .await
        .unwrap();
    assert_eq!(location.precision, LocationPrecision::Synthesized);
    assert_eq!(location.cell_id.as_deref(), Some("cell-42"));
    assert!(logs_contain("synthesized placeholder area"));

    let request = transport.last_request().await.unwrap();
    assert_eq!(
        request.url,
        "http://nef:8080/3gpp-monitoring-event/v1/af/subscriptions"
    );
    let body = request.body.unwrap();
    assert_eq!(body["msisdn"], "34600000001");
    assert_eq!(body["locationType"], "LAST_KNOWN_LOCATION");
}

#[tokio::test]
async fn location_polygon_is_precise() {
    let transport = Arc::new(RecordingTransport::new());
    transport
        .respond_json(json!({
            "locationInfo": {"geographicArea": {"polygon": {"point_list": {"geographical_coords": [
                {"lon": 2.0, "lat": 48.0}, {"lon": 2.1, "lat": 48.0}, {"lon": 2.1, "lat": 48.1}
            ]}}}}
        }))
        .await;
    let client = NefClient::new(
        Open5gsStrategy::new(&config("http://nef:8080")).unwrap(),
        transport,
    );

    let location = client
        .retrieve_location(&location_request("+34600000001"))
        .await
        .unwrap();
    assert_eq!(location.precision, LocationPrecision::Precise);
}

#[tokio::test]
async fn traffic_influence_lifecycle_against_coresim() {
    let transport = Arc::new(RecordingTransport::new());
    let client = NefClient::new(
        CoreSimStrategy::new(&config("http://coresim:8080")).unwrap(),
        transport.clone(),
    );
    let collection = "http://coresim:8080/3gpp-traffic-influence/v1/af/subscriptions";
    let request = traffic_influence_request("12.1.0.2", "10.10.0.5", Some("zone-1"));

    transport.respond_json(created(collection, "ti-1")).await;
    let created_ti = client.create_traffic_influence(&request).await.unwrap();
    assert_eq!(created_ti.traffic_influence_id.as_deref(), Some("ti-1"));

    transport.respond_empty().await;
    client.update_traffic_influence("ti-1", &request).await.unwrap();
    let put = transport.last_request().await.unwrap();
    assert_eq!(put.method, HttpMethod::Put);
    assert_eq!(put.url, format!("{collection}/ti-1"));

    let mut stored = put.body.unwrap();
    stored["self"] = json!(format!("{collection}/ti-1"));
    transport.respond_json(json!([stored])).await;
    let listed = client.list_traffic_influence().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].traffic_influence_id.as_deref(), Some("ti-1"));
    assert_eq!(listed[0].app_instance_id, "10.10.0.5");
    assert_eq!(listed[0].edge_cloud_zone_id.as_deref(), Some("zone-1"));

    client.delete_traffic_influence("ti-1").await.unwrap();
    assert_eq!(transport.last_request().await.unwrap().method, HttpMethod::Delete);
}

#[tokio::test]
async fn empty_list_is_empty() {
    let transport = Arc::new(RecordingTransport::new());
    let client = NefClient::new(
        CoreSimStrategy::new(&config("http://coresim:8080")).unwrap(),
        transport,
    );
    assert!(client.list_traffic_influence().await.unwrap().is_empty());
}

#[tokio::test]
async fn coresim_start_is_skipped_when_running() {
    let transport = Arc::new(RecordingTransport::new());
    transport.respond_json(json!({"Status": "STARTED"})).await;
    let client = NefClient::new(
        CoreSimStrategy::new(&config("http://coresim:8080")).unwrap(),
        transport.clone(),
    );

    let control = client.as_core_control().expect("coresim declares core_control");
    let status = control.start_simulation().await.unwrap();
    assert_eq!(status["Status"], "STARTED");

    let requests = transport.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url, "http://coresim:8081/core-simulator/v1/status");
}

#[tokio::test]
async fn coresim_start_posts_when_stopped() {
    let transport = Arc::new(RecordingTransport::new());
    transport.respond_json(json!({"Status": "STOPPED"})).await;
    transport.respond_json(json!({"result": "ok"})).await;
    let client = NefClient::new(
        CoreSimStrategy::new(&config("http://coresim:8080")).unwrap(),
        transport.clone(),
    );

    client.start_simulation().await.unwrap();
    let last = transport.last_request().await.unwrap();
    assert_eq!(last.method, HttpMethod::Post);
    assert_eq!(last.url, "http://coresim:8081/core-simulator/v1/start");
}

#[tokio::test]
async fn core_control_hidden_for_nef_backends() {
    let client = open5gcore(Arc::new(RecordingTransport::new()));
    assert!(client.as_core_control().is_none());
    let err = client.stop_simulation().await.unwrap_err();
    assert!(matches!(err, BridgeError::CapabilityNotSupported { .. }));
}

#[tokio::test]
async fn http_transport_against_mock_nef() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/3gpp-as-session-with-qos/v1/af/subscriptions"))
        .and(body_partial_json(json!({"qosReference": "qos-s", "supportedFeatures": "003C"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "self": format!("{}/3gpp-as-session-with-qos/v1/af/subscriptions/77", server.uri())
        })))
        .expect(1)
        .mount(&server)
        .await;

    let transport = Arc::new(HttpTransport::new(Duration::from_secs(5)).unwrap());
    let client = NefClient::new(Open5gsStrategy::new(&config(&server.uri())).unwrap(), transport);

    let session = client
        .create_session(&qod_request("12.1.0.2", "10.0.0.1", "qos-s"))
        .await
        .unwrap();
    assert_eq!(session.session_id, "77");
}
