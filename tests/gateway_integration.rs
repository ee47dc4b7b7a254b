//! Integration tests for the authenticated request gateway.
//!
//! These run the full pipeline (retry, bearer injection, HTTP transport)
//! against a wiremock server serving both the protected listing and the
//! refresh endpoint.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use triage_client::auth::{AuthStatus, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use triage_client::client::TriageClient;
use triage_client::config::Config;
use triage_client::gateway::{ApiRequest, GatewayError};
use triage_client::records::RecordId;
use triage_client::secrets::MemorySecretStore;

mod common;

// =============================================================================
// Fixtures
// =============================================================================

const CALLS: &str = "/api/calls/";
const REFRESH: &str = "/api/user/token/refresh/";

/// A client whose store holds `T1` and a refresh token valid for a week.
async fn signed_in_client(server: &MockServer) -> (TriageClient, Arc<MemorySecretStore>) {
    let refresh = common::unsigned_token_with_expiry(Utc::now() + Duration::days(7));
    let store = Arc::new(MemorySecretStore::with_entries([
        (ACCESS_TOKEN_KEY, "T1"),
        (REFRESH_TOKEN_KEY, refresh.as_str()),
    ]));

    let mut config = Config::default();
    config.server.base_url = server.uri();
    let client = TriageClient::with_store(config, store.clone()).expect("client");
    assert_eq!(client.session().bootstrap().await, AuthStatus::Authenticated);
    (client, store)
}

fn records_body() -> serde_json::Value {
    json!([
        {"id": 1, "caller": "alice"},
        {"id": 2, "caller": "bob", "duration": 30},
    ])
}

async fn mount_calls_for(server: &MockServer, token: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(CALLS))
        .and(header("authorization", format!("Bearer {}", token).as_str()))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn mount_refresh(server: &MockServer, response: ResponseTemplate, times: u64) {
    Mock::given(method("POST"))
        .and(path(REFRESH))
        .respond_with(response)
        .expect(times)
        .mount(server)
        .await;
}

// =============================================================================
// Token injection
// =============================================================================

#[tokio::test]
async fn attaches_current_access_token() {
    let server = MockServer::start().await;
    mount_calls_for(&server, "T1", ResponseTemplate::new(200).set_body_json(records_body())).await;
    mount_refresh(&server, ResponseTemplate::new(200), 0).await;

    let (client, _store) = signed_in_client(&server).await;
    let records = client.list_calls().await.expect("records");

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, RecordId::Number(1));
    assert_eq!(records[1].caller.as_deref(), Some("bob"));
    assert_eq!(records[1].extra["duration"], 30);
}

// =============================================================================
// Retry on 401
// =============================================================================

#[tokio::test]
async fn expired_access_token_is_refreshed_and_request_retried() {
    let server = MockServer::start().await;
    mount_calls_for(&server, "T1", ResponseTemplate::new(401)).await;
    mount_calls_for(&server, "T2", ResponseTemplate::new(200).set_body_json(records_body())).await;
    mount_refresh(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"access": "T2"})),
        1,
    )
    .await;

    let (client, _store) = signed_in_client(&server).await;
    let records = client.list_calls().await.expect("records after retry");

    assert_eq!(records.len(), 2);
    assert_eq!(client.session().access_token().as_deref(), Some("T2"));
}

#[tokio::test]
async fn concurrent_unauthorized_requests_trigger_one_refresh() {
    let server = MockServer::start().await;
    mount_calls_for(&server, "T1", ResponseTemplate::new(401)).await;
    mount_calls_for(&server, "T2", ResponseTemplate::new(200).set_body_json(records_body())).await;
    mount_refresh(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"access": "T2"})),
        1,
    )
    .await;

    let (client, _store) = signed_in_client(&server).await;
    let (first, second) = tokio::join!(client.list_calls(), client.list_calls());

    assert_eq!(first.expect("first").len(), 2);
    assert_eq!(second.expect("second").len(), 2);
}

#[tokio::test]
async fn request_is_retried_at_most_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CALLS))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;
    mount_refresh(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"access": "T2"})),
        1,
    )
    .await;

    let (client, _store) = signed_in_client(&server).await;
    let err = client.list_calls().await.unwrap_err();

    assert!(matches!(err, GatewayError::Unauthorized));
}

#[tokio::test]
async fn failed_refresh_logs_out_and_still_retries_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CALLS))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;
    mount_refresh(&server, ResponseTemplate::new(401), 1).await;

    let (client, store) = signed_in_client(&server).await;
    let err = client.list_calls().await.unwrap_err();

    assert!(matches!(err, GatewayError::Unauthorized));
    assert_eq!(client.session().status(), AuthStatus::Unauthenticated);
    assert!(store.is_empty());
}

#[tokio::test]
async fn send_returns_final_unauthorized_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CALLS))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    mount_refresh(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"access": "T2"})),
        1,
    )
    .await;

    let (client, _store) = signed_in_client(&server).await;
    let response = client.gateway().send(ApiRequest::get(CALLS)).await.unwrap();

    assert_eq!(response.status.as_u16(), 401);
}

// =============================================================================
// Pass-through
// =============================================================================

#[tokio::test]
async fn other_errors_pass_through_without_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CALLS))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(&server, ResponseTemplate::new(200), 0).await;

    let (client, _store) = signed_in_client(&server).await;
    let err = client.list_calls().await.unwrap_err();

    assert!(matches!(err, GatewayError::Status { status: 500 }));
    assert_eq!(client.session().access_token().as_deref(), Some("T1"));
}

#[tokio::test]
async fn forbidden_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CALLS))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(&server, ResponseTemplate::new(200), 0).await;

    let (client, _store) = signed_in_client(&server).await;
    let err = client.list_calls().await.unwrap_err();

    assert!(matches!(err, GatewayError::Status { status: 403 }));
}

#[tokio::test]
async fn unauthenticated_request_sends_no_token_and_no_refresh_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CALLS))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;
    mount_refresh(&server, ResponseTemplate::new(200), 0).await;

    let mut config = Config::default();
    config.server.base_url = server.uri();
    let client =
        TriageClient::with_store(config, Arc::new(MemorySecretStore::new())).expect("client");
    client.session().bootstrap().await;

    let err = client.list_calls().await.unwrap_err();
    assert!(matches!(err, GatewayError::Unauthorized));

    let requests = server.received_requests().await.expect("recording enabled");
    assert!(requests
        .iter()
        .all(|r| !r.headers.contains_key("authorization")));
}
