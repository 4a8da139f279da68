#![allow(clippy::unwrap_used)]
// Tests for `ReqwestRequester` using wiremock.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wix_api::{Credentials, TransportConfig};
use wix_nodes::{HttpRequestOptions, HttpRequester, RequestError, ReqwestRequester, WixApiCredential};

// ── Helpers ─────────────────────────────────────────────────────────

const QUERY_PATH: &str = "/site-list/v2/sites/query";

async fn setup() -> (MockServer, ReqwestRequester) {
    let server = MockServer::start().await;
    let requester = ReqwestRequester::new(&TransportConfig::default()).unwrap();
    (server, requester)
}

/// The credential probe, redirected at the mock server.
fn probe(server: &MockServer) -> HttpRequestOptions {
    let mut options = WixApiCredential::test_request(&Credentials::new("IST.key", "acc-1"));
    options.url = format!("{}{QUERY_PATH}", server.uri());
    options
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_request_carries_headers_and_json_body() {
    let (server, requester) = setup().await;

    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .and(header("authorization", "IST.key"))
        .and(header("wix-account-id", "acc-1"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "cursorPaging": { "limit": 1 } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sites": [{ "id": "s1" }] })))
        .expect(1)
        .mount(&server)
        .await;

    let body = requester.http_request(probe(&server)).await.unwrap();

    assert_eq!(body, json!({ "sites": [{ "id": "s1" }] }));
}

#[tokio::test]
async fn test_non_success_status_is_upstream_error() {
    let (server, requester) = setup().await;

    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "message": "Too many requests",
            "details": { "applicationError": { "code": "RATE_LIMITED" } }
        })))
        .mount(&server)
        .await;

    let err = requester.http_request(probe(&server)).await.unwrap_err();

    match err {
        RequestError::UpstreamApi(api) => {
            assert_eq!(api.message, "Too many requests");
            assert_eq!(api.http_code, Some(429));
            assert_eq!(api.code.as_deref(), Some("RATE_LIMITED"));
            assert!(api.node.is_none());
        }
        other => panic!("expected UpstreamApi, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_rejected_credentials_are_upstream_error() {
    let (server, requester) = setup().await;

    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_string(""))
        .mount(&server)
        .await;

    let err = requester.http_request(probe(&server)).await.unwrap_err();

    assert!(
        matches!(&err, RequestError::UpstreamApi(api) if api.http_code == Some(403) && api.message == "403 Forbidden"),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn test_malformed_json_is_failure() {
    let (server, requester) = setup().await;

    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = requester.http_request(probe(&server)).await.unwrap_err();

    assert!(matches!(err, RequestError::Failure(_)), "unexpected error: {err:?}");
}

#[tokio::test]
async fn test_unusable_url_is_failure() {
    let (server, requester) = setup().await;
    let mut options = probe(&server);
    options.url = "not a url".into();

    let err = requester.http_request(options).await.unwrap_err();

    assert!(matches!(err, RequestError::Failure(_)), "unexpected error: {err:?}");
}

#[tokio::test]
async fn test_unauthorized_message_surfaces() {
    let (server, requester) = setup().await;

    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid API key" })))
        .mount(&server)
        .await;

    let message = requester
        .http_request(probe(&server))
        .await
        .unwrap_err()
        .to_string();

    assert_eq!(message, "Invalid API key");
}
