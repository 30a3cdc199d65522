//! Router-level tests driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use activation_service::ActivationService;
use activation_service::binding::MemoryBindingStore;
use activation_service::catalog::CodeCatalog;
use activation_service::http::build_router;
use activation_service::http::dto::{ClaimResponse, MessageResponse};
use activation_service::token::HmacSha256Signer;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use test_utils::fixtures;
use tower::ServiceExt;

const ADMIN: &str = "http-admin";

fn app() -> Router {
    let catalog = CodeCatalog::from_json(&fixtures::sample_catalog_json()).unwrap();
    let svc = ActivationService::new(
        Arc::new(catalog),
        Arc::new(MemoryBindingStore::new()),
        Arc::new(HmacSha256Signer::new(b"http-secret")),
        SecretString::from(ADMIN.to_string()),
    );
    build_router(Arc::new(svc))
}

async fn send(app: &Router, method: Method, uri: &str, body: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn send_preflight(app: &Router, uri: &str) -> axum::http::Response<Body> {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri(uri)
        .header(header::ORIGIN, "https://client.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn post_json<T: DeserializeOwned>(app: &Router, uri: &str, body: &str) -> T {
    let (status, bytes) = send(app, Method::POST, uri, body).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_claim_success_shape() {
    let app = app();
    let body = format!(r#"{{"code":"{}","deviceId":"dev-a","host":"h","ua":"u"}}"#, fixtures::FUTURE_CODE);

    let (status, bytes) = send(&app, Method::POST, "/api/verify", &body).await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["ok"], true);
    assert!(json.get("message").is_none());
    assert!(json["token"].as_str().unwrap().contains('.'));
    assert!(json["expiresAt"].as_i64().unwrap() > 0);
    assert!(json["expiresText"].as_str().unwrap().starts_with("2099-12-31 23:59:59"));
}

#[tokio::test]
async fn test_claim_rejections_answer_200() {
    let app = app();

    let cases = [
        ("{}".to_string(), "Missing code"),
        ("not json".to_string(), "Missing code"),
        (String::new(), "Missing code"),
        (r#"{"code":"ACT-X"}"#.to_string(), "Missing deviceId"),
        (r#"{"code":"UNKNOWN","deviceId":"d"}"#.to_string(), "Invalid code"),
        (r#"{"code":"UNKNOWN","deviceId":12345}"#.to_string(), "Invalid code"),
        (r#"{"code":"ACT-X","deviceId":{"a":1}}"#.to_string(), "Missing deviceId"),
        (r#"{"code":"ACT-X","deviceId":null}"#.to_string(), "Missing deviceId"),
        (r#"{"code":["ACT-X"],"deviceId":"d"}"#.to_string(), "Missing code"),
        (
            format!(r#"{{"code":"{}","deviceId":"d"}}"#, fixtures::PAST_CODE),
            "Code expired",
        ),
    ];

    for (body, message) in cases {
        let response: ClaimResponse = post_json(&app, "/api/verify", &body).await;
        assert!(!response.ok, "{body}");
        assert_eq!(response.message.as_deref(), Some(message), "{body}");
        assert!(response.token.is_none());
    }
}

#[tokio::test]
async fn test_claim_accepts_numeric_fields() {
    let app = app();
    let body = format!(
        r#"{{"code":"{}","deviceId":12345,"host":8080,"ua":true}}"#,
        fixtures::FUTURE_CODE
    );

    let response: ClaimResponse = post_json(&app, "/api/verify", &body).await;
    assert!(response.ok, "{:?}", response.message);
    assert!(response.token.is_some());

    let again = format!(r#"{{"code":"{}","deviceId":"12345"}}"#, fixtures::FUTURE_CODE);
    let response: ClaimResponse = post_json(&app, "/api/verify", &again).await;
    assert!(response.ok);
}

#[tokio::test]
async fn test_claim_conflict_over_http() {
    let app = app();
    let first = format!(r#"{{"code":"{}","deviceId":"dev-a"}}"#, fixtures::TIMED_CODE);
    let second = format!(r#"{{"code":"{}","deviceId":"dev-b"}}"#, fixtures::TIMED_CODE);

    let response: ClaimResponse = post_json(&app, "/api/verify", &first).await;
    assert!(response.ok);
    let response: ClaimResponse = post_json(&app, "/api/verify", &second).await;
    assert_eq!(
        response.message.as_deref(),
        Some("Code already bound to another device")
    );
}

#[tokio::test]
async fn test_unbind_flow() {
    let app = app();
    let claim = format!(r#"{{"code":"{}","deviceId":"dev-a"}}"#, fixtures::FUTURE_CODE);
    let _: ClaimResponse = post_json(&app, "/api/verify", &claim).await;

    let no_code = format!(r#"{{"adminSecret":"{ADMIN}"}}"#);
    let response: MessageResponse = post_json(&app, "/api/unbind", &no_code).await;
    assert_eq!(response, MessageResponse::failure("Missing params"));

    let no_secret = format!(r#"{{"code":"{}"}}"#, fixtures::FUTURE_CODE);
    let response: MessageResponse = post_json(&app, "/api/unbind", &no_secret).await;
    assert_eq!(response, MessageResponse::failure("Forbidden"));

    let wrong = format!(r#"{{"code":"{}","adminSecret":"nope"}}"#, fixtures::FUTURE_CODE);
    let response: MessageResponse = post_json(&app, "/api/unbind", &wrong).await;
    assert_eq!(response, MessageResponse::failure("Forbidden"));

    let right = format!(r#"{{"code":"{}","adminSecret":"{ADMIN}"}}"#, fixtures::FUTURE_CODE);
    let response: MessageResponse = post_json(&app, "/api/unbind", &right).await;
    assert_eq!(response, MessageResponse::success("Unbound"));

    let other = format!(r#"{{"code":"{}","deviceId":"dev-b"}}"#, fixtures::FUTURE_CODE);
    let response: ClaimResponse = post_json(&app, "/api/verify", &other).await;
    assert!(response.ok);
}

#[tokio::test]
async fn test_method_routing() {
    let app = app();

    for uri in ["/api/verify", "/api/unbind"] {
        let (status, bytes) = send(&app, Method::GET, uri, "").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        let body: MessageResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, MessageResponse::failure("Method not allowed"));

        let (status, _) = send(&app, Method::PUT, uri, "{}").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }
}

#[tokio::test]
async fn test_api_cors_headers() {
    let app = app();

    for uri in ["/api/verify", "/api/unbind"] {
        let response = send_preflight(&app, uri).await;
        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS].to_str().unwrap();
        assert!(methods.contains("POST"), "{methods}");
        let allowed = headers[header::ACCESS_CONTROL_ALLOW_HEADERS].to_str().unwrap();
        assert!(allowed.eq_ignore_ascii_case("content-type"), "{allowed}");
    }

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/verify")
        .header(header::ORIGIN, "https://client.example")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn test_healthz_and_metrics() {
    let app = app();

    let (status, bytes) = send(&app, Method::GET, "/healthz", "").await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["ok"], true);
    assert_eq!(json["store"], "memory");
    assert_eq!(json["codes"], 4);

    let claim = format!(r#"{{"code":"{}","deviceId":"dev-a"}}"#, fixtures::SECONDS_CODE);
    let _: ClaimResponse = post_json(&app, "/api/verify", &claim).await;

    let (status, bytes) = send(&app, Method::GET, "/metrics", "").await;
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.contains("activation_service_claims_total"));
    assert!(text.contains("activation_service_store_operations_total"));
}
