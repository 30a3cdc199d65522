//! Route handlers.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use serde_json::json;

use super::AppState;
use super::dto::{ClaimResponse, MessageResponse, UnbindRequest};
use crate::metrics;
use crate::service::ClaimRequest;

/// Missing, empty or unparseable bodies read as an empty request.
fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> T {
    serde_json::from_slice(body).unwrap_or_default()
}

/// `POST /api/verify`
pub async fn claim(State(svc): State<AppState>, body: Bytes) -> Json<ClaimResponse> {
    let request: ClaimRequest = parse_body(&body);
    let response = match svc.claim(&request).await {
        Ok(grant) => ClaimResponse::granted(&grant),
        Err(err) => ClaimResponse::rejected(&err),
    };
    Json(response)
}

/// `POST /api/unbind`
pub async fn unbind(State(svc): State<AppState>, body: Bytes) -> Json<MessageResponse> {
    let request: UnbindRequest = parse_body(&body);
    let response = match svc
        .unbind(request.code.as_deref(), request.admin_secret.as_deref())
        .await
    {
        Ok(_) => MessageResponse::success("Unbound"),
        Err(err) => MessageResponse::failure(err.public_message()),
    };
    Json(response)
}

/// Any method other than POST on an API route.
pub async fn method_not_allowed() -> (StatusCode, Json<MessageResponse>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(MessageResponse::failure("Method not allowed")),
    )
}

/// Liveness with store backend and catalog size.
pub async fn healthz(State(svc): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "ok": true,
        "service": "activation-service",
        "store": svc.store().backend(),
        "codes": svc.catalog().len(),
    }))
}

/// Prometheus text exposition.
pub async fn metrics_text() -> Response {
    match metrics::render() {
        Ok(text) => ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], text).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "Metrics rendering failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
