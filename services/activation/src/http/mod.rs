//! HTTP adapter.
//!
//! Business outcomes always answer 200 with `ok` set accordingly. Only method
//! routing produces other statuses. API routes carry permissive CORS headers
//! and answer `OPTIONS` preflights directly.

pub mod dto;
mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::http::{Method, header};
use axum::routing::{MethodRouter, get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::service::ActivationService;

/// Shared application state.
pub type AppState = Arc<ActivationService>;

/// Any origin may POST JSON to the API.
fn api_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

/// POST-only API route: OPTIONS is a CORS preflight, anything else 405.
fn api_route<H, T>(handler: H) -> MethodRouter<AppState>
where
    H: axum::handler::Handler<T, AppState>,
    T: 'static,
{
    post(handler)
        .fallback(handlers::method_not_allowed)
        .layer(api_cors())
}

/// Build the complete service router.
pub fn build_router(svc: Arc<ActivationService>) -> Router {
    Router::new()
        .route("/api/verify", api_route(handlers::claim))
        .route("/api/unbind", api_route(handlers::unbind))
        .route("/healthz", get(handlers::healthz))
        .route("/metrics", get(handlers::metrics_text))
        .layer(TraceLayer::new_for_http())
        .with_state(svc)
}
