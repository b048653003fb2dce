//! Cart App server library.
//!
//! This crate provides the REST API as a library, so the binary, the CLI and
//! the integration tests all build the same router.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode, Uri};
use axum::{Router, routing::get};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::ServerConfig;
use error::AppError;
use state::AppState;

/// Build the application router with health checks, API routes and the
/// tracing, request ID and CORS layers.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .fallback(route_not_found)
        .with_state(state)
        .layer(cors)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
}

/// CORS policy: a single configured origin, or any origin if unset.
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match &config.cors_origin {
        Some(origin) => layer.allow_origin(AllowOrigin::exact(origin.clone())),
        None => layer.allow_origin(Any),
    }
}

/// Unknown paths get the same `{message}` body as every other error.
async fn route_not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("Route {}", uri.path()))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the cart store is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.carts().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::body::to_bytes;
    use tower::ServiceExt;

    use super::*;
    use db::MemoryStore;

    fn test_app() -> Router {
        let state = AppState::in_memory(ServerConfig::default(), Arc::new(MemoryStore::demo()));
        app(state)
    }

    async fn get(uri: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = test_app().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"ok");

        let (status, _) = get("/health/ready").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_demo_catalog_listing() {
        let (status, body) = get("/api/products").await;
        assert_eq!(status, StatusCode::OK);

        let products: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(products.as_array().unwrap().len(), 3);
        assert_eq!(products[0]["name"], "Espresso Cup");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404_with_message() {
        let (status, body) = get("/orders").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["message"], "Route /orders not found");
    }

    #[tokio::test]
    async fn test_missing_user_id_has_message() {
        let (status, body) = get("/cart").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(body["message"].is_string());
    }
}
