//! Integration tests for the cart app.
//!
//! The server router is driven in-process against the in-memory store, so
//! no database or running server is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cartapp-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_api` - HTTP contract of the catalog and cart endpoints
//! - `client_session` - CLI client and shop session against a live listener

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use cartapp_core::Price;
use cartapp_server::config::ServerConfig;
use cartapp_server::db::{MemoryStore, NewProduct};
use cartapp_server::state::AppState;

/// Seeded products: Mug (id 1, 10.00), Tea (id 2, 5.00), Kettle (id 3, 32.50).
pub fn catalog() -> Vec<NewProduct> {
    let product = |name: &str, cents: i64| NewProduct {
        name: name.to_string(),
        price: Price::from_cents(cents).unwrap_or(Price::ZERO),
        description: format!("{name} for testing"),
    };
    vec![
        product("Mug", 1_000),
        product("Tea", 500),
        product("Kettle", 3_250),
    ]
}

/// A running test application over a seeded in-memory store.
pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub router: Router,
}

impl TestApp {
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::with_products(catalog()));
        let state = AppState::in_memory(ServerConfig::default(), Arc::clone(&store));
        Self {
            store,
            router: cartapp_server::app(state),
        }
    }

    /// Send one request through the router and return status and JSON body.
    ///
    /// Non-JSON bodies are returned as a JSON string.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the router fails.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        self.send(request).await
    }

    /// Send a raw request.
    ///
    /// # Panics
    ///
    /// Panics if the router fails or the body cannot be read.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, body)
    }

    /// Serve the router on an ephemeral local port.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn(&self) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let router = self.router.clone();
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        addr
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
