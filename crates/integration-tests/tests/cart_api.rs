//! HTTP contract tests for the catalog and cart endpoints.
//!
//! Requests go through the full router (CORS, request ID, tracing layers)
//! backed by the in-memory store.

#![allow(clippy::unwrap_used)]

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};

use cartapp_core::ProductId;
use cartapp_integration_tests::TestApp;

fn total(body: &Value) -> f64 {
    body["totalPrice"].as_f64().unwrap()
}

fn quantity_of(body: &Value, product_id: i64) -> Option<u64> {
    body["products"]
        .as_array()?
        .iter()
        .find(|l| l["productId"].as_i64() == Some(product_id))
        .and_then(|l| l["quantity"].as_u64())
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn test_list_products() {
    let app = TestApp::new();

    let (status, body) = app.request(Method::GET, "/products", None).await;

    assert_eq!(status, StatusCode::OK);
    let products = body.as_array().unwrap();
    assert_eq!(products.len(), 3);
    assert_eq!(products[0]["_id"], 1);
    assert_eq!(products[0]["name"], "Mug");
    assert!((products[0]["price"].as_f64().unwrap() - 10.0).abs() < f64::EPSILON);
    assert_eq!(products[0]["description"], "Mug for testing");
}

#[tokio::test]
async fn test_api_prefix_serves_same_routes() {
    let app = TestApp::new();

    let (root_status, root) = app.request(Method::GET, "/products", None).await;
    let (api_status, api) = app.request(Method::GET, "/api/products", None).await;

    assert_eq!(root_status, StatusCode::OK);
    assert_eq!(api_status, StatusCode::OK);
    assert_eq!(root, api);
}

// ============================================================================
// Add & read
// ============================================================================

#[tokio::test]
async fn test_add_accumulates_and_totals() {
    let app = TestApp::new();

    let (status, cart) = app
        .request(
            Method::POST,
            "/cart",
            Some(json!({"userId": "u1", "productId": 1, "quantity": 2})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(cart["userId"], "u1");
    assert!(cart["_id"].is_i64());

    let (_, summary) = app.request(Method::GET, "/cart?userId=u1", None).await;
    assert_eq!(quantity_of(&summary, 1), Some(2));
    assert!((total(&summary) - 20.0).abs() < f64::EPSILON);

    let (status, cart) = app
        .request(
            Method::POST,
            "/cart",
            Some(json!({"userId": "u1", "productId": 1, "quantity": 3})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(cart["products"].as_array().unwrap().len(), 1);

    let (_, summary) = app.request(Method::GET, "/cart?userId=u1", None).await;
    assert_eq!(quantity_of(&summary, 1), Some(5));
    assert!((total(&summary) - 50.0).abs() < f64::EPSILON);
    assert_eq!(summary["products"][0]["product"]["name"], "Mug");
}

#[tokio::test]
async fn test_add_defaults_to_one_unit() {
    let app = TestApp::new();

    let (status, cart) = app
        .request(
            Method::POST,
            "/api/cart",
            Some(json!({"userId": "u2", "productId": 2})),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(cart["products"][0]["quantity"], 1);
}

#[tokio::test]
async fn test_mixed_cart_total() {
    let app = TestApp::new();

    for (product_id, quantity) in [(1, 2), (2, 1)] {
        let (status, _) = app
            .request(
                Method::POST,
                "/cart",
                Some(json!({"userId": "u3", "productId": product_id, "quantity": quantity})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, summary) = app.request(Method::GET, "/cart?userId=u3", None).await;
    assert!((total(&summary) - 25.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_carts_are_per_user() {
    let app = TestApp::new();

    app.request(
        Method::POST,
        "/cart",
        Some(json!({"userId": "alice", "productId": 3})),
    )
    .await;

    let (status, summary) = app.request(Method::GET, "/cart?userId=bob", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["products"], json!([]));
}

#[tokio::test]
async fn test_get_cart_without_cart_is_empty() {
    let app = TestApp::new();

    let (status, body) = app.request(Method::GET, "/cart?userId=nobody", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["products"], json!([]));
    assert!(total(&body).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_dangling_product_contributes_zero() {
    let app = TestApp::new();

    for product_id in [1, 2] {
        app.request(
            Method::POST,
            "/cart",
            Some(json!({"userId": "u4", "productId": product_id})),
        )
        .await;
    }
    app.store.remove_product(ProductId::new(2)).await.unwrap();

    let (status, summary) = app.request(Method::GET, "/cart?userId=u4", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["products"].as_array().unwrap().len(), 2);
    assert!(summary["products"][1].get("product").is_none());
    assert!((total(&summary) - 10.0).abs() < f64::EPSILON);
}

// ============================================================================
// Update & remove
// ============================================================================

#[tokio::test]
async fn test_update_replaces_quantity() {
    let app = TestApp::new();
    app.request(
        Method::POST,
        "/cart",
        Some(json!({"userId": "u5", "productId": 1, "quantity": 4})),
    )
    .await;

    let (status, cart) = app
        .request(
            Method::PUT,
            "/cart",
            Some(json!({"userId": "u5", "productId": 1, "quantity": 1})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["products"][0]["quantity"], 1);
}

#[tokio::test]
async fn test_update_to_zero_removes_line() {
    let app = TestApp::new();
    app.request(
        Method::POST,
        "/cart",
        Some(json!({"userId": "u6", "productId": 1})),
    )
    .await;

    let (status, cart) = app
        .request(
            Method::PUT,
            "/cart",
            Some(json!({"userId": "u6", "productId": 1, "quantity": 0})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["products"], json!([]));
}

#[tokio::test]
async fn test_update_missing_cart_is_404() {
    let app = TestApp::new();

    let (status, body) = app
        .request(
            Method::PUT,
            "/cart",
            Some(json!({"userId": "ghost", "productId": 1, "quantity": 2})),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"message": "Cart not found"}));
}

#[tokio::test]
async fn test_update_missing_line_is_404() {
    let app = TestApp::new();
    app.request(
        Method::POST,
        "/cart",
        Some(json!({"userId": "u7", "productId": 1})),
    )
    .await;

    let (status, body) = app
        .request(
            Method::PUT,
            "/cart",
            Some(json!({"userId": "u7", "productId": 2, "quantity": 2})),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found in cart");
}

#[tokio::test]
async fn test_remove_is_idempotent() {
    let app = TestApp::new();
    app.request(
        Method::POST,
        "/cart",
        Some(json!({"userId": "u8", "productId": 1})),
    )
    .await;

    let remove = json!({"userId": "u8", "productId": 1});
    let (first, cart) = app.request(Method::DELETE, "/cart", Some(remove.clone())).await;
    let (second, again) = app.request(Method::DELETE, "/cart", Some(remove)).await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);
    assert_eq!(cart["products"], json!([]));
    assert_eq!(cart, again);
}

#[tokio::test]
async fn test_remove_missing_cart_is_404() {
    let app = TestApp::new();

    let (status, body) = app
        .request(
            Method::DELETE,
            "/cart",
            Some(json!({"userId": "ghost", "productId": 1})),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Cart not found");
}

// ============================================================================
// Validation
// ============================================================================

#[tokio::test]
async fn test_add_unknown_product_is_404() {
    let app = TestApp::new();

    let (status, body) = app
        .request(
            Method::POST,
            "/cart",
            Some(json!({"userId": "u9", "productId": 999})),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product 999 not found");
}

#[tokio::test]
async fn test_add_zero_quantity_is_400() {
    let app = TestApp::new();

    let (status, body) = app
        .request(
            Method::POST,
            "/cart",
            Some(json!({"userId": "u10", "productId": 1, "quantity": 0})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_malformed_json_is_400_with_message() {
    let app = TestApp::new();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/cart")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"userId\": "))
        .unwrap();

    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_blank_user_id_is_rejected() {
    let app = TestApp::new();

    let (status, body) = app
        .request(
            Method::POST,
            "/cart",
            Some(json!({"userId": "  ", "productId": 1})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_get_cart_requires_user_id() {
    let app = TestApp::new();

    let (status, body) = app.request(Method::GET, "/cart", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

// ============================================================================
// Health & middleware
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new();

    let (live, body) = app.request(Method::GET, "/health", None).await;
    let (ready, _) = app.request(Method::GET, "/health/ready", None).await;

    assert_eq!(live, StatusCode::OK);
    assert_eq!(body, Value::String("ok".to_string()));
    assert_eq!(ready, StatusCode::OK);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    use tower::ServiceExt;

    let app = TestApp::new();
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "req-123")
        .body(Body::empty())
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.headers()["x-request-id"], "req-123");
}
