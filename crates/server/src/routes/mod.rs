//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health               - Liveness check
//! GET    /health/ready         - Readiness check (store reachable)
//!
//! # Catalog
//! GET    /products             - Product listing
//!
//! # Cart (JSON bodies: {userId, productId, quantity?})
//! GET    /cart?userId=         - Cart lines with products resolved + totalPrice
//! POST   /cart                 - Add to cart (creates the cart on first add)
//! PUT    /cart                 - Set a line's quantity (0 removes it)
//! DELETE /cart                 - Remove a line
//! ```
//!
//! Catalog and cart routes are also mounted under `/api`.

pub mod cart;
pub mod products;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create the catalog and cart routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route(
            "/cart",
            get(cart::show)
                .post(cart::add)
                .put(cart::update)
                .delete(cart::remove),
        )
}

/// Create the full routes router, with the API at the root and under `/api`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(api_routes())
        .nest("/api", api_routes())
}
