//! Cart route handlers.
//!
//! Handlers translate HTTP into [`CartService`] calls. Mutations answer with
//! the stored cart record; `GET /cart` answers with the resolved summary.

use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use cartapp_core::api::{AddToCartRequest, CartQuery, RemoveFromCartRequest, UpdateQuantityRequest};
use cartapp_core::{Cart, CartSummary};

use crate::error::Result;
use crate::extract::{ApiJson, ApiQuery};
use crate::services::CartService;
use crate::state::AppState;

/// Show a user's cart with products resolved and the total price.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CartQuery>,
) -> Result<Json<CartSummary>> {
    let summary = CartService::from_state(&state)
        .summary(&query.user_id)
        .await?;
    Ok(Json(summary))
}

/// Add a product to a user's cart, creating the cart on first use.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<AddToCartRequest>,
) -> Result<(StatusCode, Json<Cart>)> {
    let cart = CartService::from_state(&state)
        .add_item(&body.user_id, body.product_id, body.quantity)
        .await?;
    Ok((StatusCode::CREATED, Json(cart)))
}

/// Set the quantity of a product already in the cart.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<UpdateQuantityRequest>,
) -> Result<Json<Cart>> {
    let cart = CartService::from_state(&state)
        .update_quantity(&body.user_id, body.product_id, body.quantity)
        .await?;
    Ok(Json(cart))
}

/// Remove a product from the cart.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RemoveFromCartRequest>,
) -> Result<Json<Cart>> {
    let cart = CartService::from_state(&state)
        .remove_item(&body.user_id, body.product_id)
        .await?;
    Ok(Json(cart))
}
