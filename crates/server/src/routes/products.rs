//! Product route handlers.

use axum::{Json, extract::State};
use tracing::instrument;

use cartapp_core::Product;

use crate::error::Result;
use crate::state::AppState;

/// List every product in the catalog.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = state.products().list().await?;
    tracing::debug!(count = products.len(), "Listed products");
    Ok(Json(products))
}
