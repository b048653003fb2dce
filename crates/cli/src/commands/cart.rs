//! `cartapp-cli cart ...`: one-shot cart operations.

use std::io::{self, Write};

use cartapp_cli::{ApiClient, render};
use cartapp_core::api::{AddToCartRequest, RemoveFromCartRequest, UpdateQuantityRequest};
use cartapp_core::{ProductId, UserId};

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Print a user's cart.
///
/// # Errors
///
/// Returns an error if the API call or writing to stdout fails.
pub async fn show(client: &ApiClient, user_id: &UserId) -> CommandResult {
    let summary = client.get_cart(user_id).await?;
    let mut out = io::stdout().lock();
    render::summary(&mut out, &summary)?;
    out.flush()?;
    Ok(())
}

/// Add units of a product, then print the resulting cart.
///
/// # Errors
///
/// Returns an error if an API call fails.
pub async fn add(
    client: &ApiClient,
    user_id: &UserId,
    product_id: ProductId,
    quantity: Option<u32>,
) -> CommandResult {
    let cart = client
        .add_to_cart(&AddToCartRequest {
            user_id: user_id.clone(),
            product_id,
            quantity,
        })
        .await?;
    tracing::info!(user_id = %cart.user_id(), %product_id, "Added to cart");
    show(client, user_id).await
}

/// Set a line's quantity (0 removes), then print the resulting cart.
///
/// # Errors
///
/// Returns an error if an API call fails.
pub async fn update(
    client: &ApiClient,
    user_id: &UserId,
    product_id: ProductId,
    quantity: u32,
) -> CommandResult {
    client
        .update_quantity(&UpdateQuantityRequest {
            user_id: user_id.clone(),
            product_id,
            quantity,
        })
        .await?;
    tracing::info!(%user_id, %product_id, quantity, "Updated quantity");
    show(client, user_id).await
}

/// Remove a product, then print the resulting cart.
///
/// # Errors
///
/// Returns an error if an API call fails.
pub async fn remove(client: &ApiClient, user_id: &UserId, product_id: ProductId) -> CommandResult {
    client
        .remove_from_cart(&RemoveFromCartRequest {
            user_id: user_id.clone(),
            product_id,
        })
        .await?;
    tracing::info!(%user_id, %product_id, "Removed from cart");
    show(client, user_id).await
}
