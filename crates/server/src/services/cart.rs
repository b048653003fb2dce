//! Cart service: load, mutate, persist.
//!
//! Every mutation reads the whole cart, applies one [`Cart`] operation in
//! memory, and writes the whole cart back. Nothing holds a lock across the
//! read and the write, so two concurrent mutations for the same user can
//! overwrite each other.

use std::sync::Arc;

use thiserror::Error;
use tracing::instrument;

use cartapp_core::{
    Cart, CartError, CartSummary, ProductId, Quantity, QuantityUpdate, UserId,
};

use crate::db::{CartStore, ProductStore, RepositoryError};
use crate::state::AppState;

/// Errors from cart service operations.
#[derive(Debug, Error)]
pub enum CartServiceError {
    /// The user has no cart yet.
    #[error("cart not found")]
    CartNotFound,

    /// The referenced product is not in the catalog.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// The cart rejected the operation.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Storage failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Cart operations over the configured stores.
pub struct CartService {
    products: Arc<dyn ProductStore>,
    carts: Arc<dyn CartStore>,
}

impl CartService {
    /// Create a service over explicit stores.
    #[must_use]
    pub fn new(products: Arc<dyn ProductStore>, carts: Arc<dyn CartStore>) -> Self {
        Self { products, carts }
    }

    /// Create a service over the stores in application state.
    #[must_use]
    pub fn from_state(state: &AppState) -> Self {
        Self::new(state.products(), state.carts())
    }

    /// Add a product to the user's cart, creating the cart if needed.
    ///
    /// `quantity` defaults to 1.
    ///
    /// # Errors
    ///
    /// - `ProductNotFound` if the product is not in the catalog
    /// - `Cart(InvalidQuantity)` if `quantity` is 0
    /// - `Cart(QuantityOverflow)` if the merged quantity is too large
    /// - `Repository` if storage fails
    #[instrument(skip(self))]
    pub async fn add_item(
        &self,
        user_id: &UserId,
        product_id: ProductId,
        quantity: Option<u32>,
    ) -> Result<Cart, CartServiceError> {
        let quantity = match quantity {
            Some(raw) => Quantity::new(raw).map_err(CartError::from)?,
            None => Quantity::ONE,
        };

        if self.products.get(product_id).await?.is_none() {
            return Err(CartServiceError::ProductNotFound(product_id));
        }

        let mut cart = self
            .carts
            .find_by_user(user_id)
            .await?
            .unwrap_or_else(|| Cart::new(user_id.clone()));

        let line = cart.add_item(product_id, quantity)?;
        let saved = self.carts.save(&cart).await?;

        tracing::info!(
            user_id = %user_id,
            product_id = %product_id,
            quantity = %line.quantity,
            "Added item to cart"
        );
        Ok(saved)
    }

    /// Replace the quantity of a line in the user's cart. 0 removes the line.
    ///
    /// # Errors
    ///
    /// - `CartNotFound` if the user has no cart
    /// - `Cart(LineItemNotFound)` if the product is not in the cart
    /// - `Repository` if storage fails
    #[instrument(skip(self))]
    pub async fn update_quantity(
        &self,
        user_id: &UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<Cart, CartServiceError> {
        let mut cart = self.load(user_id).await?;

        match cart.update_quantity(product_id, quantity)? {
            QuantityUpdate::Updated(line) => tracing::info!(
                user_id = %user_id,
                product_id = %product_id,
                quantity = %line.quantity,
                "Updated cart quantity"
            ),
            QuantityUpdate::Removed(_) => tracing::info!(
                user_id = %user_id,
                product_id = %product_id,
                "Quantity set to zero, removed item from cart"
            ),
        }

        Ok(self.carts.save(&cart).await?)
    }

    /// Remove a product from the user's cart. Removing an absent product is
    /// not an error.
    ///
    /// # Errors
    ///
    /// - `CartNotFound` if the user has no cart
    /// - `Repository` if storage fails
    #[instrument(skip(self))]
    pub async fn remove_item(
        &self,
        user_id: &UserId,
        product_id: ProductId,
    ) -> Result<Cart, CartServiceError> {
        let mut cart = self.load(user_id).await?;

        if cart.remove_item(product_id).is_none() {
            tracing::debug!(user_id = %user_id, product_id = %product_id, "Item was not in cart");
        }

        Ok(self.carts.save(&cart).await?)
    }

    /// The user's cart with products resolved and the total computed.
    ///
    /// A user without a cart gets an empty summary.
    ///
    /// # Errors
    ///
    /// Returns `Repository` if storage fails.
    #[instrument(skip(self))]
    pub async fn summary(&self, user_id: &UserId) -> Result<CartSummary, CartServiceError> {
        let Some(cart) = self.carts.find_by_user(user_id).await? else {
            return Ok(CartSummary::empty());
        };

        let ids: Vec<ProductId> = cart.lines().iter().map(|l| l.product_id).collect();
        let catalog = self.products.get_many(&ids).await?;

        let (summary, unresolved) = CartSummary::resolve(&cart, &catalog);
        if !unresolved.is_empty() {
            tracing::warn!(
                user_id = %user_id,
                missing = ?unresolved,
                "Cart references products that no longer exist"
            );
        }

        Ok(summary)
    }

    async fn load(&self, user_id: &UserId) -> Result<Cart, CartServiceError> {
        self.carts
            .find_by_user(user_id)
            .await?
            .ok_or(CartServiceError::CartNotFound)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cartapp_core::{Price, QuantityError};

    use super::*;
    use crate::db::{MemoryStore, NewProduct};

    fn setup() -> (CartService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::with_products([
            NewProduct {
                name: "Ten".to_string(),
                price: Price::from_cents(1000).unwrap(),
                description: String::new(),
            },
            NewProduct {
                name: "Five".to_string(),
                price: Price::from_cents(500).unwrap(),
                description: String::new(),
            },
        ]));
        (CartService::new(store.clone(), store.clone()), store)
    }

    fn user(id: &str) -> UserId {
        UserId::parse(id).unwrap()
    }

    const P1: ProductId = ProductId::new(1);
    const P2: ProductId = ProductId::new(2);

    #[tokio::test]
    async fn test_add_creates_cart_lazily() {
        let (service, store) = setup();
        assert!(store.find_by_user(&user("u1")).await.unwrap().is_none());

        let cart = service.add_item(&user("u1"), P1, None).await.unwrap();
        assert!(cart.id().is_some());
        assert_eq!(cart.line(P1).unwrap().quantity, Quantity::ONE);
    }

    #[tokio::test]
    async fn test_add_same_product_merges() {
        let (service, _) = setup();
        service.add_item(&user("u1"), P1, Some(2)).await.unwrap();
        let cart = service.add_item(&user("u1"), P1, Some(3)).await.unwrap();

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.line(P1).unwrap().quantity.get(), 5);
    }

    #[tokio::test]
    async fn test_add_zero_quantity_rejected() {
        let (service, _) = setup();
        let err = service.add_item(&user("u1"), P1, Some(0)).await.unwrap_err();
        assert!(matches!(
            err,
            CartServiceError::Cart(CartError::InvalidQuantity(QuantityError::Zero))
        ));
    }

    #[tokio::test]
    async fn test_add_unknown_product_rejected() {
        let (service, store) = setup();
        let err = service
            .add_item(&user("u1"), ProductId::new(99), None)
            .await
            .unwrap_err();
        assert!(matches!(err, CartServiceError::ProductNotFound(_)));
        assert!(store.find_by_user(&user("u1")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_without_cart() {
        let (service, _) = setup();
        let err = service
            .update_quantity(&user("nobody"), P1, 2)
            .await
            .unwrap_err();
        assert!(matches!(err, CartServiceError::CartNotFound));
    }

    #[tokio::test]
    async fn test_update_missing_line() {
        let (service, _) = setup();
        service.add_item(&user("u1"), P1, None).await.unwrap();
        let err = service.update_quantity(&user("u1"), P2, 2).await.unwrap_err();
        assert!(matches!(
            err,
            CartServiceError::Cart(CartError::LineItemNotFound(id)) if id == P2
        ));
    }

    #[tokio::test]
    async fn test_update_replaces_and_zero_removes() {
        let (service, _) = setup();
        service.add_item(&user("u1"), P1, Some(4)).await.unwrap();

        let cart = service.update_quantity(&user("u1"), P1, 2).await.unwrap();
        assert_eq!(cart.line(P1).unwrap().quantity.get(), 2);

        let cart = service.update_quantity(&user("u1"), P1, 0).await.unwrap();
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let (service, _) = setup();
        service.add_item(&user("u1"), P1, None).await.unwrap();

        let first = service.remove_item(&user("u1"), P1).await.unwrap();
        let second = service.remove_item(&user("u1"), P1).await.unwrap();
        assert_eq!(first, second);
        assert!(second.is_empty());
    }

    #[tokio::test]
    async fn test_remove_without_cart() {
        let (service, _) = setup();
        let err = service.remove_item(&user("u1"), P1).await.unwrap_err();
        assert!(matches!(err, CartServiceError::CartNotFound));
    }

    #[tokio::test]
    async fn test_summary_totals() {
        let (service, _) = setup();
        service.add_item(&user("u1"), P1, Some(2)).await.unwrap();
        service.add_item(&user("u1"), P2, Some(1)).await.unwrap();

        let summary = service.summary(&user("u1")).await.unwrap();
        assert_eq!(summary.total_price, Price::from_cents(2500).unwrap());
        assert_eq!(summary.products.len(), 2);
    }

    #[tokio::test]
    async fn test_summary_without_cart_is_empty() {
        let (service, _) = setup();
        let summary = service.summary(&user("u1")).await.unwrap();
        assert_eq!(summary, CartSummary::empty());
    }

    #[tokio::test]
    async fn test_summary_skips_deleted_products() {
        let (service, store) = setup();
        service.add_item(&user("u1"), P1, Some(2)).await.unwrap();
        service.add_item(&user("u1"), P2, Some(3)).await.unwrap();
        store.remove_product(P2).await.unwrap();

        let summary = service.summary(&user("u1")).await.unwrap();
        assert_eq!(summary.total_price, Price::from_cents(2000).unwrap());
        assert_eq!(summary.products.len(), 2);
        assert!(summary.products.iter().any(|l| l.product.is_none()));
    }
}
