//! Cart record and aggregation operations.
//!
//! A cart belongs to exactly one user and holds at most one line item per
//! product. All operations here are pure: they transform a [`Cart`] value in
//! memory, and the caller decides when to load and persist it.
//!
//! # Example
//!
//! ```rust
//! use cartapp_core::{Cart, Price, ProductId, Quantity, UserId};
//!
//! let mut cart = Cart::new(UserId::parse("u1").unwrap());
//! let p1 = ProductId::new(1);
//!
//! cart.add_item(p1, Quantity::new(2).unwrap()).unwrap();
//! cart.add_item(p1, Quantity::new(3).unwrap()).unwrap();
//!
//! let total = cart.compute_total(|_| Some(Price::from_cents(1000).unwrap()));
//! assert_eq!(cart.item_count(), 5);
//! assert_eq!(total.total, Price::from_cents(5000).unwrap());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{CartId, Price, ProductId, Quantity, QuantityError, UserId};

/// Errors produced by cart operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// The cart has no line item for this product.
    #[error("product {0} is not in the cart")]
    LineItemNotFound(ProductId),

    /// The requested quantity is not allowed.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(#[from] QuantityError),

    /// Merging quantities would exceed the representable maximum.
    #[error("quantity for product {0} is too large")]
    QuantityOverflow(ProductId),
}

/// One (product, quantity) pair within a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: ProductId,
    pub quantity: Quantity,
}

/// Outcome of [`Cart::update_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityUpdate {
    /// The line now has the given quantity.
    Updated(LineItem),
    /// A quantity of zero was requested, so the line was dropped.
    Removed(LineItem),
}

/// Result of [`Cart::compute_total`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartTotal {
    /// Sum of quantity × unit price over every resolved line.
    pub total: Price,
    /// Products referenced by the cart that the price lookup could not find.
    /// They contribute nothing to `total`.
    pub unresolved: Vec<ProductId>,
}

/// A user's shopping cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "CartRecord")]
pub struct Cart {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<CartId>,
    user_id: UserId,
    products: Vec<LineItem>,
}

/// Wire shape of a cart, normalized through [`Cart::from_parts`] on the way in.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartRecord {
    #[serde(rename = "_id", default)]
    id: Option<CartId>,
    user_id: UserId,
    #[serde(default)]
    products: Vec<LineItem>,
}

impl From<CartRecord> for Cart {
    fn from(record: CartRecord) -> Self {
        Self::from_parts(record.id, record.user_id, record.products)
    }
}

impl Cart {
    /// Create an empty, not yet persisted cart for a user.
    #[must_use]
    pub const fn new(user_id: UserId) -> Self {
        Self {
            id: None,
            user_id,
            products: Vec::new(),
        }
    }

    /// Rebuild a cart from stored parts.
    ///
    /// Duplicate product references are merged (saturating at `u32::MAX`) so
    /// the one-line-per-product invariant holds even for hand-edited records.
    #[must_use]
    pub fn from_parts(id: Option<CartId>, user_id: UserId, lines: Vec<LineItem>) -> Self {
        let mut products: Vec<LineItem> = Vec::with_capacity(lines.len());
        for line in lines {
            match products.iter_mut().find(|l| l.product_id == line.product_id) {
                Some(existing) => {
                    existing.quantity = existing
                        .quantity
                        .checked_add(line.quantity)
                        .unwrap_or(existing.quantity.max(line.quantity));
                }
                None => products.push(line),
            }
        }
        Self {
            id,
            user_id,
            products,
        }
    }

    /// Storage ID, `None` until the cart has been saved once.
    #[must_use]
    pub const fn id(&self) -> Option<CartId> {
        self.id
    }

    /// Record the storage ID assigned on first save.
    pub const fn set_id(&mut self, id: CartId) {
        self.id = Some(id);
    }

    /// Owner of the cart.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[LineItem] {
        &self.products
    }

    /// Look up the line for a product.
    #[must_use]
    pub fn line(&self, product_id: ProductId) -> Option<&LineItem> {
        self.products.iter().find(|l| l.product_id == product_id)
    }

    /// Whether the cart has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.products
            .iter()
            .map(|l| u64::from(l.quantity.get()))
            .sum()
    }

    /// Add `quantity` units of a product.
    ///
    /// Increments the existing line if there is one, otherwise appends a new
    /// line. Returns the line as it is after the change.
    ///
    /// # Errors
    ///
    /// Returns `CartError::QuantityOverflow` if the merged quantity does not
    /// fit in a `u32`. The cart is left unchanged in that case.
    pub fn add_item(
        &mut self,
        product_id: ProductId,
        quantity: Quantity,
    ) -> Result<LineItem, CartError> {
        if let Some(existing) = self
            .products
            .iter_mut()
            .find(|l| l.product_id == product_id)
        {
            existing.quantity = existing
                .quantity
                .checked_add(quantity)
                .ok_or(CartError::QuantityOverflow(product_id))?;
            return Ok(*existing);
        }

        let line = LineItem {
            product_id,
            quantity,
        };
        self.products.push(line);
        Ok(line)
    }

    /// Replace the quantity of an existing line.
    ///
    /// A quantity of 0 removes the line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::LineItemNotFound` if the product is not in the cart.
    pub fn update_quantity(
        &mut self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<QuantityUpdate, CartError> {
        let index = self
            .products
            .iter()
            .position(|l| l.product_id == product_id)
            .ok_or(CartError::LineItemNotFound(product_id))?;

        match Quantity::new(quantity) {
            Ok(quantity) => {
                let line = self
                    .products
                    .get_mut(index)
                    .ok_or(CartError::LineItemNotFound(product_id))?;
                line.quantity = quantity;
                Ok(QuantityUpdate::Updated(*line))
            }
            Err(QuantityError::Zero) => Ok(QuantityUpdate::Removed(self.products.remove(index))),
        }
    }

    /// Remove a product's line, if present.
    ///
    /// Removing a product that is not in the cart is a no-op.
    pub fn remove_item(&mut self, product_id: ProductId) -> Option<LineItem> {
        let index = self
            .products
            .iter()
            .position(|l| l.product_id == product_id)?;
        Some(self.products.remove(index))
    }

    /// Sum quantity × unit price over all lines.
    ///
    /// `price_of` resolves current unit prices. Lines it cannot resolve are
    /// listed in [`CartTotal::unresolved`] and left out of the total.
    pub fn compute_total<F>(&self, mut price_of: F) -> CartTotal
    where
        F: FnMut(ProductId) -> Option<Price>,
    {
        let mut unresolved = Vec::new();
        let total = self
            .products
            .iter()
            .filter_map(|line| {
                let price = price_of(line.product_id);
                if price.is_none() {
                    unresolved.push(line.product_id);
                }
                price.map(|p| p.times(line.quantity))
            })
            .sum();

        CartTotal { total, unresolved }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn user() -> UserId {
        UserId::parse("u1").unwrap()
    }

    fn qty(n: u32) -> Quantity {
        Quantity::new(n).unwrap()
    }

    fn p(id: i32) -> ProductId {
        ProductId::new(id)
    }

    #[test]
    fn test_add_new_line() {
        let mut cart = Cart::new(user());
        let line = cart.add_item(p(1), qty(2)).unwrap();

        assert_eq!(line.quantity, qty(2));
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_add_merges_into_existing_line() {
        let mut split = Cart::new(user());
        split.add_item(p(1), qty(2)).unwrap();
        split.add_item(p(1), qty(3)).unwrap();

        let mut once = Cart::new(user());
        once.add_item(p(1), qty(5)).unwrap();

        assert_eq!(split.lines(), once.lines());
        assert_eq!(split.lines().len(), 1);
    }

    #[test]
    fn test_add_overflow_leaves_cart_unchanged() {
        let mut cart = Cart::new(user());
        cart.add_item(p(1), qty(u32::MAX)).unwrap();

        let err = cart.add_item(p(1), qty(1)).unwrap_err();
        assert_eq!(err, CartError::QuantityOverflow(p(1)));
        assert_eq!(cart.line(p(1)).unwrap().quantity, qty(u32::MAX));
    }

    #[test]
    fn test_update_replaces_quantity() {
        let mut cart = Cart::new(user());
        cart.add_item(p(1), qty(2)).unwrap();

        let outcome = cart.update_quantity(p(1), 7).unwrap();
        assert!(matches!(outcome, QuantityUpdate::Updated(l) if l.quantity == qty(7)));
        assert_eq!(cart.line(p(1)).unwrap().quantity, qty(7));
    }

    #[test]
    fn test_update_missing_line_is_not_found() {
        let mut cart = Cart::new(user());
        cart.add_item(p(1), qty(1)).unwrap();

        assert_eq!(
            cart.update_quantity(p(2), 3),
            Err(CartError::LineItemNotFound(p(2)))
        );
    }

    #[test]
    fn test_update_to_zero_removes_line() {
        let mut cart = Cart::new(user());
        cart.add_item(p(1), qty(2)).unwrap();
        cart.add_item(p(2), qty(1)).unwrap();

        let outcome = cart.update_quantity(p(1), 0).unwrap();
        assert!(matches!(outcome, QuantityUpdate::Removed(l) if l.product_id == p(1)));
        assert!(cart.line(p(1)).is_none());
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut cart = Cart::new(user());
        cart.add_item(p(1), qty(2)).unwrap();

        assert!(cart.remove_item(p(1)).is_some());
        let after_first = cart.clone();
        assert!(cart.remove_item(p(1)).is_none());
        assert_eq!(cart, after_first);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_absent_leaves_cart_unchanged() {
        let mut cart = Cart::new(user());
        cart.add_item(p(1), qty(2)).unwrap();
        let before = cart.clone();

        assert!(cart.remove_item(p(9)).is_none());
        assert_eq!(cart, before);
    }

    #[test]
    fn test_compute_total() {
        let mut cart = Cart::new(user());
        cart.add_item(p(1), qty(2)).unwrap();
        cart.add_item(p(2), qty(1)).unwrap();

        let prices: HashMap<ProductId, Price> = [
            (p(1), Price::from_cents(1000).unwrap()),
            (p(2), Price::from_cents(500).unwrap()),
        ]
        .into_iter()
        .collect();

        let total = cart.compute_total(|id| prices.get(&id).copied());
        assert_eq!(total.total, Price::from_cents(2500).unwrap());
        assert!(total.unresolved.is_empty());
    }

    #[test]
    fn test_compute_total_reports_unresolved() {
        let mut cart = Cart::new(user());
        cart.add_item(p(1), qty(2)).unwrap();
        cart.add_item(p(2), qty(1)).unwrap();

        let total = cart.compute_total(|id| (id == p(1)).then(|| Price::from_cents(300).unwrap()));
        assert_eq!(total.total, Price::from_cents(600).unwrap());
        assert_eq!(total.unresolved, vec![p(2)]);
    }

    #[test]
    fn test_empty_cart_totals_zero() {
        let cart = Cart::new(user());
        let total = cart.compute_total(|_| None);
        assert_eq!(total.total, Price::ZERO);
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_from_parts_merges_duplicates() {
        let lines = vec![
            LineItem {
                product_id: p(1),
                quantity: qty(2),
            },
            LineItem {
                product_id: p(2),
                quantity: qty(1),
            },
            LineItem {
                product_id: p(1),
                quantity: qty(4),
            },
        ];

        let cart = Cart::from_parts(Some(CartId::new(3)), user(), lines);
        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.line(p(1)).unwrap().quantity, qty(6));
        assert_eq!(cart.id(), Some(CartId::new(3)));
    }

    #[test]
    fn test_wire_format() {
        let mut cart = Cart::new(user());
        cart.set_id(CartId::new(10));
        cart.add_item(p(1), qty(2)).unwrap();

        let value = serde_json::to_value(&cart).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "_id": 10,
                "userId": "u1",
                "products": [{ "productId": 1, "quantity": 2 }],
            })
        );

        let back: Cart = serde_json::from_value(value).unwrap();
        assert_eq!(back, cart);
    }

    #[test]
    fn test_unsaved_cart_omits_id() {
        let value = serde_json::to_value(Cart::new(user())).unwrap();
        assert!(value.get("_id").is_none());
    }
}
