//! Request and response bodies of the cart REST API.
//!
//! The server deserializes requests and serializes responses with these
//! types; the CLI client does the opposite, so both sides stay in lockstep.

use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::product::Product;
use crate::types::{Price, ProductId, Quantity, UserId};

/// Body of `POST /cart`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub user_id: UserId,
    pub product_id: ProductId,
    /// Units to add. Defaults to 1 when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
}

/// Body of `PUT /cart`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuantityRequest {
    pub user_id: UserId,
    pub product_id: ProductId,
    /// New quantity. 0 removes the line.
    pub quantity: u32,
}

/// Body of `DELETE /cart`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromCartRequest {
    pub user_id: UserId,
    pub product_id: ProductId,
}

/// Query string of `GET /cart`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartQuery {
    pub user_id: UserId,
}

/// Error body returned with every non-2xx status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

/// One resolved line of `GET /cart`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummaryLine {
    pub product_id: ProductId,
    pub quantity: Quantity,
    /// Current product record. Absent when the product no longer exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
}

/// Response of `GET /cart`: line items with products resolved, plus the total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub products: Vec<CartSummaryLine>,
    pub total_price: Price,
}

impl CartSummary {
    /// The summary of a user who has no cart yet.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            products: Vec::new(),
            total_price: Price::ZERO,
        }
    }

    /// Resolve a cart's product references against `catalog` and total it.
    ///
    /// Returns the summary along with the product IDs that could not be
    /// resolved, so the caller can report them.
    #[must_use]
    pub fn resolve(cart: &Cart, catalog: &[Product]) -> (Self, Vec<ProductId>) {
        let find = |id: ProductId| catalog.iter().find(|p| p.id == id);

        let totals = cart.compute_total(|id| find(id).map(|p| p.price));
        let products = cart
            .lines()
            .iter()
            .map(|line| CartSummaryLine {
                product_id: line.product_id,
                quantity: line.quantity,
                product: find(line.product_id).cloned(),
            })
            .collect();

        (
            Self {
                products,
                total_price: totals.total,
            },
            totals.unresolved,
        )
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.products
            .iter()
            .map(|l| u64::from(l.quantity.get()))
            .sum()
    }
}
