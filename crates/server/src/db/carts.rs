//! Cart repository for database operations.
//!
//! Each cart is a single row whose `products` column holds the line items as
//! a JSONB array. Loads and saves always move the whole document.

use async_trait::async_trait;
use serde::Deserialize;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

use cartapp_core::{Cart, CartId, LineItem, ProductId, Quantity, UserId};

use super::{CartStore, RepositoryError};

/// Line item as stored.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredLine {
    product_id: ProductId,
    quantity: u32,
}

#[derive(FromRow)]
struct CartRow {
    id: CartId,
    user_id: String,
    /// Entries are decoded one by one in `TryFrom`, so a single malformed
    /// entry is dropped instead of making the whole cart unreadable.
    products: Json<Vec<serde_json::Value>>,
}

fn decode_line(cart_id: CartId, raw: serde_json::Value) -> Option<LineItem> {
    let line = match serde_json::from_value::<StoredLine>(raw) {
        Ok(line) => line,
        Err(e) => {
            tracing::warn!(%cart_id, error = %e, "Dropping malformed stored cart line");
            return None;
        }
    };

    match Quantity::new(line.quantity) {
        Ok(quantity) => Some(LineItem {
            product_id: line.product_id,
            quantity,
        }),
        Err(_) => {
            tracing::warn!(%cart_id, product_id = %line.product_id, "Dropping stored cart line with zero quantity");
            None
        }
    }
}

impl TryFrom<CartRow> for Cart {
    type Error = RepositoryError;

    fn try_from(row: CartRow) -> Result<Self, Self::Error> {
        let user_id = UserId::parse(&row.user_id).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid user_id in cart {}: {e}", row.id))
        })?;

        let lines = row
            .products
            .0
            .into_iter()
            .filter_map(|raw| decode_line(row.id, raw))
            .collect();

        // from_parts merges duplicate product entries.
        Ok(Self::from_parts(Some(row.id), user_id, lines))
    }
}

/// Repository for cart documents in `cartapp.cart`.
#[derive(Clone)]
pub struct CartRepository {
    pool: PgPool,
}

impl CartRepository {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CartStore for CartRepository {
    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<Cart>, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(
            r"
            SELECT id, user_id, products
            FROM cartapp.cart
            WHERE user_id = $1
            ",
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Cart::try_from).transpose()
    }

    async fn save(&self, cart: &Cart) -> Result<Cart, RepositoryError> {
        // Upsert on user_id: two first-adds racing for the same user still
        // end up with a single cart row.
        let id: CartId = sqlx::query_scalar(
            r"
            INSERT INTO cartapp.cart (user_id, products)
            VALUES ($1, $2)
            ON CONFLICT (user_id)
            DO UPDATE SET products = EXCLUDED.products, updated_at = now()
            RETURNING id
            ",
        )
        .bind(cart.user_id().as_str())
        .bind(Json(cart.lines()))
        .fetch_one(&self.pool)
        .await?;

        let mut saved = cart.clone();
        saved.set_id(id);
        Ok(saved)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn row(user_id: &str, products: serde_json::Value) -> CartRow {
        let serde_json::Value::Array(entries) = products else {
            panic!("products must be an array");
        };
        CartRow {
            id: CartId::new(1),
            user_id: user_id.to_string(),
            products: Json(entries),
        }
    }

    fn quantities(cart: &Cart) -> Vec<(i32, u32)> {
        cart.lines()
            .iter()
            .map(|l| (l.product_id.as_i32(), l.quantity.get()))
            .collect()
    }

    #[test]
    fn test_zero_quantities_dropped_on_load() {
        let cart = Cart::try_from(row(
            "u1",
            json!([
                {"productId": 1, "quantity": 2},
                {"productId": 2, "quantity": 0}
            ]),
        ))
        .unwrap();

        assert_eq!(quantities(&cart), vec![(1, 2)]);
        assert_eq!(cart.id(), Some(CartId::new(1)));
    }

    #[test]
    fn test_duplicate_entries_merged_on_load() {
        let cart = Cart::try_from(row(
            "u1",
            json!([
                {"productId": 1, "quantity": 2},
                {"productId": 1, "quantity": 3}
            ]),
        ))
        .unwrap();

        assert_eq!(quantities(&cart), vec![(1, 5)]);
    }

    #[test]
    fn test_malformed_entries_do_not_poison_cart() {
        let cart = Cart::try_from(row(
            "u1",
            json!([
                {"productId": 1, "quantity": -1},
                {"productId": 2, "quantity": 1.5},
                {"productId": "three", "quantity": 1},
                {"quantity": 4},
                "garbage",
                {"productId": 5, "quantity": 1}
            ]),
        ))
        .unwrap();

        assert_eq!(quantities(&cart), vec![(5, 1)]);
    }

    #[test]
    fn test_blank_user_id_is_data_corruption() {
        let err = Cart::try_from(row("   ", json!([]))).unwrap_err();
        assert!(matches!(err, RepositoryError::DataCorruption(msg) if msg.contains("cart 1")));
    }
}
