//! Product repository for database operations.
//!
//! Queries are checked at runtime (`query_as`) rather than with the `query!`
//! macros, so the crate builds without a live database or offline cache.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use cartapp_core::{Price, Product, ProductId};

use super::{NewProduct, ProductStore, RepositoryError};

#[derive(FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    price: Price,
    description: String,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            price: row.price,
            description: row.description,
        }
    }
}

/// Repository for catalog products in `cartapp.product`.
#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductStore for ProductRepository {
    async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, price, description
            FROM cartapp.product
            ORDER BY id
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, price, description
            FROM cartapp.product
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    async fn get_many(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let raw: Vec<i32> = ids.iter().copied().map(ProductId::as_i32).collect();
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, price, description
            FROM cartapp.product
            WHERE id = ANY($1)
            ORDER BY id
            ",
        )
        .bind(raw)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn create(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            INSERT INTO cartapp.product (name, price, description)
            VALUES ($1, $2, $3)
            RETURNING id, name, price, description
            ",
        )
        .bind(&product.name)
        .bind(product.price)
        .bind(&product.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict(format!(
                    "product '{}' already exists",
                    product.name
                ));
            }
            RepositoryError::Database(e)
        })?;

        Ok(row.into())
    }
}
