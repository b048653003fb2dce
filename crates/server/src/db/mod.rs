//! Persistence for the product catalog and carts.
//!
//! # Database: `cartapp`
//!
//! ## Tables (schema `cartapp`)
//!
//! - `product` - Catalog records (`id`, `name`, `price`, `description`)
//! - `cart` - One document per user: `user_id` plus a JSONB `products`
//!   array of `{productId, quantity}` pairs
//!
//! Carts are read and written as whole records. Product references inside a
//! cart are resolved against `product` at read time.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p cartapp-cli -- migrate
//! ```
//!
//! # Backends
//!
//! Handlers only see the [`ProductStore`] and [`CartStore`] traits. The
//! Postgres repositories are used in production; [`MemoryStore`] backs tests
//! and `CARTAPP_STORAGE=memory` demo runs.

pub mod carts;
pub mod memory;
pub mod products;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::Deserialize;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use cartapp_core::{Cart, Price, Product, ProductId, UserId};

pub use carts::CartRepository;
pub use memory::MemoryStore;
pub use products::ProductRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., duplicate product name).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// A product to insert into the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub description: String,
}

/// Read access to the product catalog, plus out-of-band inserts for seeding.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All products, ordered by ID.
    async fn list(&self) -> Result<Vec<Product>, RepositoryError>;

    /// A single product, if it exists.
    async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// The subset of `ids` that exist. Missing IDs are skipped.
    async fn get_many(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError>;

    /// Insert a product and return it with its assigned ID.
    async fn create(&self, product: &NewProduct) -> Result<Product, RepositoryError>;
}

/// Whole-record storage of carts, keyed by user.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// The user's cart, if one has been saved.
    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<Cart>, RepositoryError>;

    /// Insert or replace the user's cart. Returns the cart with its ID set.
    async fn save(&self, cart: &Cart) -> Result<Cart, RepositoryError>;

    /// Check that the backing store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
