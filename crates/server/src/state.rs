//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ServerConfig;
use crate::db::{CartRepository, CartStore, MemoryStore, ProductRepository, ProductStore};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the stores and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    products: Arc<dyn ProductStore>,
    carts: Arc<dyn CartStore>,
}

impl AppState {
    /// Create a new application state over explicit stores.
    #[must_use]
    pub fn new(
        config: ServerConfig,
        products: Arc<dyn ProductStore>,
        carts: Arc<dyn CartStore>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                products,
                carts,
            }),
        }
    }

    /// Create state backed by `PostgreSQL` repositories.
    #[must_use]
    pub fn postgres(config: ServerConfig, pool: PgPool) -> Self {
        Self::new(
            config,
            Arc::new(ProductRepository::new(pool.clone())),
            Arc::new(CartRepository::new(pool)),
        )
    }

    /// Create state backed by a single in-memory store.
    #[must_use]
    pub fn in_memory(config: ServerConfig, store: Arc<MemoryStore>) -> Self {
        Self::new(config, store.clone(), store)
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a handle to the product store.
    #[must_use]
    pub fn products(&self) -> Arc<dyn ProductStore> {
        Arc::clone(&self.inner.products)
    }

    /// Get a handle to the cart store.
    #[must_use]
    pub fn carts(&self) -> Arc<dyn CartStore> {
        Arc::clone(&self.inner.carts)
    }
}
