//! In-process store for tests and database-less demo runs.
//!
//! One `MemoryStore` implements both [`ProductStore`] and [`CartStore`]; wrap
//! it in an `Arc` and hand the same value to both sides of `AppState`.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use cartapp_core::{Cart, CartId, Price, Product, ProductId, UserId};

use super::{CartStore, NewProduct, ProductStore, RepositoryError};

#[derive(Default)]
struct Tables {
    products: BTreeMap<ProductId, Product>,
    carts: HashMap<UserId, Cart>,
    last_product_id: i32,
    last_cart_id: i32,
}

/// Catalog and carts held in memory behind a single lock.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with `products`, assigned IDs 1, 2, ...
    #[must_use]
    pub fn with_products(products: impl IntoIterator<Item = NewProduct>) -> Self {
        let mut tables = Tables::default();
        for product in products {
            tables.insert_product(&product);
        }
        Self {
            tables: RwLock::new(tables),
        }
    }

    /// A small sample catalog for `CARTAPP_STORAGE=memory`.
    #[must_use]
    pub fn demo() -> Self {
        let sample = |name: &str, cents: i64, description: &str| NewProduct {
            name: name.to_owned(),
            price: Price::from_cents(cents).unwrap_or(Price::ZERO),
            description: description.to_owned(),
        };

        Self::with_products([
            sample("Espresso Cup", 899, "Double-walled glass, 80 ml"),
            sample("Pour-Over Kettle", 4_950, "Gooseneck spout, 1 l"),
            sample("Coffee Beans", 1_600, "Single origin, 250 g"),
        ])
    }

    /// Remove a product from the catalog, leaving any cart references dangling.
    pub async fn remove_product(&self, id: ProductId) -> Option<Product> {
        self.tables.write().await.products.remove(&id)
    }
}

impl Tables {
    fn insert_product(&mut self, product: &NewProduct) -> Product {
        self.last_product_id += 1;
        let record = Product {
            id: ProductId::new(self.last_product_id),
            name: product.name.clone(),
            price: product.price,
            description: product.description.clone(),
        };
        self.products.insert(record.id, record.clone());
        record
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.tables.read().await.products.values().cloned().collect())
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.tables.read().await.products.get(&id).cloned())
    }

    async fn get_many(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.products.get(id))
            .cloned()
            .collect())
    }

    async fn create(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.products.values().any(|p| p.name == product.name) {
            return Err(RepositoryError::Conflict(format!(
                "product '{}' already exists",
                product.name
            )));
        }
        Ok(tables.insert_product(product))
    }
}

#[async_trait]
impl CartStore for MemoryStore {
    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<Cart>, RepositoryError> {
        Ok(self.tables.read().await.carts.get(user_id).cloned())
    }

    async fn save(&self, cart: &Cart) -> Result<Cart, RepositoryError> {
        let mut tables = self.tables.write().await;

        let existing_id = tables.carts.get(cart.user_id()).and_then(Cart::id);
        let id = match existing_id {
            Some(id) => id,
            None => {
                tables.last_cart_id += 1;
                CartId::new(tables.last_cart_id)
            }
        };

        let mut saved = cart.clone();
        saved.set_id(id);
        tables.carts.insert(saved.user_id().clone(), saved.clone());
        Ok(saved)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
