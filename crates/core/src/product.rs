//! Catalog product record.

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// A product in the catalog.
///
/// Products are created and deleted out of band; the API only lists them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub description: String,
}
