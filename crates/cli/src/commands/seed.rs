//! Seed the product catalog from a YAML file.
//!
//! The file is a list of products:
//!
//! ```yaml
//! - name: Espresso Cup
//!   price: 8.99
//!   description: Double-walled glass cup
//! ```
//!
//! Products whose name already exists are skipped, so seeding is repeatable.

use std::path::Path;

use thiserror::Error;
use tracing::{info, warn};

use cartapp_server::config::{ConfigError, ServerConfig};
use cartapp_server::db::{self, NewProduct, ProductRepository, ProductStore, RepositoryError};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid product file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Counts reported after seeding.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub inserted: usize,
    pub skipped: usize,
}

/// Parse a product seed file.
///
/// # Errors
///
/// Returns an error if the YAML is malformed or a price is negative.
pub fn parse_products(content: &str) -> Result<Vec<NewProduct>, SeedError> {
    Ok(serde_yaml::from_str(content)?)
}

/// Insert products through any product store, skipping duplicates.
///
/// # Errors
///
/// Returns the first repository error other than a name conflict.
pub async fn seed_products(
    store: &dyn ProductStore,
    products: &[NewProduct],
) -> Result<SeedReport, RepositoryError> {
    let mut report = SeedReport::default();

    for product in products {
        match store.create(product).await {
            Ok(created) => {
                info!(id = %created.id, name = %created.name, "Inserted product");
                report.inserted += 1;
            }
            Err(RepositoryError::Conflict(reason)) => {
                warn!(name = %product.name, %reason, "Skipping existing product");
                report.skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(report)
}

/// Seed the configured database from `file_path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or on database
/// failure.
pub async fn run(file_path: &Path) -> Result<SeedReport, SeedError> {
    let config = ServerConfig::from_env()?;

    info!(path = %file_path.display(), "Loading products from file");
    let content = tokio::fs::read_to_string(file_path)
        .await
        .map_err(|source| SeedError::Read {
            path: file_path.display().to_string(),
            source,
        })?;
    let products = parse_products(&content)?;
    info!(products = products.len(), "Parsed product file");

    let pool = db::create_pool(&config.database_url).await?;
    info!("Connected to database");

    let repo = ProductRepository::new(pool);
    let report = seed_products(&repo, &products).await?;

    info!(
        inserted = report.inserted,
        skipped = report.skipped,
        "Seeding complete"
    );
    Ok(report)
}
