//! `cartapp-cli products`: print the catalog.

use std::io::{self, Write};

use cartapp_cli::{ApiClient, render};

/// Fetch and print the product catalog.
///
/// # Errors
///
/// Returns an error if the API call or writing to stdout fails.
pub async fn list(client: &ApiClient) -> Result<(), Box<dyn std::error::Error>> {
    let products = client.list_products().await?;
    tracing::debug!(count = products.len(), "Fetched products");

    let mut out = io::stdout().lock();
    render::products(&mut out, &products)?;
    out.flush()?;
    Ok(())
}
