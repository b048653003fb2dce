//! HTTP client for the cart REST API.
//!
//! Thin wrapper over `reqwest` that speaks the request and response types
//! from `cartapp_core::api`. Non-2xx responses are turned into
//! [`ClientError::Api`] carrying the server's `{message}`.

pub mod local_cart;

use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use cartapp_core::api::{
    AddToCartRequest, ErrorBody, RemoveFromCartRequest, UpdateQuantityRequest,
};
use cartapp_core::{Cart, CartSummary, Product, UserId};

pub use local_cart::{LocalCart, LocalLine};

/// Errors that can occur talking to the API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The base URL could not be parsed or joined.
    #[error("invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Transport failure or undecodable response.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an error status.
    #[error("API error ({status}): {message}")]
    Api { status: StatusCode, message: String },
}

impl ClientError {
    /// Whether the server reported the resource as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status, .. } if *status == StatusCode::NOT_FOUND)
    }
}

/// Client for one API server.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client for the API at `base_url` (e.g. `http://localhost:5000`).
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidUrl` if `base_url` is not a valid URL.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(base_url)?;
        // Url::join replaces the last segment unless the path ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
        })
    }

    /// The API base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path)?)
    }

    /// Fetch the product catalog.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport or API failure.
    pub async fn list_products(&self) -> Result<Vec<Product>, ClientError> {
        send(self.http.get(self.url("products")?)).await
    }

    /// Fetch a user's cart summary.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport or API failure.
    pub async fn get_cart(&self, user_id: &UserId) -> Result<CartSummary, ClientError> {
        let mut url = self.url("cart")?;
        url.query_pairs_mut().append_pair("userId", user_id.as_str());
        send(self.http.get(url)).await
    }

    /// Add units of a product to a user's cart.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport or API failure.
    pub async fn add_to_cart(&self, request: &AddToCartRequest) -> Result<Cart, ClientError> {
        send(self.http.post(self.url("cart")?).json(request)).await
    }

    /// Set the quantity of a product in a user's cart.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport or API failure.
    pub async fn update_quantity(
        &self,
        request: &UpdateQuantityRequest,
    ) -> Result<Cart, ClientError> {
        send(self.http.put(self.url("cart")?).json(request)).await
    }

    /// Remove a product from a user's cart.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport or API failure.
    pub async fn remove_from_cart(
        &self,
        request: &RemoveFromCartRequest,
    ) -> Result<Cart, ClientError> {
        send(self.http.delete(self.url("cart")?).json(request)).await
    }
}

/// Send a request and decode a JSON success body or an `{message}` error body.
async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ClientError> {
    let response = request.send().await?;
    let status = response.status();

    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|e| e.message)
        .unwrap_or(body);

    Err(ClientError::Api { status, message })
}
