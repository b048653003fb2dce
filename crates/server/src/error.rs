//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers return `Result<T, AppError>`,
//! and every error leaves as a JSON `{"message": ...}` body.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use cartapp_core::CartError;
use cartapp_core::api::ErrorBody;

use crate::db::RepositoryError;
use crate::services::cart::CartServiceError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartServiceError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Cart(err) => match err {
                CartServiceError::CartNotFound
                | CartServiceError::ProductNotFound(_)
                | CartServiceError::Cart(CartError::LineItemNotFound(_)) => StatusCode::NOT_FOUND,
                CartServiceError::Cart(
                    CartError::InvalidQuantity(_) | CartError::QuantityOverflow(_),
                ) => StatusCode::BAD_REQUEST,
                CartServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Message safe to show to clients.
    fn public_message(&self) -> String {
        match self {
            Self::Database(_) | Self::Cart(CartServiceError::Repository(_)) => {
                "Internal server error".to_string()
            }
            Self::Cart(err) => match err {
                CartServiceError::CartNotFound => "Cart not found".to_string(),
                CartServiceError::ProductNotFound(id) => format!("Product {id} not found"),
                CartServiceError::Cart(CartError::LineItemNotFound(_)) => {
                    "Product not found in cart".to_string()
                }
                other => other.to_string(),
            },
            Self::NotFound(what) => format!("{what} not found"),
            Self::BadRequest(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let body = ErrorBody {
            message: self.public_message(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
