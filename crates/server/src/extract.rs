//! Request extractors that reject with [`AppError`].
//!
//! axum's stock `Json` and `Query` reject with plain-text bodies and a 422
//! or 400. These wrappers route rejections through `AppError` so malformed
//! input gets the same `{"message": ...}` body as every other error.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Query string.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);
