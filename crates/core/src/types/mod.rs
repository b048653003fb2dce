//! Core types for the cart app.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod quantity;
pub mod user;

pub use id::*;
pub use price::{Price, PriceError};
pub use quantity::{Quantity, QuantityError};
pub use user::{UserId, UserIdError};
