//! Business logic services.
//!
//! Services sit between route handlers and the stores. They hold no state
//! of their own beyond handles to the stores.

pub mod cart;

pub use cart::{CartService, CartServiceError};
