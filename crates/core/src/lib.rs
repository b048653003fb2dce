//! Cart App Core - domain types and cart aggregation.
//!
//! This crate holds everything the server and the client agree on:
//! - `server` - REST API over the product catalog and carts
//! - `cli` - Migrations, seeding, and the terminal shopping client
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP clients. Stores resolve prices; this crate only does the
//! arithmetic.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, user keys, prices, and quantities
//! - [`api`] - Request and response bodies shared by server and client
//! - [`product`] - Catalog product record
//! - [`cart`] - Cart record and the aggregation operations over it

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod product;
pub mod types;

pub use api::{CartSummary, CartSummaryLine};
pub use cart::{Cart, CartError, CartTotal, LineItem, QuantityUpdate};
pub use product::Product;
pub use types::*;
