//! Cart App CLI library.
//!
//! The API client and interactive shop live here so the binary and the
//! integration tests share them.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod client;
pub mod render;
pub mod shop;

pub use client::{ApiClient, ClientError, LocalCart};
pub use shop::{Action, Outcome, ShopSession};
