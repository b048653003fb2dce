//! Subcommand implementations.

pub mod cart;
pub mod migrate;
pub mod products;
pub mod seed;
