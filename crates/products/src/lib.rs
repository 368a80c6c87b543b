//! Products domain module.
//!
//! This crate contains the catalog's product record and its validation rules,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod product;

pub use product::{Product, ProductDetails};
pub use rust_decimal::Decimal;
