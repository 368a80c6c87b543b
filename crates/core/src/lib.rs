//! `pricegate-core`: identifiers and the domain error model shared by every crate.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{ProductId, RequestId};
