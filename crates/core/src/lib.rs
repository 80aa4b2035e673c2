//! `quickex-core` — domain building blocks.
//!
//! This crate contains **pure domain** primitives (no HTTP, no I/O).

pub mod error;
pub mod username;
pub mod value_object;

pub use error::{DomainError, DomainResult};
pub use username::Username;
pub use value_object::ValueObject;
