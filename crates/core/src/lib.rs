//! `stockguard-core` — shared building blocks.
//!
//! This crate contains **pure** primitives (no IO, no async, no remote store).

pub mod entity;
pub mod error;
pub mod field;
pub mod id;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{DatasetId, RecordId};
pub use value_object::ValueObject;
