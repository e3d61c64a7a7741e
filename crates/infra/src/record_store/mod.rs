//! Remote record store boundary.
//!
//! The inventory dataset lives in an external system of record reached only
//! through query/update calls. This module defines that boundary plus an
//! in-memory implementation (tests/dev) and an HTTP one.

pub mod http;
pub mod in_memory;
pub mod r#trait;

pub use http::HttpRecordStore;
pub use in_memory::InMemoryRecordStore;
pub use r#trait::{
    FieldFilter, FieldUpdate, RecordStore, RecordStoreError, RemoteRecord, UpdateReceipt,
};
