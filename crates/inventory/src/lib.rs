//! Inventory domain module.
//!
//! Business rules for the inventory side of order creation, implemented purely
//! as deterministic logic (no IO, no HTTP, no remote store).

pub mod record;

pub use record::{Availability, InventoryRecord, ItemCode, decrement_clamped};
