//! Value object trait: equality by value, not identity.
//!
//! An item code or an order quantity has no identity of its own. Two item codes
//! with the same text are the same item code.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one. Examples in this workspace:
/// - `ItemCode("A-100")` is a value object
/// - `InventoryRecord { id: RecordId(..), .. }` is an entity (see [`crate::Entity`])
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
