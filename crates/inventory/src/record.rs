use serde::{Deserialize, Serialize};

use stockguard_core::{DomainError, Entity, RecordId, ValueObject};

/// Lookup key of an inventory record (unique per dataset by convention only).
///
/// Only presence is checked; the text is otherwise passed through to the
/// remote query untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemCode(String);

impl ItemCode {
    pub fn new(code: impl Into<String>) -> Result<Self, DomainError> {
        let code = code.into();
        if code.trim().is_empty() {
            return Err(DomainError::malformed("item code cannot be empty"));
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for ItemCode {}

impl core::fmt::Display for ItemCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Snapshot of an inventory record as returned by one lookup.
///
/// Stale as soon as it is returned: other writers may change the remote record
/// at any time. Never cache it across lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryRecord {
    id: RecordId,
    item_code: ItemCode,
    stock: i64,
    revision: Option<u64>,
}

/// Outcome of comparing a requested quantity against a snapshot.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Availability {
    Available,
    Insufficient { available: i64 },
}

impl InventoryRecord {
    pub fn new(id: RecordId, item_code: ItemCode, stock: i64, revision: Option<u64>) -> Self {
        Self {
            id,
            item_code,
            stock,
            revision,
        }
    }

    pub fn record_id(&self) -> &RecordId {
        &self.id
    }

    pub fn item_code(&self) -> &ItemCode {
        &self.item_code
    }

    /// Stock as observed. Other writers may have left it negative; it is read as-is.
    pub fn stock(&self) -> i64 {
        self.stock
    }

    /// Store revision at lookup time, if the store exposes one.
    pub fn revision(&self) -> Option<u64> {
        self.revision
    }

    pub fn availability(&self, requested: i64) -> Availability {
        if self.stock < requested {
            Availability::Insufficient {
                available: self.stock,
            }
        } else {
            Availability::Available
        }
    }

    /// Stock level to write back after `quantity` units left the warehouse.
    pub fn stock_after(&self, quantity: i64) -> i64 {
        decrement_clamped(self.stock, quantity)
    }
}

impl Entity for InventoryRecord {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// `max(stock - quantity, 0)`.
///
/// The clamp masks concurrent decrements that raced past zero; it does not
/// prevent them.
pub fn decrement_clamped(stock: i64, quantity: i64) -> i64 {
    stock.saturating_sub(quantity).max(0)
}
