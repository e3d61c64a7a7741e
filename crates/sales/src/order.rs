use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use stockguard_core::field::{read_integer, read_string};
use stockguard_core::{DomainError, DomainResult};
use stockguard_inventory::ItemCode;

/// Field codes under which the order form stores its values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderFields {
    pub item_code: String,
    pub quantity: String,
}

impl Default for OrderFields {
    fn default() -> Self {
        Self {
            item_code: "item_code".to_string(),
            quantity: "qty".to_string(),
        }
    }
}

impl OrderFields {
    pub fn validate(&self) -> DomainResult<()> {
        if self.item_code.trim().is_empty() || self.quantity.trim().is_empty() {
            return Err(DomainError::validation("order field codes cannot be empty"));
        }
        Ok(())
    }
}

/// The order being submitted: which item, how many.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    item_code: ItemCode,
    quantity: i64,
}

impl Order {
    pub fn new(item_code: ItemCode, quantity: i64) -> DomainResult<Self> {
        if quantity < 0 {
            return Err(DomainError::malformed(format!(
                "quantity cannot be negative (got {quantity})"
            )));
        }
        Ok(Self {
            item_code,
            quantity,
        })
    }

    /// Parse an order out of a submission payload's field map.
    pub fn from_fields(fields: &Map<String, Value>, codes: &OrderFields) -> DomainResult<Self> {
        let item_code = ItemCode::new(read_string(fields, &codes.item_code)?)?;
        let quantity = read_integer(fields, &codes.quantity)?;
        Self::new(item_code, quantity)
    }

    /// Parse an order out of a whole submission record (must be a JSON object).
    pub fn from_record(record: &Value, codes: &OrderFields) -> DomainResult<Self> {
        let fields = record
            .as_object()
            .ok_or_else(|| DomainError::malformed("submission record must be an object"))?;
        Self::from_fields(fields, codes)
    }

    pub fn item_code(&self) -> &ItemCode {
        &self.item_code
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }
}
