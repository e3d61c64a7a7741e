//! Configuration injected at construction time.
//!
//! Nothing here reads the environment or files; the embedding application
//! builds these values (or deserializes them) and hands them in.

use serde::{Deserialize, Serialize};

use stockguard_core::{DatasetId, DomainError, DomainResult};
use stockguard_sales::OrderFields;

/// Where inventory lives and how its records and the order form are laid out.
///
/// The inventory dataset has no default; every other field does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Dataset holding inventory records.
    pub inventory_dataset: DatasetId,
    /// Field code of the unique lookup key on inventory records.
    #[serde(default = "default_item_code_field")]
    pub item_code_field: String,
    /// Field code of the stock count on inventory records.
    #[serde(default = "default_stock_field")]
    pub stock_field: String,
    /// Field codes on the order form.
    #[serde(default)]
    pub order_fields: OrderFields,
    /// Send the revision observed by the reconciler's lookup with its write,
    /// so the store rejects the write if another writer got in between.
    #[serde(default = "default_conditional_update")]
    pub conditional_update: bool,
}

fn default_item_code_field() -> String {
    "item_code".to_string()
}

fn default_stock_field() -> String {
    "stock".to_string()
}

fn default_conditional_update() -> bool {
    true
}

impl GuardConfig {
    pub fn for_dataset(inventory_dataset: DatasetId) -> Self {
        Self {
            inventory_dataset,
            item_code_field: default_item_code_field(),
            stock_field: default_stock_field(),
            order_fields: OrderFields::default(),
            conditional_update: default_conditional_update(),
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.inventory_dataset.as_str().trim().is_empty() {
            return Err(DomainError::validation("inventory_dataset cannot be empty"));
        }
        if self.item_code_field.trim().is_empty() {
            return Err(DomainError::validation("item_code_field cannot be empty"));
        }
        if self.stock_field.trim().is_empty() {
            return Err(DomainError::validation("stock_field cannot be empty"));
        }
        self.order_fields.validate()
    }
}

/// Connection settings for [`crate::record_store::HttpRecordStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpStoreConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl HttpStoreConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn partial_config_fills_defaults() {
        let config: GuardConfig = serde_json::from_value(json!({
            "inventory_dataset": "42",
            "order_fields": { "quantity": "count" }
        }))
        .unwrap();

        assert_eq!(config.inventory_dataset.as_str(), "42");
        assert_eq!(config.stock_field, "stock");
        assert_eq!(config.order_fields.item_code, "item_code");
        assert_eq!(config.order_fields.quantity, "count");
        assert!(config.conditional_update);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn dataset_is_required() {
        let result: Result<GuardConfig, _> = serde_json::from_value(json!({ "stock_field": "count" }));
        assert!(result.is_err());
    }

    #[test]
    fn empty_field_codes_fail_validation() {
        let config = GuardConfig {
            stock_field: String::new(),
            ..GuardConfig::for_dataset(DatasetId::from(7))
        };
        assert!(matches!(config.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn http_config_defaults_timeout() {
        let config: HttpStoreConfig =
            serde_json::from_value(json!({ "base_url": "https://records.example.com" })).unwrap();
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.api_token, None);
    }
}
