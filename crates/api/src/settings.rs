//! Process settings for the webhook binary, read from environment variables.

use thiserror::Error;

use stockguard_core::{DatasetId, DomainError};
use stockguard_infra::{GuardConfig, HttpStoreConfig};

pub const STORE_URL: &str = "STOCKGUARD_STORE_URL";
pub const API_TOKEN: &str = "STOCKGUARD_API_TOKEN";
pub const INVENTORY_DATASET: &str = "STOCKGUARD_INVENTORY_DATASET";
pub const TIMEOUT_SECS: &str = "STOCKGUARD_TIMEOUT_SECS";
pub const BIND: &str = "STOCKGUARD_BIND";

const DEFAULT_BIND: &str = "0.0.0.0:8080";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} is invalid: {detail}")]
    Invalid { name: &'static str, detail: String },
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub bind: String,
    pub store: HttpStoreConfig,
    pub guard: GuardConfig,
}

impl Settings {
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build settings from any name → value source (the environment in production).
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let base_url = get(STORE_URL)
            .filter(|v| !v.trim().is_empty())
            .ok_or(SettingsError::Missing(STORE_URL))?;

        let mut store = HttpStoreConfig::new(base_url);
        store.api_token = get(API_TOKEN).filter(|v| !v.is_empty());
        if let Some(raw) = get(TIMEOUT_SECS) {
            store.timeout_secs = raw.trim().parse().map_err(|e| SettingsError::Invalid {
                name: TIMEOUT_SECS,
                detail: format!("{e}"),
            })?;
        }

        let dataset = get(INVENTORY_DATASET)
            .filter(|v| !v.trim().is_empty())
            .ok_or(SettingsError::Missing(INVENTORY_DATASET))?;
        let guard = GuardConfig::for_dataset(
            DatasetId::new(dataset).map_err(|e| invalid(INVENTORY_DATASET, e))?,
        );
        guard.validate().map_err(|e| invalid(INVENTORY_DATASET, e))?;

        Ok(Self {
            bind: get(BIND).unwrap_or_else(|| DEFAULT_BIND.to_string()),
            store,
            guard,
        })
    }
}

fn invalid(name: &'static str, err: DomainError) -> SettingsError {
    SettingsError::Invalid {
        name,
        detail: err.to_string(),
    }
}
