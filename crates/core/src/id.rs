//! Opaque identifiers handed out by the remote record store.
//!
//! The store owns both identifiers; this crate never generates them, it only
//! carries them between a query and the follow-up update.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a single record inside a dataset (e.g. `$id` on REST record APIs).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

/// Identifier of a collection of records (inventory vs orders).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetId(String);

macro_rules! impl_opaque_id {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Wrap a raw identifier, rejecting blank values.
            pub fn new(raw: impl Into<String>) -> Result<Self, DomainError> {
                let raw = raw.into();
                if raw.trim().is_empty() {
                    return Err(DomainError::validation(format!("{} cannot be empty", $name)));
                }
                Ok(Self(raw))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl From<$t> for String {
            fn from(value: $t) -> Self {
                value.0
            }
        }
    };
}

impl_opaque_id!(RecordId, "RecordId");
impl_opaque_id!(DatasetId, "DatasetId");

impl From<u64> for RecordId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<u64> for DatasetId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl RecordId {
    /// Read an identifier out of a JSON value; stores return ids as strings or numbers.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, DomainError> {
        match value {
            serde_json::Value::String(s) => Self::new(s.clone()),
            serde_json::Value::Number(n) => Self::new(n.to_string()),
            other => Err(DomainError::malformed(format!(
                "record id must be a string or number, got {other}"
            ))),
        }
    }
}
