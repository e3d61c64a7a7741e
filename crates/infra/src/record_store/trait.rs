use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

use stockguard_core::{DatasetId, RecordId};

/// A record as returned by the remote store.
///
/// Field values are kept exactly as the store sent them (plain or wrapped as
/// `{ "value": .. }`); decoding happens in the caller via `stockguard_core::field`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteRecord {
    pub id: RecordId,
    /// Store-side revision, when the store exposes optimistic-concurrency tokens.
    pub revision: Option<u64>,
    pub fields: Map<String, JsonValue>,
}

/// Exact-match filter on one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldFilter {
    Equals { field: String, value: String },
}

impl FieldFilter {
    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Equals {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Render into the store's query language: `field = "value"`.
    ///
    /// The value is quoted with `"` and `\` escaped, so item codes can never
    /// change the shape of the query.
    pub fn to_query(&self) -> String {
        match self {
            FieldFilter::Equals { field, value } => {
                let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
                format!("{field} = \"{escaped}\"")
            }
        }
    }
}

/// Partial update of one record.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldUpdate {
    pub fields: Map<String, JsonValue>,
    /// When set, the store must reject the write if the record moved past this revision.
    pub expected_revision: Option<u64>,
}

impl FieldUpdate {
    pub fn set(field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        let mut fields = Map::new();
        fields.insert(field.into(), value.into());
        Self {
            fields,
            expected_revision: None,
        }
    }

    pub fn with_expected_revision(mut self, revision: Option<u64>) -> Self {
        self.expected_revision = revision;
        self
    }
}

/// Acknowledgement of a successful update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReceipt {
    pub revision: Option<u64>,
}

/// Remote store fault (transport, remote-side, conflict).
///
/// Carries the original detail for operators. Never show it to end users.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordStoreError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("remote store returned {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("write conflict: {0}")]
    Conflict(String),

    #[error("could not decode store response: {0}")]
    Decode(String),

    #[error("record store unavailable: {0}")]
    Unavailable(String),
}

impl RecordStoreError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, RecordStoreError::Conflict(_))
    }
}

/// Remote key-value/record store reached via request/response calls.
///
/// Each call is a suspension point and must resolve to a result or a fault.
/// Timeouts are the implementation's business; callers add none.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Ordered records of `dataset` matching `filter`; empty when nothing matches.
    async fn query(
        &self,
        dataset: &DatasetId,
        filter: &FieldFilter,
    ) -> Result<Vec<RemoteRecord>, RecordStoreError>;

    /// Apply a partial update to one record, addressed by its id.
    async fn update(
        &self,
        dataset: &DatasetId,
        record_id: &RecordId,
        update: &FieldUpdate,
    ) -> Result<UpdateReceipt, RecordStoreError>;
}

#[async_trait]
impl<S> RecordStore for Arc<S>
where
    S: RecordStore + ?Sized,
{
    async fn query(
        &self,
        dataset: &DatasetId,
        filter: &FieldFilter,
    ) -> Result<Vec<RemoteRecord>, RecordStoreError> {
        (**self).query(dataset, filter).await
    }

    async fn update(
        &self,
        dataset: &DatasetId,
        record_id: &RecordId,
        update: &FieldUpdate,
    ) -> Result<UpdateReceipt, RecordStoreError> {
        (**self).update(dataset, record_id, update).await
    }
}
