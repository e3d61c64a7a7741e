use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError, RwLock};

use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue};

use stockguard_core::field::field;
use stockguard_core::{DatasetId, RecordId};

use super::r#trait::{
    FieldFilter, FieldUpdate, RecordStore, RecordStoreError, RemoteRecord, UpdateReceipt,
};

/// In-memory record store.
///
/// Intended for tests/dev. Records keep insertion order, every write bumps the
/// record's revision, and faults can be injected per call.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    datasets: RwLock<HashMap<DatasetId, Vec<RemoteRecord>>>,
    next_id: AtomicU64,
    queries: AtomicUsize,
    updates: AtomicUsize,
    query_faults: Mutex<Vec<RecordStoreError>>,
    update_faults: Mutex<Vec<RecordStoreError>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record with the given fields; returns its new id (revision 1).
    pub fn insert(&self, dataset: &DatasetId, fields: JsonValue) -> RecordId {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let id = RecordId::from(n);
        let record = RemoteRecord {
            id: id.clone(),
            revision: Some(1),
            fields: fields.as_object().cloned().unwrap_or_default(),
        };

        self.datasets
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(dataset.clone())
            .or_default()
            .push(record);
        id
    }

    pub fn get(&self, dataset: &DatasetId, id: &RecordId) -> Option<RemoteRecord> {
        let datasets = self.datasets.read().unwrap_or_else(PoisonError::into_inner);
        datasets.get(dataset)?.iter().find(|r| &r.id == id).cloned()
    }

    pub fn remove(&self, dataset: &DatasetId, id: &RecordId) -> Option<RemoteRecord> {
        let mut datasets = self.datasets.write().unwrap_or_else(PoisonError::into_inner);
        let records = datasets.get_mut(dataset)?;
        let idx = records.iter().position(|r| &r.id == id)?;
        Some(records.remove(idx))
    }

    /// Fail the next `query` call with `err` (queued, first in first out).
    pub fn fail_next_query(&self, err: RecordStoreError) {
        self.query_faults
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(err);
    }

    /// Fail the next `update` call with `err` (queued, first in first out).
    pub fn fail_next_update(&self, err: RecordStoreError) {
        self.update_faults
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(err);
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    fn take_fault(queue: &Mutex<Vec<RecordStoreError>>) -> Option<RecordStoreError> {
        let mut faults = queue.lock().ok()?;
        if faults.is_empty() {
            None
        } else {
            Some(faults.remove(0))
        }
    }

    fn matches(record: &RemoteRecord, filter: &FieldFilter) -> bool {
        match filter {
            FieldFilter::Equals { field: code, value } => match field(&record.fields, code) {
                Some(JsonValue::String(s)) => s == value,
                Some(JsonValue::Number(n)) => &n.to_string() == value,
                _ => false,
            },
        }
    }

    fn merge_field(fields: &mut Map<String, JsonValue>, code: &str, value: &JsonValue) {
        match fields.get_mut(code) {
            Some(JsonValue::Object(wrapped)) if wrapped.contains_key("value") => {
                wrapped.insert("value".to_string(), value.clone());
            }
            _ => {
                fields.insert(code.to_string(), value.clone());
            }
        }
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn query(
        &self,
        dataset: &DatasetId,
        filter: &FieldFilter,
    ) -> Result<Vec<RemoteRecord>, RecordStoreError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = Self::take_fault(&self.query_faults) {
            return Err(err);
        }

        let datasets = self
            .datasets
            .read()
            .map_err(|_| RecordStoreError::Unavailable("lock poisoned".to_string()))?;

        Ok(datasets
            .get(dataset)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| Self::matches(r, filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn update(
        &self,
        dataset: &DatasetId,
        record_id: &RecordId,
        update: &FieldUpdate,
    ) -> Result<UpdateReceipt, RecordStoreError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = Self::take_fault(&self.update_faults) {
            return Err(err);
        }

        let mut datasets = self
            .datasets
            .write()
            .map_err(|_| RecordStoreError::Unavailable("lock poisoned".to_string()))?;

        let record = datasets
            .get_mut(dataset)
            .and_then(|records| records.iter_mut().find(|r| &r.id == record_id))
            .ok_or_else(|| RecordStoreError::Remote {
                status: 404,
                message: format!("record {record_id} does not exist in dataset {dataset}"),
            })?;

        let current = record.revision.unwrap_or(0);
        if let Some(expected) = update.expected_revision {
            if expected != current {
                return Err(RecordStoreError::Conflict(format!(
                    "expected revision {expected}, found {current}"
                )));
            }
        }

        for (code, value) in &update.fields {
            Self::merge_field(&mut record.fields, code, value);
        }
        record.revision = Some(current + 1);

        Ok(UpdateReceipt {
            revision: record.revision,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn items() -> DatasetId {
        DatasetId::new("7").unwrap()
    }

    #[tokio::test]
    async fn query_returns_matches_in_insertion_order() {
        let store = InMemoryRecordStore::new();
        let first = store.insert(&items(), json!({ "item_code": { "value": "A" }, "stock": { "value": "1" } }));
        store.insert(&items(), json!({ "item_code": { "value": "B" }, "stock": { "value": "2" } }));
        let third = store.insert(&items(), json!({ "item_code": "A", "stock": 3 }));

        let found = store
            .query(&items(), &FieldFilter::equals("item_code", "A"))
            .await
            .unwrap();

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id, first);
        assert_eq!(found[1].id, third);
        assert_eq!(store.query_count(), 1);
    }

    #[tokio::test]
    async fn unknown_dataset_yields_empty_result() {
        let store = InMemoryRecordStore::new();
        let found = store
            .query(&DatasetId::new("99").unwrap(), &FieldFilter::equals("item_code", "A"))
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn update_keeps_wrapped_shape_and_bumps_revision() {
        let store = InMemoryRecordStore::new();
        let id = store.insert(&items(), json!({ "stock": { "type": "NUMBER", "value": "10" } }));

        let receipt = store
            .update(&items(), &id, &FieldUpdate::set("stock", 5))
            .await
            .unwrap();

        assert_eq!(receipt.revision, Some(2));
        let record = store.get(&items(), &id).unwrap();
        assert_eq!(record.fields["stock"], json!({ "type": "NUMBER", "value": 5 }));
    }

    #[tokio::test]
    async fn stale_revision_is_rejected_as_conflict() {
        let store = InMemoryRecordStore::new();
        let id = store.insert(&items(), json!({ "stock": 10 }));
        store
            .update(&items(), &id, &FieldUpdate::set("stock", 8))
            .await
            .unwrap();

        let err = store
            .update(
                &items(),
                &id,
                &FieldUpdate::set("stock", 5).with_expected_revision(Some(1)),
            )
            .await
            .unwrap_err();

        assert!(err.is_conflict());
        assert_eq!(store.get(&items(), &id).unwrap().fields["stock"], json!(8));
    }

    #[tokio::test]
    async fn injected_faults_fire_once() {
        let store = InMemoryRecordStore::new();
        store.fail_next_query(RecordStoreError::Transport("connection reset".into()));

        let filter = FieldFilter::equals("item_code", "A");
        assert!(store.query(&items(), &filter).await.is_err());
        assert!(store.query(&items(), &filter).await.is_ok());
        assert_eq!(store.query_count(), 2);
    }

    #[tokio::test]
    async fn updating_missing_record_is_remote_fault() {
        let store = InMemoryRecordStore::new();
        let err = store
            .update(&items(), &RecordId::new("404").unwrap(), &FieldUpdate::set("stock", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, RecordStoreError::Remote { status: 404, .. }));
    }

    #[test]
    fn insert_survives_a_poisoned_lock() {
        let store = std::sync::Arc::new(InMemoryRecordStore::new());
        let poisoner = store.clone();
        let _ = std::thread::spawn(move || {
            let _held = poisoner.datasets.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();
        assert!(store.datasets.is_poisoned());

        let id = store.insert(&items(), json!({ "item_code": "A", "stock": 3 }));
        assert_eq!(store.get(&items(), &id).unwrap().fields["stock"], json!(3));
    }
}
