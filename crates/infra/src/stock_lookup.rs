//! Stock Lookup: item code → current inventory record, or absent.

use std::sync::Arc;

use stockguard_core::field::read_integer;
use stockguard_inventory::{InventoryRecord, ItemCode};

use crate::config::GuardConfig;
use crate::error::ReservationError;
use crate::record_store::{FieldFilter, RecordStore, RecordStoreError, RemoteRecord};

/// Fetches inventory snapshots from the remote store. No side effects.
///
/// Every call goes to the store; snapshots are stale as soon as they are returned.
pub struct StockLookup<S> {
    store: S,
    config: Arc<GuardConfig>,
}

impl<S> StockLookup<S> {
    pub fn new(store: S, config: Arc<GuardConfig>) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }
}

impl<S> StockLookup<S>
where
    S: RecordStore,
{
    /// `fetchStock(itemCode) → InventoryRecord | absent`.
    ///
    /// Remote faults propagate. A matched record whose stock cannot be read is a
    /// store fault too, not a malformed order. When the store returns several
    /// records for one item code, the first one in the response is used.
    #[tracing::instrument(
        name = "stock_lookup",
        skip_all,
        fields(item_code = %item_code, dataset = %self.config.inventory_dataset)
    )]
    pub async fn fetch_stock(
        &self,
        item_code: &ItemCode,
    ) -> Result<Option<InventoryRecord>, ReservationError> {
        let filter = FieldFilter::equals(&self.config.item_code_field, item_code.as_str());
        let records = self
            .store
            .query(&self.config.inventory_dataset, &filter)
            .await?;

        if records.len() > 1 {
            tracing::warn!(
                matches = records.len(),
                "duplicate inventory records share an item code; using the first"
            );
        }

        match records.into_iter().next() {
            None => {
                tracing::debug!("no inventory record matched");
                Ok(None)
            }
            Some(remote) => self.decode(item_code, remote).map(Some),
        }
    }

    fn decode(
        &self,
        item_code: &ItemCode,
        remote: RemoteRecord,
    ) -> Result<InventoryRecord, ReservationError> {
        let stock = read_integer(&remote.fields, &self.config.stock_field).map_err(|e| {
            tracing::error!(record_id = %remote.id, error = %e, "inventory record is corrupt");
            RecordStoreError::Decode(format!("inventory record {}: {e}", remote.id))
        })?;
        tracing::debug!(record_id = %remote.id, stock, revision = ?remote.revision, "inventory record found");
        Ok(InventoryRecord::new(
            remote.id,
            item_code.clone(),
            stock,
            remote.revision,
        ))
    }
}
