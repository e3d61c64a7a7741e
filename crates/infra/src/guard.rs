//! Pre-Submit Guard.
//!
//! Runs before the order record is durably stored and may refuse the commit.
//! It performs no writes.

use serde_json::Value as JsonValue;

use stockguard_events::CommitDecision;
use stockguard_inventory::{Availability, InventoryRecord};
use stockguard_sales::Order;

use crate::error::ReservationError;
use crate::record_store::RecordStore;
use crate::stock_lookup::StockLookup;

pub struct PreSubmitGuard<S> {
    lookup: StockLookup<S>,
}

impl<S> PreSubmitGuard<S>
where
    S: RecordStore,
{
    pub fn new(lookup: StockLookup<S>) -> Self {
        Self { lookup }
    }

    /// Check one order against a fresh snapshot.
    ///
    /// Returns the snapshot the decision was based on. One remote call, no retry.
    pub async fn check(&self, order: &Order) -> Result<InventoryRecord, ReservationError> {
        let record = self
            .lookup
            .fetch_stock(order.item_code())
            .await?
            .ok_or_else(|| ReservationError::NotFound {
                item_code: order.item_code().to_string(),
            })?;

        match record.availability(order.quantity()) {
            Availability::Available => Ok(record),
            Availability::Insufficient { available } => Err(ReservationError::InsufficientStock {
                item_code: order.item_code().to_string(),
                requested: order.quantity(),
                available,
            }),
        }
    }

    /// `onBeforeCommit(order)`: decide whether the pending submission may be committed.
    ///
    /// Every failure, including remote faults, turns into an abort.
    pub async fn on_before_commit(&self, submission: &JsonValue) -> CommitDecision {
        let order = match Order::from_record(submission, &self.lookup.config().order_fields) {
            Ok(order) => order,
            Err(e) => {
                let err = ReservationError::from(e);
                tracing::info!(error = %err, "commit aborted: order payload is malformed");
                return CommitDecision::Abort(err.abort_reason());
            }
        };

        match self.check(&order).await {
            Ok(record) => {
                tracing::info!(
                    item_code = %order.item_code(),
                    quantity = order.quantity(),
                    stock = record.stock(),
                    "stock check passed"
                );
                CommitDecision::Proceed
            }
            Err(err) if err.is_remote() => {
                tracing::error!(
                    item_code = %order.item_code(),
                    quantity = order.quantity(),
                    error = %err,
                    "commit aborted: stock check failed with a remote fault"
                );
                CommitDecision::Abort(err.abort_reason())
            }
            Err(err) => {
                tracing::info!(
                    item_code = %order.item_code(),
                    quantity = order.quantity(),
                    error = %err,
                    "commit aborted"
                );
                CommitDecision::Abort(err.abort_reason())
            }
        }
    }
}
