//! Post-Submit Reconciler.
//!
//! Runs after the order record is durably committed. It cannot prevent or
//! roll back the order; it re-reads stock, writes the decremented level back
//! and tells the user whether that worked.
//!
//! Known limitation: there is no transaction spanning the guard's read and
//! this read/write. Concurrent orders for the same item may interleave freely
//! between them. With `conditional_update` the store rejects the write if the
//! record changed after *this* lookup; the guard-to-reconciler window stays
//! open. The clamp at zero is the only backstop against negative stock.

use serde_json::Value as JsonValue;

use stockguard_core::RecordId;
use stockguard_events::{Notification, Notifier};
use stockguard_inventory::ItemCode;
use stockguard_sales::Order;

use crate::error::ReservationError;
use crate::record_store::{FieldUpdate, RecordStore};
use crate::stock_lookup::StockLookup;

pub const RECONCILED_MESSAGE: &str = "The order was completed and inventory was updated.";
pub const UNRECONCILED_MESSAGE: &str =
    "The order was completed, but there was a problem updating inventory. Please contact an administrator.";

/// A stock write that went through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockUpdate {
    pub record_id: RecordId,
    pub item_code: ItemCode,
    pub previous_stock: i64,
    pub new_stock: i64,
    /// The subtraction went below zero and was clamped.
    pub clamped: bool,
    pub revision: Option<u64>,
}

/// What `on_after_commit` did. The order stays committed either way.
#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileOutcome {
    Reconciled {
        update: StockUpdate,
        notification: Notification,
    },
    Unreconciled {
        error: ReservationError,
        notification: Notification,
    },
}

impl ReconcileOutcome {
    pub fn is_reconciled(&self) -> bool {
        matches!(self, ReconcileOutcome::Reconciled { .. })
    }

    pub fn notification(&self) -> &Notification {
        match self {
            ReconcileOutcome::Reconciled { notification, .. }
            | ReconcileOutcome::Unreconciled { notification, .. } => notification,
        }
    }
}

pub struct PostSubmitReconciler<S, N> {
    lookup: StockLookup<S>,
    notifier: N,
}

impl<S, N> PostSubmitReconciler<S, N>
where
    S: RecordStore,
    N: Notifier,
{
    pub fn new(lookup: StockLookup<S>, notifier: N) -> Self {
        Self { lookup, notifier }
    }

    /// Re-fetch stock and write `max(stock - quantity, 0)` back to the same record id.
    ///
    /// The guard's snapshot is never reused. One lookup, at most one write, no retry.
    pub async fn reconcile(&self, order: &Order) -> Result<StockUpdate, ReservationError> {
        let config = self.lookup.config();
        let record = self
            .lookup
            .fetch_stock(order.item_code())
            .await?
            .ok_or_else(|| ReservationError::NotFound {
                item_code: order.item_code().to_string(),
            })?;

        let new_stock = record.stock_after(order.quantity());
        let expected_revision = if config.conditional_update {
            record.revision()
        } else {
            None
        };
        let update = FieldUpdate::set(&config.stock_field, new_stock)
            .with_expected_revision(expected_revision);

        let receipt = self
            .lookup
            .store()
            .update(&config.inventory_dataset, record.record_id(), &update)
            .await?;

        Ok(StockUpdate {
            record_id: record.record_id().clone(),
            item_code: record.item_code().clone(),
            previous_stock: record.stock(),
            new_stock,
            clamped: record.stock() < order.quantity(),
            revision: receipt.revision,
        })
    }

    /// `onAfterCommit(order)`: reconcile and notify. Never fails the caller.
    ///
    /// Exactly one notification is sent: info on success, warning otherwise.
    /// Failures are also logged with their original detail.
    pub async fn on_after_commit(&self, submission: &JsonValue) -> ReconcileOutcome {
        let result = match Order::from_record(submission, &self.lookup.config().order_fields) {
            Ok(order) => self.reconcile(&order).await,
            Err(e) => Err(ReservationError::from(e)),
        };

        let outcome = match result {
            Ok(update) => {
                tracing::info!(
                    item_code = %update.item_code,
                    record_id = %update.record_id,
                    previous_stock = update.previous_stock,
                    new_stock = update.new_stock,
                    clamped = update.clamped,
                    "inventory reconciled"
                );
                if update.clamped {
                    tracing::warn!(
                        item_code = %update.item_code,
                        previous_stock = update.previous_stock,
                        "stock clamped at zero; concurrent orders oversold this item"
                    );
                }
                ReconcileOutcome::Reconciled {
                    update,
                    notification: Notification::info(RECONCILED_MESSAGE),
                }
            }
            Err(error) => {
                tracing::error!(
                    error = %error,
                    conflict = matches!(&error, ReservationError::Remote(e) if e.is_conflict()),
                    "order committed but inventory was not updated"
                );
                ReconcileOutcome::Unreconciled {
                    error,
                    notification: Notification::warning(UNRECONCILED_MESSAGE),
                }
            }
        };

        self.notifier.notify(outcome.notification());
        outcome
    }
}
