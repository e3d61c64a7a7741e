//! End-to-end submission scenarios.
//!
//! Tests: before-commit → (external commit) → after-commit against the
//! in-memory store.
//!
//! Verifies:
//! - refused orders never touch inventory
//! - accepted orders decrement inventory exactly once
//! - racing orders never drive stock negative
//! - a rival write between read and write is rejected or overwritten per mode

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value as JsonValue, json};

use stockguard_core::{DatasetId, RecordId};
use stockguard_events::{AbortReason, CommitDecision, RecordingNotifier, Severity};

use crate::config::GuardConfig;
use crate::error::ReservationError;
use crate::hooks::SubmissionHooks;
use crate::reconciler::ReconcileOutcome;
use crate::record_store::{
    FieldFilter, FieldUpdate, InMemoryRecordStore, RecordStore, RecordStoreError, RemoteRecord,
    UpdateReceipt,
};

type Hooks = SubmissionHooks<Arc<InMemoryRecordStore>, Arc<RecordingNotifier>>;

fn inventory() -> DatasetId {
    DatasetId::new("inventory").unwrap()
}

fn setup() -> (Arc<InMemoryRecordStore>, Arc<RecordingNotifier>, Hooks) {
    let store = Arc::new(InMemoryRecordStore::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let hooks = SubmissionHooks::new(
        store.clone(),
        GuardConfig::for_dataset(inventory()),
        notifier.clone(),
    )
    .unwrap();
    (store, notifier, hooks)
}

fn stock_item(store: &InMemoryRecordStore, code: &str, stock: i64) -> RecordId {
    store.insert(
        &inventory(),
        json!({
            "item_code": { "type": "SINGLE_LINE_TEXT", "value": code },
            "stock": { "type": "NUMBER", "value": stock.to_string() },
        }),
    )
}

fn current_stock(store: &InMemoryRecordStore, id: &RecordId) -> i64 {
    let record = store.get(&inventory(), id).unwrap();
    match &record.fields["stock"]["value"] {
        JsonValue::Number(n) => n.as_i64().unwrap(),
        JsonValue::String(s) => s.parse().unwrap(),
        other => panic!("unexpected stock value {other}"),
    }
}

fn order(code: &str, qty: i64) -> JsonValue {
    json!({
        "item_code": { "type": "SINGLE_LINE_TEXT", "value": code },
        "qty": { "type": "NUMBER", "value": qty.to_string() },
    })
}

#[tokio::test]
async fn scenario_a_accepted_order_decrements_stock() {
    let (store, notifier, hooks) = setup();
    let id = stock_item(&store, "A-100", 10);
    let submission = order("A-100", 5);

    assert_eq!(hooks.on_before_commit(&submission).await, CommitDecision::Proceed);
    let outcome = hooks.on_after_commit(&submission).await;

    assert!(outcome.is_reconciled());
    assert_eq!(current_stock(&store, &id), 5);
    assert_eq!(store.update_count(), 1);
    assert_eq!(notifier.last().unwrap().severity, Severity::Info);
}

#[tokio::test]
async fn scenario_b_short_stock_is_refused_without_write() {
    let (store, notifier, hooks) = setup();
    let id = stock_item(&store, "A-100", 3);

    let decision = hooks.on_before_commit(&order("A-100", 5)).await;

    assert_eq!(
        decision.error_message().as_deref(),
        Some("Insufficient stock (current stock: 3).")
    );
    assert_eq!(current_stock(&store, &id), 3);
    assert_eq!(store.update_count(), 0);
    assert!(notifier.notifications().is_empty());
}

#[tokio::test]
async fn scenario_c_racing_orders_clamp_at_zero() {
    let (store, _notifier, hooks) = setup();
    let id = stock_item(&store, "A-100", 5);
    let first = order("A-100", 5);
    let second = order("A-100", 5);

    // Both guards read stock=5 before either order is reconciled.
    assert_eq!(hooks.on_before_commit(&first).await, CommitDecision::Proceed);
    assert_eq!(hooks.on_before_commit(&second).await, CommitDecision::Proceed);

    let a = hooks.on_after_commit(&first).await;
    assert_eq!(current_stock(&store, &id), 0);

    let b = hooks.on_after_commit(&second).await;
    assert_eq!(current_stock(&store, &id), 0);

    match (a, b) {
        (
            ReconcileOutcome::Reconciled { update: ua, .. },
            ReconcileOutcome::Reconciled { update: ub, .. },
        ) => {
            assert!(!ua.clamped);
            assert!(ub.clamped);
            assert_eq!(ub.previous_stock, 0);
            assert_eq!(ub.new_stock, 0);
        }
        other => panic!("Expected both orders reconciled, got {other:?}"),
    }
}

#[tokio::test]
async fn scenario_d_unknown_item_is_refused_and_would_warn() {
    let (store, notifier, hooks) = setup();
    let submission = order("MISSING", 1);

    let decision = hooks.on_before_commit(&submission).await;
    assert_eq!(
        decision,
        CommitDecision::Abort(AbortReason::ItemNotFound {
            item_code: "MISSING".to_string()
        })
    );

    let outcome = hooks.on_after_commit(&submission).await;
    assert!(!outcome.is_reconciled());
    assert_eq!(outcome.notification().severity, Severity::Warning);
    assert_eq!(notifier.notifications().len(), 1);
    assert_eq!(store.update_count(), 0);
}

#[tokio::test]
async fn item_deleted_between_stages_is_reported() {
    let (store, notifier, hooks) = setup();
    let id = stock_item(&store, "A-100", 10);
    let submission = order("A-100", 2);

    assert_eq!(hooks.on_before_commit(&submission).await, CommitDecision::Proceed);
    store.remove(&inventory(), &id);

    let outcome = hooks.on_after_commit(&submission).await;
    assert!(!outcome.is_reconciled());
    assert_eq!(notifier.last().unwrap().severity, Severity::Warning);
    assert_eq!(store.update_count(), 0);
}

#[tokio::test]
async fn concurrent_submissions_for_different_items_do_not_interfere() {
    let (store, notifier, hooks) = setup();
    let a = stock_item(&store, "A-100", 10);
    let b = stock_item(&store, "B-200", 4);
    let hooks = Arc::new(hooks);

    let mut handles = Vec::new();
    for (code, qty) in [("A-100", 3), ("B-200", 1)] {
        let hooks = hooks.clone();
        handles.push(tokio::spawn(async move {
            let submission = order(code, qty);
            let decision = hooks.on_before_commit(&submission).await;
            let outcome = hooks.on_after_commit(&submission).await;
            (decision, outcome.is_reconciled())
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), (CommitDecision::Proceed, true));
    }

    assert_eq!(current_stock(&store, &a), 7);
    assert_eq!(current_stock(&store, &b), 3);
    let sent = notifier.notifications();
    assert_eq!(sent.len(), 2);
    assert!(sent.iter().all(|n| n.severity == Severity::Info));
}

/// Lets a rival writer land on a record between the reconciler's read and write.
struct RacingStore {
    inner: Arc<InMemoryRecordStore>,
    rival: Mutex<Option<(RecordId, FieldUpdate)>>,
}

#[async_trait]
impl RecordStore for RacingStore {
    async fn query(
        &self,
        dataset: &DatasetId,
        filter: &FieldFilter,
    ) -> Result<Vec<RemoteRecord>, RecordStoreError> {
        self.inner.query(dataset, filter).await
    }

    async fn update(
        &self,
        dataset: &DatasetId,
        record_id: &RecordId,
        update: &FieldUpdate,
    ) -> Result<UpdateReceipt, RecordStoreError> {
        let rival = self.rival.lock().unwrap().take();
        if let Some((id, write)) = rival {
            self.inner.update(dataset, &id, &write).await?;
        }
        self.inner.update(dataset, record_id, update).await
    }
}

type RacingHooks = SubmissionHooks<Arc<RacingStore>, Arc<RecordingNotifier>>;

fn racing_hooks(
    config: GuardConfig,
    stock: i64,
    rival_stock: i64,
) -> (Arc<InMemoryRecordStore>, RecordId, RacingHooks, Arc<RecordingNotifier>) {
    let inner = Arc::new(InMemoryRecordStore::new());
    let id = stock_item(&inner, "A-100", stock);
    let store = RacingStore {
        inner: inner.clone(),
        rival: Mutex::new(Some((id.clone(), FieldUpdate::set("stock", rival_stock)))),
    };
    let notifier = Arc::new(RecordingNotifier::new());
    let hooks = SubmissionHooks::new(Arc::new(store), config, notifier.clone()).unwrap();
    (inner, id, hooks, notifier)
}

#[tokio::test]
async fn same_item_race_rejects_the_stale_conditional_write() {
    let (store, id, hooks, notifier) =
        racing_hooks(GuardConfig::for_dataset(inventory()), 10, 8);

    let outcome = hooks.on_after_commit(&order("A-100", 3)).await;

    match outcome {
        ReconcileOutcome::Unreconciled {
            error: ReservationError::Remote(e),
            ..
        } => assert!(e.is_conflict()),
        other => panic!("Expected a rejected conditional write, got {other:?}"),
    }
    assert_eq!(current_stock(&store, &id), 8);
    assert_eq!(store.update_count(), 2);
    let sent = notifier.notifications();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].severity, Severity::Warning);
}

#[tokio::test]
async fn same_item_race_overwrites_the_rival_in_last_write_wins_mode() {
    let config = GuardConfig {
        conditional_update: false,
        ..GuardConfig::for_dataset(inventory())
    };
    let (store, id, hooks, notifier) = racing_hooks(config, 10, 8);

    let outcome = hooks.on_after_commit(&order("A-100", 3)).await;

    assert!(outcome.is_reconciled());
    assert_eq!(current_stock(&store, &id), 7);
    assert_eq!(notifier.last().unwrap().severity, Severity::Info);
}

#[tokio::test]
async fn invalid_configuration_is_rejected_up_front() {
    let store = Arc::new(InMemoryRecordStore::new());
    let config = GuardConfig {
        item_code_field: " ".to_string(),
        ..GuardConfig::for_dataset(inventory())
    };

    let result = SubmissionHooks::new(store, config, Arc::new(RecordingNotifier::new()));
    assert!(result.is_err());
}
