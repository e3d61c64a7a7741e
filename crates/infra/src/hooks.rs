//! Entry points for the external submission dispatcher.

use std::sync::Arc;

use serde_json::Value as JsonValue;
use tracing::Instrument;

use stockguard_core::DomainResult;
use stockguard_events::{CommitDecision, Notifier, SubmissionStage};

use crate::config::GuardConfig;
use crate::guard::PreSubmitGuard;
use crate::reconciler::{PostSubmitReconciler, ReconcileOutcome};
use crate::record_store::RecordStore;
use crate::stock_lookup::StockLookup;

/// Guard + reconciler wired to one store and one configuration.
///
/// Handlers hold no per-submission state and may run concurrently for
/// different submissions.
pub struct SubmissionHooks<S, N> {
    guard: PreSubmitGuard<S>,
    reconciler: PostSubmitReconciler<S, N>,
}

impl<S, N> SubmissionHooks<S, N>
where
    S: RecordStore + Clone,
    N: Notifier,
{
    pub fn new(store: S, config: GuardConfig, notifier: N) -> DomainResult<Self> {
        config.validate()?;
        let config = Arc::new(config);

        Ok(Self {
            guard: PreSubmitGuard::new(StockLookup::new(store.clone(), config.clone())),
            reconciler: PostSubmitReconciler::new(StockLookup::new(store, config), notifier),
        })
    }

    pub fn guard(&self) -> &PreSubmitGuard<S> {
        &self.guard
    }

    pub fn reconciler(&self) -> &PostSubmitReconciler<S, N> {
        &self.reconciler
    }

    pub async fn on_before_commit(&self, submission: &JsonValue) -> CommitDecision {
        self.guard
            .on_before_commit(submission)
            .instrument(stage_span(SubmissionStage::BeforeCommit))
            .await
    }

    pub async fn on_after_commit(&self, submission: &JsonValue) -> ReconcileOutcome {
        self.reconciler
            .on_after_commit(submission)
            .instrument(stage_span(SubmissionStage::AfterCommit))
            .await
    }
}

fn stage_span(stage: SubmissionStage) -> tracing::Span {
    tracing::info_span!("order_submission", stage = stage.as_str())
}
