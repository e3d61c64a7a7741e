use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use stockguard_events::{AbortReason, CommitDecision, Notification};
use stockguard_infra::ReconcileOutcome;

// -------------------------
// Request DTOs
// -------------------------

/// Body the dispatcher sends for either stage: the submitted record's fields.
#[derive(Debug, Deserialize)]
pub struct SubmissionRequest {
    pub record: JsonValue,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct BeforeCommitResponse {
    pub allowed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<AbortReason>,
}

impl From<CommitDecision> for BeforeCommitResponse {
    fn from(decision: CommitDecision) -> Self {
        match decision {
            CommitDecision::Proceed => Self {
                allowed: true,
                error: None,
                reason: None,
            },
            CommitDecision::Abort(reason) => Self {
                allowed: false,
                error: Some(reason.message()),
                reason: Some(reason),
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AfterCommitResponse {
    pub reconciled: bool,
    pub notification: Notification,
}

impl From<ReconcileOutcome> for AfterCommitResponse {
    fn from(outcome: ReconcileOutcome) -> Self {
        Self {
            reconciled: outcome.is_reconciled(),
            notification: outcome.notification().clone(),
        }
    }
}
