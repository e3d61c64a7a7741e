use serde::{Deserialize, Serialize};

/// Lifecycle point at which the dispatcher invoked us.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStage {
    /// `onBeforeCommit`: the order is not stored yet and can still be refused.
    BeforeCommit,
    /// `onAfterCommit`: the order is durably stored; nothing here can undo it.
    AfterCommit,
}

impl SubmissionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStage::BeforeCommit => "before_commit",
            SubmissionStage::AfterCommit => "after_commit",
        }
    }
}

/// Why a commit was refused.
///
/// Messages are meant for the submitting user. Remote fault detail never
/// appears here; it only goes to the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AbortReason {
    ItemNotFound { item_code: String },
    InsufficientStock { item_code: String, requested: i64, available: i64 },
    MalformedInput { detail: String },
    SystemError,
}

impl AbortReason {
    pub fn message(&self) -> String {
        match self {
            AbortReason::ItemNotFound { .. } => "The specified item was not found.".to_string(),
            AbortReason::InsufficientStock { available, .. } => {
                format!("Insufficient stock (current stock: {available}).")
            }
            AbortReason::MalformedInput { detail } => {
                format!("The order is missing required fields: {detail}")
            }
            AbortReason::SystemError => {
                "A system error occurred. Please contact an administrator.".to_string()
            }
        }
    }
}

/// Result of the before-commit stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum CommitDecision {
    /// Let the commit go ahead unmodified.
    Proceed,
    /// Put the submission into the aborted state.
    Abort(AbortReason),
}

impl CommitDecision {
    pub fn is_abort(&self) -> bool {
        matches!(self, CommitDecision::Abort(_))
    }

    /// User-facing cancellation message, if the commit is refused.
    pub fn error_message(&self) -> Option<String> {
        match self {
            CommitDecision::Proceed => None,
            CommitDecision::Abort(reason) => Some(reason.message()),
        }
    }
}
