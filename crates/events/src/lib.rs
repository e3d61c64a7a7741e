//! Order-submission lifecycle vocabulary.
//!
//! An external dispatcher calls into this workspace at two points of one
//! submission: before the order is committed and after it was committed.
//! This crate holds what crosses that boundary (decisions, notifications),
//! with no knowledge of the remote store.

pub mod in_memory_notifier;
pub mod notification;
pub mod submission;

pub use in_memory_notifier::RecordingNotifier;
pub use notification::{Notification, Notifier, Severity, TracingNotifier};
pub use submission::{AbortReason, CommitDecision, SubmissionStage};
