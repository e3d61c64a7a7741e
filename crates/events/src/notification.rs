//! User notification port.
//!
//! Business logic decides *what* to tell the submitting user; an implementation
//! of [`Notifier`] decides *how* (dialog, toast, HTTP response, log line).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
}

/// A message surfaced synchronously to the submitting user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
    pub issued_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            issued_at: Utc::now(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }
}

/// Capability: `notify(message, severity)`.
///
/// Implementations must not fail the caller; delivery problems are theirs to
/// absorb.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}

impl<N> Notifier for Arc<N>
where
    N: Notifier + ?Sized,
{
    fn notify(&self, notification: &Notification) {
        (**self).notify(notification)
    }
}

/// Notifier that writes to the process log (headless deployments).
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: &Notification) {
        match notification.severity {
            Severity::Info => tracing::info!(text = %notification.message, "user notification"),
            Severity::Warning => tracing::warn!(text = %notification.message, "user notification"),
        }
    }
}
