//! In-memory notifier for tests/dev.

use std::sync::Mutex;

use crate::notification::{Notification, Notifier};

/// Records every notification in order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        match self.sent.lock() {
            Ok(sent) => sent.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn last(&self) -> Option<Notification> {
        self.notifications().pop()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) {
        let mut sent = match self.sent.lock() {
            Ok(sent) => sent,
            Err(poisoned) => poisoned.into_inner(),
        };
        sent.push(notification.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::Severity;

    #[test]
    fn records_in_order() {
        let notifier = RecordingNotifier::new();
        notifier.notify(&Notification::info("first"));
        notifier.notify(&Notification::warning("second"));

        let sent = notifier.notifications();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].message, "first");
        assert_eq!(notifier.last().unwrap().severity, Severity::Warning);
    }
}
