use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Error,
    Info,
}

impl NoticeKind {
    pub fn title(&self) -> &'static str {
        match self {
            NoticeKind::Error => "Error",
            NoticeKind::Info => "Notice",
        }
    }
}

/// Out-of-band channel for things the user must see and acknowledge.
/// How a notice is presented is up to the implementation.
pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NoticeKind, message: &str);
}

/// Writes notices to the log and nothing else.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        match kind {
            NoticeKind::Error => warn!("{}: {message}", kind.title()),
            NoticeKind::Info => info!("{}: {message}", kind.title()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
    pub raised_at: DateTime<Utc>,
    /// How many times this notice was raised while pending.
    pub occurrences: u32,
}

/// Alerts stay pending until a client dismisses them.
///
/// The queue only records; it does not hold up the conversation. Making an
/// alert blocking is the presenter's job (a modal that must be dismissed).
/// A repeat of a pending alert with the same kind and message is folded
/// into it, so the queue holds at most one entry per distinct notice.
#[derive(Debug, Default)]
pub struct AlertQueue {
    pending: Mutex<Vec<Alert>>,
}

impl AlertQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Alert>> {
        // A poisoned queue still holds valid alerts.
        self.pending.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn pending(&self) -> Vec<Alert> {
        self.lock().clone()
    }

    /// Returns false when no pending alert has this id.
    pub fn acknowledge(&self, id: &str) -> bool {
        let mut pending = self.lock();
        let before = pending.len();
        pending.retain(|a| a.id != id);
        pending.len() != before
    }
}

impl Notifier for AlertQueue {
    fn notify(&self, kind: NoticeKind, message: &str) {
        TracingNotifier.notify(kind, message);
        let mut pending = self.lock();
        if let Some(existing) = pending.iter_mut().find(|a| a.kind == kind && a.message == message) {
            existing.occurrences += 1;
            existing.raised_at = Utc::now();
            return;
        }
        pending.push(Alert {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            title: kind.title().to_string(),
            message: message.to_string(),
            raised_at: Utc::now(),
            occurrences: 1,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alerts_stay_pending_until_acknowledged() {
        let queue = AlertQueue::new();
        queue.notify(NoticeKind::Error, "API key not valid.");
        queue.notify(NoticeKind::Info, "second");

        let pending = queue.pending();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].title, "Error");
        assert_eq!(pending[0].message, "API key not valid.");

        assert!(queue.acknowledge(&pending[0].id));
        assert_eq!(queue.pending().len(), 1);
        assert_eq!(queue.pending()[0].message, "second");
    }

    #[test]
    fn repeated_notice_folds_into_pending_alert() {
        let queue = AlertQueue::new();
        queue.notify(NoticeKind::Error, "offline");
        queue.notify(NoticeKind::Error, "offline");
        queue.notify(NoticeKind::Info, "offline");

        let pending = queue.pending();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].occurrences, 2);
        assert_eq!(pending[1].occurrences, 1);

        assert!(queue.acknowledge(&pending[0].id));
        queue.notify(NoticeKind::Error, "offline");
        let pending = queue.pending();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[1].occurrences, 1);
    }

    #[test]
    fn acknowledging_unknown_id_reports_false() {
        let queue = AlertQueue::new();
        queue.notify(NoticeKind::Error, "x");
        assert!(!queue.acknowledge("nope"));
        assert_eq!(queue.pending().len(), 1);
    }
}
