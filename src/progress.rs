//! Observer trait for user-facing notifications and submission progress.
//!
//! Inject an [`Arc<dyn IntakeObserver>`] via
//! [`crate::config::ClientConfigBuilder::observer`] to receive events as the
//! controller accepts files and drives a submission.
//!
//! # Example
//!
//! ```rust
//! use doc2speech::{ClientConfig, IntakeObserver, Notification};
//! use std::sync::{Arc, Mutex};
//!
//! #[derive(Default)]
//! struct Alerts(Mutex<Vec<String>>);
//!
//! impl IntakeObserver for Alerts {
//!     fn on_notification(&self, n: &Notification) {
//!         self.0.lock().unwrap().push(n.message.clone());
//!     }
//! }
//!
//! let config = ClientConfig::builder()
//!     .observer(Arc::new(Alerts::default()) as Arc<dyn IntakeObserver>)
//!     .build()
//!     .unwrap();
//! ```

use crate::error::{Doc2SpeechError, ValidationError};
use serde::Serialize;
use std::sync::Arc;

/// Which part of the error taxonomy a notification came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Validation,
    Service,
    Transport,
}

/// A message that should be shown to the user immediately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn from_error(err: &Doc2SpeechError) -> Self {
        let kind = match err {
            Doc2SpeechError::Validation(_) => NotificationKind::Validation,
            Doc2SpeechError::Service { .. } => NotificationKind::Service,
            _ => NotificationKind::Transport,
        };
        Self {
            kind,
            message: err.user_message(),
        }
    }
}

impl From<&ValidationError> for Notification {
    fn from(err: &ValidationError) -> Self {
        Self {
            kind: NotificationKind::Validation,
            message: err.user_message().to_string(),
        }
    }
}

/// Receives controller events.
///
/// Implementations must be `Send + Sync`: progress ticks arrive from the
/// ticker task, which may run on another worker thread. All methods default
/// to no-ops so callers only override what they care about.
pub trait IntakeObserver: Send + Sync {
    /// A user-facing message (validation failure, service error, upload failure).
    fn on_notification(&self, notification: &Notification) {
        let _ = notification;
    }

    /// Submission progress changed. Values are non-decreasing within one
    /// submission until the final reset to 0.
    fn on_progress(&self, percent: u8) {
        let _ = percent;
    }

    /// A submission passed its preconditions and is about to start.
    fn on_submit_start(&self, file_name: &str, size: u64) {
        let _ = (file_name, size);
    }

    /// A submission settled. `succeeded` is `true` when audio was received.
    fn on_submit_finished(&self, succeeded: bool) {
        let _ = succeeded;
    }
}

/// Default observer when none is configured.
pub struct NoopObserver;

impl IntakeObserver for NoopObserver {}

/// Convenience alias matching the type stored in [`crate::config::ClientConfig`].
pub type ObserverHandle = Arc<dyn IntakeObserver>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        notes: AtomicUsize,
        ticks: AtomicUsize,
    }

    impl IntakeObserver for Counting {
        fn on_notification(&self, _n: &Notification) {
            self.notes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_progress(&self, _percent: u8) {
            self.ticks.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_observer_does_not_panic() {
        let o = NoopObserver;
        o.on_notification(&(&ValidationError::NoFileSelected).into());
        o.on_progress(50);
        o.on_submit_start("a.pdf", 1);
        o.on_submit_finished(true);
    }

    #[test]
    fn overridden_methods_receive_events() {
        let o = Counting {
            notes: AtomicUsize::new(0),
            ticks: AtomicUsize::new(0),
        };
        o.on_progress(10);
        o.on_progress(20);
        o.on_notification(&(&ValidationError::SubmissionInProgress).into());
        o.on_submit_finished(false);
        assert_eq!(o.ticks.load(Ordering::SeqCst), 2);
        assert_eq!(o.notes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn notification_kind_follows_error() {
        let service = Doc2SpeechError::Service {
            status: 422,
            detail: "bad format".into(),
        };
        let n = Notification::from_error(&service);
        assert_eq!(n.kind, NotificationKind::Service);
        assert_eq!(n.message, "Failed to convert file: bad format");

        let timeout = Doc2SpeechError::Timeout {
            endpoint: "http://x".into(),
            secs: 5,
        };
        assert_eq!(Notification::from_error(&timeout).kind, NotificationKind::Transport);
    }
}
