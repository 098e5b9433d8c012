//! Notification surface for user-visible run reporting.
//!
//! The editing UI shows toasts for guard failures, per-field failures, and
//! the end-of-run summary. The orchestrator only talks to the [`Notifier`]
//! trait; the default implementation forwards to `tracing`, and tests use
//! [`MemoryNotifier`] to assert on what was reported.

use std::sync::Mutex;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Info,
    Warning,
    Error,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, level: NotifyLevel, message: &str);
}

/// Default notifier: forwards messages to the log.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, level: NotifyLevel, message: &str) {
        match level {
            NotifyLevel::Info => info!("{}", message),
            NotifyLevel::Warning => warn!("{}", message),
            NotifyLevel::Error => error!("{}", message),
        }
    }
}

/// Collects notifications in memory for assertions.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    messages: Mutex<Vec<(NotifyLevel, String)>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<(NotifyLevel, String)> {
        self.messages.lock().expect("notifier lock").clone()
    }

    pub fn contains(&self, level: NotifyLevel, fragment: &str) -> bool {
        self.messages()
            .iter()
            .any(|(l, m)| *l == level && m.contains(fragment))
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, level: NotifyLevel, message: &str) {
        self.messages
            .lock()
            .expect("notifier lock")
            .push((level, message.to_string()));
    }
}
