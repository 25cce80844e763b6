//! Execution listener notified about precondition outcomes.

use super::options::{ErrorOption, FailOption};
use super::outcome::{PreconditionErrored, PreconditionFailed};
use parking_lot::Mutex;

/// Observer of change-set execution.
pub trait ChangeExecListener: Send + Sync {
    /// Preconditions failed and were handled with `on_fail`.
    fn precondition_failed(&self, error: &PreconditionFailed, on_fail: FailOption);

    /// Preconditions errored and were handled with `on_error`.
    fn precondition_errored(&self, error: &PreconditionErrored, on_error: ErrorOption);
}

/// Event recorded by [`MemoryExecListener`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenerEvent {
    /// A failure notification.
    Failed {
        /// The outcome's message.
        message: String,
        /// Number of failed preconditions.
        failed_count: usize,
        /// Policy the listener was told about.
        on_fail: FailOption,
    },
    /// An error notification.
    Errored {
        /// The outcome's message.
        message: String,
        /// Number of errored preconditions.
        error_count: usize,
        /// Policy the listener was told about.
        on_error: ErrorOption,
    },
}

/// In-memory listener for testing.
#[derive(Debug, Default)]
pub struct MemoryExecListener {
    events: Mutex<Vec<ListenerEvent>>,
}

impl MemoryExecListener {
    /// Create an empty listener.
    pub fn new() -> Self {
        Self::default()
    }

    /// Events recorded so far.
    pub fn events(&self) -> Vec<ListenerEvent> {
        self.events.lock().clone()
    }
}

impl ChangeExecListener for MemoryExecListener {
    fn precondition_failed(&self, error: &PreconditionFailed, on_fail: FailOption) {
        self.events.lock().push(ListenerEvent::Failed {
            message: error.message.clone(),
            failed_count: error.failed.len(),
            on_fail,
        });
    }

    fn precondition_errored(&self, error: &PreconditionErrored, on_error: ErrorOption) {
        self.events.lock().push(ListenerEvent::Errored {
            message: error.message.clone(),
            error_count: error.errors.len(),
            on_error,
        });
    }
}
