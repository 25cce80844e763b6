//! User-facing message sink.

use parking_lot::Mutex;
use tracing::info;

/// Destination for messages meant for the person running a migration.
pub trait UiService: Send + Sync {
    /// Show a message.
    fn send_message(&self, message: &str);
}

/// Sends messages to the `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingUiService;

impl UiService for LoggingUiService {
    fn send_message(&self, message: &str) {
        info!(target: "schemashift::ui", "{}", message);
    }
}

/// Collects messages in memory, for testing.
#[derive(Debug, Default)]
pub struct MemoryUiService {
    messages: Mutex<Vec<String>>,
}

impl MemoryUiService {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages received so far.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    /// Check if nothing was received.
    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }
}

impl UiService for MemoryUiService {
    fn send_message(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}
