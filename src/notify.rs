//! Notification interface for narrating state changes.
//!
//! The engine fires one `notify` per discrete narrated event (resource
//! grant, promotion, draw, trial outcome), in the order the effects apply.
//! Presentation layers forward these to chat or audio; tests use
//! [`RecordingNotifier`] to assert on the sequence.

/// Consumer of narration events.
pub trait Notifier {
    /// Receive one narrated event.
    fn notify(&mut self, message: &str);
}

/// Discards all narration.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&mut self, _message: &str) {}
}

/// Collects narration in order, for assertions in tests.
#[derive(Clone, Debug, Default)]
pub struct RecordingNotifier {
    messages: Vec<String>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages received so far, in order.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// True if any message contains the given fragment.
    #[must_use]
    pub fn saw(&self, fragment: &str) -> bool {
        self.messages.iter().any(|m| m.contains(fragment))
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}
